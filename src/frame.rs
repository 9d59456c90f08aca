//! # Frame Memory
//!
//! Variable storage is split across three kinds of frame:
//! - the **global frame (GF)**, alive for the whole run,
//! - at most one **temporary frame (TF)**, and
//! - an ordered **local-frame stack (LF)**, whose top is "the" local frame.
//!
//! `CREATEFRAME`/`PUSHFRAME`/`POPFRAME` move frames between TF and the
//! LF stack; they never copy individual slots. See [`Frames`] for the
//! lifecycle methods those opcodes call directly.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::value::{Tag, Value};

/// Which kind of frame a variable reference names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    Global,
    Local,
    Temporary,
}

impl FrameKind {
    pub fn from_prefix(prefix: &str) -> Option<FrameKind> {
        match prefix {
            "GF" => Some(FrameKind::Global),
            "LF" => Some(FrameKind::Local),
            "TF" => Some(FrameKind::Temporary),
            _ => None,
        }
    }
}

/// A cached, resolved `prefix@name` reference, built once at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarRef {
    pub frame: FrameKind,
    pub name: String,
}

/// A variable slot: absent tag/value means the slot was declared but
/// never assigned.
#[derive(Clone, Debug)]
pub struct Slot {
    value: Option<Value>,
}

impl Slot {
    fn uninitialized() -> Slot {
        Slot { value: None }
    }

    pub fn tag(&self) -> Option<Tag> {
        self.value.as_ref().map(|v| v.tag())
    }

    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set(&mut self, value: Value) {
        self.value = Some(value);
    }
}

/// A single frame: a name → slot mapping. Declaration order is not
/// observable; lookups are by name only.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    slots: HashMap<String, Slot>,
}

impl Frame {
    pub fn new() -> Frame {
        Frame { slots: HashMap::new() }
    }

    pub fn define(&mut self, name: &str) -> Result<(), EngineError> {
        if self.slots.contains_key(name) {
            return Err(EngineError::Semantic(format!(
                "variable '{}' already defined in this frame",
                name
            )));
        }
        self.slots.insert(name.to_string(), Slot::uninitialized());
        Ok(())
    }

    pub fn slot(&self, name: &str) -> Result<&Slot, EngineError> {
        self.slots
            .get(name)
            .ok_or_else(|| EngineError::NoSuchVariable(name.to_string()))
    }

    pub fn slot_mut(&mut self, name: &str) -> Result<&mut Slot, EngineError> {
        self.slots
            .get_mut(name)
            .ok_or_else(|| EngineError::NoSuchVariable(name.to_string()))
    }
}

/// The engine's three-part variable memory.
pub struct Frames {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl Frames {
    pub fn new() -> Frames {
        Frames {
            global: Frame::new(),
            temporary: None,
            locals: Vec::new(),
        }
    }

    /// `CREATEFRAME` — discards any existing TF and installs a fresh one.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// `PUSHFRAME` — moves TF onto the local-frame stack. An empty TF
    /// (just created, no variables defined) is legal and pushes an
    /// empty local frame.
    pub fn push_frame(&mut self) -> Result<(), EngineError> {
        let frame = self
            .temporary
            .take()
            .ok_or_else(|| EngineError::NoSuchFrame("TF".to_string()))?;
        self.locals.push(frame);
        Ok(())
    }

    /// `POPFRAME` — pops the entire top local frame into TF, replacing
    /// whatever TF held, regardless of how many variables it carries.
    pub fn pop_frame(&mut self) -> Result<(), EngineError> {
        let frame = self
            .locals
            .pop()
            .ok_or_else(|| EngineError::NoSuchFrame("LF".to_string()))?;
        self.temporary = Some(frame);
        Ok(())
    }

    fn frame(&self, kind: FrameKind) -> Result<&Frame, EngineError> {
        match kind {
            FrameKind::Global => Ok(&self.global),
            FrameKind::Temporary => self
                .temporary
                .as_ref()
                .ok_or_else(|| EngineError::NoSuchFrame("TF".to_string())),
            FrameKind::Local => self
                .locals
                .last()
                .ok_or_else(|| EngineError::NoSuchFrame("LF".to_string())),
        }
    }

    fn frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, EngineError> {
        match kind {
            FrameKind::Global => Ok(&mut self.global),
            FrameKind::Temporary => self
                .temporary
                .as_mut()
                .ok_or_else(|| EngineError::NoSuchFrame("TF".to_string())),
            FrameKind::Local => self
                .locals
                .last_mut()
                .ok_or_else(|| EngineError::NoSuchFrame("LF".to_string())),
        }
    }

    pub fn define(&mut self, var: &VarRef) -> Result<(), EngineError> {
        self.frame_mut(var.frame)?.define(&var.name)
    }

    pub fn slot(&self, var: &VarRef) -> Result<&Slot, EngineError> {
        self.frame(var.frame)?.slot(&var.name)
    }

    pub fn slot_mut(&mut self, var: &VarRef) -> Result<&mut Slot, EngineError> {
        self.frame_mut(var.frame)?.slot_mut(&var.name)
    }

    /// Resolve `var` to a concrete Value, raising *missing-value* if the
    /// slot is declared but never assigned.
    pub fn read(&self, var: &VarRef) -> Result<Value, EngineError> {
        let slot = self.slot(var)?;
        slot.get().cloned().ok_or_else(|| {
            EngineError::MissingValue(format!("{:?}@{} is uninitialized", var.frame, var.name))
        })
    }

    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), EngineError> {
        self.slot_mut(var)?.set(value);
        Ok(())
    }

    /// Total number of currently-declared variables across GF, TF, and
    /// every local frame on the stack, used by `--vars`.
    pub fn variable_count(&self) -> usize {
        self.global.slots.len()
            + self.temporary.as_ref().map(|f| f.slots.len()).unwrap_or(0)
            + self.locals.iter().map(|f| f.slots.len()).sum::<usize>()
    }

    /// Human-readable dump for `BREAK`; exact wording is not part of
    /// any external contract.
    pub fn debug_summary(&self) -> String {
        format!(
            "GF: {} var(s), TF: {}, LF stack depth: {}",
            self.global.slots.len(),
            match &self.temporary {
                Some(f) => format!("present ({} var(s))", f.slots.len()),
                None => "absent".to_string(),
            },
            self.locals.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(name: &str) -> VarRef {
        VarRef { frame: FrameKind::Global, name: name.to_string() }
    }

    #[test]
    fn reading_uninitialized_slot_is_missing_value() {
        let mut frames = Frames::new();
        frames.define(&gf("x")).unwrap();
        assert!(matches!(frames.read(&gf("x")), Err(EngineError::MissingValue(_))));
    }

    #[test]
    fn redefinition_in_same_frame_is_semantic_error() {
        let mut frames = Frames::new();
        frames.define(&gf("x")).unwrap();
        assert!(matches!(frames.define(&gf("x")), Err(EngineError::Semantic(_))));
    }

    #[test]
    fn push_frame_without_temporary_frame_errors() {
        let mut frames = Frames::new();
        assert!(matches!(frames.push_frame(), Err(EngineError::NoSuchFrame(_))));
    }

    #[test]
    fn pushframe_then_popframe_round_trips_whole_frame() {
        let mut frames = Frames::new();
        frames.create_frame();
        let y = VarRef { frame: FrameKind::Temporary, name: "y".to_string() };
        frames.define(&y).unwrap();
        frames.push_frame().unwrap();

        let ly = VarRef { frame: FrameKind::Local, name: "y".to_string() };
        frames.write(&ly, Value::Int(1)).unwrap();
        frames.pop_frame().unwrap();

        let ty = VarRef { frame: FrameKind::Temporary, name: "y".to_string() };
        assert_eq!(frames.read(&ty).unwrap(), Value::Int(1));
    }

    #[test]
    fn empty_temporary_frame_is_legal_to_push() {
        let mut frames = Frames::new();
        frames.create_frame();
        assert!(frames.push_frame().is_ok());
        assert!(frames.temporary.is_none());
    }
}
