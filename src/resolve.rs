//! # Operand Resolver
//!
//! Reduces an already-loaded [`Arg`] to something an opcode handler can
//! act on directly: a [`Value`] for a read operand, a [`VarRef`] for a
//! destination, a label index for a jump/call target. Everything here
//! is cheap — the expensive parsing already happened in the loader.

use crate::error::EngineError;
use crate::frame::{Frames, VarRef};
use crate::program::{Arg, ArgKind, Program};
use crate::value::{Tag, Value};

/// Resolve a read operand (`var` or literal) to a concrete [`Value`].
pub fn value(arg: &Arg, frames: &Frames) -> Result<Value, EngineError> {
    match &arg.kind {
        ArgKind::Var(var) => frames.read(var),
        ArgKind::Literal(v) => Ok(v.clone()),
        ArgKind::Label(_) | ArgKind::Type(_) => Err(EngineError::Type(
            "expected a value, found a label or type symbol".to_string(),
        )),
    }
}

/// Resolve a destination operand; always a `var`, never read.
pub fn dest(arg: &Arg) -> Result<&VarRef, EngineError> {
    match &arg.kind {
        ArgKind::Var(var) => Ok(var),
        _ => Err(EngineError::Type("expected a variable destination".to_string())),
    }
}

/// Resolve `READ`'s second argument: the requested result type.
pub fn type_tag(arg: &Arg) -> Result<Tag, EngineError> {
    match &arg.kind {
        ArgKind::Type(tag) => Ok(*tag),
        _ => Err(EngineError::Type("expected a type tag".to_string())),
    }
}

/// Resolve a `label`-kind argument against the program's label table.
pub fn label(arg: &Arg, program: &Program) -> Result<usize, EngineError> {
    let name = match &arg.kind {
        ArgKind::Label(name) => name,
        _ => return Err(EngineError::Type("expected a label".to_string())),
    };
    program
        .labels
        .get(name)
        .copied()
        .ok_or_else(|| EngineError::Semantic(format!("undefined label '{}'", name)))
}

/// Require that `v` carries exactly `tag`, else *type* (exit 53).
pub fn expect_tag(v: &Value, tag: Tag) -> Result<(), EngineError> {
    if v.tag() == tag {
        Ok(())
    } else {
        Err(EngineError::Type(format!(
            "expected {}, found {}",
            tag, v.tag()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameKind;

    #[test]
    fn resolves_literal_without_touching_frames() {
        let arg = Arg { kind: ArgKind::Literal(Value::Int(7)) };
        let frames = Frames::new();
        assert_eq!(value(&arg, &frames).unwrap(), Value::Int(7));
    }

    #[test]
    fn resolves_variable_through_frames() {
        let mut frames = Frames::new();
        let var = VarRef { frame: FrameKind::Global, name: "x".to_string() };
        frames.define(&var).unwrap();
        frames.write(&var, Value::Bool(true)).unwrap();
        let arg = Arg { kind: ArgKind::Var(var) };
        assert_eq!(value(&arg, &frames).unwrap(), Value::Bool(true));
    }

    #[test]
    fn label_as_value_is_a_type_error() {
        let arg = Arg { kind: ArgKind::Label("l".to_string()) };
        let frames = Frames::new();
        assert!(matches!(value(&arg, &frames), Err(EngineError::Type(_))));
    }
}
