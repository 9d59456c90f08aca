//! # Variable Management
//!
//! `DEFVAR MOVE TYPE`. `TYPE` is the one opcode that never fails on its
//! source's kind — including an uninitialized source, which every other
//! read operand would reject with *missing-value*.

use crate::error::EngineError;
use crate::frame::{Frames, VarRef};
use crate::program::{Arg, ArgKind};
use crate::value::Value;

pub(super) fn handle_defvar(var: &VarRef, frames: &mut Frames) -> Result<(), EngineError> {
    frames.define(var)
}

pub(super) fn handle_move(dst: &VarRef, src: Value, frames: &mut Frames) -> Result<(), EngineError> {
    frames.write(dst, src)
}

/// `TYPE dst src` — the tag name of `src`, or the empty string if `src`
/// is a declared-but-uninitialized variable.
pub(super) fn handle_type(src_arg: &Arg, frames: &Frames) -> Result<Value, EngineError> {
    let name = match &src_arg.kind {
        ArgKind::Var(var) => frames
            .slot(var)?
            .tag()
            .map(|t| t.name().to_string())
            .unwrap_or_default(),
        ArgKind::Literal(v) => v.tag().name().to_string(),
        ArgKind::Label(_) | ArgKind::Type(_) => {
            return Err(EngineError::Type("TYPE's operand must be a var or literal".to_string()))
        }
    };
    Ok(Value::Str(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameKind;

    #[test]
    fn type_of_uninitialized_variable_is_empty_string() {
        let mut frames = Frames::new();
        let var = VarRef { frame: FrameKind::Global, name: "x".to_string() };
        frames.define(&var).unwrap();
        let arg = Arg { kind: ArgKind::Var(var) };
        assert_eq!(handle_type(&arg, &frames).unwrap(), Value::Str(String::new()));
    }

    #[test]
    fn type_of_literal_reports_its_tag() {
        let frames = Frames::new();
        let arg = Arg { kind: ArgKind::Literal(Value::Bool(true)) };
        assert_eq!(handle_type(&arg, &frames).unwrap(), Value::Str("bool".to_string()));
    }
}
