//! # Frame Lifecycle and Control Flow
//!
//! `CREATEFRAME PUSHFRAME POPFRAME RETURN CALL JUMP LABEL BREAK EXIT
//! JUMPIFEQ JUMPIFNEQ`. Most of these mutate `pc`/`advance_pc` directly
//! rather than returning a value, matching the dispatch loop's
//! convention of disabling auto-advance only where control actually
//! transfers.

use crate::error::EngineError;
use crate::frame::Frames;
use crate::io::EngineIo;
use crate::value::Value;

use super::ops_arith::values_equal;

pub(super) fn handle_create_frame(frames: &mut Frames) {
    frames.create_frame();
}

pub(super) fn handle_push_frame(frames: &mut Frames) -> Result<(), EngineError> {
    frames.push_frame()
}

pub(super) fn handle_pop_frame(frames: &mut Frames) -> Result<(), EngineError> {
    frames.pop_frame()
}

pub(super) fn handle_return(
    call_stack: &mut Vec<usize>,
    pc: &mut usize,
    advance_pc: &mut bool,
) -> Result<(), EngineError> {
    let target = call_stack
        .pop()
        .ok_or_else(|| EngineError::MissingValue("call stack is empty".to_string()))?;
    *pc = target;
    *advance_pc = false;
    Ok(())
}

pub(super) fn handle_call(
    target: usize,
    call_stack: &mut Vec<usize>,
    pc: &mut usize,
    advance_pc: &mut bool,
) {
    call_stack.push(*pc + 1);
    *pc = target;
    *advance_pc = false;
}

pub(super) fn handle_jump(target: usize, pc: &mut usize, advance_pc: &mut bool) {
    *pc = target;
    *advance_pc = false;
}

pub(super) fn handle_conditional_jump(
    negate: bool,
    target: usize,
    a: Value,
    b: Value,
    pc: &mut usize,
    advance_pc: &mut bool,
) -> Result<(), EngineError> {
    let eq = values_equal(&a, &b)?;
    if eq != negate {
        *pc = target;
        *advance_pc = false;
    }
    Ok(())
}

/// Validate `EXIT`'s operand and return the raw process status to use.
/// The engine's own [`crate::error::ExitCode`] enumerates *failure*
/// statuses only — a successful `EXIT n` carries its status out of band,
/// straight back to `main`.
pub(super) fn handle_exit(n: Value) -> Result<i64, EngineError> {
    let n = match n {
        Value::Int(n) => n,
        other => {
            return Err(EngineError::Type(format!("EXIT expects int, found {}", other.tag())))
        }
    };
    if !(0..=49).contains(&n) {
        return Err(EngineError::IllegalOperandValue(format!(
            "exit status {} is outside [0, 49]",
            n
        )));
    }
    Ok(n)
}

pub(super) fn handle_break(
    frames_summary: &str,
    pc: usize,
    data_stack_len: usize,
    call_stack_len: usize,
    io: &mut EngineIo<'_>,
) {
    let _ = io.write_diag(&format!(
        "-- BREAK at instruction {} --\nstack: {} value(s), calls: {} frame(s)\n{}\n",
        pc + 1,
        data_stack_len,
        call_stack_len,
        frames_summary
    ));
}
