//! # Data-Stack Operations
//!
//! `CLEARS PUSHS POPS ADDS SUBS MULS IDIVS LTS GTS EQS ANDS ORS NOTS
//! INT2CHARS STRI2INTS JUMPIFEQS JUMPIFNEQS`. These reuse the pure
//! per-operation logic in [`super::ops_arith`]/[`super::ops_string`];
//! the only difference is where the operands come from — the data
//! stack instead of resolved three-address arguments — and that
//! underflow is *missing-value* (exit 56), not a VM-internal panic.

use crate::error::EngineError;
use crate::value::Value;

use super::ops_arith::{handle_add, handle_and, handle_eq, handle_gt, handle_idiv, handle_lt,
    handle_mul, handle_not, handle_or, handle_sub, values_equal};
use super::ops_string::{handle_int2char, handle_stri2int};
use super::pop;

pub(super) fn handle_pushs(v: Value, stack: &mut Vec<Value>) {
    stack.push(v);
}

pub(super) fn handle_pops(stack: &mut Vec<Value>) -> Result<Value, EngineError> {
    pop(stack)
}

pub(super) fn handle_clears(stack: &mut Vec<Value>) {
    stack.clear();
}

/// Apply a binary pure operation to the top two stack values (`b` then
/// `a`, matching infix `a op b`), pushing the result.
fn binary(
    stack: &mut Vec<Value>,
    op: impl Fn(Value, Value) -> Result<Value, EngineError>,
) -> Result<(), EngineError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    stack.push(op(a, b)?);
    Ok(())
}

fn unary(
    stack: &mut Vec<Value>,
    op: impl Fn(Value) -> Result<Value, EngineError>,
) -> Result<(), EngineError> {
    let a = pop(stack)?;
    stack.push(op(a)?);
    Ok(())
}

pub(super) fn handle_adds(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_add)
}

pub(super) fn handle_subs(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_sub)
}

pub(super) fn handle_muls(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_mul)
}

pub(super) fn handle_idivs(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_idiv)
}

pub(super) fn handle_lts(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_lt)
}

pub(super) fn handle_gts(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_gt)
}

pub(super) fn handle_eqs(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_eq)
}

pub(super) fn handle_ands(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_and)
}

pub(super) fn handle_ors(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    binary(stack, handle_or)
}

pub(super) fn handle_nots(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    unary(stack, handle_not)
}

pub(super) fn handle_int2chars(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    unary(stack, handle_int2char)
}

pub(super) fn handle_stri2ints(stack: &mut Vec<Value>) -> Result<(), EngineError> {
    let i = pop(stack)?;
    let s = pop(stack)?;
    stack.push(handle_stri2int(s, i)?);
    Ok(())
}

/// Pops two values (`b` then `a`) and reports whether `a == b` under
/// the same rules as `EQ`, without pushing anything back.
pub(super) fn pop_eq_pair(stack: &mut Vec<Value>) -> Result<bool, EngineError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    values_equal(&a, &b)
}
