//! # Arithmetic, Comparison, and Boolean Operations
//!
//! Pure functions over already-resolved [`Value`]s — no stack or frame
//! access here, so the same logic serves both the three-address forms
//! (`ADD`, `LT`, ...) and their `…S` stack variants in `ops_stack`.
//!
//! ## Type rules
//! - `ADD SUB MUL IDIV`: both operands `int`.
//! - `LT GT`: operands share a tag drawn from `{int, string, bool}`; `nil`
//!   is never ordered.
//! - `EQ` (via [`values_equal`]): operands share a tag, or either side is
//!   `nil` — comparing anything against `nil` is allowed and false unless
//!   both sides are `nil`.
//! - `AND OR NOT`: `bool` only.
//!
//! Division/modulo by zero is *illegal-operand-value* (exit 57), not a
//! type error — the operands are perfectly well-typed ints.

use crate::error::EngineError;
use crate::value::{Tag, Value};

fn require_int(v: Value) -> Result<i64, EngineError> {
    match v {
        Value::Int(i) => Ok(i),
        other => Err(EngineError::Type(format!("expected int, found {}", other.tag()))),
    }
}

pub(super) fn handle_add(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Int(require_int(a)? + require_int(b)?))
}

pub(super) fn handle_sub(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Int(require_int(a)? - require_int(b)?))
}

pub(super) fn handle_mul(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Int(require_int(a)? * require_int(b)?))
}

pub(super) fn handle_idiv(a: Value, b: Value) -> Result<Value, EngineError> {
    let a = require_int(a)?;
    let b = require_int(b)?;
    if b == 0 {
        return Err(EngineError::IllegalOperandValue("division by zero".to_string()));
    }
    Ok(Value::Int(a / b))
}

fn orderable(a: &Value, b: &Value) -> Result<(), EngineError> {
    if a.tag() != b.tag() || a.tag() == Tag::Nil {
        return Err(EngineError::Type(format!(
            "cannot order {} and {}",
            a.tag(),
            b.tag()
        )));
    }
    Ok(())
}

pub(super) fn handle_lt(a: Value, b: Value) -> Result<Value, EngineError> {
    orderable(&a, &b)?;
    let res = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => x < y,
        (Value::Str(x), Value::Str(y)) => x < y,
        (Value::Bool(x), Value::Bool(y)) => !x & y,
        _ => unreachable!("orderable() already restricted the tag set"),
    };
    Ok(Value::Bool(res))
}

pub(super) fn handle_gt(a: Value, b: Value) -> Result<Value, EngineError> {
    orderable(&a, &b)?;
    let res = match (&a, &b) {
        (Value::Int(x), Value::Int(y)) => x > y,
        (Value::Str(x), Value::Str(y)) => x > y,
        (Value::Bool(x), Value::Bool(y)) => *x & !y,
        _ => unreachable!("orderable() already restricted the tag set"),
    };
    Ok(Value::Bool(res))
}

/// Shared by `EQ`/`EQS` and the `JUMPIFEQ(S)`/`JUMPIFNEQ(S)` family.
pub fn values_equal(a: &Value, b: &Value) -> Result<bool, EngineError> {
    if a.tag() == Tag::Nil || b.tag() == Tag::Nil {
        return Ok(a.tag() == Tag::Nil && b.tag() == Tag::Nil);
    }
    if a.tag() != b.tag() {
        return Err(EngineError::Type(format!(
            "cannot compare {} and {}",
            a.tag(),
            b.tag()
        )));
    }
    Ok(a == b)
}

pub(super) fn handle_eq(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Bool(values_equal(&a, &b)?))
}

fn require_bool(v: Value) -> Result<bool, EngineError> {
    match v {
        Value::Bool(b) => Ok(b),
        other => Err(EngineError::Type(format!("expected bool, found {}", other.tag()))),
    }
}

pub(super) fn handle_and(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Bool(require_bool(a)? && require_bool(b)?))
}

pub(super) fn handle_or(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Bool(require_bool(a)? || require_bool(b)?))
}

pub(super) fn handle_not(a: Value) -> Result<Value, EngineError> {
    Ok(Value::Bool(!require_bool(a)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idiv_by_zero_is_illegal_operand_value() {
        assert_eq!(
            handle_idiv(Value::Int(7), Value::Int(0)),
            Err(EngineError::IllegalOperandValue("division by zero".to_string()))
        );
    }

    #[test]
    fn idiv_truncates_toward_zero() {
        assert_eq!(handle_idiv(Value::Int(-7), Value::Int(2)).unwrap(), Value::Int(-3));
    }

    #[test]
    fn lt_rejects_nil() {
        assert!(matches!(handle_lt(Value::Nil, Value::Nil), Err(EngineError::Type(_))));
    }

    #[test]
    fn eq_allows_nil_on_either_side() {
        assert_eq!(values_equal(&Value::Nil, &Value::Int(1)).unwrap(), false);
        assert_eq!(values_equal(&Value::Nil, &Value::Nil).unwrap(), true);
    }

    #[test]
    fn eq_rejects_mismatched_non_nil_tags() {
        assert!(matches!(
            values_equal(&Value::Int(1), &Value::Str("1".to_string())),
            Err(EngineError::Type(_))
        ));
    }
}
