//! # String and Conversion Operations
//!
//! `INT2CHAR STRI2INT CONCAT STRLEN GETCHAR SETCHAR`. Indexing is by
//! Unicode code point, not byte offset, matching `STRLEN`'s "length in
//! code points". Out-of-range indices and invalid scalar values are all
//! *string* errors (exit 58), never *type* errors — the operand tags are
//! already correct by the time these run.

use crate::error::EngineError;
use crate::value::Value;

fn require_int(v: Value) -> Result<i64, EngineError> {
    match v {
        Value::Int(i) => Ok(i),
        other => Err(EngineError::Type(format!("expected int, found {}", other.tag()))),
    }
}

fn require_str(v: Value) -> Result<String, EngineError> {
    match v {
        Value::Str(s) => Ok(s),
        other => Err(EngineError::Type(format!("expected string, found {}", other.tag()))),
    }
}

pub(super) fn handle_int2char(n: Value) -> Result<Value, EngineError> {
    let n = require_int(n)?;
    let code = u32::try_from(n).map_err(|_| {
        EngineError::StringOp(format!("{} is not a valid Unicode scalar value", n))
    })?;
    let ch = char::from_u32(code)
        .ok_or_else(|| EngineError::StringOp(format!("{} is not a valid Unicode scalar value", n)))?;
    Ok(Value::Str(ch.to_string()))
}

fn char_at(s: &str, index: i64) -> Result<char, EngineError> {
    if index < 0 {
        return Err(EngineError::StringOp(format!("index {} is out of range", index)));
    }
    s.chars()
        .nth(index as usize)
        .ok_or_else(|| EngineError::StringOp(format!("index {} is out of range", index)))
}

pub(super) fn handle_stri2int(s: Value, i: Value) -> Result<Value, EngineError> {
    let s = require_str(s)?;
    let i = require_int(i)?;
    Ok(Value::Int(char_at(&s, i)? as i64))
}

pub(super) fn handle_concat(a: Value, b: Value) -> Result<Value, EngineError> {
    Ok(Value::Str(require_str(a)? + &require_str(b)?))
}

pub(super) fn handle_strlen(s: Value) -> Result<Value, EngineError> {
    Ok(Value::Int(require_str(s)?.chars().count() as i64))
}

pub(super) fn handle_getchar(s: Value, i: Value) -> Result<Value, EngineError> {
    let s = require_str(s)?;
    let i = require_int(i)?;
    Ok(Value::Str(char_at(&s, i)?.to_string()))
}

/// `dst` arrives already read as its current value (must be a string —
/// checked by the caller via the ordinary operand resolver, which
/// raises a type error on a non-string/uninitialized destination).
pub(super) fn handle_setchar(current: &str, i: Value, ch: Value) -> Result<Value, EngineError> {
    let i = require_int(i)?;
    let ch = require_str(ch)?;
    let replacement = ch
        .chars()
        .next()
        .ok_or_else(|| EngineError::StringOp("replacement string is empty".to_string()))?;
    if i < 0 || i as usize >= current.chars().count() {
        return Err(EngineError::StringOp(format!("index {} is out of range", i)));
    }
    let mut chars: Vec<char> = current.chars().collect();
    chars[i as usize] = replacement;
    Ok(Value::Str(chars.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int2char_rejects_values_outside_unicode_range() {
        assert!(matches!(
            handle_int2char(Value::Int(0x11_0000)),
            Err(EngineError::StringOp(_))
        ));
    }

    #[test]
    fn stri2int_indexes_by_code_point() {
        assert_eq!(
            handle_stri2int(Value::Str("abc".to_string()), Value::Int(1)).unwrap(),
            Value::Int('b' as i64)
        );
    }

    #[test]
    fn getchar_out_of_range_is_string_error() {
        assert!(matches!(
            handle_getchar(Value::Str("ab".to_string()), Value::Int(5)),
            Err(EngineError::StringOp(_))
        ));
    }

    #[test]
    fn setchar_replaces_code_point_in_place() {
        let result = handle_setchar("abc", Value::Int(1), Value::Str("X".to_string())).unwrap();
        assert_eq!(result, Value::Str("aXc".to_string()));
    }

    #[test]
    fn setchar_rejects_empty_replacement() {
        assert!(matches!(
            handle_setchar("abc", Value::Int(0), Value::Str(String::new())),
            Err(EngineError::StringOp(_))
        ));
    }
}
