//! # Input/Output Operations
//!
//! `READ WRITE DPRINT`. `READ` is the only opcode whose *result* tag
//! depends on the data seen at runtime: end of input or a parse failure
//! against the requested type both yield `nil`, never an error.

use crate::io::EngineIo;
use crate::value::{Tag, Value};

pub(super) fn handle_read(tag: Tag, io: &mut EngineIo<'_>) -> Value {
    let line = match io.read_line() {
        Ok(Some(line)) => line,
        _ => return Value::Nil,
    };
    match tag {
        Tag::Int => line.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Nil),
        Tag::Bool => Value::Bool(line.trim().eq_ignore_ascii_case("true")),
        Tag::Str => Value::Str(line),
        Tag::Nil => Value::Nil,
    }
}

pub(super) fn handle_write(v: &Value, io: &mut EngineIo<'_>) {
    io.write_out(&v.render()).expect("failed to write to stdout");
}

pub(super) fn handle_dprint(v: &Value, io: &mut EngineIo<'_>) {
    io.write_diag(&v.render()).expect("failed to write to the diagnostic stream");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn io_with(input: &str) -> EngineIo<'static> {
        EngineIo::new(
            Box::new(std::io::sink()),
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(std::io::sink()),
        )
    }

    #[test]
    fn read_int_on_eof_yields_nil() {
        let mut io = io_with("");
        assert_eq!(handle_read(Tag::Int, &mut io), Value::Nil);
    }

    #[test]
    fn read_int_on_parse_failure_yields_nil() {
        let mut io = io_with("abc\n");
        assert_eq!(handle_read(Tag::Int, &mut io), Value::Nil);
    }

    #[test]
    fn read_bool_is_case_insensitive() {
        let mut io = io_with("TrUe\n");
        assert_eq!(handle_read(Tag::Bool, &mut io), Value::Bool(true));
    }

    #[test]
    fn read_bool_anything_else_is_false() {
        let mut io = io_with("nope\n");
        assert_eq!(handle_read(Tag::Bool, &mut io), Value::Bool(false));
    }
}
