//! # I/O Boundary
//!
//! The three handles the engine borrows for the duration of a run:
//! standard output (write-only), the program-input stream (line-oriented
//! read, standing in for the interpreted program's stdin), and the
//! diagnostic stream used by `BREAK`/`DPRINT`. All three are trait
//! objects so tests can swap in in-memory buffers instead of real
//! files/stdio.

use std::io::{self, BufRead, Write};

pub struct EngineIo<'a> {
    out: Box<dyn Write + 'a>,
    input: Box<dyn BufRead + 'a>,
    diag: Box<dyn Write + 'a>,
}

impl<'a> EngineIo<'a> {
    pub fn new(
        out: Box<dyn Write + 'a>,
        input: Box<dyn BufRead + 'a>,
        diag: Box<dyn Write + 'a>,
    ) -> EngineIo<'a> {
        EngineIo { out, input, diag }
    }

    /// `WRITE` — no trailing newline is added; the value's own rendering
    /// supplies everything that should be printed.
    pub fn write_out(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// `DPRINT`/`BREAK` — same contract, different stream.
    pub fn write_diag(&mut self, text: &str) -> io::Result<()> {
        self.diag.write_all(text.as_bytes())
    }

    /// `READ` — one line from the program-input stream, without its
    /// terminating newline. `None` on EOF.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.input.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.diag.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lines_without_trailing_newline() {
        let mut out = Vec::new();
        let input = io::Cursor::new(b"first\nsecond\n".to_vec());
        let mut diag = Vec::new();
        let mut io_bundle = EngineIo::new(Box::new(&mut out), Box::new(input), Box::new(&mut diag));
        assert_eq!(io_bundle.read_line().unwrap(), Some("first".to_string()));
        assert_eq!(io_bundle.read_line().unwrap(), Some("second".to_string()));
        assert_eq!(io_bundle.read_line().unwrap(), None);
    }

    #[test]
    fn write_out_appends_no_newline() {
        let mut out = Vec::new();
        let input = io::Cursor::new(Vec::new());
        let mut diag = Vec::new();
        {
            let mut io_bundle =
                EngineIo::new(Box::new(&mut out), Box::new(input), Box::new(&mut diag));
            io_bundle.write_out("42").unwrap();
        }
        assert_eq!(out, b"42");
    }
}
