//! # Error Handling
//!
//! This module defines the engine's error taxonomy and its mapping onto
//! the fixed process exit codes.
//!
//! ## Design
//! - [`ExitCode`] is a compact enumeration of the numeric statuses the
//!   process can terminate with. It is `repr(i32)` so `main` can hand it
//!   straight to `std::process::exit`.
//! - [`EngineError`] is a richer enum carrying a human-readable message
//!   per failure. Every variant maps to exactly one [`ExitCode`] via
//!   [`EngineError::exit_code`].
//! - [`CliError`] covers the two failure classes that can occur before
//!   the engine ever starts (usage, unreadable input), kept separate
//!   because they originate outside the engine's contract.
//!
//! ## Display
//! [`EngineError`] implements [`fmt::Display`] and [`std::error::Error`]
//! so it composes with `?` throughout the crate.

use std::fmt;

/// The full set of numeric statuses this process can exit with.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    CliUsage = 10,
    InputUnavailable = 11,
    XmlNotWellFormed = 31,
    XmlSchema = 32,
    Semantic = 52,
    OperandType = 53,
    NoSuchVariable = 54,
    NoSuchFrame = 55,
    MissingValue = 56,
    IllegalOperandValue = 57,
    StringOp = 58,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Errors raised while loading, resolving, or executing a program.
///
/// Each variant carries a descriptive message and maps to exactly one
/// [`ExitCode`] (see [`EngineError::exit_code`]).
#[derive(Debug, PartialEq)]
pub enum EngineError {
    /// The XML document itself is not well-formed.
    Xml(String),
    /// The document is well-formed XML but violates the instruction schema.
    Structure(String),
    /// Undefined label, or a duplicate `LABEL`/variable definition.
    Semantic(String),
    /// An operand's tag is not among the ones this opcode slot admits.
    Type(String),
    /// A variable name is not present in its (existing) frame.
    NoSuchVariable(String),
    /// GF/LF/TF was addressed but does not currently exist.
    NoSuchFrame(String),
    /// An uninitialized slot, empty data stack, or empty call stack was read.
    MissingValue(String),
    /// Division by zero, or `EXIT` outside `[0, 49]`.
    IllegalOperandValue(String),
    /// Out-of-range string indexing, or an invalid Unicode scalar value.
    StringOp(String),
}

impl EngineError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            EngineError::Xml(_) => ExitCode::XmlNotWellFormed,
            EngineError::Structure(_) => ExitCode::XmlSchema,
            EngineError::Semantic(_) => ExitCode::Semantic,
            EngineError::Type(_) => ExitCode::OperandType,
            EngineError::NoSuchVariable(_) => ExitCode::NoSuchVariable,
            EngineError::NoSuchFrame(_) => ExitCode::NoSuchFrame,
            EngineError::MissingValue(_) => ExitCode::MissingValue,
            EngineError::IllegalOperandValue(_) => ExitCode::IllegalOperandValue,
            EngineError::StringOp(_) => ExitCode::StringOp,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Xml(msg) => write!(f, "malformed XML: {}", msg),
            EngineError::Structure(msg) => write!(f, "schema error: {}", msg),
            EngineError::Semantic(msg) => write!(f, "semantic error: {}", msg),
            EngineError::Type(msg) => write!(f, "operand type error: {}", msg),
            EngineError::NoSuchVariable(msg) => write!(f, "no such variable: {}", msg),
            EngineError::NoSuchFrame(msg) => write!(f, "no such frame: {}", msg),
            EngineError::MissingValue(msg) => write!(f, "missing value: {}", msg),
            EngineError::IllegalOperandValue(msg) => {
                write!(f, "illegal operand value: {}", msg)
            }
            EngineError::StringOp(msg) => write!(f, "string operation error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

/// Failures that can occur before the engine is ever invoked.
#[derive(Debug, PartialEq)]
pub enum CliError {
    /// Bad or missing flags, conflicting `--help` usage.
    Usage(String),
    /// A `--source`/`--input` path does not exist or cannot be opened.
    InputUnavailable(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Usage(_) => ExitCode::CliUsage,
            CliError::InputUnavailable(_) => ExitCode::InputUnavailable,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "usage error: {}", msg),
            CliError::InputUnavailable(msg) => write!(f, "input unavailable: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}
