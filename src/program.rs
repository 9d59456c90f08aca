//! # Program Data Model
//!
//! The types the loader produces and the dispatch loop consumes:
//! [`Opcode`], [`Arg`]/[`ArgKind`], [`Instruction`], and [`Program`].
//!
//! Arguments are reduced from their syntactic form to an [`ArgKind`]
//! once, at load time — a `var` argument becomes a cached [`VarRef`], a
//! `label` argument is validated against the label table, and every
//! other literal is fully decoded into a [`Value`]. Nothing downstream
//! re-parses source text.

use std::collections::HashMap;

use crate::frame::VarRef;
use crate::value::{Tag, Value};

/// The 34 base mnemonics plus their 15 data-stack variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,
    Call,
    Return,
    PushS,
    PopS,
    Add,
    Sub,
    Mul,
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    Int2Char,
    Stri2Int,
    Read,
    Write,
    Concat,
    StrLen,
    GetChar,
    SetChar,
    Type,
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    Exit,
    DPrint,
    Break,
    ClearS,
    AddS,
    SubS,
    MulS,
    IDivS,
    LtS,
    GtS,
    EqS,
    AndS,
    OrS,
    NotS,
    Int2CharS,
    Stri2IntS,
    JumpIfEqS,
    JumpIfNeqS,
}

impl Opcode {
    /// Case-insensitive lookup, as required by the loader's schema check.
    pub fn from_name(name: &str) -> Option<Opcode> {
        use Opcode::*;
        Some(match name.to_ascii_uppercase().as_str() {
            "MOVE" => Move,
            "CREATEFRAME" => CreateFrame,
            "PUSHFRAME" => PushFrame,
            "POPFRAME" => PopFrame,
            "DEFVAR" => DefVar,
            "CALL" => Call,
            "RETURN" => Return,
            "PUSHS" => PushS,
            "POPS" => PopS,
            "ADD" => Add,
            "SUB" => Sub,
            "MUL" => Mul,
            "IDIV" => IDiv,
            "LT" => Lt,
            "GT" => Gt,
            "EQ" => Eq,
            "AND" => And,
            "OR" => Or,
            "NOT" => Not,
            "INT2CHAR" => Int2Char,
            "STRI2INT" => Stri2Int,
            "READ" => Read,
            "WRITE" => Write,
            "CONCAT" => Concat,
            "STRLEN" => StrLen,
            "GETCHAR" => GetChar,
            "SETCHAR" => SetChar,
            "TYPE" => Type,
            "LABEL" => Label,
            "JUMP" => Jump,
            "JUMPIFEQ" => JumpIfEq,
            "JUMPIFNEQ" => JumpIfNeq,
            "EXIT" => Exit,
            "DPRINT" => DPrint,
            "BREAK" => Break,
            "CLEARS" => ClearS,
            "ADDS" => AddS,
            "SUBS" => SubS,
            "MULS" => MulS,
            "IDIVS" => IDivS,
            "LTS" => LtS,
            "GTS" => GtS,
            "EQS" => EqS,
            "ANDS" => AndS,
            "ORS" => OrS,
            "NOTS" => NotS,
            "INT2CHARS" => Int2CharS,
            "STRI2INTS" => Stri2IntS,
            "JUMPIFEQS" => JumpIfEqS,
            "JUMPIFNEQS" => JumpIfNeqS,
            _ => return None,
        })
    }

    /// The number of `argN` children this opcode's schema requires.
    pub fn arity(&self) -> usize {
        use Opcode::*;
        match self {
            CreateFrame | PushFrame | PopFrame | Return | Break | ClearS | AddS | SubS
            | MulS | IDivS | LtS | GtS | EqS | AndS | OrS | NotS | Int2CharS | Stri2IntS => 0,
            DefVar | Call | PushS | PopS | Write | Label | Jump | Exit | DPrint
            | JumpIfEqS | JumpIfNeqS => 1,
            Move | Not | Int2Char | Read | Type | StrLen => 2,
            Add | Sub | Mul | IDiv | Lt | Gt | Eq | And | Or | Stri2Int | Concat | GetChar
            | SetChar | JumpIfEq | JumpIfNeq => 3,
        }
    }
}

/// A syntactic argument position's admissible shape, used by the loader
/// to validate the `type` attribute before building an [`ArgKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgShape {
    /// A `var`-typed destination or source reference.
    Var,
    /// A label symbol (`CALL`/`JUMP`/`LABEL`/`JUMPIFEQ`/`JUMPIFNEQ`).
    Label,
    /// A `type`-typed tag symbol, used only by `READ`'s second argument.
    TypeTag,
    /// Any symbolic operand: a variable or a literal of int/string/bool/nil.
    Symb,
}

/// A fully-resolved argument, reduced from source text at load time.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgKind {
    Var(VarRef),
    Label(String),
    Type(Tag),
    Literal(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub kind: ArgKind,
}

#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: Opcode,
    pub args: Vec<Arg>,
}

pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, usize>,
}
