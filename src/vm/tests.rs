use std::io::Cursor;

use super::*;
use crate::frame::FrameKind;
use crate::program::{Arg, ArgKind, Instruction};
use crate::value::Value;

fn gf(name: &str) -> ArgKind {
    ArgKind::Var(VarRef { frame: FrameKind::Global, name: name.to_string() })
}

use crate::frame::VarRef;

fn lit_int(n: i64) -> ArgKind {
    ArgKind::Literal(Value::Int(n))
}

fn run_program(instructions: Vec<Instruction>, input: &str) -> (Result<i64, EngineError>, String) {
    let program = Program { instructions, labels: std::collections::HashMap::new() };
    let mut frames = Frames::new();
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut stats = Stats::new();
    let result = {
        let mut io = EngineIo::new(
            Box::new(&mut out),
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(&mut diag),
        );
        run(&program, &mut frames, &mut io, &mut stats)
    };
    (result, String::from_utf8(out).unwrap())
}

fn arg(kind: ArgKind) -> Arg {
    Arg { kind }
}

#[test]
fn writes_a_moved_integer_literal() {
    let instructions = vec![
        Instruction { opcode: Opcode::DefVar, args: vec![arg(gf("x"))] },
        Instruction {
            opcode: Opcode::Move,
            args: vec![arg(gf("x")), arg(lit_int(42))],
        },
        Instruction { opcode: Opcode::Write, args: vec![arg(gf("x"))] },
    ];
    let (result, out) = run_program(instructions, "");
    assert_eq!(result, Ok(0));
    assert_eq!(out, "42");
}

#[test]
fn idiv_by_zero_is_exit_57() {
    let instructions = vec![
        Instruction { opcode: Opcode::DefVar, args: vec![arg(gf("x"))] },
        Instruction {
            opcode: Opcode::Move,
            args: vec![arg(gf("x")), arg(lit_int(7))],
        },
        Instruction {
            opcode: Opcode::IDiv,
            args: vec![arg(gf("x")), arg(gf("x")), arg(lit_int(0))],
        },
    ];
    let (result, out) = run_program(instructions, "");
    assert_eq!(result, Err(EngineError::IllegalOperandValue("division by zero".to_string())));
    assert_eq!(out, "");
}

#[test]
fn reading_uninitialized_variable_is_missing_value() {
    let instructions = vec![
        Instruction { opcode: Opcode::DefVar, args: vec![arg(gf("x"))] },
        Instruction { opcode: Opcode::Write, args: vec![arg(gf("x"))] },
    ];
    let (result, _) = run_program(instructions, "");
    assert!(matches!(result, Err(EngineError::MissingValue(_))));
}

#[test]
fn createframe_pushframe_popframe_round_trips_a_value() {
    let ty = ArgKind::Var(VarRef { frame: FrameKind::Temporary, name: "y".to_string() });
    let ly = ArgKind::Var(VarRef { frame: FrameKind::Local, name: "y".to_string() });
    let instructions = vec![
        Instruction { opcode: Opcode::CreateFrame, args: vec![] },
        Instruction { opcode: Opcode::DefVar, args: vec![arg(ty.clone())] },
        Instruction { opcode: Opcode::PushFrame, args: vec![] },
        Instruction {
            opcode: Opcode::Move,
            args: vec![arg(ly.clone()), arg(lit_int(1))],
        },
        Instruction { opcode: Opcode::PopFrame, args: vec![] },
        Instruction { opcode: Opcode::Write, args: vec![arg(ty.clone())] },
    ];
    let (result, out) = run_program(instructions, "");
    assert_eq!(result, Ok(0));
    assert_eq!(out, "1");
}

#[test]
fn exit_outside_range_is_illegal_operand_value() {
    let instructions = vec![Instruction { opcode: Opcode::Exit, args: vec![arg(lit_int(50))] }];
    let (result, _) = run_program(instructions, "");
    assert!(matches!(result, Err(EngineError::IllegalOperandValue(_))));
}

#[test]
fn exit_in_range_stops_with_that_status() {
    let instructions = vec![
        Instruction { opcode: Opcode::Exit, args: vec![arg(lit_int(7))] },
        Instruction { opcode: Opcode::Write, args: vec![arg(lit_int(0))] },
    ];
    let (result, out) = run_program(instructions, "");
    assert_eq!(result, Ok(7));
    assert_eq!(out, "");
}

#[test]
fn jump_skips_over_an_instruction() {
    let label_arg = ArgKind::Label("skip".to_string());
    let instructions = vec![
        Instruction { opcode: Opcode::Jump, args: vec![arg(label_arg.clone())] },
        Instruction { opcode: Opcode::Write, args: vec![arg(lit_int(1))] },
        Instruction { opcode: Opcode::Label, args: vec![arg(label_arg)] },
        Instruction { opcode: Opcode::Write, args: vec![arg(lit_int(2))] },
    ];
    let program = Program {
        instructions,
        labels: std::collections::HashMap::from([("skip".to_string(), 2)]),
    };
    let mut frames = Frames::new();
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut stats = Stats::new();
    let result = {
        let mut io = EngineIo::new(
            Box::new(&mut out),
            Box::new(Cursor::new(Vec::new())),
            Box::new(&mut diag),
        );
        run(&program, &mut frames, &mut io, &mut stats)
    };
    assert_eq!(result, Ok(0));
    assert_eq!(String::from_utf8(out).unwrap(), "2");
}

#[test]
fn pushs_pops_round_trip_through_the_data_stack() {
    let instructions = vec![
        Instruction { opcode: Opcode::DefVar, args: vec![arg(gf("x"))] },
        Instruction { opcode: Opcode::PushS, args: vec![arg(lit_int(9))] },
        Instruction { opcode: Opcode::PopS, args: vec![arg(gf("x"))] },
        Instruction { opcode: Opcode::Write, args: vec![arg(gf("x"))] },
    ];
    let (result, out) = run_program(instructions, "");
    assert_eq!(result, Ok(0));
    assert_eq!(out, "9");
}
