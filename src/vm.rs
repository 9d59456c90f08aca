//! # Dispatch Loop
//!
//! Holds the program counter, the data stack, and the call stack;
//! implements every opcode by delegating to the `ops_*` families below.
//!
//! ## High-level model
//! - **Data stack (`data_stack`)**: operands for the `…S` family.
//! - **Call stack (`call_stack`)**: return addresses for `CALL`/`RETURN`.
//! - **Frames (`frames`)**: GF/TF/LF variable storage (see [`crate::frame`]).
//! - **Program counter (`pc`)**: 0-based index into `program.instructions`;
//!   described as 1-based externally (`BREAK`, `--hot`) for readability.
//! - **Advance flag (`advance_pc`)**: control-flow ops clear it themselves.
//!
//! The loop is deterministic and fails fast: any opcode error ends the
//! run immediately with that error, there is no handler/unwind machinery
//! (this language has no exception construct). `EXIT` is the only
//! in-band way to stop with a specific non-zero status; everything else
//! either runs off the end of the program (status 0) or raises an
//! [`EngineError`], whose [`EngineError::exit_code`] becomes the status.

use crate::error::EngineError;
use crate::frame::Frames;
use crate::io::EngineIo;
use crate::program::{ArgKind, Opcode, Program};
use crate::resolve;
use crate::stats::Stats;
use crate::value::Value;

mod ops_arith;
mod ops_frame;
mod ops_io;
mod ops_stack;
mod ops_string;
mod ops_var;

/// Pop a single [`Value`] from the data stack, mapping underflow to
/// *missing-value* (exit 56) rather than a VM-internal panic.
fn pop(stack: &mut Vec<Value>) -> Result<Value, EngineError> {
    stack
        .pop()
        .ok_or_else(|| EngineError::MissingValue("data stack is empty".to_string()))
}

/// Execute `program` to completion.
///
/// Returns the process exit status on a clean termination — `0` for
/// running off the end of the instruction stream, or the operand of an
/// `EXIT` that fired. Any [`EngineError`] aborts the run immediately;
/// the caller maps it to its exit code.
pub fn run(
    program: &Program,
    frames: &mut Frames,
    io: &mut EngineIo<'_>,
    stats: &mut Stats,
) -> Result<i64, EngineError> {
    let mut data_stack: Vec<Value> = Vec::new();
    let mut call_stack: Vec<usize> = Vec::new();
    let mut pc: usize = 0;

    while pc < program.instructions.len() {
        let instr = &program.instructions[pc];
        stats.record_instruction(pc, instr.opcode);

        let mut advance_pc = true;

        match instr.opcode {
            Opcode::CreateFrame => ops_frame::handle_create_frame(frames),
            Opcode::PushFrame => ops_frame::handle_push_frame(frames)?,
            Opcode::PopFrame => ops_frame::handle_pop_frame(frames)?,
            Opcode::Return => {
                ops_frame::handle_return(&mut call_stack, &mut pc, &mut advance_pc)?
            }
            Opcode::Call => {
                let target = resolve::label(&instr.args[0], program)?;
                ops_frame::handle_call(target, &mut call_stack, &mut pc, &mut advance_pc);
            }
            Opcode::Jump => {
                let target = resolve::label(&instr.args[0], program)?;
                ops_frame::handle_jump(target, &mut pc, &mut advance_pc);
            }
            Opcode::JumpIfEq | Opcode::JumpIfNeq => {
                let target = resolve::label(&instr.args[0], program)?;
                let a = resolve::value(&instr.args[1], frames)?;
                let b = resolve::value(&instr.args[2], frames)?;
                let negate = instr.opcode == Opcode::JumpIfNeq;
                ops_frame::handle_conditional_jump(negate, target, a, b, &mut pc, &mut advance_pc)?;
            }
            Opcode::JumpIfEqS | Opcode::JumpIfNeqS => {
                let target = resolve::label(&instr.args[0], program)?;
                let eq = ops_stack::pop_eq_pair(&mut data_stack)?;
                let negate = instr.opcode == Opcode::JumpIfNeqS;
                if eq != negate {
                    pc = target;
                    advance_pc = false;
                }
            }
            Opcode::Label => {}
            Opcode::Break => {
                let summary = frames.debug_summary();
                ops_frame::handle_break(&summary, pc, data_stack.len(), call_stack.len(), io);
            }
            Opcode::Exit => {
                let n = resolve::value(&instr.args[0], frames)?;
                let status = ops_frame::handle_exit(n)?;
                return Ok(status);
            }

            Opcode::DefVar => {
                let var = resolve::dest(&instr.args[0])?.clone();
                ops_var::handle_defvar(&var, frames)?;
                stats.observe_var_count(frames.variable_count());
            }
            Opcode::Move => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let src = resolve::value(&instr.args[1], frames)?;
                ops_var::handle_move(&dst, src, frames)?;
            }
            Opcode::Type => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let result = ops_var::handle_type(&instr.args[1], frames)?;
                ops_var::handle_move(&dst, result, frames)?;
            }

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::IDiv | Opcode::Lt | Opcode::Gt
            | Opcode::Eq | Opcode::And | Opcode::Or | Opcode::Concat | Opcode::GetChar
            | Opcode::Stri2Int => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let result = dispatch_ternary(instr.opcode, &instr.args, frames)?;
                ops_var::handle_move(&dst, result, frames)?;
            }
            Opcode::SetChar => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let current = match frames.read(&dst)? {
                    Value::Str(s) => s,
                    other => {
                        return Err(EngineError::Type(format!(
                            "SETCHAR destination must currently be a string, found {}",
                            other.tag()
                        )))
                    }
                };
                let i = resolve::value(&instr.args[1], frames)?;
                let ch = resolve::value(&instr.args[2], frames)?;
                let result = ops_string::handle_setchar(&current, i, ch)?;
                ops_var::handle_move(&dst, result, frames)?;
            }
            Opcode::Not | Opcode::Int2Char | Opcode::StrLen => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let a = resolve::value(&instr.args[1], frames)?;
                let result = match instr.opcode {
                    Opcode::Not => ops_arith::handle_not(a)?,
                    Opcode::Int2Char => ops_string::handle_int2char(a)?,
                    Opcode::StrLen => ops_string::handle_strlen(a)?,
                    _ => unreachable!(),
                };
                ops_var::handle_move(&dst, result, frames)?;
            }

            Opcode::Read => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let tag = resolve::type_tag(&instr.args[1])?;
                let result = ops_io::handle_read(tag, io);
                ops_var::handle_move(&dst, result, frames)?;
            }
            Opcode::Write => {
                let v = resolve::value(&instr.args[0], frames)?;
                ops_io::handle_write(&v, io);
            }
            Opcode::DPrint => {
                let v = resolve::value(&instr.args[0], frames)?;
                ops_io::handle_dprint(&v, io);
            }

            Opcode::PushS => {
                let v = resolve::value(&instr.args[0], frames)?;
                ops_stack::handle_pushs(v, &mut data_stack);
            }
            Opcode::PopS => {
                let dst = resolve::dest(&instr.args[0])?.clone();
                let v = ops_stack::handle_pops(&mut data_stack)?;
                ops_var::handle_move(&dst, v, frames)?;
            }
            Opcode::ClearS => ops_stack::handle_clears(&mut data_stack),
            Opcode::AddS => ops_stack::handle_adds(&mut data_stack)?,
            Opcode::SubS => ops_stack::handle_subs(&mut data_stack)?,
            Opcode::MulS => ops_stack::handle_muls(&mut data_stack)?,
            Opcode::IDivS => ops_stack::handle_idivs(&mut data_stack)?,
            Opcode::LtS => ops_stack::handle_lts(&mut data_stack)?,
            Opcode::GtS => ops_stack::handle_gts(&mut data_stack)?,
            Opcode::EqS => ops_stack::handle_eqs(&mut data_stack)?,
            Opcode::AndS => ops_stack::handle_ands(&mut data_stack)?,
            Opcode::OrS => ops_stack::handle_ors(&mut data_stack)?,
            Opcode::NotS => ops_stack::handle_nots(&mut data_stack)?,
            Opcode::Int2CharS => ops_stack::handle_int2chars(&mut data_stack)?,
            Opcode::Stri2IntS => ops_stack::handle_stri2ints(&mut data_stack)?,
        }

        if advance_pc {
            pc += 1;
        }
    }

    Ok(0)
}

/// The handful of `dst symb symb`-shaped opcodes whose pure logic lives
/// in `ops_arith`/`ops_string`; factored out so `run`'s match stays
/// readable.
fn dispatch_ternary(
    opcode: Opcode,
    args: &[crate::program::Arg],
    frames: &Frames,
) -> Result<Value, EngineError> {
    let a = resolve::value(&args[1], frames)?;
    let b = resolve::value(&args[2], frames)?;
    match opcode {
        Opcode::Add => ops_arith::handle_add(a, b),
        Opcode::Sub => ops_arith::handle_sub(a, b),
        Opcode::Mul => ops_arith::handle_mul(a, b),
        Opcode::IDiv => ops_arith::handle_idiv(a, b),
        Opcode::Lt => ops_arith::handle_lt(a, b),
        Opcode::Gt => ops_arith::handle_gt(a, b),
        Opcode::Eq => ops_arith::handle_eq(a, b),
        Opcode::And => ops_arith::handle_and(a, b),
        Opcode::Or => ops_arith::handle_or(a, b),
        Opcode::Concat => ops_string::handle_concat(a, b),
        Opcode::Stri2Int => ops_string::handle_stri2int(a, b),
        Opcode::GetChar => ops_string::handle_getchar(a, b),
        _ => unreachable!("dispatch_ternary only called for its own opcode set"),
    }
}

#[cfg(test)]
mod tests;
