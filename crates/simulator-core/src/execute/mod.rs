//! Instruction execution engine for the SRM-32 ISA.
//!
//! One handler per opcode. Handlers resolve their operands through the
//! addressing resolver, fault before mutating anything, and update the
//! condition code after every result-producing operation. Stack handlers
//! adjust the stack pointer first and validate it second.

mod helpers;

pub use helpers::{
    check_data_bounds, check_stack_bounds, data_address, effective_address, jump_target,
    operand_value, require_not_immediate,
};

use crate::decoder::{Instruction, Operand};
use crate::encoding::{Condition, ControlOp, DataOp, NiladicOp};
use crate::fault::{Fault, FaultKind};
use crate::state::{Machine, Register, Word};

/// What the driver should do after one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Keep fetching.
    Continue,
    /// `HALT` was reached; stop the run cleanly.
    Halted,
}

/// Executes one decoded instruction against the machine.
///
/// `addr` is the text address of the instruction itself; the program
/// counter has already advanced past it, so `CALL` pushes the updated `pc`
/// and faults report `addr`.
///
/// # Errors
///
/// Any fatal [`Fault`]; the machine is unmodified by the faulting
/// instruction except for stack-pointer adjustments that were validated
/// and rejected.
pub fn execute(machine: &mut Machine, instr: &Instruction, addr: u32) -> Result<StepOutcome, Fault> {
    match *instr {
        Instruction::Niladic { op } => match op {
            NiladicOp::Nop => Ok(StepOutcome::Continue),
            NiladicOp::Halt => Ok(StepOutcome::Halted),
            NiladicOp::Ret => exec_ret(machine, addr),
            NiladicOp::Illop => Err(Fault::new(FaultKind::IllegalInstruction, addr)),
        },
        Instruction::Data {
            op,
            reg,
            ref operand,
        } => match op {
            DataOp::Load => exec_load(machine, reg, operand, addr),
            DataOp::Store => exec_store(machine, reg, operand, addr),
            DataOp::Add => exec_arith(machine, reg, operand, addr, ArithOp::Add),
            DataOp::Sub => exec_arith(machine, reg, operand, addr, ArithOp::Sub),
            DataOp::Push => exec_push(machine, operand, addr),
            DataOp::Pop => exec_pop(machine, operand, addr),
        },
        Instruction::Control {
            op,
            cond,
            ref target,
        } => exec_transfer(machine, op, cond, target, addr),
        Instruction::Unknown { .. } => Err(Fault::new(FaultKind::UnknownInstruction, addr)),
    }
}

enum ArithOp {
    Add,
    Sub,
}

fn exec_load(
    machine: &mut Machine,
    reg: Register,
    operand: &Operand,
    addr: u32,
) -> Result<StepOutcome, Fault> {
    let value = operand_value(machine, operand, addr)?;
    machine.set_reg(reg, value);
    machine.set_cc_from(value);
    Ok(StepOutcome::Continue)
}

fn exec_store(
    machine: &mut Machine,
    reg: Register,
    operand: &Operand,
    addr: u32,
) -> Result<StepOutcome, Fault> {
    let ea = data_address(machine, operand, addr)?;
    machine.write_data(ea, machine.reg(reg));
    Ok(StepOutcome::Continue)
}

fn exec_arith(
    machine: &mut Machine,
    reg: Register,
    operand: &Operand,
    addr: u32,
    op: ArithOp,
) -> Result<StepOutcome, Fault> {
    let value = operand_value(machine, operand, addr)?;
    let result = match op {
        ArithOp::Add => machine.reg(reg).wrapping_add(value),
        ArithOp::Sub => machine.reg(reg).wrapping_sub(value),
    };
    machine.set_reg(reg, result);
    machine.set_cc_from(result);
    Ok(StepOutcome::Continue)
}

fn exec_transfer(
    machine: &mut Machine,
    op: ControlOp,
    cond: Option<Condition>,
    target: &Operand,
    addr: u32,
) -> Result<StepOutcome, Fault> {
    let target_addr = jump_target(machine, target, addr)?;
    let cond = cond.ok_or_else(|| Fault::new(FaultKind::InvalidCondition, addr))?;
    if !cond.holds(machine.cc()) {
        return Ok(StepOutcome::Continue);
    }
    if matches!(op, ControlOp::Call) {
        push_word(machine, machine.pc(), addr)?;
    }
    machine.set_pc(target_addr);
    Ok(StepOutcome::Continue)
}

fn exec_ret(machine: &mut Machine, addr: u32) -> Result<StepOutcome, Fault> {
    let return_addr = pop_word(machine, addr)?;
    machine.set_pc(return_addr);
    Ok(StepOutcome::Continue)
}

fn exec_push(machine: &mut Machine, operand: &Operand, addr: u32) -> Result<StepOutcome, Fault> {
    let value = operand_value(machine, operand, addr)?;
    push_word(machine, value, addr)?;
    Ok(StepOutcome::Continue)
}

fn exec_pop(machine: &mut Machine, operand: &Operand, addr: u32) -> Result<StepOutcome, Fault> {
    let ea = data_address(machine, operand, addr)?;
    let value = pop_word(machine, addr)?;
    machine.write_data(ea, value);
    Ok(StepOutcome::Continue)
}

/// Decrement-then-store. The new stack pointer is validated before the
/// store, so a rejected push never writes.
fn push_word(machine: &mut Machine, value: Word, addr: u32) -> Result<(), Fault> {
    machine.set_sp(machine.sp().wrapping_sub(1));
    check_stack_bounds(machine, addr)?;
    machine.write_data(machine.sp(), value);
    Ok(())
}

/// Read-the-top-then-increment. The incremented stack pointer is validated
/// before the popped value is produced.
fn pop_word(machine: &mut Machine, addr: u32) -> Result<Word, Fault> {
    let top = machine.sp();
    machine.set_sp(top.wrapping_add(1));
    check_stack_bounds(machine, addr)?;
    machine
        .data_word(top)
        .ok_or_else(|| Fault::new(FaultKind::StackSegmentation, addr))
}
