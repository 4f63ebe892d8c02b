//! Addressing resolver: effective addresses, operand values, and the
//! bounds rules that turn bad accesses into faults.

use crate::decoder::Operand;
use crate::fault::{Fault, FaultKind};
use crate::state::{Machine, Word};

/// Computes the effective data address of a non-immediate operand.
///
/// Indexed operands resolve to the base register plus the signed offset
/// with unsigned 32-bit wraparound (defined, not a fault); absolute
/// operands resolve to their address field verbatim. An immediate operand
/// has no address and yields `None`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn effective_address(machine: &Machine, operand: &Operand) -> Option<u32> {
    match *operand {
        Operand::Immediate(_) => None,
        Operand::Absolute(address) => Some(address),
        Operand::Indexed { base, offset } => {
            Some(machine.reg(base).wrapping_add(offset as u32))
        }
    }
}

/// Faults when an operand is immediate-addressed.
///
/// Used by every opcode for which an embedded value is meaningless:
/// `STORE`, `BRANCH`, `CALL`, and `POP`.
///
/// # Errors
///
/// [`FaultKind::ImmediateForbidden`] at `addr`.
pub const fn require_not_immediate(operand: &Operand, addr: u32) -> Result<(), Fault> {
    if operand.is_immediate() {
        Err(Fault::new(FaultKind::ImmediateForbidden, addr))
    } else {
        Ok(())
    }
}

/// Faults when a resolved data address lies at or past the end of the data
/// segment.
///
/// # Errors
///
/// [`FaultKind::DataSegmentation`] at `addr`.
pub fn check_data_bounds(machine: &Machine, address: u32, addr: u32) -> Result<(), Fault> {
    if address >= machine.datasize() {
        return Err(Fault::new(FaultKind::DataSegmentation, addr));
    }
    Ok(())
}

/// Faults unless the stack pointer lies inside the stack region.
///
/// Called after every stack-pointer mutation, never before: stack
/// operations adjust the pointer first and validate second.
///
/// # Errors
///
/// [`FaultKind::StackSegmentation`] at `addr`.
pub fn check_stack_bounds(machine: &Machine, addr: u32) -> Result<(), Fault> {
    if machine.stack_in_bounds() {
        Ok(())
    } else {
        Err(Fault::new(FaultKind::StackSegmentation, addr))
    }
}

/// Resolves an operand to a bounds-checked data address for a write.
///
/// # Errors
///
/// [`FaultKind::ImmediateForbidden`] for immediate operands,
/// [`FaultKind::DataSegmentation`] for addresses outside the data segment.
pub fn data_address(machine: &Machine, operand: &Operand, addr: u32) -> Result<u32, Fault> {
    require_not_immediate(operand, addr)?;
    match effective_address(machine, operand) {
        Some(ea) => {
            check_data_bounds(machine, ea, addr)?;
            Ok(ea)
        }
        None => Err(Fault::new(FaultKind::ImmediateForbidden, addr)),
    }
}

/// Resolves a control-transfer target to a text address.
///
/// Targets are text addresses, so no data-segment bounds apply; an
/// out-of-range target faults at the next fetch instead.
///
/// # Errors
///
/// [`FaultKind::ImmediateForbidden`] for immediate operands.
pub fn jump_target(machine: &Machine, operand: &Operand, addr: u32) -> Result<u32, Fault> {
    require_not_immediate(operand, addr)?;
    effective_address(machine, operand)
        .ok_or_else(|| Fault::new(FaultKind::ImmediateForbidden, addr))
}

/// Resolves an operand to the value it supplies: the embedded immediate,
/// or a bounds-checked read from the data segment.
///
/// # Errors
///
/// [`FaultKind::DataSegmentation`] when the resolved address is outside the
/// data segment.
#[allow(clippy::cast_sign_loss)]
pub fn operand_value(machine: &Machine, operand: &Operand, addr: u32) -> Result<Word, Fault> {
    match *operand {
        Operand::Immediate(value) => Ok(value as Word),
        Operand::Absolute(address) => read_data(machine, address, addr),
        Operand::Indexed { base, offset } => {
            read_data(machine, machine.reg(base).wrapping_add(offset as u32), addr)
        }
    }
}

fn read_data(machine: &Machine, address: u32, addr: u32) -> Result<Word, Fault> {
    machine
        .data_word(address)
        .ok_or_else(|| Fault::new(FaultKind::DataSegmentation, addr))
}
