//! Symbolic instruction formatting.
//!
//! Produces one assembler-style line per instruction word, e.g.
//! `LOAD R02, #5`, `BRANCH EQ, @0004`, `STORE R03, +2[R05]`. The core uses
//! this only for tracing and listings, never for decisions.

use crate::decoder::{decode, Instruction, Operand};
use crate::encoding::Condition;
use crate::state::Register;

/// Decodes and formats a raw instruction word.
#[must_use]
pub fn disassemble(word: u32) -> String {
    format_instruction(&decode(word))
}

/// Formats a decoded instruction.
///
/// Unknown opcodes render as a `.word` directive; an invalid condition
/// selector renders as `??`.
#[must_use]
pub fn format_instruction(instr: &Instruction) -> String {
    match *instr {
        Instruction::Niladic { op } => op.opcode().mnemonic().to_owned(),
        Instruction::Data {
            op,
            reg,
            ref operand,
        } => format!(
            "{} {}, {}",
            op.opcode().mnemonic(),
            format_register(reg),
            format_operand(operand)
        ),
        Instruction::Control {
            op,
            cond,
            ref target,
        } => format!(
            "{} {}, {}",
            op.opcode().mnemonic(),
            cond.map_or("??", Condition::name),
            format_operand(target)
        ),
        Instruction::Unknown { word, .. } => format!(".word {word:#010x}"),
    }
}

fn format_register(reg: Register) -> String {
    format!("R{:02}", reg.index())
}

fn format_operand(operand: &Operand) -> String {
    match *operand {
        Operand::Immediate(value) => format!("#{value}"),
        Operand::Absolute(address) => format!("@{address:04x}"),
        Operand::Indexed { base, offset } => format!("{offset:+}[{}]", format_register(base)),
    }
}
