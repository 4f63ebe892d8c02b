//! Instruction decoder for the SRM-32 ISA.
//!
//! Decoding is total and pure: every 32-bit pattern produces an
//! [`Instruction`] value. An opcode outside the defined set decodes to
//! [`Instruction::Unknown`] and faults at dispatch, and a condition
//! selector outside the defined set is carried as `None` and faults at
//! execute time. The decoder itself never raises anything.

use crate::encoding::{
    self, Condition, ControlOp, DataOp, NiladicOp, Opcode, OpcodeClass,
};
use crate::state::Register;

/// A decoded operand, with the addressing-mode priority already applied.
///
/// Construction enforces the mutual-exclusion rule: a word with the
/// immediate flag set decodes to [`Operand::Immediate`] no matter what the
/// indexed flag says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The value is embedded in the instruction word (signed 20-bit).
    Immediate(i32),
    /// The data address is given verbatim (unsigned 20-bit).
    Absolute(u32),
    /// The data address is a register value plus a signed offset.
    Indexed {
        /// Register supplying the base address.
        base: Register,
        /// Signed 16-bit displacement.
        offset: i32,
    },
}

impl Operand {
    /// True iff the operand is an embedded immediate value.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// True iff the operand is register-plus-offset addressed.
    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}

/// A decoded instruction, tagged by opcode category.
///
/// The regcond bit positions mean different things for different opcodes;
/// decoding resolves that overlap once, so each variant carries only the
/// fields its handlers actually read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `NOP`, `RET`, `HALT`, and the `ILLOP` sentinel.
    Niladic {
        /// The niladic operation.
        op: NiladicOp,
    },
    /// Data transfer, arithmetic, and stack movement.
    Data {
        /// The data operation.
        op: DataOp,
        /// Destination or source register from the regcond field.
        reg: Register,
        /// Source value or target address.
        operand: Operand,
    },
    /// Conditional transfer of control.
    Control {
        /// `BRANCH` or `CALL`.
        op: ControlOp,
        /// Condition from the regcond field; `None` for selector values
        /// outside the defined table (fatal at execute).
        cond: Option<Condition>,
        /// Transfer target.
        target: Operand,
    },
    /// Opcode value outside the defined set (fatal at dispatch).
    Unknown {
        /// The raw 6-bit opcode field.
        opcode: u8,
        /// The complete instruction word, kept for listings.
        word: u32,
    },
}

/// Decodes a 32-bit instruction word.
#[must_use]
pub fn decode(word: u32) -> Instruction {
    let Some(op) = Opcode::from_bits(encoding::opcode_bits(word)) else {
        return Instruction::Unknown {
            opcode: encoding::opcode_bits(word),
            word,
        };
    };

    match op.class() {
        OpcodeClass::Niladic(op) => Instruction::Niladic { op },
        OpcodeClass::Data(op) => Instruction::Data {
            op,
            reg: Register::from_u4(encoding::regcond_bits(word)),
            operand: decode_operand(word),
        },
        OpcodeClass::Control(op) => Instruction::Control {
            op,
            cond: Condition::from_bits(encoding::regcond_bits(word)),
            target: decode_operand(word),
        },
    }
}

fn decode_operand(word: u32) -> Operand {
    if encoding::is_immediate(word) {
        Operand::Immediate(encoding::immediate_value(word))
    } else if encoding::is_indexed(word) {
        Operand::Indexed {
            base: Register::from_u4(encoding::rindex_bits(word)),
            offset: encoding::indexed_offset(word),
        }
    } else {
        Operand::Absolute(encoding::absolute_address(word))
    }
}
