//! Core simulator crate for the SRM-32 register machine.
//!
//! The crate models a small 32-bit processor: 16 general-purpose registers
//! (R15 doubles as the stack pointer), a read-only text segment of 32-bit
//! instruction words, and a flat data segment split into a static region and
//! a downward-growing stack. The fetch/decode/execute loop runs until a
//! `HALT` or a fatal fault; faults are ordinary [`Result`] errors that
//! propagate to the driver, never hidden control flow.

/// Bit-level instruction word layout, opcode and condition tables.
pub mod encoding;
pub use encoding::{
    encode_absolute, encode_immediate, encode_indexed, encode_niladic, Condition, ControlOp,
    DataOp, NiladicOp, Opcode, OpcodeClass,
};

/// Instruction decode into the category-tagged instruction model.
pub mod decoder;
pub use decoder::{decode, Instruction, Operand};

/// Fault taxonomy shared by the resolver, engine, and driver.
pub mod fault;
pub use fault::{Fault, FaultKind};

/// Machine state: registers, condition code, segments, load semantics.
pub mod state;
pub use state::{
    ConditionCode, Machine, Program, ProgramError, Register, RunState, Word, NREGISTERS,
};

/// Instruction execution engine and addressing resolver.
pub mod execute;
pub use execute::{
    check_data_bounds, check_stack_bounds, data_address, effective_address, execute, jump_target,
    operand_value, require_not_immediate, StepOutcome,
};

/// Fetch/execute simulation driver and its collaborator traits.
pub mod driver;
pub use driver::{step, Driver, RunOutcome, StepDebugger, TraceSink};

/// Symbolic instruction formatting for tracing and program listings.
pub mod disasm;
pub use disasm::{disassemble, format_instruction};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
