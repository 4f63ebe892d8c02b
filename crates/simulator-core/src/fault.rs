//! Fault taxonomy for the SRM-32 simulator.
//!
//! Every fault is fatal: the resolver and engine return them as errors,
//! the driver stops the run, and the process boundary decides how to
//! report them. Nothing in the core recovers from or swallows a fault.

use thiserror::Error;

/// The kinds of fatal fault a simulated program can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultKind {
    /// The explicit `ILLOP` sentinel opcode was executed.
    #[error("illegal instruction")]
    IllegalInstruction,
    /// The opcode field held a value outside the defined set.
    #[error("unknown instruction")]
    UnknownInstruction,
    /// A `BRANCH`/`CALL` condition selector outside the defined table.
    #[error("illegal condition")]
    InvalidCondition,
    /// Immediate addressing used where an address is required.
    #[error("immediate value forbidden")]
    ImmediateForbidden,
    /// Instruction fetch past the end of the text segment.
    #[error("segmentation fault in text")]
    TextSegmentation,
    /// Data access at or past the end of the data segment.
    #[error("segmentation fault in data")]
    DataSegmentation,
    /// Stack pointer left the stack region of the data segment.
    #[error("segmentation fault in stack")]
    StackSegmentation,
}

/// A fatal fault together with the address of the faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[error("{kind} at address {addr:#06x}")]
pub struct Fault {
    /// What went wrong.
    pub kind: FaultKind,
    /// Text-segment address of the instruction that faulted.
    pub addr: u32,
}

impl Fault {
    /// Creates a fault raised by the instruction at `addr`.
    #[must_use]
    pub const fn new(kind: FaultKind, addr: u32) -> Self {
        Self { kind, addr }
    }
}
