//! The simulated machine: registers, condition code, and segments.

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use thiserror::Error;

use crate::state::registers::{ConditionCode, Register};

/// A 32-bit machine word. Addresses and register indices read it unsigned;
/// condition-code classification reads it signed.
pub type Word = u32;

/// Number of general-purpose registers.
pub const NREGISTERS: usize = 16;

/// Errors raised while assembling a [`Program`] from loaded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// `dataend` must split the data segment, not exceed it.
    #[error("dataend {dataend} exceeds data segment size {datasize}")]
    DataEndOutOfRange {
        /// First free address of the static data region.
        dataend: u32,
        /// Full size of the data segment.
        datasize: u32,
    },
    /// A segment larger than the 32-bit address space cannot be addressed.
    #[error("segment of {len} words exceeds the 32-bit address space")]
    SegmentTooLarge {
        /// Offending segment length in words.
        len: usize,
    },
}

/// A loaded program image: the segments a [`Machine`] adopts at load time.
///
/// The program owns its segment storage; loading moves it into the machine,
/// which releases it when the machine is dropped or reloaded. No other
/// component keeps a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    text: Box<[u32]>,
    data: Box<[Word]>,
    dataend: u32,
}

impl Program {
    /// Bundles text and data segments with the static/stack split point.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::DataEndOutOfRange`] when `dataend` lies past
    /// the end of `data`, and [`ProgramError::SegmentTooLarge`] when either
    /// segment cannot be addressed with 32 bits.
    pub fn new(text: Vec<u32>, data: Vec<Word>, dataend: u32) -> Result<Self, ProgramError> {
        let Ok(datasize) = u32::try_from(data.len()) else {
            return Err(ProgramError::SegmentTooLarge { len: data.len() });
        };
        if u32::try_from(text.len()).is_err() {
            return Err(ProgramError::SegmentTooLarge { len: text.len() });
        }
        if dataend > datasize {
            return Err(ProgramError::DataEndOutOfRange { dataend, datasize });
        }
        Ok(Self {
            text: text.into_boxed_slice(),
            data: data.into_boxed_slice(),
            dataend,
        })
    }

    /// The instruction words of the text segment.
    #[must_use]
    pub fn text(&self) -> &[u32] {
        &self.text
    }

    /// The initial contents of the data segment.
    #[must_use]
    pub fn data(&self) -> &[Word] {
        &self.data
    }

    /// First address past the static data region.
    #[must_use]
    pub const fn dataend(&self) -> u32 {
        self.dataend
    }
}

/// The complete architectural state of one simulated SRM-32 processor.
///
/// A machine starts empty and is populated by [`Machine::load`]; reloading
/// replaces the segments and resets every register. Mutators preserve the
/// segment invariants; bounds decisions live in the addressing resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Machine {
    registers: [Word; NREGISTERS],
    pc: u32,
    cc: ConditionCode,
    text: Box<[u32]>,
    data: Box<[Word]>,
    dataend: u32,
}

impl Machine {
    /// Creates an empty machine with no program loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a program and resets the processor state.
    ///
    /// All registers are zeroed except the stack pointer, which starts at
    /// the top of the stack region (`datasize - 1`); `pc` returns to 0 and
    /// the condition code becomes undefined.
    pub fn load(&mut self, program: Program) {
        let Program {
            text,
            data,
            dataend,
        } = program;
        self.text = text;
        self.data = data;
        self.dataend = dataend;
        self.registers = [0; NREGISTERS];
        self.registers[Register::SP.index()] = self.datasize().saturating_sub(1);
        self.pc = 0;
        self.cc = ConditionCode::Undefined;
    }

    /// Reads a general-purpose register.
    #[must_use]
    pub const fn reg(&self, reg: Register) -> Word {
        self.registers[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set_reg(&mut self, reg: Register, value: Word) {
        self.registers[reg.index()] = value;
    }

    /// Reads the stack pointer (R15).
    #[must_use]
    pub const fn sp(&self) -> Word {
        self.reg(Register::SP)
    }

    /// Writes the stack pointer (R15).
    pub const fn set_sp(&mut self, value: Word) {
        self.set_reg(Register::SP, value);
    }

    /// Text-segment index of the next instruction to fetch.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, value: u32) {
        self.pc = value;
    }

    /// Current condition code.
    #[must_use]
    pub const fn cc(&self) -> ConditionCode {
        self.cc
    }

    /// Updates the condition code from a result, interpreted signed.
    pub const fn set_cc_from(&mut self, result: Word) {
        self.cc = ConditionCode::from_result(result as i32);
    }

    /// Size of the text segment in instruction words.
    #[must_use]
    pub fn textsize(&self) -> u32 {
        self.text.len() as u32
    }

    /// Size of the data segment in words, including the stack region.
    #[must_use]
    pub fn datasize(&self) -> u32 {
        self.data.len() as u32
    }

    /// First address past the static data region; the stack may not grow
    /// below it.
    #[must_use]
    pub const fn dataend(&self) -> u32 {
        self.dataend
    }

    /// Fetches the instruction word at a text address, if in range.
    #[must_use]
    pub fn fetch(&self, addr: u32) -> Option<u32> {
        self.text.get(addr as usize).copied()
    }

    /// Reads the data word at an address, if in range.
    #[must_use]
    pub fn data_word(&self, addr: u32) -> Option<Word> {
        self.data.get(addr as usize).copied()
    }

    /// Writes a data word. The caller must have bounds-checked `addr`
    /// against [`Machine::datasize`].
    pub(crate) fn write_data(&mut self, addr: u32, value: Word) {
        self.data[addr as usize] = value;
    }

    /// The raw text segment, for listings and dumps.
    #[must_use]
    pub fn text_words(&self) -> &[u32] {
        &self.text
    }

    /// The current data segment, for listings and dumps.
    #[must_use]
    pub fn data_words(&self) -> &[Word] {
        &self.data
    }

    /// True while the stack pointer lies inside the stack region,
    /// `dataend <= sp < datasize`.
    #[must_use]
    pub fn stack_in_bounds(&self) -> bool {
        let sp = self.sp();
        self.dataend <= sp && sp < self.datasize()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::cast_sign_loss)]

    use super::{Machine, Program, ProgramError, NREGISTERS};
    use crate::state::registers::{ConditionCode, Register};

    fn sample_program() -> Program {
        Program::new(vec![1, 2, 3], vec![10, 20, 0, 0], 2).expect("valid program")
    }

    #[test]
    fn program_rejects_dataend_past_the_segment() {
        let err = Program::new(vec![], vec![0; 4], 5).expect_err("dataend out of range");
        assert_eq!(
            err,
            ProgramError::DataEndOutOfRange {
                dataend: 5,
                datasize: 4
            }
        );
    }

    #[test]
    fn load_installs_segments_and_resets_processor_state() {
        let mut machine = Machine::new();
        machine.set_pc(7);
        machine.set_reg(Register::R3, 99);

        machine.load(sample_program());

        assert_eq!(machine.textsize(), 3);
        assert_eq!(machine.datasize(), 4);
        assert_eq!(machine.dataend(), 2);
        assert_eq!(machine.pc(), 0);
        assert_eq!(machine.cc(), ConditionCode::Undefined);
        for reg in Register::ALL {
            if reg != Register::SP {
                assert_eq!(machine.reg(reg), 0);
            }
        }
    }

    #[test]
    fn load_points_the_stack_pointer_at_the_top_of_the_stack() {
        let mut machine = Machine::new();
        machine.load(sample_program());
        assert_eq!(machine.sp(), 3);
        assert!(machine.stack_in_bounds());
    }

    #[test]
    fn load_with_empty_data_segment_keeps_sp_at_zero() {
        let mut machine = Machine::new();
        machine.load(Program::new(vec![11], vec![], 0).expect("valid program"));
        assert_eq!(machine.sp(), 0);
        assert!(!machine.stack_in_bounds());
    }

    #[test]
    fn reload_replaces_a_previous_program() {
        let mut machine = Machine::new();
        machine.load(sample_program());
        machine.set_reg(Register::R0, 42);

        machine.load(Program::new(vec![9], vec![7], 1).expect("valid program"));

        assert_eq!(machine.textsize(), 1);
        assert_eq!(machine.reg(Register::R0), 0);
        assert_eq!(machine.data_word(0), Some(7));
    }

    #[test]
    fn fetch_and_data_reads_are_bounds_aware() {
        let mut machine = Machine::new();
        machine.load(sample_program());
        assert_eq!(machine.fetch(2), Some(3));
        assert_eq!(machine.fetch(3), None);
        assert_eq!(machine.data_word(1), Some(20));
        assert_eq!(machine.data_word(4), None);
    }

    #[test]
    fn condition_code_tracks_signed_results() {
        let mut machine = Machine::new();
        machine.set_cc_from(0);
        assert_eq!(machine.cc(), ConditionCode::Zero);
        machine.set_cc_from(5);
        assert_eq!(machine.cc(), ConditionCode::Positive);
        machine.set_cc_from((-3i32) as u32);
        assert_eq!(machine.cc(), ConditionCode::Negative);
    }

    #[test]
    fn register_file_has_sixteen_independent_registers() {
        let mut machine = Machine::new();
        for (offset, reg) in (0u32..).zip(Register::ALL) {
            machine.set_reg(reg, 0x100 + offset);
        }
        for (offset, reg) in (0u32..).zip(Register::ALL) {
            assert_eq!(machine.reg(reg), 0x100 + offset);
        }
        assert_eq!(NREGISTERS, 16);
    }
}
