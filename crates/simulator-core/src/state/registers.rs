//! General-purpose register identifiers and the condition code.

/// Architecturally visible general-purpose register identifier.
///
/// R15 is the stack pointer by convention; the engine addresses it through
/// [`Register::SP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}

impl Register {
    /// Ordered list of all registers.
    pub const ALL: [Self; 16] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
        Self::R14,
        Self::R15,
    ];

    /// The stack pointer register.
    pub const SP: Self = Self::R15;

    /// Returns the register file index (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a 4-bit instruction field to its register.
    ///
    /// The field is masked to four bits first, so every value decodes.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }
}

/// Condition code summarizing the sign of the last result-producing
/// operation. Undefined until the first such operation after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ConditionCode {
    /// No result-producing operation has executed yet.
    #[default]
    Undefined,
    /// Last result was zero.
    Zero,
    /// Last result was negative (signed interpretation).
    Negative,
    /// Last result was positive (signed interpretation).
    Positive,
}

impl ConditionCode {
    /// Classifies a signed result.
    #[must_use]
    pub const fn from_result(value: i32) -> Self {
        if value < 0 {
            Self::Negative
        } else if value > 0 {
            Self::Positive
        } else {
            Self::Zero
        }
    }

    /// One-letter tag used by machine state listings (`U`/`Z`/`N`/`P`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Undefined => 'U',
            Self::Zero => 'Z',
            Self::Negative => 'N',
            Self::Positive => 'P',
        }
    }
}
