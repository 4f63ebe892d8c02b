//! Binary program-image codec.
//!
//! The on-disk layout is three little-endian `u32` header words
//! (`textsize`, `datasize`, `dataend`) followed by `textsize` instruction
//! words and `dataend` initial data words. `datasize` is the full
//! addressable data segment including the stack region; only the first
//! `dataend` words are meaningful in the image, and the loader zero-fills
//! the rest. Dumps written by [`encode_image`] reload through
//! [`parse_image`] unchanged.

#![allow(clippy::cast_possible_truncation)]

use simulator_core::{Machine, Program, ProgramError};
use thiserror::Error;

const HEADER_WORDS: usize = 3;

/// Errors raised while parsing a binary program image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Fewer than the three `u32` header words were present.
    #[error("image header is truncated ({len} bytes, need {need})")]
    TruncatedHeader {
        /// Bytes actually available.
        len: usize,
        /// Bytes the header requires.
        need: usize,
    },
    /// The text segment ended before `textsize` words were read.
    #[error("text segment is truncated")]
    TruncatedText,
    /// The data section ended before `dataend` words were read.
    #[error("data section is truncated")]
    TruncatedData,
    /// The header promises more meaningful data than the segment holds.
    #[error("image declares dataend {dataend} beyond datasize {datasize}")]
    DataEndOutOfRange {
        /// Declared first free data address.
        dataend: u32,
        /// Declared data segment size.
        datasize: u32,
    },
    /// The header was consistent but the core rejected the segments.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

fn word_at(bytes: &[u8], index: usize) -> Option<u32> {
    let start = index.checked_mul(4)?;
    let end = start.checked_add(4)?;
    let chunk: [u8; 4] = bytes.get(start..end)?.try_into().ok()?;
    Some(u32::from_le_bytes(chunk))
}

/// Parses a binary program image into a loadable [`Program`].
///
/// # Errors
///
/// Any [`ImageError`]: truncation, an inconsistent header, or segment
/// sizes the core cannot address.
pub fn parse_image(bytes: &[u8]) -> Result<Program, ImageError> {
    let header = |index| {
        word_at(bytes, index).ok_or(ImageError::TruncatedHeader {
            len: bytes.len(),
            need: HEADER_WORDS * 4,
        })
    };
    let textsize = header(0)?;
    let datasize = header(1)?;
    let dataend = header(2)?;

    if dataend > datasize {
        return Err(ImageError::DataEndOutOfRange { dataend, datasize });
    }

    let text = (0..textsize as usize)
        .map(|i| word_at(bytes, HEADER_WORDS + i))
        .collect::<Option<Vec<u32>>>()
        .ok_or(ImageError::TruncatedText)?;

    let data_base = HEADER_WORDS + textsize as usize;
    let mut data = (0..dataend as usize)
        .map(|i| word_at(bytes, data_base + i))
        .collect::<Option<Vec<u32>>>()
        .ok_or(ImageError::TruncatedData)?;
    data.resize(datasize as usize, 0);

    Ok(Program::new(text, data, dataend)?)
}

/// Serializes the machine's current memory into a loader-compatible image.
///
/// The dump keeps the program's `dataend` static region; stack contents
/// above it are transient and are not written.
#[must_use]
pub fn encode_image(machine: &Machine) -> Vec<u8> {
    let text = machine.text_words();
    let dataend = machine.dataend() as usize;
    let mut bytes = Vec::with_capacity((HEADER_WORDS + text.len() + dataend) * 4);

    for header in [machine.textsize(), machine.datasize(), machine.dataend()] {
        bytes.extend_from_slice(&header.to_le_bytes());
    }
    for word in text {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    for word in &machine.data_words()[..dataend] {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}
