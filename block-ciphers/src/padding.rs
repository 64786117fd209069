//! Byte padding schemes for aligning data to a cipher block size
//!
//! Implements PKCS#7, ANSI X.923 and ISO/IEC 7816-4 padding. `pad` always
//! appends at least one byte: input that is already block-aligned gains a
//! full block of padding, which is what lets `unpad` strip unambiguously.
//!
//! Padding is an independent step around the cipher context, not part of
//! the modes: encrypt/decrypt only ever see block-aligned data.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigurationError, DataIntegrityError, Result};

/// The three supported padding styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingStyle {
    /// Every padding byte equals the padding length (PKCS#7).
    Pkcs7,
    /// Zero fill with the padding length in the final byte (ANSI X.923).
    X923,
    /// A 0x80 marker followed by zero fill (ISO/IEC 7816-4).
    Iso7816,
}

impl PaddingStyle {
    fn name(self) -> &'static str {
        match self {
            PaddingStyle::Pkcs7 => "pkcs7",
            PaddingStyle::X923 => "x923",
            PaddingStyle::Iso7816 => "iso7816",
        }
    }
}

impl fmt::Display for PaddingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingStyle {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pkcs7" => Ok(PaddingStyle::Pkcs7),
            "x923" => Ok(PaddingStyle::X923),
            "iso7816" => Ok(PaddingStyle::Iso7816),
            other => Err(ConfigurationError::UnknownPaddingStyle(other.to_string())),
        }
    }
}

fn check_block_size(block_size: usize) -> Result<()> {
    if block_size == 0 || block_size > 255 {
        return Err(ConfigurationError::InvalidBlockSize(block_size).into());
    }
    Ok(())
}

/// Pads `data` to a multiple of `block_size` in the given style.
///
/// The padding length is `block_size - data.len() % block_size`, which is
/// never zero: already-aligned input gains a full block.
pub fn pad(data: &[u8], block_size: usize, style: PaddingStyle) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    let padding_len = block_size - data.len() % block_size;
    let mut padded = Vec::with_capacity(data.len() + padding_len);
    padded.extend_from_slice(data);

    match style {
        PaddingStyle::Pkcs7 => {
            padded.resize(padded.len() + padding_len, padding_len as u8);
        }
        PaddingStyle::X923 => {
            padded.resize(padded.len() + padding_len - 1, 0);
            padded.push(padding_len as u8);
        }
        PaddingStyle::Iso7816 => {
            padded.push(0x80);
            padded.resize(padded.len() + padding_len - 1, 0);
        }
    }

    Ok(padded)
}

/// Verifies and strips the padding from `padded`.
///
/// The whole padding region is validated before anything is returned; a
/// failed check yields a [`DataIntegrityError`] and no plaintext prefix.
pub fn unpad(padded: &[u8], block_size: usize, style: PaddingStyle) -> Result<Vec<u8>> {
    check_block_size(block_size)?;
    if padded.is_empty() {
        return Err(ConfigurationError::EmptyInput.into());
    }
    if padded.len() % block_size != 0 {
        return Err(ConfigurationError::UnalignedData {
            length: padded.len(),
            block_size,
        }
        .into());
    }

    let padding_len = match style {
        PaddingStyle::Pkcs7 | PaddingStyle::X923 => {
            let len_byte = padded[padded.len() - 1];
            if len_byte == 0 || usize::from(len_byte) > block_size {
                return Err(DataIntegrityError::PaddingLengthOutOfRange {
                    length: len_byte,
                    block_size,
                }
                .into());
            }
            let padding_len = usize::from(len_byte);

            // Everything before the length byte must match the fill pattern.
            let fill = &padded[padded.len() - padding_len..padded.len() - 1];
            let fill_ok = match style {
                PaddingStyle::Pkcs7 => fill.iter().all(|&b| b == len_byte),
                _ => fill.iter().all(|&b| b == 0),
            };
            if !fill_ok {
                return Err(DataIntegrityError::PaddingMismatch {
                    style: style.name(),
                }
                .into());
            }
            padding_len
        }
        PaddingStyle::Iso7816 => {
            // The marker can only live in the final block.
            let final_block = &padded[padded.len() - block_size..];
            let marker = final_block
                .iter()
                .rposition(|&b| b == 0x80)
                .ok_or(DataIntegrityError::MissingPaddingMarker)?;
            if final_block[marker + 1..].iter().any(|&b| b != 0) {
                return Err(DataIntegrityError::PaddingMismatch {
                    style: style.name(),
                }
                .into());
            }
            block_size - marker
        }
    };

    Ok(padded[..padded.len() - padding_len].to_vec())
}
