//! Modes of operation over any block cipher
//!
//! ECB treats every block independently; CBC chains blocks through a
//! caller-owned state. Both require block-aligned input: padding is a
//! separate step around the cipher, never applied here.

pub mod cbc;
pub mod ecb;

use crate::error::{ConfigurationError, Result};

/// Carrier struct for the mode-of-operation functions.
pub struct CipherModes;

fn require_aligned(length: usize, block_size: usize) -> Result<()> {
    if length % block_size != 0 {
        return Err(ConfigurationError::UnalignedData { length, block_size }.into());
    }
    Ok(())
}
