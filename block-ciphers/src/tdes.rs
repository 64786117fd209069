//! Triple DES in the EDE (encrypt-decrypt-encrypt) construction
//!
//! Composes three [`Des`] cores. With all three keys equal the construction
//! degenerates to single DES, which the tests use as a consistency check.

use crate::cipher::BlockCipher;
use crate::des::{Des, DES_BLOCK_SIZE, DES_KEY_SIZE};
use crate::error::{ConfigurationError, Result};

/// Accepted 3DES key lengths in bytes.
pub const TDES_KEY_SIZES: [usize; 2] = [16, 24];

/// A 3DES cipher holding the three expanded DES cores.
#[derive(Clone)]
pub struct TripleDes {
    first: Des,
    second: Des,
    third: Des,
}

impl TripleDes {
    /// Splits the key into the EDE triple and expands each part.
    ///
    /// A 16-byte key selects the two-key variant (K1, K2, K1); a 24-byte
    /// key supplies all three.
    pub fn new(key: &[u8]) -> Result<Self> {
        if !TDES_KEY_SIZES.contains(&key.len()) {
            return Err(ConfigurationError::InvalidKeyLength {
                algorithm: "3DES",
                length: key.len(),
            }
            .into());
        }

        let first = Des::new(&key[..DES_KEY_SIZE])?;
        let second = Des::new(&key[DES_KEY_SIZE..2 * DES_KEY_SIZE])?;
        let third = if key.len() == 3 * DES_KEY_SIZE {
            Des::new(&key[2 * DES_KEY_SIZE..])?
        } else {
            first.clone()
        };

        Ok(TripleDes {
            first,
            second,
            third,
        })
    }
}

impl BlockCipher for TripleDes {
    fn block_size(&self) -> usize {
        DES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        self.third
            .encrypt_block(&self.second.decrypt_block(&self.first.encrypt_block(block)))
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        self.first
            .decrypt_block(&self.second.encrypt_block(&self.third.decrypt_block(block)))
    }
}
