//! ECB (Electronic Code Book) mode implementation

use crate::cipher::BlockCipher;
use crate::error::Result;

use super::{require_aligned, CipherModes};

impl CipherModes {
    /// ECB mode encryption of block-aligned data.
    pub fn ecb_encrypt<C: BlockCipher>(cipher: &C, plaintext: &[u8]) -> Result<Vec<u8>> {
        require_aligned(plaintext.len(), cipher.block_size())?;

        let mut ciphertext = Vec::with_capacity(plaintext.len());
        for chunk in plaintext.chunks(cipher.block_size()) {
            ciphertext.extend(cipher.encrypt_block(chunk));
        }
        Ok(ciphertext)
    }

    /// ECB mode decryption of block-aligned data.
    pub fn ecb_decrypt<C: BlockCipher>(cipher: &C, ciphertext: &[u8]) -> Result<Vec<u8>> {
        require_aligned(ciphertext.len(), cipher.block_size())?;

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks(cipher.block_size()) {
            plaintext.extend(cipher.decrypt_block(chunk));
        }
        Ok(plaintext)
    }
}
