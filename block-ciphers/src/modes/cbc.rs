//! CBC (Cipher Block Chaining) mode implementation

use crate::cipher::BlockCipher;
use crate::error::Result;
use crate::utils;

use super::{require_aligned, CipherModes};

impl CipherModes {
    /// CBC mode encryption of block-aligned data.
    ///
    /// `state` holds the current chaining value: the IV before the first
    /// block, and the last ciphertext block produced afterwards. Because it
    /// is updated in place, consecutive calls continue the chain exactly
    /// where the previous call stopped.
    pub fn cbc_encrypt<C: BlockCipher>(
        cipher: &C,
        plaintext: &[u8],
        state: &mut [u8],
    ) -> Result<Vec<u8>> {
        require_aligned(plaintext.len(), cipher.block_size())?;
        debug_assert_eq!(state.len(), cipher.block_size());

        let mut ciphertext = Vec::with_capacity(plaintext.len());
        for chunk in plaintext.chunks(cipher.block_size()) {
            let encrypted = cipher.encrypt_block(&utils::xor_blocks(chunk, state));
            state.copy_from_slice(&encrypted);
            ciphertext.extend(encrypted);
        }
        Ok(ciphertext)
    }

    /// CBC mode decryption of block-aligned data.
    ///
    /// `state` as for encryption; it is left holding the last ciphertext
    /// block consumed.
    pub fn cbc_decrypt<C: BlockCipher>(
        cipher: &C,
        ciphertext: &[u8],
        state: &mut [u8],
    ) -> Result<Vec<u8>> {
        require_aligned(ciphertext.len(), cipher.block_size())?;
        debug_assert_eq!(state.len(), cipher.block_size());

        let mut plaintext = Vec::with_capacity(ciphertext.len());
        for chunk in ciphertext.chunks(cipher.block_size()) {
            plaintext.extend(utils::xor_blocks(&cipher.decrypt_block(chunk), state));
            state.copy_from_slice(chunk);
        }
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::Aes;
    use crate::des::Des;

    #[test]
    fn identical_blocks_encrypt_differently() {
        let aes = Aes::new(&[0x2au8; 16]).unwrap();
        let plaintext = [0x55u8; 32];
        let mut state = [0u8; 16];

        let ciphertext = CipherModes::cbc_encrypt(&aes, &plaintext, &mut state).unwrap();
        assert_ne!(&ciphertext[..16], &ciphertext[16..]);
    }

    #[test]
    fn state_tracks_the_last_ciphertext_block() {
        let des = Des::new(&[0x13u8; 8]).unwrap();
        let mut state = [0u8; 8];

        let ciphertext = CipherModes::cbc_encrypt(&des, &[0xaau8; 24], &mut state).unwrap();
        assert_eq!(&state[..], &ciphertext[16..]);

        let mut state = [0u8; 8];
        CipherModes::cbc_decrypt(&des, &ciphertext, &mut state).unwrap();
        assert_eq!(&state[..], &ciphertext[16..]);
    }

    #[test]
    fn chunked_calls_match_one_call() {
        let aes = Aes::new(&[0x77u8; 16]).unwrap();
        let plaintext: Vec<u8> = (0..64u8).collect();
        let iv = [0x24u8; 16];

        let mut whole_state = iv;
        let whole = CipherModes::cbc_encrypt(&aes, &plaintext, &mut whole_state).unwrap();

        let mut chunked_state = iv;
        let mut chunked =
            CipherModes::cbc_encrypt(&aes, &plaintext[..32], &mut chunked_state).unwrap();
        chunked.extend(CipherModes::cbc_encrypt(&aes, &plaintext[32..], &mut chunked_state).unwrap());

        assert_eq!(whole, chunked);
        assert_eq!(whole_state, chunked_state);
    }

    #[test]
    fn round_trip() {
        let aes = Aes::new(&[0x01u8; 32]).unwrap();
        let plaintext: Vec<u8> = (0..96u8).collect();
        let iv = [0x9cu8; 16];

        let mut state = iv;
        let ciphertext = CipherModes::cbc_encrypt(&aes, &plaintext, &mut state).unwrap();

        let mut state = iv;
        assert_eq!(
            CipherModes::cbc_decrypt(&aes, &ciphertext, &mut state).unwrap(),
            plaintext
        );
    }

    #[test]
    fn rejects_unaligned_input() {
        let aes = Aes::new(&[0u8; 16]).unwrap();
        let mut state = [0u8; 16];
        assert!(CipherModes::cbc_encrypt(&aes, &[0u8; 20], &mut state).is_err());
        assert!(CipherModes::cbc_decrypt(&aes, &[0u8; 31], &mut state).is_err());
    }
}
