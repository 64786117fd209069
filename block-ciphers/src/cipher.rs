//! Generic block cipher trait

/// A cipher that transforms exactly one fixed-size block at a time.
///
/// Implementations own their expanded round keys; the mode layer hands
/// `encrypt_block` and `decrypt_block` slices of exactly `block_size()`
/// bytes.
pub trait BlockCipher {
    /// Returns the block size of the cipher in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts a single block.
    fn encrypt_block(&self, block: &[u8]) -> Vec<u8>;

    /// Decrypts a single block.
    fn decrypt_block(&self, block: &[u8]) -> Vec<u8>;
}
