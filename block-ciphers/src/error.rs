//! Error types for the block cipher engine

use thiserror::Error;

/// Rejected setup or input: the caller asked for something the engine
/// cannot do.
///
/// These are caller mistakes (wrong key size, unaligned data, ...) and are
/// detected before any transformation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid key length {length} for {algorithm}")]
    InvalidKeyLength {
        algorithm: &'static str,
        length: usize,
    },

    #[error("invalid IV length {length}, expected {expected}")]
    InvalidIvLength { expected: usize, length: usize },

    #[error("block size {0} is outside 1..=255")]
    InvalidBlockSize(usize),

    #[error("data length {length} is not a multiple of the block size {block_size}")]
    UnalignedData { length: usize, block_size: usize },

    #[error("cannot unpad empty input")]
    EmptyInput,

    #[error("unrecognized padding style '{0}'")]
    UnknownPaddingStyle(String),

    #[error("unrecognized algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("unrecognized mode '{0}'")]
    UnknownMode(String),
}

/// Padding that failed verification during unpad.
///
/// Unlike [`ConfigurationError`] this signals a wrong key/IV or tampered
/// ciphertext, not a caller mistake. No partial plaintext is ever returned
/// alongside it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("padding length byte {length} is outside 1..={block_size}")]
    PaddingLengthOutOfRange { length: u8, block_size: usize },

    #[error("trailing bytes do not form valid {style} padding")]
    PaddingMismatch { style: &'static str },

    #[error("no 0x80 marker byte in the final block")]
    MissingPaddingMarker,
}

/// Top-level error for every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
}

pub type Result<T> = std::result::Result<T, CipherError>;
