//! The public cipher context
//!
//! Selects an algorithm and mode once, validates key and IV at
//! construction, and owns the mutable CBC chaining state. A context is
//! meant for sequential same-direction calls; the `&mut self` receivers on
//! [`CipherContext::encrypt`] and [`CipherContext::decrypt`] make shared
//! concurrent use a compile error rather than a data race.

use std::fmt;
use std::str::FromStr;

use crate::aes::Aes;
use crate::cipher::BlockCipher;
use crate::des::Des;
use crate::error::{ConfigurationError, Result};
use crate::modes::CipherModes;
use crate::tdes::TripleDes;

/// Supported block cipher algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Des,
    TripleDes,
    Aes,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Des => "des",
            Algorithm::TripleDes => "3des",
            Algorithm::Aes => "aes",
        })
    }
}

impl FromStr for Algorithm {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "des" => Ok(Algorithm::Des),
            "3des" => Ok(Algorithm::TripleDes),
            "aes" => Ok(Algorithm::Aes),
            other => Err(ConfigurationError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Supported modes of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cbc,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Ecb => "ecb",
            Mode::Cbc => "cbc",
        })
    }
}

impl FromStr for Mode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ecb" => Ok(Mode::Ecb),
            "cbc" => Ok(Mode::Cbc),
            other => Err(ConfigurationError::UnknownMode(other.to_string())),
        }
    }
}

// Closed dispatch over the three cores, resolved once at construction.
#[derive(Clone)]
enum Cipher {
    Des(Des),
    TripleDes(TripleDes),
    Aes(Aes),
}

impl BlockCipher for Cipher {
    fn block_size(&self) -> usize {
        match self {
            Cipher::Des(cipher) => cipher.block_size(),
            Cipher::TripleDes(cipher) => cipher.block_size(),
            Cipher::Aes(cipher) => cipher.block_size(),
        }
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        match self {
            Cipher::Des(cipher) => cipher.encrypt_block(block),
            Cipher::TripleDes(cipher) => cipher.encrypt_block(block),
            Cipher::Aes(cipher) => cipher.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        match self {
            Cipher::Des(cipher) => cipher.decrypt_block(block),
            Cipher::TripleDes(cipher) => cipher.decrypt_block(block),
            Cipher::Aes(cipher) => cipher.decrypt_block(block),
        }
    }
}

/// A cipher bound to an algorithm, key and mode, carrying the CBC chaining
/// state across calls.
pub struct CipherContext {
    algorithm: Algorithm,
    cipher: Cipher,
    mode: Mode,
    state: Vec<u8>,
}

impl CipherContext {
    /// Builds a context, validating the key against the algorithm and the
    /// IV against the block size.
    ///
    /// In CBC mode a missing IV means an all-zero block; ECB ignores any
    /// supplied IV.
    pub fn new(
        algorithm: Algorithm,
        key: &[u8],
        mode: Mode,
        iv: Option<&[u8]>,
    ) -> Result<Self> {
        let cipher = match algorithm {
            Algorithm::Des => Cipher::Des(Des::new(key)?),
            Algorithm::TripleDes => Cipher::TripleDes(TripleDes::new(key)?),
            Algorithm::Aes => Cipher::Aes(Aes::new(key)?),
        };
        let block_size = cipher.block_size();

        let state = match (mode, iv) {
            (Mode::Cbc, Some(iv)) => {
                if iv.len() != block_size {
                    return Err(ConfigurationError::InvalidIvLength {
                        expected: block_size,
                        length: iv.len(),
                    }
                    .into());
                }
                iv.to_vec()
            }
            _ => vec![0u8; block_size],
        };

        Ok(CipherContext {
            algorithm,
            cipher,
            mode,
            state,
        })
    }

    /// The selected algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The selected mode of operation.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Block size of the selected algorithm in bytes.
    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    /// Current chaining state: the IV before the first call, the last
    /// ciphertext block afterwards. Meaningful in CBC mode only.
    pub fn iv(&self) -> &[u8] {
        &self.state
    }

    /// Encrypts block-aligned data.
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            Mode::Ecb => CipherModes::ecb_encrypt(&self.cipher, data),
            Mode::Cbc => CipherModes::cbc_encrypt(&self.cipher, data, &mut self.state),
        }
    }

    /// Decrypts block-aligned data.
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            Mode::Ecb => CipherModes::ecb_decrypt(&self.cipher, data),
            Mode::Cbc => CipherModes::cbc_decrypt(&self.cipher, data, &mut self.state),
        }
    }
}

impl fmt::Debug for CipherContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material is deliberately absent.
        f.debug_struct("CipherContext")
            .field("algorithm", &self.algorithm)
            .field("mode", &self.mode)
            .field("block_size", &self.block_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CipherError;

    // Every (algorithm, valid key length) pair.
    const KEY_SIZES: [(Algorithm, usize); 6] = [
        (Algorithm::Des, 8),
        (Algorithm::TripleDes, 16),
        (Algorithm::TripleDes, 24),
        (Algorithm::Aes, 16),
        (Algorithm::Aes, 24),
        (Algorithm::Aes, 32),
    ];

    fn test_key(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(7).wrapping_add(3)).collect()
    }

    #[test]
    fn round_trip_every_algorithm_mode_and_key_size() {
        for (algorithm, key_len) in KEY_SIZES {
            for mode in [Mode::Ecb, Mode::Cbc] {
                let key = test_key(key_len);
                let mut enc = CipherContext::new(algorithm, &key, mode, None).unwrap();
                let plaintext: Vec<u8> = (0..4 * enc.block_size()).map(|i| i as u8).collect();

                let ciphertext = enc.encrypt(&plaintext).unwrap();
                assert_ne!(ciphertext, plaintext);

                let mut dec = CipherContext::new(algorithm, &key, mode, None).unwrap();
                assert_eq!(
                    dec.decrypt(&ciphertext).unwrap(),
                    plaintext,
                    "{algorithm}/{mode} key_len {key_len}"
                );
            }
        }
    }

    #[test]
    fn rejects_invalid_key_lengths() {
        for (algorithm, bad_len) in [
            (Algorithm::Des, 7),
            (Algorithm::Des, 16),
            (Algorithm::TripleDes, 8),
            (Algorithm::TripleDes, 32),
            (Algorithm::Aes, 8),
            (Algorithm::Aes, 20),
        ] {
            let result = CipherContext::new(algorithm, &test_key(bad_len), Mode::Ecb, None);
            assert!(matches!(
                result,
                Err(CipherError::Configuration(
                    ConfigurationError::InvalidKeyLength { .. }
                ))
            ));
        }
    }

    #[test]
    fn rejects_invalid_iv_lengths_for_cbc() {
        for (algorithm, key_len) in KEY_SIZES {
            let block_size = match algorithm {
                Algorithm::Aes => 16,
                _ => 8,
            };
            for bad in [block_size - 1, block_size + 1] {
                let result = CipherContext::new(
                    algorithm,
                    &test_key(key_len),
                    Mode::Cbc,
                    Some(&vec![0u8; bad]),
                );
                assert!(matches!(
                    result,
                    Err(CipherError::Configuration(
                        ConfigurationError::InvalidIvLength { .. }
                    ))
                ));
            }
        }
    }

    #[test]
    fn ecb_ignores_a_supplied_iv() {
        let key = test_key(16);
        let plaintext = [0x5au8; 32];

        let mut with_iv =
            CipherContext::new(Algorithm::Aes, &key, Mode::Ecb, Some(&[0xffu8; 3])).unwrap();
        let mut without_iv = CipherContext::new(Algorithm::Aes, &key, Mode::Ecb, None).unwrap();

        assert_eq!(
            with_iv.encrypt(&plaintext).unwrap(),
            without_iv.encrypt(&plaintext).unwrap()
        );
    }

    #[test]
    fn rejects_unaligned_data() {
        for (algorithm, key_len) in KEY_SIZES {
            for mode in [Mode::Ecb, Mode::Cbc] {
                let mut context =
                    CipherContext::new(algorithm, &test_key(key_len), mode, None).unwrap();
                let unaligned = vec![0u8; context.block_size() + 1];
                assert!(matches!(
                    context.encrypt(&unaligned),
                    Err(CipherError::Configuration(
                        ConfigurationError::UnalignedData { .. }
                    ))
                ));
                assert!(matches!(
                    context.decrypt(&unaligned),
                    Err(CipherError::Configuration(
                        ConfigurationError::UnalignedData { .. }
                    ))
                ));
            }
        }
    }

    #[test]
    fn missing_iv_means_zero_iv() {
        let key = test_key(16);
        let plaintext = [0x33u8; 48];

        let mut defaulted = CipherContext::new(Algorithm::Aes, &key, Mode::Cbc, None).unwrap();
        let mut explicit =
            CipherContext::new(Algorithm::Aes, &key, Mode::Cbc, Some(&[0u8; 16])).unwrap();

        assert_eq!(
            defaulted.encrypt(&plaintext).unwrap(),
            explicit.encrypt(&plaintext).unwrap()
        );
    }

    #[test]
    fn iv_tracks_the_last_ciphertext_block() {
        for (algorithm, key_len) in KEY_SIZES {
            let key = test_key(key_len);
            let mut enc = CipherContext::new(algorithm, &key, Mode::Cbc, None).unwrap();
            let block_size = enc.block_size();
            let plaintext = vec![0xc3u8; 3 * block_size];

            let ciphertext = enc.encrypt(&plaintext).unwrap();
            assert_eq!(enc.iv(), &ciphertext[2 * block_size..]);

            let mut dec = CipherContext::new(algorithm, &key, Mode::Cbc, None).unwrap();
            dec.decrypt(&ciphertext).unwrap();
            assert_eq!(dec.iv(), &ciphertext[2 * block_size..]);
        }
    }

    #[test]
    fn streaming_equals_one_shot_in_cbc() {
        for (algorithm, key_len) in KEY_SIZES {
            let key = test_key(key_len);
            let iv_template = test_key(64);

            let probe = CipherContext::new(algorithm, &key, Mode::Cbc, None).unwrap();
            let block_size = probe.block_size();
            let iv = &iv_template[..block_size];
            let plaintext: Vec<u8> = (0..6 * block_size).map(|i| i as u8).collect();

            let mut one_shot =
                CipherContext::new(algorithm, &key, Mode::Cbc, Some(iv)).unwrap();
            let whole = one_shot.encrypt(&plaintext).unwrap();

            let mut streaming =
                CipherContext::new(algorithm, &key, Mode::Cbc, Some(iv)).unwrap();
            let mut chunked = streaming.encrypt(&plaintext[..2 * block_size]).unwrap();
            chunked.extend(streaming.encrypt(&plaintext[2 * block_size..]).unwrap());
            assert_eq!(whole, chunked);

            // Same property for decryption.
            let mut one_shot =
                CipherContext::new(algorithm, &key, Mode::Cbc, Some(iv)).unwrap();
            let whole_plain = one_shot.decrypt(&whole).unwrap();

            let mut streaming =
                CipherContext::new(algorithm, &key, Mode::Cbc, Some(iv)).unwrap();
            let mut chunked_plain = streaming.decrypt(&whole[..3 * block_size]).unwrap();
            chunked_plain.extend(streaming.decrypt(&whole[3 * block_size..]).unwrap());
            assert_eq!(whole_plain, chunked_plain);
            assert_eq!(whole_plain, plaintext);
        }
    }

    #[test]
    fn fips81_des_cbc_vector() {
        // FIPS 81 appendix C: DES-CBC, key 0123456789ABCDEF,
        // IV 1234567890ABCDEF, three blocks of plaintext.
        let key = hex::decode("0123456789abcdef").unwrap();
        let iv = hex::decode("1234567890abcdef").unwrap();
        let plaintext = b"Now is the time for all ";

        let mut enc =
            CipherContext::new(Algorithm::Des, &key, Mode::Cbc, Some(&iv)).unwrap();
        let ciphertext = enc.encrypt(plaintext).unwrap();
        assert_eq!(
            hex::encode(&ciphertext),
            "e5c7cdde872bf27c43e934008c389c0f683788499a7c05f6"
        );

        let mut dec =
            CipherContext::new(Algorithm::Des, &key, Mode::Cbc, Some(&iv)).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn fips81_des_ecb_vector() {
        let key = hex::decode("0123456789abcdef").unwrap();
        let mut enc = CipherContext::new(Algorithm::Des, &key, Mode::Ecb, None).unwrap();

        let ciphertext = enc.encrypt(b"Now is the time for all ").unwrap();
        assert_eq!(
            hex::encode(&ciphertext),
            "3fa40e8a984d48156a271787ab8883f9893d51ec4b563b53"
        );
    }

    #[test]
    fn sp800_38a_aes128_ecb_vectors() {
        // NIST SP 800-38A F.1.1/F.1.2.
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let plaintext = hex::decode(concat!(
            "6bc1bee22e409f96e93d7e117393172a",
            "ae2d8a571e03ac9c9eb76fac45af8e51",
            "30c81c46a35ce411e5fbc1191a0a52ef",
            "f69f2445df4f9b17ad2b417be66c3710",
        ))
        .unwrap();
        let expected = concat!(
            "3ad77bb40d7a3660a89ecaf32466ef97",
            "f5d3d58503b9699de785895a96fdbaaf",
            "43b1cd7f598ece23881b00e3ed030688",
            "7b0c785e27e8ad3f8223207104725dd4",
        );

        let mut enc = CipherContext::new(Algorithm::Aes, &key, Mode::Ecb, None).unwrap();
        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(hex::encode(&ciphertext), expected);

        let mut dec = CipherContext::new(Algorithm::Aes, &key, Mode::Ecb, None).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn sp800_38a_aes128_cbc_vectors() {
        // NIST SP 800-38A F.2.1/F.2.2.
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plaintext = hex::decode(concat!(
            "6bc1bee22e409f96e93d7e117393172a",
            "ae2d8a571e03ac9c9eb76fac45af8e51",
            "30c81c46a35ce411e5fbc1191a0a52ef",
            "f69f2445df4f9b17ad2b417be66c3710",
        ))
        .unwrap();
        let expected = concat!(
            "7649abac8119b246cee98e9b12e9197d",
            "5086cb9b507219ee95db113a917678b2",
            "73bed6b8e3c1743b7116e69e22229516",
            "3ff1caa1681fac09120eca307586e1a7",
        );

        let mut enc = CipherContext::new(Algorithm::Aes, &key, Mode::Cbc, Some(&iv)).unwrap();
        let ciphertext = enc.encrypt(&plaintext).unwrap();
        assert_eq!(hex::encode(&ciphertext), expected);

        let mut dec = CipherContext::new(Algorithm::Aes, &key, Mode::Cbc, Some(&iv)).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn tdes_cbc_round_trip_with_iv() {
        let key = hex::decode("0123456789abcdef23456789abcdef01456789abcdef0123").unwrap();
        let iv = [0xf0u8; 8];
        let plaintext = b"8 bytes 8 bytes 8 bytes ";

        let mut enc =
            CipherContext::new(Algorithm::TripleDes, &key, Mode::Cbc, Some(&iv)).unwrap();
        let ciphertext = enc.encrypt(plaintext).unwrap();

        let mut dec =
            CipherContext::new(Algorithm::TripleDes, &key, Mode::Cbc, Some(&iv)).unwrap();
        assert_eq!(dec.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn names_parse_and_display() {
        for algorithm in [Algorithm::Des, Algorithm::TripleDes, Algorithm::Aes] {
            assert_eq!(
                algorithm.to_string().parse::<Algorithm>().unwrap(),
                algorithm
            );
        }
        for mode in [Mode::Ecb, Mode::Cbc] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
        assert!("rc4".parse::<Algorithm>().is_err());
        assert!("ctr".parse::<Mode>().is_err());
    }

    #[test]
    fn debug_output_hides_key_material() {
        let key = test_key(16);
        let context = CipherContext::new(Algorithm::Aes, &key, Mode::Cbc, None).unwrap();
        let rendered = format!("{context:?}");
        assert!(rendered.contains("Aes"));
        assert!(!rendered.contains("state"));
    }
}
