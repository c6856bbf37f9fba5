//! Hash primitive and digest-to-word splitting.
//!
//! Elements are hashed with a [`HashAlgorithm`] and the digest is cut into
//! signed little-endian words.  Those words seed the exponent that is folded
//! into the accumulator.

use crate::config::WordWidth;
use crate::error::{AccumulatorError, Result};
use sha2::Digest;
use std::fmt;
use std::str::FromStr;

/// Supported digest functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA3-256 (feature `sha3`).
    Sha3_256,
    /// SHA3-512 (feature `sha3`).
    Sha3_512,
    /// BLAKE2b with a 32-byte output (feature `blake2`).
    Blake2b256,
    /// BLAKE2b with a 64-byte output (feature `blake2`).
    Blake2b512,
}

impl HashAlgorithm {
    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_512 => "sha3-512",
            HashAlgorithm::Blake2b256 => "blake2b-256",
            HashAlgorithm::Blake2b512 => "blake2b-512",
        }
    }

    /// Digest size in bits.
    pub fn output_bits(self) -> u32 {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 | HashAlgorithm::Blake2b256 => 256,
            HashAlgorithm::Sha384 => 384,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 | HashAlgorithm::Blake2b512 => 512,
        }
    }

    /// Returns `true` when the implementation is compiled into this build.
    pub fn is_available(self) -> bool {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => true,
            HashAlgorithm::Sha3_256 | HashAlgorithm::Sha3_512 => cfg!(feature = "sha3"),
            HashAlgorithm::Blake2b256 | HashAlgorithm::Blake2b512 => cfg!(feature = "blake2"),
        }
    }

    /// Hashes `input`.
    pub fn digest(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            HashAlgorithm::Sha256 => Ok(sha2::Sha256::digest(input).to_vec()),
            HashAlgorithm::Sha384 => Ok(sha2::Sha384::digest(input).to_vec()),
            HashAlgorithm::Sha512 => Ok(sha2::Sha512::digest(input).to_vec()),
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_256 => Ok(sha3::Sha3_256::digest(input).to_vec()),
            #[cfg(feature = "sha3")]
            HashAlgorithm::Sha3_512 => Ok(sha3::Sha3_512::digest(input).to_vec()),
            #[cfg(feature = "blake2")]
            HashAlgorithm::Blake2b256 => {
                Ok(blake2::Blake2b::<blake2::digest::consts::U32>::digest(input).to_vec())
            }
            #[cfg(feature = "blake2")]
            HashAlgorithm::Blake2b512 => Ok(blake2::Blake2b512::digest(input).to_vec()),
            #[allow(unreachable_patterns)]
            other => Err(AccumulatorError::Dependency(format!(
                "hash algorithm '{other}' is not compiled into this build"
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = AccumulatorError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalised.as_str() {
            "" => Err(AccumulatorError::Configuration(
                "hash algorithm was not set".to_string(),
            )),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(HashAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            "sha3-256" => Ok(HashAlgorithm::Sha3_256),
            "sha3-512" => Ok(HashAlgorithm::Sha3_512),
            "blake2b-256" | "blake2b256" => Ok(HashAlgorithm::Blake2b256),
            "blake2b-512" | "blake2b512" | "blake2b" => Ok(HashAlgorithm::Blake2b512),
            other => Err(AccumulatorError::Configuration(format!(
                "unknown hash algorithm '{other}'"
            ))),
        }
    }
}

/// Splits a digest into signed little-endian words of `width`.
///
/// Words that decode to zero are replaced by one.  Trailing bytes that do not
/// fill a whole word are dropped.
pub fn digest_words(digest: &[u8], width: WordWidth) -> Vec<i64> {
    digest
        .chunks_exact(width.bytes())
        .map(|chunk| {
            let word = match width {
                WordWidth::Bits32 => {
                    let mut buf = [0u8; 4];
                    buf.copy_from_slice(chunk);
                    i64::from(i32::from_le_bytes(buf))
                }
                WordWidth::Bits64 => {
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(chunk);
                    i64::from_le_bytes(buf)
                }
            };
            if word == 0 {
                1
            } else {
                word
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_foobar_digest() {
        let digest = HashAlgorithm::Sha256.digest(b"foobar").unwrap();
        assert_eq!(
            hex::encode(digest),
            "c3ab8ff13720e8ad9047dd39466b3c8974e592c2fa383d4a3960714caef0c4f2"
        );
    }

    #[test]
    fn words_are_signed_little_endian() {
        let digest = HashAlgorithm::Sha256.digest(b"foobar").unwrap();
        let words = digest_words(&digest, WordWidth::Bits64);
        assert_eq!(
            words,
            vec![
                -5915442685903131709,
                -8557847242548099184,
                5349494582043403636,
                -953372589698228167,
            ]
        );
    }

    #[test]
    fn zero_words_become_one() {
        let mut digest = vec![0u8; 16];
        digest[8] = 2;
        assert_eq!(digest_words(&digest, WordWidth::Bits64), vec![1, 2]);
        assert_eq!(digest_words(&digest, WordWidth::Bits32), vec![1, 1, 2, 1]);
    }

    #[test]
    fn thirty_two_bit_words_sign_extend() {
        let digest = [0xff, 0xff, 0xff, 0xff, 0x05, 0x00, 0x00, 0x00];
        assert_eq!(digest_words(&digest, WordWidth::Bits32), vec![-1, 5]);
    }

    #[test]
    fn digest_lengths_match_output_bits() {
        for algorithm in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
            HashAlgorithm::Sha3_256,
            HashAlgorithm::Sha3_512,
            HashAlgorithm::Blake2b256,
            HashAlgorithm::Blake2b512,
        ] {
            if !algorithm.is_available() {
                continue;
            }
            let digest = algorithm.digest(b"abc").unwrap();
            assert_eq!(digest.len() * 8, algorithm.output_bits() as usize, "{algorithm}");
        }
    }

    #[cfg(not(feature = "blake2"))]
    #[test]
    fn compiled_out_digest_is_a_dependency_error() {
        assert!(!HashAlgorithm::Blake2b512.is_available());
        let err = HashAlgorithm::Blake2b512.digest(b"abc").unwrap_err();
        assert!(matches!(err, AccumulatorError::Dependency(_)));
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha3_256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_256);
        assert!("md5".parse::<HashAlgorithm>().is_err());
        assert!("   ".parse::<HashAlgorithm>().is_err());
    }
}
