#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content digests for apkfetch
//!
//! Expected digests arrive in several encodings (`sha256-<base64>`,
//! `sha256:<hex>`, ...). Everything is normalized to one canonical SRI form
//! before comparison, and downloaded segments are checked against it while
//! they stream to disk.

mod verifier;

pub use verifier::{Hasher, SegmentVerifier};

use apkfetch_errors::IntegrityError;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    /// Digest length in bytes
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl FromStr for Algorithm {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(IntegrityError::UnsupportedAlgorithm {
                algorithm: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content digest. Displays and serializes in SRI form (`sha256-<base64>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: Algorithm,
    bytes: Vec<u8>,
}

impl Digest {
    /// Parse any accepted encoding: `ALG-BASE64`, `ALG-HEX`, `ALG:HEX`, `ALG:BASE64`
    ///
    /// # Errors
    ///
    /// Returns an error for unknown algorithms or payloads that decode to the
    /// wrong length.
    pub fn parse(input: &str) -> Result<Self, IntegrityError> {
        let invalid = |reason: &str| IntegrityError::InvalidDigest {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let separator = input
            .find(['-', ':'])
            .ok_or_else(|| invalid("missing algorithm prefix"))?;
        let algorithm: Algorithm = input[..separator].parse()?;
        let payload = input[separator + 1..].trim();
        let len = algorithm.output_len();

        let bytes = if payload.len() == len * 2 && payload.bytes().all(|b| b.is_ascii_hexdigit()) {
            hex::decode(payload).map_err(|e| invalid(&e.to_string()))?
        } else {
            STANDARD
                .decode(payload)
                .or_else(|_| STANDARD_NO_PAD.decode(payload))
                .map_err(|e| invalid(&e.to_string()))?
        };

        if bytes.len() != len {
            return Err(invalid(&format!(
                "{algorithm} digests are {len} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self { algorithm, bytes })
    }

    /// Compute the digest of a byte slice
    #[must_use]
    pub fn from_data(algorithm: Algorithm, data: &[u8]) -> Self {
        let mut hasher = Hasher::new(algorithm);
        hasher.update(data);
        hasher.finalize()
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical `ALG-BASE64` form
    #[must_use]
    pub fn to_sri(&self) -> String {
        format!("{}-{}", self.algorithm, STANDARD.encode(&self.bytes))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sri())
    }
}

impl FromStr for Digest {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_sri())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256_HEX: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const EMPTY_SHA256_SRI: &str = "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

    #[test]
    fn test_hex_and_base64_normalize_to_same_digest() {
        let from_hex = Digest::parse(&format!("sha256:{EMPTY_SHA256_HEX}")).unwrap();
        let from_dash_hex = Digest::parse(&format!("sha256-{EMPTY_SHA256_HEX}")).unwrap();
        let from_sri = Digest::parse(EMPTY_SHA256_SRI).unwrap();

        assert_eq!(from_hex, from_sri);
        assert_eq!(from_dash_hex, from_sri);
        assert_eq!(from_hex.to_sri(), EMPTY_SHA256_SRI);
        assert_eq!(from_sri.to_hex(), EMPTY_SHA256_HEX);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            Digest::from_data(Algorithm::Sha256, b"hello world").to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            Digest::from_data(Algorithm::Sha1, b"").to_sri(),
            "sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk="
        );
        assert_eq!(Digest::from_data(Algorithm::Sha512, b"").as_bytes().len(), 64);
    }

    #[test]
    fn test_algorithm_is_case_insensitive() {
        let digest = Digest::parse("SHA1:da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(digest.algorithm(), Algorithm::Sha1);
        assert_eq!(digest, Digest::from_data(Algorithm::Sha1, b""));
    }

    #[test]
    fn test_rejects_invalid_digests() {
        assert!(matches!(
            Digest::parse("md5-1B2M2Y8AsgTpgAmY7PhCfg=="),
            Err(IntegrityError::UnsupportedAlgorithm { .. })
        ));
        assert!(Digest::parse("sha256").is_err());
        assert!(Digest::parse("sha256-tooshort").is_err());
        assert!(Digest::parse("sha1-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=").is_err());
    }

    #[test]
    fn test_serde_uses_sri() {
        let digest = Digest::parse(&format!("sha256:{EMPTY_SHA256_HEX}")).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{EMPTY_SHA256_SRI}\""));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}
