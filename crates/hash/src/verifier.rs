//! Streaming digest computation and segment verification

use crate::{Algorithm, Digest};
use apkfetch_errors::IntegrityError;
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};

/// Incremental hasher over any supported algorithm
#[derive(Clone)]
pub enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Sha1 => Self::Sha1(Sha1::new()),
            Algorithm::Sha256 => Self::Sha256(Sha256::new()),
            Algorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    #[must_use]
    pub fn finalize(self) -> Digest {
        let (algorithm, bytes) = match self {
            Self::Sha1(h) => (Algorithm::Sha1, h.finalize().to_vec()),
            Self::Sha256(h) => (Algorithm::Sha256, h.finalize().to_vec()),
            Self::Sha512(h) => (Algorithm::Sha512, h.finalize().to_vec()),
        };
        Digest { algorithm, bytes }
    }
}

/// Checks one downloaded segment against its expected digest.
///
/// Feed every received chunk through [`SegmentVerifier::update`], then call
/// [`SegmentVerifier::finish`] once the stream ends.
pub struct SegmentVerifier {
    expected: Digest,
    hasher: Hasher,
}

impl SegmentVerifier {
    #[must_use]
    pub fn new(expected: Digest) -> Self {
        let hasher = Hasher::new(expected.algorithm());
        Self { expected, hasher }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Compare the streamed bytes with the expected digest
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::Mismatch` if the digests differ.
    pub fn finish(self, url: &str) -> Result<Digest, IntegrityError> {
        let actual = self.hasher.finalize();
        if actual != self.expected {
            return Err(IntegrityError::Mismatch {
                url: url.to_string(),
                expected: self.expected.to_sri(),
                actual: actual.to_sri(),
            });
        }
        Ok(actual)
    }
}
