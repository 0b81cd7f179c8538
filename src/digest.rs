//! Digest selection and content verification.
//!
//! The chain network pins one digest for identity derivation and content
//! hashing: SM3 on privacy/TEE or state-cryptography deployments, SHA-256
//! everywhere else. Mixing algorithms across sessions makes previously
//! derived addresses unreachable, so the choice is made once per session
//! from the chain configuration and threaded through every derivation.

use sha2::{Digest as _, Sha256};
use sm3::Sm3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sm3,
}

impl DigestAlgorithm {
    /// Algorithm mandated by the chain deployment flags.
    pub fn for_chain(tee_chain: bool, state_crypto: bool) -> Self {
        if tee_chain || state_crypto {
            DigestAlgorithm::Sm3
        } else {
            DigestAlgorithm::Sha256
        }
    }

    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            DigestAlgorithm::Sha256 => Sha256::digest(data).into(),
            DigestAlgorithm::Sm3 => Sm3::digest(data).into(),
        }
    }
}

/// Recompute the digest of `content` and compare byte-for-byte against a
/// previously recorded hash. A mismatch is a normal outcome, not an error.
pub fn verify(content: &[u8], expected: &[u8], algorithm: DigestAlgorithm) -> bool {
    algorithm.digest(content).as_slice() == expected
}
