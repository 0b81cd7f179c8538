//! Core domain types shared by every operation mode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::error::{ClientError, Result};

/// Client-side ceiling for a single evidence payload. Enforced before any
/// network round trip.
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Opaque 32-byte address of an account or contract, derived by hashing a
/// seed (account name, generated contract name) with the session digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(#[serde(with = "hex_array")] [u8; 32]);

impl Identity {
    pub fn derive(seed: &[u8], algorithm: DigestAlgorithm) -> Self {
        Identity(algorithm.digest(seed))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Identity(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", hex::encode(self.0))
    }
}

/// Hash assigned by the ledger to a submitted transaction. The sole handle
/// for later retrieval; callers that need durability must persist it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(#[serde(with = "hex_array")] [u8; 32]);

impl TxId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        TxId(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ClientError::Decode(format!("tx id must be 32 bytes, got {}", bytes.len())))?;
        Ok(TxId(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", hex::encode(self.0))
    }
}

/// Synchronous acknowledgment of a submitted transaction. `result == 0`
/// means the ledger accepted it; anything else is a logical rejection with
/// a service-defined code. Never mutated after receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub result: u32,
    #[serde(with = "hex_vec")]
    pub output: Vec<u8>,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.result == 0
    }
}

/// Transaction id plus receipt, returned by every state-changing submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub tx_id: TxId,
    pub receipt: TransactionReceipt,
}

impl SubmitOutcome {
    /// Transport success alone is not enough; a non-zero receipt result is
    /// a logical ledger rejection and becomes `ClientError::Ledger`.
    pub fn into_checked(self) -> Result<Self> {
        if self.receipt.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_result_code(self.receipt.result))
        }
    }
}

/// Stored transaction as returned by a query, carrying the deposited
/// payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(with = "hex_vec")]
    pub data: Vec<u8>,
    pub timestamp: u64,
}

/// Latest block header, used as the connection smoke test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub hash: String,
    pub timestamp: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VmType {
    Wasm,
}

/// Deployed contract reference. No client-side state beyond the address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractHandle {
    pub identity: Identity,
    pub vm: VmType,
}

/// File evidence payload: filename, creation time and content hash,
/// round-tripped through the ledger as JSON bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvidenceEnvelope {
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
}

impl FileEvidenceEnvelope {
    pub fn new(file_name: impl Into<String>, content_hash: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            created_at: Utc::now(),
            content_hash: hex::encode(content_hash),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// True iff `content` hashes to the recorded content hash.
    pub fn matches(&self, content: &[u8], algorithm: DigestAlgorithm) -> bool {
        hex::encode(algorithm.digest(content)) == self.content_hash
    }
}

pub(crate) mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(d)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 hex-encoded bytes"))
    }
}

pub(crate) mod hex_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        hex::decode(&text).map_err(serde::de::Error::custom)
    }
}
