// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::TxId;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing resource file: {0}")]
    MissingResource(PathBuf),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Ledger rejected the request: {message} (code {code})")]
    Ledger { code: u32, message: String },

    #[error("Payload of {len} bytes exceeds the {max} byte deposit limit")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Output decode error: {0}")]
    Decode(String),

    #[error("Transaction {tx_id} did not reach finality before the deadline")]
    FinalityTimeout { tx_id: TxId },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Receipt result codes defined by the ledger service.
pub mod codes {
    pub const OK: u32 = 0;
    pub const BAD_TRANSACTION: u32 = 1001;
    pub const BAD_SIGNATURE: u32 = 1002;
    pub const ACCOUNT_NOT_FOUND: u32 = 2002;
    pub const CONTRACT_REVERTED: u32 = 3003;
    pub const STORAGE_QUOTA_EXCEEDED: u32 = 4001;
    pub const TX_NOT_FOUND: u32 = 5001;
}

/// Human-readable description for a service result code. The service owns
/// the full table; we only mirror the codes these flows can hit, unknown
/// codes still render.
pub fn ledger_error_description(code: u32) -> String {
    match code {
        codes::OK => "success".to_string(),
        codes::BAD_TRANSACTION => "transaction malformed".to_string(),
        codes::BAD_SIGNATURE => "signature verification failed".to_string(),
        codes::ACCOUNT_NOT_FOUND => "account not found".to_string(),
        codes::CONTRACT_REVERTED => "contract execution reverted".to_string(),
        codes::STORAGE_QUOTA_EXCEEDED => "storage quota exceeded".to_string(),
        codes::TX_NOT_FOUND => "transaction not found".to_string(),
        other => format!("ledger error {}", other),
    }
}

impl ClientError {
    /// Wrap a non-zero receipt result code with its service description.
    pub fn from_result_code(code: u32) -> Self {
        ClientError::Ledger {
            code,
            message: ledger_error_description(code),
        }
    }
}
