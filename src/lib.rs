// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! notary-client: client library for a permissioned-ledger evidence service.
//!
//! The ledger node (consensus, signing, contract VM, chain storage) is an
//! external collaborator reached through the narrow [`rpc::LedgerRpc`]
//! surface. This crate supplies the client side: session lifecycle over
//! mutually-authenticated TLS, evidence deposit and retrieval, correlated
//! record listing, digest verification, and WASM contract invocation with
//! poll-until-finality semantics.
//!
//! Typical flow:
//! connect -> deposit / deploy / call -> query and verify -> disconnect.

pub mod config;
pub mod contract;
pub mod digest;
pub mod error;
pub mod evidence;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod types;
pub mod wasm;

pub use config::ChainConfig;
pub use contract::{CallKind, FinalityPolicy};
pub use digest::DigestAlgorithm;
pub use error::{ClientError, Result};
pub use session::Session;
pub use transport::HttpTransport;
pub use types::{
    BlockHeader, ContractHandle, FileEvidenceEnvelope, Identity, SubmitOutcome,
    TransactionReceipt, TxId, VmType, MAX_PAYLOAD_BYTES,
};
pub use wasm::{WasmOutput, WasmParams};
