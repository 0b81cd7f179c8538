// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Session lifecycle: connect, smoke-test, disconnect.
//!
//! One logical session per client. The caller owns the session, acquires
//! it scoped and releases it on every exit path; `disconnect` is
//! idempotent and dropping the session is equivalent. The session must
//! not be shared across threads; operations are sequential request/response
//! round trips.

use crate::config::ChainConfig;
use crate::contract::FinalityPolicy;
use crate::digest::{self, DigestAlgorithm};
use crate::error::{ClientError, Result};
use crate::rpc::LedgerRpc;
use crate::transport::HttpTransport;
use crate::types::{BlockHeader, Identity};

#[derive(Debug)]
pub struct Session<R> {
    rpc: R,
    identity: Identity,
    algorithm: DigestAlgorithm,
    finality: FinalityPolicy,
    connected: bool,
}

impl Session<HttpTransport> {
    /// Establish the secured session. Fail-fast: any missing credential,
    /// TLS setup failure or unreachable node aborts here; there is no
    /// retry loop, callers restart the whole client.
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        config.validate()?;

        let algorithm = config.digest_algorithm();
        let identity = Identity::derive(config.account.as_bytes(), algorithm);

        let tls = config.load_tls_material()?;
        // Signing happens inside the service stack; the key must still be
        // present and readable or the operator misconfigured the bundle.
        let account_key = config.load_account_key()?;
        let key_fingerprint = hex::encode(&algorithm.digest(&account_key)[..8]);

        let rpc = HttpTransport::new(&config.host, config.port, &tls)?;

        // Handshake smoke test: one query round trip proves TLS and the
        // node are actually usable before any state-changing call.
        let header = rpc
            .query_last_block_header()
            .await
            .map_err(|e| ClientError::Connection(format!("{}: {e}", config.endpoint())))?;

        tracing::info!(
            endpoint = %config.endpoint(),
            account = %config.account,
            identity = %identity,
            algorithm = ?algorithm,
            key_fingerprint,
            block_height = header.height,
            "session established"
        );

        Ok(Self {
            rpc,
            identity,
            algorithm,
            finality: FinalityPolicy::default(),
            connected: true,
        })
    }
}

impl<R: LedgerRpc> Session<R> {
    /// Build a session over an arbitrary transport. Seam for tests and
    /// embedded deployments that bypass HTTPS.
    pub fn over(rpc: R, identity: Identity, algorithm: DigestAlgorithm) -> Self {
        Self {
            rpc,
            identity,
            algorithm,
            finality: FinalityPolicy::default(),
            connected: true,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn finality_policy(&self) -> &FinalityPolicy {
        &self.finality
    }

    pub fn set_finality_policy(&mut self, policy: FinalityPolicy) {
        self.finality = policy;
    }

    /// Verify candidate content against a recorded hash under the session
    /// digest.
    pub fn verify(&self, content: &[u8], expected: &[u8]) -> bool {
        digest::verify(content, expected, self.algorithm)
    }

    pub async fn last_block_header(&self) -> Result<BlockHeader> {
        self.ensure_connected()?;
        self.rpc.query_last_block_header().await
    }

    /// Tear the session down. Safe to call repeatedly or when connect was
    /// never completed.
    pub fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            tracing::info!(identity = %self.identity, "session closed");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub(crate) fn rpc(&self) -> &R {
        &self.rpc
    }

    pub(crate) fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(ClientError::Connection("session is disconnected".to_string()))
        }
    }
}
