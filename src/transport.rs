// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! HTTPS transport for the ledger RPC surface.
//!
//! Wire schema note: the service owns the exact format; this client fixes
//! only the JSON bodies it emits and the fields it reads back. TLS itself
//! is rustls via reqwest, configured with the client identity and the
//! pinned CA bundle from the chain configuration.

use reqwest::{Certificate, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::TlsMaterial;
use crate::error::{codes, ClientError, Result};
use crate::rpc::{CallContract, DeployContract, DepositData, LedgerRpc, RelatedDepositData};
use crate::types::{BlockHeader, Identity, SubmitOutcome, TransactionRecord, TxId};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub(crate) fn new(host: &str, port: u16, tls: &TlsMaterial) -> Result<Self> {
        // reqwest wants key and cert in one PEM bundle for the identity.
        let mut identity_pem = tls.key_pem.clone();
        identity_pem.extend_from_slice(&tls.cert_pem);
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|e| ClientError::Connection(format!("client identity: {e}")))?;
        let ca = Certificate::from_pem(&tls.ca_pem)
            .map_err(|e| ClientError::Connection(format!("CA bundle: {e}")))?;

        let client = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .add_root_certificate(ca)
            .tls_built_in_root_certs(false)
            .build()
            .map_err(|e| ClientError::Connection(format!("TLS client build: {e}")))?;

        Ok(Self {
            base_url: format!("https://{host}:{port}"),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;

        match resp.status() {
            status if status.is_success() => Ok(resp.json().await?),
            StatusCode::NOT_FOUND => Err(ClientError::from_result_code(codes::TX_NOT_FOUND)),
            status => Err(ClientError::Connection(format!("{path} failed: {status}"))),
        }
    }
}

#[derive(Serialize)]
struct TxQuery<'a> {
    tx_id: &'a TxId,
}

#[derive(Serialize)]
struct RelatedQuery<'a> {
    receiver: &'a Identity,
    correlation_key: u64,
    offset: u64,
    limit: u64,
}

#[derive(Deserialize)]
struct SizeResponse {
    size: u64,
}

#[derive(Deserialize)]
struct ListResponse {
    tx_ids: Vec<TxId>,
}

impl LedgerRpc for HttpTransport {
    async fn query_last_block_header(&self) -> Result<BlockHeader> {
        self.post("/v1/chain/last-block-header", &serde_json::json!({})).await
    }

    async fn deploy_contract(&self, req: DeployContract) -> Result<SubmitOutcome> {
        self.post("/v1/contract/deploy", &req).await
    }

    async fn call_contract(&self, req: CallContract) -> Result<SubmitOutcome> {
        self.post("/v1/contract/call", &req).await
    }

    async fn deposit_data(&self, req: DepositData) -> Result<SubmitOutcome> {
        self.post("/v1/account/deposit-data", &req).await
    }

    async fn related_deposit_data(&self, req: RelatedDepositData) -> Result<SubmitOutcome> {
        self.post("/v1/account/related-deposit-data", &req).await
    }

    async fn query_transaction(&self, tx_id: &TxId) -> Result<TransactionRecord> {
        self.post("/v1/query/transaction", &TxQuery { tx_id }).await
    }

    async fn related_list_size(&self, receiver: &Identity, key: u64) -> Result<u64> {
        let resp: SizeResponse = self
            .post(
                "/v1/query/related-list-size",
                &RelatedQuery { receiver, correlation_key: key, offset: 0, limit: 0 },
            )
            .await?;
        Ok(resp.size)
    }

    async fn related_list(
        &self,
        receiver: &Identity,
        key: u64,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TxId>> {
        let resp: ListResponse = self
            .post(
                "/v1/query/related-list",
                &RelatedQuery { receiver, correlation_key: key, offset, limit },
            )
            .await?;
        Ok(resp.tx_ids)
    }
}
