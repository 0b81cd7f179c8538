// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Evidence deposit and retrieval.
//!
//! Writers submit raw byte records, optionally tagged with a correlation
//! key for joint retrieval. Readers fetch by transaction id or list by
//! (receiver, key). Success always means: transport acknowledged AND the
//! receipt carries result code zero; a non-zero code is a logical ledger
//! rejection, surfaced with the service description.

use crate::error::{ClientError, Result};
use crate::rpc::{DepositData, LedgerRpc, RelatedDepositData};
use crate::session::Session;
use crate::types::{Identity, SubmitOutcome, TxId, MAX_PAYLOAD_BYTES};

impl<R: LedgerRpc> Session<R> {
    /// Deposit a record addressed to the session's own identity.
    pub async fn deposit_plain(&self, payload: &[u8]) -> Result<SubmitOutcome> {
        self.deposit_plain_to(self.identity(), payload).await
    }

    /// Deposit a record to a distinct receiver.
    pub async fn deposit_plain_to(&self, receiver: Identity, payload: &[u8]) -> Result<SubmitOutcome> {
        self.ensure_connected()?;
        check_payload(payload)?;

        let outcome = self
            .rpc()
            .deposit_data(DepositData {
                sender: self.identity(),
                receiver,
                payload: payload.to_vec(),
                amount: 0,
            })
            .await?;
        let outcome = outcome.into_checked()?;
        tracing::info!(tx_id = %outcome.tx_id, len = payload.len(), "evidence deposited");
        Ok(outcome)
    }

    /// Deposit a record tagged with a correlation key, addressed to the
    /// session's own identity.
    pub async fn deposit_correlated(&self, payload: &[u8], key: u64) -> Result<SubmitOutcome> {
        self.deposit_correlated_to(self.identity(), payload, key).await
    }

    pub async fn deposit_correlated_to(
        &self,
        receiver: Identity,
        payload: &[u8],
        key: u64,
    ) -> Result<SubmitOutcome> {
        self.ensure_connected()?;
        check_payload(payload)?;

        let outcome = self
            .rpc()
            .related_deposit_data(RelatedDepositData {
                sender: self.identity(),
                receiver,
                payload: payload.to_vec(),
                correlation_key: key,
                amount: 0,
            })
            .await?;
        let outcome = outcome.into_checked()?;
        tracing::info!(
            tx_id = %outcome.tx_id,
            correlation_key = key,
            len = payload.len(),
            "correlated evidence deposited"
        );
        Ok(outcome)
    }

    /// Payload bytes of a previously deposited record.
    pub async fn get_by_tx_id(&self, tx_id: &TxId) -> Result<Vec<u8>> {
        self.ensure_connected()?;
        let record = self.rpc().query_transaction(tx_id).await?;
        Ok(record.data)
    }

    /// Transaction ids stored under (receiver, key), oldest first.
    ///
    /// Two round trips: a count, then one page of exactly that many
    /// entries from offset 0. The pair is not atomic; a writer racing the
    /// two calls can leave the page stale or incomplete. Callers needing
    /// stronger guarantees must re-query.
    pub async fn list_correlated(&self, receiver: Identity, key: u64) -> Result<Vec<TxId>> {
        self.ensure_connected()?;
        let count = self.rpc().related_list_size(&receiver, key).await?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let ids = self.rpc().related_list(&receiver, key, 0, count).await?;
        tracing::debug!(correlation_key = key, count, fetched = ids.len(), "correlated list");
        Ok(ids)
    }

    /// List and resolve every correlated record to its payload bytes.
    pub async fn fetch_correlated(&self, receiver: Identity, key: u64) -> Result<Vec<Vec<u8>>> {
        let ids = self.list_correlated(receiver, key).await?;
        let mut payloads = Vec::with_capacity(ids.len());
        for id in &ids {
            payloads.push(self.get_by_tx_id(id).await?);
        }
        Ok(payloads)
    }
}

fn check_payload(payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(ClientError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(())
}
