// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! WASM contract deployment and invocation.
//!
//! State-changing calls are durable only after consensus finality. Instead
//! of a fixed settle sleep, the invoker polls the transaction until it is
//! queryable, with exponential backoff under a bounded deadline.

use std::time::{Duration, Instant};

use crate::error::{codes, ClientError, Result};
use crate::rpc::{CallContract, DeployContract, LedgerRpc};
use crate::session::Session;
use crate::types::{ContractHandle, Identity, SubmitOutcome, TxId, VmType};
use crate::wasm::WasmParams;

/// How long and how eagerly to poll for finality after a commit.
#[derive(Clone, Debug)]
pub struct FinalityPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub deadline: Duration,
}

impl Default for FinalityPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(3),
            deadline: Duration::from_secs(30),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// Read-only invocation against local node state. Must not mutate the
    /// ledger and never waits for finality.
    Local,
    /// State-changing call; the receipt is durable only after finality.
    Commit,
}

impl<R: LedgerRpc> Session<R> {
    /// Deploy WASM bytecode under a fresh contract identity derived from
    /// `name`, then wait for finality.
    pub async fn deploy_contract(
        &self,
        name: &str,
        bytecode: Vec<u8>,
        ctor: WasmParams,
    ) -> Result<(ContractHandle, SubmitOutcome)> {
        self.ensure_connected()?;
        if bytecode.is_empty() {
            return Err(ClientError::Precondition("contract bytecode is empty".to_string()));
        }

        let contract = Identity::derive(name.as_bytes(), self.algorithm());
        let outcome = self
            .rpc()
            .deploy_contract(DeployContract {
                sender: self.identity(),
                contract,
                bytecode,
                vm: VmType::Wasm,
                ctor_args: ctor.into_arg_bytes(),
                amount: 0,
            })
            .await?;
        let outcome = outcome.into_checked()?;

        self.wait_for_finality(&outcome.tx_id).await?;
        tracing::info!(contract = %contract, tx_id = %outcome.tx_id, "contract deployed");

        Ok((ContractHandle { identity: contract, vm: VmType::Wasm }, outcome))
    }

    /// Invoke a contract function. Commit calls block until finality.
    pub async fn call_contract(
        &self,
        handle: &ContractHandle,
        params: WasmParams,
        kind: CallKind,
    ) -> Result<SubmitOutcome> {
        self.ensure_connected()?;

        let function = params.function().to_string();
        let outcome = self
            .rpc()
            .call_contract(CallContract {
                sender: self.identity(),
                contract: handle.identity,
                function: function.clone(),
                args: params.into_arg_bytes(),
                amount: 0,
                vm: handle.vm,
                local: kind == CallKind::Local,
            })
            .await?;
        let outcome = outcome.into_checked()?;

        if kind == CallKind::Commit {
            self.wait_for_finality(&outcome.tx_id).await?;
        }
        tracing::debug!(function, tx_id = %outcome.tx_id, ?kind, "contract call complete");
        Ok(outcome)
    }

    /// Poll the transaction until the node can serve it, backing off
    /// exponentially. `TX_NOT_FOUND` means "not yet"; every other error
    /// propagates.
    pub async fn wait_for_finality(&self, tx_id: &TxId) -> Result<()> {
        let policy = self.finality_policy().clone();
        let start = Instant::now();
        let mut backoff = policy.initial_backoff;

        loop {
            match self.rpc().query_transaction(tx_id).await {
                Ok(_) => return Ok(()),
                Err(ClientError::Ledger { code, .. }) if code == codes::TX_NOT_FOUND => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() + backoff > policy.deadline {
                return Err(ClientError::FinalityTimeout { tx_id: *tx_id });
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(policy.max_backoff);
        }
    }
}
