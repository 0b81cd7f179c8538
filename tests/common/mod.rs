//! In-process ledger double implementing the RPC surface.
//!
//! Behaves like the node for the flows under test: deposits assign
//! transaction ids, correlated records list oldest first, and the bundled
//! deposit contract (Init / Deposit / GetCount / QueryMessage) is emulated
//! in memory. Knobs let tests inject receipt rejections and delay or
//! withhold finality.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use notary_client::error::{codes, ClientError, Result};
use notary_client::rpc::{
    CallContract, DeployContract, DepositData, LedgerRpc, RelatedDepositData,
};
use notary_client::types::{
    BlockHeader, Identity, SubmitOutcome, TransactionReceipt, TransactionRecord, TxId,
};
use notary_client::wasm::{self, WasmOutput};
use notary_client::DigestAlgorithm;

/// Queries a held transaction absorbs before becoming visible.
const HOLD_FOREVER: u32 = u32::MAX;

#[derive(Clone, Default)]
pub struct MockLedger {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    /// Every RPC round trip, including queries.
    calls: AtomicUsize,
}

#[derive(Default)]
struct State {
    seq: u64,
    txs: HashMap<TxId, Vec<u8>>,
    /// Remaining queries to absorb before a tx becomes queryable.
    pending: HashMap<TxId, u32>,
    related: HashMap<(Identity, u64), Vec<TxId>>,
    contracts: HashMap<Identity, ContractState>,
    /// Receipt code to return on the next submission instead of success.
    fail_next: Option<u32>,
    /// Finality hold applied to each subsequently committed tx.
    hold: u32,
}

#[derive(Default)]
struct ContractState {
    initialized: bool,
    count: u64,
    messages: HashMap<TxId, String>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Make the next submission come back with `code` in the receipt.
    pub fn fail_next_submission(&self, code: u32) {
        self.inner.state.lock().unwrap().fail_next = Some(code);
    }

    /// Each tx committed from now on absorbs `n` queries before it is
    /// visible, emulating consensus lag.
    pub fn hold_finality(&self, n: u32) {
        self.inner.state.lock().unwrap().hold = n;
    }

    /// Committed txs never become queryable.
    pub fn swallow_commits(&self) {
        self.hold_finality(HOLD_FOREVER);
    }

    fn tick(&self) {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn submit(&self, state: &mut State, data: Vec<u8>) -> SubmitOutcome {
        state.seq += 1;
        let mut seed = state.seq.to_le_bytes().to_vec();
        seed.extend_from_slice(&data);
        let tx_id = TxId::from_bytes(DigestAlgorithm::Sha256.digest(&seed));

        state.txs.insert(tx_id, data);
        if state.hold > 0 {
            state.pending.insert(tx_id, state.hold);
        }
        SubmitOutcome {
            tx_id,
            receipt: TransactionReceipt { result: codes::OK, output: Vec::new() },
        }
    }

    fn rejected(code: u32) -> SubmitOutcome {
        SubmitOutcome {
            tx_id: TxId::from_bytes([0u8; 32]),
            receipt: TransactionReceipt { result: code, output: Vec::new() },
        }
    }

    fn take_failure(state: &mut State) -> Option<u32> {
        state.fail_next.take()
    }
}

impl LedgerRpc for MockLedger {
    async fn query_last_block_header(&self) -> Result<BlockHeader> {
        self.tick();
        let state = self.inner.state.lock().unwrap();
        let height = state.seq;
        Ok(BlockHeader {
            height,
            hash: hex::encode(DigestAlgorithm::Sha256.digest(&height.to_le_bytes())),
            timestamp: height * 1_000,
        })
    }

    async fn deposit_data(&self, req: DepositData) -> Result<SubmitOutcome> {
        self.tick();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(code) = Self::take_failure(&mut state) {
            return Ok(Self::rejected(code));
        }
        Ok(self.submit(&mut state, req.payload))
    }

    async fn related_deposit_data(&self, req: RelatedDepositData) -> Result<SubmitOutcome> {
        self.tick();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(code) = Self::take_failure(&mut state) {
            return Ok(Self::rejected(code));
        }
        let outcome = self.submit(&mut state, req.payload);
        state
            .related
            .entry((req.receiver, req.correlation_key))
            .or_default()
            .push(outcome.tx_id);
        Ok(outcome)
    }

    async fn deploy_contract(&self, req: DeployContract) -> Result<SubmitOutcome> {
        self.tick();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(code) = Self::take_failure(&mut state) {
            return Ok(Self::rejected(code));
        }
        state.contracts.insert(req.contract, ContractState::default());
        Ok(self.submit(&mut state, req.bytecode))
    }

    async fn call_contract(&self, req: CallContract) -> Result<SubmitOutcome> {
        self.tick();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(code) = Self::take_failure(&mut state) {
            return Ok(Self::rejected(code));
        }
        if !state.contracts.contains_key(&req.contract) {
            return Ok(Self::rejected(codes::CONTRACT_REVERTED));
        }

        let mut args = WasmOutput::new(req.args);
        let (output, result) = {
            let contract = state.contracts.get_mut(&req.contract).unwrap();
            match req.function.as_str() {
                "Init" => {
                    contract.initialized = true;
                    (Vec::new(), codes::OK)
                }
                "Deposit" => {
                    if !contract.initialized {
                        (Vec::new(), codes::CONTRACT_REVERTED)
                    } else {
                        let message = args
                            .take_string()
                            .map_err(|_| ClientError::from_result_code(codes::BAD_TRANSACTION))?;
                        contract.count += 1;
                        // Keyed under the tx id assigned below; patch after submit.
                        (message.into_bytes(), codes::OK)
                    }
                }
                "GetCount" => (wasm::encode_u64(contract.count), codes::OK),
                "QueryMessage" => {
                    let raw = args
                        .take_bytes()
                        .map_err(|_| ClientError::from_result_code(codes::BAD_TRANSACTION))?;
                    let tx_id = TxId::from_slice(&raw)
                        .map_err(|_| ClientError::from_result_code(codes::BAD_TRANSACTION))?;
                    match contract.messages.get(&tx_id) {
                        Some(message) => (wasm::encode_string(message), codes::OK),
                        None => (Vec::new(), codes::CONTRACT_REVERTED),
                    }
                }
                _ => (Vec::new(), codes::CONTRACT_REVERTED),
            }
        };

        if result != codes::OK {
            return Ok(Self::rejected(result));
        }

        if req.local {
            // Read-only: no tx, no state mutation beyond what happened above.
            return Ok(SubmitOutcome {
                tx_id: TxId::from_bytes([0u8; 32]),
                receipt: TransactionReceipt { result: codes::OK, output },
            });
        }

        let mut outcome = self.submit(&mut state, output.clone());
        if req.function == "Deposit" {
            let message = String::from_utf8(output).unwrap_or_default();
            let contract = state.contracts.get_mut(&req.contract).unwrap();
            contract.messages.insert(outcome.tx_id, message);
        }
        outcome.receipt.output = Vec::new();
        Ok(outcome)
    }

    async fn query_transaction(&self, tx_id: &TxId) -> Result<TransactionRecord> {
        self.tick();
        let mut state = self.inner.state.lock().unwrap();
        if let Some(remaining) = state.pending.get_mut(tx_id) {
            if *remaining == HOLD_FOREVER {
                return Err(ClientError::from_result_code(codes::TX_NOT_FOUND));
            }
            *remaining -= 1;
            if *remaining == 0 {
                state.pending.remove(tx_id);
            }
            return Err(ClientError::from_result_code(codes::TX_NOT_FOUND));
        }
        match state.txs.get(tx_id) {
            Some(data) => Ok(TransactionRecord { data: data.clone(), timestamp: state.seq * 1_000 }),
            None => Err(ClientError::from_result_code(codes::TX_NOT_FOUND)),
        }
    }

    async fn related_list_size(&self, receiver: &Identity, key: u64) -> Result<u64> {
        self.tick();
        let state = self.inner.state.lock().unwrap();
        Ok(state.related.get(&(*receiver, key)).map_or(0, |v| v.len() as u64))
    }

    async fn related_list(
        &self,
        receiver: &Identity,
        key: u64,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TxId>> {
        self.tick();
        let state = self.inner.state.lock().unwrap();
        let ids = match state.related.get(&(*receiver, key)) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        let start = (offset as usize).min(ids.len());
        let end = start.saturating_add(limit as usize).min(ids.len());
        Ok(ids[start..end].to_vec())
    }
}

/// Session over a fresh mock, plus the mock handle for injection.
pub fn mock_session() -> (notary_client::Session<MockLedger>, MockLedger) {
    let ledger = MockLedger::new();
    let identity = Identity::derive(b"test-account", DigestAlgorithm::Sha256);
    let session = notary_client::Session::over(ledger.clone(), identity, DigestAlgorithm::Sha256);
    (session, ledger)
}
