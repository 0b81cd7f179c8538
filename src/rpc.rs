//! The narrow RPC surface the ledger service exposes to this client.
//!
//! Everything behind this trait belongs to the external service:
//! transaction signing, consensus, the contract VM and chain storage. The
//! client only sequences calls against it. `HttpTransport` implements it
//! over mutually-authenticated HTTPS; tests substitute an in-process
//! ledger.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{BlockHeader, Identity, SubmitOutcome, TransactionRecord, TxId, VmType};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositData {
    pub sender: Identity,
    pub receiver: Identity,
    #[serde(with = "crate::types::hex_vec")]
    pub payload: Vec<u8>,
    /// Native-asset amount. Unused by evidence flows, always zero.
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelatedDepositData {
    pub sender: Identity,
    pub receiver: Identity,
    #[serde(with = "crate::types::hex_vec")]
    pub payload: Vec<u8>,
    /// Application-supplied tag grouping records for joint retrieval.
    pub correlation_key: u64,
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeployContract {
    pub sender: Identity,
    pub contract: Identity,
    #[serde(with = "crate::types::hex_vec")]
    pub bytecode: Vec<u8>,
    pub vm: VmType,
    #[serde(with = "crate::types::hex_vec")]
    pub ctor_args: Vec<u8>,
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallContract {
    pub sender: Identity,
    pub contract: Identity,
    pub function: String,
    #[serde(with = "crate::types::hex_vec")]
    pub args: Vec<u8>,
    pub amount: u64,
    pub vm: VmType,
    /// Read-only invocation: executed against local state, must not
    /// mutate the ledger.
    pub local: bool,
}

#[allow(async_fn_in_trait)]
pub trait LedgerRpc {
    async fn query_last_block_header(&self) -> Result<BlockHeader>;

    async fn deploy_contract(&self, req: DeployContract) -> Result<SubmitOutcome>;

    async fn call_contract(&self, req: CallContract) -> Result<SubmitOutcome>;

    async fn deposit_data(&self, req: DepositData) -> Result<SubmitOutcome>;

    async fn related_deposit_data(&self, req: RelatedDepositData) -> Result<SubmitOutcome>;

    /// Fetch a stored transaction. Unknown ids surface as
    /// `ClientError::Ledger` with code `codes::TX_NOT_FOUND`.
    async fn query_transaction(&self, tx_id: &TxId) -> Result<TransactionRecord>;

    /// Number of records stored under (receiver, correlation key).
    async fn related_list_size(&self, receiver: &Identity, key: u64) -> Result<u64>;

    /// Transaction ids under (receiver, correlation key), oldest first,
    /// one page of `limit` starting at `offset`.
    async fn related_list(
        &self,
        receiver: &Identity,
        key: u64,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TxId>>;
}
