//! Chain client adapter contract
//!
//! The engine talks to both chains through the [`ChainClient`] trait so the
//! same planning/execution/tracking logic runs against any underlying RPC
//! binding. The alloy-backed implementation lives in [`crate::evm::client`];
//! tests drive the engine with a programmable mock.

use std::collections::BTreeMap;
use std::fmt;

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

// ============================================================================
// Unsent transaction request
// ============================================================================

/// A fully-specified but unsent call description.
///
/// Plans carry these; adapter implementations convert them to their client
/// library's request type at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    pub gas: Option<u64>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub nonce: Option<u64>,
}

impl TxRequest {
    /// A call to `to` carrying `data`.
    pub fn call(from: Address, to: Address, data: Bytes) -> Self {
        TxRequest {
            from: Some(from),
            to: Some(to),
            data,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

// ============================================================================
// Chain facts returned by the adapter
// ============================================================================

/// Current fee-market data. EIP-1559 fields when the chain supports them,
/// legacy gas price otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeMarket {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_price: Option<u128>,
}

impl FeeMarket {
    /// The per-gas price to use: max fee preferred, legacy gas price
    /// otherwise.
    pub fn effective_gas_price(&self) -> Option<u128> {
        self.max_fee_per_gas.or(self.gas_price)
    }
}

/// One log entry from a receipt.
#[derive(Debug, Clone, Default)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Transaction receipt facts the engine needs.
#[derive(Debug, Clone)]
pub struct ReceiptInfo {
    pub tx_hash: B256,
    pub success: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<LogEntry>,
}

/// Balance overrides applied during gas estimation, keyed by account.
///
/// Lets a not-yet-funded call simulate without reverting on balance checks.
#[derive(Debug, Clone, Default)]
pub struct StateOverrides {
    pub balances: BTreeMap<Address, U256>,
}

impl StateOverrides {
    pub fn balance(address: Address, balance: U256) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(address, balance);
        StateOverrides { balances }
    }
}

// ============================================================================
// Adapter error
// ============================================================================

/// Error raised by a chain client.
///
/// Carries the raw revert payload when the underlying node returned one, and
/// a cause chain mirroring how RPC libraries nest their error objects. The
/// revert decoder probes the chain top-down (see [`crate::revert`]).
#[derive(Debug, Clone, Default)]
pub struct ClientError {
    pub message: String,
    pub data: Option<Bytes>,
    pub cause: Option<Box<ClientError>>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        ClientError {
            message: message.into(),
            data: None,
            cause: None,
        }
    }

    pub fn with_data(mut self, data: Bytes) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_cause(mut self, cause: ClientError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The full message chain, outermost first.
    pub fn full_message(&self) -> String {
        let mut parts = vec![self.message.clone()];
        let mut cur = self.cause.as_deref();
        while let Some(err) = cur {
            if !err.message.is_empty() {
                parts.push(err.message.clone());
            }
            cur = err.cause.as_deref();
        }
        parts.join(": ")
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_message())
    }
}

impl std::error::Error for ClientError {}

// ============================================================================
// Adapter trait
// ============================================================================

/// The contract every chain binding implements for the engine.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Chain id this client is connected to.
    fn chain_id(&self) -> u64;

    /// Read-only contract call, returns the raw return data.
    async fn call(&self, tx: &TxRequest) -> Result<Bytes, ClientError>;

    /// Gas estimate for a pending call, optionally under balance overrides.
    async fn estimate_gas(
        &self,
        tx: &TxRequest,
        overrides: Option<&StateOverrides>,
    ) -> Result<u64, ClientError>;

    /// Current fee-market data.
    async fn fee_market(&self) -> Result<FeeMarket, ClientError>;

    /// Native balance of an account.
    async fn balance(&self, address: Address) -> Result<U256, ClientError>;

    /// Next nonce for an account.
    async fn transaction_count(&self, address: Address) -> Result<u64, ClientError>;

    /// Send a state-changing call; returns its transaction hash.
    async fn send(&self, tx: &TxRequest) -> Result<B256, ClientError>;

    /// Fetch a receipt. `Ok(None)` means "not found yet", a distinguishable,
    /// expected condition rather than an error.
    async fn receipt(&self, tx_hash: B256) -> Result<Option<ReceiptInfo>, ClientError>;

    /// Block until the receipt for `tx_hash` is available.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ReceiptInfo, ClientError>;
}
