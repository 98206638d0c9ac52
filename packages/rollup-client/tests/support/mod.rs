//! Programmable mock chain client for integration tests
//!
//! Serves the same contract-call surface the engine reads (allowance, base
//! token, base cost, asset ids) from in-memory state, records every sent
//! transaction, and mints deterministic receipts.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use rollup_client::chain::{
    ChainClient, ClientError, FeeMarket, LogEntry, ReceiptInfo, StateOverrides, TxRequest,
};
use rollup_client::evm::contracts::{Bridgehub, L2NativeTokenVault, ERC20};

#[derive(Default)]
struct MockState {
    balances: HashMap<Address, U256>,
    /// (token, owner, spender) -> allowance
    allowances: HashMap<(Address, Address, Address), U256>,
    /// chain id -> base token served by the bridge entry point
    base_tokens: HashMap<u64, Address>,
    base_cost: U256,
    /// When set, the base-cost oracle reverts with this payload.
    base_cost_revert: Option<Bytes>,
    /// Tokens the native-token-vault knows about.
    registered_tokens: HashSet<Address>,
    fee_market: FeeMarket,
    /// Gas estimate served, or a failure when `None`.
    gas_estimate: Option<u64>,
    nonce: u64,
    receipts: HashMap<B256, ReceiptInfo>,
    /// Send indexes whose minted receipt reports failure.
    failed_receipt_indexes: HashSet<usize>,
    /// When true, `send` itself errors.
    fail_sends: bool,
    sent: Vec<TxRequest>,
}

pub struct MockChainClient {
    chain_id: u64,
    state: Mutex<MockState>,
}

impl MockChainClient {
    pub fn new(chain_id: u64) -> Self {
        MockChainClient {
            chain_id,
            state: Mutex::new(MockState {
                fee_market: FeeMarket {
                    max_fee_per_gas: Some(2_000_000_000),
                    max_priority_fee_per_gas: Some(1_000_000_000),
                    gas_price: None,
                },
                gas_estimate: Some(100_000),
                ..MockState::default()
            }),
        }
    }

    pub fn with_balance(self, address: Address, balance: U256) -> Self {
        self.state.lock().unwrap().balances.insert(address, balance);
        self
    }

    pub fn with_allowance(
        self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Self {
        self.set_allowance(token, owner, spender, amount);
        self
    }

    pub fn with_base_token(self, chain_id: u64, base_token: Address) -> Self {
        self.state
            .lock()
            .unwrap()
            .base_tokens
            .insert(chain_id, base_token);
        self
    }

    pub fn with_base_cost(self, base_cost: U256) -> Self {
        self.state.lock().unwrap().base_cost = base_cost;
        self
    }

    pub fn with_base_cost_revert(self, data: Bytes) -> Self {
        self.state.lock().unwrap().base_cost_revert = Some(data);
        self
    }

    pub fn with_registered_token(self, token: Address) -> Self {
        self.state.lock().unwrap().registered_tokens.insert(token);
        self
    }

    pub fn with_gas_estimate_failure(self) -> Self {
        self.state.lock().unwrap().gas_estimate = None;
        self
    }

    pub fn with_nonce(self, nonce: u64) -> Self {
        self.state.lock().unwrap().nonce = nonce;
        self
    }

    pub fn with_receipt(self, receipt: ReceiptInfo) -> Self {
        self.state
            .lock()
            .unwrap()
            .receipts
            .insert(receipt.tx_hash, receipt);
        self
    }

    pub fn with_failed_receipt_for_send(self, index: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .failed_receipt_indexes
            .insert(index);
        self
    }

    pub fn with_failing_sends(self) -> Self {
        self.state.lock().unwrap().fail_sends = true;
        self
    }

    /// Mutate an allowance after construction (out-of-band approval).
    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }
}

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

fn address_word(address: Address) -> Bytes {
    let mut out = vec![0u8; 12];
    out.extend_from_slice(address.as_slice());
    Bytes::from(out)
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, tx: &TxRequest) -> Result<Bytes, ClientError> {
        let state = self.state.lock().unwrap();
        let data = tx.data.as_ref();
        if data.len() < 4 {
            return Err(ClientError::new("call without calldata"));
        }
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        if selector == ERC20::allowanceCall::SELECTOR {
            let call = ERC20::allowanceCall::abi_decode(data, true)
                .map_err(|e| ClientError::new(e.to_string()))?;
            let token = tx.to.expect("allowance call without target");
            let allowance = state
                .allowances
                .get(&(token, call.owner, call.spender))
                .copied()
                .unwrap_or(U256::ZERO);
            return Ok(word(allowance));
        }

        if selector == ERC20::balanceOfCall::SELECTOR {
            let call = ERC20::balanceOfCall::abi_decode(data, true)
                .map_err(|e| ClientError::new(e.to_string()))?;
            let balance = state.balances.get(&call.account).copied().unwrap_or(U256::ZERO);
            return Ok(word(balance));
        }

        if selector == Bridgehub::baseTokenCall::SELECTOR {
            let call = Bridgehub::baseTokenCall::abi_decode(data, true)
                .map_err(|e| ClientError::new(e.to_string()))?;
            let chain_id: u64 = call.chainId.saturating_to();
            let base_token = state
                .base_tokens
                .get(&chain_id)
                .copied()
                .ok_or_else(|| ClientError::new(format!("unknown chain {chain_id}")))?;
            return Ok(address_word(base_token));
        }

        if selector == Bridgehub::l2TransactionBaseCostCall::SELECTOR {
            if let Some(revert) = &state.base_cost_revert {
                return Err(ClientError::new("execution reverted").with_data(revert.clone()));
            }
            return Ok(word(state.base_cost));
        }

        if selector == L2NativeTokenVault::assetIdCall::SELECTOR {
            let call = L2NativeTokenVault::assetIdCall::abi_decode(data, true)
                .map_err(|e| ClientError::new(e.to_string()))?;
            if state.registered_tokens.contains(&call.token) {
                return Ok(Bytes::from(keccak256(call.token.as_slice()).to_vec()));
            }
            return Ok(word(U256::ZERO));
        }

        Err(ClientError::new(format!(
            "unexpected call selector 0x{}",
            hex::encode(selector)
        )))
    }

    async fn estimate_gas(
        &self,
        _tx: &TxRequest,
        _overrides: Option<&StateOverrides>,
    ) -> Result<u64, ClientError> {
        self.state
            .lock()
            .unwrap()
            .gas_estimate
            .ok_or_else(|| ClientError::new("execution reverted during estimation"))
    }

    async fn fee_market(&self) -> Result<FeeMarket, ClientError> {
        Ok(self.state.lock().unwrap().fee_market)
    }

    async fn balance(&self, address: Address) -> Result<U256, ClientError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .balances
            .get(&address)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, ClientError> {
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn send(&self, tx: &TxRequest) -> Result<B256, ClientError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_sends {
            return Err(ClientError::new("send rejected by node"));
        }

        let index = state.sent.len();
        state.sent.push(tx.clone());

        let tx_hash = keccak256((index as u64).to_be_bytes());
        let success = !state.failed_receipt_indexes.contains(&index);
        state.receipts.insert(
            tx_hash,
            ReceiptInfo {
                tx_hash,
                success,
                block_number: Some(index as u64 + 1),
                logs: Vec::new(),
            },
        );
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: B256) -> Result<Option<ReceiptInfo>, ClientError> {
        Ok(self.state.lock().unwrap().receipts.get(&tx_hash).cloned())
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ReceiptInfo, ClientError> {
        self.state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| ClientError::new(format!("no receipt for {tx_hash}")))
    }
}

/// Opt-in log output while debugging tests: `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A receipt carrying arbitrary logs, keyed by an explicit hash.
pub fn receipt_with_logs(tx_hash: B256, success: bool, logs: Vec<LogEntry>) -> ReceiptInfo {
    ReceiptInfo {
        tx_hash,
        success,
        block_number: Some(1),
        logs,
    }
}

/// ABI encoding of `Error(string)` with the given reason.
pub fn encode_error_string(reason: &str) -> Bytes {
    let mut data = rollup_client::revert::ERROR_STRING_SELECTOR.to_vec();
    data.extend_from_slice(&U256::from(32).to_be_bytes::<32>());
    data.extend_from_slice(&U256::from(reason.len()).to_be_bytes::<32>());
    let mut body = reason.as_bytes().to_vec();
    while body.len() % 32 != 0 {
        body.push(0);
    }
    data.extend_from_slice(&body);
    Bytes::from(data)
}
