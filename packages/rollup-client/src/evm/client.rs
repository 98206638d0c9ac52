//! Alloy-backed chain client
//!
//! Implements the [`ChainClient`] adapter over an alloy HTTP provider.
//! Reads go through a shared read-only provider; writes build a
//! wallet-filled provider per send, matching how the relayer-side tooling
//! submits transactions.

use std::time::Duration;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, Bytes, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{TransactionInput, TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::{
        http::{Client, Http},
        TransportError,
    },
};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::chain::{
    ChainClient, ClientError, FeeMarket, LogEntry, ReceiptInfo, StateOverrides, TxRequest,
};

/// Receipt polling policy.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        ReceiptPolicy {
            poll_interval_ms: 1_000,
            timeout_ms: 120_000,
        }
    }
}

/// EVM chain client over an alloy HTTP provider.
pub struct EvmChainClient {
    provider: RootProvider<Http<Client>>,
    rpc_url: String,
    chain_id: u64,
    signer: Option<PrivateKeySigner>,
    policy: ReceiptPolicy,
}

impl EvmChainClient {
    /// Create a read-only client.
    pub fn new_readonly(rpc_url: &str, chain_id: u64) -> Result<Self, ClientError> {
        let url = rpc_url
            .parse()
            .map_err(|e| ClientError::new(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(url);

        info!(rpc_url = %rpc_url, chain_id = chain_id, "Created read-only EVM client");

        Ok(EvmChainClient {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id,
            signer: None,
            policy: ReceiptPolicy::default(),
        })
    }

    /// Create a client with signing capabilities.
    pub fn new_with_signer(
        rpc_url: &str,
        chain_id: u64,
        private_key: &str,
    ) -> Result<Self, ClientError> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| ClientError::new(format!("Invalid private key: {}", e)))?;
        let mut client = Self::new_readonly(rpc_url, chain_id)?;

        info!(chain_id = chain_id, address = %signer.address(), "EVM client signer configured");

        client.signer = Some(signer);
        Ok(client)
    }

    pub fn with_receipt_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Address of the configured signer, if any.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    fn to_alloy_request(tx: &TxRequest) -> TransactionRequest {
        let mut req = TransactionRequest::default();
        req.from = tx.from;
        req.to = tx.to.map(Into::into);
        req.value = Some(tx.value);
        req.input = TransactionInput::new(tx.data.clone());
        req.gas = tx.gas;
        req.max_fee_per_gas = tx.max_fee_per_gas;
        req.max_priority_fee_per_gas = tx.max_priority_fee_per_gas;
        req.nonce = tx.nonce;
        req
    }

    fn convert_receipt(receipt: TransactionReceipt) -> ReceiptInfo {
        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| LogEntry {
                address: log.address(),
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
            })
            .collect();

        ReceiptInfo {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            block_number: receipt.block_number,
            logs,
        }
    }
}

/// Convert a transport error, carrying the revert payload when the node
/// returned one.
fn to_client_error(err: TransportError) -> ClientError {
    let mut client_err = ClientError::new(err.to_string());
    if let Some(payload) = err.as_error_resp() {
        if let Some(raw) = payload.data.as_ref() {
            let text = raw.get().trim_matches('"');
            if let Some(hex_data) = text.strip_prefix("0x") {
                if let Ok(bytes) = hex::decode(hex_data) {
                    client_err = ClientError::new(payload.message.clone())
                        .with_data(Bytes::from(bytes))
                        .with_cause(client_err);
                }
            }
        }
    }
    client_err
}

#[async_trait]
impl ChainClient for EvmChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn call(&self, tx: &TxRequest) -> Result<Bytes, ClientError> {
        let req = Self::to_alloy_request(tx);
        self.provider.call(&req).await.map_err(to_client_error)
    }

    async fn estimate_gas(
        &self,
        tx: &TxRequest,
        overrides: Option<&StateOverrides>,
    ) -> Result<u64, ClientError> {
        let req = Self::to_alloy_request(tx);

        match overrides {
            None => self
                .provider
                .estimate_gas(&req)
                .await
                .map_err(to_client_error),
            Some(state) => {
                // Balance overrides go through a raw request; the typed
                // estimate surface has no override parameter.
                let mut override_map = serde_json::Map::new();
                for (address, balance) in &state.balances {
                    override_map.insert(
                        format!("{address:?}"),
                        json!({ "balance": format!("0x{balance:x}") }),
                    );
                }
                let gas: U256 = self
                    .provider
                    .client()
                    .request("eth_estimateGas", (req, "latest", override_map))
                    .await
                    .map_err(to_client_error)?;
                Ok(gas.saturating_to::<u64>())
            }
        }
    }

    async fn fee_market(&self) -> Result<FeeMarket, ClientError> {
        match self.provider.estimate_eip1559_fees(None).await {
            Ok(estimate) => Ok(FeeMarket {
                max_fee_per_gas: Some(estimate.max_fee_per_gas),
                max_priority_fee_per_gas: Some(estimate.max_priority_fee_per_gas),
                gas_price: None,
            }),
            // Pre-1559 chains: fall back to the legacy gas price.
            Err(_) => {
                let gas_price = self
                    .provider
                    .get_gas_price()
                    .await
                    .map_err(to_client_error)?;
                Ok(FeeMarket {
                    max_fee_per_gas: None,
                    max_priority_fee_per_gas: None,
                    gas_price: Some(gas_price),
                })
            }
        }
    }

    async fn balance(&self, address: Address) -> Result<U256, ClientError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(to_client_error)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ClientError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(to_client_error)
    }

    async fn send(&self, tx: &TxRequest) -> Result<B256, ClientError> {
        let signer = self
            .signer
            .clone()
            .ok_or_else(|| ClientError::new("client has no signer configured"))?;
        let wallet = EthereumWallet::from(signer);

        let url = self
            .rpc_url
            .parse()
            .map_err(|e| ClientError::new(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_http(url);

        let req = Self::to_alloy_request(tx);
        let pending = provider
            .send_transaction(req)
            .await
            .map_err(to_client_error)?;
        let tx_hash = *pending.tx_hash();

        debug!(tx_hash = %tx_hash, chain_id = self.chain_id, "Transaction sent");
        Ok(tx_hash)
    }

    async fn receipt(&self, tx_hash: B256) -> Result<Option<ReceiptInfo>, ClientError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(to_client_error)?;
        Ok(receipt.map(Self::convert_receipt))
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ReceiptInfo, ClientError> {
        let interval = Duration::from_millis(self.policy.poll_interval_ms);
        let deadline = std::time::Instant::now() + Duration::from_millis(self.policy.timeout_ms);

        loop {
            if let Some(receipt) = self.receipt(tx_hash).await? {
                return Ok(receipt);
            }
            if std::time::Instant::now() >= deadline {
                return Err(ClientError::new(format!(
                    "timed out waiting for receipt of {tx_hash}"
                )));
            }
            tokio::time::sleep(interval).await;
        }
    }
}
