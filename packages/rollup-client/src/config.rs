#![allow(dead_code)]

use std::env;
use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::constants::{
    L2_ASSET_ROUTER_ADDRESS, L2_BASE_TOKEN_ADDRESS, L2_NATIVE_TOKEN_VAULT_ADDRESS,
};
use crate::error::{BridgeError, BridgeResult};

/// Main configuration for the bridge client.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub l1: ChainConfig,
    pub l2: ChainConfig,
    pub addresses: BridgeAddresses,
}

/// One chain endpoint.
#[derive(Clone, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Private key for signing (optional, required for write operations)
    #[serde(default)]
    pub private_key: Option<String>,
    /// Whether this chain pays execution fees in the native asset.
    /// Pre-known for withdrawal contexts; deposits read it from the
    /// bridge entry point instead.
    #[serde(default)]
    pub base_token_is_eth: bool,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("private_key", &"<redacted>")
            .field("base_token_is_eth", &self.base_token_is_eth)
            .finish()
    }
}

/// Resolved system-contract addresses the engine targets.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BridgeAddresses {
    /// Bridge entry point on the origin chain.
    pub bridgehub: Address,
    /// Shared L1 asset router (the approval spender for deposits).
    pub l1_asset_router: Address,
    /// L2 asset router (the approval spender for withdrawals).
    #[serde(default = "default_l2_asset_router")]
    pub l2_asset_router: Address,
    /// L2 native-token-vault.
    #[serde(default = "default_l2_native_token_vault")]
    pub l2_native_token_vault: Address,
    /// Fixed L2 base-token system contract.
    #[serde(default = "default_l2_base_token")]
    pub l2_base_token: Address,
}

fn default_l2_asset_router() -> Address {
    L2_ASSET_ROUTER_ADDRESS
}

fn default_l2_native_token_vault() -> Address {
    L2_NATIVE_TOKEN_VAULT_ADDRESS
}

fn default_l2_base_token() -> Address {
    L2_BASE_TOKEN_ADDRESS
}

impl BridgeAddresses {
    /// Addresses with the fixed L2 system contracts and a given entry
    /// point / router pair.
    pub fn new(bridgehub: Address, l1_asset_router: Address) -> Self {
        BridgeAddresses {
            bridgehub,
            l1_asset_router,
            l2_asset_router: L2_ASSET_ROUTER_ADDRESS,
            l2_native_token_vault: L2_NATIVE_TOKEN_VAULT_ADDRESS,
            l2_base_token: L2_BASE_TOKEN_ADDRESS,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables:
    /// `L1_RPC_URL`, `L1_CHAIN_ID`, `L2_RPC_URL`, `L2_CHAIN_ID`,
    /// `BRIDGEHUB_ADDRESS`, `L1_ASSET_ROUTER_ADDRESS`, optional
    /// `PRIVATE_KEY` and `BASE_TOKEN_IS_ETH`.
    pub fn from_env() -> BridgeResult<Self> {
        let addresses = BridgeAddresses::new(
            parse_address_var("BRIDGEHUB_ADDRESS")?,
            parse_address_var("L1_ASSET_ROUTER_ADDRESS")?,
        );

        let private_key = env::var("PRIVATE_KEY").ok();
        let base_token_is_eth = env::var("BASE_TOKEN_IS_ETH")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        Ok(BridgeConfig {
            l1: ChainConfig {
                rpc_url: require_var("L1_RPC_URL")?,
                chain_id: parse_u64_var("L1_CHAIN_ID")?,
                private_key: private_key.clone(),
                base_token_is_eth: true,
            },
            l2: ChainConfig {
                rpc_url: require_var("L2_RPC_URL")?,
                chain_id: parse_u64_var("L2_CHAIN_ID")?,
                private_key,
                base_token_is_eth,
            },
            addresses,
        })
    }
}

fn require_var(name: &str) -> BridgeResult<String> {
    env::var(name).map_err(|_| {
        BridgeError::validation("load-config", format!("missing environment variable {}", name))
    })
}

fn parse_u64_var(name: &str) -> BridgeResult<u64> {
    require_var(name)?.parse::<u64>().map_err(|e| {
        BridgeError::validation("load-config", format!("invalid {}: {}", name, e))
    })
}

fn parse_address_var(name: &str) -> BridgeResult<Address> {
    Address::from_str(&require_var(name)?).map_err(|e| {
        BridgeError::validation("load-config", format!("invalid {}: {}", name, e))
    })
}
