//! Per-operation build context
//!
//! Resolved chain facts assembled once per operation call: chain ids,
//! sender, system-contract addresses, and the destination chain's base-token
//! facts. Owned exclusively by that call and never shared across concurrent
//! operations; the execution engine's nonce discipline depends on it.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use tracing::debug;

use crate::chain::{ChainClient, TxRequest};
use crate::config::BridgeAddresses;
use crate::constants::{is_eth, ETH_ADDRESS};
use crate::error::{BridgeError, BridgeResult, ErrorKind};
use crate::evm::contracts::Bridgehub;
use crate::revert::RevertDecoder;
use crate::types::FeeOverrides;

/// Operation family the context serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// L1→L2.
    Deposit,
    /// L2→L1.
    Withdraw,
    /// L2→L2, assembled with the deposit strategies.
    Interop,
}

/// Resolved, per-call facts every strategy works from.
pub struct BuildContext<'a> {
    pub kind: OperationKind,
    /// Chain the operation is initiated on.
    pub origin: &'a dyn ChainClient,
    /// Chain the transfer is realized on.
    pub dest: &'a dyn ChainClient,
    pub sender: Address,
    pub addresses: BridgeAddresses,
    pub dest_chain_id: u64,
    /// The destination chain's fee token; the ETH sentinel when native.
    pub base_token: Address,
    pub base_token_is_eth: bool,
    pub fee_overrides: Option<FeeOverrides>,
    pub decoder: &'a RevertDecoder,
}

impl<'a> BuildContext<'a> {
    /// Assemble a deposit/interop context, reading the destination's base
    /// token from the bridge entry point on the origin chain.
    pub async fn assemble(
        kind: OperationKind,
        origin: &'a dyn ChainClient,
        dest: &'a dyn ChainClient,
        sender: Address,
        addresses: BridgeAddresses,
        fee_overrides: Option<FeeOverrides>,
        decoder: &'a RevertDecoder,
    ) -> BridgeResult<BuildContext<'a>> {
        let dest_chain_id = dest.chain_id();
        let base_token = read_base_token(origin, addresses.bridgehub, dest_chain_id, decoder).await?;
        let base_token_is_eth = is_eth(base_token);

        debug!(
            dest_chain_id,
            base_token = %base_token,
            base_token_is_eth,
            "Assembled build context"
        );

        Ok(BuildContext {
            kind,
            origin,
            dest,
            sender,
            addresses,
            dest_chain_id,
            base_token: if base_token_is_eth { ETH_ADDRESS } else { base_token },
            base_token_is_eth,
            fee_overrides,
            decoder,
        })
    }

    /// Assemble a withdrawal context from pre-known base-token facts; no
    /// contract read is needed on the L2 side.
    pub fn assemble_withdraw(
        origin: &'a dyn ChainClient,
        dest: &'a dyn ChainClient,
        sender: Address,
        addresses: BridgeAddresses,
        base_token: Address,
        base_token_is_eth: bool,
        fee_overrides: Option<FeeOverrides>,
        decoder: &'a RevertDecoder,
    ) -> BuildContext<'a> {
        BuildContext {
            kind: OperationKind::Withdraw,
            origin,
            dest,
            sender,
            addresses,
            dest_chain_id: dest.chain_id(),
            base_token: if base_token_is_eth { ETH_ADDRESS } else { base_token },
            base_token_is_eth,
            fee_overrides,
            decoder,
        }
    }
}

/// Read `baseToken(chainId)` from the bridge entry point.
async fn read_base_token(
    client: &dyn ChainClient,
    bridgehub: Address,
    chain_id: u64,
    decoder: &RevertDecoder,
) -> BridgeResult<Address> {
    let call = Bridgehub::baseTokenCall {
        chainId: U256::from(chain_id),
    };
    let tx = TxRequest::call(Address::ZERO, bridgehub, call.abi_encode().into());

    let data = client.call(&tx).await.map_err(|e| {
        let revert = decoder.decode(&e);
        BridgeError::contract("read-base-token", e)
            .with_resource(format!("{bridgehub:?}"))
            .with_context("chain_id", chain_id)
            .with_revert(revert)
    })?;

    let decoded = Bridgehub::baseTokenCall::abi_decode_returns(&data, true).map_err(|e| {
        BridgeError::new(
            ErrorKind::Contract,
            "read-base-token",
            format!("undecodable baseToken return: {e}"),
        )
        .with_resource(format!("{bridgehub:?}"))
    })?;
    Ok(decoded._0)
}
