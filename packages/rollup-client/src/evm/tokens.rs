//! ERC-20 read helpers over the chain adapter
//!
//! Strategies, the execution engine, and tests all read token state through
//! these so the mock client exercises the same code path as the live one.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::chain::{ChainClient, TxRequest};
use crate::error::{BridgeError, BridgeResult};
use crate::evm::contracts::ERC20;

/// Current allowance of (owner → spender) on `token`.
pub async fn allowance(
    client: &dyn ChainClient,
    token: Address,
    owner: Address,
    spender: Address,
) -> BridgeResult<U256> {
    let call = ERC20::allowanceCall { owner, spender };
    let tx = TxRequest::call(owner, token, call.abi_encode().into());
    let data = client
        .call(&tx)
        .await
        .map_err(|e| {
            BridgeError::contract("read-allowance", e)
                .with_resource(format!("{token:?}"))
                .with_context("owner", format!("{owner:?}"))
                .with_context("spender", format!("{spender:?}"))
        })?;
    let decoded = ERC20::allowanceCall::abi_decode_returns(&data, true).map_err(|e| {
        BridgeError::new(
            crate::error::ErrorKind::Contract,
            "read-allowance",
            format!("undecodable allowance return: {e}"),
        )
        .with_resource(format!("{token:?}"))
    })?;
    Ok(decoded._0)
}

/// ERC-20 balance of `account` on `token`.
pub async fn balance_of(
    client: &dyn ChainClient,
    token: Address,
    account: Address,
) -> BridgeResult<U256> {
    let call = ERC20::balanceOfCall { account };
    let tx = TxRequest::call(account, token, call.abi_encode().into());
    let data = client.call(&tx).await.map_err(|e| {
        BridgeError::contract("read-balance", e).with_resource(format!("{token:?}"))
    })?;
    let decoded = ERC20::balanceOfCall::abi_decode_returns(&data, true).map_err(|e| {
        BridgeError::new(
            crate::error::ErrorKind::Contract,
            "read-balance",
            format!("undecodable balance return: {e}"),
        )
        .with_resource(format!("{token:?}"))
    })?;
    Ok(decoded._0)
}

/// Token decimals.
pub async fn decimals(client: &dyn ChainClient, token: Address) -> BridgeResult<u8> {
    let call = ERC20::decimalsCall {};
    let tx = TxRequest::call(Address::ZERO, token, call.abi_encode().into());
    let data = client.call(&tx).await.map_err(|e| {
        BridgeError::contract("read-decimals", e).with_resource(format!("{token:?}"))
    })?;
    let decoded = ERC20::decimalsCall::abi_decode_returns(&data, true).map_err(|e| {
        BridgeError::new(
            crate::error::ErrorKind::Contract,
            "read-decimals",
            format!("undecodable decimals return: {e}"),
        )
        .with_resource(format!("{token:?}"))
    })?;
    Ok(decoded._0)
}

/// An unsent `approve(spender, amount)` call from `owner`.
pub fn approve_request(owner: Address, token: Address, spender: Address, amount: U256) -> TxRequest {
    let call = ERC20::approveCall { spender, amount };
    TxRequest::call(owner, token, call.abi_encode().into())
}
