//! Fee and gas quoting
//!
//! Origin-chain gas quotes, destination-chain gas modeling with protocol
//! overheads, and the base-cost oracle read. Estimation failures degrade to
//! documented fallbacks; only the base-cost read is allowed to abort an
//! operation.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use tracing::{debug, warn};

use crate::chain::{ChainClient, StateOverrides, TxRequest};
use crate::constants::{
    buffered_gas_limit, ENCODED_TX_SIZE_BYTES, ENCODED_TX_SIZE_BYTES_COMPACT,
    MEMORY_OVERHEAD_GAS_PER_BYTE, PUBDATA_BYTES, PUBDATA_BYTES_COMPACT,
};
use crate::error::{BridgeError, BridgeResult, ErrorKind};
use crate::evm::contracts::Bridgehub;
use crate::revert::RevertDecoder;
use crate::types::{DepositRoute, FeeOverrides, GasQuote};

/// Quote gas for an origin-chain transaction.
///
/// Fee fields resolve from `overrides`, else the transaction, else the live
/// fee market. An explicit gas limit (override or on the tx) short-circuits
/// estimation. Estimation failure falls back to `fallback_gas_limit`;
/// `Ok(None)` means "could not determine gas, proceed without an explicit
/// limit", not a hard failure.
pub async fn quote_l1_gas(
    client: &dyn ChainClient,
    tx: &TxRequest,
    overrides: Option<FeeOverrides>,
    fallback_gas_limit: Option<u64>,
) -> BridgeResult<Option<GasQuote>> {
    let overrides = overrides.unwrap_or_default();

    let mut max_fee = overrides.max_fee_per_gas.or(tx.max_fee_per_gas);
    let mut max_priority = overrides
        .max_priority_fee_per_gas
        .or(tx.max_priority_fee_per_gas);
    if max_fee.is_none() || max_priority.is_none() {
        let market = client
            .fee_market()
            .await
            .map_err(|e| BridgeError::rpc("read-fee-market", e))?;
        max_fee = max_fee.or_else(|| market.effective_gas_price());
        max_priority = max_priority.or(market.max_priority_fee_per_gas);
    }
    let max_fee = max_fee.ok_or_else(|| {
        BridgeError::new(
            ErrorKind::Rpc,
            "read-fee-market",
            "fee market returned neither max fee nor gas price",
        )
    })?;
    // Legacy chains quote no priority fee.
    let max_priority = max_priority.unwrap_or(0);

    if let Some(gas_limit) = overrides.gas_limit.or(tx.gas) {
        return Ok(Some(GasQuote {
            gas_limit,
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: max_priority,
            gas_per_pubdata: None,
        }));
    }

    match client.estimate_gas(tx, None).await {
        Ok(estimate) => Ok(Some(GasQuote {
            gas_limit: buffered_gas_limit(estimate),
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: max_priority,
            gas_per_pubdata: None,
        })),
        Err(e) => {
            warn!(error = %e, "Gas estimation failed, using fallback limit");
            Ok(fallback_gas_limit.map(|gas_limit| GasQuote {
                gas_limit,
                max_fee_per_gas: max_fee,
                max_priority_fee_per_gas: max_priority,
                gas_per_pubdata: None,
            }))
        }
    }
}

/// Modeled byte sizes for a route's encoded transaction and published
/// pubdata. The ERC-20 two-bridges payload is materially smaller than the
/// other encodings.
fn route_byte_model(route: DepositRoute) -> (u64, u64) {
    match route {
        DepositRoute::Erc20NonBase => (ENCODED_TX_SIZE_BYTES_COMPACT, PUBDATA_BYTES_COMPACT),
        DepositRoute::EthBase | DepositRoute::EthNonBase | DepositRoute::Erc20Base => {
            (ENCODED_TX_SIZE_BYTES, PUBDATA_BYTES)
        }
    }
}

/// Quote the destination-chain gas limit for a bridged execution.
///
/// An explicit `override_limit` wins with no simulation. Without a modeling
/// transaction the hint is returned as-is (possibly zero, the caller's
/// responsibility). Otherwise the base execution estimate gains the
/// bootloader memory overhead and the pubdata publication overhead before
/// the safety buffer. On estimation failure the raw hint is returned with
/// no overhead added.
pub async fn quote_l2_gas(
    client: &dyn ChainClient,
    route: DepositRoute,
    modeling_tx: Option<&TxRequest>,
    gas_per_pubdata: U256,
    hint: u64,
    override_limit: Option<u64>,
    overrides: Option<&StateOverrides>,
) -> u64 {
    if let Some(limit) = override_limit {
        return limit;
    }
    let Some(tx) = modeling_tx else {
        return hint;
    };

    match client.estimate_gas(tx, overrides).await {
        Ok(base_gas) => {
            let (encoded_bytes, pubdata_bytes) = route_byte_model(route);
            let memory_overhead = encoded_bytes * MEMORY_OVERHEAD_GAS_PER_BYTE;
            let pubdata_overhead = U256::from(pubdata_bytes)
                .saturating_mul(gas_per_pubdata)
                .saturating_to::<u64>();
            let total = base_gas
                .saturating_add(memory_overhead)
                .saturating_add(pubdata_overhead);

            debug!(
                route = %route,
                base_gas,
                memory_overhead,
                pubdata_overhead,
                "Modeled L2 gas"
            );
            buffered_gas_limit(total)
        }
        Err(e) => {
            warn!(route = %route, error = %e, "L2 gas estimation failed, falling back to hint");
            hint
        }
    }
}

/// Read the destination-execution base cost from the bridge entry point's
/// oracle, priced at the current origin-chain gas price.
pub async fn quote_l2_base_cost(
    client: &dyn ChainClient,
    bridgehub: Address,
    decoder: &RevertDecoder,
    chain_id: u64,
    l2_gas_limit: u64,
    gas_per_pubdata: U256,
) -> BridgeResult<U256> {
    let market = client.fee_market().await.map_err(|e| {
        BridgeError::contract("quote-l2-base-cost", e).with_resource(format!("{bridgehub:?}"))
    })?;
    let gas_price = market.effective_gas_price().ok_or_else(|| {
        BridgeError::new(
            ErrorKind::Contract,
            "quote-l2-base-cost",
            "fee market returned neither max fee nor gas price",
        )
        .with_resource(format!("{bridgehub:?}"))
    })?;

    let call = Bridgehub::l2TransactionBaseCostCall {
        chainId: U256::from(chain_id),
        gasPrice: U256::from(gas_price),
        l2GasLimit: U256::from(l2_gas_limit),
        l2GasPerPubdataByteLimit: gas_per_pubdata,
    };
    let tx = TxRequest::call(Address::ZERO, bridgehub, call.abi_encode().into());

    let data = client.call(&tx).await.map_err(|e| {
        let revert = decoder.decode(&e);
        BridgeError::contract("quote-l2-base-cost", e)
            .with_resource(format!("{bridgehub:?}"))
            .with_context("chain_id", chain_id)
            .with_context("l2_gas_limit", l2_gas_limit)
            .with_revert(revert)
    })?;

    let decoded =
        Bridgehub::l2TransactionBaseCostCall::abi_decode_returns(&data, true).map_err(|e| {
            BridgeError::new(
                ErrorKind::Contract,
                "quote-l2-base-cost",
                format!("undecodable base cost return: {e}"),
            )
            .with_resource(format!("{bridgehub:?}"))
        })?;
    Ok(decoded._0)
}
