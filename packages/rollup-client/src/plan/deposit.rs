//! Deposit route strategies
//!
//! Four mutually exclusive routes keyed on (asset, destination base token).
//! The direct encoding carries the amount as destination `msg.value` inside
//! the mint; the two-bridges encoding carries a secondary asset leg. Interop
//! transfers reuse these strategies with an L2 origin.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use tracing::info;

use crate::chain::{StateOverrides, TxRequest};
use crate::constants::{
    is_eth, simulation_balance, DEFAULT_GAS_PER_PUBDATA, DEFAULT_L2_GAS_LIMIT, ETH_ADDRESS,
    L1_BRIDGE_FALLBACK_GAS_LIMIT,
};
use crate::context::BuildContext;
use crate::error::{BridgeError, BridgeResult};
use crate::evm::contracts::{
    Bridgehub, L2TransactionRequestDirect, L2TransactionRequestTwoBridges,
};
use crate::plan::{maybe_approval, STEP_APPROVE_ASSET, STEP_APPROVE_BASE, STEP_BRIDGE};
use crate::quote::{quote_l1_gas, quote_l2_base_cost, quote_l2_gas};
use crate::types::{
    DepositParams, DepositRoute, FeeBreakdown, Plan, PlanStep, Route, StepKind,
};

/// Cheap validation that the resolved route accepts the given parameters.
/// May read chain state, performs no writes.
pub async fn preflight(
    route: DepositRoute,
    params: &DepositParams,
    ctx: &BuildContext<'_>,
) -> BridgeResult<()> {
    if params.amount.is_zero() {
        return Err(BridgeError::validation("deposit-preflight", "amount is zero")
            .with_context("route", route));
    }

    match route {
        DepositRoute::EthBase => {
            require_eth(route, params, ctx)?;
            let balance = ctx.origin.balance(ctx.sender).await.map_err(|e| {
                BridgeError::rpc("deposit-preflight", e).with_context("route", route)
            })?;
            if balance < params.amount {
                return Err(BridgeError::validation(
                    "deposit-preflight",
                    "origin balance below deposit amount",
                )
                .with_context("route", route)
                .with_context("balance", balance)
                .with_context("amount", params.amount));
            }
            Ok(())
        }
        DepositRoute::EthNonBase => require_eth(route, params, ctx),
        DepositRoute::Erc20Base => {
            if is_eth(params.token) || params.token != ctx.base_token || ctx.base_token_is_eth {
                return Err(BridgeError::validation(
                    "deposit-preflight",
                    "route requires the destination's ERC-20 base token",
                )
                .with_context("route", route)
                .with_context("token", params.token)
                .with_context("base_token", ctx.base_token));
            }
            Ok(())
        }
        DepositRoute::Erc20NonBase => {
            if is_eth(params.token) || params.token == ctx.base_token {
                return Err(BridgeError::validation(
                    "deposit-preflight",
                    "route requires an ERC-20 distinct from the base token",
                )
                .with_context("route", route)
                .with_context("token", params.token));
            }
            Ok(())
        }
    }
}

fn require_eth(
    route: DepositRoute,
    params: &DepositParams,
    _ctx: &BuildContext<'_>,
) -> BridgeResult<()> {
    if !is_eth(params.token) {
        return Err(
            BridgeError::validation("deposit-preflight", "route only accepts the native asset")
                .with_context("route", route)
                .with_context("token", params.token),
        );
    }
    Ok(())
}

/// Build the ordered plan for a resolved deposit route.
pub async fn build(
    route: DepositRoute,
    params: &DepositParams,
    ctx: &BuildContext<'_>,
) -> BridgeResult<Plan> {
    let to = params.to.unwrap_or(ctx.sender);
    let refund = params.refund_recipient.unwrap_or(ctx.sender);
    let gas_per_pubdata = params
        .gas_per_pubdata
        .unwrap_or(U256::from(DEFAULT_GAS_PER_PUBDATA));
    let operator_tip = params.operator_tip.unwrap_or(U256::ZERO);

    // Destination value delivered by the bridged execution.
    let l2_value = match route {
        DepositRoute::EthBase | DepositRoute::Erc20Base | DepositRoute::EthNonBase => params.amount,
        DepositRoute::Erc20NonBase => U256::ZERO,
    };

    // Model the destination execution as a transfer to the recipient; the
    // balance override lets not-yet-funded calls simulate.
    let modeling_tx = TxRequest::call(ctx.sender, to, Bytes::new()).with_value(l2_value);
    let sim = StateOverrides::balance(ctx.sender, simulation_balance());
    let l2_gas_limit = quote_l2_gas(
        ctx.dest,
        route,
        Some(&modeling_tx),
        gas_per_pubdata,
        DEFAULT_L2_GAS_LIMIT,
        params.l2_gas_limit,
        Some(&sim),
    )
    .await;

    let base_cost = quote_l2_base_cost(
        ctx.origin,
        ctx.addresses.bridgehub,
        ctx.decoder,
        ctx.dest_chain_id,
        l2_gas_limit,
        gas_per_pubdata,
    )
    .await?;

    let mut steps: Vec<PlanStep> = Vec::new();
    let mut approvals = Vec::new();

    // Mint value and the bridging call, per route.
    let (mint_value, tx_value, kind, calldata) = match route {
        DepositRoute::EthBase => {
            let mint_value = base_cost + operator_tip + params.amount;
            let calldata = direct_request(ctx, mint_value, to, params.amount, l2_gas_limit, gas_per_pubdata, refund);
            (mint_value, mint_value, StepKind::BridgeDirect, calldata)
        }
        DepositRoute::Erc20Base => {
            let mint_value = base_cost + operator_tip + params.amount;
            if let Some((step, need)) = maybe_approval(
                ctx.origin,
                STEP_APPROVE_BASE,
                ctx.base_token,
                ctx.sender,
                ctx.addresses.l1_asset_router,
                mint_value,
            )
            .await?
            {
                steps.push(step);
                approvals.push(need);
            }
            let calldata = direct_request(ctx, mint_value, to, params.amount, l2_gas_limit, gas_per_pubdata, refund);
            (mint_value, U256::ZERO, StepKind::BridgeDirect, calldata)
        }
        DepositRoute::EthNonBase => {
            // Fees fund in the ERC-20 base token; the deposited ETH rides as
            // the second-bridge value.
            let mint_value = base_cost + operator_tip;
            if let Some((step, need)) = maybe_approval(
                ctx.origin,
                STEP_APPROVE_BASE,
                ctx.base_token,
                ctx.sender,
                ctx.addresses.l1_asset_router,
                mint_value,
            )
            .await?
            {
                steps.push(step);
                approvals.push(need);
            }
            let second_calldata: Bytes = (ETH_ADDRESS, U256::ZERO, to).abi_encode().into();
            let calldata = two_bridges_request(
                ctx,
                mint_value,
                l2_gas_limit,
                gas_per_pubdata,
                refund,
                params.amount,
                second_calldata,
            );
            (mint_value, params.amount, StepKind::BridgeTwoBridges, calldata)
        }
        DepositRoute::Erc20NonBase => {
            let mint_value = base_cost + operator_tip;
            let tx_value = if ctx.base_token_is_eth {
                // ETH base token funds the mint directly as call value.
                mint_value
            } else {
                if let Some((step, need)) = maybe_approval(
                    ctx.origin,
                    STEP_APPROVE_BASE,
                    ctx.base_token,
                    ctx.sender,
                    ctx.addresses.l1_asset_router,
                    mint_value,
                )
                .await?
                {
                    steps.push(step);
                    approvals.push(need);
                }
                U256::ZERO
            };
            if let Some((step, need)) = maybe_approval(
                ctx.origin,
                STEP_APPROVE_ASSET,
                params.token,
                ctx.sender,
                ctx.addresses.l1_asset_router,
                params.amount,
            )
            .await?
            {
                steps.push(step);
                approvals.push(need);
            }
            let second_calldata: Bytes = (params.token, params.amount, to).abi_encode().into();
            let calldata = two_bridges_request(
                ctx,
                mint_value,
                l2_gas_limit,
                gas_per_pubdata,
                refund,
                U256::ZERO,
                second_calldata,
            );
            (mint_value, tx_value, StepKind::BridgeTwoBridges, calldata)
        }
    };

    let mut bridge_tx =
        TxRequest::call(ctx.sender, ctx.addresses.bridgehub, calldata).with_value(tx_value);

    // Simulate-or-defer: a pending approval would make the bridging call
    // revert against current allowance, so it stays an unsent raw call.
    let l1_gas = if approvals.is_empty() {
        let quote = quote_l1_gas(
            ctx.origin,
            &bridge_tx,
            ctx.fee_overrides,
            Some(L1_BRIDGE_FALLBACK_GAS_LIMIT),
        )
        .await?;
        if let Some(quote) = quote {
            bridge_tx.gas = Some(quote.gas_limit);
            bridge_tx.max_fee_per_gas = Some(quote.max_fee_per_gas);
            bridge_tx.max_priority_fee_per_gas = Some(quote.max_priority_fee_per_gas);
        }
        quote
    } else {
        None
    };

    steps.push(PlanStep {
        key: STEP_BRIDGE.to_string(),
        kind,
        description: format!("Bridge {} of {} to chain {}", params.amount, params.token, ctx.dest_chain_id),
        tx: bridge_tx,
    });

    // Amount travelling outside the mint leg still needs origin funding.
    let total = match route {
        DepositRoute::EthBase | DepositRoute::Erc20Base => mint_value,
        DepositRoute::EthNonBase | DepositRoute::Erc20NonBase => mint_value + params.amount,
    };

    let summary = FeeBreakdown {
        fee_token: ctx.base_token,
        l1_gas,
        l2_gas_limit,
        gas_per_pubdata,
        base_cost,
        operator_tip,
        mint_value,
        total,
    };

    info!(
        route = %route,
        mint_value = %mint_value,
        base_cost = %base_cost,
        approvals = approvals.len(),
        steps = steps.len(),
        "Deposit plan built"
    );

    Ok(Plan {
        route: Route::Deposit(route),
        summary,
        approvals,
        steps,
    })
}

fn direct_request(
    ctx: &BuildContext<'_>,
    mint_value: U256,
    to: alloy::primitives::Address,
    amount: U256,
    l2_gas_limit: u64,
    gas_per_pubdata: U256,
    refund: alloy::primitives::Address,
) -> Bytes {
    let request = L2TransactionRequestDirect {
        chainId: U256::from(ctx.dest_chain_id),
        mintValue: mint_value,
        l2Contract: to,
        l2Value: amount,
        l2Calldata: Bytes::new(),
        l2GasLimit: U256::from(l2_gas_limit),
        l2GasPerPubdataByteLimit: gas_per_pubdata,
        factoryDeps: vec![],
        refundRecipient: refund,
    };
    Bridgehub::requestL2TransactionDirectCall { request }
        .abi_encode()
        .into()
}

fn two_bridges_request(
    ctx: &BuildContext<'_>,
    mint_value: U256,
    l2_gas_limit: u64,
    gas_per_pubdata: U256,
    refund: alloy::primitives::Address,
    second_bridge_value: U256,
    second_bridge_calldata: Bytes,
) -> Bytes {
    let request = L2TransactionRequestTwoBridges {
        chainId: U256::from(ctx.dest_chain_id),
        mintValue: mint_value,
        l2Value: U256::ZERO,
        l2GasLimit: U256::from(l2_gas_limit),
        l2GasPerPubdataByteLimit: gas_per_pubdata,
        refundRecipient: refund,
        secondBridgeAddress: ctx.addresses.l1_asset_router,
        secondBridgeValue: second_bridge_value,
        secondBridgeCalldata: second_bridge_calldata,
    };
    Bridgehub::requestL2TransactionTwoBridgesCall { request }
        .abi_encode()
        .into()
}
