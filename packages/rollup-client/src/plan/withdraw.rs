//! Withdrawal route strategies
//!
//! L2→L1 direction. The chain's base token leaves through the fixed
//! base-token system contract; every other asset leaves through the L2
//! asset router after vault registration and allowance are satisfied.

use alloy::primitives::{B256, U256};
use alloy::sol_types::SolCall;
use tracing::info;

use crate::chain::TxRequest;
use crate::constants::{is_eth, L1_BRIDGE_FALLBACK_GAS_LIMIT, L2_BASE_TOKEN_ADDRESS};
use crate::context::BuildContext;
use crate::error::{BridgeError, BridgeResult, ErrorKind};
use crate::evm::contracts::{L2AssetRouter, L2BaseToken, L2NativeTokenVault};
use crate::plan::{maybe_approval, STEP_APPROVE_ASSET, STEP_REGISTER_TOKEN, STEP_WITHDRAW};
use crate::quote::quote_l1_gas;
use crate::types::{FeeBreakdown, Plan, PlanStep, Route, StepKind, WithdrawParams, WithdrawRoute};

/// Cheap validation that the resolved route accepts the given parameters.
pub async fn preflight(
    route: WithdrawRoute,
    params: &WithdrawParams,
    ctx: &BuildContext<'_>,
) -> BridgeResult<()> {
    if params.amount.is_zero() {
        return Err(
            BridgeError::validation("withdraw-preflight", "amount is zero")
                .with_context("route", route),
        );
    }

    match route {
        WithdrawRoute::BaseToken => {
            if ctx.base_token_is_eth {
                return Err(BridgeError::validation(
                    "withdraw-preflight",
                    "chain's base token is the native asset; no base-token withdrawal applies",
                )
                .with_context("route", route));
            }
            if params.token != L2_BASE_TOKEN_ADDRESS {
                return Err(BridgeError::validation(
                    "withdraw-preflight",
                    "token is not the base-token system address",
                )
                .with_context("route", route)
                .with_context("token", params.token)
                .with_context("expected", L2_BASE_TOKEN_ADDRESS));
            }
            Ok(())
        }
        WithdrawRoute::Erc20 => {
            if params.token == L2_BASE_TOKEN_ADDRESS {
                return Err(BridgeError::validation(
                    "withdraw-preflight",
                    "base-token system address does not withdraw through the asset router",
                )
                .with_context("route", route));
            }
            if !ctx.base_token_is_eth && params.token == ctx.base_token {
                return Err(BridgeError::validation(
                    "withdraw-preflight",
                    "base token withdraws through the base-token route",
                )
                .with_context("route", route)
                .with_context("token", params.token));
            }
            Ok(())
        }
    }
}

/// Build the ordered plan for a resolved withdrawal route.
pub async fn build(
    route: WithdrawRoute,
    params: &WithdrawParams,
    ctx: &BuildContext<'_>,
) -> BridgeResult<Plan> {
    let to = params.to.unwrap_or(ctx.sender);

    let mut steps: Vec<PlanStep> = Vec::new();
    let mut approvals = Vec::new();

    let (kind, mut withdraw_tx) = match route {
        WithdrawRoute::BaseToken => {
            let call = L2BaseToken::withdrawCall { l1Receiver: to };
            let tx = TxRequest::call(
                ctx.sender,
                ctx.addresses.l2_base_token,
                call.abi_encode().into(),
            )
            .with_value(params.amount);
            (StepKind::WithdrawBaseToken, tx)
        }
        WithdrawRoute::Erc20 => {
            // The router can only route assets the vault knows about.
            if !vault_knows_token(ctx, params.token).await? {
                let call = L2NativeTokenVault::registerTokenCall {
                    token: params.token,
                };
                steps.push(PlanStep {
                    key: STEP_REGISTER_TOKEN.to_string(),
                    kind: StepKind::RegisterToken {
                        token: params.token,
                    },
                    description: format!("Register {} in the native token vault", params.token),
                    tx: TxRequest::call(
                        ctx.sender,
                        ctx.addresses.l2_native_token_vault,
                        call.abi_encode().into(),
                    ),
                });
            }

            if !is_eth(params.token) {
                if let Some((step, need)) = maybe_approval(
                    ctx.origin,
                    STEP_APPROVE_ASSET,
                    params.token,
                    ctx.sender,
                    ctx.addresses.l2_asset_router,
                    params.amount,
                )
                .await?
                {
                    steps.push(step);
                    approvals.push(need);
                }
            }

            let call = L2AssetRouter::withdrawCall {
                l1Receiver: to,
                token: params.token,
                amount: params.amount,
            };
            let value = if is_eth(params.token) {
                params.amount
            } else {
                U256::ZERO
            };
            let tx = TxRequest::call(
                ctx.sender,
                ctx.addresses.l2_asset_router,
                call.abi_encode().into(),
            )
            .with_value(value);
            (StepKind::WithdrawErc20, tx)
        }
    };

    // Same simulate-or-defer policy as deposits: pending prerequisite steps
    // leave the withdrawal call unsimulated.
    let l1_gas = if steps.is_empty() {
        let quote = quote_l1_gas(
            ctx.origin,
            &withdraw_tx,
            ctx.fee_overrides,
            Some(L1_BRIDGE_FALLBACK_GAS_LIMIT),
        )
        .await?;
        if let Some(quote) = quote {
            withdraw_tx.gas = Some(quote.gas_limit);
            withdraw_tx.max_fee_per_gas = Some(quote.max_fee_per_gas);
            withdraw_tx.max_priority_fee_per_gas = Some(quote.max_priority_fee_per_gas);
        }
        quote
    } else {
        None
    };

    steps.push(PlanStep {
        key: STEP_WITHDRAW.to_string(),
        kind,
        description: format!("Withdraw {} of {} to L1", params.amount, params.token),
        tx: withdraw_tx,
    });

    let summary = FeeBreakdown {
        fee_token: ctx.base_token,
        l1_gas,
        l2_gas_limit: 0,
        gas_per_pubdata: U256::ZERO,
        base_cost: U256::ZERO,
        operator_tip: U256::ZERO,
        mint_value: U256::ZERO,
        total: params.amount,
    };

    info!(
        route = %route,
        amount = %params.amount,
        steps = steps.len(),
        "Withdrawal plan built"
    );

    Ok(Plan {
        route: Route::Withdraw(route),
        summary,
        approvals,
        steps,
    })
}

/// Whether the native-token-vault has an asset id for `token`.
async fn vault_knows_token(ctx: &BuildContext<'_>, token: alloy::primitives::Address) -> BridgeResult<bool> {
    let call = L2NativeTokenVault::assetIdCall { token };
    let tx = TxRequest::call(
        ctx.sender,
        ctx.addresses.l2_native_token_vault,
        call.abi_encode().into(),
    );
    let data = ctx.origin.call(&tx).await.map_err(|e| {
        let revert = ctx.decoder.decode(&e);
        BridgeError::contract("read-asset-id", e)
            .with_resource(format!("{:?}", ctx.addresses.l2_native_token_vault))
            .with_context("token", token)
            .with_revert(revert)
    })?;
    let decoded = L2NativeTokenVault::assetIdCall::abi_decode_returns(&data, true).map_err(|e| {
        BridgeError::new(
            ErrorKind::Contract,
            "read-asset-id",
            format!("undecodable assetId return: {e}"),
        )
    })?;
    Ok(decoded._0 != B256::ZERO)
}
