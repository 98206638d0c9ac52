//! Deposit planning tests: route resolution, mint-value arithmetic,
//! approval injection, and the simulate-or-defer policy.

mod support;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use rollup_client::{
    BridgeAddresses, DepositParams, DepositRoute, ErrorKind, InteropParams, RollupBridge, Route,
    StepKind, ETH_ADDRESS,
};
use support::MockChainClient;

const L1_CHAIN: u64 = 1;
const L2_CHAIN: u64 = 300;

fn sender() -> Address {
    Address::new([0xaa; 20])
}

fn bridgehub() -> Address {
    Address::new([0xb1; 20])
}

fn asset_router() -> Address {
    Address::new([0xc1; 20])
}

fn addresses() -> BridgeAddresses {
    BridgeAddresses::new(bridgehub(), asset_router())
}

fn eth_funded_l1() -> MockChainClient {
    MockChainClient::new(L1_CHAIN)
        .with_base_token(L2_CHAIN, ETH_ADDRESS)
        .with_base_cost(U256::from(2_000))
        .with_balance(sender(), U256::from(10u128.pow(18)))
}

#[tokio::test]
async fn eth_base_deposit_builds_single_step_with_exact_mint_value() {
    let l1 = eth_funded_l1();
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::from(1_234)))
        .await
        .unwrap();

    assert_eq!(plan.route, Route::Deposit(DepositRoute::EthBase));
    // mintValue = baseCost + operatorTip + amount, exact integer arithmetic.
    assert_eq!(plan.summary.mint_value, U256::from(3_234));
    assert_eq!(plan.summary.base_cost, U256::from(2_000));
    assert_eq!(plan.steps.len(), 1);
    assert!(plan.approvals.is_empty());

    let step = &plan.steps[0];
    assert_eq!(step.kind, StepKind::BridgeDirect);
    assert_eq!(step.tx.value, U256::from(3_234));
    assert_eq!(step.tx.to, Some(bridgehub()));
    // No approvals pending, so the call was simulated and carries gas.
    assert!(step.tx.gas.is_some());
    assert!(step.tx.max_fee_per_gas.is_some());
    assert!(plan.summary.l1_gas.is_some());
}

#[tokio::test]
async fn operator_tip_lands_in_mint_value() {
    let l1 = eth_funded_l1();
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let mut params = DepositParams::new(ETH_ADDRESS, U256::from(1_234));
    params.operator_tip = Some(U256::from(7));
    let plan = bridge.plan_deposit(&params).await.unwrap();

    assert_eq!(plan.summary.mint_value, U256::from(3_241));
    assert_eq!(plan.summary.operator_tip, U256::from(7));
}

#[tokio::test]
async fn erc20_deposit_without_allowance_injects_one_approval() {
    let token = Address::new([0x11; 20]);
    let l1 = eth_funded_l1();
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(token, U256::from(1_000)))
        .await
        .unwrap();

    assert_eq!(plan.route, Route::Deposit(DepositRoute::Erc20NonBase));
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.approvals.len(), 1);

    let approval = plan.approvals[0];
    assert_eq!(approval.token, token);
    assert_eq!(approval.spender, asset_router());
    assert_eq!(approval.amount, U256::from(1_000));

    let approve_step = &plan.steps[0];
    assert_eq!(
        approve_step.kind,
        StepKind::Approve {
            token,
            spender: asset_router(),
            amount: U256::from(1_000),
        }
    );
    assert_eq!(approve_step.tx.to, Some(token));

    // The bridging call must not carry simulation-derived fields while an
    // approval is pending.
    let bridge_step = &plan.steps[1];
    assert_eq!(bridge_step.kind, StepKind::BridgeTwoBridges);
    assert!(bridge_step.tx.gas.is_none());
    assert!(bridge_step.tx.max_fee_per_gas.is_none());
    assert!(plan.summary.l1_gas.is_none());
    // ETH base token funds the mint as call value.
    assert_eq!(bridge_step.tx.value, plan.summary.mint_value);
}

#[tokio::test]
async fn erc20_deposit_with_sufficient_allowance_skips_approval() {
    let token = Address::new([0x11; 20]);
    let l1 = eth_funded_l1().with_allowance(
        token,
        sender(),
        asset_router(),
        U256::from(1_000_000),
    );
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(token, U256::from(1_000)))
        .await
        .unwrap();

    assert_eq!(plan.steps.len(), 1);
    assert!(plan.approvals.is_empty());
    assert!(plan.steps[0].tx.gas.is_some());
}

#[tokio::test]
async fn erc20_base_deposit_uses_direct_encoding_with_zero_value() {
    let base = Address::new([0x22; 20]);
    let l1 = MockChainClient::new(L1_CHAIN)
        .with_base_token(L2_CHAIN, base)
        .with_base_cost(U256::from(500))
        .with_allowance(base, sender(), asset_router(), U256::MAX);
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(base, U256::from(4_000)))
        .await
        .unwrap();

    assert_eq!(plan.route, Route::Deposit(DepositRoute::Erc20Base));
    assert_eq!(plan.summary.mint_value, U256::from(4_500));
    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].kind, StepKind::BridgeDirect);
    // Base token funds are pulled by the router, not sent as value.
    assert_eq!(plan.steps[0].tx.value, U256::ZERO);
}

#[tokio::test]
async fn eth_deposit_to_erc20_base_chain_needs_base_token_approval() {
    let base = Address::new([0x22; 20]);
    let l1 = MockChainClient::new(L1_CHAIN)
        .with_base_token(L2_CHAIN, base)
        .with_base_cost(U256::from(600))
        .with_balance(sender(), U256::from(10u128.pow(18)));
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::from(9_000)))
        .await
        .unwrap();

    assert_eq!(plan.route, Route::Deposit(DepositRoute::EthNonBase));
    // Fees fund in the base token; the deposited ETH rides as call value.
    assert_eq!(plan.summary.mint_value, U256::from(600));
    assert_eq!(plan.summary.total, U256::from(9_600));
    assert_eq!(plan.approvals.len(), 1);
    assert_eq!(plan.approvals[0].token, base);
    assert_eq!(plan.approvals[0].amount, U256::from(600));

    let bridge_step = plan.steps.last().unwrap();
    assert_eq!(bridge_step.tx.value, U256::from(9_000));
    assert!(bridge_step.tx.gas.is_none());
}

#[tokio::test]
async fn base_cost_revert_aborts_build_with_contract_error() {
    let l1 = eth_funded_l1().with_base_cost_revert(support::encode_error_string("oracle offline"));
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let err = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::from(1_234)))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Contract);
    assert_eq!(err.operation, "quote-l2-base-cost");
    let revert = err.revert.expect("revert should decode");
    assert_eq!(revert.name.as_deref(), Some("Error"));
    assert_eq!(revert.args, Some(vec!["oracle offline".to_string()]));
}

#[tokio::test]
async fn explicit_l2_gas_limit_skips_estimation() {
    let l1 = eth_funded_l1();
    let l2 = MockChainClient::new(L2_CHAIN).with_gas_estimate_failure();
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let mut params = DepositParams::new(ETH_ADDRESS, U256::from(1_234));
    params.l2_gas_limit = Some(777_000);
    let plan = bridge.plan_deposit(&params).await.unwrap();

    assert_eq!(plan.summary.l2_gas_limit, 777_000);
}

#[tokio::test]
async fn l1_estimation_failure_falls_back_to_conservative_limit() {
    let l1 = eth_funded_l1().with_gas_estimate_failure();
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::from(1_234)))
        .await
        .unwrap();

    let quote = plan.summary.l1_gas.expect("fallback quote expected");
    assert_eq!(quote.gas_limit, 500_000);
    assert_eq!(plan.steps[0].tx.gas, Some(500_000));
}

#[tokio::test]
async fn interop_transfer_reuses_deposit_routing_from_an_l2_origin() {
    const DEST_CHAIN: u64 = 400;
    let l1 = eth_funded_l1();
    // The origin L2 carries its own bridge entry point and serves the
    // destination's base-token facts.
    let l2 = MockChainClient::new(L2_CHAIN)
        .with_base_token(DEST_CHAIN, ETH_ADDRESS)
        .with_base_cost(U256::from(2_000))
        .with_balance(sender(), U256::from(10u128.pow(18)));
    let dest = MockChainClient::new(DEST_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let plan = bridge
        .plan_interop(&InteropParams::new(ETH_ADDRESS, U256::from(50)), &dest)
        .await
        .unwrap();

    assert_eq!(plan.route, Route::Deposit(DepositRoute::EthBase));
    assert_eq!(plan.summary.mint_value, U256::from(2_050));
    assert_eq!(plan.steps.len(), 1);
}

#[tokio::test]
async fn zero_amount_is_rejected_in_preflight() {
    let l1 = eth_funded_l1();
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let err = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::ZERO))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn insufficient_eth_balance_is_rejected_in_preflight() {
    let l1 = MockChainClient::new(L1_CHAIN)
        .with_base_token(L2_CHAIN, ETH_ADDRESS)
        .with_base_cost(U256::from(2_000))
        .with_balance(sender(), U256::from(10));
    let l2 = MockChainClient::new(L2_CHAIN);
    let bridge = RollupBridge::new(Arc::new(l1), Arc::new(l2), sender(), addresses());

    let err = bridge
        .plan_deposit(&DepositParams::new(ETH_ADDRESS, U256::from(1_234)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.operation, "deposit-preflight");
}
