//! Common types for bridge operations
//!
//! Parameters, routes, plans, quotes, handles, and status values shared
//! across the engine. Plans and statuses are plain data: built fresh per
//! call, never cached, because the chain facts behind them (allowance, gas
//! price) move underneath.

use std::fmt;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::chain::TxRequest;

// ============================================================================
// Operation parameters
// ============================================================================

/// Caller-supplied fee overrides applied to origin-chain transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeOverrides {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub gas_limit: Option<u64>,
}

/// Parameters for an L1→L2 deposit. Immutable input.
#[derive(Debug, Clone)]
pub struct DepositParams {
    /// Asset to bridge; the ETH sentinel for the native asset.
    pub token: Address,
    pub amount: U256,
    /// Destination-chain recipient; defaults to the sender.
    pub to: Option<Address>,
    pub fee_overrides: Option<FeeOverrides>,
    /// Tip paid to the operator on top of the base cost.
    pub operator_tip: Option<U256>,
    /// Explicit L2 gas limit; skips estimation when set.
    pub l2_gas_limit: Option<u64>,
    pub gas_per_pubdata: Option<U256>,
    /// Origin-chain recipient of unspent destination fees.
    pub refund_recipient: Option<Address>,
}

impl DepositParams {
    pub fn new(token: Address, amount: U256) -> Self {
        DepositParams {
            token,
            amount,
            to: None,
            fee_overrides: None,
            operator_tip: None,
            l2_gas_limit: None,
            gas_per_pubdata: None,
            refund_recipient: None,
        }
    }
}

/// Parameters for an L2→L1 withdrawal. Immutable input.
#[derive(Debug, Clone)]
pub struct WithdrawParams {
    pub token: Address,
    pub amount: U256,
    /// L1 recipient; defaults to the sender.
    pub to: Option<Address>,
    pub fee_overrides: Option<FeeOverrides>,
}

impl WithdrawParams {
    pub fn new(token: Address, amount: U256) -> Self {
        WithdrawParams {
            token,
            amount,
            to: None,
            fee_overrides: None,
        }
    }
}

/// Parameters for an L2→L2 interop transfer. Immutable input.
///
/// Assembled with the deposit strategies against the origin L2's bridge
/// entry point; routing keys on the destination chain's base-token facts.
#[derive(Debug, Clone)]
pub struct InteropParams {
    pub token: Address,
    pub amount: U256,
    pub to: Option<Address>,
    pub fee_overrides: Option<FeeOverrides>,
    pub operator_tip: Option<U256>,
    pub l2_gas_limit: Option<u64>,
    pub gas_per_pubdata: Option<U256>,
}

impl InteropParams {
    pub fn new(token: Address, amount: U256) -> Self {
        InteropParams {
            token,
            amount,
            to: None,
            fee_overrides: None,
            operator_tip: None,
            l2_gas_limit: None,
            gas_per_pubdata: None,
        }
    }

    /// View as deposit parameters for the shared strategies.
    pub fn as_deposit(&self) -> DepositParams {
        DepositParams {
            token: self.token,
            amount: self.amount,
            to: self.to,
            fee_overrides: self.fee_overrides,
            operator_tip: self.operator_tip,
            l2_gas_limit: self.l2_gas_limit,
            gas_per_pubdata: self.gas_per_pubdata,
            refund_recipient: None,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Deposit route tags. Exactly one applies per (asset, context) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepositRoute {
    /// ETH to a chain whose base token is ETH: direct encoding.
    EthBase,
    /// ETH to a chain with an ERC-20 base token: two-bridges encoding.
    EthNonBase,
    /// The destination's own base token: direct encoding.
    Erc20Base,
    /// Any other ERC-20: two-bridges encoding.
    Erc20NonBase,
}

impl DepositRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositRoute::EthBase => "eth-base",
            DepositRoute::EthNonBase => "eth-nonbase",
            DepositRoute::Erc20Base => "erc20-base",
            DepositRoute::Erc20NonBase => "erc20-nonbase",
        }
    }
}

impl fmt::Display for DepositRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Withdrawal route tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawRoute {
    /// The chain's base token, via the fixed L2 base-token system contract.
    BaseToken,
    /// Any other registered asset, via the L2 asset router.
    Erc20,
}

impl WithdrawRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawRoute::BaseToken => "base-token",
            WithdrawRoute::Erc20 => "erc20",
        }
    }
}

impl fmt::Display for WithdrawRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Route tag carried on a built plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Deposit(DepositRoute),
    Withdraw(WithdrawRoute),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Deposit(r) => write!(f, "deposit/{}", r),
            Route::Withdraw(r) => write!(f, "withdraw/{}", r),
        }
    }
}

// ============================================================================
// Quotes and fees
// ============================================================================

/// A gas quote for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasQuote {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    /// Per-byte data-publication price, when the quote models one.
    pub gas_per_pubdata: Option<U256>,
}

impl GasQuote {
    /// Worst-case cost of the quoted transaction.
    pub fn max_cost(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.max_fee_per_gas)
    }
}

/// Fee summary attached to a plan.
#[derive(Debug, Clone)]
pub struct FeeBreakdown {
    /// Asset the destination execution is funded in.
    pub fee_token: Address,
    /// Origin-chain gas quote for the bridging call; `None` when the call
    /// was deliberately not simulated (pending approvals).
    pub l1_gas: Option<GasQuote>,
    pub l2_gas_limit: u64,
    pub gas_per_pubdata: U256,
    /// Destination-execution fee, read from the base-cost oracle.
    pub base_cost: U256,
    pub operator_tip: U256,
    /// Total value funded on the origin chain for destination execution
    /// plus any amount carried inside the same leg.
    pub mint_value: U256,
    /// Mint value plus any bridged amount travelling outside the mint leg.
    /// Origin gas is quoted separately in `l1_gas`.
    pub total: U256,
}

// ============================================================================
// Plans
// ============================================================================

/// A required allowance increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalNeed {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

/// What a plan step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// ERC-20 approval; re-checked against live allowance at execution time.
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    /// Direct-encoded bridging call (amount carried as destination value).
    BridgeDirect,
    /// Two-bridges-encoded bridging call (secondary asset leg).
    BridgeTwoBridges,
    /// L2 base-token system contract withdrawal.
    WithdrawBaseToken,
    /// L2 asset-router withdrawal.
    WithdrawErc20,
    /// Native-token-vault registration for a first-time token.
    RegisterToken { token: Address },
}

/// One ordered step of a plan.
#[derive(Debug, Clone)]
pub struct PlanStep {
    /// Unique within the plan; execution results are keyed by it.
    pub key: String,
    pub kind: StepKind,
    pub description: String,
    /// The unsent call. Gas fields are only populated when the call was
    /// simulated against current state.
    pub tx: TxRequest,
}

/// An ordered, dependency-aware sequence of calls implementing one
/// operation. Execution order is significant: approvals precede the call
/// that depends on them.
#[derive(Debug, Clone)]
pub struct Plan {
    pub route: Route,
    pub summary: FeeBreakdown,
    pub approvals: Vec<ApprovalNeed>,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// The bridging/withdrawal step (always the last step).
    pub fn bridge_step(&self) -> Option<&PlanStep> {
        self.steps.last()
    }
}

// ============================================================================
// Execution handle and status
// ============================================================================

/// Result of executing a plan. Immutable once returned.
#[derive(Debug, Clone)]
pub struct Handle {
    /// Canonical origin transaction for status tracking (the last step's).
    pub origin_tx: Option<B256>,
    /// Per-step transaction ids, keyed by step key, in send order.
    pub step_txs: Vec<(String, B256)>,
    pub plan: Plan,
}

/// Cross-chain lifecycle phase of a deposit/interop transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositPhase {
    /// No origin transaction id available.
    Unknown,
    /// Origin receipt not yet available.
    OriginPending,
    /// Origin included, destination id not yet derivable from its logs.
    OriginIncluded,
    /// Destination id derived, receipt not yet fetchable.
    DestPending,
    DestExecuted,
    DestFailed,
}

impl DepositPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositPhase::Unknown => "unknown",
            DepositPhase::OriginPending => "origin-pending",
            DepositPhase::OriginIncluded => "origin-included",
            DepositPhase::DestPending => "dest-pending",
            DepositPhase::DestExecuted => "dest-executed",
            DepositPhase::DestFailed => "dest-failed",
        }
    }
}

impl fmt::Display for DepositPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time status of a cross-chain transfer. Recomputed per query,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStatus {
    pub phase: DepositPhase,
    pub origin_tx: Option<B256>,
    /// Destination transaction id derived from origin logs, once available.
    pub dest_tx: Option<B256>,
}

/// How far `wait` should block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    /// Until the origin transaction is included.
    Origin,
    /// Until the destination transaction executed.
    Destination,
}

// ============================================================================
// Withdrawal finalization readiness
// ============================================================================

/// Whether a withdrawal can be finalized right now, classified purely from
/// a finalization revert without submitting anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeReadiness {
    Finalized,
    NotReady {
        reason: String,
        detail: Option<String>,
    },
    Unfinalizable {
        reason: String,
        detail: Option<String>,
    },
}
