//! Rollup-Client: L1/L2 Bridge Protocol Engine
//!
//! Client-side engine for a two-layer rollup bridge. Given an asset and the
//! destination chain's fee-token configuration, it decides how a deposit,
//! withdrawal, or interop transfer must be assembled, computes the exact
//! fees and mint values, builds an ordered dependency-aware plan of on-chain
//! calls, executes it with nonce discipline, and tracks the resulting
//! multi-chain lifecycle:
//!
//! - **Route resolution** - one of four deposit routes (or two withdrawal
//!   routes) per (asset, base-token) pair, total and deterministic
//! - **Quoting** - L1 gas, L2 gas with protocol overhead modeling, and the
//!   on-chain base-cost oracle
//! - **Plan building** - conditional approval injection and a
//!   simulate-or-defer policy for the bridging call
//! - **Execution** - strictly ordered steps, each confirmed before the next
//! - **Status tracking** - destination transaction id derived from origin
//!   logs, polled through the lifecycle phases
//! - **Revert decoding** - structured errors with an extensible error-ABI
//!   registry and withdrawal-finalization readiness classification
//!
//! Chain access goes through the [`chain::ChainClient`] adapter trait; the
//! alloy-backed implementation lives in [`evm::client`]. The engine keeps no
//! state between calls; plans and statuses are re-derived from chain data
//! every time.

pub mod bridge;
pub mod chain;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod evm;
pub mod execute;
pub mod plan;
pub mod quote;
pub mod revert;
pub mod route;
pub mod status;
pub mod types;

// Re-export commonly used items at the crate root
pub use bridge::RollupBridge;
pub use chain::{ChainClient, ClientError, FeeMarket, LogEntry, ReceiptInfo, StateOverrides, TxRequest};
pub use config::{BridgeAddresses, BridgeConfig, ChainConfig};
pub use constants::{ETH_ADDRESS, L2_ASSET_ROUTER_ADDRESS, L2_BASE_TOKEN_ADDRESS};
pub use context::{BuildContext, OperationKind};
pub use error::{BridgeError, BridgeResult, ErrorKind};
pub use execute::ExecutionEngine;
pub use revert::{AbiRegistry, DecodedRevert, RevertDecoder};
pub use route::{resolve_deposit_route, resolve_withdraw_route};
pub use status::{derive_dest_tx, StatusTracker};
pub use types::{
    ApprovalNeed, BridgeStatus, DepositParams, DepositPhase, DepositRoute, FeeBreakdown,
    FeeOverrides, FinalizeReadiness, GasQuote, Handle, InteropParams, Plan, PlanStep, Route,
    StepKind, WaitTarget, WithdrawParams, WithdrawRoute,
};
