//! Transaction-plan construction
//!
//! One strategy per route tag, selected by exhaustive match. Every strategy
//! runs a cheap preflight, then builds the ordered step list: conditional
//! approvals first, then the bridging call. A plan is built fresh per call:
//! allowance and gas facts move underneath, so plans are never cached.

pub mod deposit;
pub mod withdraw;

use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::chain::ChainClient;
use crate::error::BridgeResult;
use crate::evm::tokens;
use crate::types::{ApprovalNeed, PlanStep, StepKind};

/// Step keys, unique within a plan.
pub const STEP_APPROVE_ASSET: &str = "approve-asset";
pub const STEP_APPROVE_BASE: &str = "approve-base-token";
pub const STEP_REGISTER_TOKEN: &str = "register-token";
pub const STEP_BRIDGE: &str = "bridge";
pub const STEP_WITHDRAW: &str = "withdraw";

/// Read the live allowance and emit an approval step when it falls short.
///
/// The step approves exactly the required amount; the execution engine
/// re-checks the allowance before sending in case it became sufficient
/// out-of-band.
pub(crate) async fn maybe_approval(
    client: &dyn ChainClient,
    key: &str,
    token: Address,
    owner: Address,
    spender: Address,
    required: U256,
) -> BridgeResult<Option<(PlanStep, ApprovalNeed)>> {
    let current = tokens::allowance(client, token, owner, spender).await?;
    if current >= required {
        debug!(token = %token, spender = %spender, "Allowance already sufficient");
        return Ok(None);
    }

    let need = ApprovalNeed {
        token,
        spender,
        amount: required,
    };
    let step = PlanStep {
        key: key.to_string(),
        kind: StepKind::Approve {
            token,
            spender,
            amount: required,
        },
        description: format!("Approve {required} of {token} for {spender}"),
        tx: tokens::approve_request(owner, token, spender, required),
    };
    Ok(Some((step, need)))
}
