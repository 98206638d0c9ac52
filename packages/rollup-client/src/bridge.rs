//! Bridge facade
//!
//! Ties the pipeline together: params → context assembly → route resolution
//! → preflight → build → (optional) execute → status. One facade instance
//! serves many operations; each call assembles its own context and plan.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::chain::{ChainClient, ClientError};
use crate::config::BridgeAddresses;
use crate::context::{BuildContext, OperationKind};
use crate::error::BridgeResult;
use crate::execute::ExecutionEngine;
use crate::plan::{deposit, withdraw};
use crate::revert::RevertDecoder;
use crate::route::{resolve_deposit_route, resolve_withdraw_route};
use crate::status::StatusTracker;
use crate::types::{
    BridgeStatus, DepositParams, FinalizeReadiness, Handle, InteropParams, Plan, Route,
    WaitTarget, WithdrawParams,
};

/// Client-side engine for one L1/L2 chain pair.
pub struct RollupBridge {
    l1: Arc<dyn ChainClient>,
    l2: Arc<dyn ChainClient>,
    sender: Address,
    addresses: BridgeAddresses,
    /// The L2's base token; the ETH sentinel when the chain pays fees in the
    /// native asset. Pre-known fact used by withdrawal contexts.
    l2_base_token: Address,
    l2_base_token_is_eth: bool,
    decoder: RevertDecoder,
}

impl RollupBridge {
    /// A bridge over an ETH-based L2.
    pub fn new(
        l1: Arc<dyn ChainClient>,
        l2: Arc<dyn ChainClient>,
        sender: Address,
        addresses: BridgeAddresses,
    ) -> Self {
        RollupBridge {
            l1,
            l2,
            sender,
            addresses,
            l2_base_token: crate::constants::ETH_ADDRESS,
            l2_base_token_is_eth: true,
            decoder: RevertDecoder::new(),
        }
    }

    /// Declare the L2's ERC-20 base token (non-ETH-based chains).
    pub fn with_l2_base_token(mut self, base_token: Address) -> Self {
        self.l2_base_token = base_token;
        self.l2_base_token_is_eth = false;
        self
    }

    /// The revert decoder, e.g. to register additional contract ABIs.
    pub fn decoder(&self) -> &RevertDecoder {
        &self.decoder
    }

    /// Resolve, preflight, and build a deposit plan.
    pub async fn plan_deposit(&self, params: &DepositParams) -> BridgeResult<Plan> {
        let ctx = BuildContext::assemble(
            OperationKind::Deposit,
            self.l1.as_ref(),
            self.l2.as_ref(),
            self.sender,
            self.addresses,
            params.fee_overrides,
            &self.decoder,
        )
        .await?;

        let route = resolve_deposit_route(params.token, ctx.base_token);
        deposit::preflight(route, params, &ctx).await?;
        deposit::build(route, params, &ctx).await
    }

    /// Resolve, preflight, and build a withdrawal plan.
    pub async fn plan_withdrawal(&self, params: &WithdrawParams) -> BridgeResult<Plan> {
        let ctx = BuildContext::assemble_withdraw(
            self.l2.as_ref(),
            self.l1.as_ref(),
            self.sender,
            self.addresses,
            self.l2_base_token,
            self.l2_base_token_is_eth,
            params.fee_overrides,
            &self.decoder,
        );

        let route =
            resolve_withdraw_route(params.token, ctx.base_token, ctx.base_token_is_eth);
        withdraw::preflight(route, params, &ctx).await?;
        withdraw::build(route, params, &ctx).await
    }

    /// Resolve, preflight, and build an interop (L2→L2) plan toward `dest`,
    /// originating on this bridge's L2.
    pub async fn plan_interop(
        &self,
        params: &InteropParams,
        dest: &dyn ChainClient,
    ) -> BridgeResult<Plan> {
        let ctx = BuildContext::assemble(
            OperationKind::Interop,
            self.l2.as_ref(),
            dest,
            self.sender,
            self.addresses,
            params.fee_overrides,
            &self.decoder,
        )
        .await?;

        let deposit_params = params.as_deposit();
        let route = resolve_deposit_route(params.token, ctx.base_token);
        deposit::preflight(route, &deposit_params, &ctx).await?;
        deposit::build(route, &deposit_params, &ctx).await
    }

    /// Execute a built plan on its origin chain.
    pub async fn execute(&self, plan: &Plan) -> BridgeResult<Handle> {
        let origin: &dyn ChainClient = match plan.route {
            Route::Deposit(_) => self.l1.as_ref(),
            Route::Withdraw(_) => self.l2.as_ref(),
        };
        ExecutionEngine::new(origin, self.sender).execute(plan).await
    }

    /// Plan and execute a deposit.
    pub async fn deposit(&self, params: &DepositParams) -> BridgeResult<Handle> {
        let plan = self.plan_deposit(params).await?;
        self.execute(&plan).await
    }

    /// Plan and execute a withdrawal.
    pub async fn withdraw(&self, params: &WithdrawParams) -> BridgeResult<Handle> {
        let plan = self.plan_withdrawal(params).await?;
        self.execute(&plan).await
    }

    /// Current lifecycle phase of an executed operation.
    pub async fn status(&self, handle: &Handle) -> BridgeResult<BridgeStatus> {
        self.tracker(handle).status(handle).await
    }

    /// Block until the operation reaches `through`.
    pub async fn wait(&self, handle: &Handle, through: WaitTarget) -> BridgeResult<BridgeStatus> {
        self.tracker(handle).wait(handle, through).await
    }

    fn tracker(&self, handle: &Handle) -> StatusTracker<'_> {
        match handle.plan.route {
            Route::Deposit(_) => StatusTracker::new(self.l1.as_ref(), self.l2.as_ref()),
            Route::Withdraw(_) => StatusTracker::new(self.l2.as_ref(), self.l1.as_ref()),
        }
    }

    /// Classify withdrawal-finalization readiness from a finalization
    /// revert, without submitting anything.
    pub fn finalize_readiness(&self, err: &ClientError) -> FinalizeReadiness {
        self.decoder.classify_readiness(err)
    }
}

impl std::fmt::Debug for RollupBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollupBridge")
            .field("sender", &self.sender)
            .field("l1_chain_id", &self.l1.chain_id())
            .field("l2_chain_id", &self.l2.chain_id())
            .field("l2_base_token_is_eth", &self.l2_base_token_is_eth)
            .finish()
    }
}
