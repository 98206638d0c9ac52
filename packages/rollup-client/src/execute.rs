//! Plan execution
//!
//! Executes a built plan strictly in order against the origin chain. Each
//! step is confirmed (receipt obtained) before the next is sent; later
//! steps depend on the on-chain effects of earlier ones (allowance, nonce).
//! The nonce counter lives for the duration of one `execute` call; callers
//! running concurrent operations from the same sender must provide their own
//! ordering discipline.

use alloy::primitives::Address;
use tracing::{debug, info, warn};

use crate::chain::ChainClient;
use crate::constants::buffered_gas_limit;
use crate::error::{BridgeError, BridgeResult};
use crate::evm::tokens;
use crate::types::{FeeOverrides, Handle, Plan, StepKind};

/// Executes plans step-by-step with nonce and ordering discipline.
pub struct ExecutionEngine<'a> {
    client: &'a dyn ChainClient,
    sender: Address,
    fee_overrides: Option<FeeOverrides>,
}

impl<'a> ExecutionEngine<'a> {
    pub fn new(client: &'a dyn ChainClient, sender: Address) -> Self {
        ExecutionEngine {
            client,
            sender,
            fee_overrides: None,
        }
    }

    pub fn with_fee_overrides(mut self, overrides: Option<FeeOverrides>) -> Self {
        self.fee_overrides = overrides;
        self
    }

    /// Execute every step of the plan in order. A send failure or a failed
    /// receipt aborts the remaining steps.
    pub async fn execute(&self, plan: &Plan) -> BridgeResult<Handle> {
        let mut nonce = self
            .client
            .transaction_count(self.sender)
            .await
            .map_err(|e| BridgeError::rpc("read-nonce", e).with_context("sender", self.sender))?;

        let mut step_txs = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            // Plans can be executed long after they were built; an approval
            // may have become sufficient out-of-band in the meantime.
            if let StepKind::Approve {
                token,
                spender,
                amount,
            } = step.kind
            {
                let current =
                    tokens::allowance(self.client, token, self.sender, spender).await?;
                if current >= amount {
                    debug!(step = %step.key, token = %token, "Allowance now sufficient, skipping approval");
                    continue;
                }
            }

            let mut tx = step.tx.clone();
            if let Some(overrides) = self.fee_overrides {
                if let Some(max_fee) = overrides.max_fee_per_gas {
                    tx.max_fee_per_gas = Some(max_fee);
                }
                if let Some(priority) = overrides.max_priority_fee_per_gas {
                    tx.max_priority_fee_per_gas = Some(priority);
                }
                if let Some(gas) = overrides.gas_limit {
                    tx.gas = Some(gas);
                }
            }

            if tx.gas.is_none() {
                match self.client.estimate_gas(&tx, None).await {
                    Ok(estimate) => tx.gas = Some(buffered_gas_limit(estimate)),
                    // Let the execution layer apply its own default.
                    Err(e) => {
                        warn!(step = %step.key, error = %e, "Step gas estimation failed, sending without limit")
                    }
                }
            }

            tx.nonce = Some(nonce);

            let tx_hash = self.client.send(&tx).await.map_err(|e| {
                BridgeError::execution("execute-plan", e.full_message())
                    .with_context("step", &step.key)
                    .with_context("nonce", nonce)
                    .with_source(e)
            })?;
            nonce += 1;

            info!(step = %step.key, tx_hash = %tx_hash, "Step sent, waiting for inclusion");

            let receipt = self.client.wait_for_receipt(tx_hash).await.map_err(|e| {
                BridgeError::execution("execute-plan", e.full_message())
                    .with_context("step", &step.key)
                    .with_context("tx_hash", tx_hash)
                    .with_source(e)
            })?;

            if !receipt.success {
                return Err(BridgeError::execution(
                    "execute-plan",
                    "step transaction reverted",
                )
                .with_context("step", &step.key)
                .with_context("tx_hash", tx_hash));
            }

            info!(step = %step.key, tx_hash = %tx_hash, "Step confirmed");
            step_txs.push((step.key.clone(), tx_hash));
        }

        // The last sent step is the canonical origin id for tracking.
        let origin_tx = step_txs.last().map(|(_, hash)| *hash);

        Ok(Handle {
            origin_tx,
            step_txs,
            plan: plan.clone(),
        })
    }
}
