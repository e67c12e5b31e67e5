//! Position Orchestrator: the fixed multi-call protocols that move funds
//! in and out of the lottery registry.
//!
//! Opening or topping up a position is four on-chain calls executed
//! strictly in order — each step depends on the previous step's side
//! effect, and the yield balance is re-read after the supply because the
//! pool may credit fractionally less than requested. There is no rollback:
//! the chain operations already confirmed are irreversible, so a failure
//! mid-protocol leaves a partially completed position the caller must
//! surface and retry.

use crate::{
    Result,
    call::ProtocolCalls,
    config::format_stable,
    error::Error,
    gateway::CallGateway,
    reader::ChainReader,
};
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EnrollKind {
    Open,
    Add,
}

impl EnrollKind {
    fn final_label(self) -> &'static str {
        match self {
            EnrollKind::Open => "Registering position...",
            EnrollKind::Add => "Adding to position...",
        }
    }
}

/// The amount actually registered: what the pool credited, clamped to what
/// the user asked for.
pub fn register_amount(credited: U256, requested: U256) -> U256 {
    credited.min(requested)
}

pub struct PositionOrchestrator<G, R> {
    gateway: Arc<G>,
    reader: Arc<R>,
    calls: ProtocolCalls,
    account: Address,
}

impl<G: CallGateway, R: ChainReader> PositionOrchestrator<G, R> {
    pub fn new(gateway: Arc<G>, reader: Arc<R>, calls: ProtocolCalls, account: Address) -> Self {
        Self {
            gateway,
            reader,
            calls,
            account,
        }
    }

    pub async fn open_position(
        &self,
        amount: U256,
        on_progress: &mut dyn FnMut(&str),
    ) -> Result<()> {
        self.enroll(amount, EnrollKind::Open, on_progress).await
    }

    pub async fn add_to_position(
        &self,
        amount: U256,
        on_progress: &mut dyn FnMut(&str),
    ) -> Result<()> {
        self.enroll(amount, EnrollKind::Add, on_progress).await
    }

    async fn enroll(
        &self,
        amount: U256,
        kind: EnrollKind,
        on_progress: &mut dyn FnMut(&str),
    ) -> Result<()> {
        // Pre-flight: a doomed approve/supply would still cost gas, so fail
        // before touching the chain.
        let stable = self.reader.stable_balance(self.account).await?;
        if stable < amount {
            return Err(Error::InsufficientBalance {
                have: format_stable(stable),
                need: format_stable(amount),
            });
        }

        on_progress("Approving stable token for the yield pool...");
        self.step(self.calls.approve_stable_for_pool(amount)).await?;

        on_progress("Supplying to the yield pool...");
        self.step(self.calls.supply_stable(amount, self.account))
            .await?;

        // The pool rounds in its own favor; register what actually landed.
        let credited = self.reader.yield_balance(self.account).await?;
        let amount_in = register_amount(credited, amount);

        on_progress("Approving yield token for the registry...");
        self.step(self.calls.approve_yield_for_registry(amount_in))
            .await?;

        on_progress(kind.final_label());
        let final_call = match kind {
            EnrollKind::Open => self.calls.register(amount_in),
            EnrollKind::Add => self.calls.add_to_position(amount_in),
        };
        self.step(final_call).await?;

        info!(account = %self.account, amount = %amount_in, "position updated");
        Ok(())
    }

    /// Withdraw the whole position (principal plus yield share) back to the
    /// wallet.
    pub async fn withdraw(&self, on_progress: &mut dyn FnMut(&str)) -> Result<()> {
        on_progress("Withdrawing from the registry...");
        self.step(self.calls.unregister()).await?;
        Ok(())
    }

    pub async fn claim_prize(&self, on_progress: &mut dyn FnMut(&str)) -> Result<()> {
        on_progress("Claiming prize...");
        self.step(self.calls.claim_prize()).await?;
        Ok(())
    }

    async fn step(&self, spec: crate::call::ContractCallSpec) -> Result<()> {
        if let Err(e) = self.gateway.execute_call(&spec).await {
            error!(function = %spec.function, error = %e, "protocol step failed; aborting");
            return Err(e);
        }
        Ok(())
    }
}
