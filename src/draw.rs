//! Weekly draw lifecycle: start → randomness → completion.
//!
//! The phase is never trusted client state. The chain only says whether a
//! draw is pending; the local phase merely splits the two pending
//! sub-states (randomness requested vs. fulfilled), and every sync against
//! fresh pool stats lets the chain win any disagreement.

use crate::{
    Result,
    call::ProtocolCalls,
    error::Error,
    gateway::CallGateway,
    reader::ChainReader,
    snapshot::PoolStats,
};
use alloy::primitives::U256;
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DrawPhase {
    #[default]
    Idle,
    AwaitingRandomness,
    AwaitingCompletion,
}

impl DrawPhase {
    pub fn name(self) -> &'static str {
        match self {
            DrawPhase::Idle => "idle",
            DrawPhase::AwaitingRandomness => "awaiting randomness",
            DrawPhase::AwaitingCompletion => "awaiting completion",
        }
    }

    /// Recompute the phase from fresh chain flags. A non-pending chain
    /// always means idle; a pending chain keeps a locally known
    /// `AwaitingCompletion`, since the flags cannot distinguish it from
    /// `AwaitingRandomness`.
    pub fn reconcile(self, stats: &PoolStats) -> DrawPhase {
        if !stats.is_draw_pending {
            DrawPhase::Idle
        } else if self == DrawPhase::AwaitingCompletion {
            DrawPhase::AwaitingCompletion
        } else {
            DrawPhase::AwaitingRandomness
        }
    }
}

pub struct DrawCoordinator<G, R> {
    gateway: Arc<G>,
    reader: Arc<R>,
    calls: ProtocolCalls,
    phase: DrawPhase,
}

impl<G: CallGateway, R: ChainReader> DrawCoordinator<G, R> {
    pub fn new(gateway: Arc<G>, reader: Arc<R>, calls: ProtocolCalls) -> Self {
        Self {
            gateway,
            reader,
            calls,
            phase: DrawPhase::Idle,
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn sync(&mut self, stats: &PoolStats) -> DrawPhase {
        self.phase = self.phase.reconcile(stats);
        self.phase
    }

    /// Kick off the weekly draw. Requires the pool to flag `can_draw`;
    /// anything else is a caller error and no transaction is submitted.
    pub async fn start_draw(
        &mut self,
        stats: &PoolStats,
        on_progress: &mut dyn FnMut(&str),
    ) -> Result<()> {
        self.sync(stats);
        if self.phase != DrawPhase::Idle {
            return Err(Error::InvalidDrawTransition {
                attempted: "start the draw",
                phase: self.phase.name(),
            });
        }
        if !stats.can_draw {
            return Err(Error::InvalidDrawTransition {
                attempted: "start the draw",
                phase: "not yet due",
            });
        }

        on_progress("Starting draw...");
        self.gateway.execute_call(&self.calls.start_draw()).await?;
        self.phase = DrawPhase::AwaitingRandomness;
        info!("draw started");
        Ok(())
    }

    /// Fulfill the oracle's pending request with a client-generated value.
    /// Test/staging affordance for the mock oracle only — production
    /// oracles answer their requests autonomously.
    pub async fn complete_randomness(&mut self, on_progress: &mut dyn FnMut(&str)) -> Result<()> {
        if self.phase != DrawPhase::AwaitingRandomness {
            return Err(Error::InvalidDrawTransition {
                attempted: "provide randomness",
                phase: self.phase.name(),
            });
        }

        on_progress("Providing random number...");
        let request_id = self.reader.last_randomness_request().await?;
        let word = U256::from(rand::random::<u64>());
        self.gateway
            .execute_call(&self.calls.fulfill_randomness(request_id, word))
            .await?;
        self.phase = DrawPhase::AwaitingCompletion;
        info!(%request_id, "randomness fulfilled");
        Ok(())
    }

    /// Finalize: the registry selects the winner and resets the pending
    /// flags atomically.
    pub async fn complete_draw(&mut self, on_progress: &mut dyn FnMut(&str)) -> Result<()> {
        if self.phase != DrawPhase::AwaitingCompletion {
            return Err(Error::InvalidDrawTransition {
                attempted: "complete the draw",
                phase: self.phase.name(),
            });
        }

        on_progress("Completing draw...");
        self.gateway.execute_call(&self.calls.complete_draw()).await?;
        self.phase = DrawPhase::Idle;
        info!("draw completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
