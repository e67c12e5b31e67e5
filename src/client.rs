//! Facade wiring the gateway, reader, orchestrator, draw coordinator and
//! refresher into the surface the UI layer consumes.
//!
//! Every mutating operation resynchronizes the read model afterwards,
//! whatever the outcome — a failed protocol may still have committed its
//! early steps, and only a fresh read reflects that. The facade takes no
//! single-flight lock: two overlapping mutations against the same position
//! are a caller bug, and the embedding layer must disable its controls
//! while an operation is in flight.

use crate::{
    Result,
    call::ProtocolCalls,
    config::Network,
    draw::{DrawCoordinator, DrawPhase},
    error::Error,
    gateway::CallGateway,
    position::PositionOrchestrator,
    reader::ChainReader,
    refresh::Refresher,
    snapshot::ReadModel,
};
use alloy::primitives::{Address, U256};
use std::sync::Arc;

pub struct LottyClient<G, R> {
    account: Address,
    positions: PositionOrchestrator<G, R>,
    draw: DrawCoordinator<G, R>,
    refresher: Refresher<R>,
}

impl<G: CallGateway, R: ChainReader> LottyClient<G, R> {
    pub fn new(gateway: G, reader: R, network: Network, account: Address) -> Self {
        let gateway = Arc::new(gateway);
        let reader = Arc::new(reader);
        let calls = ProtocolCalls::new(network);
        Self {
            account,
            positions: PositionOrchestrator::new(
                gateway.clone(),
                reader.clone(),
                calls,
                account,
            ),
            draw: DrawCoordinator::new(gateway, reader.clone(), calls),
            refresher: Refresher::new(reader),
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn read_model(&self) -> &ReadModel {
        self.refresher.model()
    }

    pub fn draw_phase(&self) -> DrawPhase {
        self.draw.phase()
    }

    /// Pull a fresh snapshot and reconcile the draw phase against it.
    pub async fn refresh(&mut self) -> &ReadModel {
        self.refresher.refresh(self.account).await;
        if let Some(stats) = self.refresher.model().pool_stats.clone() {
            self.draw.sync(&stats);
        }
        self.refresher.model()
    }

    pub async fn open_position(
        &mut self,
        amount: U256,
        mut on_progress: impl FnMut(&str),
    ) -> Result<()> {
        let outcome = self.positions.open_position(amount, &mut on_progress).await;
        self.refresh().await;
        outcome
    }

    pub async fn add_to_position(
        &mut self,
        amount: U256,
        mut on_progress: impl FnMut(&str),
    ) -> Result<()> {
        let outcome = self
            .positions
            .add_to_position(amount, &mut on_progress)
            .await;
        self.refresh().await;
        outcome
    }

    pub async fn withdraw(&mut self, mut on_progress: impl FnMut(&str)) -> Result<()> {
        let outcome = self.positions.withdraw(&mut on_progress).await;
        self.refresh().await;
        outcome
    }

    pub async fn claim_prize(&mut self, mut on_progress: impl FnMut(&str)) -> Result<()> {
        let outcome = self.positions.claim_prize(&mut on_progress).await;
        self.refresh().await;
        outcome
    }

    pub async fn start_draw(&mut self, mut on_progress: impl FnMut(&str)) -> Result<()> {
        let stats = self
            .refresher
            .model()
            .pool_stats
            .clone()
            .ok_or(Error::PoolStateUnavailable)?;
        let outcome = self.draw.start_draw(&stats, &mut on_progress).await;
        self.refresh().await;
        outcome
    }

    pub async fn complete_randomness(
        &mut self,
        mut on_progress: impl FnMut(&str),
    ) -> Result<()> {
        let outcome = self.draw.complete_randomness(&mut on_progress).await;
        self.refresh().await;
        outcome
    }

    pub async fn complete_draw(&mut self, mut on_progress: impl FnMut(&str)) -> Result<()> {
        let outcome = self.draw.complete_draw(&mut on_progress).await;
        self.refresh().await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::{
        snapshot::PoolStats,
        test_support::{FakeGateway, FakeReader},
    };

    fn client_with(
        gateway: FakeGateway,
        reader: FakeReader,
    ) -> LottyClient<FakeGateway, FakeReader> {
        LottyClient::new(
            gateway,
            reader,
            Network::Testnet,
            Address::repeat_byte(0x42),
        )
    }

    #[tokio::test]
    async fn open_position__any_outcome__resyncs_the_read_model() {
        // given
        let gateway = FakeGateway::default();
        let reader = FakeReader::default();
        reader.set_stable(U256::from(50_000_000u64));
        reader.push_yield_balance(U256::from(10_000_000u64));
        let mut client = client_with(gateway, reader);
        assert_eq!(client.read_model().balances.stable, U256::ZERO);

        // when
        client
            .open_position(U256::from(10_000_000u64), |_| {})
            .await
            .unwrap();

        // then the passive model reflects the post-operation chain state
        assert_eq!(
            client.read_model().balances.stable,
            U256::from(50_000_000u64)
        );
        assert!(client.read_model().last_error.is_none());
    }

    #[tokio::test]
    async fn open_position__insufficient_balance__still_resyncs() {
        let gateway = FakeGateway::default();
        let reader = FakeReader::default();
        reader.set_stable(U256::from(1_000_000u64));
        let mut client = client_with(gateway, reader);

        let outcome = client
            .open_position(U256::from(10_000_000u64), |_| {})
            .await;

        assert!(outcome.is_err());
        assert_eq!(
            client.read_model().balances.stable,
            U256::from(1_000_000u64)
        );
    }

    #[tokio::test]
    async fn refresh__pending_draw_on_chain__drives_the_draw_phase() {
        let gateway = FakeGateway::default();
        let reader = FakeReader::default();
        reader.set_stats(PoolStats {
            is_draw_pending: true,
            ..PoolStats::default()
        });
        let mut client = client_with(gateway, reader);
        assert_eq!(client.draw_phase(), DrawPhase::Idle);

        client.refresh().await;

        assert_eq!(client.draw_phase(), DrawPhase::AwaitingRandomness);
    }

    #[tokio::test]
    async fn start_draw__no_pool_stats_yet__requires_a_refresh_first() {
        let err = {
            let mut client = client_with(FakeGateway::default(), FakeReader::default());
            client.start_draw(|_| {}).await.unwrap_err()
        };
        assert!(matches!(err, Error::PoolStateUnavailable));
    }
}
