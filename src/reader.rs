//! Read-only chain access behind a seam so orchestration code can be
//! exercised against fakes.

use crate::{
    Result,
    config::ChainAddresses,
    error::Error,
    snapshot::{PoolStats, UserPosition},
};
use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};
use async_trait::async_trait;
use tracing::debug;

sol! {
    #[sol(rpc)]
    interface IErc20 {
        function balanceOf(address owner) external view returns (uint256);
    }

    #[sol(rpc)]
    interface ILottyRegistry {
        function getUserInfo(address user) external view returns (
            uint256 deposited,
            uint256 yieldBalance,
            uint256 accruedYield,
            uint256 tickets,
            uint256 streak,
            uint256 winProbabilityBps,
            bool isActive
        );
        function getStats() external view returns (
            uint256 totalDeposits,
            uint256 participantCount,
            uint256 currentPrizePool,
            uint256 timeUntilDraw,
            uint256 estimatedWeeklyYield,
            bool canDraw
        );
        function getAccumulatedYield() external view returns (uint256);
        function isDrawPending() external view returns (bool);
    }

    #[sol(rpc)]
    interface IRandomnessOracle {
        function getLastRequestId() external view returns (uint256);
    }
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn stable_balance(&self, owner: Address) -> Result<U256>;
    async fn yield_balance(&self, owner: Address) -> Result<U256>;
    /// `None` when the account has never registered (the registry reverts
    /// the lookup for unknown accounts).
    async fn user_position(&self, owner: Address) -> Result<Option<UserPosition>>;
    /// `None` when the registry is unreachable or not deployed.
    async fn pool_stats(&self) -> Result<Option<PoolStats>>;
    async fn last_randomness_request(&self) -> Result<U256>;
}

/// JSON-RPC implementation over a stateless, reusable provider; reads may
/// run concurrently on clones of the same connection.
#[derive(Clone)]
pub struct RpcChainReader<P> {
    provider: P,
    addresses: ChainAddresses,
}

impl<P: Provider + Clone> RpcChainReader<P> {
    pub fn new(provider: P, addresses: ChainAddresses) -> Self {
        Self {
            provider,
            addresses,
        }
    }
}

#[async_trait]
impl<P: Provider + Clone> ChainReader for RpcChainReader<P> {
    async fn stable_balance(&self, owner: Address) -> Result<U256> {
        IErc20::new(self.addresses.stable_token, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(Error::network)
    }

    async fn yield_balance(&self, owner: Address) -> Result<U256> {
        IErc20::new(self.addresses.yield_token, self.provider.clone())
            .balanceOf(owner)
            .call()
            .await
            .map_err(Error::network)
    }

    async fn user_position(&self, owner: Address) -> Result<Option<UserPosition>> {
        let registry = ILottyRegistry::new(self.addresses.registry, self.provider.clone());
        match registry.getUserInfo(owner).call().await {
            Ok(info) => Ok(Some(UserPosition {
                deposited_amount: info.deposited,
                yield_token_balance: info.yieldBalance,
                accrued_yield: info.accruedYield,
                tickets: info.tickets,
                streak: info.streak,
                win_probability_bps: info.winProbabilityBps,
                is_active: info.isActive,
            })),
            Err(e) => {
                debug!(%owner, error = %e, "getUserInfo read failed; treating as unregistered");
                Ok(None)
            }
        }
    }

    async fn pool_stats(&self) -> Result<Option<PoolStats>> {
        let registry = ILottyRegistry::new(self.addresses.registry, self.provider.clone());
        let stats = match registry.getStats().call().await {
            Ok(stats) => stats,
            Err(e) => {
                debug!(error = %e, "getStats read failed");
                return Ok(None);
            }
        };
        // Older registry deployments lack these two views; default rather
        // than fail the whole refresh.
        let accumulated_yield = registry
            .getAccumulatedYield()
            .call()
            .await
            .unwrap_or_default();
        let is_draw_pending = registry.isDrawPending().call().await.unwrap_or_default();

        Ok(Some(PoolStats {
            total_deposits: stats.totalDeposits,
            participant_count: stats.participantCount,
            current_prize_pool: stats.currentPrizePool,
            seconds_until_draw: stats.timeUntilDraw,
            estimated_weekly_yield: stats.estimatedWeeklyYield,
            can_draw: stats.canDraw,
            accumulated_yield,
            is_draw_pending,
        }))
    }

    async fn last_randomness_request(&self) -> Result<U256> {
        IRandomnessOracle::new(self.addresses.randomness_oracle, self.provider.clone())
            .getLastRequestId()
            .call()
            .await
            .map_err(Error::network)
    }
}
