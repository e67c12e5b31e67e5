//! Read-model projections of on-chain state. Everything here is a snapshot
//! with a one-refresh-interval staleness bound; the chain is the only
//! source of truth and the only way to change a projection is a successful
//! on-chain mutation followed by a refresh.

use alloy::primitives::U256;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Balances {
    pub stable: U256,
    pub yield_token: U256,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub deposited_amount: U256,
    pub yield_token_balance: U256,
    pub accrued_yield: U256,
    pub tickets: U256,
    pub streak: U256,
    pub win_probability_bps: U256,
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolStats {
    pub total_deposits: U256,
    pub participant_count: U256,
    pub current_prize_pool: U256,
    pub seconds_until_draw: U256,
    pub estimated_weekly_yield: U256,
    pub can_draw: bool,
    pub accumulated_yield: U256,
    pub is_draw_pending: bool,
}

/// The consistent tuple handed to consumers. On a failed refresh the
/// previous snapshot is preserved and `last_error` records what went wrong,
/// so the UI never regresses to empty values mid-session.
#[derive(Clone, Debug, Default)]
pub struct ReadModel {
    pub balances: Balances,
    pub position: Option<UserPosition>,
    pub pool_stats: Option<PoolStats>,
    pub last_error: Option<String>,
}
