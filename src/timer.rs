//! Visibility-aware timeout used for host-bridge calls.
//!
//! While the user is confirming in the host wallet app the page is hidden
//! and its execution is effectively suspended, so wall-clock time must not
//! count against the call budget. The budget only burns while the page is
//! visible; hiding pauses it and becoming visible again resumes it with
//! whatever was left.

use std::time::Duration;
use tokio::{
    sync::watch,
    time::{self, Instant},
};

/// Pure pause/resume bookkeeping over a time budget. `running_since` is
/// `Some` while the budget is burning (page visible).
#[derive(Clone, Copy, Debug)]
pub struct PauseAwareBudget {
    remaining: Duration,
    running_since: Option<Instant>,
}

impl PauseAwareBudget {
    pub fn start(budget: Duration, now: Instant) -> Self {
        Self {
            remaining: budget,
            running_since: Some(now),
        }
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.remaining = self
                .remaining
                .saturating_sub(now.saturating_duration_since(since));
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(since)),
            None => self.remaining,
        }
    }

    pub fn is_exhausted(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

/// A cancellable timeout that only counts visible time. The `hidden`
/// channel is the injected visibility signal (`true` = page hidden).
/// Dropping the timeout — which is what losing the race does — releases the
/// channel subscription, so no observer outlives the call it guarded.
pub struct VisibilityTimeout {
    budget: PauseAwareBudget,
    hidden: watch::Receiver<bool>,
    message: String,
}

impl VisibilityTimeout {
    pub fn new(budget: Duration, hidden: watch::Receiver<bool>, message: String) -> Self {
        Self {
            budget: PauseAwareBudget::start(budget, Instant::now()),
            hidden,
            message,
        }
    }

    /// Resolves with the timeout message once the visible-time budget is
    /// spent. Never resolves while the page stays hidden.
    pub async fn expired(mut self) -> String {
        loop {
            if *self.hidden.borrow_and_update() {
                self.budget.pause(Instant::now());
                if self.hidden.changed().await.is_err() {
                    // Visibility source is gone while hidden; the page never
                    // came back. Park forever and let the raced call decide.
                    std::future::pending::<()>().await;
                }
                self.budget.resume(Instant::now());
                continue;
            }

            let now = Instant::now();
            self.budget.resume(now);
            let deadline = now + self.budget.remaining(now);
            tokio::select! {
                _ = time::sleep_until(deadline) => return self.message,
                changed = self.hidden.changed() => {
                    if changed.is_err() {
                        // No more visibility updates; run the rest of the
                        // budget down as plain visible time.
                        time::sleep_until(deadline).await;
                        return self.message;
                    }
                }
            }
        }
    }
}
