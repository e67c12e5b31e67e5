//! Read-Model Refresher: polls the chain into a consistent snapshot.

use crate::{
    Result,
    reader::ChainReader,
    snapshot::{Balances, PoolStats, ReadModel, UserPosition},
};
use alloy::primitives::Address;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, time};
use tracing::warn;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

pub struct Refresher<R> {
    reader: Arc<R>,
    model: ReadModel,
}

impl<R: ChainReader> Refresher<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            model: ReadModel::default(),
        }
    }

    pub fn model(&self) -> &ReadModel {
        &self.model
    }

    /// Fetch balances, position and pool stats in parallel and replace the
    /// model only when every read succeeded; otherwise keep the previous
    /// snapshot and record the failure.
    pub async fn refresh(&mut self, address: Address) -> &ReadModel {
        match self.fetch(address).await {
            Ok((balances, position, pool_stats)) => {
                self.model = ReadModel {
                    balances,
                    position,
                    pool_stats,
                    last_error: None,
                };
            }
            Err(e) => {
                warn!(%address, error = %e, "refresh failed; keeping previous snapshot");
                self.model.last_error = Some(e.to_string());
            }
        }
        &self.model
    }

    async fn fetch(
        &self,
        address: Address,
    ) -> Result<(Balances, Option<UserPosition>, Option<PoolStats>)> {
        let (stable, yield_token, position, pool_stats) = futures::try_join!(
            self.reader.stable_balance(address),
            self.reader.yield_balance(address),
            self.reader.user_position(address),
            self.reader.pool_stats(),
        )?;
        Ok((
            Balances {
                stable,
                yield_token,
            },
            position,
            pool_stats,
        ))
    }

    /// Refresh once whenever the active address changes, then every
    /// [`REFRESH_INTERVAL`] while one is set. The interval is dropped as
    /// soon as the address clears, so an idle session holds no ticking
    /// timer. Returns when the address channel closes.
    pub async fn run(
        &mut self,
        mut address: watch::Receiver<Option<Address>>,
        mut on_update: impl FnMut(&ReadModel),
    ) {
        loop {
            let Some(active) = *address.borrow_and_update() else {
                if address.changed().await.is_err() {
                    return;
                }
                continue;
            };

            on_update(self.refresh(active).await);

            let mut ticker = time::interval(REFRESH_INTERVAL);
            ticker.tick().await; // the immediate first tick; we just refreshed
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        on_update(self.refresh(active).await);
                    }
                    changed = address.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    }
}
