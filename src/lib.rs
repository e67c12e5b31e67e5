//! Client core for a no-loss lottery savings product.
//!
//! Deposits of a stable token are supplied to a yield-bearing lending pool;
//! the accrued yield is raffled to one participant each week while principal
//! stays withdrawable. This crate owns the transaction orchestration over
//! two execution backends (a direct signer and a host-wallet bridge), the
//! weekly draw state machine, and the polled on-chain read model. Rendering
//! and wallet-connection UX live in the embedding UI layer, which drives the
//! operations exposed by [`client::LottyClient`].

pub mod bridge;
pub mod call;
pub mod client;
pub mod config;
pub mod draw;
pub mod error;
pub mod gateway;
pub mod position;
pub mod reader;
pub mod refresh;
pub mod snapshot;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::LottyClient;
pub use error::{Error, ErrorCategory};

pub type Result<T, E = Error> = std::result::Result<T, E>;
