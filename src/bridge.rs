//! Wire types and seam for the host-wallet bridge SDK.
//!
//! Inside the host app's WebView the client has no direct signer; every
//! operation goes through the embedder's bridge object and resolves once
//! the user confirms or rejects in the host wallet UI. The bridge answers
//! with a result envelope — a resolved call is not a successful call.

use crate::{Result, error::Error};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tokio::time;

/// The bridge rejects auth much faster than contract calls; no visibility
/// pause is needed because authentication happens before any app switch.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// One contract call as the bridge expects it on the wire. `chainId` is
/// always present; omitting it makes the bridge stall past its own
/// internal timeout instead of failing fast.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BridgeCall {
    pub contract_address: String,
    pub function_name: String,
    pub function_params: Vec<String>,
    pub value: String,
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_standard: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeStatus {
    Success,
    Failed,
    Cancelled,
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeStatus::Success => "SUCCESS",
            BridgeStatus::Failed => "FAILED",
            BridgeStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgePayload {
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub wallet: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BridgeErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BridgeEnvelope {
    pub result: BridgeStatus,
    #[serde(default)]
    pub data: Option<BridgePayload>,
    #[serde(default)]
    pub error: Option<BridgeErrorDetail>,
}

impl BridgeEnvelope {
    pub fn success_with(data: BridgePayload) -> Self {
        Self {
            result: BridgeStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    /// The bridge's own description of what went wrong, falling back to the
    /// raw status so `CANCELLED` envelopes stay classifiable.
    pub fn detail(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| self.result.to_string())
    }

    pub fn tx_hash(&self) -> Option<String> {
        self.data.as_ref().and_then(|d| d.tx_hash.clone())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub amount: String,
    /// The bridge resolves tokens by name, not by address.
    pub token_name: String,
    pub chain_id: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: String,
    pub token_name: String,
}

/// The embedder-provided SDK object. Implementations forward over whatever
/// transport the WebView offers; transport failures surface as [`Error`],
/// user-level outcomes as envelope statuses.
#[async_trait]
pub trait HostBridge: Send + Sync {
    async fn call_smart_contract(&self, calls: Vec<BridgeCall>) -> Result<BridgeEnvelope>;
    async fn deposit(&self, request: DepositRequest) -> Result<BridgeEnvelope>;
    async fn withdraw(&self, request: WithdrawRequest) -> Result<BridgeEnvelope>;
    async fn authenticate(&self, chain_id: u64) -> Result<BridgeEnvelope>;
}

#[async_trait]
impl<T: HostBridge + ?Sized> HostBridge for std::sync::Arc<T> {
    async fn call_smart_contract(&self, calls: Vec<BridgeCall>) -> Result<BridgeEnvelope> {
        (**self).call_smart_contract(calls).await
    }

    async fn deposit(&self, request: DepositRequest) -> Result<BridgeEnvelope> {
        (**self).deposit(request).await
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<BridgeEnvelope> {
        (**self).withdraw(request).await
    }

    async fn authenticate(&self, chain_id: u64) -> Result<BridgeEnvelope> {
        (**self).authenticate(chain_id).await
    }
}

/// Session-level bridge operations: authentication and host-wallet funding.
pub struct BridgeSession<B> {
    bridge: B,
    chain_id: u64,
}

impl<B: HostBridge> BridgeSession<B> {
    pub fn new(bridge: B, chain_id: u64) -> Self {
        Self { bridge, chain_id }
    }

    /// Authenticate against the host wallet and return the hosted account
    /// address.
    pub async fn authenticate(&self) -> Result<alloy::primitives::Address> {
        let envelope = time::timeout(AUTH_TIMEOUT, self.bridge.authenticate(self.chain_id))
            .await
            .map_err(|_| Error::Timeout {
                context: "authenticating with the host wallet".to_string(),
            })??;
        if envelope.result != BridgeStatus::Success {
            tracing::warn!(status = %envelope.result, "host wallet authentication rejected");
            return Err(Error::bridge(format!(
                "authentication {}",
                envelope.detail()
            )));
        }
        let wallet = envelope
            .data
            .as_ref()
            .and_then(|d| d.wallet.as_deref())
            .ok_or_else(|| Error::bridge("authentication envelope missing wallet"))?;
        wallet
            .parse()
            .map_err(|_| Error::bridge(format!("unparseable wallet address {wallet}")))
    }

    /// Move funds from the host wallet into the hosted account.
    pub async fn deposit(&self, amount: impl fmt::Display, token_name: &str) -> Result<BridgeEnvelope> {
        let envelope = self
            .bridge
            .deposit(DepositRequest {
                amount: amount.to_string(),
                token_name: token_name.to_string(),
                chain_id: self.chain_id,
            })
            .await?;
        if envelope.result != BridgeStatus::Success {
            return Err(Error::bridge(format!("deposit {}", envelope.detail())));
        }
        Ok(envelope)
    }

    /// Move funds back out to the host wallet.
    pub async fn withdraw(&self, amount: impl fmt::Display, token_name: &str) -> Result<BridgeEnvelope> {
        let envelope = self
            .bridge
            .withdraw(WithdrawRequest {
                amount: amount.to_string(),
                token_name: token_name.to_string(),
            })
            .await?;
        if envelope.result != BridgeStatus::Success {
            return Err(Error::bridge(format!("withdraw {}", envelope.detail())));
        }
        Ok(envelope)
    }
}
