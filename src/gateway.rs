//! Contract Call Gateway: one interface, two execution backends.
//!
//! The direct-signer backend builds a transaction, submits it and waits for
//! the receipt. The host-bridge backend forwards the call to the embedding
//! wallet's SDK and races it against the visibility-aware timeout — the
//! budget is kept strictly inside the bridge's own 60 s limit so our
//! descriptive error preempts the bridge's generic one. The batch path
//! (bridge only) submits an ordered list of calls as one request so the
//! user confirms once.

use crate::{
    Result,
    bridge::{BridgeCall, BridgeEnvelope, BridgeStatus, HostBridge},
    call::{CallStatus, ContractCallSpec, ExecutionResult},
    error::Error,
    timer::VisibilityTimeout,
};
use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::Function,
    network::TransactionBuilder,
    providers::Provider,
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Visible-time budget for one bridge request, single call or batch.
pub const BRIDGE_CALL_TIMEOUT: Duration = Duration::from_millis(55_000);

#[async_trait]
pub trait CallGateway: Send + Sync {
    /// Execute one contract call and interpret its outcome; anything short
    /// of confirmed success comes back as an error.
    async fn execute_call(&self, spec: &ContractCallSpec) -> Result<ExecutionResult>;
}

/// Canonical signatures for every function the client submits, mirroring
/// the minimal ABI the contracts expose. The bridge only needs the bare
/// name; the direct backend needs the full signature to encode calldata.
fn canonical_signature(function: &str) -> Result<&'static str> {
    Ok(match function {
        "approve" => "approve(address,uint256)",
        "supply" => "supply(address,uint256,address,uint16)",
        "register" => "register(uint256)",
        "addToPosition" => "addToPosition(uint256)",
        "unregister" => "unregister()",
        "claimPrize" => "claimPrize()",
        "startDraw" => "startDraw()",
        "completeDraw" => "completeDraw()",
        "completeRequest" => "completeRequest(uint256,uint256)",
        other => {
            return Err(Error::ContractFailed {
                function: other.to_string(),
                detail: "no ABI entry for function".to_string(),
            });
        }
    })
}

/// ABI-encode a call spec's string arguments into selector-prefixed
/// calldata.
pub(crate) fn encode_call_data(spec: &ContractCallSpec) -> Result<Vec<u8>> {
    let signature = canonical_signature(&spec.function)?;
    let function = Function::parse(signature).map_err(|e| Error::ContractFailed {
        function: spec.function.clone(),
        detail: format!("bad signature: {e}"),
    })?;
    if function.inputs.len() != spec.args.len() {
        return Err(Error::ContractFailed {
            function: spec.function.clone(),
            detail: format!(
                "expected {} arguments, got {}",
                function.inputs.len(),
                spec.args.len()
            ),
        });
    }
    let mut values: Vec<DynSolValue> = Vec::with_capacity(spec.args.len());
    for (input, raw) in function.inputs.iter().zip(&spec.args) {
        let ty = input.resolve().map_err(|e| Error::ContractFailed {
            function: spec.function.clone(),
            detail: format!("unresolvable parameter {}: {e}", input.ty),
        })?;
        let value = ty.coerce_str(raw).map_err(|e| Error::ContractFailed {
            function: spec.function.clone(),
            detail: format!("argument {raw:?} does not fit {}: {e}", input.ty),
        })?;
        values.push(value);
    }
    function
        .abi_encode_input(&values)
        .map_err(|e| Error::ContractFailed {
            function: spec.function.clone(),
            detail: format!("encoding failed: {e}"),
        })
}

/// Direct path: sign with the connected wallet, submit, wait for the
/// receipt. A reverted receipt is a failure carrying the transaction hash.
#[derive(Clone)]
pub struct SignerGateway<P> {
    provider: P,
}

impl<P: Provider> SignerGateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider> CallGateway for SignerGateway<P> {
    async fn execute_call(&self, spec: &ContractCallSpec) -> Result<ExecutionResult> {
        let input = encode_call_data(spec)?;
        let tx = TransactionRequest::default()
            .with_to(spec.target)
            .with_value(spec.value)
            .with_input(input);

        debug!(function = %spec.function, target = %spec.target_prefix(), "submitting transaction");
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(Error::network)?;
        let receipt = pending.get_receipt().await.map_err(Error::network)?;

        if !receipt.status() {
            warn!(function = %spec.function, tx = %receipt.transaction_hash, "transaction reverted");
            return Err(Error::ContractFailed {
                function: spec.function.clone(),
                detail: format!("reverted in tx {}", receipt.transaction_hash),
            });
        }
        Ok(ExecutionResult::success(Some(
            receipt.transaction_hash.to_string(),
        )))
    }
}

/// Bridge path: forward to the host wallet SDK with the mandatory chain id
/// and race against the visibility-aware timeout. Whichever side loses the
/// race is dropped, which cancels it — the timeout's visibility observer
/// does not outlive the call.
pub struct BridgeGateway<B> {
    bridge: B,
    chain_id: u64,
    hidden: watch::Receiver<bool>,
}

impl<B: HostBridge> BridgeGateway<B> {
    pub fn new(bridge: B, chain_id: u64, hidden: watch::Receiver<bool>) -> Self {
        Self {
            bridge,
            chain_id,
            hidden,
        }
    }

    fn wire_call(&self, spec: &ContractCallSpec) -> BridgeCall {
        BridgeCall {
            contract_address: spec.target.to_string(),
            function_name: spec.function.clone(),
            function_params: spec.args.clone(),
            value: spec.value.to_string(),
            chain_id: self.chain_id,
            contract_standard: spec.standard.map(|s| s.as_str().to_string()),
        }
    }

    /// A fulfilled bridge call is not a successful one; the envelope's
    /// status decides.
    fn envelope_result(envelope: &BridgeEnvelope) -> ExecutionResult {
        let status = match envelope.result {
            BridgeStatus::Success => CallStatus::Success,
            BridgeStatus::Failed => CallStatus::Failed,
            BridgeStatus::Cancelled => CallStatus::Cancelled,
        };
        ExecutionResult {
            status,
            detail: Some(envelope.detail()),
            tx_hash: envelope.tx_hash(),
        }
    }

    fn interpret(envelope: BridgeEnvelope, context: &str, function: &str) -> Result<ExecutionResult> {
        let result = Self::envelope_result(&envelope);
        match result.status {
            CallStatus::Success => Ok(result),
            CallStatus::Cancelled => {
                warn!(%context, "bridge call cancelled by user");
                Err(Error::Cancelled {
                    context: context.to_string(),
                })
            }
            CallStatus::Failed => {
                let detail = result.detail.unwrap_or_default();
                warn!(%context, %detail, "bridge call failed");
                Err(Error::ContractFailed {
                    function: function.to_string(),
                    detail,
                })
            }
        }
    }

    /// Submit an ordered batch as one bridge request (single user
    /// confirmation) under one shared visible-time budget.
    pub async fn execute_batch(&self, specs: &[ContractCallSpec]) -> Result<ExecutionResult> {
        let calls: Vec<BridgeCall> = specs.iter().map(|spec| self.wire_call(spec)).collect();
        let context = format!("batch of {} contract calls", calls.len());
        let timeout = VisibilityTimeout::new(
            BRIDGE_CALL_TIMEOUT,
            self.hidden.clone(),
            format!("executing {context}"),
        );

        tokio::select! {
            envelope = self.bridge.call_smart_contract(calls) => {
                Self::interpret(envelope?, &context, &context)
            }
            message = timeout.expired() => Err(Error::Timeout { context: message }),
        }
    }
}

#[async_trait]
impl<B: HostBridge> CallGateway for BridgeGateway<B> {
    async fn execute_call(&self, spec: &ContractCallSpec) -> Result<ExecutionResult> {
        let context = format!("{} on {}", spec.function, spec.target_prefix());
        let timeout = VisibilityTimeout::new(
            BRIDGE_CALL_TIMEOUT,
            self.hidden.clone(),
            format!(
                "calling {} on contract {}…",
                spec.function,
                spec.target_prefix()
            ),
        );

        tokio::select! {
            envelope = self.bridge.call_smart_contract(vec![self.wire_call(spec)]) => {
                Self::interpret(envelope?, &context, &spec.function)
            }
            message = timeout.expired() => Err(Error::Timeout { context: message }),
        }
    }
}
