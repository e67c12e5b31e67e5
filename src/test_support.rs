//! Shared fakes for unit tests: scripted implementations of the gateway,
//! reader and bridge seams that record what flowed through them.

use crate::{
    Result,
    bridge::{BridgeCall, BridgeEnvelope, DepositRequest, HostBridge, WithdrawRequest},
    call::{ContractCallSpec, ExecutionResult},
    error::Error,
    gateway::CallGateway,
    reader::ChainReader,
    snapshot::{PoolStats, UserPosition},
};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    future::pending,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

#[derive(Default)]
pub(crate) struct FakeGateway {
    calls: Mutex<Vec<ContractCallSpec>>,
    failures: Mutex<HashMap<usize, Error>>,
}

impl FakeGateway {
    pub fn recorded_calls(&self) -> Vec<ContractCallSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Script the zero-based `index`-th call to fail with `error`.
    pub fn fail_call(&self, index: usize, error: Error) {
        self.failures.lock().unwrap().insert(index, error);
    }
}

#[async_trait]
impl CallGateway for FakeGateway {
    async fn execute_call(&self, spec: &ContractCallSpec) -> Result<ExecutionResult> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(spec.clone());
            calls.len() - 1
        };
        if let Some(error) = self.failures.lock().unwrap().remove(&index) {
            return Err(error);
        }
        Ok(ExecutionResult::success(Some(format!("0xtx{index}"))))
    }
}

#[derive(Default)]
pub(crate) struct FakeReader {
    stable: Mutex<U256>,
    yield_balances: Mutex<VecDeque<U256>>,
    position: Mutex<Option<UserPosition>>,
    stats: Mutex<Option<PoolStats>>,
    last_request: Mutex<U256>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

impl FakeReader {
    pub fn set_stable(&self, amount: U256) {
        *self.stable.lock().unwrap() = amount;
    }

    /// Queue the value the next `yield_balance` read returns; once the
    /// queue is drained, reads return the last queued value.
    pub fn push_yield_balance(&self, amount: U256) {
        self.yield_balances.lock().unwrap().push_back(amount);
    }

    pub fn set_stats(&self, stats: PoolStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    pub fn set_last_request(&self, id: U256) {
        *self.last_request.lock().unwrap() = id;
    }

    pub fn fail_reads(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn observe(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::network("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainReader for FakeReader {
    async fn stable_balance(&self, _owner: Address) -> Result<U256> {
        self.observe()?;
        Ok(*self.stable.lock().unwrap())
    }

    async fn yield_balance(&self, _owner: Address) -> Result<U256> {
        self.observe()?;
        let mut queue = self.yield_balances.lock().unwrap();
        match queue.len() {
            0 => Ok(U256::ZERO),
            1 => Ok(*queue.front().unwrap()),
            _ => Ok(queue.pop_front().unwrap()),
        }
    }

    async fn user_position(&self, _owner: Address) -> Result<Option<UserPosition>> {
        self.observe()?;
        Ok(self.position.lock().unwrap().clone())
    }

    async fn pool_stats(&self) -> Result<Option<PoolStats>> {
        self.observe()?;
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn last_randomness_request(&self) -> Result<U256> {
        self.observe()?;
        Ok(*self.last_request.lock().unwrap())
    }
}

#[derive(Default)]
pub(crate) struct FakeBridge {
    requests: Mutex<Vec<Vec<BridgeCall>>>,
    responses: Mutex<VecDeque<BridgeEnvelope>>,
    response_delay: Mutex<Option<Duration>>,
    auth_requests: Mutex<Vec<u64>>,
    deposits: Mutex<Vec<DepositRequest>>,
    withdrawals: Mutex<Vec<WithdrawRequest>>,
}

impl FakeBridge {
    pub fn script_response(&self, envelope: BridgeEnvelope) {
        self.responses.lock().unwrap().push_back(envelope);
    }

    pub fn delay_responses(&self, delay: Duration) {
        *self.response_delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<Vec<BridgeCall>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn deposits(&self) -> Vec<DepositRequest> {
        self.deposits.lock().unwrap().clone()
    }

    pub fn withdrawals(&self) -> Vec<WithdrawRequest> {
        self.withdrawals.lock().unwrap().clone()
    }

    pub fn auth_requests(&self) -> Vec<u64> {
        self.auth_requests.lock().unwrap().clone()
    }

    /// Pop the next scripted envelope, or hang forever like a bridge whose
    /// user never answered the confirmation sheet.
    async fn respond(&self) -> Result<BridgeEnvelope> {
        let delay = *self.response_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(envelope) => Ok(envelope),
            None => pending().await,
        }
    }
}

#[async_trait]
impl HostBridge for FakeBridge {
    async fn call_smart_contract(&self, calls: Vec<BridgeCall>) -> Result<BridgeEnvelope> {
        self.requests.lock().unwrap().push(calls);
        self.respond().await
    }

    async fn deposit(&self, request: DepositRequest) -> Result<BridgeEnvelope> {
        self.deposits.lock().unwrap().push(request);
        self.respond().await
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<BridgeEnvelope> {
        self.withdrawals.lock().unwrap().push(request);
        self.respond().await
    }

    async fn authenticate(&self, chain_id: u64) -> Result<BridgeEnvelope> {
        self.auth_requests.lock().unwrap().push(chain_id);
        self.respond().await
    }
}
