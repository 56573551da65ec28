//! Scripted in-memory chain.
//!
//! Serves logs and view-call results that were registered up front, and
//! counts every request so callers can assert which reads were made. Calls
//! without a scripted response behave like a reverted `eth_call`.

use std::collections::HashMap;
use std::time::Duration;

use alloy::rpc::types::{Filter, Log};
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::errors::ChainError;
use super::reader::ChainReader;

#[derive(Default)]
struct SimulatedState {
    head: u64,
    logs: Vec<Log>,
    responses: HashMap<(Address, Bytes), Result<Bytes, String>>,
    calls_by_selector: HashMap<[u8; 4], usize>,
    log_queries: Vec<(u64, u64)>,
    offline: bool,
    latency: Duration,
}

pub struct SimulatedChain {
    chain_id: u64,
    state: Mutex<SimulatedState>,
}

impl SimulatedChain {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            state: Mutex::new(SimulatedState::default()),
        }
    }

    pub fn set_head(&self, block: u64) {
        self.state.lock().head = block;
    }

    /// Make every subsequent read fail as if the endpoint were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Delay every subsequent read by `latency` before it is answered
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// Emit `event` from `address` in `block`. Moves the head forward if needed.
    pub fn emit<E: SolEvent>(&self, address: Address, block: u64, event: &E) {
        let log = Log {
            inner: alloy_primitives::Log {
                address,
                data: event.encode_log_data(),
            },
            block_number: Some(block),
            ..Default::default()
        };

        let mut state = self.state.lock();
        state.logs.push(log);
        state.logs.sort_by_key(|l| l.block_number);
        state.head = state.head.max(block);
    }

    /// Answer `call` on `to` with the raw ABI-encoded `output`
    pub fn respond<C: SolCall>(&self, to: Address, call: &C, output: impl Into<Bytes>) {
        let input = Bytes::from(call.abi_encode());
        self.state
            .lock()
            .responses
            .insert((to, input), Ok(output.into()));
    }

    /// Make `call` on `to` revert with `reason`
    pub fn revert<C: SolCall>(&self, to: Address, call: &C, reason: &str) {
        let input = Bytes::from(call.abi_encode());
        self.state
            .lock()
            .responses
            .insert((to, input), Err(reason.to_string()));
    }

    /// Number of calls made to the function `C`, whatever the arguments
    pub fn call_count<C: SolCall>(&self) -> usize {
        self.state
            .lock()
            .calls_by_selector
            .get(&C::SELECTOR)
            .copied()
            .unwrap_or(0)
    }

    /// Block ranges of every log query, in order
    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.state.lock().log_queries.clone()
    }

    async fn delay(&self) {
        let latency = self.state.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn offline_error(&self) -> ChainError {
        ChainError::Rpc {
            chain_id: self.chain_id,
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl ChainReader for SimulatedChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.delay().await;
        let state = self.state.lock();
        if state.offline {
            return Err(self.offline_error());
        }
        Ok(state.head)
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError> {
        self.delay().await;
        let mut state = self.state.lock();
        if state.offline {
            return Err(self.offline_error());
        }

        let from = filter.get_from_block().unwrap_or(0);
        let to = filter.get_to_block().unwrap_or(state.head);
        state.log_queries.push((from, to));

        let matching = state
            .logs
            .iter()
            .filter(|log| {
                let block = log.block_number.unwrap_or(0);
                block >= from
                    && block <= to
                    && filter.address.matches(&log.address())
                    && log
                        .topics()
                        .first()
                        .map(|topic| filter.topics[0].matches(topic))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();

        Ok(matching)
    }

    async fn call(
        &self,
        to: Address,
        input: Bytes,
        _block: Option<u64>,
    ) -> Result<Bytes, ChainError> {
        self.delay().await;
        let mut state = self.state.lock();
        if state.offline {
            return Err(self.offline_error());
        }

        if input.len() >= 4 {
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&input[..4]);
            *state.calls_by_selector.entry(selector).or_insert(0) += 1;
        }

        match state.responses.get(&(to, input)) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(ChainError::Rpc {
                chain_id: self.chain_id,
                reason: format!("execution reverted: {}", reason),
            }),
            None => Err(ChainError::Rpc {
                chain_id: self.chain_id,
                reason: "execution reverted".to_string(),
            }),
        }
    }
}
