//! Per-request deadline for any `ChainReader`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::rpc::types::{Filter, Log};
use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use super::errors::ChainError;
use super::reader::ChainReader;

/// Fails any read that takes longer than `timeout` with `ChainError::Timeout`
pub struct TimeoutReader {
    inner: Arc<dyn ChainReader>,
    timeout: Duration,
}

impl TimeoutReader {
    pub fn new(inner: Arc<dyn ChainReader>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<F, T>(&self, what: &str, request: F) -> Result<T, ChainError>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    target: "chain_registry",
                    chain_id = self.inner.chain_id(),
                    request = what,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "RPC request timed out"
                );
                Err(ChainError::Timeout {
                    chain_id: self.inner.chain_id(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl ChainReader for TimeoutReader {
    fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.bounded("eth_blockNumber", self.inner.block_number())
            .await
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError> {
        self.bounded("eth_getLogs", self.inner.logs(filter)).await
    }

    async fn call(
        &self,
        to: Address,
        input: Bytes,
        block: Option<u64>,
    ) -> Result<Bytes, ChainError> {
        self.bounded("eth_call", self.inner.call(to, input, block))
            .await
    }
}
