//! Read-only access to a single chain.
//!
//! `ChainReader` is the seam between the cache and the RPC transport. The
//! production implementation wraps an alloy HTTP provider; tests and dry
//! runs use `SimulatedChain`.

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{BlockId, Filter, Log, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use super::errors::ChainError;

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Chain id this reader is connected to
    fn chain_id(&self) -> u64;

    /// Current head block number
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Logs matching the filter, in block order
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError>;

    /// Execute a read-only call, at `block` or at the head when `None`
    async fn call(&self, to: Address, input: Bytes, block: Option<u64>)
        -> Result<Bytes, ChainError>;
}

/// ABI-encode `call`, execute it against `to` and decode the return value.
pub async fn call_view<C>(
    reader: &dyn ChainReader,
    to: Address,
    call: C,
    block: Option<u64>,
) -> Result<C::Return, ChainError>
where
    C: SolCall + Send,
{
    let input = Bytes::from(call.abi_encode());
    let output = reader.call(to, input, block).await?;

    C::abi_decode_returns(&output).map_err(|e| ChainError::Decode {
        chain_id: reader.chain_id(),
        what: C::SIGNATURE,
        reason: e.to_string(),
    })
}

/// `ChainReader` backed by a JSON-RPC HTTP endpoint.
///
/// Requests are not bounded here; the registry wraps every endpoint in a
/// `TimeoutReader`.
pub struct RpcChainReader {
    chain_id: u64,
    provider: DynProvider,
}

impl RpcChainReader {
    /// Connect to `rpc_url`. No request is made until the first read.
    pub fn connect(chain_id: u64, rpc_url: &str) -> Result<Self, ChainError> {
        let url: Url = rpc_url.parse().map_err(|_| {
            ChainError::InvalidConfig(format!(
                "Invalid RPC URL for chain {}: {}",
                chain_id, rpc_url
            ))
        })?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self { chain_id, provider })
    }

    fn rpc_error(&self, what: &str, e: impl std::fmt::Display) -> ChainError {
        ChainError::Rpc {
            chain_id: self.chain_id,
            reason: format!("{} failed: {}", what, e),
        }
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| self.rpc_error("eth_blockNumber", e))
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError> {
        self.provider
            .get_logs(filter)
            .await
            .map_err(|e| self.rpc_error("eth_getLogs", e))
    }

    async fn call(
        &self,
        to: Address,
        input: Bytes,
        block: Option<u64>,
    ) -> Result<Bytes, ChainError> {
        let tx = TransactionRequest::default().to(to).input(input.into());

        let block = block.map(BlockId::number).unwrap_or_else(BlockId::latest);
        self.provider
            .call(tx)
            .block(block)
            .await
            .map_err(|e| self.rpc_error("eth_call", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_invalid_url() {
        let result = RpcChainReader::connect(1, "not a url");
        assert!(matches!(result, Err(ChainError::InvalidConfig(_))));
    }

    #[test]
    fn test_connect_keeps_chain_id() {
        let reader = RpcChainReader::connect(137, "http://localhost:8545").unwrap();
        assert_eq!(reader.chain_id(), 137);
    }
}
