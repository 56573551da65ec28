//! Chain id to reader lookup table.
//!
//! Built once at start-up from the configured networks and shared by handle;
//! readers are safe to use concurrently without extra locking.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::ChainError;
use super::reader::{ChainReader, RpcChainReader};
use super::timeout::TimeoutReader;

/// RPC endpoint for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub rpc_url: String,
}

impl NetworkConfig {
    pub fn new(chain_id: u64, rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id,
            rpc_url: rpc_url.into(),
        }
    }
}

#[derive(Clone, Default)]
pub struct ChainRegistry {
    readers: HashMap<u64, Arc<dyn ChainReader>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect an HTTP reader for every configured network, each bounded by
    /// `timeout` per request.
    ///
    /// Fails on the first unparsable URL or on a chain id listed twice.
    pub fn connect_all(networks: &[NetworkConfig], timeout: Duration) -> Result<Self, ChainError> {
        let mut registry = Self::new();

        for network in networks {
            if registry.contains(network.chain_id) {
                return Err(ChainError::InvalidConfig(format!(
                    "Chain {} configured more than once",
                    network.chain_id
                )));
            }

            let rpc = RpcChainReader::connect(network.chain_id, &network.rpc_url)?;
            tracing::info!(
                target: "chain_registry",
                chain_id = network.chain_id,
                timeout_secs = timeout.as_secs(),
                "Registered RPC provider"
            );
            registry.register(Arc::new(TimeoutReader::new(Arc::new(rpc), timeout)));
        }

        Ok(registry)
    }

    /// Register a reader under its own chain id, replacing any previous one
    pub fn register(&mut self, reader: Arc<dyn ChainReader>) {
        self.readers.insert(reader.chain_id(), reader);
    }

    pub fn with_reader(mut self, reader: Arc<dyn ChainReader>) -> Self {
        self.register(reader);
        self
    }

    pub fn get(&self, chain_id: u64) -> Result<Arc<dyn ChainReader>, ChainError> {
        self.readers
            .get(&chain_id)
            .cloned()
            .ok_or(ChainError::UnknownChain(chain_id))
    }

    pub fn contains(&self, chain_id: u64) -> bool {
        self.readers.contains_key(&chain_id)
    }

    /// Registered chain ids in ascending order
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.readers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

}
