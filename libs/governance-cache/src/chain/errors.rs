//! Error types for chain reads

use thiserror::Error;

/// Errors that can occur while reading from a chain
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error on chain {chain_id}: {reason}")]
    Rpc { chain_id: u64, reason: String },

    #[error("Request to chain {chain_id} timed out after {timeout_secs}s")]
    Timeout { chain_id: u64, timeout_secs: u64 },

    #[error("Failed to decode {what} from chain {chain_id}: {reason}")]
    Decode {
        chain_id: u64,
        what: &'static str,
        reason: String,
    },

    #[error("No provider registered for chain {0}")]
    UnknownChain(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChainError {
    /// Chain the error originated from, when known
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            ChainError::Rpc { chain_id, .. }
            | ChainError::Timeout { chain_id, .. }
            | ChainError::Decode { chain_id, .. } => Some(*chain_id),
            ChainError::UnknownChain(chain_id) => Some(*chain_id),
            ChainError::InvalidConfig(_) => None,
        }
    }
}
