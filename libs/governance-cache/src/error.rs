//! Error taxonomy returned to the service layer.
//!
//! Callers only ever see three kinds of failure. Transport and decoding errors
//! from the chain or the store are kept as the `source` of a `Server` error so
//! they can be logged, but are never returned bare.

use thiserror::Error;

use crate::chain::ChainError;
use crate::proposal_cache::ScanError;
use crate::store::StoreError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub const PROPOSAL_NOT_FOUND: &str = "Proposal not found";
pub const VOTES_NOT_FOUND: &str = "Votes not found";
pub const HUB_CONTRACT_ERROR: &str = "Error accessing hub contract";
pub const SPOKE_CONTRACT_ERROR: &str = "Error accessing spoke contract";

#[derive(Debug, Error)]
pub enum GovernanceError {
    /// The requested proposal or vote tally does not exist
    #[error("{0}")]
    NotFound(String),

    /// Malformed input
    #[error("{0}")]
    Validation(String),

    /// An upstream chain, contract interface or cache store failed
    #[error("{context}: {source}")]
    Server {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl GovernanceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        GovernanceError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        GovernanceError::Validation(message.into())
    }

    pub fn server(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        GovernanceError::Server {
            context: context.into(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GovernanceError::NotFound(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, GovernanceError::Server { .. })
    }
}

impl From<StoreError> for GovernanceError {
    fn from(err: StoreError) -> Self {
        GovernanceError::server("Cache store failure", err)
    }
}

impl From<ScanError> for GovernanceError {
    fn from(err: ScanError) -> Self {
        GovernanceError::server("Proposal scan failed", err)
    }
}

impl From<ChainError> for GovernanceError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidConfig(_) | ChainError::UnknownChain(_) => {
                GovernanceError::server("Chain configuration error", err)
            }
            _ => GovernanceError::server(HUB_CONTRACT_ERROR, err),
        }
    }
}
