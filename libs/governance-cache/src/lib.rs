//! Proposal indexing and vote aggregation cache for hub/spoke governance.
//!
//! Proposals live as `ProposalCreated` logs on a single hub chain. Votes are
//! counted on the hub and on any number of spoke chains until the hub has
//! collected the spoke tallies. This crate keeps a resumable cache of the
//! proposal logs and a lifecycle-aware cache of aggregated vote totals, both on
//! top of a plain key-value store.
//!
//! # Usage
//!
//! ```ignore
//! use governance_cache::{ChainRegistry, MemoryStore, ProposalIndexer, VoteAggregator};
//!
//! let registry = Arc::new(ChainRegistry::connect_all(&networks, timeout)?);
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//!
//! let indexer = ProposalIndexer::new(indexer_config, registry.clone(), store.clone())?;
//! for proposal in indexer.list_proposals().await? {
//!     println!("{}: {}", proposal.proposal_id, proposal.title);
//! }
//!
//! let votes = VoteAggregator::new(&vote_config, registry, store)?;
//! let tally = votes.get_total_votes("42").await?;
//! ```

pub mod chain;
pub mod error;
pub mod interfaces;
pub mod proposal_cache;
pub mod store;
pub mod votes;

pub use chain::{
    ChainError, ChainReader, ChainRegistry, NetworkConfig, RpcChainReader, TimeoutReader,
};
pub use error::GovernanceError;
pub use proposal_cache::{
    IndexerConfig, LogScanner, ProposalCacheStore, ProposalDetail, ProposalIndexer,
    ProposalSummary, SyncResult,
};
pub use store::{CacheTtl, JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use votes::{ProposalState, VoteAggregator, VoteCacheTtls, VoteConfig, VoteTally};
