//! Lifecycle-aware cache of aggregated vote totals.

mod aggregator;
mod policy;
mod types;

pub use aggregator::{
    votes_key, SpokeContract, VoteAggregator, VoteConfig, DEFAULT_MAX_CONCURRENT_SPOKE_READS,
};
pub use policy::{
    needs_collection_status, plan, VoteCacheTtls, VotePlan, DEFAULT_ACTIVE_TTL_SECS,
    DEFAULT_PENDING_TTL_SECS,
};
pub use types::{ProposalState, VoteCounts, VoteTally};
