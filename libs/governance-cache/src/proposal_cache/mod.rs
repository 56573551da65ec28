//! Durable cache of the proposals created on the governor hub.

mod indexer;
mod scanner;
mod store;
mod types;

pub use indexer::{
    IndexerConfig, ProposalIndexer, SyncResult, DEFAULT_MAX_BLOCK_RANGE, DEFAULT_PROPOSAL_EVENT,
};
pub use scanner::{LogScanner, ScanError};
pub use store::{checkpoint_key, detail_key, ids_key, ProposalCacheStore, WindowCommit};
pub use types::{
    parse_proposal_id, split_description, ProposalDetail, ProposalRecord, ProposalSummary,
    QUORUM_UNRESOLVED,
};
