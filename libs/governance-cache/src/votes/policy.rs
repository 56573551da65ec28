//! When to read which chains, and how long the result may be cached.

use serde::{Deserialize, Serialize};

use crate::store::CacheTtl;

use super::types::ProposalState;

pub const DEFAULT_PENDING_TTL_SECS: u64 = 300;
pub const DEFAULT_ACTIVE_TTL_SECS: u64 = 180;

/// Expiry of cached tallies for proposals that can still change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCacheTtls {
    pub pending_secs: u64,
    pub active_secs: u64,
}

impl Default for VoteCacheTtls {
    fn default() -> Self {
        Self {
            pending_secs: DEFAULT_PENDING_TTL_SECS,
            active_secs: DEFAULT_ACTIVE_TTL_SECS,
        }
    }
}

impl VoteCacheTtls {
    pub fn pending(&self) -> CacheTtl {
        CacheTtl::from_secs(self.pending_secs)
    }

    pub fn active(&self) -> CacheTtl {
        CacheTtl::from_secs(self.active_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub read_hub_votes: bool,
    pub query_spokes: bool,
    pub ttl: CacheTtl,
}

/// States whose tally depends on whether the hub finished collecting spoke votes
pub fn needs_collection_status(state: ProposalState) -> bool {
    matches!(
        state,
        ProposalState::Succeeded | ProposalState::Defeated | ProposalState::CollectionPhase
    )
}

/// Decide which reads a tally needs and how long to cache it.
///
/// `collection_finished` is only consulted for the states listed by
/// [`needs_collection_status`].
pub fn plan(state: ProposalState, collection_finished: bool, ttls: &VoteCacheTtls) -> VotePlan {
    match state {
        ProposalState::Pending => VotePlan {
            read_hub_votes: false,
            query_spokes: false,
            ttl: ttls.pending(),
        },
        ProposalState::Active => VotePlan {
            read_hub_votes: true,
            query_spokes: true,
            ttl: ttls.active(),
        },
        state if needs_collection_status(state) && !collection_finished => VotePlan {
            read_hub_votes: true,
            query_spokes: true,
            ttl: ttls.active(),
        },
        ProposalState::Undetermined => VotePlan {
            read_hub_votes: true,
            query_spokes: false,
            ttl: ttls.active(),
        },
        _ => VotePlan {
            read_hub_votes: true,
            query_spokes: false,
            ttl: CacheTtl::Never,
        },
    }
}
