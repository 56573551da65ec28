use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::interfaces::governor_hub::IGovernorHub;
use crate::interfaces::governor_spoke::IGovernorSpoke;

/// Lifecycle state reported by the hub governor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ProposalState {
    /// Returned for state codes this service does not know
    Undetermined = -1,
    Pending = 0,
    Active = 1,
    Canceled = 2,
    Defeated = 3,
    Succeeded = 4,
    Queued = 5,
    Expired = 6,
    Executed = 7,
    /// Voting ended on the hub, spoke tallies are still being collected
    CollectionPhase = 8,
}

impl ProposalState {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ProposalState::Pending,
            1 => ProposalState::Active,
            2 => ProposalState::Canceled,
            3 => ProposalState::Defeated,
            4 => ProposalState::Succeeded,
            5 => ProposalState::Queued,
            6 => ProposalState::Expired,
            7 => ProposalState::Executed,
            8 => ProposalState::CollectionPhase,
            _ => ProposalState::Undetermined,
        }
    }

    pub fn code(&self) -> i8 {
        *self as i8
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalState::Undetermined => "Undetermined",
            ProposalState::Pending => "Pending",
            ProposalState::Active => "Active",
            ProposalState::Canceled => "Canceled",
            ProposalState::Defeated => "Defeated",
            ProposalState::Succeeded => "Succeeded",
            ProposalState::Queued => "Queued",
            ProposalState::Expired => "Expired",
            ProposalState::Executed => "Executed",
            ProposalState::CollectionPhase => "CollectionPhase",
        };
        write!(f, "{}", name)
    }
}

/// Aggregated votes of a proposal, as decimal strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub proposal_id: String,
    pub for_votes: String,
    pub against_votes: String,
    pub abstain_votes: String,
}

/// Vote counters read from one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteCounts {
    pub for_votes: U256,
    pub against_votes: U256,
    pub abstain_votes: U256,
}

impl VoteCounts {
    pub const ZERO: Self = Self {
        for_votes: U256::ZERO,
        against_votes: U256::ZERO,
        abstain_votes: U256::ZERO,
    };

    /// Counter-wise sum, `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self {
            for_votes: self.for_votes.checked_add(other.for_votes)?,
            against_votes: self.against_votes.checked_add(other.against_votes)?,
            abstain_votes: self.abstain_votes.checked_add(other.abstain_votes)?,
        })
    }

    pub fn into_tally(self, proposal_id: impl Into<String>) -> VoteTally {
        VoteTally {
            proposal_id: proposal_id.into(),
            for_votes: self.for_votes.to_string(),
            against_votes: self.against_votes.to_string(),
            abstain_votes: self.abstain_votes.to_string(),
        }
    }
}

impl From<IGovernorHub::proposalVotesReturn> for VoteCounts {
    fn from(votes: IGovernorHub::proposalVotesReturn) -> Self {
        Self {
            for_votes: votes.forVotes,
            against_votes: votes.againstVotes,
            abstain_votes: votes.abstainVotes,
        }
    }
}

impl From<IGovernorSpoke::proposalVotesReturn> for VoteCounts {
    fn from(votes: IGovernorSpoke::proposalVotesReturn) -> Self {
        Self {
            for_votes: votes.forVotes,
            against_votes: votes.againstVotes,
            abstain_votes: votes.abstainVotes,
        }
    }
}
