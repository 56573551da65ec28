//! Proposal data structures stored in the cache.

use alloy_primitives::{hex, keccak256, Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Quorum value of a proposal whose quorum could not be determined yet
pub const QUORUM_UNRESOLVED: &str = "0";

/// Opening and closing marker of the description embedded in a proposal's text
const DESCRIPTION_OPEN: &str = "[[";
const DESCRIPTION_CLOSE: &str = "]]";

/// Entry of the proposal list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub proposal_id: String,
    pub title: String,
}

/// Cached proposal, built from its `ProposalCreated` log.
///
/// Everything but `quorum` is fixed once the log is seen. Times are epoch
/// milliseconds; `values` are decimal wei amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetail {
    pub proposal_id: String,
    pub title: String,
    pub description: String,
    pub proposer: String,
    pub vote_start: u64,
    pub vote_end: u64,
    pub quorum: String,
    pub targets: Vec<String>,
    pub values: Vec<String>,
    pub calldatas: Vec<String>,
    pub description_hash: String,
}

impl ProposalDetail {
    /// Build the cached form of a freshly scanned proposal, quorum unresolved
    pub fn from_record(record: &ProposalRecord) -> Self {
        let (title, description) = split_description(&record.raw_description);

        Self {
            proposal_id: record.proposal_id.to_string(),
            title,
            description,
            proposer: record.proposer.to_string(),
            vote_start: record.vote_start_secs.saturating_mul(1000),
            vote_end: record.vote_end_secs.saturating_mul(1000),
            quorum: QUORUM_UNRESOLVED.to_string(),
            targets: record.targets.iter().map(|t| t.to_string()).collect(),
            values: record.values.iter().map(|v| v.to_string()).collect(),
            calldatas: record.calldatas.iter().map(hex::encode_prefixed).collect(),
            description_hash: keccak256(record.raw_description.as_bytes()).to_string(),
        }
    }

    pub fn summary(&self) -> ProposalSummary {
        ProposalSummary {
            proposal_id: self.proposal_id.clone(),
            title: self.title.clone(),
        }
    }

    pub fn quorum_unresolved(&self) -> bool {
        self.quorum == QUORUM_UNRESOLVED
    }

    /// Timepoint the governor snapshots voting power and quorum at, in seconds
    pub fn snapshot_timepoint(&self) -> u64 {
        self.vote_start / 1000
    }
}

/// Decoded `ProposalCreated` log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRecord {
    pub proposal_id: U256,
    pub proposer: Address,
    pub raw_description: String,
    pub vote_start_secs: u64,
    pub vote_end_secs: u64,
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
    pub block_number: u64,
}

/// Parse a proposal id given as a decimal integer.
///
/// Leading zeros are accepted, so callers should key caches on the returned
/// value's decimal form rather than on the input.
pub fn parse_proposal_id(input: &str) -> Result<U256, GovernanceError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GovernanceError::validation(format!(
            "Invalid proposal id '{}': expected a decimal integer",
            input
        )));
    }

    U256::from_str_radix(input, 10).map_err(|e| {
        GovernanceError::validation(format!("Invalid proposal id '{}': {}", input, e))
    })
}

/// Split a proposal's text into `(title, description)`.
///
/// `"Title[[Details]]"` gives `("Title", "Details")`: the first bracketed
/// block is the description and the rest of the text, trimmed, is the title.
/// Without a complete marker both are the raw text.
pub fn split_description(raw: &str) -> (String, String) {
    let Some(open) = raw.find(DESCRIPTION_OPEN) else {
        return (raw.to_string(), raw.to_string());
    };

    let inner_start = open + DESCRIPTION_OPEN.len();
    let Some(close) = raw[inner_start..].find(DESCRIPTION_CLOSE) else {
        return (raw.to_string(), raw.to_string());
    };
    let inner_end = inner_start + close;

    let description = raw[inner_start..inner_end].trim().to_string();
    let title = format!(
        "{}{}",
        &raw[..open],
        &raw[inner_end + DESCRIPTION_CLOSE.len()..]
    )
    .trim()
    .to_string();

    (title, description)
}
