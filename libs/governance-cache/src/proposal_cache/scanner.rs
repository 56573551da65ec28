//! Log scanner for proposal creation events.
//!
//! Reads a closed block range from one chain, keeps only the logs emitted by
//! the governor contract with the requested event topic, and decodes them.
//! The scanner never retries: network errors go back to the caller as-is.

use std::sync::Arc;

use alloy::rpc::types::{Filter, Log};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;
use thiserror::Error;

use crate::chain::{ChainError, ChainRegistry};
use crate::interfaces::governor_hub::{resolve_event, ProposalCreated};

use super::types::ProposalRecord;

/// Errors that can occur while scanning logs
#[derive(Debug, Error)]
pub enum ScanError {
    /// The event name is not part of the governor interface
    #[error("{0} event not found in governor interface")]
    EventNotFound(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("Failed to parse ProposalCreated event in block {block}: {reason}")]
    Decode { block: u64, reason: String },
}

pub struct LogScanner {
    registry: Arc<ChainRegistry>,
    contract: Address,
}

impl LogScanner {
    pub fn new(registry: Arc<ChainRegistry>, contract: Address) -> Self {
        Self { registry, contract }
    }

    /// Decode every `event` log of the contract in `from_block..=to_block`.
    pub async fn scan(
        &self,
        chain_id: u64,
        event: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ProposalRecord>, ScanError> {
        let topic = resolve_event(event).ok_or_else(|| ScanError::EventNotFound(event.to_string()))?;
        let reader = self.registry.get(chain_id)?;

        let filter = Filter::new()
            .address(self.contract)
            .event_signature(topic)
            .from_block(from_block)
            .to_block(to_block);

        let logs = reader.logs(&filter).await?;

        tracing::debug!(
            target: "log_scanner",
            chain_id,
            contract = %self.contract,
            from_block,
            to_block,
            logs = logs.len(),
            "Fetched proposal logs"
        );

        logs.iter().map(decode_proposal_created).collect()
    }
}

fn decode_proposal_created(log: &Log) -> Result<ProposalRecord, ScanError> {
    let block = log.block_number.unwrap_or(0);
    let decoded = ProposalCreated::decode_log(&log.inner).map_err(|e| ScanError::Decode {
        block,
        reason: e.to_string(),
    })?;
    let event = decoded.data;

    Ok(ProposalRecord {
        proposal_id: event.proposalId,
        proposer: event.proposer,
        raw_description: event.description,
        vote_start_secs: timepoint_secs(event.voteStart, block)?,
        vote_end_secs: timepoint_secs(event.voteEnd, block)?,
        targets: event.targets,
        values: event.values,
        calldatas: event.calldatas,
        block_number: block,
    })
}

fn timepoint_secs(value: U256, block: u64) -> Result<u64, ScanError> {
    u64::try_from(value).map_err(|_| ScanError::Decode {
        block,
        reason: format!("timepoint {} does not fit in 64 bits", value),
    })
}
