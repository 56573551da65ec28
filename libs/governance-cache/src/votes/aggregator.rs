//! Vote aggregation across the hub and its spokes.
//!
//! The hub's lifecycle state is read on every uncached request and decides
//! which chains are read and how long the total stays cached. Spokes are read
//! concurrently; the first failing spoke aborts the whole aggregation.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use futures::future;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::chain::{call_view, ChainError, ChainReader, ChainRegistry};
use crate::error::{GovernanceError, HUB_CONTRACT_ERROR, SPOKE_CONTRACT_ERROR, VOTES_NOT_FOUND};
use crate::interfaces::governor_hub::IGovernorHub;
use crate::interfaces::governor_spoke::IGovernorSpoke;
use crate::proposal_cache::parse_proposal_id;
use crate::store::{get_json, set_json, KeyValueStore};

use super::policy::{needs_collection_status, plan, VoteCacheTtls};
use super::types::{ProposalState, VoteCounts, VoteTally};

/// Default number of spoke reads in flight at once
pub const DEFAULT_MAX_CONCURRENT_SPOKE_READS: usize = 8;

pub fn votes_key(proposal_id: &str) -> String {
    format!("votes:{}", proposal_id)
}

/// Configuration for the VoteAggregator
#[derive(Debug, Clone)]
pub struct VoteConfig {
    pub hub_chain_id: u64,
    pub hub_address: String,
    /// Spoke chain ids, paired by position with `spoke_addresses`
    pub spoke_chain_ids: Vec<u64>,
    pub spoke_addresses: Vec<String>,
    pub ttls: VoteCacheTtls,
    pub max_concurrent_spoke_reads: usize,
}

impl VoteConfig {
    pub fn new(hub_chain_id: u64, hub_address: impl Into<String>) -> Self {
        Self {
            hub_chain_id,
            hub_address: hub_address.into(),
            spoke_chain_ids: Vec::new(),
            spoke_addresses: Vec::new(),
            ttls: VoteCacheTtls::default(),
            max_concurrent_spoke_reads: DEFAULT_MAX_CONCURRENT_SPOKE_READS,
        }
    }

    pub fn with_spokes(mut self, chain_ids: Vec<u64>, addresses: Vec<String>) -> Self {
        self.spoke_chain_ids = chain_ids;
        self.spoke_addresses = addresses;
        self
    }

    pub fn with_ttls(mut self, ttls: VoteCacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    pub fn with_max_concurrent_spoke_reads(mut self, limit: usize) -> Self {
        self.max_concurrent_spoke_reads = limit;
        self
    }

    /// Pair spoke chain ids with their contract addresses
    pub fn spokes(&self) -> Result<Vec<SpokeContract>, ChainError> {
        if self.spoke_chain_ids.len() != self.spoke_addresses.len() {
            return Err(ChainError::InvalidConfig(format!(
                "{} spoke chain ids but {} spoke addresses",
                self.spoke_chain_ids.len(),
                self.spoke_addresses.len()
            )));
        }

        self.spoke_chain_ids
            .iter()
            .zip(&self.spoke_addresses)
            .map(|(&chain_id, address)| {
                let address = address.trim().parse().map_err(|e| {
                    ChainError::InvalidConfig(format!(
                        "Invalid spoke address '{}' for chain {}: {}",
                        address, chain_id, e
                    ))
                })?;
                Ok(SpokeContract { chain_id, address })
            })
            .collect()
    }
}

/// Governor deployment on a spoke chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpokeContract {
    pub chain_id: u64,
    pub address: Address,
}

pub struct VoteAggregator {
    hub_chain_id: u64,
    hub: Address,
    spokes: Vec<SpokeContract>,
    ttls: VoteCacheTtls,
    max_concurrent_spoke_reads: usize,
    registry: Arc<ChainRegistry>,
    store: Arc<dyn KeyValueStore>,
}

impl VoteAggregator {
    /// Create an aggregator. Every configured chain must be in `registry`.
    pub fn new(
        config: &VoteConfig,
        registry: Arc<ChainRegistry>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, GovernanceError> {
        let hub: Address = config.hub_address.trim().parse().map_err(|e| {
            ChainError::InvalidConfig(format!(
                "Invalid hub address '{}': {}",
                config.hub_address, e
            ))
        })?;
        let spokes = config.spokes()?;

        registry.get(config.hub_chain_id)?;
        for spoke in &spokes {
            registry.get(spoke.chain_id)?;
        }

        tracing::info!(
            target: "vote_aggregator",
            hub_chain_id = config.hub_chain_id,
            spokes = spokes.len(),
            "Vote aggregator configured"
        );

        Ok(Self {
            hub_chain_id: config.hub_chain_id,
            hub,
            spokes,
            ttls: config.ttls,
            max_concurrent_spoke_reads: config.max_concurrent_spoke_reads,
            registry,
            store,
        })
    }

    pub fn spokes(&self) -> &[SpokeContract] {
        &self.spokes
    }

    /// Total votes of a proposal over the hub and, while they still count, the spokes
    pub async fn get_total_votes(&self, proposal_id: &str) -> Result<VoteTally, GovernanceError> {
        let id = parse_proposal_id(proposal_id)?;
        let proposal_id = id.to_string();
        let key = votes_key(&proposal_id);

        if let Some(tally) = get_json::<VoteTally>(self.store.as_ref(), &key).await? {
            return Ok(tally);
        }

        let hub = self.registry.get(self.hub_chain_id)?;
        let state = self.read_state(hub.as_ref(), id).await?;

        let collection_finished = if needs_collection_status(state) {
            self.read_collection_finished(hub.as_ref(), id).await?
        } else {
            false
        };

        let plan = plan(state, collection_finished, &self.ttls);

        let counts = if plan.read_hub_votes {
            let hub_votes = self.read_hub_votes(hub.as_ref(), id).await?;
            if plan.query_spokes {
                self.add_spoke_votes(id, hub_votes).await?
            } else {
                hub_votes
            }
        } else {
            VoteCounts::ZERO
        };

        let tally = counts.into_tally(proposal_id.clone());

        tracing::debug!(
            target: "vote_aggregator",
            proposal_id = %proposal_id,
            state = %state,
            spokes_queried = plan.query_spokes,
            permanent = plan.ttl.is_permanent(),
            ttl_secs = plan.ttl.as_secs(),
            "Aggregated votes"
        );

        if let Err(e) = set_json(self.store.as_ref(), &key, &tally, plan.ttl).await {
            tracing::warn!(
                target: "vote_aggregator",
                proposal_id = %proposal_id,
                error = %e,
                "Failed to cache vote tally"
            );
        }

        Ok(tally)
    }

    async fn read_state(&self, hub: &dyn ChainReader, id: U256) -> Result<ProposalState, GovernanceError> {
        let code = call_view(hub, self.hub, IGovernorHub::stateCall { proposalId: id }, None)
            .await
            .map_err(|e| {
                tracing::warn!(
                    target: "vote_aggregator",
                    proposal_id = %id,
                    error = %e,
                    "Failed to read proposal state"
                );
                GovernanceError::not_found(VOTES_NOT_FOUND)
            })?;
        Ok(ProposalState::from_code(code))
    }

    async fn read_collection_finished(&self, hub: &dyn ChainReader, id: U256) -> Result<bool, GovernanceError> {
        call_view(
            hub,
            self.hub,
            IGovernorHub::collectionFinishedCall { proposalId: id },
            None,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                target: "vote_aggregator",
                proposal_id = %id,
                error = %e,
                "Failed to read collection status"
            );
            GovernanceError::server(HUB_CONTRACT_ERROR, e)
        })
    }

    async fn read_hub_votes(&self, hub: &dyn ChainReader, id: U256) -> Result<VoteCounts, GovernanceError> {
        call_view(hub, self.hub, IGovernorHub::proposalVotesCall { proposalId: id }, None)
            .await
            .map(VoteCounts::from)
            .map_err(|e| {
                tracing::error!(
                    target: "vote_aggregator",
                    proposal_id = %id,
                    error = %e,
                    "Failed to read hub votes"
                );
                GovernanceError::server(HUB_CONTRACT_ERROR, e)
            })
    }

    async fn add_spoke_votes(&self, id: U256, hub_votes: VoteCounts) -> Result<VoteCounts, GovernanceError> {
        stream::iter(self.spokes.iter().copied())
            .map(|spoke| self.read_spoke_votes(spoke, id))
            .buffer_unordered(self.max_concurrent_spoke_reads.max(1))
            .try_fold(hub_votes, |total, votes| {
                future::ready(total.checked_add(votes).ok_or_else(|| {
                    GovernanceError::server(
                        "Error summing votes",
                        format!("vote counter overflow for proposal {}", id),
                    )
                }))
            })
            .await
    }

    async fn read_spoke_votes(&self, spoke: SpokeContract, id: U256) -> Result<VoteCounts, GovernanceError> {
        let context = format!("{} on chain {}", SPOKE_CONTRACT_ERROR, spoke.chain_id);
        let reader = self
            .registry
            .get(spoke.chain_id)
            .map_err(|e| GovernanceError::server(context.clone(), e))?;

        call_view(
            reader.as_ref(),
            spoke.address,
            IGovernorSpoke::proposalVotesCall { proposalId: id },
            None,
        )
        .await
        .map(VoteCounts::from)
        .map_err(|e| {
            tracing::error!(
                target: "vote_aggregator",
                chain_id = spoke.chain_id,
                proposal_id = %id,
                error = %e,
                "Failed to read spoke votes"
            );
            GovernanceError::server(context, e)
        })
    }
}
