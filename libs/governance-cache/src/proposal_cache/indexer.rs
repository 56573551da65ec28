//! Proposal indexer.
//!
//! Catches the cache up with the hub chain on demand: every list request scans
//! the blocks produced since the last checkpoint, stores one detail per
//! `ProposalCreated` log and advances the checkpoint. Proposal lookups are
//! served from the cache, with the quorum filled in lazily once voting opened.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::chain::{call_view, ChainError, ChainRegistry};
use crate::error::{GovernanceError, PROPOSAL_NOT_FOUND};
use crate::interfaces::governor_hub::{resolve_event, IGovernorHub};
use crate::store::KeyValueStore;

use super::scanner::LogScanner;
use super::store::ProposalCacheStore;
use super::types::{parse_proposal_id, ProposalDetail, ProposalSummary};

/// Default event the hub emits when a proposal is created
pub const DEFAULT_PROPOSAL_EVENT: &str = "ProposalCreated";

/// Default span of a single log query
pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 10_000;

/// Configuration for the ProposalIndexer
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Chain the governor hub lives on
    pub hub_chain_id: u64,
    /// Address of the governor hub contract
    pub hub_address: String,
    /// Block the hub was deployed at; scanning starts right after it
    pub genesis_block: u64,
    /// Name or full signature of the proposal creation event
    pub proposal_event: String,
    /// Largest block span requested in one log query
    pub max_block_range: u64,
    /// Catch up with the chain before reporting an unknown proposal
    pub sync_on_miss: bool,
}

impl IndexerConfig {
    pub fn new(hub_chain_id: u64, hub_address: impl Into<String>) -> Self {
        Self {
            hub_chain_id,
            hub_address: hub_address.into(),
            genesis_block: 0,
            proposal_event: DEFAULT_PROPOSAL_EVENT.to_string(),
            max_block_range: DEFAULT_MAX_BLOCK_RANGE,
            sync_on_miss: true,
        }
    }

    pub fn with_genesis_block(mut self, block: u64) -> Self {
        self.genesis_block = block;
        self
    }

    pub fn with_proposal_event(mut self, event: impl Into<String>) -> Self {
        self.proposal_event = event.into();
        self
    }

    pub fn with_max_block_range(mut self, range: u64) -> Self {
        self.max_block_range = range;
        self
    }

    pub fn with_sync_on_miss(mut self, sync_on_miss: bool) -> Self {
        self.sync_on_miss = sync_on_miss;
        self
    }
}

/// Result of a catch-up pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// First block scanned, or the unchanged checkpoint when nothing was scanned
    pub from_block: u64,
    /// Checkpoint after the pass
    pub last_block: u64,
    /// Number of log queries made
    pub windows: usize,
    /// Proposal logs decoded
    pub proposals_seen: usize,
    /// Proposals that were not indexed before
    pub proposals_added: usize,
}

impl std::fmt::Display for SyncResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Synced {} new proposals ({} seen) from block {} to block {} in {} windows",
            self.proposals_added, self.proposals_seen, self.from_block, self.last_block, self.windows
        )
    }
}

pub struct ProposalIndexer {
    config: IndexerConfig,
    hub: Address,
    registry: Arc<ChainRegistry>,
    scanner: LogScanner,
    cache: ProposalCacheStore,
    /// Held for a whole catch-up pass
    sync_lock: Mutex<()>,
}

impl ProposalIndexer {
    /// Create an indexer for the configured hub.
    ///
    /// Fails if the hub address does not parse, the event is not part of the hub
    /// interface, the hub chain is missing from `registry` or the block range is zero.
    pub fn new(
        config: IndexerConfig,
        registry: Arc<ChainRegistry>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, GovernanceError> {
        let hub: Address = config.hub_address.parse().map_err(|e| {
            ChainError::InvalidConfig(format!(
                "Invalid hub address '{}': {}",
                config.hub_address, e
            ))
        })?;

        if resolve_event(&config.proposal_event).is_none() {
            return Err(ChainError::InvalidConfig(format!(
                "{} event not found in governor interface",
                config.proposal_event
            ))
            .into());
        }

        if config.max_block_range == 0 {
            return Err(ChainError::InvalidConfig("max block range must be positive".to_string()).into());
        }

        registry.get(config.hub_chain_id)?;

        Ok(Self {
            scanner: LogScanner::new(registry.clone(), hub),
            cache: ProposalCacheStore::new(store),
            config,
            hub,
            registry,
            sync_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn cache(&self) -> &ProposalCacheStore {
        &self.cache
    }

    /// Scan every block produced since the checkpoint.
    ///
    /// The range is split into windows of at most `max_block_range` blocks. Each
    /// window's details and ids are stored before the checkpoint moves to its
    /// end, so an interrupted pass resumes at the first unfinished window.
    /// Concurrent callers wait for the running pass and then scan only what it
    /// did not cover.
    pub async fn sync(&self) -> Result<SyncResult, GovernanceError> {
        let _pass = self.sync_lock.lock().await;
        let chain_id = self.config.hub_chain_id;
        let reader = self.registry.get(chain_id)?;

        let checkpoint = self
            .cache
            .checkpoint(chain_id, self.config.genesis_block)
            .await?;
        let head = reader.block_number().await?;

        let mut result = SyncResult {
            from_block: checkpoint,
            last_block: checkpoint,
            windows: 0,
            proposals_seen: 0,
            proposals_added: 0,
        };

        if head <= checkpoint {
            tracing::debug!(
                target: "proposal_indexer",
                chain_id,
                checkpoint,
                head,
                "Proposal cache is up to date"
            );
            return Ok(result);
        }

        let mut from_block = checkpoint + 1;
        result.from_block = from_block;

        while from_block <= head {
            let to_block = from_block
                .saturating_add(self.config.max_block_range - 1)
                .min(head);

            let records = self
                .scanner
                .scan(chain_id, &self.config.proposal_event, from_block, to_block)
                .await?;

            let details: Vec<ProposalDetail> =
                records.iter().map(ProposalDetail::from_record).collect();
            let commit = self.cache.commit_window(chain_id, &details, to_block).await?;

            tracing::debug!(
                target: "proposal_indexer",
                chain_id,
                from_block,
                to_block,
                seen = records.len(),
                added = commit.added,
                "Scanned window"
            );

            result.windows += 1;
            result.proposals_seen += records.len();
            result.proposals_added += commit.added;
            result.last_block = commit.checkpoint;
            from_block = to_block + 1;
        }

        tracing::info!(target: "proposal_indexer", chain_id, "{}", result);

        Ok(result)
    }

    /// Catch up with the hub, then list every known proposal in discovery order
    pub async fn list_proposals(&self) -> Result<Vec<ProposalSummary>, GovernanceError> {
        let chain_id = self.config.hub_chain_id;
        self.sync().await?;

        let ids = self.cache.ids(chain_id).await?;
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.cache.detail(chain_id, &id).await? {
                Some(detail) => summaries.push(detail.summary()),
                None => {
                    tracing::warn!(
                        target: "proposal_indexer",
                        chain_id,
                        proposal_id = %id,
                        "Indexed proposal has no cached detail"
                    );
                }
            }
        }

        Ok(summaries)
    }

    /// Look up one proposal, filling in its quorum once voting has started
    pub async fn get_proposal(&self, proposal_id: &str) -> Result<ProposalDetail, GovernanceError> {
        let chain_id = self.config.hub_chain_id;
        let proposal_id = parse_proposal_id(proposal_id)?.to_string();

        let detail = match self.cache.detail(chain_id, &proposal_id).await? {
            Some(detail) => detail,
            None if self.config.sync_on_miss => {
                tracing::debug!(
                    target: "proposal_indexer",
                    chain_id,
                    proposal_id = %proposal_id,
                    "Proposal not cached, catching up"
                );
                self.sync().await?;
                self.cache
                    .detail(chain_id, &proposal_id)
                    .await?
                    .ok_or_else(|| GovernanceError::not_found(PROPOSAL_NOT_FOUND))?
            }
            None => return Err(GovernanceError::not_found(PROPOSAL_NOT_FOUND)),
        };

        self.backfill_quorum(detail).await
    }

    async fn backfill_quorum(&self, mut detail: ProposalDetail) -> Result<ProposalDetail, GovernanceError> {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        if !detail.quorum_unresolved() || now_ms <= detail.vote_start {
            return Ok(detail);
        }

        let chain_id = self.config.hub_chain_id;
        let reader = self.registry.get(chain_id)?;
        let call = IGovernorHub::quorumCall {
            timepoint: U256::from(detail.snapshot_timepoint()),
        };

        match call_view(reader.as_ref(), self.hub, call, None).await {
            Ok(quorum) => {
                detail.quorum = quorum.to_string();
                match self.cache.put_detail(chain_id, &detail).await {
                    Ok(()) => tracing::debug!(
                        target: "proposal_indexer",
                        chain_id,
                        proposal_id = %detail.proposal_id,
                        quorum = %detail.quorum,
                        "Backfilled quorum"
                    ),
                    Err(e) => tracing::warn!(
                        target: "proposal_indexer",
                        chain_id,
                        proposal_id = %detail.proposal_id,
                        error = %e,
                        "Failed to cache quorum, it will be read again"
                    ),
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "proposal_indexer",
                    chain_id,
                    proposal_id = %detail.proposal_id,
                    error = %e,
                    "Failed to read quorum, serving cached proposal"
                );
            }
        }

        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainReader, SimulatedChain};
    use crate::interfaces::governor_hub::ProposalCreated;
    use crate::proposal_cache::checkpoint_key;
    use crate::store::{set_json, CacheTtl, MemoryStore, StoreError};
    use alloy::rpc::types::{Filter, Log};
    use alloy_primitives::{address, Bytes};
    use alloy_sol_types::SolValue;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const HUB_CHAIN: u64 = 1;
    const HUB: Address = address!("0x00000000000000000000000000000000000000aa");
    const HUB_STR: &str = "0x00000000000000000000000000000000000000aa";
    const PAST_START: u64 = 1_700_000_000;
    const FUTURE_START: u64 = 4_000_000_000;

    fn created(id: u64, description: &str, vote_start: u64) -> ProposalCreated {
        ProposalCreated {
            proposalId: U256::from(id),
            proposer: address!("0x1111111111111111111111111111111111111111"),
            targets: vec![address!("0x2222222222222222222222222222222222222222")],
            values: vec![U256::ZERO],
            signatures: vec![String::new()],
            calldatas: vec![Bytes::new()],
            voteStart: U256::from(vote_start),
            voteEnd: U256::from(vote_start + 86_400),
            description: description.to_string(),
        }
    }

    struct Harness {
        chain: Arc<SimulatedChain>,
        store: MemoryStore,
        indexer: ProposalIndexer,
    }

    fn harness(config: IndexerConfig) -> Harness {
        let chain = Arc::new(SimulatedChain::new(HUB_CHAIN));
        let store = MemoryStore::new();
        let registry = Arc::new(ChainRegistry::new().with_reader(chain.clone()));
        let indexer = ProposalIndexer::new(config, registry, Arc::new(store.clone())).unwrap();
        Harness {
            chain,
            store,
            indexer,
        }
    }

    /// Hub whose head moves between reads and whose first log query is slow,
    /// so a second caller can overtake the first
    struct AdvancingHub {
        chain: Arc<SimulatedChain>,
        heads: parking_lot::Mutex<VecDeque<u64>>,
        log_queries: AtomicUsize,
    }

    #[async_trait]
    impl ChainReader for AdvancingHub {
        fn chain_id(&self) -> u64 {
            self.chain.chain_id()
        }

        async fn block_number(&self) -> Result<u64, ChainError> {
            let next = self.heads.lock().pop_front();
            match next {
                Some(head) => Ok(head),
                None => self.chain.block_number().await,
            }
        }

        async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ChainError> {
            if self.log_queries.fetch_add(1, Ordering::SeqCst) == 0 {
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
            }
            self.chain.logs(filter).await
        }

        async fn call(
            &self,
            to: Address,
            input: Bytes,
            block: Option<u64>,
        ) -> Result<Bytes, ChainError> {
            self.chain.call(to, input, block).await
        }
    }

    /// Memory store whose writes can be switched off
    struct SwitchableStore {
        inner: MemoryStore,
        writes_fail: AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for SwitchableStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value, ttl: CacheTtl) -> Result<(), StoreError> {
            if self.writes_fail.load(Ordering::SeqCst) {
                return Err(StoreError::Write {
                    path: "memory".to_string(),
                    reason: "disk full".to_string(),
                });
            }
            self.inner.set(key, value, ttl).await
        }
    }

    fn default_harness() -> Harness {
        harness(IndexerConfig::new(HUB_CHAIN, HUB_STR))
    }

    #[test]
    fn test_indexer_config_builders() {
        let config = IndexerConfig::new(HUB_CHAIN, HUB_STR)
            .with_genesis_block(1000)
            .with_max_block_range(500)
            .with_sync_on_miss(false);

        assert_eq!(config.genesis_block, 1000);
        assert_eq!(config.max_block_range, 500);
        assert!(!config.sync_on_miss);
        assert_eq!(config.proposal_event, DEFAULT_PROPOSAL_EVENT);
    }

    #[test]
    fn test_sync_result_display() {
        let result = SyncResult {
            from_block: 11,
            last_block: 20,
            windows: 1,
            proposals_seen: 3,
            proposals_added: 2,
        };
        let display = result.to_string();
        assert!(display.contains("2 new proposals"));
        assert!(display.contains("to block 20"));
    }

    #[test]
    fn test_new_rejects_unknown_event() {
        let chain = Arc::new(SimulatedChain::new(HUB_CHAIN));
        let registry = Arc::new(ChainRegistry::new().with_reader(chain));
        let config = IndexerConfig::new(HUB_CHAIN, HUB_STR).with_proposal_event("ProposalQueued");

        let result = ProposalIndexer::new(config, registry, Arc::new(MemoryStore::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_missing_hub_chain() {
        let registry = Arc::new(ChainRegistry::new());
        let result = ProposalIndexer::new(
            IndexerConfig::new(HUB_CHAIN, HUB_STR),
            registry,
            Arc::new(MemoryStore::new()),
        );
        assert!(matches!(result, Err(GovernanceError::Server { .. })));
    }

    #[test]
    fn test_new_rejects_bad_hub_address() {
        let chain = Arc::new(SimulatedChain::new(HUB_CHAIN));
        let registry = Arc::new(ChainRegistry::new().with_reader(chain));
        let result = ProposalIndexer::new(
            IndexerConfig::new(HUB_CHAIN, "0xnot-an-address"),
            registry,
            Arc::new(MemoryStore::new()),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_returns_proposals_in_discovery_order() {
        let h = default_harness();
        h.chain.emit(HUB, 10, &created(30, "Third id first[[a]]", PAST_START));
        h.chain.emit(HUB, 11, &created(10, "Second[[b]]", PAST_START));
        h.chain.emit(HUB, 12, &created(20, "No marker", PAST_START));

        let proposals = h.indexer.list_proposals().await.unwrap();

        let ids: Vec<&str> = proposals.iter().map(|p| p.proposal_id.as_str()).collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
        assert_eq!(proposals[0].title, "Third id first");
        assert_eq!(proposals[2].title, "No marker");
        assert_eq!(h.indexer.cache().checkpoint(HUB_CHAIN, 0).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_rescan_is_idempotent() {
        let h = default_harness();
        h.chain.emit(HUB, 5, &created(1, "One[[x]]", PAST_START));
        h.chain.emit(HUB, 6, &created(2, "Two[[y]]", PAST_START));

        let first = h.indexer.list_proposals().await.unwrap();
        let detail_before = h.indexer.cache().detail(HUB_CHAIN, "1").await.unwrap();

        set_json(&h.store, &checkpoint_key(HUB_CHAIN), &0u64, CacheTtl::Never)
            .await
            .unwrap();
        let result = h.indexer.sync().await.unwrap();
        let second = h.indexer.list_proposals().await.unwrap();

        assert_eq!(result.proposals_seen, 2);
        assert_eq!(result.proposals_added, 0);
        assert_eq!(first, second);
        assert_eq!(h.indexer.cache().ids(HUB_CHAIN).await.unwrap().len(), 2);
        assert_eq!(
            h.indexer.cache().detail(HUB_CHAIN, "1").await.unwrap(),
            detail_before
        );
    }

    #[tokio::test]
    async fn test_checkpoint_never_moves_backwards() {
        let h = default_harness();
        h.chain.emit(HUB, 50, &created(1, "One", PAST_START));
        h.indexer.sync().await.unwrap();

        h.chain.set_head(40);
        let result = h.indexer.sync().await.unwrap();

        assert_eq!(result.windows, 0);
        assert_eq!(result.last_block, 50);
        assert_eq!(h.indexer.cache().checkpoint(HUB_CHAIN, 0).await.unwrap(), 50);
        assert_eq!(h.chain.log_queries().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_lists_keep_latest_checkpoint() {
        let chain = Arc::new(SimulatedChain::new(HUB_CHAIN));
        chain.emit(HUB, 95, &created(1, "Before first head", FUTURE_START));
        chain.emit(HUB, 105, &created(2, "Between heads", FUTURE_START));
        let hub = Arc::new(AdvancingHub {
            chain: chain.clone(),
            heads: parking_lot::Mutex::new(VecDeque::from(vec![100, 110])),
            log_queries: AtomicUsize::new(0),
        });
        let registry = Arc::new(ChainRegistry::new().with_reader(hub));
        let indexer = ProposalIndexer::new(
            IndexerConfig::new(HUB_CHAIN, HUB_STR),
            registry,
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        let (first, second) = tokio::join!(indexer.list_proposals(), indexer.list_proposals());

        let first: Vec<String> = first.unwrap().into_iter().map(|p| p.proposal_id).collect();
        let second: Vec<String> = second.unwrap().into_iter().map(|p| p.proposal_id).collect();
        assert_eq!(first, vec!["1"]);
        assert_eq!(second, vec!["1", "2"]);
        assert_eq!(indexer.cache().checkpoint(HUB_CHAIN, 0).await.unwrap(), 110);
        assert_eq!(chain.log_queries(), vec![(1, 100), (101, 110)]);
    }

    #[tokio::test]
    async fn test_scan_starts_after_genesis_block() {
        let h = harness(IndexerConfig::new(HUB_CHAIN, HUB_STR).with_genesis_block(100));
        h.chain.set_head(150);

        let result = h.indexer.sync().await.unwrap();

        assert_eq!(result.from_block, 101);
        assert_eq!(h.chain.log_queries(), vec![(101, 150)]);
    }

    #[tokio::test]
    async fn test_catch_up_is_split_into_windows() {
        let h = harness(IndexerConfig::new(HUB_CHAIN, HUB_STR).with_max_block_range(100));
        h.chain.emit(HUB, 50, &created(1, "One", PAST_START));
        h.chain.emit(HUB, 150, &created(2, "Two", PAST_START));
        h.chain.emit(HUB, 250, &created(3, "Three", PAST_START));

        let result = h.indexer.sync().await.unwrap();

        assert_eq!(
            h.chain.log_queries(),
            vec![(1, 100), (101, 200), (201, 250)]
        );
        assert_eq!(result.windows, 3);
        assert_eq!(result.proposals_added, 3);
        assert_eq!(result.last_block, 250);
    }

    #[tokio::test]
    async fn test_quorum_backfilled_exactly_once() {
        let h = default_harness();
        h.chain.emit(HUB, 5, &created(7, "Seven[[s]]", PAST_START));
        h.chain.respond(
            HUB,
            &IGovernorHub::quorumCall {
                timepoint: U256::from(PAST_START),
            },
            U256::from(4_000_000u64).abi_encode(),
        );
        h.indexer.sync().await.unwrap();

        let first = h.indexer.get_proposal("7").await.unwrap();
        let second = h.indexer.get_proposal("7").await.unwrap();

        assert_eq!(first.quorum, "4000000");
        assert_eq!(second.quorum, "4000000");
        assert_eq!(h.chain.call_count::<IGovernorHub::quorumCall>(), 1);
    }

    #[tokio::test]
    async fn test_quorum_served_when_cache_write_fails() {
        let chain = Arc::new(SimulatedChain::new(HUB_CHAIN));
        chain.emit(HUB, 5, &created(7, "Seven[[s]]", PAST_START));
        chain.respond(
            HUB,
            &IGovernorHub::quorumCall {
                timepoint: U256::from(PAST_START),
            },
            U256::from(4_000_000u64).abi_encode(),
        );
        let store = Arc::new(SwitchableStore {
            inner: MemoryStore::new(),
            writes_fail: AtomicBool::new(false),
        });
        let registry = Arc::new(ChainRegistry::new().with_reader(chain.clone()));
        let indexer = ProposalIndexer::new(
            IndexerConfig::new(HUB_CHAIN, HUB_STR),
            registry,
            store.clone(),
        )
        .unwrap();
        indexer.sync().await.unwrap();

        store.writes_fail.store(true, Ordering::SeqCst);
        let detail = indexer.get_proposal("7").await.unwrap();

        assert_eq!(detail.quorum, "4000000");
        let cached = indexer.cache().detail(HUB_CHAIN, "7").await.unwrap().unwrap();
        assert_eq!(cached.quorum, "0");
    }

    #[tokio::test]
    async fn test_quorum_not_read_before_voting_starts() {
        let h = default_harness();
        h.chain.emit(HUB, 5, &created(7, "Seven", FUTURE_START));
        h.indexer.sync().await.unwrap();

        let detail = h.indexer.get_proposal("7").await.unwrap();

        assert_eq!(detail.quorum, "0");
        assert_eq!(h.chain.call_count::<IGovernorHub::quorumCall>(), 0);
    }

    #[tokio::test]
    async fn test_quorum_failure_serves_cached_record() {
        let h = default_harness();
        h.chain.emit(HUB, 5, &created(7, "Seven", PAST_START));
        h.indexer.sync().await.unwrap();

        let detail = h.indexer.get_proposal("7").await.unwrap();

        assert_eq!(detail.quorum, "0");
        assert_eq!(h.chain.call_count::<IGovernorHub::quorumCall>(), 1);
        let cached = h.indexer.cache().detail(HUB_CHAIN, "7").await.unwrap().unwrap();
        assert_eq!(cached.quorum, "0");
    }

    #[tokio::test]
    async fn test_miss_catches_up_before_not_found() {
        let h = default_harness();
        h.chain.emit(HUB, 5, &created(7, "Seven", FUTURE_START));

        let detail = h.indexer.get_proposal("7").await.unwrap();
        assert_eq!(detail.title, "Seven");

        let missing = h.indexer.get_proposal("8").await;
        assert!(matches!(missing, Err(GovernanceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_miss_without_sync_is_not_found() {
        let h = harness(IndexerConfig::new(HUB_CHAIN, HUB_STR).with_sync_on_miss(false));
        h.chain.emit(HUB, 5, &created(7, "Seven", FUTURE_START));

        let result = h.indexer.get_proposal("7").await;

        assert!(matches!(result, Err(GovernanceError::NotFound(_))));
        assert!(h.chain.log_queries().is_empty());
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id() {
        let h = default_harness();

        let result = h.indexer.get_proposal("abc").await;

        assert!(matches!(result, Err(GovernanceError::Validation(_))));
        assert!(h.chain.log_queries().is_empty());
    }

    #[tokio::test]
    async fn test_hub_offline_is_server_error() {
        let h = default_harness();
        h.chain.set_offline(true);

        let result = h.indexer.list_proposals().await;

        assert!(matches!(result, Err(GovernanceError::Server { .. })));
    }
}
