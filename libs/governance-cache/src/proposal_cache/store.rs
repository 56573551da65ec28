//! Typed access to the proposal key families of the cache store.
//!
//! A scanned window is written as one batch: details first, then the id
//! index, then the checkpoint. Stores without batching apply it in that order.

use std::sync::Arc;

use crate::store::{get_json, set_json, to_json_value, CacheTtl, KeyValueStore, StoreError};

use super::types::ProposalDetail;

pub fn ids_key(chain_id: u64) -> String {
    format!("proposals:ids:{}", chain_id)
}

pub fn checkpoint_key(chain_id: u64) -> String {
    format!("proposals:lastBlock:{}", chain_id)
}

pub fn detail_key(chain_id: u64, proposal_id: &str) -> String {
    format!("proposal:{}:{}", chain_id, proposal_id)
}

/// What a committed window changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCommit {
    /// Ids appended to the index
    pub added: usize,
    /// Stored checkpoint after the commit
    pub checkpoint: u64,
}

#[derive(Clone)]
pub struct ProposalCacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProposalCacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last fully scanned block, or `default` when the chain was never scanned
    pub async fn checkpoint(&self, chain_id: u64, default: u64) -> Result<u64, StoreError> {
        let block: Option<u64> = get_json(self.store.as_ref(), &checkpoint_key(chain_id)).await?;
        Ok(block.unwrap_or(default))
    }

    /// Proposal ids in discovery order
    pub async fn ids(&self, chain_id: u64) -> Result<Vec<String>, StoreError> {
        let ids: Option<Vec<String>> = get_json(self.store.as_ref(), &ids_key(chain_id)).await?;
        Ok(ids.unwrap_or_default())
    }

    /// Store the details found in a window ending at `to_block`.
    ///
    /// Ids not yet indexed are appended in order. The checkpoint only moves
    /// forward: a `to_block` at or below the stored one leaves it untouched.
    pub async fn commit_window(
        &self,
        chain_id: u64,
        details: &[ProposalDetail],
        to_block: u64,
    ) -> Result<WindowCommit, StoreError> {
        let mut ids = self.ids(chain_id).await?;
        let before = ids.len();
        let stored: Option<u64> = get_json(self.store.as_ref(), &checkpoint_key(chain_id)).await?;

        let mut batch = Vec::with_capacity(details.len() + 2);
        for detail in details {
            let key = detail_key(chain_id, &detail.proposal_id);
            let value = to_json_value(&key, detail)?;
            batch.push((key, value, CacheTtl::Never));

            if !ids.contains(&detail.proposal_id) {
                ids.push(detail.proposal_id.clone());
            }
        }

        let added = ids.len() - before;
        if added > 0 {
            let key = ids_key(chain_id);
            let value = to_json_value(&key, &ids)?;
            batch.push((key, value, CacheTtl::Never));
        }

        let checkpoint = match stored {
            Some(stored) if stored >= to_block => stored,
            _ => {
                let key = checkpoint_key(chain_id);
                let value = to_json_value(&key, &to_block)?;
                batch.push((key, value, CacheTtl::Never));
                to_block
            }
        };

        self.store.set_many(batch).await?;
        Ok(WindowCommit { added, checkpoint })
    }

    pub async fn detail(
        &self,
        chain_id: u64,
        proposal_id: &str,
    ) -> Result<Option<ProposalDetail>, StoreError> {
        get_json(self.store.as_ref(), &detail_key(chain_id, proposal_id)).await
    }

    /// Upsert a proposal detail. Details never expire.
    pub async fn put_detail(&self, chain_id: u64, detail: &ProposalDetail) -> Result<(), StoreError> {
        set_json(
            self.store.as_ref(),
            &detail_key(chain_id, &detail.proposal_id),
            detail,
            CacheTtl::Never,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal_cache::split_description;
    use crate::store::MemoryStore;

    fn detail(id: &str) -> ProposalDetail {
        let (title, description) = split_description("Title[[Body]]");
        ProposalDetail {
            proposal_id: id.to_string(),
            title,
            description,
            proposer: "0x1111111111111111111111111111111111111111".to_string(),
            vote_start: 1_000,
            vote_end: 2_000,
            quorum: "0".to_string(),
            targets: vec![],
            values: vec![],
            calldatas: vec![],
            description_hash: "0x00".to_string(),
        }
    }

    fn new_store() -> (ProposalCacheStore, MemoryStore) {
        let memory = MemoryStore::new();
        (ProposalCacheStore::new(Arc::new(memory.clone())), memory)
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(ids_key(1), "proposals:ids:1");
        assert_eq!(checkpoint_key(8453), "proposals:lastBlock:8453");
        assert_eq!(detail_key(1, "42"), "proposal:1:42");
    }

    #[tokio::test]
    async fn test_checkpoint_defaults_until_committed() {
        let (store, _) = new_store();

        assert_eq!(store.checkpoint(1, 500).await.unwrap(), 500);
        store.commit_window(1, &[], 900).await.unwrap();
        assert_eq!(store.checkpoint(1, 500).await.unwrap(), 900);
        assert_eq!(store.checkpoint(2, 7).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_commit_window_deduplicates_and_keeps_order() {
        let (store, _) = new_store();

        let first = store
            .commit_window(1, &[detail("3"), detail("1")], 10)
            .await
            .unwrap();
        let second = store
            .commit_window(1, &[detail("1"), detail("2"), detail("2")], 20)
            .await
            .unwrap();

        assert_eq!(first, WindowCommit { added: 2, checkpoint: 10 });
        assert_eq!(second, WindowCommit { added: 1, checkpoint: 20 });
        assert_eq!(store.ids(1).await.unwrap(), vec!["3", "1", "2"]);
        assert!(store.detail(1, "2").await.unwrap().is_some());
        assert!(store.ids(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_window_keeps_newer_checkpoint() {
        let (store, _) = new_store();
        store.commit_window(1, &[detail("5")], 110).await.unwrap();

        let stale = store
            .commit_window(1, &[detail("4")], 100)
            .await
            .unwrap();

        assert_eq!(stale, WindowCommit { added: 1, checkpoint: 110 });
        assert_eq!(store.checkpoint(1, 0).await.unwrap(), 110);
        assert_eq!(store.ids(1).await.unwrap(), vec!["5", "4"]);
    }

    #[tokio::test]
    async fn test_put_detail_overwrites() {
        let (store, memory) = new_store();

        let mut first = detail("42");
        store.put_detail(1, &first).await.unwrap();
        first.quorum = "1000".to_string();
        store.put_detail(1, &first).await.unwrap();

        let cached = store.detail(1, "42").await.unwrap().unwrap();
        assert_eq!(cached.quorum, "1000");
        assert_eq!(memory.len(), 1);
        assert!(store.detail(1, "43").await.unwrap().is_none());
    }
}
