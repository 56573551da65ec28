use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use eyre::{bail, ensure, Result, WrapErr};
use governance_cache::store::DEFAULT_CACHE_PATH;
use governance_cache::votes::{
    DEFAULT_ACTIVE_TTL_SECS, DEFAULT_MAX_CONCURRENT_SPOKE_READS, DEFAULT_PENDING_TTL_SECS,
};
use governance_cache::{IndexerConfig, NetworkConfig, VoteCacheTtls, VoteConfig};
use serde::{Deserialize, Serialize};

pub const HUB_ADDRESS_ENV: &str = "GOVERNANCE_HUB_ADDRESS";
pub const HUB_CHAIN_ID_ENV: &str = "GOVERNANCE_HUB_CHAIN_ID";
pub const HUB_BLOCK_NUMBER_ENV: &str = "GOVERNANCE_HUB_BLOCK_NUMBER";
pub const SPOKE_CHAIN_IDS_ENV: &str = "GOVERNANCE_SPOKE_CHAIN_IDS";
pub const SPOKE_ADDRESSES_ENV: &str = "GOVERNANCE_SPOKE_ADDRESSES";
pub const TTL_VOTES_PENDING_ENV: &str = "CACHE_TTL_VOTES_PENDING";
pub const TTL_VOTES_ACTIVE_ENV: &str = "CACHE_TTL_VOTES_ACTIVE";
pub const CACHE_PATH_ENV: &str = governance_cache::store::CACHE_PATH_ENV_VAR;
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// RPC URL variables and the chain each one configures
pub const RPC_URL_ENVS: &[(&str, u64)] = &[
    ("RPC_URL_MAINNET", 1),
    ("RPC_URL_POLYGON", 137),
    ("RPC_URL_BSC", 56),
    ("RPC_URL_POLYGON_AMOY", 80002),
    ("RPC_URL_SEPOLIA", 11155111),
    ("RPC_URL_BSC_TESTNET", 97),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceConfig {
    pub networks: Vec<NetworkConfig>,
    pub hub: HubConfig,
    pub spokes: SpokesConfig,
    pub cache: CacheConfig,
    pub scan: ScanConfig,
    pub rpc_timeout_secs: u64,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HubConfig {
    pub chain_id: u64,
    pub address: String,
    /// Block the hub was deployed at
    pub genesis_block: u64,
    pub proposal_event: String,
}

/// Spoke deployments, paired by position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpokesConfig {
    pub chain_ids: Vec<u64>,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub path: PathBuf,
    pub votes_pending_secs: u64,
    pub votes_active_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    pub max_block_range: u64,
    pub sync_on_miss: bool,
    pub max_concurrent_spoke_reads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            address: String::new(),
            genesis_block: 0,
            proposal_event: governance_cache::proposal_cache::DEFAULT_PROPOSAL_EVENT.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CACHE_PATH),
            votes_pending_secs: DEFAULT_PENDING_TTL_SECS,
            votes_active_secs: DEFAULT_ACTIVE_TTL_SECS,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_block_range: governance_cache::proposal_cache::DEFAULT_MAX_BLOCK_RANGE,
            sync_on_miss: true,
            max_concurrent_spoke_reads: DEFAULT_MAX_CONCURRENT_SPOKE_READS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5000,
        }
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            networks: Vec::new(),
            hub: HubConfig::default(),
            spokes: SpokesConfig::default(),
            cache: CacheConfig::default(),
            scan: ScanConfig::default(),
            rpc_timeout_secs: 10,
            server: ServerConfig::default(),
        }
    }
}

impl GovernanceConfig {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config: GovernanceConfig = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load the file if given, apply environment overrides and validate
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables, read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(address) = lookup(HUB_ADDRESS_ENV) {
            self.hub.address = address.trim().to_string();
        }
        if let Some(chain_id) = lookup(HUB_CHAIN_ID_ENV) {
            self.hub.chain_id = parse_env(HUB_CHAIN_ID_ENV, &chain_id)?;
        }
        if let Some(block) = lookup(HUB_BLOCK_NUMBER_ENV) {
            self.hub.genesis_block = parse_env(HUB_BLOCK_NUMBER_ENV, &block)?;
        }
        if let Some(chain_ids) = lookup(SPOKE_CHAIN_IDS_ENV) {
            self.spokes.chain_ids = split_list(&chain_ids)
                .map(|id| parse_env(SPOKE_CHAIN_IDS_ENV, id))
                .collect::<Result<_>>()?;
        }
        if let Some(addresses) = lookup(SPOKE_ADDRESSES_ENV) {
            self.spokes.addresses = split_list(&addresses).map(str::to_string).collect();
        }
        if let Some(ttl) = lookup(TTL_VOTES_PENDING_ENV) {
            self.cache.votes_pending_secs = parse_env(TTL_VOTES_PENDING_ENV, &ttl)?;
        }
        if let Some(ttl) = lookup(TTL_VOTES_ACTIVE_ENV) {
            self.cache.votes_active_secs = parse_env(TTL_VOTES_ACTIVE_ENV, &ttl)?;
        }
        if let Some(path) = lookup(CACHE_PATH_ENV) {
            self.cache.path = PathBuf::from(path);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = parse_env(PORT_ENV, &port)?;
        }

        for &(key, chain_id) in RPC_URL_ENVS {
            if let Some(rpc_url) = lookup(key) {
                self.set_rpc_url(chain_id, rpc_url);
            }
        }

        Ok(())
    }

    fn set_rpc_url(&mut self, chain_id: u64, rpc_url: String) {
        match self.networks.iter_mut().find(|n| n.chain_id == chain_id) {
            Some(network) => network.rpc_url = rpc_url,
            None => self.networks.push(NetworkConfig::new(chain_id, rpc_url)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.hub
            .address
            .parse::<Address>()
            .wrap_err_with(|| format!("Invalid hub address '{}'", self.hub.address))?;

        ensure!(
            self.spokes.chain_ids.len() == self.spokes.addresses.len(),
            "{} spoke chain ids but {} spoke addresses",
            self.spokes.chain_ids.len(),
            self.spokes.addresses.len()
        );

        for address in &self.spokes.addresses {
            address
                .parse::<Address>()
                .wrap_err_with(|| format!("Invalid spoke address '{}'", address))?;
        }

        let has_rpc = |chain_id: u64| self.networks.iter().any(|n| n.chain_id == chain_id);
        if !has_rpc(self.hub.chain_id) {
            bail!("No RPC URL configured for hub chain {}", self.hub.chain_id);
        }
        for chain_id in &self.spokes.chain_ids {
            if !has_rpc(*chain_id) {
                bail!("No RPC URL configured for spoke chain {}", chain_id);
            }
        }

        ensure!(self.scan.max_block_range > 0, "scan.maxBlockRange must be positive");
        ensure!(self.cache.votes_pending_secs > 0, "cache.votesPendingSecs must be positive");
        ensure!(self.cache.votes_active_secs > 0, "cache.votesActiveSecs must be positive");
        ensure!(self.rpc_timeout_secs > 0, "rpcTimeoutSecs must be positive");

        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig::new(self.hub.chain_id, self.hub.address.clone())
            .with_genesis_block(self.hub.genesis_block)
            .with_proposal_event(self.hub.proposal_event.clone())
            .with_max_block_range(self.scan.max_block_range)
            .with_sync_on_miss(self.scan.sync_on_miss)
    }

    pub fn vote_config(&self) -> VoteConfig {
        VoteConfig::new(self.hub.chain_id, self.hub.address.clone())
            .with_spokes(self.spokes.chain_ids.clone(), self.spokes.addresses.clone())
            .with_ttls(VoteCacheTtls {
                pending_secs: self.cache.votes_pending_secs,
                active_secs: self.cache.votes_active_secs,
            })
            .with_max_concurrent_spoke_reads(self.scan.max_concurrent_spoke_reads)
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => bail!("Invalid value '{}' for {}: {}", value, key, e),
    }
}
