//! Pricing cache gateway
//!
//! [`PricingGateway`] is the only way the rest of llmcost obtains model data.
//! It reads through a time-boxed local cache:
//!
//! 1. a fresh cache entry (younger than the TTL) is returned without touching
//!    the network
//! 2. otherwise the catalog is fetched, normalized, written back to the cache
//!    and returned
//! 3. if the fetch fails, any cache entry, however old, is returned instead
//!    and the failure is recorded on the result rather than raised
//!
//! An error reaches the caller only when there is no data at all. Corrupt
//! cache contents are logged, removed, and treated as a miss.
//!
//! Loads are serialized: a caller that arrives while another load is running
//! waits for it and receives a copy of its outcome instead of issuing a
//! second request.
//!
//! # Examples
//!
//! ```no_run
//! use llmcost_pricing::{
//!     cache_store::FileCacheStore, catalog::HttpCatalog, gateway::PricingGateway,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> llmcost_core::Result<()> {
//! let gateway = PricingGateway::with_default_ttl(
//!     Arc::new(HttpCatalog::openrouter()?),
//!     Arc::new(FileCacheStore::default_location()?),
//! );
//!
//! let catalog = gateway.load_models().await?;
//! if catalog.is_stale() {
//!     eprintln!("pricing data may be outdated");
//! }
//! # Ok(())
//! # }
//! ```

use crate::cache_store::CacheStore;
use crate::catalog::CatalogSource;
use chrono::{DateTime, Utc};
use llmcost_core::error::{FetchError, LlmCostError, Result};
use llmcost_core::normalizer::normalize_all;
use llmcost_core::types::ModelRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Versioned cache key; bump the suffix when [`CacheEntry`] changes shape
pub const PRICING_CACHE_KEY: &str = "llmcost.pricing.v1";

/// Default freshness window for cached pricing
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Serialized cache contents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// When the models were fetched
    pub timestamp: DateTime<Utc>,
    /// Normalized models, in catalog order
    pub models: Vec<ModelRecord>,
}

impl CacheEntry {
    pub fn new(timestamp: DateTime<Utc>, models: Vec<ModelRecord>) -> Self {
        Self { timestamp, models }
    }

    /// Age of the entry; zero if the timestamp lies in the future
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the entry is younger than `ttl`
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// Where the models of a [`LoadedCatalog`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fresh cache hit, no network request made
    Cache,
    /// Fetched from the catalog source just now
    Network,
    /// The fetch failed and the cache entry was served instead
    ///
    /// The entry is usually past its TTL, but a failed [`PricingGateway::refresh`]
    /// also lands here while the entry is still fresh.
    StaleCache { error: FetchError },
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    /// Normalized models
    pub models: Vec<ModelRecord>,
    /// Provenance of `models`
    pub origin: CatalogOrigin,
    /// When `models` were fetched from the source
    pub fetched_at: DateTime<Utc>,
}

impl LoadedCatalog {
    /// True when the data is a cache fallback after a failed fetch
    pub fn is_stale(&self) -> bool {
        matches!(self.origin, CatalogOrigin::StaleCache { .. })
    }
}

/// Snapshot of the cache for `llmcost cache status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    /// When the cached models were fetched
    pub fetched_at: DateTime<Utc>,
    /// Age of the entry in whole seconds
    pub age_secs: u64,
    /// Whether the entry is within the TTL
    pub is_fresh: bool,
    /// Number of cached models
    pub model_count: usize,
    /// Configured TTL in seconds
    pub ttl_secs: u64,
}

struct LastLoad {
    generation: u64,
    from_network: bool,
    outcome: std::result::Result<LoadedCatalog, FetchError>,
}

/// Read-through, stale-on-error cache in front of a [`CatalogSource`]
pub struct PricingGateway {
    /// Remote catalog
    source: Arc<dyn CatalogSource>,
    /// Local key/value store
    store: Arc<dyn CacheStore>,
    /// Freshness window
    ttl: Duration,
    /// Number of completed loads
    generation: AtomicU64,
    /// Held for the duration of a load; remembers the last outcome
    last_load: Mutex<Option<LastLoad>>,
}

impl PricingGateway {
    /// Create a gateway with an explicit TTL
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            source,
            store,
            ttl,
            generation: AtomicU64::new(0),
            last_load: Mutex::new(None),
        }
    }

    /// Create a gateway with the one hour default TTL
    pub fn with_default_ttl(source: Arc<dyn CatalogSource>, store: Arc<dyn CacheStore>) -> Self {
        Self::new(source, store, DEFAULT_CACHE_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load models, preferring a fresh cache entry
    ///
    /// # Errors
    ///
    /// Returns the fetch error only when the fetch failed and no cache entry
    /// of any age exists
    pub async fn load_models(&self) -> std::result::Result<LoadedCatalog, FetchError> {
        self.load_coalesced(false).await
    }

    /// Load models from the source even if the cache is fresh
    ///
    /// Falls back to the cached entry on failure, like [`Self::load_models`].
    pub async fn refresh(&self) -> std::result::Result<LoadedCatalog, FetchError> {
        self.load_coalesced(true).await
    }

    /// Describe the current cache entry, `None` when there is none
    pub async fn cache_status(&self) -> Option<CacheStatus> {
        let entry = self.read_cache().await?;
        let now = Utc::now();
        Some(CacheStatus {
            fetched_at: entry.timestamp,
            age_secs: entry.age(now).as_secs(),
            is_fresh: entry.is_fresh(now, self.ttl),
            model_count: entry.models.len(),
            ttl_secs: self.ttl.as_secs(),
        })
    }

    /// Remove the cache entry
    pub async fn clear_cache(&self) -> Result<()> {
        let _guard = self.last_load.lock().await;
        self.store.remove(PRICING_CACHE_KEY).await?;
        info!("Cleared pricing cache");
        Ok(())
    }

    async fn load_coalesced(&self, force: bool) -> std::result::Result<LoadedCatalog, FetchError> {
        let ticket = self.generation.load(Ordering::Acquire);
        let mut last = self.last_load.lock().await;

        if let Some(previous) = last.as_ref() {
            // A load finished while we were waiting; share its outcome.
            // A forced refresh only accepts one that actually hit the network.
            if previous.generation > ticket && (!force || previous.from_network) {
                debug!("Reusing outcome of concurrent pricing load");
                return previous.outcome.clone();
            }
        }

        let (outcome, from_network) = self.load_uncoalesced(force).await;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *last = Some(LastLoad {
            generation,
            from_network,
            outcome: outcome.clone(),
        });
        outcome
    }

    async fn load_uncoalesced(
        &self,
        force: bool,
    ) -> (std::result::Result<LoadedCatalog, FetchError>, bool) {
        let cached = self.read_cache().await;

        if !force {
            if let Some(entry) = &cached {
                if entry.is_fresh(Utc::now(), self.ttl) {
                    debug!(
                        "Using cached pricing for {} models ({}s old)",
                        entry.models.len(),
                        entry.age(Utc::now()).as_secs()
                    );
                    return (
                        Ok(LoadedCatalog {
                            models: entry.models.clone(),
                            origin: CatalogOrigin::Cache,
                            fetched_at: entry.timestamp,
                        }),
                        false,
                    );
                }
            }
        }

        let outcome = match self.fetch_and_store().await {
            Ok(loaded) => Ok(loaded),
            Err(error) => match cached {
                Some(entry) => {
                    warn!(
                        "Failed to fetch pricing data: {}, using cached data from {}",
                        error, entry.timestamp
                    );
                    Ok(LoadedCatalog {
                        models: entry.models,
                        origin: CatalogOrigin::StaleCache { error },
                        fetched_at: entry.timestamp,
                    })
                }
                None => Err(error),
            },
        };

        (outcome, true)
    }

    async fn fetch_and_store(&self) -> std::result::Result<LoadedCatalog, FetchError> {
        let raw = self.source.fetch_catalog().await?;
        let models = normalize_all(&raw);
        let entry = CacheEntry::new(Utc::now(), models);
        info!("Fetched pricing for {} models", entry.models.len());

        if let Err(e) = self.write_cache(&entry).await {
            warn!("Failed to write pricing cache: {}", e);
        }

        Ok(LoadedCatalog {
            models: entry.models,
            origin: CatalogOrigin::Network,
            fetched_at: entry.timestamp,
        })
    }

    async fn write_cache(&self, entry: &CacheEntry) -> Result<()> {
        let serialized = serde_json::to_string(entry)?;
        self.store.set(PRICING_CACHE_KEY, &serialized).await
    }

    /// Read the cache entry, absorbing every failure as a miss
    async fn read_cache(&self) -> Option<CacheEntry> {
        let raw = match self.store.get(PRICING_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read pricing cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                let corruption = LlmCostError::CacheCorruption(e.to_string());
                warn!("{}, discarding cached pricing", corruption);
                if let Err(e) = self.store.remove(PRICING_CACHE_KEY).await {
                    warn!("Failed to remove corrupt pricing cache: {}", e);
                }
                None
            }
        }
    }
}
