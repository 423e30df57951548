//! Wiring between the CLI, the pricing gateway and the view engine
//!
//! Everything here is independent of how results are printed, so the whole
//! pipeline can be driven with fake sources in tests.

use chrono::{DateTime, Utc};
use llmcost_core::error::Result;
use llmcost_core::types::{CostBreakdown, TokenCounts};
use llmcost_core::view::{DerivedView, ViewState};
use llmcost_pricing::cache_store::{CacheStore, FileCacheStore, MemoryCacheStore};
use llmcost_pricing::catalog::HttpCatalog;
use llmcost_pricing::cost_calculator::CostCalculator;
use llmcost_pricing::currency::{Currency, CurrencyConverter, ExchangeRateApi, RateSource};
use llmcost_pricing::gateway::{CatalogOrigin, LoadedCatalog, PricingGateway};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Where the pricing cache lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLocation {
    /// Platform cache directory
    Default,
    /// Explicit directory
    Dir(PathBuf),
    /// Process memory only; nothing survives the run
    Memory,
}

/// Runtime settings built from the command line
#[derive(Debug, Clone)]
pub struct Settings {
    pub tokens: TokenCounts,
    pub view: ViewState,
    /// Maximum number of table rows, applied after sorting
    pub limit: Option<usize>,
    pub currency: Currency,
    /// Bypass a fresh cache entry
    pub refresh: bool,
    pub cache: CacheLocation,
    pub cache_ttl: Duration,
    pub catalog_url: String,
    /// Timeout for every HTTP request
    pub timeout: Duration,
}

/// Open the cache store for `location`
pub fn build_store(location: &CacheLocation) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match location {
        CacheLocation::Default => Arc::new(FileCacheStore::default_location()?),
        CacheLocation::Dir(dir) => Arc::new(FileCacheStore::new(dir)),
        CacheLocation::Memory => Arc::new(MemoryCacheStore::new()),
    };
    Ok(store)
}

/// Gateway over the configured catalog endpoint and cache
pub fn build_gateway(settings: &Settings) -> Result<PricingGateway> {
    let source = HttpCatalog::new(settings.catalog_url.as_str(), settings.timeout)?;
    let store = build_store(&settings.cache)?;
    debug!(
        "Pricing from {} with {:?} cache, ttl {}s",
        source.url(),
        settings.cache,
        settings.cache_ttl.as_secs()
    );
    Ok(PricingGateway::new(Arc::new(source), store, settings.cache_ttl))
}

/// Exchange rate client sharing the catalog timeout
pub fn build_rate_source(settings: &Settings) -> Result<ExchangeRateApi> {
    Ok(ExchangeRateApi::public(settings.timeout)?)
}

/// Load the catalog, bypassing a fresh cache when `refresh` is set
///
/// # Errors
///
/// Fails only when the catalog could not be fetched and nothing was cached
pub async fn load_catalog(gateway: &PricingGateway, refresh: bool) -> Result<LoadedCatalog> {
    let catalog = if refresh {
        gateway.refresh().await?
    } else {
        gateway.load_models().await?
    };

    match &catalog.origin {
        CatalogOrigin::Cache => debug!("Loaded {} models from cache", catalog.models.len()),
        CatalogOrigin::Network => info!("Loaded {} models from catalog", catalog.models.len()),
        CatalogOrigin::StaleCache { .. } => {
            info!("Loaded {} models from expired cache", catalog.models.len())
        }
    }

    Ok(catalog)
}

/// Priced catalog ready to be viewed
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Catalog the rows were priced from
    pub catalog: LoadedCatalog,
    /// Conversion applied to every row
    pub converter: CurrencyConverter,
    /// One row per model, in catalog order
    pub rows: Vec<CostBreakdown>,
    pub tokens: TokenCounts,
}

impl Comparison {
    /// When the pricing data was fetched
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.catalog.fetched_at
    }

    /// Derive table and chart views, truncating the table to `limit` rows
    ///
    /// The chart is derived before truncation so the row limit never hides
    /// models from it.
    pub fn derive(&self, state: &ViewState, limit: Option<usize>) -> DerivedView<'_> {
        let mut view = state.derive(&self.rows);
        if let Some(limit) = limit {
            view.table.truncate(limit);
        }
        view
    }
}

/// Load pricing and resolve the currency concurrently, then price every model
///
/// # Errors
///
/// Fails only when no pricing data is available at all; currency problems
/// fall back to built-in rates.
pub async fn compare(
    gateway: &PricingGateway,
    rates: &dyn RateSource,
    settings: &Settings,
) -> Result<Comparison> {
    let (catalog, converter) = tokio::join!(
        load_catalog(gateway, settings.refresh),
        CurrencyConverter::resolve(rates, settings.currency)
    );
    let catalog = catalog?;

    let calculator = CostCalculator::with_converter(&converter);
    let rows = calculator.calculate_all(&catalog.models, &settings.tokens);

    Ok(Comparison {
        catalog,
        converter,
        rows,
        tokens: settings.tokens,
    })
}
