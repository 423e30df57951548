//! Common test utilities and helpers for llmcost tests
//!
//! This module provides fake catalog and rate sources, catalog fixtures, and
//! helper functions to make testing easier and more consistent.

#![allow(dead_code)]

use async_trait::async_trait;
use llmcost::app::{CacheLocation, Settings};
use llmcost_core::error::FetchError;
use llmcost_core::types::{CostBreakdown, ModelId, ModelRecord, RawCatalogEntry, TokenCounts};
use llmcost_core::view::ViewState;
use llmcost_pricing::cache_store::FileCacheStore;
use llmcost_pricing::catalog::{CatalogSource, parse_catalog};
use llmcost_pricing::currency::{Currency, RateSource};
use llmcost_pricing::gateway::PricingGateway;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// A trimmed catalog in the shape the public models endpoint returns
pub static CATALOG_FIXTURE: Lazy<Value> = Lazy::new(|| {
    json!({
        "data": [
            {
                "id": "anthropic/claude-3",
                "name": "Anthropic: Claude 3",
                "context_length": 200000,
                "pricing": {"prompt": "0.000003", "completion": "0.000015"}
            },
            {
                "id": "openai/gpt-4o",
                "name": "OpenAI: GPT-4o",
                "context_length": 128000,
                "pricing": {"prompt": "0.0000025", "completion": "0.00001"}
            },
            {
                "id": "openai/gpt-4o-mini",
                "name": "OpenAI: GPT-4o-mini",
                "context_length": 128000,
                "pricing": {"prompt": "0.00000015", "completion": "0.0000006"}
            },
            {
                "id": "meta-llama/llama-3-8b-instruct:free",
                "name": "Meta: Llama 3 8B Instruct (free)",
                "context_length": 8192,
                "pricing": {"prompt": "0", "completion": "0"}
            },
            {
                "id": "openrouter/auto",
                "name": "Auto Router",
                "context_length": 2000000,
                "pricing": {"prompt": "-1", "completion": "-1"}
            },
            {
                "id": "mystery-model",
                "pricing": {"prompt": "abc"}
            }
        ]
    })
});

/// Parsed entries of [`CATALOG_FIXTURE`]
pub fn fixture_entries() -> Vec<RawCatalogEntry> {
    parse_catalog(CATALOG_FIXTURE.clone()).expect("fixture should parse")
}

/// Catalog source that counts calls and returns a switchable result
pub struct FakeCatalog {
    calls: AtomicUsize,
    result: Mutex<Result<Vec<RawCatalogEntry>, FetchError>>,
}

impl FakeCatalog {
    pub fn ok(entries: Vec<RawCatalogEntry>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: Mutex::new(Ok(entries)),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            result: Mutex::new(Err(error)),
        })
    }

    /// Make every following fetch fail
    pub fn fail_with(&self, error: FetchError) {
        *self.result.lock().unwrap() = Err(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<RawCatalogEntry>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

/// Rate source returning a fixed result
pub struct FakeRates {
    calls: AtomicUsize,
    result: Result<f64, FetchError>,
}

impl FakeRates {
    pub fn ok(rate: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Ok(rate),
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            result: Err(FetchError::Network("rates unavailable".to_string())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for FakeRates {
    async fn fetch_rate(&self, _currency: Currency) -> Result<f64, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Gateway over `source` with a file store in a fresh temporary directory
///
/// The directory is returned so the caller keeps it alive.
pub fn file_gateway(source: Arc<FakeCatalog>, ttl: Duration) -> (TempDir, PricingGateway) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = reopen_gateway(&dir, source, ttl);
    (dir, gateway)
}

/// Gateway over an existing cache directory, as a second process would see it
pub fn reopen_gateway(dir: &TempDir, source: Arc<FakeCatalog>, ttl: Duration) -> PricingGateway {
    PricingGateway::new(source, Arc::new(FileCacheStore::new(dir.path())), ttl)
}

/// Settings with default token counts and view
pub fn default_settings() -> Settings {
    Settings {
        tokens: TokenCounts::new(20_000, 100_000),
        view: ViewState::new(),
        limit: None,
        currency: Currency::Usd,
        refresh: false,
        cache: CacheLocation::Memory,
        cache_ttl: Duration::from_secs(3600),
        catalog_url: "http://localhost/api/v1/models".to_string(),
        timeout: Duration::from_secs(5),
    }
}

/// A priced row with the given id, provider and total cost
pub fn row(id: &str, provider: &str, total: f64) -> CostBreakdown {
    CostBreakdown::new(
        ModelRecord {
            id: ModelId::new(id),
            name: id.to_string(),
            provider: provider.to_string(),
            input_price_per_million: 1.0,
            output_price_per_million: 1.0,
            context_window: 8192,
        },
        total / 2.0,
        total / 2.0,
    )
}

/// Assert that two floating point values are approximately equal
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Values not approximately equal: {a} vs {b} (tolerance: {tolerance})"
    );
}

/// Ids of `rows`, in order
pub fn ids(rows: &[&CostBreakdown]) -> Vec<String> {
    rows.iter().map(|row| row.id().to_string()).collect()
}
