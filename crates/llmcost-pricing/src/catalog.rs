//! Remote pricing catalog source
//!
//! The catalog is a JSON document of the form `{ "data": [ ... ] }` where each
//! element is a [`RawCatalogEntry`]. [`CatalogSource`] is the seam the
//! pricing gateway fetches through, so tests can substitute a fake.

use async_trait::async_trait;
use llmcost_core::error::FetchError;
use llmcost_core::types::RawCatalogEntry;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// OpenRouter model catalog URL
pub const OPENROUTER_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

/// Default timeout for catalog and rate requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can produce the raw catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` on transport failure and
    /// `FetchError::MalformedResponse` when the body is not a catalog
    async fn fetch_catalog(&self) -> Result<Vec<RawCatalogEntry>, FetchError>;
}

/// HTTP catalog source
pub struct HttpCatalog {
    /// Catalog endpoint
    url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpCatalog {
    /// Create a source for the public OpenRouter catalog
    pub fn openrouter() -> Result<Self, FetchError> {
        Self::new(OPENROUTER_MODELS_URL, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a source for any endpoint serving the catalog shape
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("llmcost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Endpoint this source fetches from
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<RawCatalogEntry>, FetchError> {
        debug!("Fetching pricing catalog from {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: Value = response.json().await?;
        parse_catalog(body)
    }
}

/// Validate the catalog envelope and parse its entries
///
/// The envelope must be an object whose `data` field is an array. Array
/// elements that are not catalog entries are skipped with a warning.
pub fn parse_catalog(body: Value) -> Result<Vec<RawCatalogEntry>, FetchError> {
    let data = match body {
        Value::Object(mut map) => map.remove("data"),
        other => {
            return Err(FetchError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )));
        }
    };

    let items = match data {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(FetchError::MalformedResponse(format!(
                "`data` must be an array, got {}",
                json_kind(&other)
            )));
        }
        None => {
            return Err(FetchError::MalformedResponse(
                "missing `data` field".to_string(),
            ));
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawCatalogEntry>(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping catalog entry {}: {}", index, e),
        }
    }

    Ok(entries)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
