//! llmcost - Compare LLM API request costs across providers
//!
//! This library provides functionality to:
//! - Fetch a public model catalog and normalize its pricing
//! - Cache the catalog locally with a freshness window and stale fallback
//! - Calculate per-request costs for given token counts, in several currencies
//! - Filter, sort and chart the priced models
//!
//! # Examples
//!
//! ```no_run
//! use llmcost::app::{self, CacheLocation, Settings};
//! use llmcost_core::{types::TokenCounts, view::ViewState};
//! use llmcost_pricing::{catalog::OPENROUTER_MODELS_URL, currency::Currency};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> llmcost::Result<()> {
//!     let settings = Settings {
//!         tokens: TokenCounts::new(20_000, 100_000),
//!         view: ViewState::new(),
//!         limit: None,
//!         currency: Currency::Usd,
//!         refresh: false,
//!         cache: CacheLocation::Default,
//!         cache_ttl: Duration::from_secs(3600),
//!         catalog_url: OPENROUTER_MODELS_URL.to_string(),
//!         timeout: Duration::from_secs(30),
//!     };
//!
//!     let gateway = app::build_gateway(&settings)?;
//!     let rates = app::build_rate_source(&settings)?;
//!     let comparison = app::compare(&gateway, &rates, &settings).await?;
//!     let view = comparison.derive(&settings.view, settings.limit);
//!
//!     for row in view.table {
//!         println!("{} {:.4}", row.model.id, row.total_cost);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;

pub use llmcost_core::error;

// Re-export commonly used types
pub use llmcost_core::error::{FetchError, LlmCostError, Result};
pub use llmcost_core::types::{CostBreakdown, ModelId, ModelRecord, TokenCounts};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
