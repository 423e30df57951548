//! Core types, normalization and view derivation for llmcost
//!
//! This crate provides the foundational types and error handling shared by
//! every llmcost crate, the catalog normalizer that turns raw pricing entries
//! into uniform model records, and the view engine that filters, sorts and
//! selects cost-annotated rows for presentation.

pub mod error;
pub mod normalizer;
pub mod provider;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use error::{FetchError, LlmCostError, Result};
pub use types::{CostBreakdown, ModelId, ModelRecord, RawCatalogEntry, TokenCounts};
