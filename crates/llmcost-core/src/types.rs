//! Core domain types for llmcost
//!
//! This module contains the fundamental types shared by every llmcost crate:
//! the raw catalog shape as it arrives over the wire, the uniform model record
//! it is normalized into, token counts supplied by the user, and the derived
//! cost breakdown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of tokens the per-million prices are quoted for
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Strongly-typed model identifier
///
/// Catalog ids look like `anthropic/claude-3-opus`. The id is opaque apart
/// from the namespace prefix used for provider inference.
///
/// # Examples
/// ```
/// use llmcost_core::types::ModelId;
///
/// let id = ModelId::new("openai/gpt-4o");
/// assert_eq!(id.as_str(), "openai/gpt-4o");
/// assert_eq!(id.namespace(), Some("openai"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new ModelId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `/`, if the id has one
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pricing block of a raw catalog entry
///
/// Prices are per token and may arrive as JSON numbers or strings, so they
/// are kept as untyped values until the normalizer sanitizes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPricing {
    /// Price per input (prompt) token
    #[serde(default)]
    pub prompt: Option<serde_json::Value>,
    /// Price per output (completion) token
    #[serde(default)]
    pub completion: Option<serde_json::Value>,
}

/// One element of the remote catalog, before normalization
///
/// Unknown fields are ignored; every known field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawCatalogEntry {
    /// Catalog identifier, e.g. `mistralai/mistral-large`
    #[serde(default)]
    pub id: String,
    /// Human-readable display name
    #[serde(default)]
    pub name: Option<String>,
    /// Per-token prices
    #[serde(default)]
    pub pricing: Option<RawPricing>,
    /// Context window length in tokens
    #[serde(default)]
    pub context_length: Option<serde_json::Value>,
}

/// Uniform, sanitized model record used everywhere past the normalizer
///
/// Prices are in the reference currency (USD) per million tokens and are
/// never negative. A `context_window` of `0` means unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRecord {
    /// Stable catalog identifier
    pub id: ModelId,
    /// Display name
    pub name: String,
    /// Inferred provider label, never empty
    pub provider: String,
    /// Input price in USD per million tokens
    pub input_price_per_million: f64,
    /// Output price in USD per million tokens
    pub output_price_per_million: f64,
    /// Context window in tokens, 0 when unknown
    pub context_window: u64,
}

/// Token counts for a single request
///
/// # Examples
/// ```
/// use llmcost_core::types::TokenCounts;
///
/// let tokens = TokenCounts::new(20_000, 100_000);
/// assert_eq!(tokens.total(), 120_000);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCounts {
    /// Input (prompt) tokens
    pub input_tokens: u64,
    /// Output (completion) tokens
    pub output_tokens: u64,
}

impl TokenCounts {
    /// Create new TokenCounts
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Calculate total tokens, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Cost of one request against one model
///
/// Derived on every recomputation and never persisted.
/// `total_cost` is always exactly `input_cost + output_cost`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    /// The model the cost was computed for
    pub model: ModelRecord,
    /// Cost of the input tokens
    pub input_cost: f64,
    /// Cost of the output tokens
    pub output_cost: f64,
    /// Sum of input and output cost
    pub total_cost: f64,
}

impl CostBreakdown {
    /// Build a breakdown from its two components
    pub fn new(model: ModelRecord, input_cost: f64, output_cost: f64) -> Self {
        Self {
            model,
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
        }
    }

    /// Scale every amount by a linear currency factor
    ///
    /// Both components are scaled first and the total is re-summed, so the
    /// exact-sum property holds in the target currency too.
    pub fn converted(&self, rate: f64) -> Self {
        let mut model = self.model.clone();
        model.input_price_per_million *= rate;
        model.output_price_per_million *= rate;
        Self::new(model, self.input_cost * rate, self.output_cost * rate)
    }

    /// Convenience accessor for the model id
    pub fn id(&self) -> &ModelId {
        &self.model.id
    }
}
