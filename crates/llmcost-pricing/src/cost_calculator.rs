//! Cost calculator module for computing request costs
//!
//! Costs are derived from a [`ModelRecord`]'s per-million prices and the
//! user's token counts. Calculation is pure: no lookups, no rounding, no
//! failure modes.
//!
//! # Examples
//!
//! ```
//! use llmcost_core::types::{ModelId, ModelRecord, TokenCounts};
//! use llmcost_pricing::cost_calculator::CostCalculator;
//!
//! let model = ModelRecord {
//!     id: ModelId::new("anthropic/claude-3"),
//!     name: "Claude 3".to_string(),
//!     provider: "Anthropic".to_string(),
//!     input_price_per_million: 3.0,
//!     output_price_per_million: 15.0,
//!     context_window: 200_000,
//! };
//!
//! let cost = CostCalculator::calculate_from_pricing(&model, &TokenCounts::new(20_000, 100_000));
//! assert!((cost.total_cost - 1.56).abs() < 1e-12);
//! ```

use crate::currency::CurrencyConverter;
use llmcost_core::types::{CostBreakdown, ModelRecord, TOKENS_PER_MILLION, TokenCounts};
use tracing::debug;

/// Calculates request costs, optionally in a converted currency
///
/// The calculator carries a single linear conversion factor. A calculator
/// built with [`CostCalculator::new`] reports costs in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostCalculator {
    /// Multiplier from USD to the target currency
    conversion_rate: f64,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CostCalculator {
    /// Create a calculator reporting USD
    pub fn new() -> Self {
        Self {
            conversion_rate: 1.0,
        }
    }

    /// Create a calculator reporting in the converter's currency
    pub fn with_converter(converter: &CurrencyConverter) -> Self {
        Self {
            conversion_rate: converter.rate(),
        }
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    /// Calculate the USD cost of a request against one model
    ///
    /// This is a pure function; `total_cost` is exactly
    /// `input_cost + output_cost`.
    pub fn calculate_from_pricing(model: &ModelRecord, tokens: &TokenCounts) -> CostBreakdown {
        let input_cost =
            (tokens.input_tokens as f64 / TOKENS_PER_MILLION) * model.input_price_per_million;
        let output_cost =
            (tokens.output_tokens as f64 / TOKENS_PER_MILLION) * model.output_price_per_million;

        CostBreakdown::new(model.clone(), input_cost, output_cost)
    }

    /// Calculate the cost of a request in this calculator's currency
    pub fn calculate(&self, model: &ModelRecord, tokens: &TokenCounts) -> CostBreakdown {
        let breakdown = Self::calculate_from_pricing(model, tokens);
        if self.conversion_rate == 1.0 {
            breakdown
        } else {
            breakdown.converted(self.conversion_rate)
        }
    }

    /// Calculate costs for every model, preserving order
    pub fn calculate_all(&self, models: &[ModelRecord], tokens: &TokenCounts) -> Vec<CostBreakdown> {
        let rows: Vec<CostBreakdown> = models
            .iter()
            .map(|model| self.calculate(model, tokens))
            .collect();

        debug!(
            "Calculated costs for {} models at {} total tokens",
            rows.len(),
            tokens.total()
        );

        rows
    }
}
