//! Catalog normalization
//!
//! Turns loosely-typed [`RawCatalogEntry`] values into [`ModelRecord`]s.
//! Normalization never fails: anything that cannot be interpreted becomes
//! a zero price or an unknown (`0`) context window.

use crate::provider::infer_provider;
use crate::types::{ModelId, ModelRecord, RawCatalogEntry, TOKENS_PER_MILLION};
use serde_json::Value;
use tracing::debug;

/// Normalize one raw catalog entry
///
/// # Examples
/// ```
/// use llmcost_core::normalizer::normalize;
/// use llmcost_core::types::{RawCatalogEntry, RawPricing};
/// use serde_json::json;
///
/// let raw = RawCatalogEntry {
///     id: "anthropic/claude-3".to_string(),
///     name: None,
///     pricing: Some(RawPricing {
///         prompt: Some(json!("0.000003")),
///         completion: Some(json!("0.000015")),
///     }),
///     context_length: None,
/// };
///
/// let record = normalize(&raw);
/// assert_eq!(record.provider, "Anthropic");
/// assert!((record.input_price_per_million - 3.0).abs() < 1e-9);
/// assert_eq!(record.context_window, 0);
/// ```
pub fn normalize(raw: &RawCatalogEntry) -> ModelRecord {
    let pricing = raw.pricing.as_ref();
    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(&raw.id);

    ModelRecord {
        id: ModelId::new(raw.id.clone()),
        name: name.to_string(),
        provider: infer_provider(&raw.id),
        input_price_per_million: per_million(pricing.and_then(|p| p.prompt.as_ref())),
        output_price_per_million: per_million(pricing.and_then(|p| p.completion.as_ref())),
        context_window: sanitize_context_window(raw.context_length.as_ref()),
    }
}

/// Normalize a whole catalog, preserving order
pub fn normalize_all(entries: &[RawCatalogEntry]) -> Vec<ModelRecord> {
    let records: Vec<ModelRecord> = entries.iter().map(normalize).collect();
    debug!("Normalized {} catalog entries", records.len());
    records
}

/// Sanitize a per-token price field
///
/// Numbers and numeric strings are accepted. Absent, unparseable, non-finite
/// and negative values all become `0.0`; catalogs use `-1` for "variable".
pub fn sanitize_price(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() && price > 0.0 => price,
        _ => 0.0,
    }
}

fn per_million(value: Option<&Value>) -> f64 {
    let price = sanitize_price(value) * TOKENS_PER_MILLION;
    // Prices near f64::MAX overflow when scaled
    if price.is_finite() { price } else { 0.0 }
}

/// Sanitize the context length field, `0` meaning unknown
pub fn sanitize_context_window(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 1.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}
