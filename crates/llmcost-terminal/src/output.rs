//! Output formatting module for llmcost
//!
//! This module provides formatters for displaying derived views:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! Formatters receive rows that are already filtered, sorted and converted;
//! they only decide how those rows look.

use crate::chart::{BarChart, truncate};
use chrono::{DateTime, Utc};
use llmcost_core::types::{CostBreakdown, TokenCounts};
use llmcost_core::view::{ChartMode, DerivedView, Selection};
use llmcost_pricing::currency::{Currency, RateOrigin};
use llmcost_pricing::gateway::{CacheStatus, CatalogOrigin};
use prettytable::{Table, format, row};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Longest model name shown in the table before truncation
const MAX_NAME_WIDTH: usize = 40;

/// Everything a formatter needs to render a comparison
pub struct Report<'a> {
    /// Token counts the costs were computed for
    pub tokens: TokenCounts,
    /// Derived table and chart rows
    pub view: &'a DerivedView<'a>,
    /// Pinned models
    pub selection: &'a Selection,
    /// Display currency
    pub currency: Currency,
    /// Where the conversion rate came from
    pub rate_origin: RateOrigin,
    /// Where the pricing data came from
    pub origin: &'a CatalogOrigin,
    /// When the pricing data was fetched
    pub fetched_at: DateTime<Utc>,
    /// Size of the unfiltered model set
    pub total_models: usize,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the comparison table
    fn format_table(&self, report: &Report<'_>) -> String;

    /// Format the chart view
    fn format_chart(&self, report: &Report<'_>) -> String;

    /// Format provider labels with their model counts
    fn format_providers(&self, counts: &BTreeMap<String, usize>) -> String;

    /// Format the pricing cache status
    fn format_cache_status(&self, status: Option<&CacheStatus>) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Token counts get
/// thousands separators and amounts the currency symbol.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format an amount with more decimals the smaller it is
    fn format_currency(amount: f64, currency: Currency) -> String {
        let symbol = currency.symbol();
        if amount == 0.0 {
            format!("{symbol}0")
        } else if amount >= 1.0 {
            format!("{symbol}{amount:.2}")
        } else if amount >= 0.01 {
            format!("{symbol}{amount:.4}")
        } else {
            format!("{symbol}{amount:.6}")
        }
    }

    fn format_context(context_window: u64) -> String {
        if context_window == 0 {
            "-".to_string()
        } else {
            Self::format_number(context_window)
        }
    }

    fn header(report: &Report<'_>) -> String {
        let rate = match report.rate_origin {
            RateOrigin::Identity => String::new(),
            RateOrigin::Live => " (live rate)".to_string(),
            RateOrigin::Fallback => " (fallback rate)".to_string(),
        };

        let mut header = format!(
            "{} input / {} output tokens, {} of {} models, prices in {}{}\n",
            Self::format_number(report.tokens.input_tokens),
            Self::format_number(report.tokens.output_tokens),
            report.view.table.len(),
            report.total_models,
            report.currency.code(),
            rate
        );

        if let CatalogOrigin::StaleCache { error } = report.origin {
            header.push_str(&format!(
                "Warning: pricing data may be outdated (fetched {}): {}\n",
                report.fetched_at.format("%Y-%m-%d %H:%M UTC"),
                error
            ));
        }

        header
    }
}

impl OutputFormatter for TableFormatter {
    fn format_table(&self, report: &Report<'_>) -> String {
        let currency = report.currency;
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> "",
            b -> "Model",
            b -> "Provider",
            b -> "Input /M",
            b -> "Output /M",
            b -> "Context",
            b -> "Input Cost",
            b -> "Output Cost",
            b -> "Total"
        ]);

        for entry in &report.view.table {
            let marker = if report.selection.contains(entry.id()) {
                "*"
            } else {
                ""
            };

            table.add_row(row![
                marker,
                truncate(&entry.model.name, MAX_NAME_WIDTH),
                entry.model.provider,
                r -> Self::format_currency(entry.model.input_price_per_million, currency),
                r -> Self::format_currency(entry.model.output_price_per_million, currency),
                r -> Self::format_context(entry.model.context_window),
                r -> Self::format_currency(entry.input_cost, currency),
                r -> Self::format_currency(entry.output_cost, currency),
                r -> Self::format_currency(entry.total_cost, currency)
            ]);
        }

        let mut output = Self::header(report);
        if report.view.table.is_empty() {
            output.push_str("No models match the current filters.\n");
        } else {
            output.push_str(&table.to_string());
        }
        output
    }

    fn format_chart(&self, report: &Report<'_>) -> String {
        let title = match &report.view.mode {
            ChartMode::TopPaid { cap } => format!("Top {cap} paid models by total cost"),
            ChartMode::Selected(ids) => format!("Selected models ({})", ids.len()),
        };

        let mut output = format!("\n{title}\n");
        if report.view.chart.is_empty() {
            output.push_str("Nothing to chart.\n");
            return output;
        }

        let currency = report.currency;
        output.push_str(
            &BarChart::new().render(&report.view.chart, |v| Self::format_currency(v, currency)),
        );
        output
    }

    fn format_providers(&self, counts: &BTreeMap<String, usize>) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Provider", b -> "Models"]);

        for (provider, count) in counts {
            table.add_row(row![provider, r -> count]);
        }

        table.to_string()
    }

    fn format_cache_status(&self, status: Option<&CacheStatus>) -> String {
        let Some(status) = status else {
            return "No cached pricing data.\n".to_string();
        };

        format!(
            "Fetched:  {}\nAge:      {}m {}s\nTTL:      {}s\nFresh:    {}\nModels:   {}\n",
            status.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
            status.age_secs / 60,
            status.age_secs % 60,
            status.ttl_secs,
            if status.is_fresh { "yes" } else { "no" },
            status.model_count
        )
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn row_json(entry: &CostBreakdown, selection: &Selection) -> Value {
        json!({
            "id": entry.model.id,
            "name": entry.model.name,
            "provider": entry.model.provider,
            "input_price_per_million": entry.model.input_price_per_million,
            "output_price_per_million": entry.model.output_price_per_million,
            "context_window": entry.model.context_window,
            "input_cost": entry.input_cost,
            "output_cost": entry.output_cost,
            "total_cost": entry.total_cost,
            "selected": selection.contains(entry.id()),
        })
    }

    fn source_json(report: &Report<'_>) -> Value {
        let (origin, error) = match report.origin {
            CatalogOrigin::Cache => ("cache", None),
            CatalogOrigin::Network => ("network", None),
            CatalogOrigin::StaleCache { error } => ("stale_cache", Some(error.to_string())),
        };

        json!({
            "origin": origin,
            "stale": error.is_some(),
            "error": error,
            "fetched_at": report.fetched_at.to_rfc3339(),
        })
    }

    fn chart_json(report: &Report<'_>) -> Value {
        let (mode, cap) = match &report.view.mode {
            ChartMode::TopPaid { cap } => ("top_paid", Some(*cap)),
            ChartMode::Selected(_) => ("selected", None),
        };

        json!({
            "mode": mode,
            "cap": cap,
            "models": report
                .view
                .chart
                .iter()
                .map(|entry| Self::row_json(entry, report.selection))
                .collect::<Vec<_>>(),
        })
    }

    fn to_string(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_table(&self, report: &Report<'_>) -> String {
        let rate_origin = match report.rate_origin {
            RateOrigin::Identity => "identity",
            RateOrigin::Live => "live",
            RateOrigin::Fallback => "fallback",
        };

        let output = json!({
            "tokens": {
                "input_tokens": report.tokens.input_tokens,
                "output_tokens": report.tokens.output_tokens,
            },
            "currency": report.currency.code(),
            "rate_origin": rate_origin,
            "pricing": Self::source_json(report),
            "total_models": report.total_models,
            "models": report
                .view
                .table
                .iter()
                .map(|entry| Self::row_json(entry, report.selection))
                .collect::<Vec<_>>(),
            "chart": Self::chart_json(report),
        });

        Self::to_string(&output)
    }

    fn format_chart(&self, report: &Report<'_>) -> String {
        let output = json!({
            "currency": report.currency.code(),
            "pricing": Self::source_json(report),
            "chart": Self::chart_json(report),
        });

        Self::to_string(&output)
    }

    fn format_providers(&self, counts: &BTreeMap<String, usize>) -> String {
        let providers: Vec<Value> = counts
            .iter()
            .map(|(provider, count)| json!({"provider": provider, "models": count}))
            .collect();

        Self::to_string(&json!({ "providers": providers }))
    }

    fn format_cache_status(&self, status: Option<&CacheStatus>) -> String {
        Self::to_string(&json!({ "cache": status }))
    }
}

/// Get the appropriate formatter based on output format
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
