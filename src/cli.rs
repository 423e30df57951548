//! CLI interface for llmcost
//!
//! This module defines the command-line interface using clap. All view and
//! pricing flags are global, so they can be given before or after the
//! subcommand. When the subcommand is omitted, it defaults to `compare`.
//!
//! # Example
//!
//! ```bash
//! # Cost of 50k input / 2k output tokens on every Anthropic model
//! llmcost --input-tokens 50000 --output-tokens 2000 --provider anthropic
//!
//! # Pin two models and chart them in euros
//! llmcost chart --select openai/gpt-4o --select anthropic/claude-3.5-sonnet -c eur
//!
//! # Inspect the local pricing cache
//! llmcost cache status
//! ```

use crate::app::{CacheLocation, Settings};
use clap::{Parser, Subcommand, ValueEnum};
use llmcost_core::error::{LlmCostError, Result};
use llmcost_core::types::TokenCounts;
use llmcost_core::view::{
    DEFAULT_CHART_CAP, ModelFilter, Selection, SortDirection, SortField, SortSpec, ViewState,
};
use llmcost_pricing::catalog::OPENROUTER_MODELS_URL;
use llmcost_pricing::currency::Currency;
use std::path::PathBuf;
use std::time::Duration;

/// Compare LLM API request costs across providers
#[derive(Parser, Debug, Clone)]
#[command(name = "llmcost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of input (prompt) tokens
    #[arg(long, short = 'i', default_value_t = 20_000, global = true)]
    pub input_tokens: u64,

    /// Number of output (completion) tokens
    #[arg(long, short = 'o', default_value_t = 100_000, global = true)]
    pub output_tokens: u64,

    /// Only show models from this provider (e.g. "OpenAI"; "All" shows every provider)
    #[arg(long, short = 'p', global = true)]
    pub provider: Option<String>,

    /// Only show models whose name or id contains this text
    #[arg(long, short = 's', global = true)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long, value_enum, default_value = "total", global = true)]
    pub sort: SortKey,

    /// Sort in descending order
    #[arg(long, global = true)]
    pub desc: bool,

    /// Pin a model by id (repeatable); pinned models are listed first and charted
    #[arg(long = "select", value_name = "MODEL_ID", global = true)]
    pub select: Vec<String>,

    /// Show at most this many table rows
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Number of models in the automatic top-cost chart
    #[arg(long, default_value_t = DEFAULT_CHART_CAP, global = true)]
    pub chart_cap: usize,

    /// Currency to display costs in
    #[arg(long, short = 'c', env = "LLMCOST_CURRENCY", default_value = "usd", global = true)]
    pub currency: Currency,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Fetch fresh pricing even if the cache is still valid
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Do not read or write the on-disk pricing cache (overrides --cache-dir)
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Directory for the pricing cache (defaults to the platform cache directory)
    #[arg(long, env = "LLMCOST_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Seconds cached pricing stays fresh
    #[arg(long, env = "LLMCOST_CACHE_TTL", default_value_t = 3600, global = true)]
    pub cache_ttl: u64,

    /// Model catalog endpoint
    #[arg(long, env = "LLMCOST_CATALOG_URL", default_value = OPENROUTER_MODELS_URL, global = true)]
    pub catalog_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Show debug output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the cost comparison table (default)
    Compare {
        /// Also draw the cost chart below the table
        #[arg(long)]
        chart: bool,
    },

    /// Show only the cost chart
    Chart,

    /// List provider labels with their model counts
    Providers,

    /// Inspect or clear the local pricing cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Pricing cache maintenance
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show age and size of the cached catalog
    Status,
    /// Delete the cached catalog
    Clear,
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    Name,
    Provider,
    Input,
    Output,
    Total,
    Context,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => SortField::Name,
            SortKey::Provider => SortField::Provider,
            SortKey::Input => SortField::InputPrice,
            SortKey::Output => SortField::OutputPrice,
            SortKey::Total => SortField::TotalCost,
            SortKey::Context => SortField::ContextWindow,
        }
    }
}

impl Cli {
    /// Command to run, `compare` when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Compare { chart: false })
    }

    /// Log filter directive for the verbosity flags
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "llmcost=debug,llmcost_core=debug,llmcost_pricing=debug,llmcost_terminal=debug"
        } else {
            "warn"
        }
    }

    /// View state for the table and chart
    pub fn view_state(&self) -> ViewState {
        let mut filter = ModelFilter::new();
        if let Some(provider) = &self.provider {
            filter = filter.with_provider(provider.clone());
        }
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }

        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        ViewState::new()
            .with_filter(filter)
            .with_sort(SortSpec {
                field: self.sort.into(),
                direction,
            })
            .with_selection(Selection::from_ids(self.select.iter().map(String::as_str)))
            .with_chart_cap(self.chart_cap)
    }

    /// Validate the flags and build runtime settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero timeout, chart cap or row limit
    pub fn settings(&self) -> Result<Settings> {
        if self.timeout == 0 {
            return Err(LlmCostError::InvalidArgument(
                "--timeout must be at least 1 second".to_string(),
            ));
        }
        if self.chart_cap == 0 {
            return Err(LlmCostError::InvalidArgument(
                "--chart-cap must be at least 1".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(LlmCostError::InvalidArgument(
                "--limit must be at least 1".to_string(),
            ));
        }

        let cache = if self.no_cache {
            CacheLocation::Memory
        } else if let Some(dir) = &self.cache_dir {
            CacheLocation::Dir(dir.clone())
        } else {
            CacheLocation::Default
        };

        Ok(Settings {
            tokens: TokenCounts::new(self.input_tokens, self.output_tokens),
            view: self.view_state(),
            limit: self.limit,
            currency: self.currency,
            refresh: self.refresh,
            cache,
            cache_ttl: Duration::from_secs(self.cache_ttl),
            catalog_url: self.catalog_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        })
    }
}
