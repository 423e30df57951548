//! llmcost - Compare LLM API request costs across providers

use clap::Parser;
use is_terminal::IsTerminal;
use llmcost::{
    app::{self, Comparison},
    cli::{CacheAction, Cli, Command},
    error::Result,
};
use llmcost_core::view::DerivedView;
use llmcost_terminal::{Report, get_formatter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_report<'a>(
    comparison: &'a Comparison,
    view: &'a DerivedView<'a>,
    selection: &'a llmcost_core::view::Selection,
) -> Report<'a> {
    Report {
        tokens: comparison.tokens,
        view,
        selection,
        currency: comparison.converter.currency(),
        rate_origin: comparison.converter.origin(),
        origin: &comparison.catalog.origin,
        fetched_at: comparison.fetched_at(),
        total_models: comparison.rows.len(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose and --quiet override RUST_LOG
    let filter = if cli.verbose || cli.quiet {
        tracing_subscriber::EnvFilter::new(cli.log_directive())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_directive()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    let settings = cli.settings()?;
    let gateway = app::build_gateway(&settings)?;
    let formatter = get_formatter(cli.json);

    match cli.command() {
        Command::Compare { chart } => {
            info!("Running cost comparison");
            let rates = app::build_rate_source(&settings)?;
            let comparison = app::compare(&gateway, &rates, &settings).await?;
            let view = comparison.derive(&settings.view, settings.limit);
            let report = build_report(&comparison, &view, &settings.view.selection);

            println!("{}", formatter.format_table(&report));
            if chart && !cli.json {
                println!("{}", formatter.format_chart(&report));
            }
        }
        Command::Chart => {
            info!("Running cost chart");
            let rates = app::build_rate_source(&settings)?;
            let comparison = app::compare(&gateway, &rates, &settings).await?;
            let view = comparison.derive(&settings.view, settings.limit);
            let report = build_report(&comparison, &view, &settings.view.selection);

            println!("{}", formatter.format_chart(&report));
        }
        Command::Providers => {
            let catalog = app::load_catalog(&gateway, settings.refresh).await?;
            let counts = llmcost_core::view::provider_counts(&catalog.models);
            println!("{}", formatter.format_providers(&counts));
        }
        Command::Cache { action } => match action {
            CacheAction::Status => {
                let status = gateway.cache_status().await;
                println!("{}", formatter.format_cache_status(status.as_ref()));
            }
            CacheAction::Clear => {
                gateway.clear_cache().await?;
                if !cli.json {
                    println!("Pricing cache cleared.");
                }
            }
        },
    }

    Ok(())
}
