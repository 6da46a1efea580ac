//! farmscope - Yield Farming Analytics Dashboard
//!
//! Run with: cargo run
//!
//! One pipeline per registered pool: prices → reserves/TVL → fee tier →
//! epoch window → volume → bribes → votes → return estimate, rendered as a
//! table per pool. Degrades to placeholders instead of crashing when an
//! upstream API is missing or down.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farmscope::chains::Chain;
use farmscope::config::Config;
use farmscope::pipeline::{self, AppContext};
use farmscope::pools;
use farmscope::report;

#[derive(Debug, Parser)]
#[command(name = "farmscope", about = "Yield-farming analytics across five EVM networks")]
struct Cli {
    /// Only show pools whose name contains this substring
    #[arg(long)]
    pool: Option<String>,

    /// Only show pools on this chain (ethereum/base/bsc/fantom/arbitrum)
    #[arg(long)]
    chain: Option<Chain>,

    /// Emit reports as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Load configuration from a TOML file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🌾 FARMSCOPE - Yield Farming Analytics").cyan().bold()
    );
    println!(
        "{}",
        style("    5 Networks | Epoch Volume | Bribes | veNFT Returns").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("farmscope=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if !cli.json {
        print_banner();
    }

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e.into());
    }

    if !cli.json {
        config.print_summary();
        println!();
    }

    // Shared clients, built once, passed by reference everywhere
    let ctx = AppContext::from_config(&config)?;

    let selected = pools::select_pools(cli.pool.as_deref(), cli.chain);
    if selected.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "No pools match the given filters (see src/pools.rs for the registry)"
        ));
    }

    let bar = if cli.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(selected.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:32.cyan/dim}] {pos}/{len} pools",
        )?);
        bar
    };

    // All pool pipelines run concurrently; each is read-only and reports
    // its own failures on its own row
    let reports = futures::future::join_all(selected.iter().map(|spec| {
        let ctx = &ctx;
        let bar = bar.clone();
        async move {
            let report = pipeline::run_pool(ctx, spec).await;
            bar.inc(1);
            report
        }
    }))
    .await;
    bar.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        report::render(report);
    }

    // =============================================
    // SUMMARY
    // =============================================
    let total_tvl: f64 = reports.iter().filter_map(|r| r.tvl_usd).sum();
    let error_count: usize = reports.iter().map(|r| r.errors.len()).sum();

    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!("{}", style(" ✅ SCAN COMPLETE").green().bold());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!();
    println!("Summary:");
    println!("  • Pools rendered: {}", reports.len());
    println!("  • Combined TVL:   ${:.2}", total_tvl);
    println!("  • Fetch errors:   {}", error_count);
    if error_count > 0 {
        println!(
            "{}",
            style("  Some metrics degraded to placeholders - check row errors above.").yellow()
        );
    }
    println!();

    Ok(())
}
