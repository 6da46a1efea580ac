//! Per-pool report and terminal rendering
//!
//! One `PoolReport` per registry entry: every metric is optional, errors are
//! collected alongside rather than replacing the row. The renderer is the
//! single place non-finite numbers become "N/A"; upstream arithmetic never
//! masks them.

use console::style;
use serde::Serialize;

use crate::blocks::BlockRange;
use crate::epoch::EpochWindow;
use crate::metrics::ReturnEstimate;

#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    pub name: String,
    pub chain: String,
    pub reserve0: Option<f64>,
    pub reserve1: Option<f64>,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub price0_usd: f64,
    pub price1_usd: f64,
    pub tvl_usd: Option<f64>,
    pub lp_apr_percent: Option<f64>,
    pub lp_price_usd: Option<f64>,
    pub epoch_window: Option<EpochWindow>,
    pub block_range: Option<BlockRange>,
    pub epoch_volume_usd: Option<f64>,
    pub fee_tier_percent: Option<f64>,
    pub weekly_fees_usd: Option<f64>,
    pub bribes: Option<f64>,
    pub nft_votes: Option<f64>,
    pub total_pool_votes: Option<f64>,
    pub venft_balance: Option<f64>,
    pub venft_return: Option<ReturnEstimate>,
    pub errors: Vec<String>,
}

impl PoolReport {
    pub fn new(name: &str, chain: impl std::fmt::Display, token0: &str, token1: &str) -> Self {
        Self {
            name: name.to_string(),
            chain: chain.to_string(),
            reserve0: None,
            reserve1: None,
            token0_symbol: token0.to_string(),
            token1_symbol: token1.to_string(),
            price0_usd: 0.0,
            price1_usd: 0.0,
            tvl_usd: None,
            lp_apr_percent: None,
            lp_price_usd: None,
            epoch_window: None,
            block_range: None,
            epoch_volume_usd: None,
            fee_tier_percent: None,
            weekly_fees_usd: None,
            bribes: None,
            nft_votes: None,
            total_pool_votes: None,
            venft_balance: None,
            venft_return: None,
            errors: Vec::new(),
        }
    }

    pub fn record_error(&mut self, context: &str, err: impl std::fmt::Display) {
        self.errors.push(format!("{}: {}", context, err));
    }
}

// ============================================
// FORMATTING
// ============================================

/// Two-decimal number, "N/A" for non-finite, "—" when never fetched
fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        Some(_) => "N/A".to_string(),
        None => "—".to_string(),
    }
}

fn fmt_usd(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${:.2}", v),
        Some(_) => "N/A".to_string(),
        None => "—".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v),
        Some(_) => "N/A".to_string(),
        None => "—".to_string(),
    }
}

// ============================================
// RENDERING
// ============================================

/// Print one pool's table
pub fn render(report: &PoolReport) {
    println!();
    println!(
        "{} {}",
        style(&report.name).cyan().bold(),
        style(format!("[{}]", report.chain)).dim()
    );
    println!("{}", style("─".repeat(64)).dim());

    let row = |label: &str, value: String| {
        println!("  {:<28} {:>33}", label, value);
    };

    row(
        &format!("Reserve ({})", report.token0_symbol),
        fmt_opt(report.reserve0),
    );
    row(
        &format!("Reserve ({})", report.token1_symbol),
        fmt_opt(report.reserve1),
    );
    row(
        &format!("{} Price", report.token0_symbol),
        fmt_usd(Some(report.price0_usd)),
    );
    row(
        &format!("{} Price", report.token1_symbol),
        fmt_usd(Some(report.price1_usd)),
    );
    row("TVL", fmt_usd(report.tvl_usd));
    row("LP APR", fmt_pct(report.lp_apr_percent));
    if report.lp_price_usd.is_some() {
        row("LP Price", fmt_usd(report.lp_price_usd));
    }
    row("Epoch Volume", fmt_usd(report.epoch_volume_usd));
    row("Fee Tier", fmt_pct(report.fee_tier_percent));
    row("7d Fees", fmt_usd(report.weekly_fees_usd));
    row("Pool Bribes", fmt_opt(report.bribes));
    row("veNFT Votes", fmt_opt(report.nft_votes));
    row("Total Pool Votes", fmt_opt(report.total_pool_votes));
    row(
        "Annualized veNFT APR",
        fmt_pct(report.venft_return.map(|r| r.apr_percent)),
    );

    if let Some(window) = &report.epoch_window {
        println!("  {}", style(format!("epoch {}", window)).dim());
    }
    if let Some(range) = &report.block_range {
        println!("  {}", style(format!("blocks {}", range)).dim());
    }
    for error in &report.errors {
        println!("  {} {}", style("✗").red(), style(error).red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_renders_na() {
        assert_eq!(fmt_opt(Some(f64::NAN)), "N/A");
        assert_eq!(fmt_pct(Some(f64::INFINITY)), "N/A");
        assert_eq!(fmt_usd(Some(f64::NEG_INFINITY)), "N/A");
    }

    #[test]
    fn test_missing_renders_placeholder() {
        assert_eq!(fmt_opt(None), "—");
        assert_eq!(fmt_usd(None), "—");
    }

    #[test]
    fn test_finite_values_format_two_decimals() {
        assert_eq!(fmt_usd(Some(50_000.0)), "$50000.00");
        assert_eq!(fmt_pct(Some(12.345)), "12.35%");
    }

    #[test]
    fn test_render_never_panics_on_empty_report() {
        let mut report = PoolReport::new("X/Y (Test)", "Fantom", "X", "Y");
        report.record_error("volume", "resolver offline");
        render(&report);
    }
}
