//! Per-pool data pipeline
//!
//! One parametrized chain of typed stages per pool descriptor: prices →
//! reserves/TVL → fee tier → gauge APR → epoch window → block range →
//! volume → fees → bribes/votes → return estimate. A stage runs iff its
//! inputs resolved; readiness is never inferred from observed values.
//!
//! Failures stop at the stage boundary: the metric keeps its default, the
//! row records what happened, dependents are skipped with a note. Nothing
//! panics past this module.

use chrono::Utc;
use eyre::Result;
use tracing::{debug, info};

use crate::blocks::{BlockRange, BlockResolver};
use crate::config::Config;
use crate::epoch::EpochWindow;
use crate::metrics::{self, to_units, ReturnInputs};
use crate::onchain::{reserves, volume, voting};
use crate::pools::{PoolSpec, ReserveSource, VotingSpec};
use crate::prices::{PriceClient, TokenPriceSet};
use crate::report::PoolReport;
use crate::rpc;
use crate::snapshot::SnapshotClient;

/// Shared clients, constructed once at startup and passed by reference to
/// every pipeline.
pub struct AppContext {
    pub prices: PriceClient,
    pub blocks: BlockResolver,
    pub snapshots: SnapshotClient,
}

impl AppContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            prices: PriceClient::new(config.coingecko_api_key.clone())?,
            blocks: BlockResolver::new(config.moralis_api_key.clone())?,
            snapshots: SnapshotClient::new()?,
        })
    }
}

/// Run the full pipeline for one pool. Always returns a report; partial
/// data plus recorded errors is the expected degraded shape.
pub async fn run_pool(ctx: &AppContext, spec: &PoolSpec) -> PoolReport {
    let mut report = PoolReport::new(spec.name, spec.chain, spec.token0_symbol, spec.token1_symbol);

    // ---- prices (shared, cached across sibling pipelines) ----
    let prices = ctx.prices.fetch_prices().await;
    report.price0_usd = prices.price(spec.token0_symbol);
    report.price1_usd = prices.price(spec.token1_symbol);
    if prices.is_all_zero() {
        report.record_error("prices", "price API unavailable, using zero prices");
    }

    // ---- reserves and TVL ----
    fetch_reserves(ctx, spec, &mut report).await;

    // ---- fee tier ----
    if let Some(source) = &spec.fee_source {
        match reserves::fee_tier_percent(spec.chain, spec.address, source).await {
            Ok(pct) => report.fee_tier_percent = Some(pct),
            Err(e) => report.record_error("fee tier", e),
        }
    }

    // ---- gauge emission APR ----
    if let Some(gauge) = &spec.gauge {
        match report.tvl_usd {
            Some(tvl) if tvl > 0.0 => {
                match reserves::gauge_reward_rate(spec.chain, gauge.gauge, &gauge.kind).await {
                    Ok(rate) => {
                        let reward_price = prices.price(gauge.reward_symbol);
                        report.lp_apr_percent =
                            Some(metrics::lp_apr_percent(rate, reward_price, tvl));
                    }
                    Err(e) => report.record_error("gauge", e),
                }
            }
            _ => report.record_error("gauge", "skipped: TVL unavailable or zero"),
        }
    }

    // ---- epoch window ----
    let needs_window = spec.swap_event.is_some() || spec.voting.is_some();
    let window = if needs_window {
        let window = resolve_epoch_window(spec).await;
        report.epoch_window = Some(window);
        Some(window)
    } else {
        None
    };

    // ---- block range; failure here loudly skips every event-scan metric ----
    let blocks = &ctx.blocks;
    let range: Option<BlockRange> = match window {
        Some(w) => match rpc::retry(rpc::DEFAULT_RETRY_ATTEMPTS, || async move {
            blocks.resolve_window(spec.chain, &w).await
        })
        .await
        {
            Ok(r) => {
                report.block_range = Some(r);
                Some(r)
            }
            Err(e) => {
                report.record_error(
                    "block resolution",
                    format!("{} (volume/bribes/votes skipped)", e),
                );
                None
            }
        },
        None => None,
    };

    // ---- epoch swap volume ----
    if let (Some(kind), Some(range)) = (spec.swap_event, &range) {
        match volume::epoch_swap_volume(
            spec.chain,
            spec.address,
            kind,
            range,
            &prices,
            spec.token0_symbol,
            spec.token1_symbol,
            spec.decimals0,
            spec.decimals1,
        )
        .await
        {
            Ok(v) => report.epoch_volume_usd = Some(v),
            Err(e) => report.record_error("volume", e),
        }
    }

    // ---- weekly fees (derived, no fetch) ----
    if let (Some(volume_usd), Some(fee_pct)) = (report.epoch_volume_usd, report.fee_tier_percent)
    {
        report.weekly_fees_usd = Some(metrics::weekly_fees_usd(volume_usd, fee_pct));
    }

    // ---- voting stack ----
    if let (Some(voting_spec), Some(range)) = (&spec.voting, &range) {
        fetch_voting(spec, voting_spec, range, &prices, &mut report).await;
    }

    info!(
        "✓ {} [{}]: TVL {} | {} error(s)",
        spec.name,
        spec.chain,
        report
            .tvl_usd
            .map(|t| format!("${:.0}", t))
            .unwrap_or_else(|| "—".to_string()),
        report.errors.len()
    );
    report
}

/// Epoch bounds for a pool: the voter contract when one is wired, pure date
/// arithmetic otherwise. Probe policy: the current time, so the window is
/// the most recently completed epoch.
async fn resolve_epoch_window(spec: &PoolSpec) -> EpochWindow {
    let probe = Utc::now();
    if let Some(v) = &spec.voting {
        match voting::voter_epoch_window(spec.chain, v.voter, probe).await {
            Ok(window) => return window,
            Err(e) => {
                debug!(
                    "Voter epoch accessors unavailable for {}, using date arithmetic: {}",
                    spec.name, e
                );
            }
        }
    }
    EpochWindow::completed(probe)
}

async fn fetch_reserves(ctx: &AppContext, spec: &PoolSpec, report: &mut PoolReport) {
    match &spec.reserve_source {
        ReserveSource::PairReserves => {
            match reserves::pair_reserves(spec.chain, spec.address).await {
                Ok((raw0, raw1)) => {
                    let reserve0 = to_units(raw0, spec.decimals0);
                    let reserve1 = to_units(raw1, spec.decimals1);
                    report.reserve0 = Some(reserve0);
                    report.reserve1 = Some(reserve1);
                    report.tvl_usd = Some(metrics::tvl_usd(
                        reserve0,
                        report.price0_usd,
                        reserve1,
                        report.price1_usd,
                    ));
                }
                Err(e) => report.record_error("reserves", e),
            }
        }
        ReserveSource::TokenBalances => match balance_reserves(spec).await {
            Ok((reserve0, reserve1)) => {
                report.reserve0 = Some(reserve0);
                report.reserve1 = Some(reserve1);
                report.tvl_usd = Some(metrics::tvl_usd(
                    reserve0,
                    report.price0_usd,
                    reserve1,
                    report.price1_usd,
                ));
            }
            Err(e) => report.record_error("reserves", e),
        },
        ReserveSource::Snapshot { url, format } => {
            match ctx.snapshots.fetch_record(url, *format, spec.address).await {
                Ok(record) => {
                    report.reserve0 = record.reserve0;
                    report.reserve1 = record.reserve1;
                    report.lp_price_usd = record.lp_price;
                    if record.lp_apr.is_some() {
                        report.lp_apr_percent = record.lp_apr;
                    }
                    if let Some(tvl) = record.reserve_usd {
                        report.tvl_usd = Some(tvl);
                    } else if let (Some(r0), Some(r1)) = (record.reserve0, record.reserve1) {
                        report.tvl_usd = Some(metrics::tvl_usd(
                            r0,
                            report.price0_usd,
                            r1,
                            report.price1_usd,
                        ));
                    }
                }
                Err(e) => report.record_error("snapshot", e),
            }
        }
    }
}

/// Reserves as raw token balances held by the pool, token addresses
/// discovered from the pair itself
async fn balance_reserves(spec: &PoolSpec) -> Result<(f64, f64)> {
    let pool: alloy_primitives::Address = spec
        .address
        .parse()
        .map_err(|e| eyre::eyre!("Bad pool address {}: {}", spec.address, e))?;

    let (token0, token1) = reserves::pool_tokens(spec.chain, spec.address).await?;

    let balance0 = reserves::erc20_balance(spec.chain, token0, pool).await?;
    let decimals0 = reserves::erc20_decimals(spec.chain, token0).await?;
    let balance1 = reserves::erc20_balance(spec.chain, token1, pool).await?;
    let decimals1 = reserves::erc20_decimals(spec.chain, token1).await?;

    Ok((to_units(balance0, decimals0), to_units(balance1, decimals1)))
}

async fn fetch_voting(
    spec: &PoolSpec,
    voting_spec: &VotingSpec,
    range: &BlockRange,
    prices: &TokenPriceSet,
    report: &mut PoolReport,
) {
    let snapshot_block = voting::vote_snapshot_block(range);

    match voting::epoch_bribes(
        spec.chain,
        voting_spec.bribe_contract,
        voting_spec.bribe_event,
        voting_spec.bribe_token,
        range,
    )
    .await
    {
        Ok(total) => report.bribes = Some(total),
        Err(e) => report.record_error("bribes", e),
    }

    match voting::nft_votes(
        spec.chain,
        voting_spec.voter,
        voting_spec.nft_id,
        voting_spec.pool_vote_address,
        snapshot_block,
    )
    .await
    {
        Ok(votes) => report.nft_votes = Some(votes),
        Err(e) => report.record_error("nft votes", e),
    }

    match voting::total_pool_votes(
        spec.chain,
        voting_spec.voter,
        voting_spec.pool_vote_address,
        snapshot_block,
    )
    .await
    {
        Ok(votes) => report.total_pool_votes = Some(votes),
        Err(e) => report.record_error("pool votes", e),
    }

    match voting::venft_balance(spec.chain, voting_spec.escrow, voting_spec.nft_id).await {
        Ok(balance) => report.venft_balance = Some(balance),
        Err(e) => report.record_error("veNFT balance", e),
    }

    if let Some(inputs) = assemble_return_inputs(report, voting_spec, prices) {
        report.venft_return = Some(metrics::venft_return(&inputs));
    } else {
        report.record_error("veNFT APR", "skipped: voting data incomplete");
    }
}

/// Return-estimate inputs, present only when every voting read succeeded.
/// Weekly fees default to zero when the fee stages did not run; the vote
/// figures never default.
fn assemble_return_inputs(
    report: &PoolReport,
    voting_spec: &VotingSpec,
    prices: &TokenPriceSet,
) -> Option<ReturnInputs> {
    Some(ReturnInputs {
        nft_votes: report.nft_votes?,
        total_pool_votes: report.total_pool_votes?,
        bribes: report.bribes?,
        weekly_fees_usd: report.weekly_fees_usd.unwrap_or(0.0),
        bribe_token_price_usd: prices.price(voting_spec.bribe_token_symbol),
        venft_balance: report.venft_balance?,
        gov_token_price_usd: prices.price(voting_spec.gov_token_symbol),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onchain::BribeEventKind;

    fn voting_spec() -> VotingSpec {
        VotingSpec {
            voter: "0xe3d1a117df7dcac2eb0ac8219341bad92f18dac1",
            escrow: "0x8313f3551c4d3984ffbadfb42f780d0c8763ce94",
            bribe_contract: "0xd01a1e92e5c22e1cf6d216b1b41a0dbee3ebd271",
            pool_vote_address: "0x8d2f3a45b6c01de9f90c52a5c9b0e1bbf8d37c11",
            nft_id: 13,
            bribe_event: BribeEventKind::DepositBribe,
            bribe_token: crate::pools::DEUS_ADDRESS,
            bribe_token_symbol: "DEUS",
            gov_token_symbol: "DEUS",
        }
    }

    #[test]
    fn test_return_inputs_require_all_vote_reads() {
        let prices = TokenPriceSet::from_pairs(&[("DEUS", 2.0)]);
        let mut report = PoolReport::new("p", "Fantom", "USDC", "DEUS");
        report.bribes = Some(100.0);
        report.nft_votes = Some(10.0);
        report.total_pool_votes = Some(50.0);
        // veNFT balance missing → no estimate
        assert!(assemble_return_inputs(&report, &voting_spec(), &prices).is_none());

        report.venft_balance = Some(500.0);
        let inputs = assemble_return_inputs(&report, &voting_spec(), &prices).unwrap();
        assert_eq!(inputs.bribe_token_price_usd, 2.0);
        // fees never fetched → defaulted, not skipped
        assert_eq!(inputs.weekly_fees_usd, 0.0);
    }

    #[test]
    fn test_zero_total_votes_flows_through_as_non_finite() {
        let prices = TokenPriceSet::from_pairs(&[("DEUS", 2.0)]);
        let mut report = PoolReport::new("p", "Fantom", "USDC", "DEUS");
        report.bribes = Some(100.0);
        report.nft_votes = Some(10.0);
        report.total_pool_votes = Some(0.0);
        report.venft_balance = Some(500.0);

        let inputs = assemble_return_inputs(&report, &voting_spec(), &prices).unwrap();
        let estimate = metrics::venft_return(&inputs);
        assert!(!estimate.apr_percent.is_finite());
    }
}
