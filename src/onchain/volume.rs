//! Epoch swap-volume aggregation
//!
//! Fetches every `Swap` log a pool emitted inside a validated block range
//! and sums the legs entering the pool, priced at the CURRENT spot price.
//! Pricing historical swaps at today's price is a deliberate simplification:
//! volumes here are indicative, not accounting-grade.
//!
//! Summation is a plain commutative fold: event order never changes the
//! total.

use alloy_primitives::Address;
use alloy_rpc_types::Filter;
use alloy_sol_types::SolEvent;
use eyre::{eyre, Result};
use tracing::debug;

use crate::abi::{concentrated, solidly};
use crate::blocks::BlockRange;
use crate::chains::Chain;
use crate::metrics::{signed_units, to_units};
use crate::prices::TokenPriceSet;
use crate::rpc;

/// Which `Swap` layout the pool emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapEventKind {
    /// Unsigned `amount0In`/`amount1In`/`amount0Out`/`amount1Out`
    InOut,
    /// One signed amount per token; negative leaves the pool
    Signed,
}

/// One decoded swap, both legs already in human units. For `InOut` pools the
/// legs are the in-amounts; for `Signed` pools they keep their signs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapLegs {
    pub amount0: f64,
    pub amount1: f64,
}

/// Total USD volume for one pool over one epoch window
#[allow(clippy::too_many_arguments)]
pub async fn epoch_swap_volume(
    chain: Chain,
    pool: &str,
    kind: SwapEventKind,
    range: &BlockRange,
    prices: &TokenPriceSet,
    token0_symbol: &str,
    token1_symbol: &str,
    decimals0: u8,
    decimals1: u8,
) -> Result<f64> {
    let pool: Address = pool
        .parse()
        .map_err(|e| eyre!("Bad pool address {}: {}", pool, e))?;

    let signature = match kind {
        SwapEventKind::InOut => solidly::Swap::SIGNATURE_HASH,
        SwapEventKind::Signed => concentrated::Swap::SIGNATURE_HASH,
    };

    let filter = Filter::new()
        .address(pool)
        .event_signature(signature)
        .from_block(range.from_block())
        .to_block(range.to_block());

    let logs = rpc::with_failover(chain, |url| {
        let filter = filter.clone();
        async move { rpc::get_logs(&url, &filter).await }
    })
    .await?;

    let mut legs = Vec::with_capacity(logs.len());
    for log in &logs {
        match kind {
            SwapEventKind::InOut => {
                let event = solidly::Swap::decode_log_data(&log.inner.data)
                    .map_err(|e| eyre!("Swap decode failed: {}", e))?;
                legs.push(SwapLegs {
                    amount0: to_units(event.amount0In, decimals0),
                    amount1: to_units(event.amount1In, decimals1),
                });
            }
            SwapEventKind::Signed => {
                let event = concentrated::Swap::decode_log_data(&log.inner.data)
                    .map_err(|e| eyre!("Swap decode failed: {}", e))?;
                legs.push(SwapLegs {
                    amount0: signed_units(event.amount0, decimals0),
                    amount1: signed_units(event.amount1, decimals1),
                });
            }
        }
    }

    let price0 = prices.price(token0_symbol);
    let price1 = prices.price(token1_symbol);
    let volume = sum_volume_usd(kind, &legs, price0, price1);

    debug!(
        "🌊 {} swaps over {} → ${:.2} volume",
        legs.len(),
        range,
        volume
    );
    Ok(volume)
}

/// Pure summation over decoded legs. `InOut` prices both in-amounts;
/// `Signed` prices the first negative leg of each event at |amount|.
pub fn sum_volume_usd(kind: SwapEventKind, legs: &[SwapLegs], price0: f64, price1: f64) -> f64 {
    legs.iter()
        .map(|leg| match kind {
            SwapEventKind::InOut => leg.amount0 * price0 + leg.amount1 * price1,
            SwapEventKind::Signed => {
                if leg.amount0 < 0.0 {
                    leg.amount0.abs() * price0
                } else if leg.amount1 < 0.0 {
                    leg.amount1.abs() * price1
                } else {
                    0.0
                }
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legs(pairs: &[(f64, f64)]) -> Vec<SwapLegs> {
        pairs
            .iter()
            .map(|(a0, a1)| SwapLegs {
                amount0: *a0,
                amount1: *a1,
            })
            .collect()
    }

    #[test]
    fn test_inout_prices_both_in_legs() {
        // 2 WETH in @ 3000 + 500 USDC in @ 1
        let total = sum_volume_usd(SwapEventKind::InOut, &legs(&[(2.0, 500.0)]), 3000.0, 1.0);
        assert!((total - 6500.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_prices_first_negative_leg_only() {
        let events = legs(&[
            (-2.0, 6000.0),  // 2 token0 out → 2 * 3000
            (1.5, -4500.0),  // 4500 token1 out → 4500 * 1
            (1.0, 2.0),      // no negative leg, contributes nothing
        ]);
        let total = sum_volume_usd(SwapEventKind::Signed, &events, 3000.0, 1.0);
        assert!((total - 10_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_sum_is_permutation_invariant() {
        let forward = legs(&[(1.0, -2.0), (-3.5, 0.0), (0.25, 7.0), (2.0, 2.0)]);
        let mut reversed = forward.clone();
        reversed.reverse();

        for kind in [SwapEventKind::InOut, SwapEventKind::Signed] {
            let a = sum_volume_usd(kind, &forward, 1234.5, 6.7);
            let b = sum_volume_usd(kind, &reversed, 1234.5, 6.7);
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_prices_zero_volume() {
        // All-zero prices (degraded price fetch) must not blow up
        let total = sum_volume_usd(SwapEventKind::InOut, &legs(&[(5.0, 5.0)]), 0.0, 0.0);
        assert_eq!(total, 0.0);
    }
}
