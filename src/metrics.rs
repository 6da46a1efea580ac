//! Financial arithmetic over fetched pool data
//!
//! Everything in this module is a pure function: unit normalization, TVL,
//! emission APR, weekly fees, and the vote-weighted veNFT return estimate.
//! Division guards are deliberately absent from the return estimate: zero
//! votes or a zero veNFT value produce a non-finite number that the display
//! layer renders as "N/A" instead of a percentage.

use alloy_primitives::{I256, U256};
use serde::Serialize;

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const DAYS_PER_YEAR: f64 = 365.0;
pub const EPOCHS_PER_YEAR: f64 = 52.0;

// ============================================
// UNIT CONVERSION
// ============================================

/// Raw on-chain integer → human units
pub fn to_units(raw: U256, decimals: u8) -> f64 {
    let raw = if raw.bit_len() > 128 {
        u128::MAX
    } else {
        raw.to::<u128>()
    };
    (raw as f64) / 10f64.powi(decimals as i32)
}

/// Human units → raw on-chain integer (truncating)
pub fn from_units(amount: f64, decimals: u8) -> U256 {
    if amount <= 0.0 {
        return U256::ZERO;
    }
    U256::from((amount * 10f64.powi(decimals as i32)) as u128)
}

/// Signed raw amount → human units, sign preserved
pub fn signed_units(raw: I256, decimals: u8) -> f64 {
    let v = i128::try_from(raw).unwrap_or_else(|_| {
        if raw.is_negative() {
            i128::MIN
        } else {
            i128::MAX
        }
    });
    (v as f64) / 10f64.powi(decimals as i32)
}

// ============================================
// POOL METRICS
// ============================================

/// USD value locked: both reserves in human units, priced at spot
pub fn tvl_usd(reserve0: f64, price0: f64, reserve1: f64, price1: f64) -> f64 {
    reserve0 * price0 + reserve1 * price1
}

/// Emission APR from a gauge reward rate (per-second rate in 1e18 units)
pub fn lp_apr_percent(reward_rate: U256, reward_price_usd: f64, tvl_usd: f64) -> f64 {
    let rate_per_second = to_units(reward_rate, 18);
    let annual_emissions = rate_per_second * SECONDS_PER_DAY * DAYS_PER_YEAR;
    let annual_emissions_usd = annual_emissions * reward_price_usd;
    annual_emissions_usd / tvl_usd * 100.0
}

/// Fees earned by the pool over one epoch, from volume and the fee tier
/// (fee tier already expressed as a percentage)
pub fn weekly_fees_usd(epoch_volume_usd: f64, fee_tier_percent: f64) -> f64 {
    epoch_volume_usd * (fee_tier_percent / 100.0)
}

// ============================================
// veNFT RETURN ESTIMATE
// ============================================

/// Inputs to the vote-weighted annualized return
#[derive(Debug, Clone, Copy)]
pub struct ReturnInputs {
    /// Votes this NFT cast on the pool, human units
    pub nft_votes: f64,
    /// All votes cast on the pool, human units
    pub total_pool_votes: f64,
    /// Bribes deposited over the epoch, in bribe-token units (not USD)
    pub bribes: f64,
    /// Pool fees over the epoch, USD
    pub weekly_fees_usd: f64,
    /// Spot price of the bribe token
    pub bribe_token_price_usd: f64,
    /// Locked balance behind the NFT, human units
    pub venft_balance: f64,
    /// Spot price of the governance token backing the lock
    pub gov_token_price_usd: f64,
}

/// Derived return figures. Any field may be non-finite when a divisor was
/// zero; callers check `is_finite()` before formatting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReturnEstimate {
    pub vote_share: f64,
    pub net_bribe_value_usd: f64,
    pub fee_return_usd: f64,
    pub annual_return_usd: f64,
    pub venft_value_usd: f64,
    pub apr_percent: f64,
}

/// Annualized veNFT return. The order of operations is load-bearing: the
/// bribe delta subtracts the raw bribe count before pricing, which changes
/// both sign and magnitude versus pricing each term separately.
pub fn venft_return(inputs: &ReturnInputs) -> ReturnEstimate {
    let vote_share = inputs.nft_votes / inputs.total_pool_votes;
    let bribe_return = inputs.bribes * vote_share;
    let net_bribe_value_usd = (bribe_return - inputs.bribes) * inputs.bribe_token_price_usd;
    let fee_return_usd = inputs.weekly_fees_usd * vote_share;
    let annual_return_usd = (net_bribe_value_usd + fee_return_usd) * EPOCHS_PER_YEAR;
    let venft_value_usd = inputs.venft_balance * inputs.gov_token_price_usd;
    let apr_percent = annual_return_usd / venft_value_usd * 100.0;

    ReturnEstimate {
        vote_share,
        net_bribe_value_usd,
        fee_return_usd,
        annual_return_usd,
        venft_value_usd,
        apr_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trip_within_one_unit() {
        for decimals in [6u8, 18u8] {
            for raw in [1u128, 123_456_789, 10u128.pow(decimals as u32) * 42] {
                let raw = U256::from(raw);
                let human = to_units(raw, decimals);
                let back = from_units(human, decimals);
                let diff = if back > raw { back - raw } else { raw - back };
                assert!(
                    diff <= U256::from(1u8),
                    "round trip off by {} at {} decimals",
                    diff,
                    decimals
                );
            }
        }
    }

    #[test]
    fn test_signed_units() {
        let neg = I256::try_from(-1_500_000i64).unwrap();
        assert!((signed_units(neg, 6) + 1.5).abs() < 1e-9);
        let pos = I256::try_from(2_000_000_000_000_000_000i128).unwrap();
        assert!((signed_units(pos, 18) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tvl_scenario() {
        // 10 WETH @ 3000 + 20000 USDC @ 1
        let tvl = tvl_usd(10.0, 3000.0, 20000.0, 1.0);
        assert!((tvl - 50_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_fees() {
        // 1M volume at a 0.3% tier
        let fees = weekly_fees_usd(1_000_000.0, 0.3);
        assert!((fees - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_lp_apr() {
        // 1e18 per second for a year on a 31.536M TVL at $1 = 100% APR
        let rate = U256::from(10u128.pow(18));
        let apr = lp_apr_percent(rate, 1.0, 31_536_000.0);
        assert!((apr - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_return_estimate_reference_values() {
        let est = venft_return(&ReturnInputs {
            nft_votes: 100.0,
            total_pool_votes: 400.0,
            bribes: 1000.0,
            weekly_fees_usd: 500.0,
            bribe_token_price_usd: 2.0,
            venft_balance: 5000.0,
            gov_token_price_usd: 2.0,
        });
        assert!((est.vote_share - 0.25).abs() < 1e-12);
        // (250 - 1000) * 2 = -1500
        assert!((est.net_bribe_value_usd + 1500.0).abs() < 1e-9);
        // 500 * 0.25 = 125
        assert!((est.fee_return_usd - 125.0).abs() < 1e-9);
        // (-1500 + 125) * 52 = -71500
        assert!((est.annual_return_usd + 71_500.0).abs() < 1e-6);
        // -71500 / 10000 * 100 = -715%
        assert!((est.apr_percent + 715.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_votes_is_non_finite_not_a_panic() {
        let est = venft_return(&ReturnInputs {
            nft_votes: 10.0,
            total_pool_votes: 0.0,
            bribes: 100.0,
            weekly_fees_usd: 50.0,
            bribe_token_price_usd: 1.0,
            venft_balance: 100.0,
            gov_token_price_usd: 1.0,
        });
        assert!(!est.apr_percent.is_finite());
    }

    #[test]
    fn test_zero_venft_value_is_non_finite() {
        let est = venft_return(&ReturnInputs {
            nft_votes: 10.0,
            total_pool_votes: 100.0,
            bribes: 100.0,
            weekly_fees_usd: 50.0,
            bribe_token_price_usd: 1.0,
            venft_balance: 0.0,
            gov_token_price_usd: 1.0,
        });
        assert!(!est.apr_percent.is_finite());
    }
}
