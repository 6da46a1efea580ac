//! Reserve, fee-tier and gauge reads
//!
//! Three ways a pool reports its reserves: `getReserves()` on the pair,
//! ERC-20 `balanceOf(pool)` per side (token addresses discovered from the
//! pair itself), or an indexer snapshot (handled in `snapshot`). Fee tiers
//! come from the factory or from the vault, in different raw scales.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use eyre::{eyre, Result};

use crate::abi::pool::{IGauge, IMultiRewardGauge, IPoolFactory, IPoolPair, IVault, IERC20};
use crate::chains::Chain;
use crate::rpc;

/// Fee-tier source for a pool, with its raw unit scale
#[derive(Debug, Clone, Copy)]
pub enum FeeSource {
    /// Factory `getFee(pool, stable)`, hundredths of a percent
    Factory {
        factory: &'static str,
        stable: bool,
    },
    /// Vault `fee()`, 1e-4 units
    Vault { vault: &'static str },
}

/// Which `rewardRate` arity the gauge exposes
#[derive(Debug, Clone, Copy)]
pub enum GaugeKind {
    /// `rewardRate()` with a single hard-wired reward token
    Simple,
    /// `rewardRate(token)`, rate per reward token
    PerToken { reward_token: &'static str },
}

fn parse_addr(raw: &str) -> Result<Address> {
    raw.parse()
        .map_err(|e| eyre!("Bad address {}: {}", raw, e))
}

/// Factory fees arrive in hundredths of a percent
fn factory_fee_percent(raw: u64) -> f64 {
    raw as f64 / 100.0
}

/// Vault fees arrive in 1e-4 units
fn vault_fee_percent(raw: u64) -> f64 {
    raw as f64 / 10_000.0
}

/// Raw pair reserves via `getReserves()`
pub async fn pair_reserves(chain: Chain, pool: &str) -> Result<(U256, U256)> {
    let pool = parse_addr(pool)?;
    let calldata = IPoolPair::getReservesCall {}.abi_encode();

    let data = rpc::with_failover(chain, |url| {
        let calldata = calldata.clone();
        async move { rpc::eth_call(&url, pool, calldata, None).await }
    })
    .await?;

    let decoded = IPoolPair::getReservesCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("getReserves decode failed for {}: {}", pool, e))?;
    Ok((
        U256::from(decoded.reserve0.to::<u128>()),
        U256::from(decoded.reserve1.to::<u128>()),
    ))
}

/// The pair's two token addresses
pub async fn pool_tokens(chain: Chain, pool: &str) -> Result<(Address, Address)> {
    let pool = parse_addr(pool)?;

    let data0 = rpc::with_failover(chain, |url| {
        let calldata = IPoolPair::token0Call {}.abi_encode();
        async move { rpc::eth_call(&url, pool, calldata, None).await }
    })
    .await?;
    let token0 = IPoolPair::token0Call::abi_decode_returns(&data0)
        .map_err(|e| eyre!("token0 decode failed for {}: {}", pool, e))?;

    let data1 = rpc::with_failover(chain, |url| {
        let calldata = IPoolPair::token1Call {}.abi_encode();
        async move { rpc::eth_call(&url, pool, calldata, None).await }
    })
    .await?;
    let token1 = IPoolPair::token1Call::abi_decode_returns(&data1)
        .map_err(|e| eyre!("token1 decode failed for {}: {}", pool, e))?;

    Ok((token0, token1))
}

/// ERC-20 balance of `owner` in raw units
pub async fn erc20_balance(chain: Chain, token: Address, owner: Address) -> Result<U256> {
    let data = rpc::with_failover(chain, |url| {
        let calldata = IERC20::balanceOfCall { owner }.abi_encode();
        async move { rpc::eth_call(&url, token, calldata, None).await }
    })
    .await?;

    IERC20::balanceOfCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("balanceOf decode failed for {}: {}", token, e))
}

/// ERC-20 decimal count
pub async fn erc20_decimals(chain: Chain, token: Address) -> Result<u8> {
    let data = rpc::with_failover(chain, |url| {
        let calldata = IERC20::decimalsCall {}.abi_encode();
        async move { rpc::eth_call(&url, token, calldata, None).await }
    })
    .await?;

    IERC20::decimalsCall::abi_decode_returns(&data)
        .map_err(|e| eyre!("decimals decode failed for {}: {}", token, e))
}

/// Fee tier normalized to a percentage
pub async fn fee_tier_percent(chain: Chain, pool: &str, source: &FeeSource) -> Result<f64> {
    match source {
        FeeSource::Factory { factory, stable } => {
            let pool = parse_addr(pool)?;
            let factory = parse_addr(factory)?;
            let data = rpc::with_failover(chain, |url| {
                let calldata = IPoolFactory::getFeeCall {
                    pool,
                    stable: *stable,
                }
                .abi_encode();
                async move { rpc::eth_call(&url, factory, calldata, None).await }
            })
            .await?;

            let raw = IPoolFactory::getFeeCall::abi_decode_returns(&data)
                .map_err(|e| eyre!("getFee decode failed: {}", e))?;
            Ok(factory_fee_percent(raw.to::<u64>()))
        }
        FeeSource::Vault { vault } => {
            let vault = parse_addr(vault)?;
            let data = rpc::with_failover(chain, |url| {
                let calldata = IVault::feeCall {}.abi_encode();
                async move { rpc::eth_call(&url, vault, calldata, None).await }
            })
            .await?;

            let raw = IVault::feeCall::abi_decode_returns(&data)
                .map_err(|e| eyre!("vault fee decode failed: {}", e))?;
            Ok(vault_fee_percent(raw.to::<u64>()))
        }
    }
}

/// Per-second emission rate from the gauge, raw 1e18 units
pub async fn gauge_reward_rate(chain: Chain, gauge: &str, kind: &GaugeKind) -> Result<U256> {
    let gauge = parse_addr(gauge)?;
    match kind {
        GaugeKind::Simple => {
            let data = rpc::with_failover(chain, |url| {
                let calldata = IGauge::rewardRateCall {}.abi_encode();
                async move { rpc::eth_call(&url, gauge, calldata, None).await }
            })
            .await?;

            IGauge::rewardRateCall::abi_decode_returns(&data)
                .map_err(|e| eyre!("rewardRate decode failed: {}", e))
        }
        GaugeKind::PerToken { reward_token } => {
            let token = parse_addr(reward_token)?;
            let data = rpc::with_failover(chain, |url| {
                let calldata = IMultiRewardGauge::rewardRateCall { token }.abi_encode();
                async move { rpc::eth_call(&url, gauge, calldata, None).await }
            })
            .await?;

            IMultiRewardGauge::rewardRateCall::abi_decode_returns(&data)
                .map_err(|e| eyre!("rewardRate(token) decode failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addr_rejects_garbage() {
        assert!(parse_addr("0xDE55B113A27Cc0c5893CAa6Ee1C020b6B46650C0").is_ok());
        assert!(parse_addr("not-an-address").is_err());
        assert!(parse_addr("0x1234").is_err());
    }

    #[test]
    fn test_fee_scales_differ_by_source() {
        // A 0.30% tier is raw 30 from the factory but raw 3000 from a vault
        assert_eq!(factory_fee_percent(30), 0.3);
        assert_eq!(vault_fee_percent(3000), 0.3);
        assert_eq!(factory_fee_percent(5), 0.05);
    }
}
