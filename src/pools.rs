//! Pool registry
//!
//! One descriptor per tracked pool, covering all five networks. Addresses,
//! decimals, event flavors and the gauge/voter/escrow/bribe wiring are
//! hard-coded here; everything downstream is parametrized by the descriptor.

use crate::chains::Chain;
use crate::onchain::{BribeEventKind, FeeSource, GaugeKind, SwapEventKind};
use crate::snapshot::SnapshotFormat;

/// DEUS token, deployed at the same address on every chain we track
pub const DEUS_ADDRESS: &str = "0xDE55B113A27Cc0c5893CAa6Ee1C020b6B46650C0";

/// Where a pool's reserves come from
#[derive(Debug, Clone, Copy)]
pub enum ReserveSource {
    /// `getReserves()` on the pair contract
    PairReserves,
    /// ERC-20 `balanceOf(pool)` per side, token addresses discovered from
    /// the pair
    TokenBalances,
    /// A hosted indexer snapshot document
    Snapshot {
        url: &'static str,
        format: SnapshotFormat,
    },
}

/// Emission gauge wiring
#[derive(Debug, Clone, Copy)]
pub struct GaugeSpec {
    pub gauge: &'static str,
    pub kind: GaugeKind,
    /// Symbol of the emission token, for pricing the APR
    pub reward_symbol: &'static str,
}

/// Voting/bribe wiring for pools with a veNFT position
#[derive(Debug, Clone, Copy)]
pub struct VotingSpec {
    pub voter: &'static str,
    pub escrow: &'static str,
    pub bribe_contract: &'static str,
    /// Address votes are keyed by (usually the pool itself)
    pub pool_vote_address: &'static str,
    pub nft_id: u64,
    pub bribe_event: BribeEventKind,
    /// Reward-token filter for the bribe scan
    pub bribe_token: &'static str,
    pub bribe_token_symbol: &'static str,
    /// Token the veNFT lock is valued in
    pub gov_token_symbol: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PoolSpec {
    pub name: &'static str,
    pub chain: Chain,
    pub address: &'static str,
    pub token0_symbol: &'static str,
    pub token1_symbol: &'static str,
    pub decimals0: u8,
    pub decimals1: u8,
    pub reserve_source: ReserveSource,
    pub fee_source: Option<FeeSource>,
    pub swap_event: Option<SwapEventKind>,
    pub gauge: Option<GaugeSpec>,
    pub voting: Option<VotingSpec>,
}

pub fn all_pools() -> Vec<PoolSpec> {
    vec![
        // Aerodrome (Base): classic volatile pairs behind the factory fee
        PoolSpec {
            name: "WETH/DEUS (Aerodrome)",
            chain: Chain::Base,
            address: "0x9e4CB8b916289864321661CE02cf66aa5BA63C94",
            token0_symbol: "WETH",
            token1_symbol: "DEUS",
            decimals0: 18,
            decimals1: 18,
            reserve_source: ReserveSource::PairReserves,
            fee_source: Some(FeeSource::Factory {
                factory: "0x420DD381b31aEf6683db6B902084cB0FFECe40Da",
                stable: false,
            }),
            swap_event: Some(SwapEventKind::InOut),
            gauge: Some(GaugeSpec {
                gauge: "0x3b5f2a9c5c7fd54fa1d0b161bbbf4e5f9f966b29",
                kind: GaugeKind::Simple,
                reward_symbol: "AERO",
            }),
            voting: None,
        },
        PoolSpec {
            name: "USDC/DEUS (Aerodrome)",
            chain: Chain::Base,
            address: "0xf185f82A1948d014baE23d30b06FA8Da35110315",
            token0_symbol: "USDC",
            token1_symbol: "DEUS",
            decimals0: 6,
            decimals1: 18,
            reserve_source: ReserveSource::PairReserves,
            fee_source: Some(FeeSource::Factory {
                factory: "0x420DD381b31aEf6683db6B902084cB0FFECe40Da",
                stable: false,
            }),
            swap_event: Some(SwapEventKind::InOut),
            gauge: Some(GaugeSpec {
                gauge: "0x7c9f4c87d911613fe9ca58b579f737911aad2d43",
                kind: GaugeKind::Simple,
                reward_symbol: "AERO",
            }),
            voting: None,
        },
        // Thena (BSC): reserves served by the fusions snapshot
        PoolSpec {
            name: "WBNB/DEUS (Thena)",
            chain: Chain::Bsc,
            address: "0x2b6b73ae7cf7b20e3f2c3daa4d0f13e127e9dcf6",
            token0_symbol: "WBNB",
            token1_symbol: "DEUS",
            decimals0: 18,
            decimals1: 18,
            reserve_source: ReserveSource::Snapshot {
                url: "https://api.thena.fi/api/v1/fusions",
                format: SnapshotFormat::Fusion,
            },
            fee_source: None,
            swap_event: None,
            gauge: None,
            voting: None,
        },
        // Equalizer (Fantom): classic pair with a per-token gauge
        PoolSpec {
            name: "WFTM/DEUS (Equalizer)",
            chain: Chain::Fantom,
            address: "0xcbe2c572d7b4b1f47e7bfd65c0bd404eeabfd322",
            token0_symbol: "WFTM",
            token1_symbol: "DEUS",
            decimals0: 18,
            decimals1: 18,
            reserve_source: ReserveSource::PairReserves,
            fee_source: None,
            swap_event: Some(SwapEventKind::InOut),
            gauge: Some(GaugeSpec {
                gauge: "0xa4d41e7cdb0bd0c8bbeb26f0b34dc38f6d0bbf0e",
                kind: GaugeKind::PerToken {
                    reward_token: "0x3Fd3A0c85B70754eFc07aC9Ac0cbBDCe664865A6",
                },
                reward_symbol: "EQUAL",
            }),
            voting: None,
        },
        // Ichi vault on Equalizer (Fantom): full voting/bribe stack
        PoolSpec {
            name: "USDC/DEUS (Equalizer Ichi)",
            chain: Chain::Fantom,
            address: "0x8d2f3a45b6c01de9f90c52a5c9b0e1bbf8d37c11",
            token0_symbol: "USDC",
            token1_symbol: "DEUS",
            decimals0: 6,
            decimals1: 18,
            reserve_source: ReserveSource::TokenBalances,
            fee_source: Some(FeeSource::Vault {
                vault: "0x6e1f2d7a40bd6cf097bf0e15c31e2b1e66cd9b84",
            }),
            swap_event: Some(SwapEventKind::Signed),
            gauge: None,
            voting: Some(VotingSpec {
                voter: "0xe3d1a117df7dcac2eb0ac8219341bad92f18dac1",
                escrow: "0x8313f3551c4d3984ffbadfb42f780d0c8763ce94",
                bribe_contract: "0xd01a1e92e5c22e1cf6d216b1b41a0dbee3ebd271",
                pool_vote_address: "0x8d2f3a45b6c01de9f90c52a5c9b0e1bbf8d37c11",
                nft_id: 13,
                bribe_event: BribeEventKind::DepositBribe,
                bribe_token: DEUS_ADDRESS,
                bribe_token_symbol: "DEUS",
                gov_token_symbol: "DEUS",
            }),
        },
        // Ramses (Arbitrum): analytics straight from the mixed-pairs dump
        PoolSpec {
            name: "WETH/DEUS (Ramses)",
            chain: Chain::Arbitrum,
            address: "0x93d98b4caac02385a0ae7caaeadc805f48553f76",
            token0_symbol: "WETH",
            token1_symbol: "DEUS",
            decimals0: 18,
            decimals1: 18,
            reserve_source: ReserveSource::Snapshot {
                url: "https://kingdom-api-backups.s3.amazonaws.com/ramses_mixed-pairs.json",
                format: SnapshotFormat::MixedPairs,
            },
            fee_source: None,
            swap_event: None,
            gauge: None,
            voting: None,
        },
        // Solidly (Ethereum): reserves read as raw token balances
        PoolSpec {
            name: "WETH/DEUS (Solidly)",
            chain: Chain::Ethereum,
            address: "0xd8297c0e54cfbb0c11e95bbb5159d3c47dc1a5cd",
            token0_symbol: "WETH",
            token1_symbol: "DEUS",
            decimals0: 18,
            decimals1: 18,
            reserve_source: ReserveSource::TokenBalances,
            fee_source: None,
            swap_event: Some(SwapEventKind::InOut),
            gauge: None,
            voting: None,
        },
    ]
}

/// Pools filtered by an optional name substring and an optional chain
pub fn select_pools(name_filter: Option<&str>, chain: Option<Chain>) -> Vec<PoolSpec> {
    all_pools()
        .into_iter()
        .filter(|p| {
            name_filter
                .map(|n| p.name.to_lowercase().contains(&n.to_lowercase()))
                .unwrap_or(true)
        })
        .filter(|p| chain.map(|c| p.chain == c).unwrap_or(true))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_spans_all_five_networks() {
        let pools = all_pools();
        for chain in Chain::all() {
            assert!(
                pools.iter().any(|p| p.chain == chain),
                "no pool on {}",
                chain
            );
        }
    }

    #[test]
    fn test_voting_pools_carry_full_wiring() {
        for pool in all_pools() {
            if let Some(v) = &pool.voting {
                assert!(!v.voter.is_empty());
                assert!(!v.escrow.is_empty());
                assert!(!v.bribe_contract.is_empty());
                assert!(v.nft_id > 0);
            }
        }
    }

    #[test]
    fn test_snapshot_pools_have_no_swap_scan() {
        // Snapshot-served pools have no on-chain event range to scan
        for pool in all_pools() {
            if matches!(pool.reserve_source, ReserveSource::Snapshot { .. }) {
                assert!(pool.swap_event.is_none(), "{}", pool.name);
            }
        }
    }

    #[test]
    fn test_select_by_chain_and_name() {
        let fantom = select_pools(None, Some(Chain::Fantom));
        assert_eq!(fantom.len(), 2);
        let ichi = select_pools(Some("ichi"), None);
        assert_eq!(ichi.len(), 1);
        assert_eq!(ichi[0].chain, Chain::Fantom);
    }
}
