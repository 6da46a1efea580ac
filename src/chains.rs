//! The five networks the dashboard reads from.
//!
//! Each chain carries its numeric id, the hex id the block-resolution API
//! expects, and an ordered list of RPC endpoints used for failover. Endpoint
//! URLs are templated from provider API keys; endpoints whose key is absent
//! are dropped rather than emitted half-formed.

use serde::{Deserialize, Serialize};
use std::env;

/// Fixed connect/read timeout for RPC and REST calls, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Base,
    Bsc,
    Fantom,
    Arbitrum,
}

impl Chain {
    pub fn all() -> [Chain; 5] {
        [
            Chain::Ethereum,
            Chain::Base,
            Chain::Bsc,
            Chain::Fantom,
            Chain::Arbitrum,
        ]
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Base => 8453,
            Chain::Bsc => 56,
            Chain::Fantom => 250,
            Chain::Arbitrum => 42161,
        }
    }

    /// Hex chain id as the timestamp→block API expects it
    pub fn hex_id(&self) -> &'static str {
        match self {
            Chain::Ethereum => "0x1",
            Chain::Base => "0x2105",
            Chain::Bsc => "0x38",
            Chain::Fantom => "0xfa",
            Chain::Arbitrum => "0xa4b1",
        }
    }

    /// Environment variable that overrides the endpoint list for this chain
    /// (comma-separated URLs)
    pub fn rpc_env_var(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETHEREUM_RPC_URLS",
            Chain::Base => "BASE_RPC_URLS",
            Chain::Bsc => "BSC_RPC_URLS",
            Chain::Fantom => "FANTOM_RPC_URLS",
            Chain::Arbitrum => "ARBITRUM_RPC_URLS",
        }
    }

    /// Ordered endpoint list: override from the environment if present,
    /// otherwise the defaults templated from provider keys.
    pub fn rpc_endpoints(&self) -> Vec<String> {
        if let Ok(raw) = env::var(self.rpc_env_var()) {
            let urls: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !urls.is_empty() {
                return urls;
            }
        }
        self.default_endpoints()
    }

    fn default_endpoints(&self) -> Vec<String> {
        let ankr = env::var("ANKR_KEY").ok();
        let alchemy = env::var("ALCHEMY_KEY").ok();
        let infura = env::var("INFURA_PROJECT_ID").ok();

        let mut urls = Vec::new();
        match self {
            Chain::Ethereum => {
                if let Some(k) = &ankr {
                    urls.push(format!("https://rpc.ankr.com/eth/{}", k));
                }
                urls.push("https://eth.llamarpc.com".to_string());
            }
            Chain::Base => {
                if let Some(k) = &ankr {
                    urls.push(format!("https://rpc.ankr.com/base/{}", k));
                }
                if let Some(k) = &alchemy {
                    urls.push(format!("https://base-mainnet.g.alchemy.com/v2/{}", k));
                }
                if let Some(k) = &infura {
                    urls.push(format!("https://base-mainnet.infura.io/v3/{}", k));
                }
                urls.push("https://rpc.base.org".to_string());
            }
            Chain::Bsc => {
                urls.push("https://bsc-dataseed.binance.org".to_string());
                if let Some(k) = &ankr {
                    urls.push(format!("https://rpc.ankr.com/bsc/{}", k));
                }
                if let Some(k) = &alchemy {
                    urls.push(format!("https://bsc-mainnet.g.alchemy.com/v2/{}", k));
                }
                urls.push("https://bsc-dataseed1.defibit.io".to_string());
            }
            Chain::Fantom => {
                if let Some(k) = &ankr {
                    urls.push(format!("https://rpc.ankr.com/fantom/{}", k));
                }
                urls.push("https://rpcapi.fantom.network".to_string());
                urls.push("https://rpc.ftm.tools".to_string());
            }
            Chain::Arbitrum => {
                if let Some(k) = &ankr {
                    urls.push(format!("https://rpc.ankr.com/arbitrum/{}", k));
                }
                urls.push("https://arb1.arbitrum.io/rpc".to_string());
            }
        }
        urls
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "Ethereum"),
            Chain::Base => write!(f, "Base"),
            Chain::Bsc => write!(f, "BSC"),
            Chain::Fantom => write!(f, "Fantom"),
            Chain::Arbitrum => write!(f, "Arbitrum"),
        }
    }
}

impl std::str::FromStr for Chain {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => Ok(Chain::Ethereum),
            "base" => Ok(Chain::Base),
            "bsc" | "bnb" => Ok(Chain::Bsc),
            "fantom" | "ftm" => Ok(Chain::Fantom),
            "arbitrum" | "arb" => Ok(Chain::Arbitrum),
            other => Err(eyre::eyre!("Unknown chain: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_chain_ids_match_hex_ids() {
        for chain in Chain::all() {
            let hex = chain.hex_id().trim_start_matches("0x");
            let parsed = u64::from_str_radix(hex, 16).unwrap();
            assert_eq!(parsed, chain.chain_id());
        }
    }

    #[test]
    fn test_every_chain_has_a_keyless_endpoint() {
        // Without any provider keys the list must still be non-empty
        for chain in Chain::all() {
            assert!(
                !chain.default_endpoints().is_empty(),
                "{} has no fallback endpoint",
                chain
            );
        }
    }

    #[test]
    fn test_chain_parsing() {
        assert_eq!(Chain::from_str("ftm").unwrap(), Chain::Fantom);
        assert_eq!(Chain::from_str("Base").unwrap(), Chain::Base);
        assert!(Chain::from_str("solana").is_err());
    }
}
