//! Timestamp→Block Resolution - Moralis Integration
//!
//! Maps an epoch boundary to the block number at (or just before) that time
//! via the deep-index dateToBlock endpoint, keyed by chain hex id and an
//! ISO-8601 date.
//!
//! Resolution failure is an `Err`, never a sentinel value: event queries
//! only accept a `BlockRange`, and a `BlockRange` can only be built from two
//! successfully resolved, correctly ordered block numbers. An invalid bound
//! therefore cannot reach an `eth_getLogs` call.

use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::chains::Chain;
use crate::epoch::EpochWindow;

// ============================================
// CONSTANTS
// ============================================

/// Block resolution API base URL
const DATE_TO_BLOCK_URL: &str = "https://deep-index.moralis.io/api/v2.2/dateToBlock";

/// Timeout for API calls
const API_TIMEOUT_SECS: u64 = 5;

// ============================================
// API RESPONSE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct DateToBlockResponse {
    block: Option<u64>,
    message: Option<String>,
}

// ============================================
// BLOCK RANGE
// ============================================

/// A validated, inclusive block window for event queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BlockRange {
    from_block: u64,
    to_block: u64,
}

impl BlockRange {
    /// Both bounds must have resolved and be ordered
    pub fn new(from_block: u64, to_block: u64) -> Result<Self> {
        if from_block > to_block {
            return Err(eyre!(
                "Invalid block range: from {} > to {}",
                from_block,
                to_block
            ));
        }
        Ok(Self {
            from_block,
            to_block,
        })
    }

    pub fn from_block(&self) -> u64 {
        self.from_block
    }

    pub fn to_block(&self) -> u64 {
        self.to_block
    }
}

impl std::fmt::Display for BlockRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.from_block, self.to_block)
    }
}

// ============================================
// BLOCK RESOLVER
// ============================================

/// Owns the HTTP client and API key. Constructed once at startup and passed
/// by reference wherever a block lookup is needed.
pub struct BlockResolver {
    http_client: Client,
    api_key: Option<String>,
}

impl BlockResolver {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    /// Block number whose timestamp is closest to (at or before) `at`
    pub async fn block_at(&self, chain: Chain, at: DateTime<Utc>) -> Result<u64> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| eyre!("Block resolution requires MORALIS_API_KEY"))?;

        let url = format!(
            "{}?chain={}&date={}",
            DATE_TO_BLOCK_URL,
            chain.hex_id(),
            at.to_rfc3339()
        );

        let response: DateToBlockResponse = self
            .http_client
            .get(&url)
            .header("X-API-Key", api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let block = response.block.ok_or_else(|| {
            eyre!(
                "No block in resolver response: {}",
                response.message.unwrap_or_else(|| "unknown error".to_string())
            )
        })?;

        debug!("⛓  {} @ {} → block {}", chain, at.to_rfc3339(), block);
        Ok(block)
    }

    /// Resolve both epoch boundaries and return a validated range
    pub async fn resolve_window(&self, chain: Chain, window: &EpochWindow) -> Result<BlockRange> {
        let from_block = self.block_at(chain, window.start).await?;
        let to_block = self.block_at(chain, window.end).await?;
        BlockRange::new(from_block, to_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_requires_order() {
        assert!(BlockRange::new(100, 200).is_ok());
        assert!(BlockRange::new(200, 100).is_err());
    }

    #[test]
    fn test_single_block_range_is_valid() {
        let r = BlockRange::new(500, 500).unwrap();
        assert_eq!(r.from_block(), 500);
        assert_eq!(r.to_block(), 500);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_closed() {
        let resolver = BlockResolver::new(None).unwrap();
        let err = resolver
            .block_at(Chain::Fantom, Utc::now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("MORALIS_API_KEY"));
    }
}
