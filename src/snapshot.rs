//! Indexer Snapshot Client
//!
//! Some pools are read from a hosted indexer snapshot instead of the chain:
//! a REST GET returns a JSON document with an array of pool records, and the
//! record is matched by case-insensitive address/id equality. A pool missing
//! from the snapshot is a reportable error for that row, not a fatal one.
//!
//! Two payload layouts are supported:
//! - `Fusion`: `{"data": [{address, token0: {reserve}, token1: {reserve}}]}`
//! - `MixedPairs`: `{"pairs": [{id, lpApr, lp_price, poolDayData: [{reserveUSD}]}]}`

use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

// ============================================
// CONSTANTS
// ============================================

/// Timeout for snapshot downloads (the mixed-pairs dump is large)
const API_TIMEOUT_SECS: u64 = 15;

// ============================================
// PAYLOAD LAYOUTS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `data` array with nested per-token reserves
    Fusion,
    /// `pairs` array with LP analytics and day data
    MixedPairs,
}

/// Numbers arrive as JSON numbers or as quoted strings depending on the API
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Num(f64),
    Text(String),
}

impl NumberLike {
    fn as_f64(&self) -> f64 {
        match self {
            NumberLike::Num(n) => *n,
            NumberLike::Text(s) => s.parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FusionDocument {
    data: Vec<FusionRecord>,
}

#[derive(Debug, Deserialize)]
struct FusionRecord {
    address: Option<String>,
    token0: Option<FusionTokenSide>,
    token1: Option<FusionTokenSide>,
}

#[derive(Debug, Deserialize)]
struct FusionTokenSide {
    reserve: Option<NumberLike>,
}

#[derive(Debug, Deserialize)]
struct MixedPairsDocument {
    pairs: Vec<MixedPairRecord>,
}

#[derive(Debug, Deserialize)]
struct MixedPairRecord {
    id: Option<String>,
    #[serde(rename = "lpApr")]
    lp_apr: Option<NumberLike>,
    lp_price: Option<NumberLike>,
    #[serde(rename = "poolDayData")]
    pool_day_data: Option<Vec<MixedPairDayData>>,
}

#[derive(Debug, Deserialize)]
struct MixedPairDayData {
    #[serde(rename = "reserveUSD")]
    reserve_usd: Option<NumberLike>,
}

// ============================================
// NORMALIZED RECORD
// ============================================

/// What a snapshot can tell us about one pool; fields absent from the
/// layout stay `None`
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecord {
    pub reserve0: Option<f64>,
    pub reserve1: Option<f64>,
    pub reserve_usd: Option<f64>,
    pub lp_apr: Option<f64>,
    pub lp_price: Option<f64>,
}

// ============================================
// SNAPSHOT CLIENT
// ============================================

pub struct SnapshotClient {
    http_client: Client,
}

impl SnapshotClient {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http_client })
    }

    /// Download the snapshot at `url` and pull out the record for `pool_id`
    pub async fn fetch_record(
        &self,
        url: &str,
        format: SnapshotFormat,
        pool_id: &str,
    ) -> Result<SnapshotRecord> {
        let body = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let record = parse_record(&body, format, pool_id)?;
        debug!("📦 Snapshot record found for {}", pool_id);
        Ok(record)
    }
}

/// Locate `pool_id` in the document (case-insensitive) and normalize it
fn parse_record(body: &str, format: SnapshotFormat, pool_id: &str) -> Result<SnapshotRecord> {
    let wanted = pool_id.to_lowercase();

    match format {
        SnapshotFormat::Fusion => {
            let doc: FusionDocument = serde_json::from_str(body)?;
            let record = doc
                .data
                .iter()
                .find(|r| {
                    r.address
                        .as_deref()
                        .map(|a| a.to_lowercase() == wanted)
                        .unwrap_or(false)
                })
                .ok_or_else(|| eyre!("Pool {} not found in snapshot", pool_id))?;

            Ok(SnapshotRecord {
                reserve0: record
                    .token0
                    .as_ref()
                    .and_then(|t| t.reserve.as_ref())
                    .map(NumberLike::as_f64),
                reserve1: record
                    .token1
                    .as_ref()
                    .and_then(|t| t.reserve.as_ref())
                    .map(NumberLike::as_f64),
                ..Default::default()
            })
        }
        SnapshotFormat::MixedPairs => {
            let doc: MixedPairsDocument = serde_json::from_str(body)?;
            let record = doc
                .pairs
                .iter()
                .find(|r| {
                    r.id.as_deref()
                        .map(|a| a.to_lowercase() == wanted)
                        .unwrap_or(false)
                })
                .ok_or_else(|| eyre!("Pool {} not found in snapshot", pool_id))?;

            let reserve_usd = record
                .pool_day_data
                .as_ref()
                .and_then(|days| days.first())
                .and_then(|d| d.reserve_usd.as_ref())
                .map(NumberLike::as_f64);
            if reserve_usd.is_none() {
                return Err(eyre!("No reserveUSD day data for pool {}", pool_id));
            }

            Ok(SnapshotRecord {
                reserve_usd,
                lp_apr: record.lp_apr.as_ref().map(NumberLike::as_f64),
                lp_price: record.lp_price.as_ref().map(NumberLike::as_f64),
                ..Default::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUSION_BODY: &str = r#"{
        "data": [
            {"address": "0xAbCd00000000000000000000000000000000EF12",
             "token0": {"reserve": 1500.5},
             "token1": {"reserve": "42000"}},
            {"address": "0x1111111111111111111111111111111111111111",
             "token0": {"reserve": 1},
             "token1": {"reserve": 2}}
        ]
    }"#;

    const MIXED_PAIRS_BODY: &str = r#"{
        "pairs": [
            {"id": "0xDEAD00000000000000000000000000000000BEEF",
             "lpApr": 18.4,
             "lp_price": "2.25",
             "poolDayData": [{"reserveUSD": "123456.78"}, {"reserveUSD": "100000"}]}
        ]
    }"#;

    #[test]
    fn test_fusion_record_case_insensitive_match() {
        let record = parse_record(
            FUSION_BODY,
            SnapshotFormat::Fusion,
            "0xabcd00000000000000000000000000000000ef12",
        )
        .unwrap();
        assert_eq!(record.reserve0, Some(1500.5));
        assert_eq!(record.reserve1, Some(42000.0));
        assert!(record.reserve_usd.is_none());
    }

    #[test]
    fn test_mixed_pairs_takes_latest_day() {
        let record = parse_record(
            MIXED_PAIRS_BODY,
            SnapshotFormat::MixedPairs,
            "0xdead00000000000000000000000000000000beef",
        )
        .unwrap();
        assert_eq!(record.reserve_usd, Some(123456.78));
        assert_eq!(record.lp_apr, Some(18.4));
        assert_eq!(record.lp_price, Some(2.25));
    }

    #[test]
    fn test_missing_pool_is_reportable_error() {
        let err = parse_record(FUSION_BODY, SnapshotFormat::Fusion, "0x9999").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(parse_record("{}", SnapshotFormat::Fusion, "0x1").is_err());
        assert!(parse_record("not json", SnapshotFormat::MixedPairs, "0x1").is_err());
    }
}
