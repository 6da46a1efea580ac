//! Token Price Client - CoinGecko Integration
//!
//! One shared client prices every registered token in a single request per
//! refresh. Failure never propagates: a failed or partial response degrades
//! to zero prices, and callers are expected to tolerate zeros (and must not
//! divide by them unguarded).
//!
//! API: https://api.coingecko.com/api/v3/simple/price?ids=..&vs_currencies=usd

use eyre::Result;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::tokens;

// ============================================
// CONSTANTS
// ============================================

/// Price API base URL
const PRICE_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Cache duration (one refresh covers every pool in a run)
const CACHE_DURATION_SECS: u64 = 60;

/// Timeout for API calls
const API_TIMEOUT_SECS: u64 = 5;

// ============================================
// API RESPONSE TYPES
// ============================================

/// Per-id quote: `{"usd": 3000.0}`; the field itself may be absent
#[derive(Debug, Deserialize)]
struct PriceEntry {
    usd: Option<f64>,
}

// ============================================
// PRICE SET
// ============================================

/// Symbol → USD price. Lookups never fail: an unknown or unpriced symbol is
/// exactly 0.0, so arithmetic downstream stays total.
#[derive(Debug, Clone, Default)]
pub struct TokenPriceSet {
    prices: HashMap<&'static str, f64>,
}

impl TokenPriceSet {
    /// All registered tokens at zero (the degraded shape)
    pub fn zeroed() -> Self {
        let prices = tokens::all_tokens().iter().map(|t| (t.symbol, 0.0)).collect();
        Self { prices }
    }

    /// Build from an API response body, defaulting every missing id to 0
    fn from_response(body: HashMap<String, PriceEntry>) -> Self {
        let mut set = Self::zeroed();
        for token in tokens::all_tokens() {
            if let Some(entry) = body.get(token.price_id) {
                set.prices.insert(token.symbol, entry.usd.unwrap_or(0.0));
            }
        }
        set
    }

    /// Explicit symbol→price pairs (tests, fixtures)
    pub fn from_pairs(pairs: &[(&'static str, f64)]) -> Self {
        let mut set = Self::zeroed();
        for (symbol, price) in pairs {
            set.prices.insert(*symbol, *price);
        }
        set
    }

    /// USD price for a symbol; 0.0 when unknown or unfetched
    pub fn price(&self, symbol: &str) -> f64 {
        self.prices.get(symbol).copied().unwrap_or(0.0)
    }

    /// True when every price is zero (i.e. the fetch failed outright)
    pub fn is_all_zero(&self) -> bool {
        self.prices.values().all(|p| *p == 0.0)
    }
}

// ============================================
// PRICE CLIENT
// ============================================

/// Owns the HTTP client, the API key and a short-lived cache. Constructed
/// once at startup and passed by reference to every pipeline.
pub struct PriceClient {
    http_client: Client,
    api_key: Option<String>,
    cache: RwLock<Option<(Instant, TokenPriceSet)>>,
}

impl PriceClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            cache: RwLock::new(None),
        })
    }

    /// Current prices for every registered token. Serves from cache within
    /// the TTL; on any fetch failure returns the all-zero set.
    pub async fn fetch_prices(&self) -> TokenPriceSet {
        {
            let cache = self.cache.read().await;
            if let Some((fetched_at, set)) = cache.as_ref() {
                if fetched_at.elapsed() < Duration::from_secs(CACHE_DURATION_SECS) {
                    trace!("Using cached token prices");
                    return set.clone();
                }
            }
        }

        let set = match self.fetch_from_api().await {
            Ok(set) => {
                debug!(
                    "💱 Prices refreshed: WETH=${:.2} DEUS=${:.2}",
                    set.price("WETH"),
                    set.price("DEUS")
                );
                set
            }
            Err(e) => {
                warn!("Price fetch failed, degrading to zero prices: {}", e);
                return TokenPriceSet::zeroed();
            }
        };

        let mut cache = self.cache.write().await;
        *cache = Some((Instant::now(), set.clone()));
        set
    }

    async fn fetch_from_api(&self) -> Result<TokenPriceSet> {
        let ids = tokens::all_price_ids().join(",");
        let mut url = format!("{}?ids={}&vs_currencies=usd", PRICE_API_URL, ids);
        if let Some(key) = &self.api_key {
            url.push_str("&x_cg_demo_api_key=");
            url.push_str(key);
        }

        let body: HashMap<String, PriceEntry> = self
            .http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(TokenPriceSet::from_response(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_symbol_is_exactly_zero() {
        let set = TokenPriceSet::zeroed();
        assert_eq!(set.price("WETH"), 0.0);
        assert_eq!(set.price("NOT_LISTED_ANYWHERE"), 0.0);
        assert!(set.is_all_zero());
    }

    #[test]
    fn test_response_mapping_defaults_absent_ids_to_zero() {
        // {weth: {usd: 3000}, usd-coin: {usd: 1}} with everything else absent
        let mut body = HashMap::new();
        body.insert("weth".to_string(), PriceEntry { usd: Some(3000.0) });
        body.insert("usd-coin".to_string(), PriceEntry { usd: Some(1.0) });

        let set = TokenPriceSet::from_response(body);
        assert_eq!(set.price("WETH"), 3000.0);
        assert_eq!(set.price("USDC"), 1.0);
        assert_eq!(set.price("DEUS"), 0.0);
        assert_eq!(set.price("EQUAL"), 0.0);
        assert!(!set.is_all_zero());
    }

    #[test]
    fn test_null_usd_field_is_zero() {
        let mut body = HashMap::new();
        body.insert("weth".to_string(), PriceEntry { usd: None });
        let set = TokenPriceSet::from_response(body);
        assert_eq!(set.price("WETH"), 0.0);
    }

    #[test]
    fn test_from_pairs_overrides() {
        let set = TokenPriceSet::from_pairs(&[("WETH", 3000.0), ("USDC", 1.0)]);
        assert_eq!(set.price("WETH"), 3000.0);
        assert_eq!(set.price("DEUS"), 0.0);
    }
}
