//! Token registry for the dashboard
//!
//! Every token any pool touches, with the id the price API knows it by and
//! its on-chain decimal count. Prices for ALL registered tokens are fetched
//! in one request per refresh; adding a token here is enough to get it
//! priced.

use std::collections::HashMap;

/// A token the dashboard prices
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub symbol: &'static str,
    /// Identifier the price API uses for this asset
    pub price_id: &'static str,
    pub decimals: u8,
}

pub fn all_tokens() -> Vec<Token> {
    vec![
        Token { symbol: "WETH", price_id: "weth", decimals: 18 },
        Token { symbol: "USDC", price_id: "usd-coin", decimals: 6 },
        Token { symbol: "DEUS", price_id: "deus-finance-2", decimals: 18 },
        Token { symbol: "AERO", price_id: "aerodrome-finance", decimals: 18 },
        Token { symbol: "WBNB", price_id: "wbnb", decimals: 18 },
        Token { symbol: "THE", price_id: "thena", decimals: 18 },
        Token { symbol: "WFTM", price_id: "wrapped-fantom", decimals: 18 },
        Token { symbol: "EQUAL", price_id: "equalizer-dex", decimals: 18 },
        Token { symbol: "SOLID", price_id: "solidly", decimals: 18 },
        Token { symbol: "RAM", price_id: "ramses-exchange", decimals: 18 },
    ]
}

/// All price-API ids, in registry order (one request prices everything)
pub fn all_price_ids() -> Vec<&'static str> {
    all_tokens().iter().map(|t| t.price_id).collect()
}

/// Map from price-API id back to display symbol
pub fn price_id_to_symbol() -> HashMap<&'static str, &'static str> {
    all_tokens().iter().map(|t| (t.price_id, t.symbol)).collect()
}

pub fn get_token(symbol: &str) -> Option<Token> {
    all_tokens().into_iter().find(|t| t.symbol == symbol)
}

/// Decimal count for a registered symbol; 18 for anything unknown
pub fn decimals_for(symbol: &str) -> u8 {
    get_token(symbol).map(|t| t.decimals).unwrap_or(18)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_pool_tokens() {
        for symbol in ["WETH", "USDC", "DEUS", "WFTM", "EQUAL"] {
            assert!(get_token(symbol).is_some(), "{} missing", symbol);
        }
    }

    #[test]
    fn test_price_ids_unique() {
        let ids = all_price_ids();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }

    #[test]
    fn test_usdc_is_six_decimals() {
        assert_eq!(decimals_for("USDC"), 6);
        assert_eq!(decimals_for("DEUS"), 18);
        // unknown symbols default to 18
        assert_eq!(decimals_for("NOT_A_TOKEN"), 18);
    }
}
