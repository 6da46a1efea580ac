//! Configuration for farmscope
//!
//! Everything is optional: a missing key degrades the dependent fetches to
//! zeros or recorded row errors instead of refusing to start. Keys load from
//! the environment (with .env support) or from a TOML file.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::chains::Chain;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ========== API Keys ==========
    /// Price API demo key
    pub coingecko_api_key: Option<String>,

    /// Timestamp→block resolution key; without it volume/bribes/votes are
    /// skipped per-row
    pub moralis_api_key: Option<String>,

    // ========== RPC Provider Keys ==========
    /// Ankr key, templated into the per-chain endpoint lists
    pub ankr_key: Option<String>,

    /// Alchemy key (Base, BSC endpoints)
    pub alchemy_key: Option<String>,

    /// Infura project id (Base endpoint)
    pub infura_project_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
            moralis_api_key: env::var("MORALIS_API_KEY").ok(),
            ankr_key: env::var("ANKR_KEY").ok(),
            alchemy_key: env::var("ALCHEMY_KEY").ok(),
            infura_project_id: env::var("INFURA_PROJECT_ID").ok(),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject placeholder values that would silently fail downstream
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("COINGECKO_API_KEY", &self.coingecko_api_key),
            ("MORALIS_API_KEY", &self.moralis_api_key),
            ("ANKR_KEY", &self.ankr_key),
            ("ALCHEMY_KEY", &self.alchemy_key),
            ("INFURA_PROJECT_ID", &self.infura_project_id),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() || v.contains("YOUR_") {
                    return Err(eyre::eyre!(
                        "{} is set to a placeholder value - unset it or supply a real key",
                        name
                    ));
                }
            }
        }
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let mark = |v: &Option<String>| if v.is_some() { "✓ Configured" } else { "✗ Not Set" };

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              FARMSCOPE - CONFIGURATION                     ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ API KEYS                                                   ║");
        println!("║ • Price API:       {:^40} ║", mark(&self.coingecko_api_key));
        println!("║ • Block Resolver:  {:^40} ║", mark(&self.moralis_api_key));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ RPC PROVIDERS                                              ║");
        println!("║ • Ankr:            {:^40} ║", mark(&self.ankr_key));
        println!("║ • Alchemy:         {:^40} ║", mark(&self.alchemy_key));
        println!("║ • Infura:          {:^40} ║", mark(&self.infura_project_id));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ NETWORKS                                                   ║");
        for chain in Chain::all() {
            println!(
                "║ • {:<16} {:>38} endpoints ║",
                chain.to_string(),
                chain.rpc_endpoints().len()
            );
        }
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_placeholder_keys_rejected() {
        let config = Config {
            moralis_api_key: Some("YOUR_API_KEY".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            ankr_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            coingecko_api_key: Some("cg-demo".to_string()),
            ..Default::default()
        };
        let encoded = toml::to_string_pretty(&config).unwrap();
        let decoded: Config = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.coingecko_api_key.as_deref(), Some("cg-demo"));
        assert!(decoded.moralis_api_key.is_none());
    }
}
