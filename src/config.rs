//! Configuration management for the Tempo farmer
//!
//! Loads configuration from TOML files with environment variable substitution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::tokens::TokenConfig;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub farmer: FarmerConfig,
    pub chain: ChainConfig,
    pub wallet: WalletConfig,
    pub faucet: FaucetConfig,
    pub flow: FlowConfig,
    pub token_sender: TokenSenderConfig,
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmerConfig {
    /// Maximum attempts per action before giving up on it
    pub attempts: u32,
    /// Pause drawn uniformly from [min, max] seconds between attempts
    pub pause_between_attempts: [u64; 2],
    /// Pause drawn uniformly from [min, max] seconds between flow actions
    pub pause_between_actions: [u64; 2],
    /// Pause drawn uniformly from [min, max] seconds between accounts
    pub pause_between_accounts: [u64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_urls: Vec<String>,
    /// Websocket endpoint, used for the faucet RPC
    pub ws_url: String,
    /// Prefix for human-readable transaction links, e.g. "https://explore.tempo.xyz/tx/0x"
    pub explorer_tx_url: String,
    pub gas_price_strategy: GasPriceStrategy,
    pub max_gas_price_gwei: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum GasPriceStrategy {
    Legacy,
    Eip1559,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// File with one hex private key per line; '#' lines are comments
    pub private_keys_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaucetConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    pub onchaingm_gm: bool,
    pub onchaingm_deploy: bool,
    /// Number of random transfers per account, drawn uniformly from [min, max]
    pub token_transfers: [u64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSenderConfig {
    /// Whole percents, [min, max] inclusive
    pub percent_of_balance_to_send: [u64; 2],
    /// Send to a peer wallet from the pool instead of a random address
    pub send_to_my_wallets: bool,
}

impl Settings {
    /// Load settings from configuration files
    pub fn load() -> Result<Self> {
        let config_path = env::var("TEMPO_FARMER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        // Substitute environment variables
        let config_str = substitute_env_vars(&config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.chain.rpc_urls.is_empty() {
            anyhow::bail!("Chain {} has no RPC URLs configured", self.chain.name);
        }

        if self.tokens.is_empty() {
            anyhow::bail!("No tokens configured");
        }

        if self.farmer.attempts == 0 {
            anyhow::bail!("farmer.attempts must be at least 1");
        }

        for (name, bounds) in [
            ("farmer.pause_between_attempts", self.farmer.pause_between_attempts),
            ("farmer.pause_between_actions", self.farmer.pause_between_actions),
            ("farmer.pause_between_accounts", self.farmer.pause_between_accounts),
            ("flow.token_transfers", self.flow.token_transfers),
        ] {
            if bounds[0] > bounds[1] {
                anyhow::bail!("{} has min > max", name);
            }
        }

        let percent = self.token_sender.percent_of_balance_to_send;
        if percent[0] > percent[1] {
            anyhow::bail!("token_sender.percent_of_balance_to_send has min > max");
        }
        if percent[0] < 1 || percent[1] > 100 {
            anyhow::bail!("token_sender.percent_of_balance_to_send must be within 1..=100");
        }

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settings(percent: [u64; 2], attempts: u32) -> Settings {
        Settings {
            farmer: FarmerConfig {
                attempts,
                pause_between_attempts: [3, 10],
                pause_between_actions: [2, 8],
                pause_between_accounts: [5, 15],
            },
            chain: ChainConfig {
                chain_id: 42429,
                name: "tempo".to_string(),
                rpc_urls: vec!["https://rpc.testnet.tempo.xyz".to_string()],
                ws_url: "wss://rpc.testnet.tempo.xyz/".to_string(),
                explorer_tx_url: "https://explore.tempo.xyz/tx/0x".to_string(),
                gas_price_strategy: GasPriceStrategy::Eip1559,
                max_gas_price_gwei: 100,
            },
            wallet: WalletConfig {
                private_keys_path: "data/private_keys.txt".to_string(),
            },
            faucet: FaucetConfig { enabled: true },
            flow: FlowConfig {
                onchaingm_gm: true,
                onchaingm_deploy: false,
                token_transfers: [1, 3],
            },
            token_sender: TokenSenderConfig {
                percent_of_balance_to_send: percent,
                send_to_my_wallets: true,
            },
            tokens: vec![TokenConfig {
                symbol: "AlphaUSD".to_string(),
                address: "0x20c0000000000000000000000000000000000001".to_string(),
                decimals: 6,
            }],
        }
    }

    #[test]
    fn test_env_var_substitution() {
        env::set_var("TEST_VAR", "test_value");
        let input = "url = \"https://api.example.com/${TEST_VAR}/endpoint\"";
        let result = substitute_env_vars(input);
        assert_eq!(result, "url = \"https://api.example.com/test_value/endpoint\"");
    }

    #[test]
    fn test_validate_accepts_sane_settings() {
        assert!(sample_settings([10, 25], 5).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_percent_range() {
        assert!(sample_settings([25, 10], 5).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_percent() {
        assert!(sample_settings([0, 10], 5).validate().is_err());
        assert!(sample_settings([10, 101], 5).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        assert!(sample_settings([10, 25], 0).validate().is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [farmer]
            attempts = 5
            pause_between_attempts = [3, 10]
            pause_between_actions = [2, 8]
            pause_between_accounts = [5, 15]

            [chain]
            chain_id = 42429
            name = "tempo"
            rpc_urls = ["https://rpc.testnet.tempo.xyz"]
            ws_url = "wss://rpc.testnet.tempo.xyz/"
            explorer_tx_url = "https://explore.tempo.xyz/tx/0x"
            gas_price_strategy = "eip1559"
            max_gas_price_gwei = 100

            [wallet]
            private_keys_path = "data/private_keys.txt"

            [faucet]
            enabled = true

            [flow]
            onchaingm_gm = true
            onchaingm_deploy = true
            token_transfers = [1, 3]

            [token_sender]
            percent_of_balance_to_send = [10, 25]
            send_to_my_wallets = true

            [[tokens]]
            symbol = "AlphaUSD"
            address = "0x20c0000000000000000000000000000000000001"
            decimals = 6
        "#;

        let settings: Settings = toml::from_str(raw).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.chain.chain_id, 42429);
        assert_eq!(settings.chain.gas_price_strategy, GasPriceStrategy::Eip1559);
        assert_eq!(settings.tokens[0].decimals, 6);
    }
}
