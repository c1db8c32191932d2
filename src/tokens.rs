//! Token registry entries and balance rendering

use ethers::types::U256;
use ethers::utils::format_units;
use serde::Deserialize;

/// A farmable ERC-20 token on the chain
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

/// Balance of one token for one wallet
#[derive(Debug, Clone)]
pub struct TokenBalance {
    /// Raw on-chain amount
    pub wei: U256,
    pub decimals: u8,
    pub symbol: String,
}

impl TokenBalance {
    pub fn is_zero(&self) -> bool {
        self.wei.is_zero()
    }

    /// Decimal string, e.g. "12.500000" for a 6-decimal token
    pub fn formatted(&self) -> String {
        format_units(self.wei, self.decimals as u32).unwrap_or_else(|_| "0".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(wei: u64) -> TokenBalance {
        TokenBalance {
            wei: U256::from(wei),
            decimals: 6,
            symbol: "AlphaUSD".to_string(),
        }
    }

    #[test]
    fn formats_whole_and_fractional_units() {
        assert_eq!(balance(12_500_000).formatted(), "12.500000");
        assert_eq!(balance(1).formatted(), "0.000001");
    }

    #[test]
    fn zero_balance_is_zero() {
        assert!(balance(0).is_zero());
        assert!(!balance(1).is_zero());
    }
}
