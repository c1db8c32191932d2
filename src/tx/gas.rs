//! Gas buffering for submitted transactions

use crate::chain::GasFees;

use ethers::types::U256;

/// Applies safety buffers on top of the chain's reported fees and estimates
pub struct GasEstimator {
    /// Buffer percentage for gas limit (e.g. 20 = 20% buffer)
    gas_limit_buffer_percent: u64,
    /// Buffer percentage for gas price
    gas_price_buffer_percent: u64,
}

impl GasEstimator {
    pub fn new() -> Self {
        Self {
            gas_limit_buffer_percent: 20,
            gas_price_buffer_percent: 10,
        }
    }

    /// Add the configured buffer to an estimated gas limit
    pub fn buffer_gas_limit(&self, estimated: U256) -> U256 {
        estimated + estimated * self.gas_limit_buffer_percent / 100
    }

    /// Add the configured buffer to reported gas fees
    pub fn buffer_fees(&self, fees: GasFees) -> GasFees {
        match fees {
            GasFees::Legacy(price) => {
                let buffer = price * self.gas_price_buffer_percent / 100;
                GasFees::Legacy(price + buffer)
            }
            GasFees::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let fee_buffer = max_fee_per_gas * self.gas_price_buffer_percent / 100;
                let priority_buffer =
                    max_priority_fee_per_gas * self.gas_price_buffer_percent / 100;
                GasFees::Eip1559 {
                    max_fee_per_gas: max_fee_per_gas + fee_buffer,
                    max_priority_fee_per_gas: max_priority_fee_per_gas + priority_buffer,
                }
            }
        }
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_gas_limit() {
        let estimator = GasEstimator::new();
        assert_eq!(
            estimator.buffer_gas_limit(U256::from(100_000u64)),
            U256::from(120_000u64)
        );
    }

    #[test]
    fn buffers_eip1559_fees() {
        let estimator = GasEstimator::new();
        let buffered = estimator.buffer_fees(GasFees::Eip1559 {
            max_fee_per_gas: U256::from(100u64),
            max_priority_fee_per_gas: U256::from(10u64),
        });

        match buffered {
            GasFees::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                assert_eq!(max_fee_per_gas, U256::from(110u64));
                assert_eq!(max_priority_fee_per_gas, U256::from(11u64));
            }
            GasFees::Legacy(_) => panic!("fee shape changed"),
        }
    }
}
