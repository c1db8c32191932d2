//! Chain provider with multi-RPC support and automatic failover

use crate::config::{ChainConfig, GasPriceStrategy};
use crate::error::{FarmerError, FarmerResult};
use crate::tokens::{TokenBalance, TokenConfig};
use crate::tx::calldata;

use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Receipt poll interval
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Gas fee fields for a submission, shaped by the chain's strategy
#[derive(Debug, Clone)]
pub enum GasFees {
    Legacy(U256),
    Eip1559 {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
}

/// Single-chain provider wrapper with automatic failover between RPC urls
pub struct ChainProvider {
    /// Chain configuration
    config: ChainConfig,
    /// HTTP providers (multiple for failover)
    http_providers: Vec<Provider<Http>>,
    /// Current active provider index
    current_provider: AtomicUsize,
}

impl ChainProvider {
    /// Create a new chain provider
    pub fn new(config: ChainConfig) -> FarmerResult<Self> {
        let mut http_providers = Vec::new();

        for url in &config.rpc_urls {
            match Provider::<Http>::try_from(url.as_str()) {
                Ok(provider) => {
                    let provider = provider.interval(Duration::from_millis(100));
                    http_providers.push(provider);
                    debug!("Added HTTP provider for chain {}: {}", config.chain_id, url);
                }
                Err(e) => {
                    warn!("Failed to create provider for {}: {}", url, e);
                }
            }
        }

        if http_providers.is_empty() {
            return Err(FarmerError::Rpc("No valid RPC providers".to_string()));
        }

        Ok(Self {
            config,
            http_providers,
            current_provider: AtomicUsize::new(0),
        })
    }

    /// Get the active HTTP provider
    pub fn http(&self) -> &Provider<Http> {
        let idx = self.current_provider.load(Ordering::Relaxed);
        &self.http_providers[idx % self.http_providers.len()]
    }

    /// Switch to next available provider
    pub fn failover(&self) {
        let current = self.current_provider.load(Ordering::Relaxed);
        let next = (current + 1) % self.http_providers.len();
        self.current_provider.store(next, Ordering::Relaxed);
        warn!("Chain {} failover to provider {}", self.config.chain_id, next);
    }

    /// Get current gas fees based on chain strategy, trying every provider
    pub async fn gas_fees(&self) -> FarmerResult<GasFees> {
        let mut last_error = None;

        for _ in 0..self.http_providers.len() {
            match self.fetch_gas_fees().await {
                Ok(fees) => {
                    debug!("Gas fees for chain {}: {:?}", self.config.chain_id, fees);
                    return Ok(fees);
                }
                Err(e) => {
                    warn!(
                        "Failed to get gas fees from chain {}: {}",
                        self.config.chain_id, e
                    );
                    last_error = Some(e);
                    self.failover();
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FarmerError::GasEstimation("All providers failed".to_string())))
    }

    async fn fetch_gas_fees(&self) -> FarmerResult<GasFees> {
        match self.config.gas_price_strategy {
            GasPriceStrategy::Legacy => {
                let price = self
                    .http()
                    .get_gas_price()
                    .await
                    .map_err(|e| FarmerError::GasEstimation(e.to_string()))?;
                Ok(GasFees::Legacy(price))
            }
            GasPriceStrategy::Eip1559 => {
                let (max_fee, priority_fee) = self.estimate_eip1559_fees().await?;
                Ok(GasFees::Eip1559 {
                    max_fee_per_gas: max_fee,
                    max_priority_fee_per_gas: priority_fee,
                })
            }
        }
    }

    /// Estimate EIP-1559 fees from the latest block
    async fn estimate_eip1559_fees(&self) -> FarmerResult<(U256, U256)> {
        let block = self
            .http()
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| FarmerError::GasEstimation(e.to_string()))?
            .ok_or_else(|| FarmerError::GasEstimation("No latest block".to_string()))?;

        let base_fee = block
            .base_fee_per_gas
            .ok_or_else(|| FarmerError::GasEstimation("No base fee in block".to_string()))?;

        let priority_fee = U256::from(2_000_000_000u64); // 2 gwei default

        // Max fee = 2 * base_fee + priority_fee (buffer for block variability)
        let max_fee = base_fee * 2 + priority_fee;

        // Cap at configured max
        let max_gwei = U256::from(self.config.max_gas_price_gwei) * U256::from(1_000_000_000u64);
        let max_fee = std::cmp::min(max_fee, max_gwei);

        Ok((max_fee, priority_fee))
    }

    /// Estimate gas for a transaction
    pub async fn estimate_gas(&self, tx: &TypedTransaction) -> FarmerResult<U256> {
        self.http()
            .estimate_gas(tx, None)
            .await
            .map_err(|e| FarmerError::GasEstimation(e.to_string()))
    }

    /// Current transaction count for an address (the next nonce)
    pub async fn next_nonce(&self, address: Address) -> FarmerResult<U256> {
        self.http()
            .get_transaction_count(address, None)
            .await
            .map_err(|e| FarmerError::Rpc(e.to_string()))
    }

    /// Broadcast a signed transaction and block until its receipt is observed
    pub async fn broadcast_and_wait(&self, raw: Bytes) -> FarmerResult<TransactionReceipt> {
        let pending = self
            .http()
            .send_raw_transaction(raw)
            .await
            .map_err(|e| FarmerError::Transaction(e.to_string()))?;

        pending
            .interval(RECEIPT_POLL_INTERVAL)
            .await
            .map_err(|e| FarmerError::Transaction(e.to_string()))?
            .ok_or_else(|| FarmerError::Timeout {
                operation: "transaction receipt".to_string(),
            })
    }

    /// Read an ERC-20 balance via a balanceOf eth_call
    pub async fn token_balance(
        &self,
        owner: Address,
        token: &TokenConfig,
    ) -> FarmerResult<TokenBalance> {
        let token_address = calldata::parse_address(&token.address)?;

        let call: TypedTransaction = TransactionRequest::new()
            .to(token_address)
            .data(calldata::balance_of(owner))
            .into();

        let raw = self
            .http()
            .call(&call, None)
            .await
            .map_err(|e| FarmerError::Rpc(e.to_string()))?;

        let wei = if raw.len() >= 32 {
            U256::from_big_endian(&raw[..32])
        } else {
            U256::zero()
        };

        Ok(TokenBalance {
            wei,
            decimals: token.decimals,
            symbol: token.symbol.clone(),
        })
    }

    /// Get chain ID
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Websocket endpoint for the faucet RPC
    pub fn ws_url(&self) -> &str {
        &self.config.ws_url
    }

    /// Human-readable explorer link for a transaction hash
    pub fn explorer_tx_link(&self, tx_hash: H256) -> String {
        format!("{}{:x}", self.config.explorer_tx_url, tx_hash)
    }
}
