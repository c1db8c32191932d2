//! Error types for the Tempo farmer
//!
//! Every failure surfaces as a `FarmerError` and is handled uniformly by the
//! retry layer; there is no retryable/terminal split.

use thiserror::Error;

/// Main error type for the farmer
#[derive(Error, Debug)]
pub enum FarmerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Gas estimation error: {0}")]
    GasEstimation(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },
}

/// Result type for farmer operations
pub type FarmerResult<T> = Result<T, FarmerError>;
