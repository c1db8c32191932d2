//! Transaction submission workflow
//!
//! One submission is: fetch gas fees, fetch the current nonce, build the
//! typed transaction, estimate gas for exactly what will be sent, sign,
//! broadcast, and block until the receipt is observed. A receipt with a
//! non-1 status is a hard failure.

use super::gas::GasEstimator;
use crate::chain::{ChainProvider, GasFees};
use crate::error::{FarmerError, FarmerResult};

use ethers::prelude::*;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use std::sync::Arc;
use tracing::{debug, info};

/// Signs and submits prepared calls for a single wallet
pub struct TxSubmitter {
    provider: Arc<ChainProvider>,
    gas_estimator: GasEstimator,
    wallet: LocalWallet,
}

impl TxSubmitter {
    pub fn new(provider: Arc<ChainProvider>, wallet: LocalWallet) -> Self {
        let wallet = wallet.with_chain_id(provider.chain_id());
        Self {
            provider,
            gas_estimator: GasEstimator::new(),
            wallet,
        }
    }

    /// Sender address
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Run the full submission workflow for one call
    pub async fn submit(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
    ) -> FarmerResult<TransactionReceipt> {
        let fees = self.gas_estimator.buffer_fees(self.provider.gas_fees().await?);
        let nonce = self.provider.next_nonce(self.wallet.address()).await?;

        let mut tx = self.build_tx(to, data, value, nonce, &fees);

        let estimated = self.provider.estimate_gas(&tx).await?;
        tx.set_gas(self.gas_estimator.buffer_gas_limit(estimated));
        debug!("Submitting call to {:?} with nonce {}", to, nonce);

        let signature = self
            .wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| FarmerError::Wallet(e.to_string()))?;
        let raw = tx.rlp_signed(&signature);

        let receipt = self.provider.broadcast_and_wait(raw).await?;
        check_receipt_status(&receipt)?;

        info!(
            "Transaction confirmed: {}",
            self.provider.explorer_tx_link(receipt.transaction_hash)
        );
        Ok(receipt)
    }

    fn build_tx(
        &self,
        to: Address,
        data: Vec<u8>,
        value: U256,
        nonce: U256,
        fees: &GasFees,
    ) -> TypedTransaction {
        let from = self.wallet.address();
        let chain_id = self.provider.chain_id();

        match fees {
            GasFees::Legacy(price) => TransactionRequest::new()
                .from(from)
                .to(to)
                .value(value)
                .data(data)
                .nonce(nonce)
                .chain_id(chain_id)
                .gas_price(*price)
                .into(),
            GasFees::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => Eip1559TransactionRequest::new()
                .from(from)
                .to(to)
                .value(value)
                .data(data)
                .nonce(nonce)
                .chain_id(chain_id)
                .max_fee_per_gas(*max_fee_per_gas)
                .max_priority_fee_per_gas(*max_priority_fee_per_gas)
                .into(),
        }
    }
}

/// A receipt with status != 1 is a hard failure, raised like any other error
pub fn check_receipt_status(receipt: &TransactionReceipt) -> FarmerResult<()> {
    if receipt.status != Some(U64::from(1)) {
        return Err(FarmerError::Reverted {
            tx_hash: format!("{:?}", receipt.transaction_hash),
        });
    }
    Ok(())
}
