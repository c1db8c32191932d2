//! Faucet claim over the websocket RPC
//!
//! One round trip: open the connection, send a single `tempo_fundAddress`
//! request for the account address, read the response. The result is the
//! list of funding transaction hashes.

use crate::chain::ChainProvider;
use crate::error::{FarmerError, FarmerResult};

use ethers::providers::{Provider, Ws};
use ethers::types::{Address, TxHash};
use std::time::Duration;
use tracing::info;

/// Pause before balances are re-read, so the funding transactions can land
const SETTLE_PAUSE: Duration = Duration::from_secs(3);

/// Claim the faucet for one address. The websocket connection is dropped on
/// every exit path.
pub async fn claim(
    account_index: usize,
    provider: &ChainProvider,
    address: Address,
) -> FarmerResult<Vec<TxHash>> {
    let ws = Provider::<Ws>::connect(provider.ws_url())
        .await
        .map_err(|e| FarmerError::Faucet(format!("Websocket connect failed: {}", e)))?;

    let result: serde_json::Value = ws
        .request("tempo_fundAddress", [address])
        .await
        .map_err(|e| FarmerError::Faucet(format!("tempo_fundAddress failed: {}", e)))?;

    let tx_hashes: Vec<TxHash> = serde_json::from_value(result)
        .map_err(|e| FarmerError::Faucet(format!("Unexpected faucet response: {}", e)))?;

    for tx_hash in &tx_hashes {
        info!(
            "{} | Faucet TX: {}",
            account_index,
            provider.explorer_tx_link(*tx_hash)
        );
    }

    tokio::time::sleep(SETTLE_PAUSE).await;

    Ok(tx_hashes)
}
