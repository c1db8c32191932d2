//! Tempo farmer - automated activity across a wallet pool on the Tempo testnet
//!
//! Per account: claim the faucet over the websocket RPC, report balances,
//! run the OnchainGM flows, and send randomized token transfers.

use anyhow::Result;
use ethers::signers::LocalWallet;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

mod account;
mod chain;
mod config;
mod dapps;
mod error;
mod faucet;
mod retry;
mod tokens;
mod transfer;
mod tx;
mod wallet;

use account::Account;
use chain::ChainProvider;
use config::Settings;
use wallet::WalletPool;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting Tempo farmer v{}", env!("CARGO_PKG_VERSION"));

    let settings = Arc::new(Settings::load()?);
    info!(
        "Loaded configuration for chain {} (ID: {})",
        settings.chain.name, settings.chain.chain_id
    );

    let wallets = wallet::load_wallets(&settings.wallet.private_keys_path, settings.chain.chain_id)?;
    info!("Loaded {} wallets", wallets.len());

    let provider = Arc::new(ChainProvider::new(settings.chain.clone())?);
    let pool = Arc::new(WalletPool::new(&wallets));

    tokio::select! {
        _ = run_accounts(wallets, provider, settings.clone(), pool) => {
            info!("All accounts processed");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    info!("Tempo farmer stopped");
    Ok(())
}

async fn run_accounts(
    wallets: Vec<LocalWallet>,
    provider: Arc<ChainProvider>,
    settings: Arc<Settings>,
    pool: Arc<WalletPool>,
) {
    let account_count = wallets.len();

    for (index, wallet) in wallets.into_iter().enumerate() {
        let account = Account::new(
            index,
            wallet,
            provider.clone(),
            settings.clone(),
            pool.clone(),
        );
        account.run().await;

        if index + 1 < account_count {
            let pause = retry::sample_pause(settings.farmer.pause_between_accounts);
            info!("Waiting {}s before next account", pause.as_secs());
            tokio::time::sleep(pause).await;
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tempo_farmer=debug,ethers=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
