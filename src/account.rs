//! Per-account flow orchestration
//!
//! An `Account` owns its submitter and walks the configured flow: faucet,
//! balance report, OnchainGM, randomized transfers. Every network-touching
//! step runs under the uniform retry policy with a `false` default.

use crate::chain::ChainProvider;
use crate::config::Settings;
use crate::dapps::onchaingm;
use crate::error::FarmerResult;
use crate::faucet;
use crate::retry::{sample_pause, with_retry, RetryPolicy};
use crate::transfer;
use crate::tx::TxSubmitter;
use crate::wallet::WalletPool;

use ethers::signers::LocalWallet;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Account {
    index: usize,
    provider: Arc<ChainProvider>,
    settings: Arc<Settings>,
    pool: Arc<WalletPool>,
    submitter: TxSubmitter,
}

impl Account {
    pub fn new(
        index: usize,
        wallet: LocalWallet,
        provider: Arc<ChainProvider>,
        settings: Arc<Settings>,
        pool: Arc<WalletPool>,
    ) -> Self {
        let submitter = TxSubmitter::new(provider.clone(), wallet);
        Self {
            index,
            provider,
            settings,
            pool,
            submitter,
        }
    }

    /// Execute the configured flow for this account. Individual action
    /// failures are absorbed; the flow moves on to the next step.
    pub async fn run(&self) {
        let policy = RetryPolicy::from_config(&self.settings.farmer);
        info!(
            "{} | Starting account {:?}",
            self.index,
            self.submitter.address()
        );

        if self.settings.faucet.enabled {
            let funded = with_retry(&policy, false, "faucet", || self.claim_faucet()).await;
            if !funded {
                warn!("{} | Faucet claim gave up", self.index);
            }
            self.pause_between_actions().await;
        }

        if let Err(e) = self.check_balances().await {
            warn!("{} | Balance check failed: {}", self.index, e);
        }

        if self.settings.flow.onchaingm_gm {
            with_retry(&policy, false, "onchaingm-gm", || {
                onchaingm::gm(self.index, &self.submitter)
            })
            .await;
            self.pause_between_actions().await;
        }

        if self.settings.flow.onchaingm_deploy {
            with_retry(&policy, false, "onchaingm-deploy", || {
                onchaingm::deploy(self.index, &self.submitter)
            })
            .await;
            self.pause_between_actions().await;
        }

        let bounds = self.settings.flow.token_transfers;
        let transfers = rand::thread_rng().gen_range(bounds[0]..=bounds[1]);
        for n in 0..transfers {
            with_retry(&policy, false, "token-transfer", || {
                transfer::send_random_token(
                    self.index,
                    &self.submitter,
                    &self.provider,
                    &self.pool,
                    &self.settings.tokens,
                    &self.settings.token_sender,
                )
            })
            .await;

            if n + 1 < transfers {
                self.pause_between_actions().await;
            }
        }

        info!("{} | Account flow complete", self.index);
    }

    async fn claim_faucet(&self) -> FarmerResult<bool> {
        faucet::claim(self.index, &self.provider, self.submitter.address()).await?;
        self.check_balances().await?;
        Ok(true)
    }

    /// Log every configured token balance for this account
    async fn check_balances(&self) -> FarmerResult<()> {
        for token in &self.settings.tokens {
            let balance = self
                .provider
                .token_balance(self.submitter.address(), token)
                .await?;
            info!("{} | {}: {}", self.index, balance.symbol, balance.formatted());
        }
        Ok(())
    }

    async fn pause_between_actions(&self) {
        tokio::time::sleep(sample_pause(self.settings.farmer.pause_between_actions)).await;
    }
}
