//! Randomized ERC-20 transfers
//!
//! Picks a random configured token, sends a random percentage of the balance
//! (floored to whole token units) to either a peer wallet from the pool or a
//! freshly randomized address.

use crate::chain::ChainProvider;
use crate::config::TokenSenderConfig;
use crate::error::{FarmerError, FarmerResult};
use crate::tokens::TokenConfig;
use crate::tx::{calldata, TxSubmitter};
use crate::wallet::WalletPool;

use ethers::types::{Address, U256};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

/// Floor an amount down to a whole multiple of the token unit (10^decimals)
pub fn floor_to_whole_units(amount: U256, decimals: u8) -> U256 {
    let unit = U256::exp10(decimals as usize);
    amount / unit * unit
}

/// Draw a send percentage in basis points from a whole-percent [min, max]
/// range, both ends inclusive
pub fn sample_send_bps(percent_bounds: [u64; 2]) -> u64 {
    rand::thread_rng().gen_range(percent_bounds[0] * 100..=percent_bounds[1] * 100)
}

/// Portion of a balance to send: the percentage applied in exact integer
/// math, then floored to whole token units
pub fn send_amount(balance: U256, bps: u64, decimals: u8) -> U256 {
    let raw = balance * U256::from(bps) / U256::from(10_000u64);
    floor_to_whole_units(raw, decimals)
}

/// Send a random portion of a random token. Returns Ok(false) when there is
/// nothing sendable; no transaction is broadcast in that case.
pub async fn send_random_token(
    account_index: usize,
    submitter: &TxSubmitter,
    provider: &ChainProvider,
    pool: &WalletPool,
    tokens: &[TokenConfig],
    sender_config: &TokenSenderConfig,
) -> FarmerResult<bool> {
    let token = tokens
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| FarmerError::Config("No tokens configured".to_string()))?;

    let balance = provider.token_balance(submitter.address(), token).await?;
    if balance.is_zero() {
        warn!("{} | No {} balance to send", account_index, token.symbol);
        return Ok(false);
    }

    let bps = sample_send_bps(sender_config.percent_of_balance_to_send);
    let amount = send_amount(balance.wei, bps, token.decimals);
    if amount.is_zero() {
        warn!("{} | Amount to send is too small", account_index);
        return Ok(false);
    }

    let to_address = if sender_config.send_to_my_wallets {
        match pool.random_peer(submitter.address()).await {
            Some(peer) => {
                info!("{} | Sending to own wallet #{}", account_index, peer.index);
                peer.address
            }
            None => {
                warn!("{} | No other wallets available to send to", account_index);
                return Ok(false);
            }
        }
    } else {
        let to = Address::random();
        info!("{} | Sending to random address: {:?}", account_index, to);
        to
    };

    let whole_tokens = amount / U256::exp10(token.decimals as usize);
    info!(
        "{} | Sending {} {} to {:?}",
        account_index, whole_tokens, token.symbol, to_address
    );

    let token_address = calldata::parse_address(&token.address)?;
    submitter
        .submit(
            token_address,
            calldata::transfer(to_address, amount),
            U256::zero(),
        )
        .await?;

    info!("{} | Token sent!", account_index);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_to_whole_token_units() {
        // 2.5 tokens of a 6-decimal token floors to 2 whole tokens
        assert_eq!(
            floor_to_whole_units(U256::from(2_500_000u64), 6),
            U256::from(2_000_000u64)
        );
        assert_eq!(
            floor_to_whole_units(U256::from(999_999u64), 6),
            U256::zero()
        );
    }

    #[test]
    fn floored_amount_is_always_whole_multiple() {
        let unit = U256::exp10(6);
        for raw in [0u64, 1, 999_999, 1_000_000, 1_234_567, 98_765_432] {
            let floored = floor_to_whole_units(U256::from(raw), 6);
            assert_eq!(floored % unit, U256::zero());
            assert!(floored <= U256::from(raw));
        }
    }

    #[test]
    fn one_token_at_ten_percent_floors_to_zero() {
        // balance = 1,000,000 raw (one 6-decimal token), fixed 10% draw:
        // raw amount 100,000, which floors below one whole unit
        let amount = send_amount(U256::from(1_000_000u64), 1_000, 6);
        assert_eq!(amount, U256::zero());
    }

    #[test]
    fn larger_balance_survives_flooring() {
        // 25 tokens at 10% -> 2.5 tokens -> floored to 2 whole tokens
        let amount = send_amount(U256::from(25_000_000u64), 1_000, 6);
        assert_eq!(amount, U256::from(2_000_000u64));
    }

    #[test]
    fn sampled_bps_stays_within_percent_bounds() {
        for _ in 0..1000 {
            let bps = sample_send_bps([10, 25]);
            assert!(bps >= 1_000);
            assert!(bps <= 2_500);
        }
    }

    #[test]
    fn degenerate_percent_range_is_fixed() {
        assert_eq!(sample_send_bps([10, 10]), 1_000);
    }
}
