//! Wallet loading and the shared peer pool

use crate::error::{FarmerError, FarmerResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

/// One pool entry, addressable as a transfer destination
#[derive(Debug, Clone)]
pub struct WalletEntry {
    pub index: usize,
    pub address: Address,
}

/// Load private keys (one hex key per line, '#' comments allowed) into
/// wallets bound to the chain id
pub fn load_wallets(path: &str, chain_id: u64) -> FarmerResult<Vec<LocalWallet>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| FarmerError::Wallet(format!("Failed to read {}: {}", path, e)))?;

    let mut wallets = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let wallet = line
            .parse::<LocalWallet>()
            .map_err(|e| {
                FarmerError::Wallet(format!("Invalid private key on line {}: {}", line_no + 1, e))
            })?
            .with_chain_id(chain_id);
        wallets.push(wallet);
    }

    if wallets.is_empty() {
        return Err(FarmerError::Wallet(format!("No private keys in {}", path)));
    }

    Ok(wallets)
}

/// Shared wallet list behind a single lock; readers take the lock only for
/// the duration of the read
pub struct WalletPool {
    entries: Mutex<Vec<WalletEntry>>,
}

impl WalletPool {
    pub fn new(wallets: &[LocalWallet]) -> Self {
        let entries = wallets
            .iter()
            .enumerate()
            .map(|(index, wallet)| WalletEntry {
                index,
                address: wallet.address(),
            })
            .collect();

        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Pick a random peer wallet, excluding the sender's own address.
    /// Returns None when the pool holds no other wallet.
    pub async fn random_peer(&self, own: Address) -> Option<WalletEntry> {
        let entries = self.entries.lock().await;
        let available: Vec<&WalletEntry> =
            entries.iter().filter(|entry| entry.address != own).collect();
        available
            .choose(&mut rand::thread_rng())
            .map(|entry| (*entry).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KEY_A: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const KEY_B: &str = "6c3699283bda56ad74f6b855546325b68d482e983852a7a82979cc4807b3c2a8";

    fn key_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_keys_skipping_comments_and_blanks() {
        let file = key_file(&format!("# funding wallets\n{}\n\n{}\n", KEY_A, KEY_B));
        let wallets = load_wallets(file.path().to_str().unwrap(), 42429).unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].chain_id(), 42429);
    }

    #[test]
    fn rejects_empty_key_file() {
        let file = key_file("# nothing here\n");
        assert!(load_wallets(file.path().to_str().unwrap(), 42429).is_err());
    }

    #[test]
    fn rejects_malformed_key() {
        let file = key_file("zz-not-hex\n");
        assert!(load_wallets(file.path().to_str().unwrap(), 42429).is_err());
    }

    #[tokio::test]
    async fn random_peer_never_returns_self() {
        let file = key_file(&format!("{}\n{}\n", KEY_A, KEY_B));
        let wallets = load_wallets(file.path().to_str().unwrap(), 42429).unwrap();
        let pool = WalletPool::new(&wallets);
        let own = wallets[0].address();

        for _ in 0..50 {
            let peer = pool.random_peer(own).await.unwrap();
            assert_ne!(peer.address, own);
            assert_eq!(peer.index, 1);
        }
    }

    #[tokio::test]
    async fn random_peer_empty_when_alone() {
        let file = key_file(&format!("{}\n", KEY_A));
        let wallets = load_wallets(file.path().to_str().unwrap(), 42429).unwrap();
        let pool = WalletPool::new(&wallets);

        assert!(pool.random_peer(wallets[0].address()).await.is_none());
    }
}
