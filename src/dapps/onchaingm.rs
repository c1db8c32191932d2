//! OnchainGM flows: approve pathUSD, then call the target contract

use crate::error::FarmerResult;
use crate::tx::{calldata, TxSubmitter};

use ethers::types::U256;
use tracing::info;

const ONCHAINGM_CONTRACT: &str = "0x2d91014c9ab33821c4fa15806c63d2c053cdd10c";
const ONCHAINGM_DEPLOY_CONTRACT: &str = "0xa89E3e260C85d19c0b940245FDdb1e845C93dED8";
const PATHUSD_CONTRACT: &str = "0x20C0000000000000000000000000000000000000";

/// 15 pathUSD (6 decimals)
const APPROVE_AMOUNT_GM: u64 = 15_000_000;
/// 20 pathUSD (6 decimals)
const APPROVE_AMOUNT_DEPLOY: u64 = 20_000_000;

/// onChainGM(uint256)
const GM_SELECTOR: [u8; 4] = [0x84, 0xa3, 0xbb, 0x6b];
/// deploy()
const DEPLOY_SELECTOR: [u8; 4] = [0x77, 0x5c, 0x30, 0x0c];

/// Approve pathUSD for the OnchainGM contract and post a GM
pub async fn gm(account_index: usize, submitter: &TxSubmitter) -> FarmerResult<bool> {
    info!("{} | Starting OnchainGM GM...", account_index);

    let gm_contract = calldata::parse_address(ONCHAINGM_CONTRACT)?;
    let path_usd = calldata::parse_address(PATHUSD_CONTRACT)?;

    info!(
        "{} | Approving pathUSD for OnchainGM contract...",
        account_index
    );
    submitter
        .submit(
            path_usd,
            calldata::approve(gm_contract, U256::from(APPROVE_AMOUNT_GM)),
            U256::zero(),
        )
        .await?;
    info!("{} | Successfully approved pathUSD", account_index);

    // onChainGM takes a single zero word
    let mut gm_data = GM_SELECTOR.to_vec();
    gm_data.extend_from_slice(&[0u8; 32]);

    info!("{} | Minting OnchainGM GM...", account_index);
    submitter.submit(gm_contract, gm_data, U256::zero()).await?;

    info!("{} | Successfully completed OnchainGM GM", account_index);
    Ok(true)
}

/// Approve pathUSD for the deployer contract and run the deploy
pub async fn deploy(account_index: usize, submitter: &TxSubmitter) -> FarmerResult<bool> {
    info!("{} | Starting OnchainGM Deploy...", account_index);

    let deploy_contract = calldata::parse_address(ONCHAINGM_DEPLOY_CONTRACT)?;
    let path_usd = calldata::parse_address(PATHUSD_CONTRACT)?;

    info!(
        "{} | Approving pathUSD for OnchainGM Deploy contract...",
        account_index
    );
    submitter
        .submit(
            path_usd,
            calldata::approve(deploy_contract, U256::from(APPROVE_AMOUNT_DEPLOY)),
            U256::zero(),
        )
        .await?;
    info!("{} | Successfully approved pathUSD", account_index);

    info!("{} | Deploying OnchainGM...", account_index);
    submitter
        .submit(deploy_contract, DEPLOY_SELECTOR.to_vec(), U256::zero())
        .await?;

    info!("{} | Successfully completed OnchainGM Deploy", account_index);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_addresses_parse() {
        assert!(calldata::parse_address(ONCHAINGM_CONTRACT).is_ok());
        assert!(calldata::parse_address(ONCHAINGM_DEPLOY_CONTRACT).is_ok());
        assert!(calldata::parse_address(PATHUSD_CONTRACT).is_ok());
    }

    #[test]
    fn gm_approve_calldata_targets_gm_contract() {
        let gm_contract = calldata::parse_address(ONCHAINGM_CONTRACT).unwrap();
        let data = calldata::approve(gm_contract, U256::from(APPROVE_AMOUNT_GM));

        assert_eq!(
            hex::encode(&data),
            "095ea7b3\
             0000000000000000000000002d91014c9ab33821c4fa15806c63d2c053cdd10c\
             0000000000000000000000000000000000000000000000000000000000e4e1c0"
        );
    }
}
