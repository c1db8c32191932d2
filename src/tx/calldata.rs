//! Hand-built calldata for the fixed contract calls the farmer makes
//!
//! Selectors are constants; arguments are left-padded to 32-byte words.

use ethers::types::{Address, U256};

use crate::error::{FarmerError, FarmerResult};

/// approve(address,uint256)
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
/// transfer(address,uint256)
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// balanceOf(address)
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

fn push_address(data: &mut Vec<u8>, addr: Address) {
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(addr.as_bytes());
}

fn push_uint(data: &mut Vec<u8>, value: U256) {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    data.extend_from_slice(&word);
}

pub fn approve(spender: Address, amount: U256) -> Vec<u8> {
    let mut data = APPROVE_SELECTOR.to_vec();
    push_address(&mut data, spender);
    push_uint(&mut data, amount);
    data
}

pub fn transfer(to: Address, amount: U256) -> Vec<u8> {
    let mut data = TRANSFER_SELECTOR.to_vec();
    push_address(&mut data, to);
    push_uint(&mut data, amount);
    data
}

pub fn balance_of(owner: Address) -> Vec<u8> {
    let mut data = BALANCE_OF_SELECTOR.to_vec();
    push_address(&mut data, owner);
    data
}

/// Parse a hex address from configuration or constants
pub fn parse_address(raw: &str) -> FarmerResult<Address> {
    raw.parse()
        .map_err(|e| FarmerError::Config(format!("Invalid address {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_calldata_matches_known_encoding() {
        let spender = parse_address("0x2d91014c9ab33821c4fa15806c63d2c053cdd10c").unwrap();
        let data = approve(spender, U256::from(15_000_000u64));

        assert_eq!(
            hex::encode(data),
            "095ea7b3\
             0000000000000000000000002d91014c9ab33821c4fa15806c63d2c053cdd10c\
             0000000000000000000000000000000000000000000000000000000000e4e1c0"
        );
    }

    #[test]
    fn transfer_calldata_layout() {
        let to = parse_address("0x20c0000000000000000000000000000000000001").unwrap();
        let data = transfer(to, U256::from(1u64));

        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &TRANSFER_SELECTOR);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], to.as_bytes());
        assert_eq!(data[67], 1);
    }

    #[test]
    fn balance_of_calldata_layout() {
        let owner = parse_address("0x20c0000000000000000000000000000000000002").unwrap();
        let data = balance_of(owner);

        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], &BALANCE_OF_SELECTOR);
        assert_eq!(&data[16..36], owner.as_bytes());
    }

    #[test]
    fn rejects_malformed_address() {
        assert!(parse_address("not-an-address").is_err());
    }
}
