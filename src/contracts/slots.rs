//! EIP-1967 storage slots
//!
//! Each slot is `keccak256(label) - 1`, so it has no known preimage and cannot
//! collide with compiler-assigned storage.

use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use once_cell::sync::Lazy;

pub const IMPLEMENTATION_LABEL: &str = "eip1967.proxy.implementation";
pub const ADMIN_LABEL: &str = "eip1967.proxy.admin";
pub const BEACON_LABEL: &str = "eip1967.proxy.beacon";

pub static IMPLEMENTATION_SLOT: Lazy<H256> = Lazy::new(|| eip1967_slot(IMPLEMENTATION_LABEL));
pub static ADMIN_SLOT: Lazy<H256> = Lazy::new(|| eip1967_slot(ADMIN_LABEL));
pub static BEACON_SLOT: Lazy<H256> = Lazy::new(|| eip1967_slot(BEACON_LABEL));

/// Calculate the slot for an EIP-1967 label
///
/// Formula: bytes32(uint256(keccak256(label)) - 1)
pub fn eip1967_slot(label: &str) -> H256 {
    let hash = U256::from_big_endian(&keccak256(label.as_bytes()));
    let mut slot = [0u8; 32];
    (hash - U256::one()).to_big_endian(&mut slot);
    H256::from(slot)
}

/// Addresses are stored right-aligned in a 32-byte word
pub fn address_from_word(word: H256) -> Address {
    Address::from_slice(&word.as_bytes()[12..])
}
