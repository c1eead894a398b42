use std::collections::BTreeMap;

use gashedge_types::Address;

/// Minimal fungible-token fixture.
///
/// Understands exactly one call shape, the standard 68-byte
/// `transfer(address,uint256)` payload, and keeps per-holder balances.
/// Enough to exercise opaque call data end to end without real token
/// semantics.
#[derive(Debug, Clone)]
pub struct SimToken {
    pub address: Address,
    balances: BTreeMap<Address, u128>,
}

impl SimToken {
    pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

    pub fn new(address: Address) -> Self {
        SimToken {
            address,
            balances: BTreeMap::new(),
        }
    }

    pub fn mint(&mut self, holder: Address, amount: u128) {
        let balance = self.balance_of(&holder);
        self.balances.insert(holder, balance.saturating_add(amount));
    }

    pub fn balance_of(&self, holder: &Address) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Build the transfer call data a wallet request would carry.
    pub fn encode_transfer(to: &Address, amount: u128) -> Vec<u8> {
        let mut data = Vec::with_capacity(68);
        data.extend_from_slice(&Self::TRANSFER_SELECTOR);
        data.extend_from_slice(&[0u8; 12]);
        data.extend_from_slice(to.as_bytes());
        data.extend_from_slice(&[0u8; 16]);
        data.extend_from_slice(&amount.to_be_bytes());
        data
    }

    /// Decode and apply a transfer from `caller`. Returns false on
    /// malformed data or insufficient balance, moving nothing.
    pub(crate) fn apply(&mut self, caller: Address, data: &[u8]) -> bool {
        if data.len() != 68 || data[..4] != Self::TRANSFER_SELECTOR {
            return false;
        }
        if data[4..16].iter().any(|b| *b != 0) {
            return false;
        }
        let mut to_bytes = [0u8; 20];
        to_bytes.copy_from_slice(&data[16..36]);
        let to = Address::from_bytes(to_bytes);

        // Amounts beyond u128 range are rejected outright
        if data[36..52].iter().any(|b| *b != 0) {
            return false;
        }
        let mut amount_bytes = [0u8; 16];
        amount_bytes.copy_from_slice(&data[52..68]);
        let amount = u128::from_be_bytes(amount_bytes);

        let from_balance = self.balance_of(&caller);
        if amount > from_balance {
            return false;
        }
        self.balances.insert(caller, from_balance - amount);
        match self.balance_of(&to).checked_add(amount) {
            Some(credited) => {
                self.balances.insert(to, credited);
                true
            }
            None => {
                self.balances.insert(caller, from_balance);
                false
            }
        }
    }
}
