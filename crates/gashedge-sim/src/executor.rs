use std::collections::BTreeMap;

use gashedge_exec::{ActionExecutor, CallOutcome, ExternalCall};
use gashedge_types::{Address, Wei};

use crate::token::SimToken;

/// Executor backed by in-memory accounts and token fixtures.
///
/// Plain calls credit their value to the target account. Calls that
/// target a registered token with non-empty data are decoded as token
/// transfers originating from the wallet address.
pub struct SimExecutor {
    wallet: Address,
    accounts: BTreeMap<Address, Wei>,
    tokens: BTreeMap<Address, SimToken>,
}

impl SimExecutor {
    /// `wallet` is the address outbound calls are attributed to; token
    /// transfers debit its holdings.
    pub fn new(wallet: Address) -> Self {
        SimExecutor {
            wallet,
            accounts: BTreeMap::new(),
            tokens: BTreeMap::new(),
        }
    }

    pub fn add_token(&mut self, token: SimToken) {
        self.tokens.insert(token.address, token);
    }

    pub fn token(&self, address: &Address) -> Option<&SimToken> {
        self.tokens.get(address)
    }

    pub fn token_mut(&mut self, address: &Address) -> Option<&mut SimToken> {
        self.tokens.get_mut(address)
    }

    /// Native value received by `address` across all performed calls.
    pub fn balance_of(&self, address: &Address) -> Wei {
        self.accounts.get(address).copied().unwrap_or(Wei::ZERO)
    }

    fn credit(&mut self, to: Address, value: Wei) -> bool {
        let held = self.balance_of(&to);
        match held.checked_add(value) {
            Ok(total) => {
                self.accounts.insert(to, total);
                true
            }
            Err(_) => false,
        }
    }
}

impl ActionExecutor for SimExecutor {
    fn perform(&mut self, call: &ExternalCall) -> CallOutcome {
        if !call.data.is_empty() {
            if let Some(token) = self.tokens.get_mut(&call.to) {
                if !token.apply(self.wallet, &call.data) {
                    return CallOutcome::failure();
                }
                if !self.credit(call.to, call.value) {
                    return CallOutcome::failure();
                }
                let mut word = vec![0u8; 32];
                word[31] = 1;
                return CallOutcome::success(word);
            }
        }
        if self.credit(call.to, call.value) {
            CallOutcome::success(Vec::new())
        } else {
            CallOutcome::failure()
        }
    }
}
