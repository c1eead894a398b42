use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use gashedge_types::{HedgeError, Result, Wei};

/// The named pools a hedge epoch locks funds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pool {
    /// The buyer's escrowed payment (plus the registration incentive)
    Payment,
    /// The miner's posted collateral
    Collateral,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::Payment => write!(f, "payment"),
            Pool::Collateral => write!(f, "collateral"),
        }
    }
}

/// Tracks one wallet's balance and its locked pools.
///
/// Invariant on every mutation: the sum of all pools never exceeds the
/// balance, and `free()` never includes locked wei. Funds enter pools
/// only through `lock` and leave only through `unlock`, so the invariant
/// holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundLedger {
    balance: Wei,
    locked: BTreeMap<Pool, Wei>,
}

impl FundLedger {
    /// A ledger holding nothing
    pub fn new() -> Self {
        FundLedger {
            balance: Wei::ZERO,
            locked: BTreeMap::new(),
        }
    }

    /// A ledger with an initial free balance
    pub fn with_balance(initial: Wei) -> Self {
        FundLedger {
            balance: initial,
            locked: BTreeMap::new(),
        }
    }

    /// Total wei held, free and locked
    pub fn balance(&self) -> Wei {
        self.balance
    }

    /// Wei locked in one pool
    pub fn locked(&self, pool: Pool) -> Wei {
        self.locked.get(&pool).copied().unwrap_or(Wei::ZERO)
    }

    /// Wei locked across all pools
    pub fn locked_total(&self) -> Wei {
        self.locked.values().copied().sum()
    }

    /// Spendable wei: balance minus everything locked
    pub fn free(&self) -> Wei {
        self.balance.saturating_sub(self.locked_total())
    }

    /// Receive wei into the free balance
    pub fn deposit(&mut self, amount: Wei) -> Result<()> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    /// Spend free balance outward
    pub fn withdraw(&mut self, amount: Wei) -> Result<()> {
        let free = self.free();
        if amount > free {
            return Err(HedgeError::InsufficientFreeFunds {
                needed: amount,
                available: free,
            });
        }
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }

    /// Move free balance into a pool
    pub fn lock(&mut self, amount: Wei, pool: Pool) -> Result<()> {
        let free = self.free();
        if amount > free {
            return Err(HedgeError::InsufficientFreeFunds {
                needed: amount,
                available: free,
            });
        }
        let held = self.locked(pool);
        self.locked.insert(pool, held.checked_add(amount)?);
        Ok(())
    }

    /// Release pool contents back to the free balance
    pub fn unlock(&mut self, amount: Wei, pool: Pool) -> Result<()> {
        let held = self.locked(pool);
        if amount > held {
            return Err(HedgeError::LockedFundsViolation(format!(
                "unlock of {} exceeds {} wei held in {} pool",
                amount, held, pool
            )));
        }
        let remaining = held.checked_sub(amount)?;
        if remaining.is_zero() {
            self.locked.remove(&pool);
        } else {
            self.locked.insert(pool, remaining);
        }
        Ok(())
    }

    /// Drain a pool entirely, returning what it held
    pub fn unlock_all(&mut self, pool: Pool) -> Result<Wei> {
        let held = self.locked(pool);
        self.unlock(held, pool)?;
        Ok(held)
    }

    /// Snapshot for checkpoint/restore
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            locked: self.locked.clone(),
        }
    }

    /// Restore from a snapshot
    pub fn restore(&mut self, snapshot: &LedgerSnapshot) {
        self.balance = snapshot.balance;
        self.locked = snapshot.locked.clone();
    }
}

impl Default for FundLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of ledger state for checkpoint/restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub balance: Wei,
    pub locked: BTreeMap<Pool, Wei>,
}
