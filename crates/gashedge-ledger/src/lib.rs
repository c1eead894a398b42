//! Fund ledger: one wallet balance split into a free portion and named
//! locked pools. Spends draw only from free funds; resolution moves
//! pool contents back to free before anything leaves the wallet.

mod ledger;

pub use ledger::{FundLedger, LedgerSnapshot, Pool};

#[cfg(test)]
mod tests;
