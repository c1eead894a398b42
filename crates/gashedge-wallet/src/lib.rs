//! The hedge wallet: a buyer escrows payment for a future on-chain
//! action, a miner posts collateral to commit to performing it within a
//! block window, and the escrow resolves exactly once as executed,
//! exhausted, or refunded.

mod config;
mod env;
mod epoch;
mod lifecycle;
mod wallet;

pub use config::{ExecutePolicy, WalletConfig};
pub use env::CallEnv;
pub use epoch::{Epoch, EpochStatus, HedgeTerms, Resolution};
pub use lifecycle::clear_for_init;
pub use wallet::HedgeWallet;
