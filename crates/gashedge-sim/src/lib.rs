//! Simulation harness: a block counter, a bank of external accounts, a
//! scripted token fixture, and a wallet wired to all three. Lets the
//! end-to-end scenarios drive the escrow the way a chain would, with no
//! real I/O.

mod chain;
mod executor;
mod harness;
mod token;

pub use chain::SimChain;
pub use executor::SimExecutor;
pub use harness::Harness;
pub use token::SimToken;
