mod address;
mod block;
mod error;
mod request;
mod wei;

pub use address::Address;
pub use block::{BlockNumber, BlockWindow, Nonce, WindowPhase};
pub use error::{HedgeError, Result};
pub use request::TransactionRequest;
pub use wei::Wei;

#[cfg(test)]
mod tests;
