//! Deterministic wire encoding and hashing for transaction requests.
//!
//! Requests are serialized with the standard ABI layout for
//! `(uint256, address, uint256, bytes)` so that digests computed here
//! match those produced by mainstream Ethereum tooling.

mod abi;
mod digest;

pub use abi::encode_request;
pub use digest::{keccak256, request_digest, Digest32};
