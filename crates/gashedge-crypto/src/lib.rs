//! Signature production and verification for transaction requests.
//!
//! Signatures follow the personal-message convention: the signer hashes
//! `"\x19Ethereum Signed Message:\n32" || digest` and signs that with
//! recoverable ECDSA, so standard wallet tooling can produce requests
//! the hedge wallet will accept.

mod recover;
mod signature;
mod signer;

pub use recover::{personal_digest, recover_signer};
pub use signature::Signature;
pub use signer::Signer;
