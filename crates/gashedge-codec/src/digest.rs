use sha3::{Digest, Keccak256};

use gashedge_types::TransactionRequest;

use crate::abi::encode_request;

/// 32-byte Keccak-256 digest
pub type Digest32 = [u8; 32];

/// Compute Keccak-256 over raw bytes
pub fn keccak256(data: &[u8]) -> Digest32 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Digest a request: Keccak-256 over its ABI encoding.
///
/// This is the value the wallet owner signs (after the personal-message
/// prefix is applied by the signing layer).
pub fn request_digest(request: &TransactionRequest) -> Digest32 {
    keccak256(&encode_request(request))
}
