use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::block::Nonce;
use crate::wei::Wei;

/// A transaction the wallet owner asks to have performed on their behalf.
///
/// The owner signs the digest of the encoded request; whoever relays it
/// to the wallet cannot alter any field without invalidating the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Must equal the wallet's current nonce for the request to be accepted
    pub nonce: Nonce,
    /// Call target
    pub to: Address,
    /// Value forwarded with the call
    pub value: Wei,
    /// Payload passed to the target, empty for a bare transfer
    #[serde(with = "hex_bytes")]
    pub call_data: Vec<u8>,
}

impl TransactionRequest {
    /// A bare value transfer with no payload
    pub fn transfer(nonce: Nonce, to: Address, value: Wei) -> Self {
        TransactionRequest {
            nonce,
            to,
            value,
            call_data: Vec::new(),
        }
    }

    /// A call carrying a payload
    pub fn call(nonce: Nonce, to: Address, value: Wei, call_data: Vec<u8>) -> Self {
        TransactionRequest {
            nonce,
            to,
            value,
            call_data,
        }
    }

    pub fn has_call_data(&self) -> bool {
        !self.call_data.is_empty()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &[u8],
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(stripped).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_has_no_payload() {
        let req = TransactionRequest::transfer(0, Address::from_bytes([2u8; 20]), Wei::from_eth(1));
        assert!(!req.has_call_data());
        assert_eq!(req.value, Wei::from_eth(1));
    }

    #[test]
    fn test_call_carries_payload() {
        let req = TransactionRequest::call(
            3,
            Address::from_bytes([2u8; 20]),
            Wei::ZERO,
            vec![0xa9, 0x05, 0x9c, 0xbb],
        );
        assert!(req.has_call_data());
        assert_eq!(req.nonce, 3);
    }
}
