use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use gashedge_codec::{request_digest, Digest32};
use gashedge_types::{Address, HedgeError, Result, TransactionRequest};

use crate::recover::{address_of, personal_digest};
use crate::signature::Signature;

/// Holds a secret key and produces request signatures the wallet's
/// verifier will accept.
pub struct Signer {
    secret: SecretKey,
    address: Address,
}

impl Signer {
    /// Build from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| HedgeError::InvalidSignature(format!("bad secret key: {}", e)))?;
        let address = address_of(&PublicKey::from_secret_key(&secp, &secret));
        Ok(Signer { secret, address })
    }

    /// The address this signer's signatures recover to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest under the personal-message scheme.
    pub fn sign_digest(&self, digest: &Digest32) -> Signature {
        let secp = Secp256k1::new();
        let msg = Message::from_digest(personal_digest(digest));
        let (rec_id, compact) = secp
            .sign_ecdsa_recoverable(&msg, &self.secret)
            .serialize_compact();

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Signature {
            r,
            s,
            v: 27 + rec_id.to_i32() as u8,
        }
    }

    /// Sign a transaction request: digest its ABI encoding, then sign.
    pub fn sign_request(&self, request: &TransactionRequest) -> Signature {
        self.sign_digest(&request_digest(request))
    }
}
