use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};

use gashedge_codec::{keccak256, Digest32};
use gashedge_types::{Address, HedgeError, Result};

use crate::signature::Signature;

const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Apply the signed-personal-message prefix to a 32-byte digest.
pub fn personal_digest(digest: &Digest32) -> Digest32 {
    let mut buf = Vec::with_capacity(PERSONAL_PREFIX.len() + digest.len());
    buf.extend_from_slice(PERSONAL_PREFIX);
    buf.extend_from_slice(digest);
    keccak256(&buf)
}

/// Recover the address that signed `digest` under the personal-message
/// scheme. Fails with `InvalidSignature` if the signature bytes do not
/// describe a point on the curve.
pub fn recover_signer(digest: &Digest32, signature: &Signature) -> Result<Address> {
    let secp = Secp256k1::new();

    let rec_id = RecoveryId::from_i32(i32::from(signature.recovery_id()?))
        .map_err(|e| HedgeError::InvalidSignature(e.to_string()))?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&signature.r);
    compact[32..].copy_from_slice(&signature.s);
    let rec_sig = RecoverableSignature::from_compact(&compact, rec_id)
        .map_err(|e| HedgeError::InvalidSignature(e.to_string()))?;

    let msg = Message::from_digest(personal_digest(digest));
    let public_key = secp
        .recover_ecdsa(&msg, &rec_sig)
        .map_err(|e| HedgeError::InvalidSignature(e.to_string()))?;

    Ok(address_of(&public_key))
}

/// Derive the address of a public key: the low 20 bytes of the Keccak
/// hash of its uncompressed encoding, tag byte excluded.
pub(crate) fn address_of(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}
