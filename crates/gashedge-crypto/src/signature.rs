use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use gashedge_types::{HedgeError, Result};

/// A 65-byte recoverable ECDSA signature in `r || s || v` layout.
///
/// The recovery byte `v` is accepted either raw (0 or 1) or with the
/// legacy 27 offset that wallet tooling emits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

impl Signature {
    /// Parse from the 65-byte compact layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(HedgeError::InvalidSignature(format!(
                "signature must be 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        let sig = Signature { r, s, v: bytes[64] };
        sig.recovery_id()?;
        Ok(sig)
    }

    /// Parse from hex, with or without a 0x prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped)
            .map_err(|_| HedgeError::InvalidSignature("invalid hex encoding".to_string()))?;
        Signature::from_bytes(&raw)
    }

    /// Serialize back to the 65-byte compact layout.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Normalize `v` to the raw recovery id.
    pub fn recovery_id(&self) -> Result<u8> {
        match self.v {
            0 | 1 => Ok(self.v),
            27 | 28 => Ok(self.v - 27),
            other => Err(HedgeError::InvalidSignature(format!(
                "recovery byte must be 0, 1, 27 or 28, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
