//! # Protocol Constants and Fixed-Width Values
//!
//! Byte widths here are a compatibility contract with the proving circuit.
//! Changing any of them breaks every previously produced witness.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{hex_to_array, noir_byte_array};
use crate::error::AttestError;

/// Width of the random nonce prefixed to the camera identifier.
pub const NONCE_LEN: usize = 31;
/// Width of the camera identifier plaintext and ciphertext.
pub const IDENTIFIER_LEN: usize = 64;
/// AES block width.
pub const BLOCK_LEN: usize = 16;
/// AES-128 key width.
pub const SYMMETRIC_KEY_LEN: usize = 16;
/// Width of a private scalar on either curve.
pub const SCALAR_LEN: usize = 32;
/// Width of a single affine coordinate.
pub const COORDINATE_LEN: usize = 32;
/// Width of a SEC1 compressed secp256k1 public key.
pub const COMPRESSED_KEY_LEN: usize = 33;
/// Width of a compact `r || s` ECDSA signature.
pub const SIGNATURE_LEN: usize = 64;
/// Width of an image digest.
pub const DIGEST_LEN: usize = 32;

/// The 31-byte random nonce that makes encrypted identifiers unlinkable.
///
/// A fresh nonce is required per attestation request.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Wrap raw nonce bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a nonce from a 62-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        hex_to_array(s).map(Self)
    }

    /// Return the raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Circuit byte-array literal rendering.
    pub fn to_byte_array_literal(&self) -> String {
        noir_byte_array(&self.0)
    }
}

impl Serialize for Nonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Nonce(<redacted>)")
    }
}
