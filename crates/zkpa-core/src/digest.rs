//! # Image Digest
//!
//! `ImageDigest` is the 32-byte BLAKE3 output over the canonical pixel
//! stream of an image. It is a derived, immutable value; equality is
//! byte-exact.
//!
//! ## Serde
//!
//! Serializes as a lowercase hex string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::{hex_prefix, hex_to_array, noir_byte_array};
use crate::error::AttestError;
use crate::protocol::DIGEST_LEN;

/// A 32-byte content hash of canonical image pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDigest([u8; DIGEST_LEN]);

impl ImageDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from a 64-character hex string (optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        hex_to_array(s).map(Self)
    }

    /// Render the digest as a circuit byte-array literal, e.g. `[0x1A, 0x2B, ...]`.
    pub fn to_byte_array_literal(&self) -> String {
        noir_byte_array(&self.0)
    }
}

impl AsRef<[u8]> for ImageDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for ImageDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ImageDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for ImageDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageDigest({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let d = ImageDigest::from_bytes([0xab; 32]);
        let hex = d.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(ImageDigest::from_hex(&hex).unwrap(), d);
        assert_eq!(ImageDigest::from_hex(&format!("0x{hex}")).unwrap(), d);
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(ImageDigest::from_hex("abcd").is_err());
    }

    #[test]
    fn serde_as_hex_string() {
        let d = ImageDigest::from_bytes([1u8; 32]);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: ImageDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn debug_shows_prefix_only() {
        let d = ImageDigest::from_bytes([0xcd; 32]);
        assert_eq!(format!("{d:?}"), "ImageDigest(cdcdcdcd...)");
    }

    #[test]
    fn byte_array_literal_format() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x0a;
        bytes[31] = 0xff;
        let lit = ImageDigest::from_bytes(bytes).to_byte_array_literal();
        assert!(lit.starts_with("[0x0A, 0x00"));
        assert!(lit.ends_with("0xFF]"));
    }
}
