//! # Camera Identifier Codec
//!
//! The 64-byte plaintext layout checked by the circuit:
//!
//! ```text
//! [0..31)   random nonce
//! [31]      SEC1 parity byte of the camera public key (0x02 / 0x03)
//! [32..64)  camera public key X coordinate, big-endian
//! ```
//!
//! Encryption is AES-128 applied independently to the four 16-byte blocks.
//! Output block order matches input block order.

use serde::{Deserialize, Serialize};

use zkpa_core::{AttestError, Nonce, COORDINATE_LEN, IDENTIFIER_LEN, NONCE_LEN};

use crate::cipher::{decrypt_blocks, encrypt_blocks};
use crate::ecdh::SymmetricKey;
use crate::secp256k1::SigningPublicKey;

/// The 64-byte camera identifier before encryption.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CameraIdentifierPlaintext([u8; IDENTIFIER_LEN]);

impl CameraIdentifierPlaintext {
    /// Wrap raw plaintext bytes.
    pub fn from_bytes(bytes: [u8; IDENTIFIER_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw plaintext bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LEN] {
        &self.0
    }

    /// The nonce prefix.
    pub fn nonce(&self) -> Nonce {
        let mut n = [0u8; NONCE_LEN];
        n.copy_from_slice(&self.0[..NONCE_LEN]);
        Nonce::from_bytes(n)
    }

    /// The camera key's parity byte.
    pub fn parity_byte(&self) -> u8 {
        self.0[NONCE_LEN]
    }

    /// The camera key's X coordinate.
    pub fn camera_pubkey_x(&self) -> [u8; COORDINATE_LEN] {
        let mut x = [0u8; COORDINATE_LEN];
        x.copy_from_slice(&self.0[NONCE_LEN + 1..]);
        x
    }

    /// The 33-byte compressed camera key embedded in the identifier.
    pub fn compressed_camera_key(&self) -> [u8; 1 + COORDINATE_LEN] {
        let mut out = [0u8; 1 + COORDINATE_LEN];
        out.copy_from_slice(&self.0[NONCE_LEN..]);
        out
    }

    /// Parse the embedded compressed key back into a camera public key.
    pub fn camera_public_key(&self) -> Result<SigningPublicKey, AttestError> {
        SigningPublicKey::from_sec1_bytes(&self.compressed_camera_key())
    }
}

impl std::fmt::Debug for CameraIdentifierPlaintext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraIdentifierPlaintext")
            .field("parity_byte", &format_args!("0x{:02x}", self.parity_byte()))
            .field("camera_pubkey_x", &hex::encode(self.camera_pubkey_x()))
            .finish_non_exhaustive()
    }
}

/// The 64-byte encrypted camera identifier.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedCameraIdentifier(#[serde(with = "hex_64")] [u8; IDENTIFIER_LEN]);

impl EncryptedCameraIdentifier {
    /// Wrap raw ciphertext bytes.
    pub fn from_bytes(bytes: [u8; IDENTIFIER_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw ciphertext bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LEN] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for EncryptedCameraIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncryptedCameraIdentifier({}...)", zkpa_core::encoding::hex_prefix(&self.0))
    }
}

mod hex_64 {
    use serde::{Deserialize, Deserializer, Serializer};
    use zkpa_core::IDENTIFIER_LEN;

    pub fn serialize<S: Serializer>(bytes: &[u8; IDENTIFIER_LEN], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; IDENTIFIER_LEN], D::Error> {
        let s = String::deserialize(d)?;
        zkpa_core::hex_to_array(&s).map_err(serde::de::Error::custom)
    }
}

/// Assemble `nonce || parity_byte || camera_pubkey_x`.
pub fn build_plaintext(
    nonce: &Nonce,
    parity_byte: u8,
    camera_pubkey_x: &[u8; COORDINATE_LEN],
) -> CameraIdentifierPlaintext {
    let mut out = [0u8; IDENTIFIER_LEN];
    out[..NONCE_LEN].copy_from_slice(nonce.as_bytes());
    out[NONCE_LEN] = parity_byte;
    out[NONCE_LEN + 1..].copy_from_slice(camera_pubkey_x);
    CameraIdentifierPlaintext(out)
}

/// Assemble the plaintext for a camera key.
pub fn plaintext_for(nonce: &Nonce, camera_key: &SigningPublicKey) -> CameraIdentifierPlaintext {
    build_plaintext(nonce, camera_key.parity_byte(), &camera_key.x())
}

/// Encrypt the four plaintext blocks under `key`.
pub fn encrypt_identifier(
    plaintext: &CameraIdentifierPlaintext,
    key: &SymmetricKey,
) -> Result<EncryptedCameraIdentifier, AttestError> {
    let mut data = plaintext.0;
    encrypt_blocks(key.as_bytes(), &mut data)?;
    Ok(EncryptedCameraIdentifier(data))
}

/// Decrypt the four ciphertext blocks under `key`.
pub fn decrypt_identifier(
    ciphertext: &EncryptedCameraIdentifier,
    key: &SymmetricKey,
) -> Result<CameraIdentifierPlaintext, AttestError> {
    let mut data = ciphertext.0;
    decrypt_blocks(key.as_bytes(), &mut data)?;
    Ok(CameraIdentifierPlaintext(data))
}
