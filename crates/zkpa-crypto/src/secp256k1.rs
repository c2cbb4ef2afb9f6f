//! # secp256k1 Signature Authority
//!
//! ECDSA over secp256k1 for the two attestation tiers:
//!
//! - the **camera** signs the 32-byte image digest;
//! - the **authority** certifies the camera by signing
//!   `blake3(compressed camera public key)`.
//!
//! Signing takes a pre-hashed 32-byte digest. Nothing in this module hashes
//! the message implicitly, except [`certificate_digest`].
//!
//! ## Security Invariants
//!
//! - Nonces are RFC6979 deterministic and signatures are low-S normalised,
//!   so one (key, digest) pair always produces one signature.
//! - [`SignatureAuthority`] does not implement `Serialize`; its `Debug`
//!   output shows only the public key. The inner key zeroizes on drop.
//!
//! ## Serde
//!
//! Public keys serialize as compressed SEC1 hex, signatures as compact
//! `r || s` hex.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use zkpa_core::encoding::{hex_prefix, hex_to_array};
use zkpa_core::{AttestError, COMPRESSED_KEY_LEN, COORDINATE_LEN, DIGEST_LEN, SCALAR_LEN, SIGNATURE_LEN};

// ─── Public key ──────────────────────────────────────────────────────────

/// A secp256k1 public key, as used for camera and authority identities.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningPublicKey {
    inner: VerifyingKey,
}

impl SigningPublicKey {
    /// Parse a SEC1 encoded key (33-byte compressed or 65-byte uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, AttestError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(|inner| Self { inner })
            .map_err(|_| AttestError::InvalidPoint("not a valid secp256k1 public key".into()))
    }

    /// Parse a compressed key from hex.
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        let bytes: [u8; COMPRESSED_KEY_LEN] = hex_to_array(s)?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Build a key from split big-endian affine coordinates.
    pub fn from_coordinates(
        x: &[u8; COORDINATE_LEN],
        y: &[u8; COORDINATE_LEN],
    ) -> Result<Self, AttestError> {
        let mut sec1 = [0u8; 1 + 2 * COORDINATE_LEN];
        sec1[0] = 0x04;
        sec1[1..1 + COORDINATE_LEN].copy_from_slice(x);
        sec1[1 + COORDINATE_LEN..].copy_from_slice(y);
        Self::from_sec1_bytes(&sec1)
    }

    /// 33-byte compressed SEC1 encoding: parity byte followed by X.
    pub fn compressed(&self) -> [u8; COMPRESSED_KEY_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The SEC1 parity byte (`0x02` for even Y, `0x03` for odd Y).
    pub fn parity_byte(&self) -> u8 {
        self.compressed()[0]
    }

    /// Big-endian X coordinate.
    pub fn x(&self) -> [u8; COORDINATE_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; COORDINATE_LEN];
        out.copy_from_slice(&point.as_bytes()[1..1 + COORDINATE_LEN]);
        out
    }

    /// Big-endian Y coordinate.
    pub fn y(&self) -> [u8; COORDINATE_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; COORDINATE_LEN];
        out.copy_from_slice(&point.as_bytes()[1 + COORDINATE_LEN..]);
        out
    }

    /// X coordinate as lowercase hex.
    pub fn x_hex(&self) -> String {
        hex::encode(self.x())
    }

    /// Y coordinate as lowercase hex.
    pub fn y_hex(&self) -> String {
        hex::encode(self.y())
    }

    /// Compressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.compressed())
    }

    /// Borrow the underlying `k256` verifying key.
    pub fn as_verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl Serialize for SigningPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SigningPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for SigningPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningPublicKey({}...)", hex_prefix(&self.compressed()))
    }
}

impl std::fmt::Display for SigningPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Signature ───────────────────────────────────────────────────────────

/// A compact ECDSA signature with its public-key recovery id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature {
    r: [u8; 32],
    s: [u8; 32],
    recovery_id: u8,
}

impl RecoverableSignature {
    fn from_parts(sig: &Signature, recovery_id: RecoveryId) -> Self {
        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        }
    }

    /// Parse a compact `r || s` signature. The recovery id is unknown and
    /// set to zero; use [`RecoverableSignature::with_recovery_id`] if known.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, AttestError> {
        let sig = parse_compact(bytes)?;
        Ok(Self::from_parts(&sig, RecoveryId::new(false, false)))
    }

    /// Replace the recovery id. Only values `0..=3` are valid.
    pub fn with_recovery_id(mut self, recovery_id: u8) -> Result<Self, AttestError> {
        if RecoveryId::from_byte(recovery_id).is_none() {
            return Err(AttestError::InvalidSignature(format!(
                "recovery id {recovery_id} out of range"
            )));
        }
        self.recovery_id = recovery_id;
        Ok(self)
    }

    /// `r` scalar, big-endian.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// `s` scalar, big-endian.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Recovery id (`0..=3`).
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// 64-byte compact `r || s`, the witness encoding.
    pub fn to_compact(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    /// Compact encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compact())
    }

    fn to_k256(self) -> Result<(Signature, RecoveryId), AttestError> {
        let sig = parse_compact(&self.to_compact())?;
        let id = RecoveryId::from_byte(self.recovery_id).ok_or_else(|| {
            AttestError::InvalidSignature(format!("recovery id {} out of range", self.recovery_id))
        })?;
        Ok((sig, id))
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        let bytes: [u8; SIGNATURE_LEN] = hex_to_array(&hex).map_err(serde::de::Error::custom)?;
        Self::from_compact(&bytes).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RecoverableSignature({}..., v={})",
            hex_prefix(&self.r),
            self.recovery_id
        )
    }
}

fn parse_compact(bytes: &[u8]) -> Result<Signature, AttestError> {
    if bytes.len() != SIGNATURE_LEN {
        return Err(AttestError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Signature::from_slice(bytes)
        .map_err(|_| AttestError::InvalidSignature("r or s out of range".into()))
}

// ─── Signing key ─────────────────────────────────────────────────────────

/// A secp256k1 signing key held by the camera or the authority.
pub struct SignatureAuthority {
    signing_key: SigningKey,
}

impl SignatureAuthority {
    /// Load a 32-byte big-endian private scalar.
    ///
    /// Fails with `InvalidKey` when the scalar is zero or not below the
    /// curve order.
    pub fn from_bytes(scalar: &[u8; SCALAR_LEN]) -> Result<Self, AttestError> {
        SigningKey::from_slice(scalar)
            .map(|signing_key| Self { signing_key })
            .map_err(|_| {
                AttestError::InvalidKey("secp256k1 scalar is zero or not below the curve order".into())
            })
    }

    /// Load a private scalar from 64 hex characters (optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        let bytes: [u8; SCALAR_LEN] =
            hex_to_array(s).map_err(|e| AttestError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Generate a key from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// The public key for this signer.
    pub fn public_key(&self) -> SigningPublicKey {
        SigningPublicKey {
            inner: *self.signing_key.verifying_key(),
        }
    }

    /// Sign a pre-hashed 32-byte digest.
    pub fn sign(&self, digest: &[u8; DIGEST_LEN]) -> Result<RecoverableSignature, AttestError> {
        let (sig, id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| AttestError::InvalidSignature(format!("signing failed: {e}")))?;
        Ok(RecoverableSignature::from_parts(&sig, id))
    }
}

impl std::fmt::Debug for SignatureAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureAuthority")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

// ─── Free functions ──────────────────────────────────────────────────────

/// Sign `digest` with a raw private scalar.
pub fn sign(
    private_scalar: &[u8; SCALAR_LEN],
    digest: &[u8; DIGEST_LEN],
) -> Result<RecoverableSignature, AttestError> {
    SignatureAuthority::from_bytes(private_scalar)?.sign(digest)
}

/// Derive the public key of a raw private scalar.
pub fn public_key_of(private_scalar: &[u8; SCALAR_LEN]) -> Result<SigningPublicKey, AttestError> {
    Ok(SignatureAuthority::from_bytes(private_scalar)?.public_key())
}

/// Verify a compact `r || s` signature over `digest`.
///
/// Returns `Ok(false)` for a well-formed signature that does not verify and
/// `InvalidSignature` for malformed input.
pub fn verify(
    public_key: &SigningPublicKey,
    digest: &[u8; DIGEST_LEN],
    signature: &[u8],
) -> Result<bool, AttestError> {
    let sig = parse_compact(signature)?;
    Ok(public_key.inner.verify_prehash(digest, &sig).is_ok())
}

/// Recover the signer's public key from a digest and recoverable signature.
pub fn recover(
    digest: &[u8; DIGEST_LEN],
    signature: &RecoverableSignature,
) -> Result<SigningPublicKey, AttestError> {
    let (sig, id) = signature.to_k256()?;
    VerifyingKey::recover_from_prehash(digest, &sig, id)
        .map(|inner| SigningPublicKey { inner })
        .map_err(|_| AttestError::InvalidSignature("public key recovery failed".into()))
}

// ─── Certificate ─────────────────────────────────────────────────────────

/// The digest an authority signs to certify a camera key.
pub fn certificate_digest(camera_key: &SigningPublicKey) -> [u8; DIGEST_LEN] {
    *blake3::hash(&camera_key.compressed()).as_bytes()
}

/// An authority's signature vouching for a camera public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Signature over [`certificate_digest`] of the camera key.
    pub signature: RecoverableSignature,
    /// The certifying authority's public key.
    pub authority_public_key: SigningPublicKey,
}

impl Certificate {
    /// Whether this certificate vouches for `camera_key`.
    pub fn verify(&self, camera_key: &SigningPublicKey) -> bool {
        verify(
            &self.authority_public_key,
            &certificate_digest(camera_key),
            &self.signature.to_compact(),
        )
        .unwrap_or(false)
    }
}

/// Certify `camera_key` under `authority`.
pub fn certify(
    authority: &SignatureAuthority,
    camera_key: &SigningPublicKey,
) -> Result<Certificate, AttestError> {
    let signature = authority.sign(&certificate_digest(camera_key))?;
    Ok(Certificate {
        signature,
        authority_public_key: authority.public_key(),
    })
}
