//! # ECDH Key Agreement on BabyJubJub
//!
//! The pipeline encrypts the camera identifier under a key only the keeper
//! can rebuild. Agreement runs in the prime-order subgroup generated by
//! `Base8`:
//!
//! - keeper public key `K = k · Base8`, provisioned out of band;
//! - per-request scalar `e`, with public point `E = e · Base8` published in
//!   the witness as `identifier_deckey`;
//! - shared secret `x(e · K) = x(k · E)`.
//!
//! ## Key derivation
//!
//! The AES-128 key is the high half of the shared X coordinate: the first
//! 16 bytes of its 32-byte big-endian encoding. This is a wire contract with
//! the circuit and must not change.
//!
//! ## Validation
//!
//! Remote points are validated when constructed ([`EcdhPublicKey::from_coordinates`]):
//! canonical coordinates, on the curve, not the identity, and inside the
//! prime-order subgroup. [`agree`] therefore cannot fail.

use ark_ff::PrimeField;
use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use zkpa_core::encoding::{hex_prefix, hex_to_padded_array};
use zkpa_core::{AttestError, COORDINATE_LEN, SCALAR_LEN, SYMMETRIC_KEY_LEN};

use crate::babyjubjub::{AffinePoint, CoordinateBytes, CurveParams, ScalarField};

/// Curve used for identifier key agreement.
pub const AGREEMENT_CURVE: CurveParams = CurveParams::BabyJubJub;

fn to_field_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ─── Scalars ─────────────────────────────────────────────────────────────

/// A non-zero scalar reduced modulo the subgroup order.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EcdhScalar {
    bytes: [u8; SCALAR_LEN],
}

impl EcdhScalar {
    /// Reduce `value` modulo the subgroup order.
    ///
    /// Fails with `InvalidKey` if the reduced value is zero.
    pub fn from_biguint(value: &BigUint) -> Result<Self, AttestError> {
        let curve = AGREEMENT_CURVE.curve();
        let reduced = value % curve.subgroup_order();
        if reduced == BigUint::from(0u8) {
            return Err(AttestError::InvalidKey(
                "agreement scalar is zero modulo the subgroup order".into(),
            ));
        }
        let be = reduced.to_bytes_be();
        let mut bytes = [0u8; SCALAR_LEN];
        bytes[SCALAR_LEN - be.len()..].copy_from_slice(&be);
        Ok(Self { bytes })
    }

    /// Interpret 32 big-endian bytes as a scalar and reduce it.
    pub fn from_be_bytes(bytes: &[u8; SCALAR_LEN]) -> Result<Self, AttestError> {
        Self::from_biguint(&BigUint::from_bytes_be(bytes))
    }

    /// Parse a big-endian hex scalar of up to 64 digits (optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        let mut bytes: [u8; SCALAR_LEN] =
            hex_to_padded_array(s).map_err(|e| AttestError::InvalidKey(e.to_string()))?;
        let scalar = Self::from_be_bytes(&bytes);
        bytes.zeroize();
        scalar
    }

    /// Draw a fresh scalar from the OS CSPRNG.
    pub fn random() -> Self {
        use rand::RngCore;
        loop {
            let mut bytes = [0u8; SCALAR_LEN];
            rand::rngs::OsRng.fill_bytes(&mut bytes);
            let scalar = Self::from_be_bytes(&bytes);
            bytes.zeroize();
            if let Ok(scalar) = scalar {
                return scalar;
            }
        }
    }

    /// Reduced scalar as 32 big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; SCALAR_LEN] {
        self.bytes
    }

    /// Reduced scalar as a `0x`-prefixed 64-digit hex string.
    pub fn to_field_hex(&self) -> String {
        to_field_hex(&self.bytes)
    }

    /// Reduced scalar as a big integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// Reduced scalar as a subgroup scalar field element.
    pub(crate) fn to_scalar(&self) -> ScalarField {
        ScalarField::from_be_bytes_mod_order(&self.bytes)
    }

    /// `self · Base8`.
    pub fn public_point(&self) -> EcdhPublicKey {
        let point = AGREEMENT_CURVE.curve().mul_base(&self.to_scalar());
        EcdhPublicKey { point }
    }
}

impl std::fmt::Debug for EcdhScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EcdhScalar(<redacted>)")
    }
}

// ─── Public points ───────────────────────────────────────────────────────

/// A validated point in the prime-order subgroup.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EcdhPublicKey {
    point: AffinePoint,
}

/// The keeper's published agreement key.
pub type KeeperPublicKey = EcdhPublicKey;

impl EcdhPublicKey {
    /// Build and validate a point from big-endian coordinates.
    pub fn from_coordinates(
        x: &[u8; COORDINATE_LEN],
        y: &[u8; COORDINATE_LEN],
    ) -> Result<Self, AttestError> {
        let point = AffinePoint::from_be_bytes(x, y)?;
        let curve = AGREEMENT_CURVE.curve();
        if !curve.is_on_curve(&point) {
            return Err(AttestError::InvalidPoint("point is not on the curve".into()));
        }
        if point.is_zero() {
            return Err(AttestError::InvalidPoint("point is the identity".into()));
        }
        if !curve.is_in_subgroup(&point) {
            return Err(AttestError::InvalidPoint(
                "point is outside the prime-order subgroup".into(),
            ));
        }
        Ok(Self { point })
    }

    /// Parse hex coordinates (up to 64 digits each, optional `0x`).
    pub fn from_hex(x: &str, y: &str) -> Result<Self, AttestError> {
        let x: [u8; COORDINATE_LEN] =
            hex_to_padded_array(x).map_err(|e| AttestError::InvalidPoint(e.to_string()))?;
        let y: [u8; COORDINATE_LEN] =
            hex_to_padded_array(y).map_err(|e| AttestError::InvalidPoint(e.to_string()))?;
        Self::from_coordinates(&x, &y)
    }

    /// The underlying affine point.
    pub fn point(&self) -> &AffinePoint {
        &self.point
    }

    /// X coordinate, big-endian.
    pub fn x_be_bytes(&self) -> [u8; COORDINATE_LEN] {
        self.point.x_be_bytes()
    }

    /// Y coordinate, big-endian.
    pub fn y_be_bytes(&self) -> [u8; COORDINATE_LEN] {
        self.point.y_be_bytes()
    }

    /// X coordinate as `0x`-prefixed 64-digit hex.
    pub fn x_hex(&self) -> String {
        to_field_hex(&self.x_be_bytes())
    }

    /// Y coordinate as `0x`-prefixed 64-digit hex.
    pub fn y_hex(&self) -> String {
        to_field_hex(&self.y_be_bytes())
    }
}

impl std::fmt::Debug for EcdhPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EcdhPublicKey(x={}...)", hex_prefix(&self.x_be_bytes()))
    }
}

// ─── Keeper ──────────────────────────────────────────────────────────────

/// The keeper's agreement keypair. Only the keeper can recover camera
/// identifiers.
#[derive(Clone)]
pub struct KeeperKeyPair {
    scalar: EcdhScalar,
    public: KeeperPublicKey,
}

impl KeeperKeyPair {
    /// Derive the keypair from a private scalar.
    pub fn from_scalar(scalar: EcdhScalar) -> Self {
        let public = scalar.public_point();
        Self { scalar, public }
    }

    /// Derive the keypair from a hex scalar.
    pub fn from_scalar_hex(s: &str) -> Result<Self, AttestError> {
        EcdhScalar::from_hex(s).map(Self::from_scalar)
    }

    /// Generate a fresh keypair.
    pub fn generate() -> Self {
        Self::from_scalar(EcdhScalar::random())
    }

    /// The keeper's public key.
    pub fn public_key(&self) -> &KeeperPublicKey {
        &self.public
    }

    /// The keeper's private scalar.
    pub fn scalar(&self) -> &EcdhScalar {
        &self.scalar
    }
}

impl std::fmt::Debug for KeeperKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeeperKeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

// ─── Agreement ───────────────────────────────────────────────────────────

/// X coordinate of `local · remote`. Never serialized.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    x: [u8; COORDINATE_LEN],
}

impl SharedSecret {
    /// Shared X coordinate as a big integer.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.x)
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// An AES-128 key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LEN]);

impl SymmetricKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; SYMMETRIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Wrap a key slice, failing with `InvalidKeyLength` unless it is 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AttestError> {
        let arr: [u8; SYMMETRIC_KEY_LEN] =
            bytes.try_into().map_err(|_| AttestError::InvalidKeyLength {
                expected: SYMMETRIC_KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// Compute the shared secret between a local scalar and a remote point.
pub fn agree(local: &EcdhScalar, remote: &EcdhPublicKey) -> SharedSecret {
    let shared = AGREEMENT_CURVE
        .curve()
        .mul(remote.point(), &local.to_scalar());
    SharedSecret {
        x: shared.x_be_bytes(),
    }
}

/// Derive the AES-128 key from a shared secret: the first 16 bytes of the
/// big-endian X coordinate.
pub fn derive_symmetric_key(secret: &SharedSecret) -> SymmetricKey {
    let mut key = [0u8; SYMMETRIC_KEY_LEN];
    key.copy_from_slice(&secret.x[..SYMMETRIC_KEY_LEN]);
    SymmetricKey(key)
}
