//! # zkpa-crypto — Attestation Cryptography
//!
//! The fixed protocol primitives behind a camera attestation:
//!
//! - **Canonical image hashing** (`image_hash`): decode, strip to RGB8,
//!   serialize as binary PPM, BLAKE3.
//! - **secp256k1 signatures** (`secp256k1`): camera attestation over the
//!   image digest and authority certificates over camera keys.
//! - **BabyJubJub** (`babyjubjub`): `ark-ec` curve parameters over the
//!   BN254 scalar field.
//! - **ECDH** (`ecdh`): keeper key material, shared secret, AES key
//!   derivation.
//! - **AES-128** (`cipher`) and the **camera identifier codec**
//!   (`identifier`).
//!
//! ## Crate Policy
//!
//! - Depends only on `zkpa-core` internally.
//! - No mocking of cryptographic operations in tests. Vectors are checked
//!   against independently computed values.
//! - Secret material never implements `Serialize` and zeroizes on drop.

pub mod babyjubjub;
pub mod cipher;
pub mod ecdh;
pub mod identifier;
pub mod image_hash;
pub mod secp256k1;

pub use babyjubjub::{
    AffinePoint, BabyJubJubConfig, CoordinateBytes, CurveParams, ScalarField, TwistedEdwards,
};
pub use cipher::{decrypt_block, encrypt_block};
pub use ecdh::{
    agree, derive_symmetric_key, EcdhPublicKey, EcdhScalar, KeeperKeyPair, KeeperPublicKey,
    SharedSecret, SymmetricKey,
};
pub use identifier::{
    build_plaintext, decrypt_identifier, encrypt_identifier, plaintext_for,
    CameraIdentifierPlaintext, EncryptedCameraIdentifier,
};
pub use image_hash::{canonical_ppm, hash_bytes, hash_image};
pub use secp256k1::{
    certificate_digest, certify, public_key_of, recover, sign, verify, Certificate,
    RecoverableSignature, SignatureAuthority, SigningPublicKey,
};
