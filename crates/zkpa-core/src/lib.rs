//! # zkpa-core — Foundational Types for Camera Attestation
//!
//! The leaf crate of the zkpa workspace. Defines the error taxonomy, the
//! fixed byte widths shared with the proving circuit, and the small value
//! types every other crate passes around.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed widths are types.** `Nonce` is `[u8; 31]`, `ImageDigest` is
//!    `[u8; 32]`. A wrong-width value cannot reach the identifier codec or the
//!    witness encoder.
//!
//! 2. **One error enum.** `AttestError` carries the complete failure taxonomy
//!    of the pipeline. Components fail fast; nothing retries.
//!
//! 3. **Hex at the edges.** Provisioned keys arrive as hex; `encoding` owns
//!    the parsing rules (optional `0x`, exact or left-padded widths).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkpa-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod encoding;
pub mod error;
pub mod protocol;

pub use digest::ImageDigest;
pub use encoding::{hex_to_array, hex_to_padded_array, noir_byte_array};
pub use error::AttestError;
pub use protocol::{
    Nonce, BLOCK_LEN, COMPRESSED_KEY_LEN, COORDINATE_LEN, DIGEST_LEN, IDENTIFIER_LEN, NONCE_LEN,
    SCALAR_LEN, SIGNATURE_LEN, SYMMETRIC_KEY_LEN,
};
