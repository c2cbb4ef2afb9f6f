//! # Error Types — Attestation Error Taxonomy
//!
//! Every component of the attestation pipeline fails fast with one of the
//! variants below. The orchestrator never catches and continues: a stage
//! error aborts the request and is surfaced to the caller verbatim.
//!
//! ## Design
//!
//! - Malformed caller input (`Decode`, `InvalidPoint`, `InvalidSignature`,
//!   `Witness`) is distinguishable from key misconfiguration (`InvalidKey`,
//!   `InvalidKeyLength`) so the HTTP layer can pick 4xx vs 5xx.
//! - Messages never contain secret material.

use thiserror::Error;

/// Error raised by a cryptographic or encoding step of the attestation
/// pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttestError {
    /// Image bytes could not be decoded into a pixel matrix.
    #[error("image decode error: {0}")]
    Decode(String),

    /// Private scalar is zero, out of range, or otherwise unusable.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Public point is malformed, off-curve, or outside the prime-order subgroup.
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    /// Signature bytes are malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Symmetric key has the wrong length.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Hex-encoded input could not be decoded.
    #[error("hex decode error: {0}")]
    Hex(String),

    /// A serialized witness violates the fixed field widths.
    #[error("malformed witness: {0}")]
    Witness(String),
}

impl AttestError {
    /// Machine-readable error code for structured error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::InvalidPoint(_) => "INVALID_POINT",
            Self::InvalidSignature(_) => "INVALID_SIGNATURE",
            Self::InvalidKeyLength { .. } => "INVALID_KEY_LENGTH",
            Self::Hex(_) => "HEX_ERROR",
            Self::Witness(_) => "WITNESS_ERROR",
        }
    }

    /// Whether the error stems from caller-supplied input rather than from
    /// provisioned key material.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::InvalidPoint(_) | Self::InvalidSignature(_) | Self::Witness(_)
        )
    }
}

impl From<hex::FromHexError> for AttestError {
    fn from(e: hex::FromHexError) -> Self {
        Self::Hex(e.to_string())
    }
}
