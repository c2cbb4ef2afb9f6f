//! # API Route Modules
//!
//! - `witness`: run the attestation pipeline over an uploaded image.
//! - `hash`: canonical digest of an uploaded image.

pub mod hash;
pub mod witness;
