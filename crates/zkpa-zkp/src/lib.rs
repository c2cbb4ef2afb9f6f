//! # zkpa-zkp — Attestation Pipeline and Witness Bridge
//!
//! Turns an image into the witness bundle consumed by the zero-knowledge
//! circuit, and hands that bundle to an external prover.
//!
//! ## Architecture
//!
//! - **Config** (`config.rs`): provisioned keys from YAML and the
//!   environment, validated once at load.
//! - **Pipeline** (`pipeline.rs`): the typestate sequence
//!   hash → camera sign → authority certify → encrypt identifier → assemble.
//! - **Witness** (`witness.rs`): the fixed-width bundle, its JSON, Prover
//!   TOML and literal-listing encodings, and keeper-side identifier
//!   recovery.
//! - **Prover** (`prover.rs`): the `ExternalProver` trait and the `nargo`
//!   implementation.
//!
//! ## Crate Policy
//!
//! - Depends on `zkpa-core` and `zkpa-crypto` internally.
//! - The pipeline holds no mutable state; one `AttestationPipeline` serves
//!   concurrent requests.

pub mod config;
pub mod pipeline;
pub mod prover;
pub mod witness;

pub use config::{ConfigError, PipelineConfig, RawPipelineConfig, ScalarPolicy, SecretString};
pub use pipeline::{random_nonce, Attestation, AttestationPipeline};
pub use prover::{ExternalProver, NargoProver, ProofArtifact, ProverError};
pub use witness::{recover_identifier, WitnessBundle, WitnessFormat};
