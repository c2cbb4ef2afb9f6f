//! # External Prover Bridge
//!
//! The circuit itself lives outside this workspace. [`ExternalProver`] is
//! the seam: hand it a witness, get back the verifier's public inputs and
//! the proof.
//!
//! [`NargoProver`] drives the Noir toolchain in a circuit directory:
//!
//! 1. write `Prover.toml` from the witness;
//! 2. run `nargo prove` and wait for it to exit;
//! 3. read `Verifier.toml` and `proofs/<package>.proof`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkpa_core::AttestError;

use crate::witness::WitnessBundle;

/// Failures of the external proving step.
#[derive(Error, Debug)]
pub enum ProverError {
    /// The witness could not be encoded.
    #[error(transparent)]
    Witness(#[from] AttestError),

    /// The prover binary could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The prover ran and reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// A prover input or output file could not be accessed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `Verifier.toml` is not valid TOML.
    #[error("invalid verifier output {path}: {message}")]
    VerifierOutput { path: PathBuf, message: String },
}

/// The verifier's public inputs plus the proof, serialized as one flat map
/// with the proof under `zkp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Public inputs as written by the prover.
    #[serde(flatten)]
    pub public_inputs: BTreeMap<String, toml::Value>,
    /// Proof text.
    #[serde(rename = "zkp")]
    pub proof: String,
}

/// A proving backend.
pub trait ExternalProver: Send + Sync {
    /// Produce a proof for `witness`.
    fn prove(&self, witness: &WitnessBundle) -> Result<ProofArtifact, ProverError>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// `nargo prove` run inside a Noir package directory.
#[derive(Debug, Clone)]
pub struct NargoProver {
    circuit_dir: PathBuf,
    program: String,
    package: String,
}

impl NargoProver {
    /// Prover for the package at `circuit_dir`, using `nargo` from `PATH`
    /// and the `zkpa` package name.
    pub fn new(circuit_dir: impl Into<PathBuf>) -> Self {
        Self {
            circuit_dir: circuit_dir.into(),
            program: "nargo".to_string(),
            package: "zkpa".to_string(),
        }
    }

    /// Use a different prover executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Use a different package name for the proof file.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// The circuit directory.
    pub fn circuit_dir(&self) -> &Path {
        &self.circuit_dir
    }

    fn proof_path(&self) -> PathBuf {
        self.circuit_dir
            .join("proofs")
            .join(format!("{}.proof", self.package))
    }

    fn read(path: &Path) -> Result<String, ProverError> {
        std::fs::read_to_string(path).map_err(|source| ProverError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ExternalProver for NargoProver {
    fn prove(&self, witness: &WitnessBundle) -> Result<ProofArtifact, ProverError> {
        let prover_toml = self.circuit_dir.join("Prover.toml");
        std::fs::write(&prover_toml, witness.to_prover_toml()?).map_err(|source| {
            ProverError::Io {
                path: prover_toml.clone(),
                source,
            }
        })?;

        tracing::info!(program = %self.program, dir = %self.circuit_dir.display(), "running prover");
        let output = Command::new(&self.program)
            .arg("prove")
            .current_dir(&self.circuit_dir)
            .output()
            .map_err(|source| ProverError::Launch {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ProverError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let verifier_path = self.circuit_dir.join("Verifier.toml");
        let public_inputs: BTreeMap<String, toml::Value> =
            toml::from_str(&Self::read(&verifier_path)?).map_err(|e| {
                ProverError::VerifierOutput {
                    path: verifier_path.clone(),
                    message: e.to_string(),
                }
            })?;
        let proof = Self::read(&self.proof_path())?.trim().to_string();
        tracing::info!(public_inputs = public_inputs.len(), proof_len = proof.len(), "proof generated");

        Ok(ProofArtifact {
            public_inputs,
            proof,
        })
    }

    fn name(&self) -> &str {
        "nargo"
    }
}
