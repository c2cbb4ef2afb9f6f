//! # Prove CLI — Witness generation followed by the external prover.
//!
//! ```bash
//! zkpa --config zkpa.yaml prove --circuit-dir circuits/zkpa photo.png
//! ```
//!
//! Writes `Prover.toml` into the circuit directory, runs `nargo prove`
//! there and prints the verifier's public inputs with the proof under
//! `zkp` as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use zkpa_zkp::{ExternalProver, NargoProver};

/// Arguments for the `prove` subcommand.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// Noir package directory containing the circuit.
    #[arg(long)]
    pub circuit_dir: PathBuf,

    /// Image file to attest.
    pub image: PathBuf,

    /// Prover executable.
    #[arg(long, default_value = "nargo")]
    pub program: String,

    /// Package name used for `proofs/<package>.proof`.
    #[arg(long, default_value = "zkpa")]
    pub package: String,

    /// Fixed 31-byte nonce as hex.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Write the proof artifact to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the prove subcommand.
pub fn run_prove(args: &ProveArgs, config: Option<&Path>) -> Result<u8> {
    let pipeline = crate::load_pipeline(config)?;
    let witness = crate::witness::build_witness(&pipeline, &args.image, args.nonce.as_deref())?;

    let prover = NargoProver::new(&args.circuit_dir)
        .with_program(&args.program)
        .with_package(&args.package);
    let artifact = prover
        .prove(&witness)
        .with_context(|| format!("{} prove in {}", prover.name(), args.circuit_dir.display()))?;

    let json = serde_json::to_string_pretty(&artifact)?;
    crate::write_output(args.out.as_deref(), &json)?;
    Ok(0)
}
