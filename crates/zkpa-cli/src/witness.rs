//! # Witness CLI — Run the attestation pipeline over an image.
//!
//! ```bash
//! zkpa --config zkpa.yaml witness photo.png
//! zkpa witness photo.png --format toml --out circuit/Prover.toml
//! zkpa witness photo.png --nonce 14e50ec3...d5 --format noir
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use zkpa_core::Nonce;
use zkpa_zkp::{random_nonce, AttestationPipeline, WitnessBundle, WitnessFormat};

/// Arguments for the `witness` subcommand.
#[derive(Args, Debug)]
pub struct WitnessArgs {
    /// Image file to attest.
    pub image: PathBuf,

    /// Output encoding: json, toml or noir.
    #[arg(long, default_value = "json")]
    pub format: WitnessFormat,

    /// Fixed 31-byte nonce as hex. A fresh random nonce is drawn otherwise.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the witness subcommand.
pub fn run_witness(args: &WitnessArgs, config: Option<&Path>) -> Result<u8> {
    let pipeline = crate::load_pipeline(config)?;
    let witness = build_witness(&pipeline, &args.image, args.nonce.as_deref())?;
    let rendered = witness.render(args.format).context("rendering witness")?;
    crate::write_output(args.out.as_deref(), &rendered)?;
    Ok(0)
}

/// Attest the image at `image` with an optional fixed nonce.
pub fn build_witness(
    pipeline: &AttestationPipeline,
    image: &Path,
    nonce: Option<&str>,
) -> Result<WitnessBundle> {
    let nonce = match nonce {
        Some(hex) => Nonce::from_hex(hex).context("parsing --nonce")?,
        None => random_nonce(),
    };
    let raw = crate::read_input(image)?;
    let scalar = pipeline.config().scalar_policy.scalar_for_request();
    pipeline
        .attest_with(&raw, nonce, scalar)
        .with_context(|| format!("attesting {}", image.display()))
}
