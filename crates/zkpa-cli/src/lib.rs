//! # zkpa-cli — CLI Tool for Camera Attestation
//!
//! Provides the `zkpa` command-line interface over the attestation
//! pipeline.
//!
//! ## Subcommands
//!
//! - `zkpa hash`: canonical BLAKE3 digest of an image.
//! - `zkpa pubkey` / `zkpa keeper-pubkey`: public points of provisioned keys.
//! - `zkpa witness`: run the pipeline and emit the witness bundle.
//! - `zkpa decrypt`: keeper-side recovery of the camera identifier.
//! - `zkpa prove`: witness generation followed by `nargo prove`.
//!
//! ```bash
//! zkpa hash photo.png
//! zkpa --config zkpa.yaml witness photo.png --format toml --out Prover.toml
//! zkpa decrypt --keeper-key 0x10203040506 witness.json
//! ```
//!
//! Key material for `witness` and `prove` comes from `--config` and the
//! `ZKPA_*` environment variables.

pub mod decrypt;
pub mod hash;
pub mod keys;
pub mod prove;
pub mod witness;

use std::path::Path;

use anyhow::{Context, Result};

use zkpa_zkp::{AttestationPipeline, PipelineConfig};

/// Load and validate pipeline key material.
pub fn load_pipeline(config: Option<&Path>) -> Result<AttestationPipeline> {
    let config = PipelineConfig::load(config).context("loading pipeline configuration")?;
    Ok(AttestationPipeline::new(config))
}

/// Read a whole input file.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Write `content` to `out`, or to stdout when no path is given.
pub fn write_output(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}
