//! # Hash CLI — Canonical image digest.
//!
//! ```bash
//! zkpa hash photo.png
//! zkpa hash photo.png --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use zkpa_core::ImageDigest;

/// Arguments for the `hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Image file in any supported raster format.
    pub image: PathBuf,

    /// Print `{hash_hex, hash_byte_array}` JSON instead of two plain lines.
    #[arg(long)]
    pub json: bool,
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let raw = crate::read_input(&args.image)?;
    let digest = zkpa_crypto::hash_image(&raw)
        .with_context(|| format!("hashing {}", args.image.display()))?;
    println!("{}", render(&digest, args.json)?);
    Ok(0)
}

fn render(digest: &ImageDigest, json: bool) -> Result<String> {
    if json {
        let body = serde_json::json!({
            "hash_hex": digest.to_hex(),
            "hash_byte_array": digest.to_byte_array_literal(),
        });
        return Ok(serde_json::to_string_pretty(&body)?);
    }
    Ok(format!(
        "hash_hex:        {}\nhash_byte_array: {}",
        digest.to_hex(),
        digest.to_byte_array_literal()
    ))
}
