//! # Decrypt CLI — Keeper-side recovery of the camera identifier.
//!
//! ```bash
//! zkpa decrypt --keeper-key 0x10203040506 witness.json
//! ```
//!
//! Rebuilds the identifier key from the keeper scalar and the witness's
//! `identifier_deckey`, decrypts `camera_identifier`, and reports the
//! recovered camera key next to the signature check of the bundle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use zkpa_crypto::KeeperKeyPair;
use zkpa_zkp::{recover_identifier, WitnessBundle, WitnessFormat};

/// Arguments for the `decrypt` subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Keeper private scalar as hex.
    #[arg(long)]
    pub keeper_key: String,

    /// Witness file produced by `zkpa witness`.
    pub witness: PathBuf,

    /// Encoding of the witness file: json, toml or noir.
    #[arg(long, default_value = "json")]
    pub format: WitnessFormat,
}

/// Execute the decrypt subcommand.
pub fn run_decrypt(args: &DecryptArgs) -> Result<u8> {
    let keeper = KeeperKeyPair::from_scalar_hex(&args.keeper_key).context("parsing --keeper-key")?;
    let text = String::from_utf8(crate::read_input(&args.witness)?)
        .with_context(|| format!("{} is not UTF-8", args.witness.display()))?;
    let witness = WitnessBundle::parse(&text, args.format)
        .with_context(|| format!("parsing {}", args.witness.display()))?;
    println!("{}", recover(&keeper, &witness)?);
    Ok(0)
}

fn recover(keeper: &KeeperKeyPair, witness: &WitnessBundle) -> Result<String> {
    let plaintext = recover_identifier(keeper, witness).context("decrypting camera identifier")?;
    let camera_key = plaintext
        .camera_public_key()
        .context("recovered identifier does not hold a valid camera key; wrong keeper key?")?;
    let matches = witness.camera_public_key().ok().as_ref() == Some(&camera_key);
    let attested = witness.verify_attestations().unwrap_or(false);
    tracing::info!(matches, attested, "camera identifier recovered");

    Ok(format!(
        "nonce:            {}\n\
         camera_key:       {}\n\
         camera_pubkey_x:  {}\n\
         matches_witness:  {matches}\n\
         attestations_ok:  {attested}",
        plaintext.nonce().to_hex(),
        camera_key.to_hex(),
        camera_key.x_hex(),
    ))
}
