//! # Key CLI — Public points of provisioned keys.
//!
//! `pubkey` prints the secp256k1 public key of a camera or authority
//! private key; `keeper-pubkey` prints the BabyJubJub point of a keeper
//! scalar. Both take the private value as hex and never echo it.

use anyhow::{Context, Result};
use clap::Args;

use zkpa_crypto::{KeeperKeyPair, SignatureAuthority};

/// Arguments for the `pubkey` subcommand.
#[derive(Args, Debug)]
pub struct PubkeyArgs {
    /// secp256k1 private key, 32 bytes hex (optional `0x`).
    pub private_key: String,
}

/// Arguments for the `keeper-pubkey` subcommand.
#[derive(Args, Debug)]
pub struct KeeperPubkeyArgs {
    /// Keeper scalar, hex (optional `0x`, left-padded to 32 bytes).
    pub scalar: String,
}

/// Execute the pubkey subcommand.
pub fn run_pubkey(args: &PubkeyArgs) -> Result<u8> {
    println!("{}", render_signing_pubkey(&args.private_key)?);
    Ok(0)
}

/// Execute the keeper-pubkey subcommand.
pub fn run_keeper_pubkey(args: &KeeperPubkeyArgs) -> Result<u8> {
    println!("{}", render_keeper_pubkey(&args.scalar)?);
    Ok(0)
}

fn render_signing_pubkey(private_hex: &str) -> Result<String> {
    let key = SignatureAuthority::from_hex(private_hex)
        .context("parsing secp256k1 private key")?
        .public_key();
    Ok(format!(
        "x:          {}\ny:          {}\ncompressed: {}",
        key.x_hex(),
        key.y_hex(),
        key.to_hex()
    ))
}

fn render_keeper_pubkey(scalar_hex: &str) -> Result<String> {
    let keeper = KeeperKeyPair::from_scalar_hex(scalar_hex).context("parsing keeper scalar")?;
    let public = keeper.public_key();
    Ok(format!("x: {}\ny: {}", public.x_hex(), public.y_hex()))
}
