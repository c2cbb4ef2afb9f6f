//! # zkpa CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zkpa_cli::decrypt::{run_decrypt, DecryptArgs};
use zkpa_cli::hash::{run_hash, HashArgs};
use zkpa_cli::keys::{run_keeper_pubkey, run_pubkey, KeeperPubkeyArgs, PubkeyArgs};
use zkpa_cli::prove::{run_prove, ProveArgs};
use zkpa_cli::witness::{run_witness, WitnessArgs};

/// Camera attestation toolchain.
///
/// Hashes images, signs them with the camera key, certifies the camera
/// under the authority key, encrypts the camera identifier to the keeper
/// and emits the witness for the proving circuit.
#[derive(Parser, Debug)]
#[command(name = "zkpa", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML key configuration (falls back to `ZKPA_CONFIG`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical BLAKE3 digest of an image.
    Hash(HashArgs),

    /// Print the secp256k1 public key of a private key.
    Pubkey(PubkeyArgs),

    /// Print the BabyJubJub public point of a keeper scalar.
    KeeperPubkey(KeeperPubkeyArgs),

    /// Attest an image and emit the circuit witness.
    Witness(WitnessArgs),

    /// Recover the camera identifier from a witness as the keeper.
    Decrypt(DecryptArgs),

    /// Attest an image and run the external prover.
    Prove(ProveArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "zkpa CLI starting");

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Hash(args) => run_hash(args),
        Commands::Pubkey(args) => run_pubkey(args),
        Commands::KeeperPubkey(args) => run_keeper_pubkey(args),
        Commands::Witness(args) => run_witness(args, config),
        Commands::Decrypt(args) => run_decrypt(args),
        Commands::Prove(args) => run_prove(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zkpa_zkp::WitnessFormat;

    #[test]
    fn cli_parse_hash() {
        let cli = Cli::try_parse_from(["zkpa", "hash", "photo.png"]).unwrap();
        if let Commands::Hash(args) = cli.command {
            assert_eq!(args.image, PathBuf::from("photo.png"));
            assert!(!args.json);
        } else {
            panic!("expected hash");
        }
    }

    #[test]
    fn cli_parse_keeper_pubkey_kebab_case() {
        let cli = Cli::try_parse_from(["zkpa", "keeper-pubkey", "0x10203040506"]).unwrap();
        assert!(matches!(cli.command, Commands::KeeperPubkey(ref a) if a.scalar == "0x10203040506"));
    }

    #[test]
    fn cli_parse_witness_defaults_to_json() {
        let cli = Cli::try_parse_from(["zkpa", "witness", "photo.png"]).unwrap();
        if let Commands::Witness(args) = cli.command {
            assert_eq!(args.format, WitnessFormat::Json);
            assert!(args.nonce.is_none());
            assert!(args.out.is_none());
        } else {
            panic!("expected witness");
        }
    }

    #[test]
    fn cli_parse_witness_all_flags() {
        let cli = Cli::try_parse_from([
            "zkpa",
            "--config",
            "zkpa.yaml",
            "witness",
            "photo.png",
            "--format",
            "toml",
            "--nonce",
            "abcd",
            "--out",
            "Prover.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("zkpa.yaml")));
        if let Commands::Witness(args) = cli.command {
            assert_eq!(args.format, WitnessFormat::Toml);
            assert_eq!(args.nonce.as_deref(), Some("abcd"));
            assert_eq!(args.out, Some(PathBuf::from("Prover.toml")));
        } else {
            panic!("expected witness");
        }
    }

    #[test]
    fn cli_parse_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["zkpa", "witness", "p.png", "--format", "xml"]).is_err());
    }

    #[test]
    fn cli_parse_decrypt_requires_keeper_key() {
        assert!(Cli::try_parse_from(["zkpa", "decrypt", "witness.json"]).is_err());
        let cli =
            Cli::try_parse_from(["zkpa", "decrypt", "--keeper-key", "0x01", "witness.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Decrypt(_)));
    }

    #[test]
    fn cli_parse_prove() {
        let cli = Cli::try_parse_from(["zkpa", "prove", "--circuit-dir", "circuits/zkpa", "p.png"])
            .unwrap();
        if let Commands::Prove(args) = cli.command {
            assert_eq!(args.circuit_dir, PathBuf::from("circuits/zkpa"));
            assert_eq!(args.program, "nargo");
            assert_eq!(args.package, "zkpa");
        } else {
            panic!("expected prove");
        }
    }

    #[test]
    fn cli_parse_verbose_count() {
        let cli = Cli::try_parse_from(["zkpa", "-vv", "pubkey", "01"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
