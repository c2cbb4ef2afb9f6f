//! # Pipeline Configuration
//!
//! Long-lived key material is provisioned out of band and loaded once at
//! process start. Sources, highest precedence first:
//!
//! 1. environment variables (`ZKPA_CAMERA_KEY`, `ZKPA_AUTHORITY_KEY`,
//!    `ZKPA_KEEPER_PUBKEY_X`, `ZKPA_KEEPER_PUBKEY_Y`, `ZKPA_ECDH_SCALAR`);
//! 2. a YAML file named by `--config` or `ZKPA_CONFIG`.
//!
//! ```yaml
//! camera_key: "ec28f3b5..."
//! authority_key: "ec28f06a..."
//! keeper_pubkey_x: "0x022a7688..."
//! keeper_pubkey_y: "0x076d4453..."
//! # omit for a fresh scalar per request
//! ecdh_scalar: "0x3f9e36da..."
//! ```
//!
//! Every value is validated by [`RawPipelineConfig::resolve`]. A
//! [`PipelineConfig`] only exists once all keys have parsed.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use zkpa_core::AttestError;
use zkpa_crypto::{EcdhScalar, KeeperPublicKey, SignatureAuthority};

/// Camera private key, 64 hex digits.
pub const ENV_CAMERA_KEY: &str = "ZKPA_CAMERA_KEY";
/// Authority private key, 64 hex digits.
pub const ENV_AUTHORITY_KEY: &str = "ZKPA_AUTHORITY_KEY";
/// Keeper public point X coordinate.
pub const ENV_KEEPER_PUBKEY_X: &str = "ZKPA_KEEPER_PUBKEY_X";
/// Keeper public point Y coordinate.
pub const ENV_KEEPER_PUBKEY_Y: &str = "ZKPA_KEEPER_PUBKEY_Y";
/// Fixed ECDH scalar. Unset means a fresh scalar per request.
pub const ENV_ECDH_SCALAR: &str = "ZKPA_ECDH_SCALAR";
/// Path to the YAML configuration file.
pub const ENV_CONFIG_PATH: &str = "ZKPA_CONFIG";

/// Configuration loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required value is absent from both the file and the environment.
    #[error("missing {field} (set it in the config file or via {env_var})")]
    Missing {
        field: &'static str,
        env_var: &'static str,
    },

    /// A value is present but is not valid key material.
    #[error("invalid {field}: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: AttestError,
    },
}

/// How the per-request ECDH scalar is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarPolicy {
    /// Draw a fresh scalar for every request.
    Ephemeral,
    /// Reuse one provisioned scalar.
    Fixed(EcdhScalar),
}

impl ScalarPolicy {
    /// The scalar for one attestation request.
    pub fn scalar_for_request(&self) -> EcdhScalar {
        match self {
            Self::Ephemeral => EcdhScalar::random(),
            Self::Fixed(scalar) => scalar.clone(),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ephemeral => "ephemeral",
            Self::Fixed(_) => "fixed",
        }
    }
}

/// A secret hex string, wiped when dropped.
pub type SecretString = Zeroizing<String>;

/// Unvalidated configuration as read from YAML and the environment.
///
/// Holds secret hex strings, so it implements neither `Debug` nor
/// `Serialize`.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPipelineConfig {
    #[serde(default)]
    pub camera_key: Option<SecretString>,
    #[serde(default)]
    pub authority_key: Option<SecretString>,
    #[serde(default)]
    pub keeper_pubkey_x: Option<String>,
    #[serde(default)]
    pub keeper_pubkey_y: Option<String>,
    #[serde(default)]
    pub ecdh_scalar: Option<SecretString>,
}

impl RawPipelineConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map(Zeroizing::new)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&text)
    }

    /// Override fields with values from `lookup` (environment-style names).
    pub fn overlay_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        overlay(&mut self.camera_key, lookup(ENV_CAMERA_KEY));
        overlay(&mut self.authority_key, lookup(ENV_AUTHORITY_KEY));
        overlay(&mut self.keeper_pubkey_x, lookup(ENV_KEEPER_PUBKEY_X));
        overlay(&mut self.keeper_pubkey_y, lookup(ENV_KEEPER_PUBKEY_Y));
        overlay(&mut self.ecdh_scalar, lookup(ENV_ECDH_SCALAR));
        self
    }

    /// Validate every value and build the typed configuration.
    pub fn resolve(self) -> Result<PipelineConfig, ConfigError> {
        let camera_hex = require(self.camera_key, "camera_key", ENV_CAMERA_KEY)?;
        let authority_hex = require(self.authority_key, "authority_key", ENV_AUTHORITY_KEY)?;
        let keeper_x = require(self.keeper_pubkey_x, "keeper_pubkey_x", ENV_KEEPER_PUBKEY_X)?;
        let keeper_y = require(self.keeper_pubkey_y, "keeper_pubkey_y", ENV_KEEPER_PUBKEY_Y)?;

        let camera = SignatureAuthority::from_hex(&camera_hex).map_err(|source| {
            ConfigError::Invalid {
                field: "camera_key",
                source,
            }
        })?;
        let authority = SignatureAuthority::from_hex(&authority_hex).map_err(|source| {
            ConfigError::Invalid {
                field: "authority_key",
                source,
            }
        })?;
        let keeper = KeeperPublicKey::from_hex(&keeper_x, &keeper_y).map_err(|source| {
            ConfigError::Invalid {
                field: "keeper_pubkey",
                source,
            }
        })?;
        let scalar_policy = match self.ecdh_scalar {
            Some(hex) => ScalarPolicy::Fixed(EcdhScalar::from_hex(&hex).map_err(|source| {
                ConfigError::Invalid {
                    field: "ecdh_scalar",
                    source,
                }
            })?),
            None => ScalarPolicy::Ephemeral,
        };

        Ok(PipelineConfig {
            camera,
            authority,
            keeper,
            scalar_policy,
        })
    }
}

/// Replace `slot` with a non-blank `value`.
fn overlay<T: From<String>>(slot: &mut Option<T>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *slot = Some(T::from(value));
    }
}

fn require<T>(
    value: Option<T>,
    field: &'static str,
    env_var: &'static str,
) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing { field, env_var })
}

/// Validated key material for the attestation pipeline.
#[derive(Debug)]
pub struct PipelineConfig {
    /// Camera identity key.
    pub camera: SignatureAuthority,
    /// Certifying authority key.
    pub authority: SignatureAuthority,
    /// Keeper agreement key.
    pub keeper: KeeperPublicKey,
    /// Per-request ECDH scalar policy.
    pub scalar_policy: ScalarPolicy,
}

impl PipelineConfig {
    /// Load from an optional YAML file, then the process environment.
    ///
    /// With no explicit path, `ZKPA_CONFIG` is consulted. With neither, the
    /// environment alone must supply every value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from));
        let raw = match path {
            Some(p) => RawPipelineConfig::from_file(&p)?,
            None => RawPipelineConfig::default(),
        };
        let config = raw.overlay_env(|var| std::env::var(var).ok()).resolve()?;
        tracing::info!(
            camera = %config.camera.public_key(),
            authority = %config.authority.public_key(),
            scalar_policy = config.scalar_policy.name(),
            "pipeline configuration loaded"
        );
        Ok(config)
    }
}
