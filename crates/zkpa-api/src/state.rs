//! # Application State
//!
//! Shared state for the Axum application. The attestation pipeline holds
//! only validated, immutable key material, so one instance behind an `Arc`
//! serves every request.

use std::sync::Arc;

use thiserror::Error;

use zkpa_zkp::{AttestationPipeline, PipelineConfig};

/// Server configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen port (`PORT`, default 8080).
    pub port: u16,
    /// Maximum accepted request body in bytes.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            body_limit: 16 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Read `PORT` from the environment. Unset falls back to 8080.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPort` if `PORT` is set but is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_port_var(std::env::var("PORT").ok())
    }

    /// Build the configuration from the raw `PORT` value.
    pub fn from_port_var(port: Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port: u16 = match port {
            None => defaults.port,
            Some(raw) => match raw.trim().parse() {
                Ok(port) => port,
                Err(e) => return Err(ConfigError::InvalidPort(raw, e.to_string())),
            },
        };
        Ok(Self { port, ..defaults })
    }
}

/// Errors reading server configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}: {1}")]
    InvalidPort(String, String),
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<AttestationPipeline>,
    pub config: AppConfig,
}

impl AppState {
    /// State over a validated pipeline configuration with default server settings.
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self::with_config(pipeline, AppConfig::default())
    }

    /// State with explicit server settings.
    pub fn with_config(pipeline: PipelineConfig, config: AppConfig) -> Self {
        Self {
            pipeline: Arc::new(AttestationPipeline::new(pipeline)),
            config,
        }
    }
}
