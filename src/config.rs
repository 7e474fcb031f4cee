//! Configuration management for the Grouper authentication service
//!
//! Settings come from `config.toml` layered with `GROUPER_AUTH__*` environment
//! overrides. Backend access keys are expected through the environment and are
//! held in [`Secret`] so they never show up in `Debug` output or logs.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use zeroize::Zeroize;

const ENV_PREFIX: &str = "GROUPER_AUTH";
const ENV_SEPARATOR: &str = "__";

/// String secret with a redacted `Debug` that is wiped on drop.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthServerConfig {
    // ═══ TRANSPORT ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,
    pub port: u16,

    // ═══ AUTHENTICATION LIMITS ═══
    /// Upper bound on a single credential lookup
    pub lookup_timeout_ms: u64,
    /// Upper bound on a single password verification
    pub verify_timeout_ms: u64,
    pub max_username_length: usize,
    pub max_password_length: usize,

    /// Hash used to equalise the cost of unknown-user attempts. When unset a
    /// reference hash is generated at startup from `hashing`.
    #[serde(default)]
    pub timing_reference_hash: Option<String>,

    #[serde(default)]
    pub hashing: HashingConfig,

    pub store: StoreConfig,
}

/// Argon2id parameters used for the generated reference hash
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Which credential backend the service reads from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Dynamodb,
    Memory,
}

/// A single username/hash pair for the in-memory backend
#[derive(Debug, Deserialize, Clone)]
pub struct StaticUser {
    pub username: String,
    pub password_hash: String,
}

/// Credential backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    // ═══ DYNAMODB ═══
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB instance
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,
    #[serde(default = "default_hash_attribute")]
    pub hash_attribute: String,
    #[serde(default)]
    pub access_key_id: Option<Secret>,
    #[serde(default)]
    pub secret_access_key: Option<Secret>,

    // ═══ MEMORY ═══
    #[serde(default)]
    pub users: Vec<StaticUser>,
}

fn default_key_attribute() -> String {
    "username".to_string()
}

fn default_hash_attribute() -> String {
    "password".to_string()
}

impl AuthServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config_paths = [
            "grouper-auth/config", // container layout: /app/grouper-auth/config.toml
            "config",              // local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in config_paths {
            match Self::from_source(File::with_name(config_path)) {
                Ok(config) => return Ok(config),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ConfigError::Message("no configuration path".into())))
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_source(File::from(path))
    }

    fn from_source<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let config: AuthServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.lookup_timeout_ms == 0 || self.verify_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "lookup_timeout_ms and verify_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.max_username_length == 0 || self.max_password_length == 0 {
            return Err(ConfigError::Message(
                "input length limits must be greater than 0".into(),
            ));
        }

        if self.hashing.memory_kib < 8 * self.hashing.parallelism
            || self.hashing.iterations == 0
            || self.hashing.parallelism == 0
        {
            return Err(ConfigError::Message("invalid argon2 parameters".into()));
        }

        self.store.validate()
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            StoreBackend::Dynamodb => {
                if self.region.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::Message("store.region is required".into()));
                }
                if self.table_name.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::Message("store.table_name is required".into()));
                }
                if self.access_key_id.is_none() || self.secret_access_key.is_none() {
                    return Err(ConfigError::Message(
                        "store.access_key_id and store.secret_access_key must be supplied".into(),
                    ));
                }
                Ok(())
            }
            StoreBackend::Memory => {
                if self.users.iter().any(|u| u.username.is_empty()) {
                    return Err(ConfigError::Message(
                        "store.users entries need a non-empty username".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}
