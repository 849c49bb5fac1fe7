//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_MAX_CONCURRENT_SANDBOXES, DEFAULT_MAX_OUTPUT_BYTES,
    DEFAULT_MAX_QUEUE_DEPTH, DEFAULT_MEMORY_LIMIT_MB, DEFAULT_REQUEST_DEADLINE_MS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TIME_LIMIT_MS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub sandbox: SandboxConfig,
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub http_timeout_seconds: u64,
}

/// Bearer-token authentication configuration
///
/// Auth policy itself lives outside this service; when `token` is set the
/// execute endpoint requires a matching `Authorization: Bearer` header,
/// when unset the check is disabled.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

/// Sandbox resource limit configuration
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Wall-clock limit per sandboxed run
    pub time_limit_ms: u64,
    /// Memory ceiling in megabytes
    pub memory_limit_mb: u64,
    /// Cap on captured stdout/stderr, each
    pub max_output_bytes: usize,
    /// When true, failure to detach the network namespace aborts the run
    /// instead of degrading to rlimit-only confinement
    pub strict_network_isolation: bool,
}

/// Execution engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of simultaneously executing sandboxes
    pub max_concurrent: usize,
    /// Requests allowed to wait for a sandbox slot before failing fast
    pub max_queue_depth: usize,
    /// Overall per-request deadline (synthesis + execution + comparison)
    pub request_deadline_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            sandbox: SandboxConfig::from_env()?,
            engine: EngineConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECONDS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_TIMEOUT_SECONDS".to_string()))?,
        })
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            token: env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }
}

impl SandboxConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            time_limit_ms: env::var("SANDBOX_TIME_LIMIT_MS")
                .unwrap_or_else(|_| DEFAULT_TIME_LIMIT_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SANDBOX_TIME_LIMIT_MS".to_string()))?,
            memory_limit_mb: env::var("SANDBOX_MEMORY_LIMIT_MB")
                .unwrap_or_else(|_| DEFAULT_MEMORY_LIMIT_MB.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SANDBOX_MEMORY_LIMIT_MB".to_string()))?,
            max_output_bytes: env::var("SANDBOX_MAX_OUTPUT_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_OUTPUT_BYTES.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SANDBOX_MAX_OUTPUT_BYTES".to_string()))?,
            strict_network_isolation: env::var("SANDBOX_STRICT_NETWORK_ISOLATION")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    /// Wall-clock limit as a `Duration`
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_concurrent: usize = env::var("ENGINE_MAX_CONCURRENT")
            .unwrap_or_else(|_| DEFAULT_MAX_CONCURRENT_SANDBOXES.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ENGINE_MAX_CONCURRENT".to_string()))?;

        if max_concurrent == 0 {
            return Err(ConfigError::InvalidValue(
                "ENGINE_MAX_CONCURRENT must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            max_concurrent,
            max_queue_depth: env::var("ENGINE_MAX_QUEUE_DEPTH")
                .unwrap_or_else(|_| DEFAULT_MAX_QUEUE_DEPTH.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ENGINE_MAX_QUEUE_DEPTH".to_string()))?,
            request_deadline_ms: env::var("ENGINE_REQUEST_DEADLINE_MS")
                .unwrap_or_else(|_| DEFAULT_REQUEST_DEADLINE_MS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ENGINE_REQUEST_DEADLINE_MS".to_string()))?,
        })
    }

    /// Overall request deadline as a `Duration`
    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }
}

impl Default for Config {
    /// Built-in defaults, independent of the environment. Used by tests and
    /// anywhere a config is needed without consulting env vars.
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                rust_log: "info".to_string(),
                http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
            },
            auth: AuthConfig { token: None },
            sandbox: SandboxConfig {
                time_limit_ms: DEFAULT_TIME_LIMIT_MS,
                memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
                max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
                strict_network_isolation: false,
            },
            engine: EngineConfig {
                max_concurrent: DEFAULT_MAX_CONCURRENT_SANDBOXES,
                max_queue_depth: DEFAULT_MAX_QUEUE_DEPTH,
                request_deadline_ms: DEFAULT_REQUEST_DEADLINE_MS,
            },
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
