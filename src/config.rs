//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `RESOLVEIT_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("resolveit").to_string_lossy().to_string())
        .unwrap_or_else(|| "./resolveit_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("resolveit.db")
    }

    /// Directory for evidence uploads
    pub fn upload_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("uploads")
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_upload_bytes: default_max_upload(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens. Empty means a random per-process secret.
    #[serde(default)]
    pub token_secret: String,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,

    /// Admin account created at startup when missing
    pub admin_email: Option<String>,

    pub admin_password: Option<String>,
}

fn default_token_ttl() -> u64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_hours: default_token_ttl(),
            admin_email: None,
            admin_password: None,
        }
    }
}

/// SLA escalation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_escalation_enabled")]
    pub enabled: bool,

    #[serde(default = "default_sla_hours")]
    pub sla_hours: u64,

    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    #[serde(default = "default_senior_admin_email")]
    pub senior_admin_email: String,
}

fn default_escalation_enabled() -> bool {
    true
}

fn default_sla_hours() -> u64 {
    48
}

fn default_check_interval() -> u64 {
    3600 // hourly
}

fn default_senior_admin_email() -> String {
    "senior-admin@resolveit.com".to_string()
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: default_escalation_enabled(),
            sla_hours: default_sla_hours(),
            check_interval_secs: default_check_interval(),
            senior_admin_email: default_senior_admin_email(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("resolveit").join("config.toml")),
            Some(PathBuf::from("/etc/resolveit/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `RESOLVEIT_*` overrides read through `lookup`.
    /// Unparseable numbers and booleans are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Storage
        if let Some(data_dir) = lookup("RESOLVEIT_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // API
        if let Some(host) = lookup("RESOLVEIT_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("RESOLVEIT_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Auth
        if let Some(secret) = lookup("RESOLVEIT_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Some(ttl) = lookup("RESOLVEIT_TOKEN_TTL_HOURS").and_then(|t| t.parse().ok()) {
            self.auth.token_ttl_hours = ttl;
        }
        if let Some(email) = lookup("RESOLVEIT_ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }
        if let Some(password) = lookup("RESOLVEIT_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }

        // Escalation
        if let Some(enabled) = lookup("RESOLVEIT_ESCALATION_ENABLED").and_then(|v| parse_bool(&v)) {
            self.escalation.enabled = enabled;
        }
        if let Some(hours) = lookup("RESOLVEIT_SLA_HOURS").and_then(|h| h.parse().ok()) {
            self.escalation.sla_hours = hours;
        }

        // Logging
        if let Some(level) = lookup("RESOLVEIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("RESOLVEIT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ResolveIT Configuration
#
# Environment variables override these settings:
# - RESOLVEIT_DATA_DIR
# - RESOLVEIT_API_HOST
# - RESOLVEIT_API_PORT
# - RESOLVEIT_TOKEN_SECRET
# - RESOLVEIT_TOKEN_TTL_HOURS
# - RESOLVEIT_ADMIN_EMAIL
# - RESOLVEIT_ADMIN_PASSWORD
# - RESOLVEIT_ESCALATION_ENABLED
# - RESOLVEIT_SLA_HOURS
# - RESOLVEIT_LOG_LEVEL
# - RESOLVEIT_LOG_FORMAT

[storage]
# Directory for the database and uploaded evidence
data_dir = "~/.local/share/resolveit"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8080

# Allowed CORS origins
cors_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

# Largest accepted request body, including evidence files (bytes)
max_upload_bytes = 10485760

# Request timeout in seconds
request_timeout_secs = 30

[auth]
# Secret used to sign bearer tokens. Leave empty to generate one per run
# (tokens then stop working after a restart).
token_secret = ""

# How long a login stays valid (hours)
token_ttl_hours = 24

# Admin account created at startup if missing
# admin_email = "admin@resolveit.com"
# admin_password = "change-me"

[escalation]
# Escalate complaints that stay NEW or UNDER_REVIEW past the SLA
enabled = true

# SLA in hours
sla_hours = 48

# How often to check for SLA breaches (seconds)
check_interval_secs = 3600

# Receives a notice for every escalation
senior_admin_email = "senior-admin@resolveit.com"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/resolveit/resolveit.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.auth.admin_email.is_none());
        assert_eq!(config.escalation.sla_hours, 48);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nport = 9000\n\n[escalation]\nenabled = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert!(!config.escalation.enabled);
        assert_eq!(config.escalation.check_interval_secs, 3600);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RESOLVEIT_DATA_DIR", "/srv/resolveit"),
            ("RESOLVEIT_API_PORT", "9999"),
            ("RESOLVEIT_TOKEN_SECRET", "s3cret"),
            ("RESOLVEIT_ADMIN_EMAIL", "root@example.com"),
            ("RESOLVEIT_ESCALATION_ENABLED", "no"),
            ("RESOLVEIT_SLA_HOURS", "not-a-number"),
            ("RESOLVEIT_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/srv/resolveit");
        assert_eq!(
            config.storage.database_path(),
            PathBuf::from("/srv/resolveit/resolveit.db")
        );
        assert_eq!(config.api.port, 9999);
        assert_eq!(config.auth.token_secret, "s3cret");
        assert_eq!(config.auth.admin_email.as_deref(), Some("root@example.com"));
        assert!(!config.escalation.enabled);
        assert_eq!(config.escalation.sla_hours, 48);
        assert_eq!(config.logging.format, "json");
    }
}
