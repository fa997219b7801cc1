//! Configuration settings for ssl-setup.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SetupError;

/// Main configuration structure for the tool.
///
/// Every field has a default matching the certbot/STRATO deployment layout,
/// so the tool runs without any config file present.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub letsencrypt: LetsEncryptConfig,
    #[serde(default)]
    pub certbot: CertbotConfig,
    #[serde(default)]
    pub install: InstallConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Let's Encrypt output layout.
#[derive(Debug, Clone, Deserialize)]
pub struct LetsEncryptConfig {
    /// Directory under which certbot places per-domain issuances.
    #[serde(default = "default_live_dir")]
    pub live_dir: PathBuf,
    /// Use the Let's Encrypt staging server.
    #[serde(default)]
    pub staging: bool,
}

/// Certbot invocation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CertbotConfig {
    /// Name or path of the certbot binary.
    #[serde(default = "default_certbot_binary")]
    pub binary: String,
    /// Prefix privileged subprocess calls with sudo.
    #[serde(default = "default_elevate")]
    pub elevate: bool,
    /// Maximum time to wait for certbot, in seconds.
    ///
    /// Absent means wait indefinitely. Standalone HTTP-01 issuance can block
    /// on DNS propagation and CA latency, so no bound is enforced by default.
    pub timeout_seconds: Option<u64>,
}

/// Target paths for the installed certificate and key.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    /// Destination for the certificate chain.
    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,
    /// Destination for the private key.
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_live_dir() -> PathBuf {
    PathBuf::from("/etc/letsencrypt/live")
}

fn default_certbot_binary() -> String {
    "certbot".to_string()
}

fn default_elevate() -> bool {
    true
}

fn default_cert_path() -> PathBuf {
    PathBuf::from("/datadrive/strato-getting-started/ssl/certs/server.pem")
}

fn default_key_path() -> PathBuf {
    PathBuf::from("/datadrive/strato-getting-started/ssl/private/server.key")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LetsEncryptConfig {
    fn default() -> Self {
        Self {
            live_dir: default_live_dir(),
            staging: false,
        }
    }
}

impl Default for CertbotConfig {
    fn default() -> Self {
        Self {
            binary: default_certbot_binary(),
            elevate: default_elevate(),
            timeout_seconds: None,
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            cert_path: default_cert_path(),
            key_path: default_key_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SetupError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| SetupError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from the given path, or fall back to defaults if the
    /// file does not exist. A file that exists but fails to parse is still
    /// an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Certbot timeout as a `Duration`, if one is configured.
    pub fn certbot_timeout(&self) -> Option<Duration> {
        self.certbot.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), SetupError> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SetupError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        // Validate log format
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(SetupError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }
}
