//! Configuration management for companyprofiler
//!
//! All configuration is loaded from `./config/companyprofiler.toml`.
//! No hardcoded defaults exist in source code - all defaults are in the config template.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to working directory
pub const CONFIG_PATH: &str = "./config/companyprofiler.toml";

/// Default configuration file content - this is the ONLY place defaults exist
pub const DEFAULT_CONFIG: &str = include_str!("../config/companyprofiler.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid URL in '{field}': {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub enrichment: EnrichmentConfig,
    pub scrape: ScrapeConfig,
    pub dns: DnsConfig,
    pub providers: ProvidersConfig,
}

/// HTTP client configuration shared by outbound lookups
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

/// Enrichment lookup service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    pub api_base_url: String,
    /// Environment variable the API key is read from at startup
    pub api_key_env: String,
    pub timeout_secs: u64,
}

/// Website scrape limits
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    pub max_body_bytes: u64,
    pub timeout_secs: u64,
    /// Explicit URL to fetch instead of one built from the domain.
    /// Used by tests with a mock server.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// DNS resolution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    pub lookup_timeout_secs: u64,
}

/// Host-substring to provider display-name mapping tables.
/// Matched case-insensitively against MX exchange / NS hosts.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    pub mail: HashMap<String, String>,
    pub hosting: HashMap<String, String>,
}

impl ProvidersConfig {
    /// Map an MX exchange host to a mail provider display name.
    pub fn mail_provider_for(&self, mx_host: &str) -> Option<String> {
        let host = mx_host.to_lowercase();
        self.mail
            .iter()
            .find(|(marker, _)| host.contains(marker.as_str()))
            .map(|(_, name)| name.clone())
    }

    /// Map a name-server host to a hosting provider display name.
    pub fn hosting_provider_for(&self, ns_host: &str) -> Option<String> {
        let host = ns_host.to_lowercase();
        self.hosting
            .iter()
            .find(|(marker, _)| host.contains(marker.as_str()))
            .map(|(_, name)| name.clone())
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(Path::new(CONFIG_PATH))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the embedded defaults. Used when no config file exists on disk.
    pub fn embedded_default() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "http.request_timeout_secs".to_string(),
            });
        }

        match url::Url::parse(&self.enrichment.api_base_url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => {
                return Err(ConfigError::InvalidUrl {
                    field: "enrichment.api_base_url".to_string(),
                    url: self.enrichment.api_base_url.clone(),
                });
            }
        }
        if self.enrichment.api_key_env.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "enrichment.api_key_env".to_string(),
            });
        }

        if self.scrape.max_body_bytes == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "scrape.max_body_bytes".to_string(),
            });
        }
        if self.scrape.timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "scrape.timeout_secs".to_string(),
            });
        }
        if self.dns.lookup_timeout_secs == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "dns.lookup_timeout_secs".to_string(),
            });
        }

        Ok(())
    }

    /// Create default configuration file at the standard location
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_CONFIG.as_bytes())?;

        Ok(path.to_path_buf())
    }

    /// Check if stdin is a TTY (interactive terminal)
    pub fn is_interactive() -> bool {
        atty::is(atty::Stream::Stdin)
    }

    /// Prompt user to create default config (only in interactive mode)
    pub fn prompt_create_config() -> Result<Option<PathBuf>, ConfigError> {
        if !Self::is_interactive() {
            return Ok(None);
        }

        print!("Configuration file not found. Create default config? [Y/n] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input.is_empty() || input == "y" || input == "yes" {
            let path = Self::create_default_config()?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}
