use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::zone::{parse_upstream, HandlerConfig, ZoneConfig};
use crate::transport::{split_protocol_host_port, Transport};
use crate::zone::normalize_zone;

/// Main configuration structure for Ferrous DoH
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listener configuration (address, banner)
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Server blocks served by this instance
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            zones: default_zones(),
        }
    }
}

fn default_zones() -> Vec<ZoneConfig> {
    vec![ZoneConfig {
        zone: ".".to_string(),
        handler: HandlerConfig::Forward {
            upstreams: vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()],
            timeout_ms: 2000,
        },
    }]
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-doh.toml in current directory
    /// 3. /etc/ferrous-doh/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ferrous-doh.toml").exists() {
            Self::from_file("ferrous-doh.toml")?
        } else if std::path::Path::new("/etc/ferrous-doh/config.toml").exists() {
            Self::from_file("/etc/ferrous-doh/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(address) = overrides.address {
            self.server.address = address;
        }
        if overrides.quiet {
            self.server.quiet = true;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (protocol, _, port) = split_protocol_host_port(&self.server.address)
            .map_err(ConfigError::Validation)?;

        let transport: Transport = protocol.parse().map_err(ConfigError::Validation)?;
        if transport != Transport::Http {
            return Err(ConfigError::Validation(format!(
                "Unsupported transport '{}' in {}: only {} is served",
                transport,
                self.server.address,
                Transport::Http.scheme()
            )));
        }

        if port.parse::<u16>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid port '{}' in {}",
                port, self.server.address
            )));
        }

        if self.zones.is_empty() {
            return Err(ConfigError::Validation("No zones configured".to_string()));
        }

        let mut seen = HashSet::new();
        for site in &self.zones {
            let zone = normalize_zone(&site.zone)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
            if !seen.insert(zone.clone()) {
                return Err(ConfigError::Validation(format!(
                    "Zone '{}' is defined more than once",
                    zone
                )));
            }

            if let HandlerConfig::Forward {
                upstreams,
                timeout_ms,
            } = &site.handler
            {
                if upstreams.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "Zone '{}' forwards to no upstreams",
                        zone
                    )));
                }
                for upstream in upstreams {
                    parse_upstream(upstream).map_err(ConfigError::Validation)?;
                }
                if *timeout_ms == 0 {
                    return Err(ConfigError::Validation(format!(
                        "Zone '{}' has a zero forward timeout",
                        zone
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub address: Option<String>,
    pub quiet: bool,
    pub log_level: Option<String>,
}
