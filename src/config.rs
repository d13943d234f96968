use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub pharo: PharoConfig,
}

/// Where the PharoSmalltalkInteropServer listens
///
/// `port` stays unset unless configured so that `PHARO_SIS_PORT` can apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PharoConfig {
    pub host: String,
    pub port: Option<u16>,
}

impl Default for PharoConfig {
    fn default() -> Self {
        Self {
            host: crate::client::DEFAULT_HOST.to_string(),
            port: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            pharo: PharoConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply command-line overrides; flags beat the file
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.pharo.host = host;
        }
        if port.is_some() {
            self.pharo.port = port;
        }
        self
    }

    /// Parsed log level, if the configured one is recognised
    pub fn level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.as_deref().and_then(|level| level.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.pharo.host, "localhost");
        assert!(config.pharo.port.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let file = write_config("log_level: debug\npharo:\n  host: pharo.local\n  port: 9090\n");
        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.level_filter(), Some(log::LevelFilter::Debug));
        assert_eq!(config.pharo.host, "pharo.local");
        assert_eq!(config.pharo.port, Some(9090));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("pharo:\n  port: 8087\n");
        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.pharo.host, "localhost");
        assert_eq!(config.pharo.port, Some(8087));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/pharo-interop-mcp.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("pharo: [not, a, map]\n");
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("10.0.0.2".to_string()), Some(9999));
        assert_eq!(config.pharo.host, "10.0.0.2");
        assert_eq!(config.pharo.port, Some(9999));

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_unknown_log_level() {
        let config = Config {
            log_level: Some("chatty".to_string()),
            ..Config::default()
        };
        assert!(config.level_filter().is_none());
    }
}
