//! # Configuration
//!
//! YAML configuration for an FEC chain: the code, how blocks end, the
//! optional interleaver, decoder limits and logging.
//!
//! ## Configuration Search Path
//!
//! [`FecConfig::load`] uses the first file found:
//! 1. Path given by the `R4W_FEC_CONFIG` environment variable
//! 2. `./r4w-fec.yaml`
//! 3. `fec.yaml` in the user config directory (`~/.config/r4w/` on Linux)
//! 4. `/etc/r4w/fec.yaml`
//!
//! ## Example Configuration
//!
//! ```yaml
//! code:
//!   constraint_length: 7
//!   generators: ["133", "171"]
//! termination: zero_tail
//! interleaver:
//!   rows: 12
//!   cols: 16
//! decoder:
//!   max_steps: 4096
//! logging:
//!   level: debug
//!   format: compact
//! ```

use crate::fec::convolutional::Termination;
use crate::fec::trellis::ConvCodeConfig;
use crate::observe::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "R4W_FEC_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Interleaver dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterleaverConfig {
    pub rows: usize,
    pub cols: usize,
}

/// Decoder limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Longest message (in trellis steps) the decoder accepts. `None` means
    /// limited only by memory.
    pub max_steps: Option<usize>,
}

/// Complete FEC chain configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FecConfig {
    pub code: ConvCodeConfig,
    pub termination: Termination,
    /// No interleaving when absent.
    pub interleaver: Option<InterleaverConfig>,
    pub decoder: DecoderConfig,
    pub logging: LogConfig,
}

impl FecConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default configuration if no file is found. A path named
    /// by `R4W_FEC_CONFIG` that does not exist is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(format!(
                    "{} from {}",
                    path.display(),
                    CONFIG_ENV_VAR
                )));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        tracing::debug!("no FEC config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), code = %config.code, "loaded FEC config");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))
    }

    /// Standard locations checked by [`load`](Self::load), in order.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./r4w-fec.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "r4w") {
            paths.push(dirs.config_dir().join("fec.yaml"));
        }

        paths.push(PathBuf::from("/etc/r4w/fec.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.code
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if let Some(il) = &self.interleaver {
            if il.rows == 0 || il.cols == 0 {
                return Err(ConfigError::Validation(format!(
                    "interleaver must have at least one row and column, got {}x{}",
                    il.rows, il.cols
                )));
            }
        }

        if self.decoder.max_steps == Some(0) {
            return Err(ConfigError::Validation(
                "decoder.max_steps must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            termination: Termination::ZeroTail,
            interleaver: Some(InterleaverConfig { rows: 12, cols: 16 }),
            decoder: DecoderConfig {
                max_steps: Some(4096),
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("r4w-fec-{}-{}.yaml", std::process::id(), name))
    }

    #[test]
    fn test_default_config() {
        let config = FecConfig::default();
        assert_eq!(config.code, ConvCodeConfig::nasa_k7_rate_half());
        assert_eq!(config.termination, Termination::Open);
        assert!(config.interleaver.is_none());
        assert!(config.decoder.max_steps.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
code:
  constraint_length: 5
  generators: ["23", "33"]
termination: zero_tail
interleaver:
  rows: 8
  cols: 6
decoder:
  max_steps: 1024
logging:
  level: warn
"#;

        let config = FecConfig::parse(yaml).unwrap();
        assert_eq!(config.code, ConvCodeConfig::gsm_k5_rate_half());
        assert_eq!(config.termination, Termination::ZeroTail);
        assert_eq!(config.interleaver, Some(InterleaverConfig { rows: 8, cols: 6 }));
        assert_eq!(config.decoder.max_steps, Some(1024));
        assert_eq!(config.logging.level, crate::observe::LogLevel::Warn);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config = FecConfig::parse("termination: zero_tail\n").unwrap();
        assert_eq!(config.termination, Termination::ZeroTail);
        assert_eq!(config.code, ConvCodeConfig::nasa_k7_rate_half());
        assert!(config.interleaver.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FecConfig::parse("termination: sideways\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FecConfig::parse("code:\n  constraint_length: 7\n  generators: [\"9\"]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = FecConfig::default();
        config.code.generators = vec![0o133, 0o400];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = FecConfig::default();
        config.interleaver = Some(InterleaverConfig { rows: 0, cols: 6 });
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = FecConfig::default();
        config.decoder.max_steps = Some(0);
        assert!(config.validate().is_err());

        assert!(matches!(
            FecConfig::parse("code:\n  constraint_length: 20\n  generators: [\"1\"]\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_example_yaml() {
        let yaml = FecConfig::example_yaml();
        assert!(yaml.contains("zero_tail"));
        assert!(yaml.contains("133"));
        let parsed = FecConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.interleaver, Some(InterleaverConfig { rows: 12, cols: 16 }));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let config = FecConfig {
            code: ConvCodeConfig::k9_rate_third(),
            termination: Termination::ZeroTail,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = FecConfig::load_from(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let path = temp_path("does-not-exist");
        assert!(matches!(
            FecConfig::load_from(&path),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn test_load_from_env_var() {
        // Both cases in one test: the variable is process-wide.
        let missing = temp_path("env-missing");
        std::env::set_var(CONFIG_ENV_VAR, &missing);
        let result = FecConfig::load();
        assert!(matches!(result, Err(ConfigError::NotFound(_))), "{:?}", result);

        let path = temp_path("env-present");
        let config = FecConfig {
            code: ConvCodeConfig::gsm_k5_rate_half(),
            interleaver: Some(InterleaverConfig { rows: 6, cols: 8 }),
            ..Default::default()
        };
        config.save(&path).unwrap();
        std::env::set_var(CONFIG_ENV_VAR, &path);
        let loaded = FecConfig::load();
        std::env::remove_var(CONFIG_ENV_VAR);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_config_search_paths() {
        let paths = FecConfig::config_search_paths();
        assert!(paths[0].ends_with("r4w-fec.yaml"));
        assert!(paths.last().unwrap().ends_with("fec.yaml"));
    }
}
