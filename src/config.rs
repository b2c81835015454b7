//! Harness configuration
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config loravec.toml`)
//! 3. environment variables (`LORASDR_AWGN_BIN`, `LORAPHY_VECTOR_BIN`)
//! 4. command-line flags
//!
//! Layers 3 and 4 are resolved by clap; this module owns 1 and 2.
//!
//! # Example loravec.toml
//!
//! ```toml
//! legacy_root = "vectors/lorasdr"
//! phy_root = "vectors/lora_phy"
//! legacy_binary = "/opt/lorasdr/bin/lora_awgn_sim"
//! phy_binary = "build/lora_phy_vector_dump"
//! ```

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the `lora_phy` vector dump binary
pub const DEFAULT_PHY_BINARY: &str = "build/lora_phy_vector_dump";

/// Locations of generator binaries and vector output roots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Parent directory of legacy (LoRa-SDR) vector sets
    pub legacy_root: PathBuf,

    /// Parent directory of `lora_phy` vector sets
    pub phy_root: PathBuf,

    /// LoRa-SDR `lora_awgn_sim` binary; no default, must be supplied
    pub legacy_binary: Option<PathBuf>,

    /// `lora_phy_vector_dump` binary
    pub phy_binary: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            legacy_root: PathBuf::from("vectors/lorasdr"),
            phy_root: PathBuf::from("vectors/lora_phy"),
            legacy_binary: None,
            phy_binary: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| HarnessError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.legacy_root.as_os_str().is_empty() {
            return Err(HarnessError::Config("legacy_root must not be empty".to_string()));
        }
        if self.phy_root.as_os_str().is_empty() {
            return Err(HarnessError::Config("phy_root must not be empty".to_string()));
        }
        Ok(())
    }

    /// Legacy binary from the command line, else the config file
    pub fn legacy_binary(&self, cli: Option<PathBuf>) -> Result<PathBuf> {
        cli.or_else(|| self.legacy_binary.clone()).ok_or_else(|| {
            HarnessError::Config(
                "AWGN simulation binary not specified (use --binary or set LORASDR_AWGN_BIN)"
                    .to_string(),
            )
        })
    }

    /// Phy binary from the command line, else the config file, else the default
    pub fn phy_binary(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.phy_binary.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PHY_BINARY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.legacy_root, PathBuf::from("vectors/lorasdr"));
        assert_eq!(config.phy_root, PathBuf::from("vectors/lora_phy"));
        assert!(config.legacy_binary.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HarnessConfig::from_toml_str("phy_binary = \"/opt/bin/dump\"\n").unwrap();
        assert_eq!(config.phy_binary, Some(PathBuf::from("/opt/bin/dump")));
        assert_eq!(config.legacy_root, PathBuf::from("vectors/lorasdr"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = HarnessConfig::from_toml_str("manifest = \"other.json\"\n").unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn test_empty_root_rejected() {
        assert!(HarnessConfig::from_toml_str("phy_root = \"\"\n").is_err());
    }

    #[test]
    fn test_legacy_binary_precedence() {
        let config = HarnessConfig {
            legacy_binary: Some(PathBuf::from("from_file")),
            ..Default::default()
        };
        assert_eq!(
            config.legacy_binary(Some(PathBuf::from("from_cli"))).unwrap(),
            PathBuf::from("from_cli")
        );
        assert_eq!(config.legacy_binary(None).unwrap(), PathBuf::from("from_file"));

        let err = HarnessConfig::default().legacy_binary(None).unwrap_err();
        assert!(err.to_string().contains("LORASDR_AWGN_BIN"));
    }

    #[test]
    fn test_phy_binary_default() {
        assert_eq!(
            HarnessConfig::default().phy_binary(None),
            PathBuf::from(DEFAULT_PHY_BINARY)
        );
    }
}
