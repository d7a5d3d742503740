//! Engine configuration

use serde::{Deserialize, Serialize};
use sigil_core::{RegistryError, Result};
use std::path::Path;

/// Tunable settings for the registry engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Upper bound on minting probe iterations before failing fatally
    ///
    /// The probe loop has no theoretical bound; under correct operation the
    /// ceiling is never reached, so hitting it is reported as an integrity
    /// error rather than contention.
    pub mint_retry_ceiling: u32,
    /// Gateway prefix used to resolve `ipfs://` metadata URLs
    pub ipfs_gateway: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mint_retry_ceiling: 10_000,
            ipfs_gateway: "https://ipfs.io/ipfs/".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::storage(format!("read config {}: {e}", path.display()))
        })?;
        toml::from_str(&text)
            .map_err(|e| RegistryError::encoding(format!("parse config {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.mint_retry_ceiling, 10_000);
        assert!(config.ipfs_gateway.starts_with("https://"));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: RegistryConfig = toml::from_str("mint_retry_ceiling = 50").unwrap();
        assert_eq!(config.mint_retry_ceiling, 50);
        assert_eq!(config.ipfs_gateway, RegistryConfig::default().ipfs_gateway);
    }
}
