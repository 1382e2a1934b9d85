//! Engine configuration via `weave.toml`
//!
//! All settings have defaults, so an empty file (or no file at all) yields the
//! standard behaviour: first-wins member conflicts and source verification on.

use serde::{Deserialize, Serialize};
use std::path::Path;
use weave_core::{Error, Result};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "weave.toml";

/// What the forwarding generator does when two components declare the same
/// member name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep the first occurrence in component order, skip the rest.
    #[default]
    FirstWins,
    /// Fail generation when the same name comes from two different contracts.
    Reject,
}

/// Engine configuration loaded from `weave.toml`.
///
/// # Example
///
/// ```toml
/// namespace_prefix = "weave"
/// conflict_policy = "first_wins"
/// verify_sources = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix of the registry namespace name.
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,
    /// Member-name conflict handling.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    /// Check that each source implements its slot contract at construction.
    #[serde(default = "default_verify_sources")]
    pub verify_sources: bool,
}

fn default_namespace_prefix() -> String {
    "weave".to_string()
}

fn default_verify_sources() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: default_namespace_prefix(),
            conflict_policy: ConflictPolicy::default(),
            verify_sources: default_verify_sources(),
        }
    }
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Weave engine configuration
#
# Prefix of the namespace that generated implementations are registered in.
namespace_prefix = "weave"

# Member-name conflicts between merged components:
#   "first_wins" = keep the first component's member, skip later ones (default)
#   "reject"     = fail when two different contracts declare the same name
conflict_policy = "first_wins"

# Verify that every source object implements the contract of its slot.
verify_sources = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        if config.namespace_prefix.is_empty() {
            return Err(Error::Config(
                "namespace_prefix must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_toml_parses_to_default() {
        let parsed = EngineConfig::from_toml_str(EngineConfig::default_toml()).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(parsed.conflict_policy, ConflictPolicy::FirstWins);
        assert!(parsed.verify_sources);
        assert_eq!(parsed.namespace_prefix, "weave");
    }

    #[test]
    fn test_reject_policy() {
        let parsed = EngineConfig::from_toml_str("conflict_policy = \"reject\"").unwrap();
        assert_eq!(parsed.conflict_policy, ConflictPolicy::Reject);
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let err = EngineConfig::from_toml_str("conflict_policy = \"last_wins\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = EngineConfig::from_toml_str("namespace_prefix = \"\"").unwrap_err();
        assert!(err.to_string().contains("namespace_prefix"));
    }

    #[test]
    fn test_write_default_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        // Second call keeps the existing file
        std::fs::write(&path, "verify_sources = false\n").unwrap();
        EngineConfig::write_default_if_missing(&path).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert!(!config.verify_sources);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = EngineConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
