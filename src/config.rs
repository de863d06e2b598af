//! Bridge configuration
//!
//! Key names the platform uses inside delivery extras, and the canonical
//! rename table applied to push-message payloads. Loaded from
//! `~/.config/notification-bridge/config.json`; any field missing from the
//! file keeps its default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extras key names carried by a delivery
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtrasKeys {
    pub notification_id: String,
    pub tag: String,
    pub manager_name: String,
    pub payload: String,
    /// Provider-assigned message id, only present on pushed messages
    pub remote_message_id: String,
}

impl Default for ExtrasKeys {
    fn default() -> Self {
        Self {
            notification_id: "notification_id".to_string(),
            tag: "notification_tag".to_string(),
            manager_name: "notification_manager_name".to_string(),
            payload: "payload".to_string(),
            remote_message_id: "google.message_id".to_string(),
        }
    }
}

/// One provider key rewritten to a stable name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyRename {
    pub from: String,
    pub to: String,
}

impl KeyRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub keys: ExtrasKeys,
    pub renames: Vec<KeyRename>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            keys: ExtrasKeys::default(),
            renames: vec![
                KeyRename::new("google.sent_time", "sent_time"),
                KeyRename::new("google.message_id", "message_id"),
            ],
        }
    }
}

impl BridgeConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/notification-bridge/config.json"))
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("No bridge config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: BridgeConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), renames = config.renames.len(), "Loaded bridge config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_renames() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.renames,
            vec![
                KeyRename::new("google.sent_time", "sent_time"),
                KeyRename::new("google.message_id", "message_id"),
            ]
        );
        assert_eq!(config.keys.remote_message_id, "google.message_id");
    }

    #[test]
    fn test_load_partial_file_merges_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"keys": {{"tag": "custom_tag"}}}}"#).unwrap();

        let config = BridgeConfig::load_from(file.path()).unwrap();
        assert_eq!(config.keys.tag, "custom_tag");
        assert_eq!(config.keys.notification_id, "notification_id");
        assert_eq!(config.renames, BridgeConfig::default().renames);
    }

    #[test]
    fn test_load_custom_renames() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"renames": [{{"from": "gcm.ttl", "to": "ttl"}}]}}"#).unwrap();

        let config = BridgeConfig::load_from(file.path()).unwrap();
        assert_eq!(config.renames, vec![KeyRename::new("gcm.ttl", "ttl")]);
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = BridgeConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(BridgeConfig::load_from(Path::new("/nonexistent/bridge.json")).is_err());
    }
}
