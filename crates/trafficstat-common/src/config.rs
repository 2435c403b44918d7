//! Configuration model for the traffic counter service.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, TrafficStatError};

/// Root configuration for the traffic counter service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficStatConfig {
    /// Path of the legacy per-interface table.
    pub iface_stat_path: PathBuf,
    /// Path of the legacy per-uid table.
    pub uid_stat_path: PathBuf,
    /// Directory holding the pinned BPF maps.
    pub bpf_pin_dir: PathBuf,
    /// Whether to read the legacy tables when the BPF maps cannot answer.
    pub legacy_fallback: bool,
}

impl Default for TrafficStatConfig {
    fn default() -> Self {
        Self {
            iface_stat_path: PathBuf::from(constants::QTAGUID_IFACE_STATS),
            uid_stat_path: PathBuf::from(constants::QTAGUID_UID_STATS),
            bpf_pin_dir: PathBuf::from(constants::BPF_PIN_DIR),
            legacy_fallback: true,
        }
    }
}

impl TrafficStatConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| TrafficStatError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every configured path is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficStatError::Config`] naming the first empty path.
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("iface_stat_path", &self.iface_stat_path),
            ("uid_stat_path", &self.uid_stat_path),
            ("bpf_pin_dir", &self.bpf_pin_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(TrafficStatError::Config {
                    message: format!("{name} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_kernel_tables() {
        let config = TrafficStatConfig::default();
        assert_eq!(config.iface_stat_path, Path::new(constants::QTAGUID_IFACE_STATS));
        assert_eq!(config.uid_stat_path, Path::new(constants::QTAGUID_UID_STATS));
        assert!(config.legacy_fallback);
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"uid_stat_path": "/tmp/stats", "legacy_fallback": false}"#)
            .expect("write");

        let config = TrafficStatConfig::load(&path).expect("load");
        assert_eq!(config.uid_stat_path, Path::new("/tmp/stats"));
        assert_eq!(config.iface_stat_path, Path::new(constants::QTAGUID_IFACE_STATS));
        assert!(!config.legacy_fallback);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TrafficStatConfig::load(&dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(err, TrafficStatError::Io { .. }));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("write");
        let err = TrafficStatConfig::load(&path).expect_err("should fail");
        assert!(matches!(err, TrafficStatError::Serialization { .. }));
    }

    #[test]
    fn validate_rejects_empty_path() {
        let config = TrafficStatConfig {
            bpf_pin_dir: PathBuf::new(),
            ..TrafficStatConfig::default()
        };
        let err = config.validate().expect_err("should fail");
        assert!(err.to_string().contains("bpf_pin_dir"));
    }
}
