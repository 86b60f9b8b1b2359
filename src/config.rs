//! Recorder configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encoder::params::{
    BITRATE_RATIO, MAX_DURATION, MAX_FILE_SIZE_BYTES, REFERENCE_FRAME_RATE,
};
use crate::encoder::{BitratePolicy, RecordingLimits};
use crate::recorder::SessionOptions;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Where recordings are written; created on demand
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Stop the session when the recorder reports a size/duration limit
    #[serde(default)]
    pub stop_on_hardware_limit: bool,

    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_reference_frame_rate")]
    pub reference_frame_rate: u32,

    #[serde(default = "default_bitrate_ratio")]
    pub bitrate_ratio: u32,
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("Recordings")
}

fn default_max_duration_secs() -> u64 {
    MAX_DURATION.as_secs()
}

fn default_max_file_size_bytes() -> u64 {
    MAX_FILE_SIZE_BYTES
}

fn default_reference_frame_rate() -> u32 {
    REFERENCE_FRAME_RATE
}

fn default_bitrate_ratio() -> u32 {
    BITRATE_RATIO
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            reference_frame_rate: default_reference_frame_rate(),
            bitrate_ratio: default_bitrate_ratio(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_duration_secs: default_max_duration_secs(),
            max_file_size_bytes: default_max_file_size_bytes(),
            stop_on_hardware_limit: false,
            video: VideoConfig::default(),
        }
    }
}

impl RecorderConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn limits(&self) -> RecordingLimits {
        RecordingLimits {
            max_duration: Duration::from_secs(self.max_duration_secs),
            max_file_size_bytes: self.max_file_size_bytes,
        }
    }

    pub fn bitrate(&self) -> BitratePolicy {
        BitratePolicy {
            reference_frame_rate: self.video.reference_frame_rate,
            ratio: self.video.bitrate_ratio,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            limits: self.limits(),
            bitrate: self.bitrate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_recorder_policy() {
        let config = RecorderConfig::default();
        assert_eq!(config.limits(), RecordingLimits::default());
        assert_eq!(config.bitrate(), BitratePolicy::default());
        assert!(!config.stop_on_hardware_limit);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recorder.toml");
        std::fs::write(&path, "stop_on_hardware_limit = true\nmax_duration_secs = 120\n").unwrap();

        let config = RecorderConfig::load(&path).unwrap();
        assert!(config.stop_on_hardware_limit);
        assert_eq!(config.limits().max_duration, Duration::from_secs(120));
        assert_eq!(config.max_file_size_bytes, MAX_FILE_SIZE_BYTES);
        assert_eq!(config.video, VideoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("recorder.toml");

        let mut config = RecorderConfig::default();
        config.output_dir = dir.path().join("out");
        config.video.bitrate_ratio = 4;
        config.save(&path).unwrap();

        let loaded = RecorderConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = RecorderConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RecorderConfig::default());
        assert!(RecorderConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
