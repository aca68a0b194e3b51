//! Downloader configuration
//!
//! The stream URL and segment parameters are explicit values handed to the
//! download call; nothing here is process-wide state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VttError};

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// URL of any one segment of the subtitle representation; the segment
    /// index in the `-0.dash` position is substituted per request.
    pub stream_url: String,

    /// Index step between consecutive segments.
    #[serde(default = "default_segment_step")]
    pub segment_step: u64,

    /// Value substituted into the `qsm=` quality selector.
    #[serde(default = "default_segment_size")]
    pub segment_size: u64,

    /// Directory the segment files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_segment_step() -> u64 {
    10_000
}

fn default_segment_size() -> u64 {
    1_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dash")
}

impl DownloadConfig {
    /// Build a configuration for a URL with the default segment parameters.
    pub fn for_url(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            segment_step: default_segment_step(),
            segment_size: default_segment_size(),
            output_dir: default_output_dir(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: DownloadConfig =
            toml::from_str(&content).map_err(|e| VttError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| VttError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
