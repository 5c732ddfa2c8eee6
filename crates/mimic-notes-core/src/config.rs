//! Loader configuration that callers can build explicitly, from the
//! environment, or from a YAML document.
//!
//! Precedence when the CLI combines them: env < YAML file < flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetConfig;
use crate::error::{Error, Result};

pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Local directory holding the gzip files. Never discovered or downloaded.
    pub data_dir: Option<PathBuf>,

    /// Named configuration selecting the files to read.
    pub dataset_config: DatasetConfig,

    /// Read buffer (bytes) over each decompressed stream.
    pub buffer_capacity: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            dataset_config: DatasetConfig::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Optional overrides as they appear in a YAML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfigDoc {
    pub data_dir: Option<PathBuf>,
    pub config: Option<DatasetConfig>,
    pub buffer_capacity: Option<usize>,
}

impl LoaderConfig {
    pub fn new(data_dir: impl Into<PathBuf>, dataset_config: DatasetConfig) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            dataset_config,
            ..Self::default()
        }
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `MIMIC_NOTES_DATA_DIR`: directory holding the gzip files
    /// - `MIMIC_NOTES_CONFIG`: `noteevents`, `all`, `discharge` or `radiology`
    /// - `MIMIC_NOTES_BUFFER_CAPACITY`: read buffer size in bytes
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("MIMIC_NOTES_DATA_DIR") {
            if !s.is_empty() {
                cfg.data_dir = Some(PathBuf::from(s));
            }
        }

        if let Ok(s) = std::env::var("MIMIC_NOTES_CONFIG") {
            if let Ok(v) = s.parse::<DatasetConfig>() {
                cfg.dataset_config = v;
            }
        }

        if let Ok(s) = std::env::var("MIMIC_NOTES_BUFFER_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                if v > 0 {
                    cfg.buffer_capacity = v;
                }
            }
        }

        cfg
    }

    /// Parse a YAML document of overrides.
    pub fn doc_from_yaml_str(yaml: &str) -> Result<LoaderConfigDoc> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply the values present in `doc`, leaving the rest untouched.
    pub fn apply_doc(&mut self, doc: &LoaderConfigDoc) {
        if let Some(dir) = &doc.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if let Some(cfg) = doc.config {
            self.dataset_config = cfg;
        }
        if let Some(cap) = doc.buffer_capacity {
            if cap > 0 {
                self.buffer_capacity = cap;
            }
        }
    }

    /// Defaults overlaid with a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_doc(&Self::doc_from_yaml_str(yaml)?);
        Ok(cfg)
    }

    /// The data directory, checked before any file is opened.
    pub fn require_data_dir(&self) -> Result<&Path> {
        require_data_dir(self.data_dir.as_deref())
    }
}

/// Fail-fast precondition shared by every loader entry point.
pub fn require_data_dir(data_dir: Option<&Path>) -> Result<&Path> {
    let dir = data_dir.ok_or_else(|| {
        Error::Config(
            "this loader requires a local path; pass data_dir pointing at the downloaded files"
                .into(),
        )
    })?;
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "data_dir '{}' is not an existing directory",
            dir.display()
        )));
    }
    Ok(dir)
}
