//! Settings for a sync session.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reserved name of the per-directory scratch file.
pub const DEFAULT_SCRATCH_FILE_NAME: &str = ".tmp.xml";
/// Sibling resource directories holding locale variants, e.g. `values-fr`, `values-zh-rCN`.
pub const DEFAULT_LOCALE_DIR_PATTERN: &str = "^values-[a-z][a-z].*";

/// Behaviour options for [`crate::SyncSession`] and [`crate::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// File name of the scratch file created next to each target.
    pub scratch_file_name: String,
    /// One level of indentation.
    pub indent: String,
    /// Terminator written after every output line.
    pub line_ending: String,
    /// Pause between targets so a progress display can keep up.
    pub pause_between_targets_ms: u64,
    /// Regex a directory name must match to be treated as a locale directory.
    pub locale_dir_pattern: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            scratch_file_name: DEFAULT_SCRATCH_FILE_NAME.to_string(),
            indent: "\t".to_string(),
            line_ending: "\r\n".to_string(),
            pause_between_targets_ms: 0,
            locale_dir_pattern: DEFAULT_LOCALE_DIR_PATTERN.to_string(),
        }
    }
}

impl SyncConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from a TOML file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SyncConfig = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.check(path)?;
        Ok(config)
    }

    fn check(&self, path: &Path) -> Result<()> {
        let name = Path::new(&self.scratch_file_name);
        if self.scratch_file_name.is_empty() || name.file_name() != Some(name.as_os_str()) {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!(
                    "scratch_file_name must be a bare file name, got `{}`",
                    self.scratch_file_name
                ),
            });
        }
        if let Err(e) = regex::Regex::new(&self.locale_dir_pattern) {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("locale_dir_pattern: {}", e),
            });
        }
        Ok(())
    }

    pub fn with_scratch_file_name(mut self, name: impl Into<String>) -> Self {
        self.scratch_file_name = name.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    pub fn with_pause_between_targets(mut self, pause: Duration) -> Self {
        self.pause_between_targets_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_locale_dir_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.locale_dir_pattern = pattern.into();
        self
    }

    pub fn pause_between_targets(&self) -> Duration {
        Duration::from_millis(self.pause_between_targets_ms)
    }
}
