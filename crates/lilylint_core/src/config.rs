//! Linter configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::LintError;

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinterConfig {
    /// Path of the LilyPond executable.
    #[serde(default = "default_executable_path")]
    pub executable_path: String,

    /// Extra arguments passed to the compiler, before `-`.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Per-invocation timeout in seconds.
    ///
    /// LilyPond may take minutes on a cold font cache, so the default is
    /// generous.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_executable_path() -> String {
    "lilypond".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl LinterConfig {
    /// File names probed by [`LinterConfig::discover`].
    pub const CONFIG_FILES: &'static [&'static str] = &[".lilylint.json"];

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            executable_path: default_executable_path(),
            extra_args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LintError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| LintError::config(format!("Failed to read config: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LintError> {
        serde_json::from_str(json)
            .map_err(|e| LintError::config(format!("Invalid config: {}", e)))
    }

    /// Walks up from `start` looking for a config file.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            Self::CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}
