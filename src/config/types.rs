use crate::terraform::DEFAULT_HEREDOC_DELIMITER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub conversion: ConversionConfig,
}

/// Defaults for the conversion commands, overridable by CLI flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Inline manifests as heredocs instead of referencing their files
    pub content_inline: bool,
    /// Descend into subdirectories of the input directory
    pub recursive: bool,
    pub heredoc_delimiter: String,
    /// Directory file references are made relative to
    pub module_dir: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            content_inline: true,
            recursive: true,
            heredoc_delimiter: DEFAULT_HEREDOC_DELIMITER.to_string(),
            module_dir: None,
        }
    }
}
