//! Error types for the manifest compiler.
//!
//! Every failure carries the file path or object identity needed to diagnose
//! it without re-running the tool.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by the library and the CLI handlers.
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reading or decoding manifest sources failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path could not be stat'ed, listed or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document in the stream is malformed or is not a key/value object.
    #[error("failed to decode document {index} of {}: {message}", .path.display())]
    Decode {
        path: PathBuf,
        /// Zero-based position of the document within the stream.
        index: usize,
        message: String,
    },

    /// A decoded value that is not a mapping was handed to `Manifest::from_value`.
    #[error("not a Kubernetes object: expected a mapping, found {found}")]
    InvalidDocument { found: &'static str },
}

/// Why a resource name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameErrorReason {
    /// The object has no `metadata.name`.
    MissingName,
    /// The joined identifier violates HCL identifier syntax.
    InvalidIdentifier,
}

impl std::fmt::Display for NameErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "metadata.name is missing"),
            Self::InvalidIdentifier => write!(f, "not a valid HCL identifier"),
        }
    }
}

/// A generated resource name is not a valid HCL identifier.
#[derive(Debug, Clone, Error)]
#[error(
    "{}cannot build resource name \"{identifier}\" for {kind} \"{name}\" in namespace \"{namespace}\": {reason}",
    file_prefix(.file)
)]
pub struct NameError {
    /// The (invalid) identifier that was computed.
    pub identifier: String,
    pub namespace: String,
    pub kind: String,
    pub name: String,
    pub reason: NameErrorReason,
    /// Source file of the object, when known.
    pub file: Option<PathBuf>,
}

impl NameError {
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

fn file_prefix(file: &Option<PathBuf>) -> String {
    file.as_ref()
        .map(|p| format!("{}: ", p.display()))
        .unwrap_or_default()
}

/// An object could not be converted to its textual YAML form.
#[derive(Debug, Error)]
#[error("failed to serialize object \"{name}\" to YAML: {source}")]
pub struct SerializationError {
    pub name: String,
    #[source]
    pub source: serde_yaml::Error,
}

/// The generated document could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render HCL: {0}")]
    Render(#[from] hcl::Error),
}

/// Configuration file problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ConverterError>;
