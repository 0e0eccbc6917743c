//! Error types for framesync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from registry, pointer, and settings operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.framesync/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The source registry file did not exist at the expected path.
    #[error("source registry not found at {path}")]
    RegistryNotFound { path: PathBuf },

    /// A source id referenced something the registry does not contain.
    #[error("source '{id}' is not in the registry")]
    UnknownSource { id: String },
}
