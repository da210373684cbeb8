//! Descriptor loading
//!
//! Reads and parses the compose file into [`ComposeFile`]. Failures at this
//! stage are structural and abort the run; anything that can be recovered
//! per-field is handled later by the normalizer.

use super::types::ComposeFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that make the whole conversion impossible.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The compose file could not be read
    #[error("failed to read compose file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or not the expected shape
    #[error("compose file is not a valid compose document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document has no `services:` section to convert
    #[error("compose file declares no services")]
    NoServices,
}

/// Loads and parses a compose file from disk.
pub fn load_compose_file(path: &Path) -> Result<ComposeFile, ComposeError> {
    let text = fs::read_to_string(path).map_err(|source| ComposeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let compose = parse_compose(&text)?;
    debug!(
        path = %path.display(),
        services = compose.services.len(),
        "loaded compose file"
    );
    Ok(compose)
}

/// Parses compose document text. Service declaration order is preserved.
pub fn parse_compose(text: &str) -> Result<ComposeFile, ComposeError> {
    let compose: ComposeFile = serde_yaml::from_str(text)?;
    if compose.services.is_empty() {
        return Err(ComposeError::NoServices);
    }
    Ok(compose)
}
