use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SwaggenError;

/// Well-known name of the published artifact.
pub const DEFAULT_ARTIFACT: &str = "swagger.json";

/// Destination of the finalized artifact.
pub trait ArtifactSink {
    /// Writes the artifact text.
    ///
    /// # Errors
    ///
    /// Returns [`SwaggenError::SinkError`] when the artifact cannot be stored.
    fn write(&mut self, contents: &str) -> Result<(), SwaggenError>;
}

/// Writes the artifact to a file, creating missing parent directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT)
    }
}

impl ArtifactSink for FileSink {
    fn write(&mut self, contents: &str) -> Result<(), SwaggenError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        info!(path = %self.path.display(), bytes = contents.len(), "artifact written");
        Ok(())
    }
}

impl ArtifactSink for String {
    fn write(&mut self, contents: &str) -> Result<(), SwaggenError> {
        contents.clone_into(self);
        Ok(())
    }
}
