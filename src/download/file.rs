//! Saving download artifacts to the export directory

use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use super::DownloadArtifact;
use crate::error::Result;

/// Writes rendered images into a directory on disk
pub struct ExportStore {
    export_dir: PathBuf,
}

impl ExportStore {
    /// Create a new export store
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Ensure the export directory exists
    pub async fn ensure_export_dir(&self) -> Result<()> {
        if !self.export_dir.exists() {
            fs::create_dir_all(&self.export_dir).await?;
            debug!(path = ?self.export_dir, "Created export directory");
        }
        Ok(())
    }

    /// Write the artifact under its download filename, replacing any
    /// previous file of the same name. Returns the written path.
    pub async fn save(&self, artifact: &DownloadArtifact) -> Result<PathBuf> {
        self.ensure_export_dir().await?;

        let file_path = self.export_dir.join(&artifact.filename);
        fs::write(&file_path, &artifact.bytes).await?;

        debug!(path = ?file_path, size = artifact.bytes.len(), "Saved rendering");

        Ok(file_path)
    }
}
