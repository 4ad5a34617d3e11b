/*!
 * Alignment tables stored as `<document_id>.json` files in a directory.
 */

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use log::debug;

use crate::alignment::AlignmentTable;
use crate::errors::ProviderError;
use crate::providers::AlignmentSource;

/// Directory-backed alignment table source
#[derive(Debug, Clone)]
pub struct AlignmentDirectory {
    root: PathBuf,
}

impl AlignmentDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the table of a document; `None` for ids that would escape the directory
    pub fn table_path(&self, document_id: &str) -> Option<PathBuf> {
        let id = document_id.trim();
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(format!("{}.json", id)))
    }

    /// Write a table for a document, replacing any existing one
    pub async fn save_alignment_table(&self, document_id: &str, table: &AlignmentTable) -> Result<PathBuf, ProviderError> {
        let path = self.table_path(document_id)
            .ok_or_else(|| ProviderError::RequestFailed(format!("Invalid document id: {}", document_id)))?;
        let json = table.to_json()
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        tokio::fs::create_dir_all(&self.root).await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to create {}: {}", self.root.display(), e)))?;
        tokio::fs::write(&path, json).await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(path)
    }
}

#[async_trait]
impl AlignmentSource for AlignmentDirectory {
    async fn load_alignment_table(&self, document_id: &str) -> Result<Option<AlignmentTable>, ProviderError> {
        let Some(path) = self.table_path(document_id) else {
            debug!("Rejected alignment lookup for document id '{}'", document_id);
            return Ok(None);
        };

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No alignment table at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ProviderError::RequestFailed(format!("Failed to read {}: {}", path.display(), e)));
            }
        };

        AlignmentTable::from_json(&content)
            .map(Some)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", path.display(), e)))
    }
}
