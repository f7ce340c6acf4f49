//! Source Resolution
//!
//! Determines whether a hit's content source points at a file in the
//! application's managed storage, and resolves it to a file record
//! when it does. Resolution is advisory: a miss or a failed lookup
//! yields `None` and the caller falls back to the raw source string.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::FileRecord;
use crate::utils::error::AppResult;

/// Managed-storage segment under the application data directory
const DATA_FILES_UNIX: &str = "/Data/Files/";
const DATA_FILES_WINDOWS: &str = "\\Data\\Files\\";

/// File lookup collaborator backed by managed storage.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Look up a file record by its storage identifier.
    async fn get_file(&self, id: &str) -> AppResult<Option<FileRecord>>;
}

/// Resolves content-source strings against managed storage.
pub struct SourceResolver {
    files: Arc<dyn FileStore>,
    app_dir_name: String,
}

impl SourceResolver {
    /// Create a resolver for files stored under `<app_dir_name>/Data/Files`.
    pub fn new(files: Arc<dyn FileStore>, app_dir_name: impl Into<String>) -> Self {
        Self {
            files,
            app_dir_name: app_dir_name.into(),
        }
    }

    /// Resolve a source string to a managed file record.
    ///
    /// Matches paths under the application data directory with either
    /// slash convention; the file id is the filename stem before the
    /// first extension separator. Anything that does not match the
    /// convention short-circuits to `None` without a lookup.
    pub async fn resolve(&self, source: &str) -> Option<FileRecord> {
        let file_name = self.managed_file_name(source)?;
        let file_id = file_name.split('.').next().unwrap_or_default();
        if file_id.is_empty() {
            return None;
        }

        match self.files.get_file(file_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("File lookup for '{}' failed: {}", file_id, e);
                None
            }
        }
    }

    /// Extract the stored filename from a managed-storage path.
    fn managed_file_name<'a>(&self, source: &'a str) -> Option<&'a str> {
        if source.is_empty() || !source.contains(&self.app_dir_name) {
            return None;
        }

        if let Some((_, name)) = source.split_once(DATA_FILES_UNIX) {
            return Some(name);
        }
        if let Some((_, name)) = source.split_once(DATA_FILES_WINDOWS) {
            return Some(name);
        }

        None
    }
}
