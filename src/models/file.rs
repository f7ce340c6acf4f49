//! File Models
//!
//! Records describing files held in managed storage. Owned by the
//! file collaborator; this crate only reads them.

use serde::{Deserialize, Serialize};

/// A file record from managed storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Storage identifier (the filename stem under Data/Files)
    pub id: String,
    /// Stored filename, e.g. "a1b2c3.pdf"
    pub name: String,
    /// Original filename as uploaded by the user
    pub origin_name: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// File extension including the dot, e.g. ".pdf"
    #[serde(default)]
    pub ext: String,
}
