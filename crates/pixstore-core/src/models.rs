//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata record for a stored image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: Uuid,
    /// Absolute path of the stored file on disk
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn new(id: Uuid, path: String) -> Self {
        Self {
            id,
            path,
            uploaded_at: Utc::now(),
        }
    }
}

/// Result of materializing a validated payload on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub id: Uuid,
    pub path: String,
}
