use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use pixstore_core::ProcessedFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Local filesystem asset storage
///
/// Each stored asset occupies one folder directly under the root, named by a
/// freshly generated token, holding a single `original<extension>` file. The
/// returned storage path identifies the file; deletion removes the whole
/// folder.
#[derive(Clone)]
pub struct AssetStorage {
    root: PathBuf,
}

impl AssetStorage {
    /// Create a new AssetStorage instance, creating the root directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(AssetStorage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write validated content under a fresh folder token.
    ///
    /// Returns the path of the written file. On a failed write the
    /// half-created folder is removed best-effort before the error
    /// propagates.
    pub async fn store(&self, file: &ProcessedFile) -> StorageResult<String> {
        let folder_token = Uuid::new_v4().to_string();
        let folder_path = self.root.join(&folder_token);
        let file_path = folder_path.join(format!("original{}", file.extension()));
        let size = file.len();

        let start = std::time::Instant::now();

        fs::create_dir_all(&folder_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create folder {}: {}",
                folder_path.display(),
                e
            ))
        })?;

        if let Err(e) = self.write_file(&file_path, file.content()).await {
            if let Err(cleanup_err) = fs::remove_dir_all(&folder_path).await {
                tracing::warn!(
                    path = %folder_path.display(),
                    error = %cleanup_err,
                    "Failed to clean up folder after write failure"
                );
            }
            return Err(e);
        }

        tracing::info!(
            path = %file_path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset stored"
        );

        Ok(file_path.to_string_lossy().into_owned())
    }

    /// Read a stored file back, or `None` if it no longer exists.
    pub async fn read(&self, path: &str) -> StorageResult<Option<Bytes>> {
        let path = self.contained_path(path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(Some(Bytes::from(data)))
    }

    /// Remove the asset folder containing the given file path.
    ///
    /// Deleting an already-missing folder is a no-op.
    pub async fn delete_folder(&self, path: &str) -> StorageResult<()> {
        let path = self.contained_path(path)?;

        let folder_path = path
            .parent()
            .filter(|parent| *parent != self.root)
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;

        if !fs::try_exists(folder_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_dir_all(folder_path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete folder {}: {}",
                folder_path.display(),
                e
            ))
        })?;

        tracing::info!(path = %folder_path.display(), "Asset folder deleted");

        Ok(())
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate that a stored path lies under the root and contains no
    /// parent-directory components.
    fn contained_path(&self, path: &str) -> StorageResult<PathBuf> {
        let path = Path::new(path);

        let escapes = path.components().any(|c| matches!(c, Component::ParentDir));
        if escapes || path.strip_prefix(&self.root).is_err() {
            return Err(StorageError::InvalidPath(path.display().to_string()));
        }

        Ok(path.to_path_buf())
    }
}
