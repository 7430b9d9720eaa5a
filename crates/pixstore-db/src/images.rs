//! Image metadata repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pixstore_core::{AppError, ImageRecord};

/// Identifier-to-path mapping for stored images.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn put(&self, record: ImageRecord) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ImageRecord>, AppError>;

    /// Records for the given ids, in input order; unknown ids are skipped.
    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ImageRecord>, AppError>;

    /// Point an existing record at a new path. Returns false for unknown ids.
    async fn update(&self, id: Uuid, path: String) -> Result<bool, AppError>;

    /// Remove a record. Returns false if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Remove records for the given ids, returning how many existed.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, AppError>;
}

/// In-process repository backed by a map.
#[derive(Default)]
pub struct InMemoryImageRepository {
    records: RwLock<HashMap<Uuid, ImageRecord>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn put(&self, record: ImageRecord) -> Result<(), AppError> {
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ImageRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<ImageRecord>, AppError> {
        let records = self.records.read().await;
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn update(&self, id: Uuid, path: String) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) => {
                record.path = path;
                record.uploaded_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, AppError> {
        let mut records = self.records.write().await;
        Ok(ids
            .iter()
            .filter(|id| records.remove(id).is_some())
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> ImageRecord {
        ImageRecord::new(Uuid::new_v4(), path.to_string())
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let repo = InMemoryImageRepository::new();
        let rec = record("/data/a/original.png");

        repo.put(rec.clone()).await.unwrap();
        let found = repo.get(rec.id).await.unwrap().unwrap();

        assert_eq!(found.id, rec.id);
        assert_eq!(found.path, rec.path);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let repo = InMemoryImageRepository::new();
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_many_preserves_input_order_and_skips_unknown() {
        let repo = InMemoryImageRepository::new();
        let first = record("/data/1/original.png");
        let second = record("/data/2/original.jpg");
        repo.put(first.clone()).await.unwrap();
        repo.put(second.clone()).await.unwrap();

        let found = repo
            .get_many(&[second.id, Uuid::new_v4(), first.id])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, second.id);
        assert_eq!(found[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_replaces_path() {
        let repo = InMemoryImageRepository::new();
        let rec = record("/data/old/original.png");
        repo.put(rec.clone()).await.unwrap();

        let updated = repo
            .update(rec.id, "/data/new/original.jpg".to_string())
            .await
            .unwrap();

        assert!(updated);
        let found = repo.get(rec.id).await.unwrap().unwrap();
        assert_eq!(found.path, "/data/new/original.jpg");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = InMemoryImageRepository::new();
        let updated = repo
            .update(Uuid::new_v4(), "/data/x/original.png".to_string())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let repo = InMemoryImageRepository::new();
        let rec = record("/data/a/original.png");
        repo.put(rec.clone()).await.unwrap();

        assert!(repo.delete(rec.id).await.unwrap());
        assert!(!repo.delete(rec.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_many_counts_only_removed() {
        let repo = InMemoryImageRepository::new();
        let first = record("/data/1/original.png");
        let second = record("/data/2/original.png");
        repo.put(first.clone()).await.unwrap();
        repo.put(second.clone()).await.unwrap();

        let removed = repo
            .delete_many(&[first.id, Uuid::new_v4(), second.id])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(repo.get(first.id).await.unwrap().is_none());
    }
}
