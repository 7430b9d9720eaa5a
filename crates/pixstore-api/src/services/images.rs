//! Image ingestion, retrieval and deletion.
//!
//! Uploads arrive over several transports (multipart forms, raw request
//! bodies, remote URLs, base64 documents) and converge here: validate the
//! payload, write it to storage under a fresh folder, then record the
//! id-to-path mapping. Multipart requests persist each file section as it
//! is parsed; pre-materialized batches validate every member before
//! storing any.

use std::sync::Arc;

use axum::extract::multipart::{Field, Multipart};
use axum::http::header;
use bytes::Bytes;
use futures::future::{join_all, try_join_all};
use pixstore_core::{
    file_extension, read_capped, signature_catalog, AppError, Config, FileValidator, ImageRecord,
    ProcessedFile, StoredAsset,
};
use pixstore_db::ImageRepository;
use pixstore_storage::AssetStorage;
use uuid::Uuid;

use super::fetch::RemoteFetcher;

/// One incoming payload plus whatever identity the transport carried.
#[derive(Debug)]
pub enum UploadSource {
    /// Payload that arrived with a client-supplied filename.
    Named { content: Bytes, filename: String },
    /// Payload with no usable filename. The type is read from the leading
    /// bytes, optionally cross-checked against a declared content type.
    Anonymous {
        content: Bytes,
        declared_content_type: Option<String>,
    },
}

/// Orchestrates validation, storage and metadata for image content.
///
/// Operations on the same id are not serialized against each other;
/// callers racing an update against a delete on one id get whichever
/// order the tasks happen to run in.
#[derive(Clone)]
pub struct ImageService {
    validator: FileValidator,
    storage: Arc<AssetStorage>,
    repository: Arc<dyn ImageRepository>,
    fetcher: RemoteFetcher,
    max_file_size: usize,
}

impl ImageService {
    pub fn new(
        config: &Config,
        storage: Arc<AssetStorage>,
        repository: Arc<dyn ImageRepository>,
        fetcher: RemoteFetcher,
    ) -> Self {
        Self {
            validator: FileValidator::new(
                config.max_file_size_bytes,
                config.permitted_extensions.clone(),
            ),
            storage,
            repository,
            fetcher,
            max_file_size: config.max_file_size_bytes,
        }
    }

    fn validate(&self, source: UploadSource) -> Result<ProcessedFile, AppError> {
        match source {
            UploadSource::Named { content, filename } => {
                Ok(self.validator.validate_named(content, &filename)?)
            }
            UploadSource::Anonymous {
                content,
                declared_content_type,
            } => Ok(self
                .validator
                .validate_by_signature(content, declared_content_type.as_deref())?),
        }
    }

    /// Write a validated file to storage and record its id-to-path mapping.
    ///
    /// If the record cannot be saved, the freshly written folder is removed
    /// again so storage does not accumulate unreachable content.
    async fn persist(&self, file: &ProcessedFile) -> Result<StoredAsset, AppError> {
        let path = self.storage.store(file).await?;
        let id = Uuid::new_v4();

        if let Err(e) = self.repository.put(ImageRecord::new(id, path.clone())).await {
            tracing::error!(error = %e, %id, "Failed to save image metadata, removing stored file");
            let storage = self.storage.clone();
            let orphan = path.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete_folder(&orphan).await {
                    tracing::error!(
                        error = %cleanup_err,
                        path = %orphan,
                        "Failed to clean up stored file after metadata error"
                    );
                }
            });
            return Err(e);
        }

        Ok(StoredAsset { id, path })
    }

    /// Best-effort removal of a stored asset and its record.
    async fn discard(&self, asset: &StoredAsset) {
        if let Err(e) = self.storage.delete_folder(&asset.path).await {
            tracing::warn!(
                error = %e,
                path = %asset.path,
                "Failed to remove stored file during batch cleanup"
            );
        }
        if let Err(e) = self.repository.delete(asset.id).await {
            tracing::warn!(
                error = %e,
                id = %asset.id,
                "Failed to remove metadata during batch cleanup"
            );
        }
    }

    /// Validate and store a single payload.
    pub async fn create(&self, source: UploadSource) -> Result<StoredAsset, AppError> {
        let file = self.validate(source)?;
        self.persist(&file).await
    }

    /// Read a capped raw body and store it as a single image.
    pub async fn create_from_stream<S, E>(
        &self,
        stream: S,
        declared_content_type: Option<String>,
    ) -> Result<StoredAsset, AppError>
    where
        S: futures::Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let content = read_capped(stream, self.max_file_size).await?;
        self.create(UploadSource::Anonymous {
            content,
            declared_content_type,
        })
        .await
    }

    /// Store a batch of pre-materialized payloads, all or nothing.
    ///
    /// Every member is validated before anything touches storage, so a
    /// validation failure anywhere leaves no trace. Stores run to
    /// completion even when one fails, so every written folder is known
    /// and can be removed before the error is returned.
    pub async fn create_many(
        &self,
        sources: Vec<UploadSource>,
    ) -> Result<Vec<StoredAsset>, AppError> {
        let mut files = Vec::with_capacity(sources.len());
        for source in sources {
            files.push(self.validate(source)?);
        }

        let results = join_all(files.iter().map(|file| self.persist(file))).await;

        let mut assets = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(asset) => assets.push(asset),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }

        if let Some(e) = first_error {
            tracing::warn!(
                stored = assets.len(),
                "Batch store failed part way, removing stored members"
            );
            for asset in &assets {
                self.discard(asset).await;
            }
            return Err(e);
        }

        Ok(assets)
    }

    /// Download one remote image and store it.
    pub async fn create_from_url(&self, url: &str) -> Result<StoredAsset, AppError> {
        let content = self.fetcher.fetch(url).await?;
        self.create(UploadSource::Anonymous {
            content,
            declared_content_type: None,
        })
        .await
    }

    /// Download a set of remote images concurrently, then store them as an
    /// atomic batch. A failed download aborts before anything is stored.
    pub async fn create_many_from_urls(
        &self,
        urls: &[String],
    ) -> Result<Vec<StoredAsset>, AppError> {
        let downloads = try_join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await?;
        let sources = downloads
            .into_iter()
            .map(|content| UploadSource::Anonymous {
                content,
                declared_content_type: None,
            })
            .collect();
        self.create_many(sources).await
    }

    /// Store every file section of a multipart request as it is parsed.
    ///
    /// Sections are persisted one at a time, so a failure part way through
    /// returns an error while the sections stored before it remain.
    /// Sections carrying no content disposition are skipped.
    pub async fn ingest_multipart(
        &self,
        mut multipart: Multipart,
    ) -> Result<Vec<StoredAsset>, AppError> {
        let mut stored = Vec::new();

        loop {
            let field = multipart
                .next_field()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?;
            let Some(field) = field else { break };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content = self.read_field(field).await?;
                    let file = self.validate(UploadSource::Named { content, filename })?;
                    let asset = self.persist(&file).await?;
                    stored.push(asset);
                }
                None => Self::reject_non_file_section(&field)?,
            }
        }

        Ok(stored)
    }

    /// Remove the old folder behind an id so its replacement can be stored.
    ///
    /// The old content is gone from this point on; if reading, validating
    /// or storing the replacement fails afterwards, the record is left with
    /// no backing content until a later update succeeds.
    async fn evict_current(&self, id: Uuid) -> Result<(), AppError> {
        let record = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
        self.storage.delete_folder(&record.path).await?;
        Ok(())
    }

    async fn store_replacement(
        &self,
        id: Uuid,
        source: UploadSource,
    ) -> Result<StoredAsset, AppError> {
        let file = self.validate(source)?;
        let path = self.storage.store(&file).await?;

        if !self.repository.update(id, path.clone()).await? {
            // The record vanished between the lookup and the update.
            let storage = self.storage.clone();
            let orphan = path.clone();
            tokio::spawn(async move {
                if let Err(e) = storage.delete_folder(&orphan).await {
                    tracing::warn!(error = %e, path = %orphan, "Failed to remove orphaned replacement");
                }
            });
            return Err(AppError::NotFound("Image not found".to_string()));
        }

        tracing::info!(%id, path = %path, "Image content replaced");
        Ok(StoredAsset { id, path })
    }

    /// Replace the stored content behind an existing id with an already
    /// materialized payload.
    pub async fn replace(&self, id: Uuid, source: UploadSource) -> Result<StoredAsset, AppError> {
        self.evict_current(id).await?;
        self.store_replacement(id, source).await
    }

    /// Replace the stored content behind an existing id from a raw body.
    pub async fn replace_from_stream<S, E>(
        &self,
        id: Uuid,
        stream: S,
        declared_content_type: Option<String>,
    ) -> Result<StoredAsset, AppError>
    where
        S: futures::Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        self.evict_current(id).await?;
        let content = read_capped(stream, self.max_file_size).await?;
        self.store_replacement(
            id,
            UploadSource::Anonymous {
                content,
                declared_content_type,
            },
        )
        .await
    }

    /// Replace stored content from the first file section of a multipart
    /// request. Remaining sections are not read.
    pub async fn replace_from_multipart(
        &self,
        id: Uuid,
        mut multipart: Multipart,
    ) -> Result<StoredAsset, AppError> {
        self.evict_current(id).await?;

        loop {
            let field = multipart
                .next_field()
                .await
                .map_err(|e| AppError::BadRequest(format!("Malformed multipart request: {}", e)))?;
            let Some(field) = field else {
                return Err(AppError::BadRequest(
                    "Request contained no file section".to_string(),
                ));
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content = self.read_field(field).await?;
                    return self
                        .store_replacement(id, UploadSource::Named { content, filename })
                        .await;
                }
                None => Self::reject_non_file_section(&field)?,
            }
        }
    }

    /// Stored bytes and canonical content type for an id.
    pub async fn get(&self, id: Uuid) -> Result<(Bytes, &'static str), AppError> {
        let record = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        let Some(content) = self.storage.read(&record.path).await? else {
            tracing::warn!(%id, path = %record.path, "Image record points at missing content");
            return Err(AppError::NotFound("Image not found".to_string()));
        };

        let content_type = file_extension(&record.path)
            .and_then(|ext| signature_catalog().content_type_for(&ext))
            .unwrap_or("application/octet-stream");

        Ok((content, content_type))
    }

    /// Remove an image's folder and record. Returns false for unknown ids.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let Some(record) = self.repository.get(id).await? else {
            return Ok(false);
        };

        self.storage.delete_folder(&record.path).await?;
        self.repository.delete(id).await
    }

    /// Remove a set of images, returning how many actually existed.
    /// Unknown ids are skipped rather than failing the batch.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, AppError> {
        let records = self.repository.get_many(ids).await?;
        for record in &records {
            self.storage.delete_folder(&record.path).await?;
        }
        self.repository.delete_many(ids).await
    }

    /// A section without a filename may only be skipped when it carries no
    /// `Content-Disposition` header at all; a disposition that names no
    /// file fails the request.
    fn reject_non_file_section(field: &Field<'_>) -> Result<(), AppError> {
        if !field.headers().contains_key(header::CONTENT_DISPOSITION) {
            return Ok(());
        }
        Err(AppError::BadDisposition(match field.name() {
            Some(name) => format!("Form section '{}' is not a file upload", name),
            None => "Form section is not a file upload".to_string(),
        }))
    }

    async fn read_field(&self, field: Field<'_>) -> Result<Bytes, AppError> {
        let stream = futures::stream::try_unfold(field, |mut field| async move {
            match field.chunk().await {
                Ok(Some(chunk)) => Ok(Some((chunk, field))),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            }
        });
        read_capped(stream, self.max_file_size).await
    }
}
