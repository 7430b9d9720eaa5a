//! Stream ingestion
//!
//! Collects an upload stream into memory with the size ceiling enforced
//! during the read. The whole payload has to be buffered anyway: the size
//! check needs the final length and the signature check needs the leading
//! bytes, so there is nothing to gain from spooling to disk first.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::error::AppError;
use crate::validator::ValidationError;

/// Read a chunked byte stream into a single buffer, failing as soon as the
/// accumulated size would exceed `max_bytes`.
///
/// A payload of exactly `max_bytes` is accepted. Transport errors from the
/// stream surface as storage-level errors, not validation errors.
pub async fn read_capped<S, E>(stream: S, max_bytes: usize) -> Result<Bytes, AppError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);

    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| AppError::Io(format!("upload stream error: {}", e)))?;
        if buf.len() + chunk.len() > max_bytes {
            return Err(ValidationError::too_large(max_bytes).into());
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf.freeze())
}
