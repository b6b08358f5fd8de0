//! Reads an accepted file and turns it into a `data:` URI.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use super::file_guard::{AcceptedFile, check_size};

/// Where the bytes of a selected file come from.
#[async_trait]
pub trait ByteSource: Send + Sync + Debug {
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// A file on disk, read lazily when encoding starts.
#[derive(Debug, Clone)]
pub struct PathSource(pub PathBuf);

#[async_trait]
impl ByteSource for PathSource {
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.0).await
    }
}

/// Bytes already in memory, e.g. a drop that carried its content.
#[derive(Debug, Clone)]
pub struct MemorySource(pub Arc<[u8]>);

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.0.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    /// Shared so snapshots of large videos stay cheap.
    pub data_uri: Arc<str>,
    pub source_file_name: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Could not read {file_name}: {reason}. Please select the file again.")]
pub struct EncodingError {
    pub file_name: String,
    pub reason: String,
}

pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

pub async fn encode(
    file: &AcceptedFile,
    source: &dyn ByteSource,
) -> Result<EncodedAttachment, EncodingError> {
    let bytes = source.read_all().await.map_err(|err| EncodingError {
        file_name: file.name.clone(),
        reason: err.to_string(),
    })?;
    // the file may have changed on disk since it was validated
    check_size(file.category, bytes.len() as u64).map_err(|err| EncodingError {
        file_name: file.name.clone(),
        reason: err.to_string(),
    })?;

    Ok(EncodedAttachment {
        data_uri: data_uri(&file.mime_type, &bytes).into(),
        source_file_name: file.name.clone(),
    })
}
