use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use studio_core::{FileHandle, SourceRef};
use thiserror::Error;

use crate::decode::{decode_text, DecodeError};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("no content behind {0}")]
    NotFound(String),
    #[error("file too large (max {max_bytes}, actual {actual})")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Produces text from a file handle. Only called for plain-text files; other
/// formats go through the simulated extraction.
#[async_trait::async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_text(&self, file: &FileHandle) -> Result<String, ReadError>;
}

/// Treats `SourceRef` as a path, optionally relative to a root directory.
#[derive(Debug, Clone)]
pub struct FsContentReader {
    root: Option<PathBuf>,
    max_bytes: u64,
}

impl FsContentReader {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            root: None,
            max_bytes,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn resolve(&self, source: &SourceRef) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source.as_str()),
            None => PathBuf::from(source.as_str()),
        }
    }
}

#[async_trait::async_trait]
impl ContentReader for FsContentReader {
    async fn read_text(&self, file: &FileHandle) -> Result<String, ReadError> {
        let path = self.resolve(&file.source);
        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ReadError::NotFound(path.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        if meta.len() > self.max_bytes {
            return Err(ReadError::TooLarge {
                max_bytes: self.max_bytes,
                actual: meta.len(),
            });
        }

        let bytes = tokio::fs::read(&path).await?;
        Ok(decode_text(&bytes, Some(&file.media_type))?.text)
    }
}

/// In-memory content keyed by source reference. Resolves without awaiting.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentReader {
    contents: HashMap<SourceRef, Vec<u8>>,
}

impl MemoryContentReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.contents.insert(SourceRef(source.into()), bytes.into());
    }

    pub fn with(mut self, source: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(source, bytes);
        self
    }
}

#[async_trait::async_trait]
impl ContentReader for MemoryContentReader {
    async fn read_text(&self, file: &FileHandle) -> Result<String, ReadError> {
        let bytes = self
            .contents
            .get(&file.source)
            .ok_or_else(|| ReadError::NotFound(file.source.as_str().to_string()))?;
        Ok(decode_text(bytes, Some(&file.media_type))?.text)
    }
}
