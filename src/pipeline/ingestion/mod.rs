// Pipeline ingestion: reading raw bytes, enforcing the size cap, decoding text

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::metrics::IngestMetrics;
use crate::types::InputFormat;

/// Bytes of one uploaded file plus what is known about it
#[derive(Debug, Clone)]
pub struct RawInput {
    pub name: String,
    pub format: InputFormat,
    pub bytes: Vec<u8>,
}

/// Where raw input comes from; the core never reads files itself
#[async_trait]
pub trait InputSource: Send + Sync {
    fn name(&self) -> &str;

    /// Read the whole input, refusing anything over `limit` bytes
    async fn read(&self, limit: u64) -> Result<RawInput>;
}

/// Reject input over the cap before anything looks at its content
pub fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        IngestMetrics::record_oversize();
        warn!("rejecting {}-byte input over the {}-byte limit", size, limit);
        return Err(IngestError::OversizeInput { size, limit });
    }
    Ok(())
}

/// UTF-8 decode; invalid sequences become U+FFFD instead of failing the file
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    let text = String::from_utf8_lossy(bytes);
    let lossy = matches!(text, Cow::Owned(_));
    if lossy {
        warn!("input is not valid UTF-8; invalid sequences were replaced");
    }
    (text, lossy)
}

/// A file on disk; the format comes from its extension
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InputSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self, limit: u64) -> Result<RawInput> {
        let format = InputFormat::from_path(&self.path)?;
        let metadata = tokio::fs::metadata(&self.path).await?;
        check_size(metadata.len(), limit)?;

        let bytes = tokio::fs::read(&self.path).await?;
        // The file may have grown between the two calls
        check_size(bytes.len() as u64, limit)?;

        debug!("read {} bytes from {}", bytes.len(), self.name);
        Ok(RawInput {
            name: self.name.clone(),
            format,
            bytes,
        })
    }
}

/// Bytes already in memory, such as an upload body
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    format: InputFormat,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, format: InputFormat, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl InputSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self, limit: u64) -> Result<RawInput> {
        check_size(self.bytes.len() as u64, limit)?;
        Ok(RawInput {
            name: self.name.clone(),
            format: self.format,
            bytes: self.bytes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn size_cap_is_inclusive() {
        assert!(check_size(10, 10).is_ok());
        assert!(matches!(
            check_size(11, 10),
            Err(IngestError::OversizeInput { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let (text, lossy) = decode_text(b"ok\xffok");
        assert_eq!(text, "ok\u{fffd}ok");
        assert!(lossy);

        let (text, lossy) = decode_text("olá".as_bytes());
        assert_eq!(text, "olá");
        assert!(!lossy);
    }

    #[tokio::test]
    async fn file_source_reads_and_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "author_id,texts\nu1,oi\n").unwrap();

        let input = FileSource::new(file.path()).read(1024).await.unwrap();
        assert_eq!(input.format, InputFormat::Csv);
        assert_eq!(input.bytes, b"author_id,texts\nu1,oi\n");
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_before_reading() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[]").unwrap();

        let err = FileSource::new(file.path()).read(1).await.unwrap_err();
        assert!(matches!(err, IngestError::OversizeInput { size: 2, limit: 1 }));
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = FileSource::new(file.path()).read(1024).await.unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn memory_source_applies_the_cap() {
        let source = MemorySource::new("upload.json", InputFormat::Json, b"[1,2,3]".to_vec());
        assert_eq!(source.read(100).await.unwrap().bytes.len(), 7);
        assert!(source.read(3).await.is_err());
    }
}
