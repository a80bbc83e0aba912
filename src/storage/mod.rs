//! File handle abstraction for sequence and index files.
//!
//! Sequence sources read their data through [`FileHandle`], so the same
//! reader works over HTTP range requests and local files alike.
//!
//! # Implementations
//!
//! - [`HttpFile`] - HTTP/HTTPS with `Range` requests (feature `http`)
//! - [`LocalFile`] - local filesystem, bare paths or `file://` URLs
//!
//! # Example
//!
//! ```no_run
//! use faview::storage::FileOpener;
//! use std::time::Duration;
//!
//! # fn main() -> faview::Result<()> {
//! let opener = FileOpener::new(Duration::from_secs(30))?;
//! let fai = opener.open("https://example.com/hg19.fa.gz.fai")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
mod http;
mod local;

#[cfg(feature = "http")]
pub use http::HttpFile;
pub use local::LocalFile;

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Byte range within a file. `end` is exclusive; `None` reads to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Number of bytes covered, if bounded
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

/// Random-access handle to a single file
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// The URL or path this handle reads from
    fn location(&self) -> &str;

    /// Read a byte range. Reads past the end of the file return fewer bytes.
    async fn read_range(&self, range: ByteRange) -> Result<Bytes>;

    /// Read the whole file
    async fn read_all(&self) -> Result<Bytes> {
        self.read_range(ByteRange::from_start(0)).await
    }
}

/// Opens file handles by location, sharing one HTTP client across them.
#[derive(Clone)]
pub struct FileOpener {
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl FileOpener {
    pub fn new(timeout: Duration) -> Result<Self> {
        #[cfg(feature = "http")]
        {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| Error::Internal(format!("failed to create HTTP client: {}", e)))?;
            Ok(Self { client })
        }

        #[cfg(not(feature = "http"))]
        {
            let _ = timeout;
            Ok(Self {})
        }
    }

    /// Open a handle for an `http(s)://` URL, a `file://` URL or a bare path.
    pub fn open(&self, location: &str) -> Result<Arc<dyn FileHandle>> {
        if location.trim().is_empty() {
            return Err(Error::InvalidInput("empty file location".to_string()));
        }

        let handle: Arc<dyn FileHandle> = match Url::parse(location) {
            Ok(url) => match url.scheme() {
                #[cfg(feature = "http")]
                "http" | "https" => Arc::new(HttpFile::new(self.client.clone(), url)),
                "file" => {
                    let path = url.to_file_path().map_err(|_| {
                        Error::UnsupportedLocation(format!("invalid file URL: {}", location))
                    })?;
                    Arc::new(LocalFile::new(path))
                }
                // Windows drive letters parse as one-letter schemes
                scheme if scheme.len() == 1 => Arc::new(LocalFile::new(PathBuf::from(location))),
                scheme => {
                    return Err(Error::UnsupportedLocation(format!(
                        "unsupported scheme '{}' in {}",
                        scheme, location
                    )));
                }
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Arc::new(LocalFile::new(PathBuf::from(location)))
            }
            Err(e) => return Err(Error::UnsupportedLocation(format!("{}: {}", location, e))),
        };
        Ok(handle)
    }
}
