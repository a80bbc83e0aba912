//! HTTP/HTTPS file handle.
//!
//! Reads are served with `Range` requests. Servers that ignore the header and
//! answer `200 OK` with the whole body are tolerated by slicing locally.

use super::{ByteRange, FileHandle};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use url::Url;

/// A remote file read over HTTP range requests.
pub struct HttpFile {
    client: Client,
    url: Url,
}

impl HttpFile {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Format a `Range` header value. `ByteRange::end` is exclusive while
    /// HTTP ranges are inclusive.
    fn range_header(range: &ByteRange) -> String {
        match range.end {
            Some(end) => format!("bytes={}-{}", range.start, end.saturating_sub(1)),
            None => format!("bytes={}-", range.start),
        }
    }

    /// Cut the requested window out of a full-body response.
    fn slice_full_body(body: Bytes, range: &ByteRange) -> Bytes {
        let len = body.len() as u64;
        let start = range.start.min(len) as usize;
        let end = range.end.unwrap_or(len).min(len) as usize;
        body.slice(start..end.max(start))
    }
}

#[async_trait]
impl FileHandle for HttpFile {
    fn location(&self) -> &str {
        self.url.as_str()
    }

    async fn read_range(&self, range: ByteRange) -> Result<Bytes> {
        if range.is_empty() {
            return Ok(Bytes::new());
        }

        let mut request = self.client.get(self.url.clone());
        if range != ByteRange::from_start(0) {
            request = request.header(reqwest::header::RANGE, Self::range_header(&range));
        }

        tracing::debug!(url = %self.url, ?range, "fetching byte range");

        let response = request
            .send()
            .await
            .map_err(|e| Error::Http(format!("GET {} failed: {}", self.url, e)))?;

        let status = response.status();
        match status {
            StatusCode::PARTIAL_CONTENT => response
                .bytes()
                .await
                .map_err(|e| Error::Http(format!("failed to read {}: {}", self.url, e))),
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| Error::Http(format!("failed to read {}: {}", self.url, e)))?;
                Ok(Self::slice_full_body(body, &range))
            }
            // Range starts past the end of the file
            StatusCode::RANGE_NOT_SATISFIABLE => Ok(Bytes::new()),
            StatusCode::NOT_FOUND => Err(Error::NotFound(self.url.to_string())),
            _ => Err(Error::Http(format!(
                "unexpected HTTP status {} for {}",
                status, self.url
            ))),
        }
    }
}
