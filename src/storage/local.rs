use super::{ByteRange, FileHandle};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub struct LocalFile {
    path: PathBuf,
    location: String,
}

impl LocalFile {
    pub fn new(path: PathBuf) -> Self {
        let location = path.display().to_string();
        Self { path, location }
    }

    async fn open(&self) -> Result<fs::File> {
        fs::File::open(&self.path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(self.location.clone()),
            _ => Error::Io(e),
        })
    }
}

#[async_trait]
impl FileHandle for LocalFile {
    fn location(&self) -> &str {
        &self.location
    }

    async fn read_range(&self, range: ByteRange) -> Result<Bytes> {
        let mut file = self.open().await?;
        file.seek(SeekFrom::Start(range.start)).await?;

        let mut buf = Vec::new();
        match range.len() {
            Some(len) => {
                file.take(len).read_to_end(&mut buf).await?;
            }
            None => {
                file.read_to_end(&mut buf).await?;
            }
        }

        Ok(Bytes::from(buf))
    }
}
