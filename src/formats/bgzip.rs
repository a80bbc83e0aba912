//! Indexed reader over bgzip-compressed FASTA.
//!
//! The `.fai` offsets refer to the uncompressed stream. The `.gzi` maps them
//! to BGZF block starts, so a region read fetches only the blocks that hold
//! it and inflates them on a blocking thread.

use super::SequenceSource;
use super::fasta::{LazyIndex, collect_residues};
use super::gzi::GziIndex;
use crate::storage::{ByteRange, FileHandle};
use crate::types::SequenceSize;
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use noodles::core::Position;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub struct BgzipIndexedFasta {
    fasta: Arc<dyn FileHandle>,
    index: LazyIndex,
    gzi: Arc<dyn FileHandle>,
    blocks: OnceCell<GziIndex>,
}

impl BgzipIndexedFasta {
    pub fn new(
        fasta: Arc<dyn FileHandle>,
        fai: Arc<dyn FileHandle>,
        gzi: Arc<dyn FileHandle>,
    ) -> Self {
        Self {
            fasta,
            index: LazyIndex::new(fai),
            gzi,
            blocks: OnceCell::new(),
        }
    }

    async fn blocks(&self) -> Result<&GziIndex> {
        self.blocks
            .get_or_try_init(|| async {
                tracing::debug!(location = self.gzi.location(), "loading GZI index");
                let data = self.gzi.read_all().await?;
                GziIndex::from_bytes(&data)
            })
            .await
    }

    /// Read an uncompressed byte range.
    async fn read_uncompressed(&self, range: ByteRange) -> Result<Bytes> {
        let span = self.blocks().await?.block_span(range);
        let compressed = self.fasta.read_range(span.compressed).await?;

        let inflated = tokio::task::spawn_blocking(move || inflate(&compressed))
            .await
            .map_err(|e| Error::Internal(format!("BGZF decompression task failed: {}", e)))??;

        let skip = (range.start - span.uncompressed_start) as usize;
        let take = range.len().unwrap_or(u64::MAX) as usize;
        if skip > inflated.len() {
            return Err(Error::InvalidIndex(format!(
                "BGZF data for {} ends before uncompressed offset {}",
                self.fasta.location(),
                range.start
            )));
        }

        let end = skip.saturating_add(take).min(inflated.len());
        Ok(Bytes::from(inflated).slice(skip..end))
    }
}

/// Decompress a run of whole BGZF blocks.
fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut inflated = Vec::new();
    MultiGzDecoder::new(compressed)
        .read_to_end(&mut inflated)
        .map_err(|e| Error::InvalidIndex(format!("failed to decompress BGZF blocks: {}", e)))?;
    Ok(inflated)
}

#[async_trait]
impl SequenceSource for BgzipIndexedFasta {
    async fn fetch_by_name(
        &self,
        name: &str,
        start: Position,
        end: Position,
    ) -> Result<Option<String>> {
        let index = self.index.get().await?;
        let Some(record) = index.get(name) else {
            return Ok(None);
        };

        let Some(range) = record.residue_range(start, end) else {
            return Ok(Some(String::new()));
        };

        let raw = self.read_uncompressed(range).await?;
        Ok(Some(collect_residues(&raw, record.residue_count(start, end))))
    }

    async fn sequence_sizes(&self) -> Result<Vec<SequenceSize>> {
        Ok(self.index.get().await?.sizes())
    }
}
