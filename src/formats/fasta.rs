use super::SequenceSource;
use crate::storage::{ByteRange, FileHandle};
use crate::types::SequenceSize;
use crate::{Error, Result};
use async_trait::async_trait;
use noodles::core::Position;
use noodles::fasta::fai;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// One `.fai` line: where a sequence's residues sit in the uncompressed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaiRecord {
    pub name: String,
    pub length: u64,
    pub offset: u64,
    pub line_bases: u64,
    pub line_width: u64,
}

impl FaiRecord {
    /// Byte range covering the 1-based inclusive residues `start..=end`.
    ///
    /// `end` is clamped to the sequence length. Returns `None` when the
    /// clamped region holds no residues.
    pub fn residue_range(&self, start: Position, end: Position) -> Option<ByteRange> {
        let start_base = usize::from(start) as u64 - 1;
        let end_base = (usize::from(end) as u64).min(self.length);

        if start_base >= end_base || self.line_bases == 0 {
            return None;
        }

        // Convert base coordinates to byte offsets
        // Each line has line_bases bases and line_width bytes
        let start_line = start_base / self.line_bases;
        let end_line = (end_base - 1) / self.line_bases;

        let byte_start = self.offset + start_line * self.line_width + (start_base % self.line_bases);
        let byte_end =
            self.offset + end_line * self.line_width + ((end_base - 1) % self.line_bases) + 1;

        Some(ByteRange::new(byte_start, byte_end))
    }

    /// Number of residues a clamped `start..=end` request yields
    pub fn residue_count(&self, start: Position, end: Position) -> u64 {
        let start_base = usize::from(start) as u64 - 1;
        let end_base = (usize::from(end) as u64).min(self.length);
        end_base.saturating_sub(start_base)
    }
}

/// Parsed `.fai` index, in file order with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct SequenceIndex {
    records: Vec<FaiRecord>,
    by_name: HashMap<String, usize>,
}

impl SequenceIndex {
    pub fn from_fai_bytes(data: &[u8]) -> Result<Self> {
        let index = fai::Reader::new(data)
            .read_index()
            .map_err(|e| Error::InvalidIndex(format!("failed to read FAI index: {}", e)))?;

        let records: Vec<FaiRecord> = index
            .as_ref()
            .iter()
            .map(|record| FaiRecord {
                name: String::from_utf8_lossy(record.name()).into_owned(),
                length: record.length() as u64,
                offset: record.offset() as u64,
                line_bases: record.line_bases() as u64,
                line_width: record.line_width() as u64,
            })
            .collect();

        if let Some(bad) = records.iter().find(|r| r.line_width < r.line_bases) {
            return Err(Error::InvalidIndex(format!(
                "line width {} is less than line bases {} for {}",
                bad.line_width, bad.line_bases, bad.name
            )));
        }

        let by_name = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name.clone(), i))
            .collect();

        Ok(Self { records, by_name })
    }

    pub fn get(&self, name: &str) -> Option<&FaiRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sizes(&self) -> Vec<SequenceSize> {
        self.records
            .iter()
            .map(|record| SequenceSize {
                name: record.name.clone(),
                length: record.length,
            })
            .collect()
    }
}

/// A `.fai` index fetched on first use and shared by every later fetch.
pub(crate) struct LazyIndex {
    fai: Arc<dyn FileHandle>,
    cell: OnceCell<SequenceIndex>,
}

impl LazyIndex {
    pub(crate) fn new(fai: Arc<dyn FileHandle>) -> Self {
        Self {
            fai,
            cell: OnceCell::new(),
        }
    }

    pub(crate) async fn get(&self) -> Result<&SequenceIndex> {
        self.cell
            .get_or_try_init(|| async {
                tracing::debug!(location = self.fai.location(), "loading FAI index");
                let data = self.fai.read_all().await?;
                let index = SequenceIndex::from_fai_bytes(&data)?;
                tracing::debug!(
                    location = self.fai.location(),
                    sequences = index.len(),
                    "loaded FAI index"
                );
                Ok::<_, Error>(index)
            })
            .await
    }
}

/// Strip line breaks from raw FASTA bytes, keeping at most `count` residues.
pub(crate) fn collect_residues(raw: &[u8], count: u64) -> String {
    let residues: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|&b| b != b'\n' && b != b'\r')
        .take(count as usize)
        .collect();
    String::from_utf8_lossy(&residues).into_owned()
}

/// Indexed reader over an uncompressed FASTA file and its `.fai`.
pub struct IndexedFasta {
    fasta: Arc<dyn FileHandle>,
    index: LazyIndex,
}

impl IndexedFasta {
    pub fn new(fasta: Arc<dyn FileHandle>, fai: Arc<dyn FileHandle>) -> Self {
        Self {
            fasta,
            index: LazyIndex::new(fai),
        }
    }
}

#[async_trait]
impl SequenceSource for IndexedFasta {
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

        let raw = self.fasta.read_range(range).await?;
        Ok(Some(collect_residues(&raw, record.residue_count(start, end))))
    }

    async fn sequence_sizes(&self) -> Result<Vec<SequenceSize>> {
        Ok(self.index.get().await?.sizes())
    }
}
