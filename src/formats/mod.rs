//! Indexed sequence sources.
//!
//! A [`SequenceSource`] answers residue queries by sequence name and 1-based
//! inclusive range. Two readers are provided, both driven by a `.fai` index:
//!
//! - [`IndexedFasta`] - uncompressed FASTA (`<url>`, `<url>.fai`)
//! - [`BgzipIndexedFasta`] - bgzip FASTA (`<url>`, `<url>.fai`, `<url>.gzi`)
//!
//! [`open_source`] picks between them from the URL. Construction does no I/O;
//! indexes are fetched on the first query and reused afterwards.

mod bgzip;
mod fasta;
mod gzi;

pub use bgzip::BgzipIndexedFasta;
pub use fasta::{FaiRecord, IndexedFasta, SequenceIndex};
pub use gzi::{BlockSpan, GziIndex};

use crate::Result;
use crate::storage::FileOpener;
use crate::types::SequenceSize;
use async_trait::async_trait;
use noodles::core::Position;
use std::sync::Arc;

/// Random access to the residues of named sequences
#[async_trait]
pub trait SequenceSource: Send + Sync {
    /// Residues of `name` between `start` and `end`, 1-based and inclusive.
    ///
    /// `end` is clamped to the sequence length and an empty string is
    /// returned when nothing is left. Returns `None` if `name` is not in
    /// the index.
    async fn fetch_by_name(
        &self,
        name: &str,
        start: Position,
        end: Position,
    ) -> Result<Option<String>>;

    /// Every sequence in the index with its length, in index order
    async fn sequence_sizes(&self) -> Result<Vec<SequenceSize>>;
}

/// Whether a URL names a bgzip-compressed FASTA file
pub fn is_bgzip(url: &str) -> bool {
    url.ends_with(".gz")
}

/// Build the sequence source for a FASTA URL.
pub fn open_source(opener: &FileOpener, url: &str) -> Result<Arc<dyn SequenceSource>> {
    let fasta = opener.open(url)?;
    let fai = opener.open(&format!("{}.fai", url))?;

    let source: Arc<dyn SequenceSource> = if is_bgzip(url) {
        let gzi = opener.open(&format!("{}.gzi", url))?;
        tracing::info!(url, "opening bgzip indexed FASTA");
        Arc::new(BgzipIndexedFasta::new(fasta, fai, gzi))
    } else {
        tracing::info!(url, "opening indexed FASTA");
        Arc::new(IndexedFasta::new(fasta, fai))
    };

    Ok(source)
}
