//! BGZF block index (`.gzi`).
//!
//! Binary, little-endian: a `u64` entry count followed by that many
//! `(compressed_offset, uncompressed_offset)` pairs of `u64`, one per block
//! boundary. The first block, at `(0, 0)`, is implicit.

use crate::storage::ByteRange;
use crate::{Error, Result};
use bytes::Buf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GziIndex {
    /// Block starts as (compressed, uncompressed), always beginning with (0, 0)
    blocks: Vec<(u64, u64)>,
}

/// Compressed bytes to read for an uncompressed range, and where the
/// requested data starts once that span is decompressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub compressed: ByteRange,
    /// Uncompressed offset of the first block in the span
    pub uncompressed_start: u64,
}

impl GziIndex {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut buf = data;
        if buf.remaining() < 8 {
            return Err(Error::InvalidIndex(
                "gzi data too short (less than 8 bytes)".to_string(),
            ));
        }

        let count = buf.get_u64_le();
        let expected = count
            .checked_mul(16)
            .filter(|&n| n == buf.remaining() as u64)
            .ok_or_else(|| {
                Error::InvalidIndex(format!(
                    "gzi declares {} entries but holds {} bytes of entries",
                    count,
                    buf.remaining()
                ))
            })?;

        let mut blocks = Vec::with_capacity(expected as usize / 16 + 1);
        blocks.push((0, 0));

        while buf.has_remaining() {
            let compressed = buf.get_u64_le();
            let uncompressed = buf.get_u64_le();

            if blocks.len() == 1 && (compressed, uncompressed) == (0, 0) {
                continue;
            }

            let &(last_compressed, last_uncompressed) = blocks.last().unwrap_or(&(0, 0));
            if compressed <= last_compressed || uncompressed < last_uncompressed {
                return Err(Error::InvalidIndex(format!(
                    "gzi entries out of order at compressed offset {}",
                    compressed
                )));
            }

            blocks.push((compressed, uncompressed));
        }

        Ok(Self { blocks })
    }

    /// Number of blocks, counting the implicit first one. Never zero.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Map an uncompressed range onto the whole blocks that contain it.
    pub fn block_span(&self, range: ByteRange) -> BlockSpan {
        let first = self
            .blocks
            .partition_point(|&(_, uncompressed)| uncompressed <= range.start)
            .saturating_sub(1);
        let (compressed_start, uncompressed_start) = self.blocks[first];

        let compressed_end = range.end.and_then(|end| {
            self.blocks[first + 1..]
                .iter()
                .find(|&&(_, uncompressed)| uncompressed >= end)
                .map(|&(compressed, _)| compressed)
        });

        BlockSpan {
            compressed: ByteRange {
                start: compressed_start,
                end: compressed_end,
            },
            uncompressed_start,
        }
    }
}
