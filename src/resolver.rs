//! Concurrent resolution of a batch of region requests.
//!
//! Every request becomes its own task on a [`JoinSet`], launched in input
//! order. Outcomes are joined as they complete and slotted back by index, so
//! the result order always matches the request order. The first failure to
//! complete ends the batch: no partial results are returned, and the
//! remaining fetches are left to run out in the background.

use crate::formats::SequenceSource;
use crate::types::{RegionRequest, ResolutionResult, ResolvedRegion};
use crate::{Error, Result};
use noodles::core::Position;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Fetch residues for every request concurrently.
pub async fn resolve(
    source: Arc<dyn SequenceSource>,
    requests: Vec<RegionRequest>,
) -> ResolutionResult {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    let mut tasks = JoinSet::new();
    for (i, request) in requests.iter().enumerate() {
        let source = Arc::clone(&source);
        let request = request.clone();
        tasks.spawn(async move { (i, fetch(source.as_ref(), &request).await) });
    }

    let mut slots: Vec<Option<Option<String>>> = vec![None; requests.len()];
    while let Some(joined) = tasks.join_next().await {
        let (i, outcome) =
            joined.map_err(|e| Error::Internal(format!("fetch task failed: {}", e)))?;

        match outcome {
            Ok(residues) => slots[i] = Some(residues),
            Err(e) => {
                tracing::debug!(
                    region = %requests[i].text,
                    pending = tasks.len(),
                    "fetch failed, discarding batch"
                );
                tasks.detach_all();
                return Err(e);
            }
        }
    }

    requests
        .into_iter()
        .zip(slots)
        .map(|(request, slot)| {
            let residues = slot.ok_or_else(|| {
                Error::Internal(format!("no outcome recorded for {}", request.text))
            })?;
            Ok(ResolvedRegion { request, residues })
        })
        .collect()
}

/// Fetch one request, rejecting bounds that are missing or not 1-based.
async fn fetch(source: &dyn SequenceSource, request: &RegionRequest) -> Result<Option<String>> {
    let (start, end) = bounds(request)?;
    tracing::debug!(name = %request.name, %start, %end, "fetching region");
    source.fetch_by_name(&request.name, start, end).await
}

fn bounds(request: &RegionRequest) -> Result<(Position, Position)> {
    let position = |bound: Option<u64>| {
        bound
            .and_then(|n| usize::try_from(n).ok())
            .and_then(|n| Position::try_from(n).ok())
            .ok_or_else(|| Error::MalformedRegion(format!("'{}'", request.text)))
    };

    Ok((position(request.start)?, position(request.end)?))
}
