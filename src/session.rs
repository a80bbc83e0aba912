//! Viewer session state.
//!
//! A [`Viewer`] owns what the viewer page shows: the FASTA URL, the region
//! text, and the outcome of the latest resolution cycle. The sequence source
//! is rebuilt only when the URL changes. Each [`Viewer::refresh`] takes a new
//! generation number, and its outcome is applied only if no newer cycle was
//! started in the meantime, so a slow stale cycle cannot overwrite fresher
//! results.

use crate::formats::{SequenceSource, open_source};
use crate::storage::FileOpener;
use crate::types::ResolvedRegion;
use crate::{Result, locations, resolver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Builds a sequence source for a URL
pub type SourceFactory = Arc<dyn Fn(&str) -> Result<Arc<dyn SequenceSource>> + Send + Sync>;

/// State of the most recent applied resolution cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CycleState {
    #[default]
    Idle,
    Pending,
    Success(Vec<ResolvedRegion>),
    Failure(String),
}

/// Copy of the viewer state for rendering
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub url: String,
    pub locations: String,
    pub state: CycleState,
    pub generation: u64,
}

struct Inner {
    url: String,
    source: Option<Arc<dyn SequenceSource>>,
    locations: String,
    state: CycleState,
}

pub struct Viewer {
    factory: SourceFactory,
    generation: AtomicU64,
    inner: Mutex<Inner>,
}

impl Viewer {
    pub fn new(factory: SourceFactory) -> Self {
        Self {
            factory,
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                url: String::new(),
                source: None,
                locations: String::new(),
                state: CycleState::Idle,
            }),
        }
    }

    /// A viewer whose sources are opened with [`open_source`].
    pub fn with_opener(opener: FileOpener) -> Self {
        Self::new(Arc::new(move |url: &str| open_source(&opener, url)))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is replaced wholesale, so a poisoned guard is still consistent
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new generation, invalidating every cycle still in flight.
    ///
    /// Callers hold the state lock so the bump and the input change it
    /// guards are seen together.
    fn advance(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Point the viewer at a FASTA URL, rebuilding the source if it changed.
    ///
    /// Any change abandons cycles started against the previous URL. On
    /// failure the viewer is left without a source and shows the error.
    pub fn set_url(&self, url: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.url == url && inner.source.is_some() {
            return Ok(());
        }

        self.advance();
        inner.url = url.to_string();
        match (self.factory)(url) {
            Ok(source) => {
                tracing::debug!(url, "rebuilt sequence source");
                inner.source = Some(source);
                inner.state = CycleState::Idle;
                Ok(())
            }
            Err(e) => {
                inner.source = None;
                inner.state = CycleState::Failure(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the region text. A changed text abandons cycles in flight.
    pub fn set_locations(&self, text: &str) {
        let mut inner = self.lock();
        if inner.locations != text {
            self.advance();
            inner.locations = text.to_string();
        }
    }

    /// Run one resolution cycle over the current URL and region text.
    ///
    /// Returns `true` if the outcome was applied, `false` if a newer cycle
    /// started first and this one was discarded.
    pub async fn refresh(&self) -> bool {
        let (generation, source, text) = {
            let mut inner = self.lock();
            let generation = self.advance();
            let Some(source) = inner.source.clone() else {
                tracing::debug!(generation, "no sequence source, skipping cycle");
                return false;
            };
            inner.state = CycleState::Pending;
            (generation, source, inner.locations.clone())
        };

        let outcome = resolver::resolve(source, locations::parse(&text)).await;

        let mut inner = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale resolution cycle");
            return false;
        }

        inner.state = match outcome {
            Ok(regions) => CycleState::Success(regions),
            Err(e) => {
                tracing::warn!(generation, error = %e, "resolution cycle failed");
                CycleState::Failure(e.to_string())
            }
        };
        true
    }

    /// Update both inputs and run a cycle, as the viewer form does.
    pub async fn update(&self, url: &str, locations: &str) -> bool {
        self.set_locations(locations);
        if self.set_url(url).is_err() {
            return false;
        }
        self.refresh().await
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let inner = self.lock();
        ViewSnapshot {
            url: inner.url.clone(),
            locations: inner.locations.clone(),
            state: inner.state.clone(),
            generation: self.generation.load(Ordering::SeqCst),
        }
    }
}
