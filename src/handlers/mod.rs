mod residues;
mod view;

pub use residues::{get_residues, get_sequences};
pub use view::{get_view, post_view};

use crate::session::Viewer;
use crate::storage::FileOpener;
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The one viewer session behind `/`. Every client shares it, so
    /// concurrent form posts see each other's URL and results.
    pub viewer: Arc<Viewer>,
    pub opener: FileOpener,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Browser viewer
        .route("/", get(get_view).post(post_view))
        // Stateless endpoints
        .route("/residues", get(get_residues))
        .route("/sequences", get(get_sequences))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
