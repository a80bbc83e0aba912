use super::AppState;
use crate::render;
use crate::types::ViewForm;
use axum::{Form, extract::State, response::Html};

pub async fn get_view(State(state): State<AppState>) -> Html<String> {
    Html(render::page(&state.viewer.snapshot()))
}

/// Apply the submitted URL and regions, run a cycle, and show the result.
///
/// Errors are part of the page, so this always answers `200 OK`.
pub async fn post_view(
    State(state): State<AppState>,
    Form(form): Form<ViewForm>,
) -> Html<String> {
    state.viewer.update(form.url.trim(), &form.locations).await;
    Html(render::page(&state.viewer.snapshot()))
}
