use super::AppState;
use crate::formats::open_source;
use crate::types::{ResiduesQuery, SequenceSize, SequencesQuery};
use crate::{Result, locations, render, resolver};
use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

/// Resolve regions against a URL in one shot and return FASTA text.
pub async fn get_residues(
    State(state): State<AppState>,
    Query(query): Query<ResiduesQuery>,
) -> Result<impl IntoResponse> {
    let source = open_source(&state.opener, &query.url)?;
    let regions = resolver::resolve(source, locations::parse(&query.locations)).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/x-fasta")],
        render::fasta_records(&regions),
    ))
}

/// List sequence names and lengths from a FASTA index
pub async fn get_sequences(
    State(state): State<AppState>,
    Query(query): Query<SequencesQuery>,
) -> Result<Json<Vec<SequenceSize>>> {
    let source = open_source(&state.opener, &query.url)?;
    Ok(Json(source.sequence_sizes().await?))
}
