use serde::{Deserialize, Serialize};

/// A single region line as typed by the user.
///
/// Bounds are 1-based and inclusive. A bound that did not parse as an
/// integer is `None`; such requests are carried as-is and rejected when
/// they are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRequest {
    /// The original line, used as the record header when rendering
    pub text: String,
    pub name: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// A request paired with the residues fetched for it.
///
/// `residues` is `None` when the source does not know the sequence name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub request: RegionRequest,
    pub residues: Option<String>,
}

/// Outcome of one resolution cycle: every region in input order, or the
/// first error.
pub type ResolutionResult = crate::Result<Vec<ResolvedRegion>>;

/// Name and length of one sequence in an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceSize {
    pub name: String,
    pub length: u64,
}

/// Form fields posted by the viewer page
#[derive(Debug, Deserialize)]
pub struct ViewForm {
    pub url: String,
    #[serde(default)]
    pub locations: String,
}

/// Query parameters for the stateless residues endpoint
#[derive(Debug, Deserialize)]
pub struct ResiduesQuery {
    pub url: String,
    #[serde(default)]
    pub locations: String,
}

#[derive(Debug, Deserialize)]
pub struct SequencesQuery {
    pub url: String,
}
