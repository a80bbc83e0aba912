use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported location: {0}")]
    UnsupportedLocation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed region: {0}")]
    MalformedRegion(String),

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl Error {
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NotFound",
            Error::UnsupportedLocation(_) => "UnsupportedLocation",
            Error::InvalidInput(_) => "InvalidInput",
            Error::MalformedRegion(_) => "MalformedRegion",
            Error::InvalidIndex(_) => "InvalidIndex",
            Error::Http(_) => "HttpError",
            Error::Io(_) | Error::Internal(_) => "InternalError",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UnsupportedLocation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::MalformedRegion(_) => StatusCode::BAD_REQUEST,
            // The index belongs to the upstream file, not to this service
            Error::InvalidIndex(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Io(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error_type(),
            message: self.to_string(),
        };
        (self.status_code(), axum::Json(body)).into_response()
    }
}
