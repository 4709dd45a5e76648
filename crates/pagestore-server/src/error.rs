use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pagestore_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Wrong runtime mode or unsupported method.
    #[error("not allowed")]
    NotAllowed,

    #[error("invalid type")]
    InvalidType,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAllowed => StatusCode::UNAUTHORIZED,
            Self::InvalidType | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::InvalidKey { .. }) => StatusCode::BAD_REQUEST,
            Self::AssetNotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::NotAllowed => "Not allowed".into(),
            Self::InvalidType => "Invalid type".into(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Store(err @ StoreError::InvalidKey { .. }) => err.to_string(),
            Self::AssetNotFound(path) => format!("Asset not found: {path}"),
            _ => "Internal error".into(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
