use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the hand-in API.
///
/// Everything user-correctable maps to a 400, missing entities to a 404.
/// Persistence and I/O failures are logged but never serialized to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation error")]
    Validation(Vec<String>),

    #[error("invalid identifier format")]
    InvalidIdentifier,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    RejectedFile(&'static str),

    #[error("internal server error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => {
                let body = match errors.as_slice() {
                    [single] => json!({ "message": single }),
                    _ => json!({ "message": "validation error", "errors": errors }),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            Self::InvalidIdentifier | Self::RejectedFile(_) => {
                (StatusCode::BAD_REQUEST, json!({ "message": self.to_string() }))
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "message": self.to_string() })),
            Self::Database(ref source) => {
                tracing::error!(error = %source, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "internal server error" }),
                )
            }
            Self::Io(ref source) => {
                tracing::error!(error = %source, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
