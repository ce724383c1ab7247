//! Error types for the census server
//!
//! Every fallible path in the server funnels into [`Error`], which knows how
//! to render itself as an HTTP response. Database and internal failures are
//! logged server-side and replaced with a generic message so connection
//! strings and SQL never leak to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client sent a request that fails validation (bad filter operator,
    /// empty required field, non-Latin name). Rendered verbatim with 400.
    #[error("{0}")]
    Validation(String),

    #[error("person {id} not found")]
    PersonNotFound { id: i64 },

    /// A name enrichment lookup failed or timed out.
    #[error(transparent)]
    Lookup(#[from] census_lookup::Error),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::PersonNotFound { .. } => StatusCode::NOT_FOUND,
            Error::Lookup(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Error::Lookup(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Error::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "internal storage error".to_string()
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                "internal error".to_string()
            }
            _ => self.to_string(),
        };
        (status, body).into_response()
    }
}
