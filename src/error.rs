// Request-level error taxonomy. Every variant maps to an HTTP status;
// handlers return Result<_, ApiError> and short-circuit with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client-caused: bad query parameters or an unknown table name. 400.
    #[error("{0}")]
    InvalidParameter(String),

    /// Backend query/connection failure. 500, no retry.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A per-table query exceeded the configured deadline. 500.
    #[error("storage error: {table} query timed out")]
    QueryTimeout { table: &'static str },

    /// Serialization or compression failure. 500; fetched data is discarded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::QueryTimeout { .. } | ApiError::Encoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::InvalidParameter("machine_id is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::QueryTimeout { table: "rent_ts" }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Encoding("gzip write failed".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_are_human_readable() {
        let e = ApiError::InvalidParameter("machine_id should be an integer: abc".into());
        assert_eq!(e.to_string(), "machine_id should be an integer: abc");

        let e = ApiError::QueryTimeout { table: "avg_ts" };
        assert_eq!(e.to_string(), "storage error: avg_ts query timed out");
    }
}
