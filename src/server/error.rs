//! Error-to-response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::Error;

/// Response wrapper for [`Error`].
///
/// Validation failures and missing entities surface their message as plain
/// text, matching the service's text-only error bodies. Persistence and
/// I/O failures are logged with their cause but answered with a generic
/// body, so internal paths never leak to clients.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, format!("Error: {message}")).into_response()
            }
            Error::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("Error: {what} not found")).into_response()
            }
            Error::OperationFailed { operation, cause } => {
                tracing::error!(operation = %operation, cause = %cause, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error: internal failure".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let resp = ApiError(Error::InvalidInput("x".into())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError(Error::NotFound("item 1".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError(Error::OperationFailed {
            operation: "persist".into(),
            cause: "disk full".into(),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
