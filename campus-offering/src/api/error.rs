//! Error responses
//!
//! Maps the shared error taxonomy onto HTTP status codes.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use campus_common::Error;

/// Handler error wrapper
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(Error::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Infrastructure details stay in the log
        let message = if status.is_server_error() {
            error!("Request failed: {}", self.0);
            "Something went wrong".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::not_found("x"), StatusCode::NOT_FOUND),
            (Error::bad_request("x"), StatusCode::BAD_REQUEST),
            (Error::conflict("x"), StatusCode::CONFLICT),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }
}
