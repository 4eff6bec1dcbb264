//! Purpose: JSON error responses shared by all handlers.
//! Invariants: Every error body is `{"error": ...}`; server-side detail is logged, never sent.

use std::collections::BTreeMap;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::error::Error;
use crate::json::{DecodeError, Envelope, write_json};

fn error_response<T: Serialize>(status: StatusCode, message: T) -> Response {
    match write_json(status, &Envelope::error(message), None) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "failed to write error response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) fn server_error_response(err: Error) -> Response {
    tracing::error!(error = %err, "request failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "the server encountered a problem and could not process your request",
    )
}

pub(crate) fn not_found_response() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "the requested resource could not be found",
    )
}

pub(crate) fn bad_request_response(err: &DecodeError) -> Response {
    tracing::debug!(kind = err.kind().as_str(), "rejected request body");
    error_response(StatusCode::BAD_REQUEST, err.message())
}

pub(crate) fn failed_validation_response(errors: &BTreeMap<String, String>) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, errors)
}

pub(crate) async fn not_found_handler() -> Response {
    not_found_response()
}

pub(crate) async fn method_not_allowed_handler(method: Method) -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("the {method} method is not supported for this resource"),
    )
}
