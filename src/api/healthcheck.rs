use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use super::Application;
use super::errors::server_error_response;
use crate::config::{Environment, VERSION};
use crate::json::{Envelope, write_json};

#[derive(Debug, Serialize)]
struct SystemInfo {
    status: &'static str,
    environment: Environment,
    version: &'static str,
}

pub(crate) async fn healthcheck_handler(State(app): State<Arc<Application>>) -> Response {
    let info = SystemInfo {
        status: "available",
        environment: app.config().env,
        version: VERSION,
    };
    write_json(StatusCode::OK, &Envelope::new("healthcheck", info), None)
        .unwrap_or_else(server_error_response)
}
