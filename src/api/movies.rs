//! Purpose: Movie endpoints (create, show).
//! Role: Glue between the JSON boundary, the field rules, and hard-coded data.
//! Invariants: Decode errors short-circuit before any field rule runs.

use axum::body::Body;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;
use time::OffsetDateTime;

use super::errors::{
    bad_request_response, failed_validation_response, not_found_response, server_error_response,
};
use super::helpers::{read_id_param, read_json};
use crate::data::{Movie, MovieInput, Runtime, validate_movie};
use crate::json::{Envelope, MAX_BODY_BYTES, write_json};
use crate::validator::Validator;

pub(crate) async fn create_movie_handler(body: Body) -> Response {
    let input: MovieInput = match read_json(body, MAX_BODY_BYTES).await {
        Ok(input) => input,
        Err(err) => return bad_request_response(&err),
    };

    let mut v = Validator::new();
    validate_movie(&mut v, &input);
    if !v.valid() {
        return failed_validation_response(v.errors());
    }

    tracing::info!(title = %input.title, year = input.year, "movie accepted");
    write_json(StatusCode::CREATED, &Envelope::new("movie", &input), None)
        .unwrap_or_else(server_error_response)
}

pub(crate) async fn show_movie_handler(Path(raw_id): Path<String>) -> Response {
    let Some(id) = read_id_param(&raw_id) else {
        return not_found_response();
    };

    let movie = Movie {
        id,
        created_at: OffsetDateTime::now_utc(),
        title: "Casablanca".to_string(),
        year: 1942,
        runtime: Runtime(102),
        genres: vec!["drama".to_string(), "romance".to_string(), "war".to_string()],
        version: 1,
    };

    write_json(StatusCode::OK, &Envelope::new("movie", &movie), None)
        .unwrap_or_else(server_error_response)
}
