//! Purpose: HTTP surface for the movie API.
//! Exports: `Application`, `routes`.
//! Role: Axum router wiring handlers to the JSON boundary; state is immutable config only.
//! Invariants: Unknown paths answer 404 and known paths with the wrong method answer 405,
//! both as JSON error envelopes.
//! Invariants: Handlers share no mutable state between requests.

mod errors;
mod healthcheck;
mod helpers;
mod movies;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::Config;

#[derive(Clone, Debug)]
pub struct Application {
    config: Config,
}

impl Application {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

pub fn routes(app: Arc<Application>) -> Router {
    Router::new()
        .route(
            "/v1/healthcheck",
            get(healthcheck::healthcheck_handler).fallback(errors::method_not_allowed_handler),
        )
        .route(
            "/v1/movies",
            post(movies::create_movie_handler).fallback(errors::method_not_allowed_handler),
        )
        .route(
            "/v1/movies/:id",
            get(movies::show_movie_handler).fallback(errors::method_not_allowed_handler),
        )
        .fallback(errors::not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
