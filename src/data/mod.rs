// Resource models served by the API.
pub mod movies;

pub use movies::{Movie, MovieInput, Runtime, validate_movie};
