//! Purpose: Movie resource model and its field rules.
//! Exports: `Movie`, `MovieInput`, `Runtime`, `validate_movie`.
//! Role: Placeholder resource; rules are expressed through `Validator::check`.
//! Invariants: `created_at` is never serialized.
//! Invariants: `Runtime` encodes as "<n> mins" and decodes from that form or a bare integer.

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

use crate::validator::{Validator, unique};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Runtime(pub i32);

impl Runtime {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct RuntimeVisitor;

impl<'de> Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number of minutes or a string like \"102 mins\"")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Runtime, E> {
        i32::try_from(value)
            .map(Runtime)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Runtime, E> {
        i32::try_from(value)
            .map(Runtime)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Runtime, E> {
        value
            .strip_suffix(" mins")
            .and_then(|minutes| minutes.parse::<i32>().ok())
            .map(Runtime)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero_year")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: i32,
}

fn is_zero_year(year: &i32) -> bool {
    *year == 0
}

/// Client-supplied fields for a new movie. Absent keys keep their defaults so
/// the field rules, not the decoder, report what is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl MovieInput {
    pub fn into_movie(self, id: i64, created_at: OffsetDateTime) -> Movie {
        Movie {
            id,
            created_at,
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres.unwrap_or_default(),
            version: 1,
        }
    }
}

pub fn validate_movie(v: &mut Validator, movie: &MovieInput) {
    validate_movie_in_year(v, movie, OffsetDateTime::now_utc().year());
}

fn validate_movie_in_year(v: &mut Validator, movie: &MovieInput, current_year: i32) {
    v.check(!movie.title.is_empty(), "title", "Must be provided");
    v.check(
        movie.title.len() <= 500,
        "title",
        "Must not be more than 500 bytes long",
    );

    v.check(movie.runtime.0 >= 0, "runtime", "Must be a positive integer");
    v.check(!movie.runtime.is_zero(), "runtime", "Must be provided");

    v.check(movie.year != 0, "year", "Must be provided");
    v.check(movie.year >= 1888, "year", "Must be greater than 1888");
    v.check(movie.year <= current_year, "year", "Must not be in the future");

    let genres = movie.genres.as_deref();
    v.check(genres.is_some(), "genres", "Must be provided");
    let genres = genres.unwrap_or_default();
    v.check(!genres.is_empty(), "genres", "Must contain at least one genre");
    v.check(
        genres.len() <= 5,
        "genres",
        "Must not contain more than 5 genres",
    );
    v.check(unique(genres), "genres", "Must not contain duplicates");
}

#[cfg(test)]
mod tests {
    use super::{MovieInput, Runtime, validate_movie, validate_movie_in_year};
    use crate::json::{Envelope, MAX_BODY_BYTES, decode, encode};
    use crate::validator::Validator;
    use serde::Deserialize;

    fn input(json: &str) -> MovieInput {
        decode(json.as_bytes(), MAX_BODY_BYTES).expect("decode")
    }

    #[test]
    fn invalid_movie_reports_every_field() {
        let movie = input(r#"{"title":"","runtime":0,"year":1800,"genres":["a","a"]}"#);
        let mut v = Validator::new();
        validate_movie(&mut v, &movie);

        assert!(!v.valid());
        let errors = v.errors();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["title"], "Must be provided");
        assert_eq!(errors["runtime"], "Must be provided");
        assert_eq!(errors["year"], "Must be greater than 1888");
        assert_eq!(errors["genres"], "Must not contain duplicates");
    }

    #[test]
    fn valid_movie_passes() {
        let movie = input(r#"{"title":"Ok","runtime":100,"year":2000,"genres":["drama"]}"#);
        let mut v = Validator::new();
        validate_movie(&mut v, &movie);
        assert!(v.valid(), "errors: {:?}", v.errors());
    }

    #[test]
    fn missing_keys_are_reported_as_not_provided() {
        let mut v = Validator::new();
        validate_movie(&mut v, &input("{}"));
        for field in ["title", "runtime", "year", "genres"] {
            assert_eq!(v.errors()[field], "Must be provided", "field {field}");
        }
    }

    #[test]
    fn boundary_rules_apply() {
        let mut movie = input(r#"{"title":"Ok","runtime":-5,"year":2031,"genres":[]}"#);
        let mut v = Validator::new();
        validate_movie_in_year(&mut v, &movie, 2030);
        assert_eq!(v.errors()["runtime"], "Must be a positive integer");
        assert_eq!(v.errors()["year"], "Must not be in the future");
        assert_eq!(v.errors()["genres"], "Must contain at least one genre");

        movie.title = "x".repeat(501);
        movie.genres = Some((0..6).map(|n| format!("g{n}")).collect());
        movie.year = 2030;
        movie.runtime = Runtime(90);
        let mut v = Validator::new();
        validate_movie_in_year(&mut v, &movie, 2030);
        assert_eq!(v.errors().len(), 2);
        assert_eq!(v.errors()["title"], "Must not be more than 500 bytes long");
        assert_eq!(v.errors()["genres"], "Must not contain more than 5 genres");
    }

    #[test]
    fn runtime_accepts_integer_and_minutes_string() {
        assert_eq!(input(r#"{"runtime":102}"#).runtime, Runtime(102));
        assert_eq!(input(r#"{"runtime":"102 mins"}"#).runtime, Runtime(102));
    }

    #[test]
    fn runtime_rejects_other_strings_as_type_mismatch() {
        let err = decode::<MovieInput, _>(&br#"{"runtime":"102 minutes"}"#[..], MAX_BODY_BYTES)
            .unwrap_err();
        assert_eq!(err.kind(), crate::json::DecodeErrorKind::TypeMismatch);
        assert_eq!(
            err.message(),
            r#"body contains incorrect JSON type for field "runtime""#
        );
    }

    #[test]
    fn encoded_input_decodes_to_equal_value() {
        #[derive(Deserialize)]
        struct Wrapped {
            movie: MovieInput,
        }

        let original =
            input(r#"{"title":"Casablanca","runtime":102,"year":1942,"genres":["drama","war"]}"#);
        let bytes = encode(&Envelope::new("movie", &original)).expect("encode");
        let wrapped: Wrapped = decode(bytes.as_slice(), MAX_BODY_BYTES).expect("decode");
        assert_eq!(wrapped.movie, original);
    }

    #[test]
    fn movie_output_omits_zero_fields_and_created_at() {
        let movie = MovieInput {
            title: "Untitled".to_string(),
            ..MovieInput::default()
        }
        .into_movie(7, time::OffsetDateTime::UNIX_EPOCH);
        let value = serde_json::to_value(&movie).expect("to_value");
        assert_eq!(
            value,
            serde_json::json!({ "id": 7, "title": "Untitled", "version": 1 })
        );
    }
}
