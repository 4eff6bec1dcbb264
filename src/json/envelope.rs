//! Purpose: Encode keyed JSON envelopes into HTTP responses.
//! Exports: `Envelope`, `encode`, `write_json`.
//! Role: Every response body (success or error) leaves the server through here.
//! Invariants: Output is tab-indented JSON followed by exactly one newline.
//! Invariants: `Content-Type: application/json` is always set, overriding caller headers.
//! Invariants: Encoding failures are returned to the caller, never written to the client.

use std::borrow::Cow;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::core::error::{Error, ErrorKind};

/// Single-key JSON wrapper: `{"<key>": <payload>}`.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope<T> {
    key: Cow<'static, str>,
    payload: T,
}

impl<T> Envelope<T> {
    pub fn new(key: impl Into<Cow<'static, str>>, payload: T) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    pub fn error(payload: T) -> Self {
        Self::new("error", payload)
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key.as_ref(), &self.payload)?;
        map.end()
    }
}

pub fn encode<T: Serialize>(envelope: &Envelope<T>) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    envelope.serialize(&mut serializer).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message(format!("failed to encode \"{}\" envelope", envelope.key()))
            .with_source(err)
    })?;
    out.push(b'\n');
    Ok(out)
}

pub fn write_json<T: Serialize>(
    status: StatusCode,
    envelope: &Envelope<T>,
    headers: Option<HeaderMap>,
) -> Result<Response, Error> {
    let body = encode(envelope)?;

    let mut response = Response::new(Body::from(body));
    if let Some(headers) = headers {
        response.headers_mut().extend(headers);
    }
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *response.status_mut() = status;
    Ok(response)
}
