//! Purpose: Request-side helpers for handlers (path ids, bounded JSON bodies).
//! Exports: `read_id_param`, `read_json`.
//! Role: Adapt axum request parts to the synchronous decoder.
//! Invariants: Body collection stops as soon as it holds more than `max_bytes`.

use axum::body::Body;
use bytes::BytesMut;
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;

use crate::json::{DecodeError, DecodeSignal, classify, decode};

/// Parse a resource id path segment; ids are integers starting at 1.
pub(crate) fn read_id_param(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    body: Body,
    max_bytes: usize,
) -> Result<T, DecodeError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| classify(DecodeSignal::Read(std::io::Error::other(err))))?;
        buffer.extend_from_slice(&chunk);
        if buffer.len() > max_bytes {
            break;
        }
    }
    decode(buffer.as_ref(), max_bytes)
}
