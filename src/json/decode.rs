//! Purpose: Strict, size-bounded JSON decoding of request bodies into typed targets.
//! Exports: `MAX_BODY_BYTES`, `DecodeSignal`, `decode`.
//! Role: The only path from raw body bytes to handler input structs.
//! Invariants: Reads at most `max_bytes + 1` bytes from the source.
//! Invariants: Keys absent from the target shape are rejected, whatever the target's serde attributes.
//! Invariants: Exactly one JSON value per body; trailing content is an error.
//! Invariants: The top-level value must be a JSON object.
//! Notes: Missing keys are not an error here; required-ness belongs to domain checks.

use std::io::Read;

use serde::de::{self, Deserialize, DeserializeOwned, IgnoredAny, Unexpected};
use serde_json::error::Category;

use super::classify::{DecodeError, classify};

/// Byte budget for a single request body.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// Raw failure observed while decoding, before classification.
#[derive(Debug)]
pub enum DecodeSignal {
    /// The source held no JSON token (empty or JSON whitespace only).
    Empty,
    TooLarge {
        limit: usize,
    },
    /// The source failed while being read.
    Read(std::io::Error),
    /// serde_json rejected the value. `path` names the field being decoded when known;
    /// `offset` is the 1-based character position serde_json stopped at.
    Json {
        error: serde_json::Error,
        path: Option<String>,
        offset: usize,
    },
    UnknownField(String),
    TrailingData,
}

/// Decode exactly one JSON value of type `T` from `reader`.
///
/// # Panics
///
/// Panics when `max_bytes` is zero: a zero budget can only come from server code.
pub fn decode<T, R>(reader: R, max_bytes: usize) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    decode_strict(reader, max_bytes).map_err(classify)
}

fn decode_strict<T, R>(reader: R, max_bytes: usize) -> Result<T, DecodeSignal>
where
    T: DeserializeOwned,
    R: Read,
{
    assert!(max_bytes > 0, "decode requires a positive byte budget");

    let body = read_bounded(reader, max_bytes)?;
    let Some(start) = body.iter().position(|byte| !is_json_whitespace(*byte)) else {
        return Err(DecodeSignal::Empty);
    };
    // Derived structs also accept arrays positionally; named fields need an object.
    if body[start] != b'{' {
        return Err(non_object_signal(&body, start));
    }

    let mut de = serde_json::Deserializer::from_slice(&body);
    let mut unknown: Option<String> = None;
    let mut record_unknown = |path: serde_ignored::Path<'_>| {
        if unknown.is_none() {
            unknown = Some(path.to_string());
        }
    };
    let tracked = serde_ignored::Deserializer::new(&mut de, &mut record_unknown);
    let value: T = match serde_path_to_error::deserialize(tracked) {
        Ok(value) => value,
        Err(err) => {
            let path = field_path(err.path());
            let error = err.into_inner();
            // Keys are ignored in stream order, so a recorded key precedes the bad value.
            if error.classify() == Category::Data {
                if let Some(field) = unknown {
                    return Err(DecodeSignal::UnknownField(field));
                }
            }
            let offset = char_offset(&body, error.line(), error.column());
            return Err(DecodeSignal::Json {
                error,
                path,
                offset,
            });
        }
    };

    if let Some(field) = unknown {
        return Err(DecodeSignal::UnknownField(field));
    }
    de.end().map_err(|_| DecodeSignal::TrailingData)?;
    Ok(value)
}

fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

// Syntax errors in the first value still win over the shape mismatch.
fn non_object_signal(body: &[u8], start: usize) -> DecodeSignal {
    let mut scan = serde_json::Deserializer::from_slice(body);
    if let Err(error) = IgnoredAny::deserialize(&mut scan) {
        let offset = char_offset(body, error.line(), error.column());
        return DecodeSignal::Json {
            error,
            path: None,
            offset,
        };
    }
    let unexpected = match body[start] {
        b'[' => Unexpected::Seq,
        b'"' => Unexpected::Other("string"),
        b't' | b'f' => Unexpected::Other("boolean"),
        b'n' => Unexpected::Unit,
        _ => Unexpected::Other("number"),
    };
    DecodeSignal::Json {
        error: de::Error::invalid_type(unexpected, &"a JSON object"),
        path: None,
        offset: String::from_utf8_lossy(&body[..=start]).chars().count(),
    }
}

fn read_bounded<R: Read>(reader: R, max_bytes: usize) -> Result<Vec<u8>, DecodeSignal> {
    let budget = u64::try_from(max_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let mut body = Vec::new();
    reader
        .take(budget)
        .read_to_end(&mut body)
        .map_err(DecodeSignal::Read)?;
    if body.len() > max_bytes {
        return Err(DecodeSignal::TooLarge { limit: max_bytes });
    }
    Ok(body)
}

fn field_path(path: &serde_path_to_error::Path) -> Option<String> {
    path.iter().next()?;
    Some(path.to_string())
}

// serde_json reports 1-based lines and byte columns; clients see characters.
fn char_offset(body: &[u8], line: usize, column: usize) -> usize {
    let line_start: usize = body
        .split(|byte| *byte == b'\n')
        .take(line.saturating_sub(1))
        .map(|segment| segment.len() + 1)
        .sum();
    let end = line_start.saturating_add(column).min(body.len());
    String::from_utf8_lossy(&body[..end]).chars().count()
}
