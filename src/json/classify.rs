//! Purpose: Reduce decoder failure signals to a closed, client-safe error taxonomy.
//! Exports: `DecodeErrorKind`, `DecodeError`, `classify`.
//! Role: Decode-tier half of the error model; messages are returned verbatim to clients.
//! Invariants: `classify` is total; signals that fit no other kind become `Unclassified`.
//! Invariants: Message phrasing per kind is stable; offsets are 1-based characters.
//! Notes: Classification keys off structured signals and serde_json categories, never message text.

use std::fmt;

use serde_json::error::Category;

use super::decode::DecodeSignal;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeErrorKind {
    MalformedSyntax,
    UnexpectedTermination,
    TypeMismatch,
    EmptyBody,
    UnknownField,
    BodyTooLarge,
    MultipleValues,
    Unclassified,
}

impl DecodeErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecodeErrorKind::MalformedSyntax => "malformed-syntax",
            DecodeErrorKind::UnexpectedTermination => "unexpected-termination",
            DecodeErrorKind::TypeMismatch => "type-mismatch",
            DecodeErrorKind::EmptyBody => "empty-body",
            DecodeErrorKind::UnknownField => "unknown-field",
            DecodeErrorKind::BodyTooLarge => "body-too-large",
            DecodeErrorKind::MultipleValues => "multiple-values",
            DecodeErrorKind::Unclassified => "unclassified",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    message: String,
    offset: Option<usize>,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DecodeError {}

pub fn classify(signal: DecodeSignal) -> DecodeError {
    match signal {
        DecodeSignal::Empty => DecodeError::new(DecodeErrorKind::EmptyBody, "body must not be empty"),
        DecodeSignal::TooLarge { limit } => DecodeError::new(
            DecodeErrorKind::BodyTooLarge,
            format!("body must not be larger than {limit} bytes"),
        ),
        DecodeSignal::UnknownField(field) => DecodeError::new(
            DecodeErrorKind::UnknownField,
            format!("body contains unknown key \"{field}\""),
        ),
        DecodeSignal::TrailingData => DecodeError::new(
            DecodeErrorKind::MultipleValues,
            "body must only contain a single JSON value",
        ),
        DecodeSignal::Read(err) => DecodeError::new(DecodeErrorKind::Unclassified, err.to_string()),
        DecodeSignal::Json {
            error,
            path,
            offset,
        } => match error.classify() {
            Category::Syntax => DecodeError::new(
                DecodeErrorKind::MalformedSyntax,
                format!("body contains badly-formed JSON (at character {offset})"),
            )
            .with_offset(offset),
            Category::Eof => DecodeError::new(
                DecodeErrorKind::UnexpectedTermination,
                "body contains badly-formed JSON",
            ),
            Category::Data => match path {
                Some(field) => DecodeError::new(
                    DecodeErrorKind::TypeMismatch,
                    format!("body contains incorrect JSON type for field \"{field}\""),
                ),
                None => DecodeError::new(
                    DecodeErrorKind::TypeMismatch,
                    format!("body contains incorrect JSON type (at character {offset})"),
                )
                .with_offset(offset),
            },
            Category::Io => DecodeError::new(DecodeErrorKind::Unclassified, error.to_string()),
        },
    }
}
