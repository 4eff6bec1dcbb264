//! Purpose: Request/response JSON boundary shared by every handler.
//! Exports: `decode`, `classify`, `envelope` modules and their main entrypoints.
//! Role: Single seam for body decoding and response encoding so callsites avoid ad hoc serde use.
//! Invariants: Decode failures always reduce to one `DecodeError` from the closed taxonomy.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod classify;
pub mod decode;
pub mod envelope;

pub use classify::{DecodeError, DecodeErrorKind, classify};
pub use decode::{DecodeSignal, MAX_BODY_BYTES, decode};
pub use envelope::{Envelope, encode, write_json};
