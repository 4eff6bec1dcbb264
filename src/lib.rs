//! Purpose: Library crate backing the `greenlight` movie API server.
//! Exports: `api` (router + handlers), `json` (strict decode, classification, envelopes),
//! `validator`, `data`, `config`, `core` (process errors).
//! Role: Keep the JSON boundary free of routing so it can be tested in isolation.
//! Invariants: No cross-request state; configuration is passed explicitly.
pub mod api;
pub mod config;
pub mod core;
pub mod data;
pub mod json;
pub mod validator;
