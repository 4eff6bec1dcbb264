// Core modules shared by the server binary and the HTTP handlers.
pub mod error;
