//! Purpose: Immutable process configuration established once at startup.
//! Exports: `Config`, `Environment`, `VERSION`.
//! Role: Read-only value handed to the router state; never mutated after construction.
//! Invariants: `validate` runs before any listener is bound.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use serde::Serialize;

use crate::core::error::{Error, ErrorKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub env: Environment,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.port == 0 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("--port must be greater than zero")
                .with_hint("Use a positive value like 4000."));
        }
        Ok(())
    }
}
