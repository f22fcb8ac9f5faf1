//! Logger bootstrap.
//!
//! The engine logs through the `log` facade only; this module wires up
//! `env_logger` for binaries that want the default backend. Embedders with
//! their own `log` sink can skip it entirely.

mod init;

pub use init::{init_logging, LoggingConfig};
