//! Logging and optional span export for `cloudctl`.
//!
//! Logs are structured JSON on stderr; stdout is reserved for command output.
//! Spans are exported over OTLP/gRPC only when an endpoint is configured.

pub mod init;

pub use init::{init, shutdown};
