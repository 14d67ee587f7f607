//! Common types and errors shared across `cloud-helpers` crates.

pub mod error;
pub mod protocol;

pub use error::{Direction, HelperError, Operation};
