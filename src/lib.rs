//! # dbready: Environment-driven database connection factory
//!
//! Reads the `DB_*` environment variables and builds a driver connection
//! URL. The pool is opened lazily with sizing and lifetime policies
//! applied, then verified with a liveness probe before being handed to the
//! caller.
//!
//! There is no query logic or migration machinery here, and no retry
//! policy: configuration goes in, and a live pool (or an error identifying
//! which stage failed) comes out. Everything past the probe is the
//! caller's business.

pub mod config;
pub mod manager;
pub mod pool;

// Re-export the public surface at the crate root
pub use config::*;
pub use manager::*;
pub use pool::*;
