//! Routing module
//!
//! Resolves request paths to the movie collection, single movies, and the
//! health probes.

mod matcher;

pub use matcher::{match_path, Endpoint};
