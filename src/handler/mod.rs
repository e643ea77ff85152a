//! Request handler module
//!
//! Request routing dispatch plus the health probes. Movie endpoints live in
//! `crate::api`.

mod health;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
