//! HTTP protocol layer module
//!
//! Body reading and JSON response builders, decoupled from the movie handlers.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::{read_limited, BodyError};
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_413_response,
    build_json_response, build_message_response, build_options_response, strip_body,
    HttpResponse,
};
