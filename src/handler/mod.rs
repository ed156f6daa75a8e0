//! Request handler module
//!
//! Routes requests to the maths endpoint or the static root.

pub mod maths;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
