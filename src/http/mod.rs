//! HTTP protocol layer module
//!
//! Query decoding, response builders and static-content helpers, kept apart
//! from the maths logic.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

pub use query::QueryParams;
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_500_response, build_cached_response, build_json_response, build_options_response,
};
