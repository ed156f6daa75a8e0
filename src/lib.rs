//! Maths operations over HTTP
//!
//! A small hyper/Tokio server whose maths route maps a query-string
//! operation (`op`, `x`, `y`, `n`) to a numeric computation and answers
//! with a JSON record. Every other path is served from a static root.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod maths;
pub mod server;
