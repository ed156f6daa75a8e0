//! Maths endpoint
//!
//! Turns a dispatch outcome into an HTTP response: JSON for computed
//! results, 400 for unknown operations, the example page when `op` is absent.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::handler::static_files;
use crate::http::{self, QueryParams};
use crate::logger;
use crate::maths::{self, Dispatch};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const INVALID_OPERATION: &str = "Invalid operation.";

/// Raises the cancel flag when the request future is dropped
///
/// A connection timeout or runtime shutdown drops the future while the
/// blocking computation is still running; the flag lets it stop early.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Handle one request on the maths route
pub async fn serve_maths(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let params = QueryParams::parse(ctx.query);
    let limits = state.config.maths.limits();
    let cancelled = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(Arc::clone(&cancelled));

    // Nth-prime scans can run long; keep them off the connection thread
    let outcome = match tokio::task::spawn_blocking(move || {
        maths::dispatch(&params, &limits, &cancelled)
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            logger::log_error(&format!("Maths computation failed: {e}"));
            return http::build_500_response();
        }
    };

    match outcome {
        Dispatch::Computed(result) => {
            if let Some(error) = result.error() {
                logger::log_debug(&format!("Rejected '{}' operands: {error}", result.op));
            }
            http::build_json_response(
                StatusCode::OK,
                &result,
                state.config.http.enable_cors,
                ctx.is_head,
            )
        }
        Dispatch::InvalidOperation => http::build_400_response(INVALID_OPERATION),
        Dispatch::Fallback => {
            let maths_config = &state.config.maths;
            static_files::serve_path(
                ctx,
                &maths_config.static_dir,
                &maths_config.fallback_path,
                &maths_config.index_files,
            )
            .await
        }
        Dispatch::Cancelled => {
            logger::log_warning("Maths computation cancelled before completion");
            http::build_500_response()
        }
    }
}
