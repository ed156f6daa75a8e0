//! Static file serving module
//!
//! Serves files under the static root, including the maths fallback page.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve `path` from `static_dir`, answering 404 when nothing matches
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, path, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load a file from the static root, trying index files for directories
///
/// Paths that resolve outside `static_dir` are refused.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Bytes, &'static str)> {
    let relative_path = path.trim_start_matches('/');

    let static_root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = static_root.join(relative_path);
    if relative_path.is_empty() || relative_path.ends_with('/') || file_path.is_dir() {
        file_path = find_index_file(&file_path, index_files)?;
    }

    // File not found is common (404), no need to log at warning level
    let Ok(canonical) = file_path.canonicalize() else {
        return None;
    };
    if !canonical.starts_with(&static_root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        ));
        return None;
    }
    if !canonical.is_file() {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::content_type_for(canonical.extension().and_then(|e| e.to_str()));
    Some((Bytes::from(content), content_type))
}

fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    index_files
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Bytes,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::etag_matches(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(data, content_type, &etag, is_head)
}
