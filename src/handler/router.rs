//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, access logging.

use crate::config::AppState;
use crate::handler::{maths, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext {
        method: req.method(),
        path: req.uri().path(),
        query: req.uri().query(),
        is_head: req.method() == Method::HEAD,
        if_none_match: header_string(&req, "if-none-match"),
    };

    let mut response = route_request(&ctx, &state).await;

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = http_version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.referer = header_string(&req, "referer");
        entry.user_agent = header_string(&req, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
pub async fn route_request(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(ctx.method, state.config.http.enable_cors) {
        return resp;
    }

    // 2. Maths endpoint
    let maths_config = &state.config.maths;
    if ctx.path == maths_config.route {
        return maths::serve_maths(ctx, state).await;
    }

    // 3. Everything else comes from the static root
    static_files::serve_path(
        ctx,
        &maths_config.static_dir,
        ctx.path,
        &maths_config.index_files,
    )
    .await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    struct Fixture {
        root: tempfile::TempDir,
        state: Arc<AppState>,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("Maths")).unwrap();
        std::fs::write(root.path().join("Maths/example.html"), "<p>example</p>").unwrap();

        let mut config = Config::default();
        config.maths.static_dir = root.path().to_str().unwrap().to_string();
        config.logging.access_log = false;
        Fixture {
            root,
            state: Arc::new(AppState::new(config)),
        }
    }

    async fn get(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap();
        handle_request(req, Arc::clone(state), "127.0.0.1:40000".parse().unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_addition_via_plus() {
        let f = fixture();
        let response = get(&f.state, Method::GET, "/api/maths?op=+&x=2&y=3").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "application/json");
        assert_eq!(response.headers()["Server"], "maths-server");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "op": "+", "x": "2", "y": "3", "value": 5 })
        );
    }

    #[tokio::test]
    async fn test_encoded_operators() {
        let f = fixture();
        let response = get(&f.state, Method::GET, "/api/maths?op=%25&x=17&y=5").await;
        assert_eq!(body_json(response).await["value"], 2);

        let response = get(&f.state, Method::GET, "/api/maths?op=%2F&x=0&y=0").await;
        assert_eq!(body_json(response).await["value"], "NaN");

        let response = get(&f.state, Method::GET, "/api/maths?op=np&n=6").await;
        assert_eq!(body_json(response).await["value"], 13);
    }

    #[tokio::test]
    async fn test_invalid_parameters_are_json_200() {
        let f = fixture();
        let response = get(&f.state, Method::GET, "/api/maths?op=-&x=a&y=b").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid parameters: x, y");
        assert!(body.get("value").is_none());
    }

    #[tokio::test]
    async fn test_unknown_operation_is_bad_request() {
        let f = fixture();
        for uri in ["/api/maths?op=%5E&x=1&y=2", "/api/maths?op=%2B&x=1&y=2"] {
            let response = get(&f.state, Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body_text(response).await, "Invalid operation.");
        }
    }

    #[tokio::test]
    async fn test_missing_op_serves_example_page() {
        let f = fixture();
        let response = get(&f.state, Method::GET, "/api/maths").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "text/html; charset=utf-8");
        assert_eq!(body_text(response).await, "<p>example</p>");

        let response = get(&f.state, Method::GET, "/api/maths?x=1").await;
        assert_eq!(body_text(response).await, "<p>example</p>");
    }

    #[tokio::test]
    async fn test_missing_fallback_page_is_404() {
        let f = fixture();
        std::fs::remove_file(f.root.path().join("Maths/example.html")).unwrap();
        let response = get(&f.state, Method::GET, "/api/maths").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_paths_and_methods() {
        let f = fixture();
        let response = get(&f.state, Method::GET, "/Maths/example.html").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&f.state, Method::HEAD, "/Maths/example.html").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");

        let response = get(&f.state, Method::POST, "/api/maths?op=+&x=1&y=1").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = get(&f.state, Method::OPTIONS, "/api/maths").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_nth_prime_limit_from_config() {
        let f = fixture();
        let mut config = f.state.config.clone();
        config.maths.max_nth_prime = Some(3);
        let state = Arc::new(AppState::new(config));

        let response = get(&state, Method::GET, "/api/maths?op=np&n=4").await;
        assert_eq!(
            body_json(response).await["error"],
            "Invalid parameter: n. It must be a positive integer no greater than 3."
        );
    }
}
