//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, dispatch, and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response};

use crate::config::{AppState, RoutesConfig};
use crate::handler::{pages, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Closed set of routes the site serves.
///
/// Handlers dispatch on this enum rather than on raw path strings, so a
/// route cannot be wired to a template name that was never loaded.
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Home,
    Cv { year: &'a str },
    Blog { slug: &'a str },
    Static,
    Favicon,
    Health,
    NotFound,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = *req.method() == Method::HEAD;

    // 1. Non-GET/HEAD methods are answered before any routing
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return Ok(resp);
    }

    // 2. Declared body size guard
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }

    let if_none_match = header_string(&req, "if-none-match");

    // 3. Match and dispatch
    let path = req.uri().path();
    let mut response = match match_route(path, &state.config.routes, &state.config.site.static_route)
    {
        Route::Home => pages::home(&state.templates, is_head),
        Route::Cv { .. } => pages::cv(&state.templates, is_head),
        Route::Blog { slug } => {
            pages::blog(&state.templates, &state.articles, slug, is_head).await
        }
        Route::Static => {
            static_files::serve_asset(
                &state.config.site,
                path,
                if_none_match.as_deref(),
                is_head,
            )
            .await
        }
        Route::Favicon => {
            static_files::serve_favicon(&state.config.site, if_none_match.as_deref(), is_head)
                .await
        }
        Route::Health => http::build_health_response("ok"),
        Route::NotFound => http::build_404_response(),
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(hyper::header::SERVER, server);
    }

    // 4. One access log line per request
    if state.config.logging.access_log {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Match a request path against the fixed route table.
pub fn match_route<'a>(path: &'a str, routes: &RoutesConfig, static_route: &str) -> Route<'a> {
    // Health check endpoints (highest priority, always fast)
    if routes.health.enabled
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return Route::Health;
    }

    if routes.favicon_paths.iter().any(|p| path == p) {
        return Route::Favicon;
    }

    if path == "/" {
        return Route::Home;
    }

    if is_under(path, static_route) {
        return Route::Static;
    }

    let mut segments = path.trim_start_matches('/').splitn(3, '/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("cv"), Some(year), None) => Route::Cv { year },
        (Some("blog"), Some(slug), None) => Route::Blog { slug },
        _ => Route::NotFound,
    }
}

/// Whether `path` equals `prefix` or sits below it.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Check HTTP method and return the response for non-GET/HEAD methods
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

/// Validate the Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Assemble the access log entry for a finished request
fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_str(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = content_length(response);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Bytes the response declares it will send
fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn version_str(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RoutesConfig {
        RoutesConfig::default()
    }

    #[test]
    fn root_is_home() {
        assert_eq!(match_route("/", &routes(), "/static"), Route::Home);
    }

    #[test]
    fn cv_takes_a_year_segment() {
        assert_eq!(
            match_route("/cv/2026", &routes(), "/static"),
            Route::Cv { year: "2026" }
        );
        // year segment is required
        assert_eq!(match_route("/cv", &routes(), "/static"), Route::NotFound);
    }

    #[test]
    fn blog_takes_a_single_slug_segment() {
        assert_eq!(
            match_route("/blog/my-first-post", &routes(), "/static"),
            Route::Blog {
                slug: "my-first-post"
            }
        );
        assert_eq!(match_route("/blog", &routes(), "/static"), Route::NotFound);
        assert_eq!(
            match_route("/blog/a/b", &routes(), "/static"),
            Route::NotFound
        );
    }

    #[test]
    fn empty_slug_still_routes_to_blog() {
        assert_eq!(
            match_route("/blog/", &routes(), "/static"),
            Route::Blog { slug: "" }
        );
    }

    #[test]
    fn static_prefix_matches_subtree_only() {
        assert_eq!(
            match_route("/static/css/style.css", &routes(), "/static"),
            Route::Static
        );
        assert_eq!(match_route("/static", &routes(), "/static"), Route::Static);
        assert_eq!(
            match_route("/staticfile", &routes(), "/static"),
            Route::NotFound
        );
    }

    #[test]
    fn favicon_and_health_paths() {
        assert_eq!(
            match_route("/favicon.ico", &routes(), "/static"),
            Route::Favicon
        );
        assert_eq!(
            match_route("/favicon.svg", &routes(), "/static"),
            Route::Favicon
        );
        assert_eq!(match_route("/healthz", &routes(), "/static"), Route::Health);
        assert_eq!(match_route("/readyz", &routes(), "/static"), Route::Health);
    }

    #[test]
    fn health_routes_respect_the_enabled_flag() {
        let mut routes = routes();
        routes.health.enabled = false;
        assert_eq!(
            match_route("/healthz", &routes, "/static"),
            Route::NotFound
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(match_route("/about", &routes(), "/static"), Route::NotFound);
        assert_eq!(
            match_route("/cv/2026/extra", &routes(), "/static"),
            Route::NotFound
        );
    }

    #[test]
    fn method_check_passes_get_and_head() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());
    }

    #[test]
    fn method_check_rejects_mutating_methods() {
        let resp = check_http_method(&Method::POST, false).unwrap();
        assert_eq!(resp.status(), 405);
        let resp = check_http_method(&Method::DELETE, false).unwrap();
        assert_eq!(resp.status(), 405);
    }

    #[test]
    fn method_check_answers_options() {
        let resp = check_http_method(&Method::OPTIONS, false).unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn body_size_guard() {
        let small = Request::builder()
            .header("content-length", "10")
            .body(())
            .unwrap();
        assert!(check_body_size(&small, 100).is_none());

        let large = Request::builder()
            .header("content-length", "1000")
            .body(())
            .unwrap();
        assert_eq!(check_body_size(&large, 100).unwrap().status(), 413);

        let garbage = Request::builder()
            .header("content-length", "many")
            .body(())
            .unwrap();
        assert!(check_body_size(&garbage, 100).is_none());
    }

    #[test]
    fn version_strings() {
        assert_eq!(version_str(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_str(hyper::Version::HTTP_11), "1.1");
        assert_eq!(version_str(hyper::Version::HTTP_2), "2");
    }
}
