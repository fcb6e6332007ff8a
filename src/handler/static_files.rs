//! Static file serving module
//!
//! Serves the public assets directory with MIME detection, path traversal
//! protection, and ETag conditional responses.

use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::SiteConfig;
use crate::http::{self, cache, mime};
use crate::logger;

const INDEX_FILE: &str = "index.html";
const FAVICON_FILE: &str = "favicon.svg";

/// Serve a request path from the static directory.
pub async fn serve_asset(
    site: &SiteConfig,
    path: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match load_asset(&site.static_dir, &site.static_route, path).await {
        Some((content, content_type)) => {
            build_asset_response(&content, content_type, if_none_match, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Serve the favicon from the static directory.
pub async fn serve_favicon(
    site: &SiteConfig,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let path = Path::new(&site.static_dir).join(FAVICON_FILE);
    match fs::read(&path).await {
        Ok(data) => build_asset_response(&data, "image/svg+xml", if_none_match, is_head),
        Err(_) => http::build_404_response(),
    }
}

/// Load a file from the static directory, with index file support.
///
/// Returns None for anything unreadable or outside the static root.
pub async fn load_asset(
    static_dir: &str,
    static_route: &str,
    path: &str,
) -> Option<(Vec<u8>, &'static str)> {
    // Strip the route prefix; the remainder addresses into the directory.
    // Dropping ".." up front makes traversal inexpressible in the join.
    let relative = path
        .strip_prefix(static_route)
        .unwrap_or(path)
        .replace("..", "");
    let relative = relative.trim_start_matches('/');

    let mut file_path = Path::new(static_dir).join(relative);

    let root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Directory requests fall through to the index file
    if relative.is_empty() || file_path.is_dir() {
        file_path = file_path.join(INDEX_FILE);
    }

    // File not found is an ordinary 404, not worth a warning
    let canonical = file_path.canonicalize().ok()?;

    // Second line of defense, mostly against symlinks out of the root
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build a static asset response with ETag support.
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(
        Bytes::from(data.to_owned()),
        content_type,
        &etag,
        is_head,
    )
}
