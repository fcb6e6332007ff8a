//! Page handler module
//!
//! The three site pages: assemble a payload, render it through the template
//! store, and wrap the result in an HTTP response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::content::ArticleResolver;
use crate::http;
use crate::logger;
use crate::render::TemplateStore;

/// The fixed set of page templates. The store is loaded from this list at
/// startup, so every name dispatched below is guaranteed an entry.
pub const PAGES: [&str; 3] = ["home", "cv", "blog"];

/// `GET /` — the landing page, empty payload.
pub fn home(templates: &TemplateStore, is_head: bool) -> Response<Full<Bytes>> {
    render_page(templates, "home", &tera::Context::new(), is_head)
}

/// `GET /cv/:year` — the CV page. The year segment is accepted but unused
/// by the payload.
pub fn cv(templates: &TemplateStore, is_head: bool) -> Response<Full<Bytes>> {
    render_page(templates, "cv", &tera::Context::new(), is_head)
}

/// `GET /blog/:slug` — resolve the slug and render the article page.
///
/// Unknown slugs still answer 200: the page itself renders fine, its
/// content is just the not-found fragment.
pub async fn blog(
    templates: &TemplateStore,
    articles: &ArticleResolver,
    slug: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let article = articles.resolve(slug).await;

    let mut ctx = tera::Context::new();
    ctx.insert("title", &article.title);
    // Article bodies are trusted site content, rendered unescaped
    ctx.insert("content", &String::from_utf8_lossy(&article.body));

    render_page(templates, "blog", &ctx, is_head)
}

/// Render `name` into a buffer and promote it to a response.
///
/// The buffer only becomes a 200 once rendering has fully succeeded; a
/// failed render is logged and answered with a 500 carrying no partial
/// page output.
fn render_page(
    templates: &TemplateStore,
    name: &str,
    ctx: &tera::Context,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let mut buf = Vec::new();
    match templates.render_to(name, ctx, &mut buf) {
        Ok(()) => http::build_html_response(Bytes::from(buf), is_head),
        Err(err) => {
            logger::log_error(&err.to_string());
            http::build_500_response()
        }
    }
}
