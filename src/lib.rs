//! minisite — a small personal website server.
//!
//! Serves a home page, a CV page, and a slug-addressed blog rendered from
//! on-disk HTML fragments inside a shared layout, plus static assets.
//! Built on Tokio + Hyper with Tera templates.

pub mod config;
pub mod content;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod server;
