// Template error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or executing page templates.
///
/// Load-time variants (`Io`, `Parse`) are startup-fatal; the render-time
/// variants surface as server faults on the request path.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A layout or fragment file could not be read at load time.
    #[error("failed to read template file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A layout + fragment pair failed to compile.
    #[error("failed to compile templates for page '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: tera::Error,
    },

    /// A handler asked for a page name the store never loaded.
    #[error("template not found -> {name}")]
    TemplateNotFound { name: String },

    /// Execution failed against the given payload.
    #[error("failed to render page '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}
