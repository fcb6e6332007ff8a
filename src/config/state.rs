// Application state module
// Everything request handlers share, built once before the listener accepts

use crate::content::ArticleResolver;
use crate::handler::pages;
use crate::render::TemplateStore;

use super::types::Config;

/// Application state shared across all connection tasks.
///
/// Immutable after construction; handlers read it through `Arc` with no
/// locking. Construction performs all fail-fast validation: every page the
/// router dispatches to gets a compiled template, and the article fallback
/// fragment must be readable.
pub struct AppState {
    pub config: Config,
    pub templates: TemplateStore,
    pub articles: ArticleResolver,
}

impl AppState {
    /// Build the shared state, loading templates and the article fallback.
    ///
    /// Any missing or unparsable file here must abort startup; the server
    /// never accepts traffic against a partially loaded site.
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let templates = TemplateStore::load(&config.site.templates_dir, &pages::PAGES)?;
        let articles =
            ArticleResolver::open(&config.site.articles_dir, &config.site.not_found_page)?;

        Ok(Self {
            config,
            templates,
            articles,
        })
    }
}
