//! Template store module
//!
//! Loads and compiles the fixed set of page templates once at startup. Each
//! entry pairs the shared layout shell with exactly one page fragment, the
//! way the site's pages are authored: `<name>.html` extends `layout.html`.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tera::Tera;

use super::error::TemplateError;

/// File name of the shared layout inside the templates directory.
pub const LAYOUT_FILE: &str = "layout.html";

/// One compiled layout + fragment pair.
#[derive(Debug)]
struct CompiledPage {
    tera: Tera,
    /// Name of the fragment template inside `tera` (the render entry point).
    entry: String,
}

/// Registry of compiled page templates, keyed by page name.
///
/// Immutable after `load`; concurrent renders need no locking.
#[derive(Debug)]
pub struct TemplateStore {
    pages: HashMap<String, CompiledPage>,
}

impl TemplateStore {
    /// Eagerly load and compile every page in `pages` from `templates_dir`.
    ///
    /// Each page compiles `layout.html` together with `<name>.html`. A
    /// missing file or a parse error fails the whole load; callers abort
    /// startup on error rather than serve a partially loaded set.
    pub fn load(
        templates_dir: impl AsRef<Path>,
        pages: &[&str],
    ) -> Result<Self, TemplateError> {
        let dir = templates_dir.as_ref();
        let layout = read_template(&dir.join(LAYOUT_FILE))?;

        let mut compiled = HashMap::with_capacity(pages.len());
        for &name in pages {
            let entry = format!("{name}.html");
            let fragment = read_template(&dir.join(&entry))?;

            let mut tera = Tera::default();
            tera.add_raw_templates([
                (LAYOUT_FILE, layout.as_str()),
                (entry.as_str(), fragment.as_str()),
            ])
            .map_err(|source| TemplateError::Parse {
                name: name.to_string(),
                source,
            })?;

            compiled.insert(name.to_string(), CompiledPage { tera, entry });
        }

        Ok(Self { pages: compiled })
    }

    /// Render the page `name` with `ctx` into `out`.
    ///
    /// Single-step lookup-then-execute. An unknown name writes nothing and
    /// returns `TemplateNotFound`; an execution failure propagates unchanged.
    pub fn render_to(
        &self,
        name: &str,
        ctx: &tera::Context,
        out: impl Write,
    ) -> Result<(), TemplateError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound {
                name: name.to_string(),
            })?;

        page.tera
            .render_to(&page.entry, ctx, out)
            .map_err(|source| TemplateError::Render {
                name: name.to_string(),
                source,
            })
    }

    /// Whether a page with this name was loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
