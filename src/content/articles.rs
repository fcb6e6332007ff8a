//! Blog article lookup module
//!
//! Maps URL slugs to on-disk HTML fragments, with a preloaded not-found
//! fallback for slugs that resolve to nothing readable.

use std::path::{Path, PathBuf};

/// Sentinel title used when a slug has no matching fragment.
pub const NOT_FOUND_TITLE: &str = "Not Found";

/// Resolves blog slugs against the articles directory.
pub struct ArticleResolver {
    articles_dir: PathBuf,
    fallback: Vec<u8>,
}

/// Result of a slug lookup. Never an error: unresolvable slugs come back as
/// the not-found page with `found = false`.
#[derive(Debug)]
pub struct ResolvedArticle {
    pub title: String,
    pub body: Vec<u8>,
    pub found: bool,
}

impl ArticleResolver {
    /// Open the resolver, preloading the not-found fragment.
    ///
    /// A missing or unreadable fallback file is a configuration error and
    /// must abort startup; without it there is nothing to serve for unknown
    /// slugs.
    pub fn open(
        articles_dir: impl Into<PathBuf>,
        not_found_page: impl AsRef<Path>,
    ) -> std::io::Result<Self> {
        let fallback = std::fs::read(not_found_page.as_ref())?;
        Ok(Self {
            articles_dir: articles_dir.into(),
            fallback,
        })
    }

    /// Resolve `slug` into a display title and article body.
    ///
    /// Any failure to read the article file collapses into the not-found
    /// branch; this function never errors at request time.
    pub async fn resolve(&self, slug: &str) -> ResolvedArticle {
        if is_safe_slug(slug) {
            let path = self.articles_dir.join(format!("{slug}.html"));
            if let Ok(body) = tokio::fs::read(&path).await {
                return ResolvedArticle {
                    title: slug_to_title(slug),
                    body,
                    found: true,
                };
            }
        }

        ResolvedArticle {
            title: NOT_FOUND_TITLE.to_string(),
            body: self.fallback.clone(),
            found: false,
        }
    }
}

/// Reject slugs that could name anything outside the articles directory.
///
/// Path separators cannot appear in a single URL segment, but the router is
/// not the only possible caller, so the check lives here.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && slug != "." && slug != ".."
}

/// Derive a display title from a slug: `"my-first-post"` → `"My First Post"`.
///
/// The slug is split on `-`, empty pieces (leading, trailing, or doubled
/// hyphens) are skipped, the first character of each piece is uppercased,
/// and the pieces are joined with single spaces.
pub fn slug_to_title(slug: &str) -> String {
    slug.split('-')
        .filter(|piece| !piece.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(piece: &str) -> String {
    let mut chars = piece.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn title_from_hyphenated_slug() {
        assert_eq!(slug_to_title("my-first-post"), "My First Post");
        assert_eq!(slug_to_title("post"), "Post");
    }

    #[test]
    fn title_skips_empty_pieces() {
        assert_eq!(slug_to_title("-leading"), "Leading");
        assert_eq!(slug_to_title("trailing-"), "Trailing");
        assert_eq!(slug_to_title("double--hyphen"), "Double Hyphen");
        assert_eq!(slug_to_title("--"), "");
        assert_eq!(slug_to_title(""), "");
    }

    #[test]
    fn title_is_unicode_aware() {
        assert_eq!(slug_to_title("émile-zola"), "Émile Zola");
        assert_eq!(slug_to_title("straße"), "Straße");
    }

    fn fixture_resolver() -> (tempfile::TempDir, ArticleResolver) {
        let tmp = tempfile::tempdir().unwrap();
        let articles = tmp.path().join("articles");
        fs::create_dir(&articles).unwrap();
        fs::write(articles.join("my-first-post.html"), b"<p>first post body</p>").unwrap();

        let not_found = tmp.path().join("not-found.html");
        fs::write(&not_found, b"<p>nothing here</p>").unwrap();

        let resolver = ArticleResolver::open(articles, not_found).unwrap();
        (tmp, resolver)
    }

    #[tokio::test]
    async fn resolves_existing_article() {
        let (_tmp, resolver) = fixture_resolver();

        let article = resolver.resolve("my-first-post").await;
        assert!(article.found);
        assert_eq!(article.title, "My First Post");
        assert_eq!(article.body, b"<p>first post body</p>");
    }

    #[tokio::test]
    async fn missing_article_falls_back() {
        let (_tmp, resolver) = fixture_resolver();

        let article = resolver.resolve("no-such-post").await;
        assert!(!article.found);
        assert_eq!(article.title, NOT_FOUND_TITLE);
        assert_eq!(article.body, b"<p>nothing here</p>");
    }

    #[tokio::test]
    async fn empty_slug_falls_back() {
        let (_tmp, resolver) = fixture_resolver();

        let article = resolver.resolve("").await;
        assert!(!article.found);
        assert_eq!(article.title, NOT_FOUND_TITLE);
    }

    #[tokio::test]
    async fn traversal_shaped_slugs_fall_back() {
        let (tmp, resolver) = fixture_resolver();
        // a file outside the articles directory that a traversal would reach
        fs::write(tmp.path().join("secret.html"), b"secret").unwrap();

        for slug in ["../secret", "..", ".", "a/b", "a\\b"] {
            let article = resolver.resolve(slug).await;
            assert!(!article.found, "slug {slug:?} must not resolve");
            assert_eq!(article.body, b"<p>nothing here</p>");
        }
    }

    #[test]
    fn missing_fallback_is_a_startup_error() {
        let tmp = tempfile::tempdir().unwrap();
        let articles = tmp.path().join("articles");
        fs::create_dir(&articles).unwrap();

        let result = ArticleResolver::open(articles, tmp.path().join("absent.html"));
        assert!(result.is_err());
    }
}
