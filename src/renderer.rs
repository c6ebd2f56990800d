use maud::{Markup, html};

use crate::cache::CacheStore;
use crate::config::SiteConfig;
use crate::fetcher::Fetcher;
use crate::markdown;
use crate::page::{self, PageDocument};
use crate::rewrite;

/// Loads the README (fresh cache first, one fetch otherwise), converts it,
/// and fills the page's content container.
///
/// Every load failure collapses into a fallback message inside the
/// container; the page around it always renders.
pub struct Renderer {
    config: SiteConfig,
    cache: CacheStore,
    fetcher: Fetcher,
}

impl Renderer {
    pub fn new(config: SiteConfig, cache: CacheStore, fetcher: Fetcher) -> Self {
        Self {
            config,
            cache,
            fetcher,
        }
    }

    pub async fn render_into(&self, page: &PageDocument) {
        let Some(container) = page.by_id(page::CONTENT_ID) else {
            tracing::warn!(id = page::CONTENT_ID, "content container missing; skipping README");
            return;
        };

        match self.load_markdown().await {
            Ok(md) => {
                let html_text = markdown::to_html(&md);
                page::set_inner_html(container.as_node(), &html_text);
                rewrite::rewrite_relative_urls(container.as_node(), &self.config);
                rewrite::normalize_badges(container.as_node());
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "README load failed");
                page::set_inner_html(container.as_node(), &self.fallback_html());
            }
        }
    }

    /// A fresh cache entry wins; otherwise one fetch, cached on success.
    async fn load_markdown(&self) -> anyhow::Result<String> {
        if let Some(md) = self.cache.read() {
            tracing::debug!("using cached README");
            return Ok(md);
        }
        let url = self.config.readme_url()?;
        tracing::debug!(%url, "fetching README");
        let md = self.fetcher.get_text(&url).await?;
        self.cache.write(&md)?;
        Ok(md)
    }

    fn fallback_html(&self) -> String {
        let markup: Markup = html! {
            p class="text-danger" {
                "Could not load skills list. "
                a href=(self.config.repo_page.as_str()) target="_blank" rel="noopener noreferrer" {
                    "View on GitHub"
                }
            }
        };
        markup.into_string()
    }
}
