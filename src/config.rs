use std::time::Duration;

use anyhow::Context as _;
use url::Url;

/// Storage key holding the cached README markdown.
pub const CACHE_KEY: &str = "skills_readme_cache";

/// Storage key holding the persisted theme preference.
pub const THEME_KEY: &str = "site_theme";

/// Freshness window for the cached README.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the README lives and how its relative references resolve.
///
/// Passed explicitly into the components that need it, so tests can point
/// the bases anywhere without touching process-wide state.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Serves a repository file's literal bytes; relative image sources
    /// resolve against this.
    pub raw_base: Url,
    /// Serves a repository file's rendered page; relative link targets
    /// resolve against this.
    pub blob_base: Url,
    /// Human-facing repository page, linked from the fallback message and
    /// the footer.
    pub repo_page: Url,
    /// Title of the emitted document.
    pub title: String,
}

impl SiteConfig {
    pub fn github(owner: &str, repo: &str, branch: &str) -> anyhow::Result<Self> {
        let raw_base = Url::parse(&format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/"
        ))
        .context("raw-content base url")?;
        let blob_base = Url::parse(&format!(
            "https://github.com/{owner}/{repo}/blob/{branch}/"
        ))
        .context("browsable base url")?;
        let repo_page = Url::parse(&format!("https://github.com/{owner}/{repo}"))
            .context("repository page url")?;
        Ok(Self {
            raw_base,
            blob_base,
            repo_page,
            title: repo.to_string(),
        })
    }

    /// Replaces the derived bases, e.g. for a self-hosted mirror.
    pub fn with_overrides(mut self, raw_base: Option<&Url>, blob_base: Option<&Url>) -> Self {
        if let Some(raw) = raw_base {
            self.raw_base = dir_url(raw.clone());
        }
        if let Some(blob) = blob_base {
            self.blob_base = dir_url(blob.clone());
        }
        self
    }

    /// The one document this tool fetches.
    pub fn readme_url(&self) -> anyhow::Result<Url> {
        self.raw_base.join("README.md").context("readme url")
    }
}

/// Base URLs must end in `/` so joining a relative path keeps every
/// existing segment.
fn dir_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
