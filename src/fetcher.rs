use anyhow::Context as _;
use reqwest::header::CACHE_CONTROL;
use url::Url;

use crate::error::Error;

/// Fetches the remote README as text, bypassing intermediate HTTP caches.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self { client })
    }

    /// One GET, no retry: a failure surfaces as the page's fallback message
    /// rather than a reload loop.
    pub async fn get_text(&self, url: &Url) -> Result<String, Error> {
        let resp = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}
