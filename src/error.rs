use thiserror::Error;

/// Failures that can occur while loading or presenting the README page.
///
/// None of these are fatal: README load errors collapse into the page's
/// fallback message, cache decode errors read as a cache miss, and theme
/// init errors only disable the toggle control.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure talking to the content host.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The content host answered with a non-success status.
    #[error("unexpected status {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// The persisted cache entry could not be decoded.
    #[error("malformed cache entry: {0}")]
    CacheDecode(#[from] serde_json::Error),

    /// The theme toggle control could not be built into the page.
    #[error("theme init failed: {0}")]
    ThemeInit(String),
}
