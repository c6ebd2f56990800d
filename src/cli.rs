use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// Build the README page from scratch.
    Render,
    /// Cycle the persisted theme preference and restyle the rendered page.
    ToggleTheme,
}

/// Stand-in for the platform's dark-mode preference signal.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SystemTheme {
    Light,
    Dark,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// GitHub account that owns the repository.
    #[arg(long, default_value = "TechLab-JD")]
    pub owner: String,

    /// Repository whose README is rendered.
    #[arg(long, default_value = "Skills-Certs")]
    pub repo: String,

    /// Branch the raw-content and browsable URLs point at.
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Override the raw-content base URL (defaults to
    /// `raw.githubusercontent.com` for the given owner/repo/branch).
    /// Useful for self-hosted mirrors.
    #[arg(long)]
    pub raw_base: Option<Url>,

    /// Override the browsable base URL (defaults to github.com blob pages).
    #[arg(long)]
    pub blob_base: Option<Url>,

    /// Output HTML file.
    #[arg(long, default_value = "index.html")]
    pub out: PathBuf,

    /// Directory holding the cached README and the theme preference.
    #[arg(long, default_value = ".readme-site")]
    pub state_dir: PathBuf,

    #[arg(long, value_enum, default_value = "render")]
    pub mode: Mode,

    /// Resolves the `system` theme preference when applying the theme.
    #[arg(long, value_enum, default_value = "light")]
    pub system_theme: SystemTheme,

    /// HTTP User-Agent used for the README fetch.
    #[arg(long, default_value = "readme-site-render/0.1")]
    pub user_agent: String,
}
