mod builtin;
mod cache;
mod cli;
mod config;
mod error;
mod fetcher;
mod markdown;
mod page;
mod renderer;
mod rewrite;
mod storage;
mod theme;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use cache::CacheStore;
use cli::Args;
use config::SiteConfig;
use fetcher::Fetcher;
use page::PageDocument;
use renderer::Renderer;
use storage::{FileStorage, Storage};
use theme::{EffectiveTheme, ThemeController};

pub use cli::{Args as CliArgs, Mode, SystemTheme};

/// Page-level happenings, dispatched by the CLI adapter. Anchor clicks are
/// resolved per element at wiring time (`page::anchor_disposition`) rather
/// than arriving here, since the CLI boundary never receives them.
#[derive(Debug, Clone, Copy)]
pub enum PageEvent {
    /// The page is (re)built from scratch.
    Ready,
    /// The toggle control was activated.
    ThemeToggle,
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = SiteConfig::github(&args.owner, &args.repo, &args.branch)?
        .with_overrides(args.raw_base.as_ref(), args.blob_base.as_ref());

    let app = App {
        config,
        storage: Arc::new(FileStorage::new(args.state_dir.clone())),
        system: match args.system_theme {
            SystemTheme::Light => EffectiveTheme::Light,
            SystemTheme::Dark => EffectiveTheme::Dark,
        },
        out: args.out.clone(),
        user_agent: args.user_agent.clone(),
    };

    match args.mode {
        Mode::Render => app.handle(PageEvent::Ready).await,
        Mode::ToggleTheme => app.handle(PageEvent::ThemeToggle).await,
    }
}

struct App {
    config: SiteConfig,
    storage: Arc<dyn Storage>,
    system: EffectiveTheme,
    out: PathBuf,
    user_agent: String,
}

impl App {
    async fn handle(&self, event: PageEvent) -> anyhow::Result<()> {
        match event {
            PageEvent::Ready => self.render_page().await,
            PageEvent::ThemeToggle => self.toggle_theme(),
        }
    }

    /// The page-ready sequence: shell, footer year, README render, anchor
    /// wiring, theme.
    async fn render_page(&self) -> anyhow::Result<()> {
        let page = PageDocument::shell(&self.config);
        page::set_footer_year(&page);

        let cache = CacheStore::new(self.storage.clone(), config::CACHE_KEY, config::CACHE_TTL);
        let fetcher = Fetcher::new(&self.user_agent)?;
        let renderer = Renderer::new(self.config.clone(), cache, fetcher);
        renderer.render_into(&page).await;

        page::wire_anchors(&page);

        let theme = ThemeController::new(self.storage.clone(), config::THEME_KEY, self.system);
        match theme.install(&page) {
            Ok(()) => theme.apply(&page, theme.load()),
            Err(e) => tracing::warn!(error = %e, "theme toggle disabled"),
        }

        self.write_out(&page)?;
        tracing::info!(out = %self.out.display(), "page rendered");
        Ok(())
    }

    /// Static analog of a toggle click: advance the persisted preference,
    /// then restyle the rendered page in place if one exists.
    fn toggle_theme(&self) -> anyhow::Result<()> {
        let theme = ThemeController::new(self.storage.clone(), config::THEME_KEY, self.system);
        let next = theme.toggle()?;
        tracing::info!(theme = next.as_str(), "theme preference updated");

        if !self.out.exists() {
            tracing::warn!(out = %self.out.display(), "no rendered page to restyle");
            return Ok(());
        }
        let html = std::fs::read_to_string(&self.out)
            .with_context(|| format!("read {}", self.out.display()))?;
        let page = PageDocument::parse(&html);
        theme.apply(&page, next);
        self.write_out(&page)
    }

    fn write_out(&self, page: &PageDocument) -> anyhow::Result<()> {
        if let Some(parent) = self.out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.out, page.to_html()?)
            .with_context(|| format!("write {}", self.out.display()))
    }
}
