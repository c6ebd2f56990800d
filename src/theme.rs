use std::sync::Arc;

use kuchiki::traits::TendrilSink as _;
use maud::{Markup, html};

use crate::error::Error;
use crate::page::{PageDocument, THEME_TOGGLE_CLASS};
use crate::storage::Storage;

/// Three-state user preference; `System` defers to the platform signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    System,
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::System => "system",
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// Persisted tokens outside the valid set read as `System`.
    pub fn parse(token: &str) -> Self {
        match token {
            "system" => ThemePreference::System,
            "dark" => ThemePreference::Dark,
            "light" => ThemePreference::Light,
            other => {
                tracing::warn!(token = other, "unknown theme token; using system");
                ThemePreference::System
            }
        }
    }

    /// One toggle click: `system -> dark -> light -> system`.
    pub fn next(self) -> Self {
        match self {
            ThemePreference::System => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::System,
        }
    }
}

/// The concrete light/dark value actually applied to the page, as opposed
/// to the three-state preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveTheme::Light => "light",
            EffectiveTheme::Dark => "dark",
        }
    }
}

/// Persists the tri-state preference and applies the resolved theme to the
/// page: `data-theme` and `data-user-theme` on the document root,
/// `aria-pressed` on the toggle button.
pub struct ThemeController {
    storage: Arc<dyn Storage>,
    key: String,
    /// Platform dark-mode signal, used to resolve the `System` preference.
    system: EffectiveTheme,
}

impl ThemeController {
    pub fn new(storage: Arc<dyn Storage>, key: &str, system: EffectiveTheme) -> Self {
        Self {
            storage,
            key: key.to_string(),
            system,
        }
    }

    /// Current preference; storage failures and unknown tokens read as
    /// `System`.
    pub fn load(&self) -> ThemePreference {
        match self.storage.read(&self.key) {
            Ok(Some(token)) => ThemePreference::parse(token.trim()),
            Ok(None) => ThemePreference::System,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "theme read failed; using system");
                ThemePreference::System
            }
        }
    }

    /// Advances the cycle and persists the new preference.
    pub fn toggle(&self) -> anyhow::Result<ThemePreference> {
        let next = self.load().next();
        self.storage.write(&self.key, next.as_str())?;
        Ok(next)
    }

    pub fn resolve(&self, preference: ThemePreference) -> EffectiveTheme {
        match preference {
            ThemePreference::System => self.system,
            ThemePreference::Dark => EffectiveTheme::Dark,
            ThemePreference::Light => EffectiveTheme::Light,
        }
    }

    /// Builds the toggle control into its container. A missing container
    /// means the page ships without a theme UI; the caller logs and moves
    /// on.
    pub fn install(&self, page: &PageDocument) -> Result<(), Error> {
        let container = page
            .select_first(&format!(".{THEME_TOGGLE_CLASS}"))
            .ok_or_else(|| Error::ThemeInit(format!("missing .{THEME_TOGGLE_CLASS} container")))?;

        let button: Markup = html! {
            button type="button" class="theme-btn" title="Toggle theme" aria-pressed="false" {
                span class="icon" { "☀️" }
                span class="switch" {}
                span class="icon" { "🌙" }
            }
        };
        let fragment = kuchiki::parse_html().one(button.into_string());
        let built = fragment
            .select_first("button")
            .map_err(|()| Error::ThemeInit("toggle markup did not parse".to_string()))?;
        container.as_node().append(built.as_node().clone());
        Ok(())
    }

    /// Applies `preference` to the document root and the toggle button.
    /// The button's pressed state reflects the effective theme, not the
    /// three-state preference.
    pub fn apply(&self, page: &PageDocument, preference: ThemePreference) {
        let effective = self.resolve(preference);

        match page.select_first("html") {
            Some(root) => {
                let mut attrs = root.attributes.borrow_mut();
                attrs.insert("data-theme", effective.as_str().to_string());
                if preference == ThemePreference::System {
                    attrs.remove("data-user-theme");
                } else {
                    attrs.insert("data-user-theme", effective.as_str().to_string());
                }
            }
            None => tracing::warn!("document root missing; theme not applied"),
        }

        if let Some(button) = page.select_first(&format!(".{THEME_TOGGLE_CLASS} button")) {
            button.attributes.borrow_mut().insert(
                "aria-pressed",
                (effective == EffectiveTheme::Dark).to_string(),
            );
        }
    }
}
