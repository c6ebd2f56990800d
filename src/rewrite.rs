use anyhow::Context as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use crate::config::SiteConfig;

/// How a `src`/`href` value is treated by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    AbsoluteHttp,
    DataUri,
    Fragment,
    Mailto,
    Relative,
}

pub fn classify(reference: &str) -> UrlKind {
    let r = reference.trim();
    let lowered = r.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        UrlKind::AbsoluteHttp
    } else if lowered.starts_with("data:") {
        UrlKind::DataUri
    } else if r.starts_with('#') {
        UrlKind::Fragment
    } else if lowered.starts_with("mailto:") {
        UrlKind::Mailto
    } else {
        UrlKind::Relative
    }
}

/// Strips one leading `./` or `/` so the path joins onto a base cleanly.
fn strip_leading(path: &str) -> &str {
    path.strip_prefix("./")
        .or_else(|| path.strip_prefix('/'))
        .unwrap_or(path)
}

/// Rewrites relative references in the rendered subtree into absolute
/// repository URLs: image sources against the raw-content base, link
/// targets against the browsable base. A failure on one element never
/// stops the remaining ones.
pub fn rewrite_relative_urls(container: &NodeRef, config: &SiteConfig) {
    if let Ok(images) = container.select("img") {
        for img in images {
            if let Err(e) = rewrite_image(&img, config) {
                tracing::warn!(error = %format!("{e:#}"), "img rewrite failed");
            }
        }
    }
    if let Ok(anchors) = container.select("a") {
        for anchor in anchors {
            if let Err(e) = rewrite_anchor(&anchor, config) {
                tracing::warn!(error = %format!("{e:#}"), "link rewrite failed");
            }
        }
    }
}

fn rewrite_image(img: &NodeDataRef<ElementData>, config: &SiteConfig) -> anyhow::Result<()> {
    let mut attrs = img.attributes.borrow_mut();
    let src = attrs.get("src").unwrap_or("").to_string();
    if src.is_empty() || !matches!(classify(&src), UrlKind::Relative) {
        return Ok(());
    }
    let absolute = config
        .raw_base
        .join(strip_leading(&src))
        .with_context(|| format!("resolve image src {src}"))?;
    attrs.insert("src", absolute.to_string());
    attrs.insert("loading", "lazy".to_string());
    attrs.insert("decoding", "async".to_string());
    Ok(())
}

fn rewrite_anchor(anchor: &NodeDataRef<ElementData>, config: &SiteConfig) -> anyhow::Result<()> {
    let mut attrs = anchor.attributes.borrow_mut();
    let href = attrs.get("href").unwrap_or("").to_string();
    if href.is_empty() {
        return Ok(());
    }
    match classify(&href) {
        UrlKind::AbsoluteHttp => {
            attrs.insert("target", "_blank".to_string());
            attrs.insert("rel", "noopener noreferrer".to_string());
        }
        UrlKind::Fragment | UrlKind::Mailto | UrlKind::DataUri => {}
        UrlKind::Relative => {
            let absolute = config
                .blob_base
                .join(strip_leading(&href))
                .with_context(|| format!("resolve link href {href}"))?;
            attrs.insert("href", absolute.to_string());
            attrs.insert("target", "_blank".to_string());
            attrs.insert("rel", "noopener noreferrer".to_string());
        }
    }
    Ok(())
}

const BADGE_MARKERS: [&str; 2] = ["shields.io", "badge"];
const BADGE_STYLE: &str = "height:20px;margin-right:6px;vertical-align:middle";

/// Applies fixed cosmetic sizing to known badge images, keyed off the
/// resolved `src`. Purely cosmetic.
pub fn normalize_badges(container: &NodeRef) {
    let Ok(images) = container.select("img") else {
        return;
    };
    for img in images {
        let mut attrs = img.attributes.borrow_mut();
        let src = attrs.get("src").unwrap_or("").to_string();
        if !BADGE_MARKERS.iter().any(|marker| src.contains(marker)) {
            continue;
        }
        let style = match attrs.get("style") {
            Some(existing) if existing.contains(BADGE_STYLE) => continue,
            Some(existing) if !existing.trim().is_empty() => {
                format!("{};{}", existing.trim_end_matches(';'), BADGE_STYLE)
            }
            _ => BADGE_STYLE.to_string(),
        };
        attrs.insert("style", style);
    }
}
