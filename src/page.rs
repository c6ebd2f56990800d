use anyhow::Context as _;
use chrono::Datelike as _;
use kuchiki::traits::TendrilSink as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::builtin;
use crate::config::SiteConfig;

/// Container id the rendered README is injected into.
pub const CONTENT_ID: &str = "readme-content";

/// Footer element that receives the current year.
pub const YEAR_ID: &str = "year";

/// Class of the container the theme toggle control is built into.
pub const THEME_TOGGLE_CLASS: &str = "theme-toggle";

/// In-memory page document: the narrow DOM surface the rest of the crate
/// works against.
pub struct PageDocument {
    doc: NodeRef,
}

impl PageDocument {
    /// Fresh page shell with an empty content container.
    pub fn shell(config: &SiteConfig) -> Self {
        Self::parse(&shell_html(config))
    }

    pub fn parse(html_text: &str) -> Self {
        Self {
            doc: kuchiki::parse_html().one(html_text),
        }
    }

    pub fn select_first(&self, css: &str) -> Option<NodeDataRef<ElementData>> {
        self.doc.select_first(css).ok()
    }

    /// Exact-id lookup. Iterates instead of building a selector so ids
    /// containing selector metacharacters still match.
    pub fn by_id(&self, id: &str) -> Option<NodeDataRef<ElementData>> {
        let candidates = self.doc.select("[id]").ok()?;
        for node in candidates {
            if node.attributes.borrow().get("id") == Some(id) {
                return Some(node);
            }
        }
        None
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.doc.serialize(&mut out).context("serialize page")?;
        String::from_utf8(out).context("page not utf-8")
    }
}

/// Replaces `target`'s children with the parsed `html_text` fragment.
pub fn set_inner_html(target: &NodeRef, html_text: &str) {
    let old: Vec<NodeRef> = target.children().collect();
    for child in old {
        child.detach();
    }

    let fragment = kuchiki::parse_html().one(html_text);
    let Ok(body) = fragment.select_first("body") else {
        return;
    };
    let new: Vec<NodeRef> = body.as_node().children().collect();
    for child in new {
        target.append(child);
    }
}

/// Replaces `target`'s children with a single text node.
pub fn set_text(target: &NodeRef, text: &str) {
    let old: Vec<NodeRef> = target.children().collect();
    for child in old {
        child.detach();
    }
    target.append(NodeRef::new_text(text));
}

/// Sets the footer year, if the footer slot exists.
pub fn set_footer_year(page: &PageDocument) {
    match page.by_id(YEAR_ID) {
        Some(node) => {
            let year = chrono::Local::now().year().to_string();
            set_text(node.as_node(), &year);
        }
        None => tracing::warn!(id = YEAR_ID, "footer year slot missing; skipping"),
    }
}

/// What a click on an anchor should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorDisposition {
    /// Intercept: smooth-scroll the element with this id into view and
    /// replace the history fragment without pushing an entry.
    SmoothScroll { id: String },
    /// Leave the click to default browser handling.
    BrowserDefault,
}

/// Decides how an anchor click is handled. Only fragment references whose
/// exact id exists on the page are intercepted; everything else keeps its
/// default behavior.
pub fn anchor_disposition(page: &PageDocument, href: &str) -> AnchorDisposition {
    let Some(id) = href.strip_prefix('#') else {
        return AnchorDisposition::BrowserDefault;
    };
    if !id.is_empty() && page.has_id(id) {
        AnchorDisposition::SmoothScroll { id: id.to_string() }
    } else {
        AnchorDisposition::BrowserDefault
    }
}

/// Marks same-page anchors that resolve to a real id with
/// `data-scroll="smooth"`. The embedded page script intercepts only marked
/// anchors, so non-matching fragments keep default handling.
pub fn wire_anchors(page: &PageDocument) {
    let Ok(anchors) = page.doc.select("a[href]") else {
        return;
    };
    for anchor in anchors {
        let href = anchor.attributes.borrow().get("href").map(String::from);
        let Some(href) = href else { continue };
        if !href.starts_with('#') {
            continue;
        }
        if let AnchorDisposition::SmoothScroll { .. } = anchor_disposition(page, &href) {
            anchor
                .attributes
                .borrow_mut()
                .insert("data-scroll", "smooth".to_string());
        }
    }
}

fn shell_html(config: &SiteConfig) -> String {
    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                title { (config.title) }
                style { (PreEscaped(builtin::BUILTIN_CSS)) }
            }
            body {
                header class="site-header" {
                    div class="container header-inner" {
                        h1 class="site-title" { (config.title) }
                        div class=(THEME_TOGGLE_CLASS) {}
                    }
                }
                main class="container" {
                    section id=(CONTENT_ID) {}
                }
                footer class="site-footer" {
                    div class="container" {
                        "© " span id=(YEAR_ID) {} " · "
                        a href=(config.repo_page.as_str()) target="_blank" rel="noopener noreferrer" {
                            "View on GitHub"
                        }
                    }
                }
                script { (PreEscaped(builtin::PAGE_JS)) }
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig::github("acme", "skills", "main").unwrap()
    }

    #[test]
    fn shell_has_expected_surfaces() {
        let page = PageDocument::shell(&config());
        assert!(page.has_id(CONTENT_ID));
        assert!(page.has_id(YEAR_ID));
        assert!(page.select_first(".theme-toggle").is_some());
    }

    #[test]
    fn footer_year_is_current() {
        let page = PageDocument::shell(&config());
        set_footer_year(&page);
        let year = chrono::Local::now().year().to_string();
        let node = page.by_id(YEAR_ID).unwrap();
        assert_eq!(node.as_node().text_contents(), year);
    }

    #[test]
    fn set_inner_html_replaces_content() {
        let page = PageDocument::shell(&config());
        let container = page.by_id(CONTENT_ID).unwrap();
        set_inner_html(container.as_node(), "<p>one</p>");
        set_inner_html(container.as_node(), "<p>two</p>");
        assert_eq!(container.as_node().text_contents(), "two");
    }

    #[test]
    fn anchor_dispositions() {
        let page = PageDocument::parse(
            r##"<main><h2 id="skills">Skills</h2><a href="#skills">jump</a></main>"##,
        );
        assert_eq!(
            anchor_disposition(&page, "#skills"),
            AnchorDisposition::SmoothScroll {
                id: "skills".to_string()
            }
        );
        assert_eq!(
            anchor_disposition(&page, "#missing"),
            AnchorDisposition::BrowserDefault
        );
        assert_eq!(
            anchor_disposition(&page, "#"),
            AnchorDisposition::BrowserDefault
        );
        assert_eq!(
            anchor_disposition(&page, "mailto:a@b.c"),
            AnchorDisposition::BrowserDefault
        );
    }

    #[test]
    fn wire_anchors_marks_only_resolvable_fragments() {
        let page = PageDocument::parse(
            r##"<main>
                <h2 id="here">Here</h2>
                <a href="#here">good</a>
                <a href="#gone">bad</a>
                <a href="https://example.com/#here">external</a>
            </main>"##,
        );
        wire_anchors(&page);
        let marked: Vec<String> = page
            .doc
            .select("a[data-scroll]")
            .unwrap()
            .filter_map(|a| a.attributes.borrow().get("href").map(String::from))
            .collect();
        assert_eq!(marked, vec!["#here".to_string()]);
    }
}
