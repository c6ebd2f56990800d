use comrak::{Options, markdown_to_html};

/// Markdown to HTML, as a pure function. Empty input maps to empty output.
///
/// GFM-style extensions match what README files rely on in practice;
/// raw HTML passes through because badge rows are often literal `<img>`
/// tags.
pub fn to_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.render.r#unsafe = true;

    markdown_to_html(markdown, &options)
}
