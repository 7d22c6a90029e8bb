use std::sync::LazyLock;

use regex::Regex;

// First markdown link with an absolute http(s) target, e.g. `[Learn more](https://web.dev/lcp/)`.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]\((https?://[^)\s]+)\)").expect("markdown link regex should compile")
});

const OSC8_OPEN: &str = "\u{1b}]8;;";
const OSC8_TERMINATOR: &str = "\u{7}";

/// How an enriched title carries its hyperlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// OSC 8 escape sequence, clickable in supporting terminals.
    Terminal,
    /// `title (url)`, for outputs that are not displayed in a terminal.
    Plain,
}

impl LinkStyle {
    pub fn wrap(self, title: &str, url: &str) -> String {
        match self {
            LinkStyle::Terminal => {
                format!("{OSC8_OPEN}{url}{OSC8_TERMINATOR}{title}{OSC8_OPEN}{OSC8_TERMINATOR}")
            }
            LinkStyle::Plain => format!("{title} ({url})"),
        }
    }
}

/// Returns the target of the first markdown link in an audit description.
pub fn extract_link(description: &str) -> Option<String> {
    MARKDOWN_LINK
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Attaches a documentation link to `title` when links are enabled and the
/// description yields one. Otherwise returns `title` unchanged.
pub fn enrich_title(
    title: &str,
    description: Option<&str>,
    links_enabled: bool,
    style: LinkStyle,
) -> String {
    if !links_enabled {
        return title.to_string();
    }

    match description.and_then(extract_link) {
        Some(url) => style.wrap(title, &url),
        None => title.to_string(),
    }
}
