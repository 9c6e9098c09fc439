use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use url::Url;

pub const DEFAULT_EMBED_HOST: &str = "example.com";

/// Fit `s` into `max_width` terminal columns, ending in `...` when it had to be cut.
/// Wide characters (CJK, emoji) count as two columns.
#[cfg_attr(not(feature = "logging"), allow(dead_code))]
pub(crate) fn fit_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut fitted: String = s
        .chars()
        .take_while(|c| {
            used += c.width().unwrap_or(1);
            used <= budget
        })
        .collect();
    fitted.push_str("...");
    fitted
}

/// Clip to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn clip(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut clipped: String = s.chars().take(max_chars).collect();
    clipped.push('…');
    clipped
}

pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

/// Host advertised to third-party players that require an embedding origin.
pub fn embed_host() -> String {
    std::env::var("HOST")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EMBED_HOST.to_string())
}
