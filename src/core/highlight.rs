//! Semantic highlighting for plain-text segments
//!
//! Runs over already-escaped text in which line breaks are `<br/>`. Two
//! markers are recognized, only at the start of a line:
//!
//! - section markers: `Câu 1:`, `Bài IV.`, `Câu 12`
//! - sub-item markers: `a) `, `b) `

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::utils::config::ResolvedColors;

lazy_static! {
    static ref SECTION_RE: Regex =
        Regex::new(r"(^|<br/>)((?:Câu|Bài)\s+(?:\d+|[IVXLCDM]+)\b[.:]?)")
            .expect("valid section marker regex");
    static ref SUB_ITEM_RE: Regex =
        Regex::new(r"(^|<br/>)([a-z]\))(\s)").expect("valid sub-item marker regex");
}

/// Words that make a paragraph a question in worksheet mode
pub const SECTION_KEYWORDS: [&str; 2] = ["Câu", "Bài"];

/// Whether raw text mentions a section keyword anywhere
pub fn contains_section_keyword(text: &str) -> bool {
    SECTION_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Wrap section and sub-item markers in styled spans.
///
/// `line_start` tells whether the start of `escaped` is also the start of a
/// line in the document; when it is not, only markers after a `<br/>` count.
pub fn highlight(escaped: &str, colors: &ResolvedColors<'_>, line_start: bool) -> String {
    let sections = SECTION_RE.replace_all(escaped, |caps: &Captures| {
        wrap_marker(caps, line_start, "section-marker", colors.section, "bold", "")
    });
    SUB_ITEM_RE
        .replace_all(&sections, |caps: &Captures| {
            let trailing = caps.get(3).map_or("", |m| m.as_str());
            wrap_marker(caps, line_start, "sub-item", colors.sub_item, "600", trailing)
        })
        .into_owned()
}

fn wrap_marker(
    caps: &Captures,
    line_start: bool,
    class: &str,
    color: &str,
    weight: &str,
    trailing: &str,
) -> String {
    let prefix = &caps[1];
    if prefix.is_empty() && !line_start {
        return caps[0].to_string();
    }
    format!(
        "{}<span class=\"{}\" style=\"color:{};font-weight:{}\">{}</span>{}",
        prefix, class, color, weight, &caps[2], trailing
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Palette;

    fn colors() -> Palette {
        Palette::default()
    }

    #[test]
    fn test_section_marker_at_start() {
        let palette = colors();
        let out = highlight("Câu 1: Solve", &palette.resolve(true), true);
        assert!(out.starts_with("<span class=\"section-marker\""));
        assert!(out.contains(">Câu 1:</span> Solve"));
    }

    #[test]
    fn test_roman_numeral_section() {
        let palette = colors();
        let out = highlight("intro<br/>Bài IV. Hình học", &palette.resolve(true), true);
        assert!(out.contains("<br/><span class=\"section-marker\""));
        assert!(out.contains(">Bài IV.</span>"));
    }

    #[test]
    fn test_sub_items_after_breaks() {
        let palette = colors();
        let out = highlight("<br/>a) check<br/>b) verify", &palette.resolve(true), false);
        assert_eq!(out.matches("class=\"sub-item\"").count(), 2);
        assert!(out.contains(">a)</span> check"));
        assert!(out.contains(">b)</span> verify"));
    }

    #[test]
    fn test_mid_line_markers_ignored() {
        let palette = colors();
        let out = highlight("see Câu 1 and a) here", &palette.resolve(true), true);
        assert_eq!(out, "see Câu 1 and a) here");
    }

    #[test]
    fn test_segment_start_not_line_start() {
        let palette = colors();
        let out = highlight("a) after inline math", &palette.resolve(true), false);
        assert_eq!(out, "a) after inline math");
    }

    #[test]
    fn test_sub_item_needs_whitespace() {
        let palette = colors();
        let out = highlight("a)b", &palette.resolve(true), true);
        assert_eq!(out, "a)b");
    }

    #[test]
    fn test_neutral_colors() {
        let palette = colors();
        let out = highlight("Câu 2.<br/>a) x", &palette.resolve(false), true);
        assert_eq!(out.matches("color:#000000").count(), 2);
    }

    #[test]
    fn test_keyword_detection() {
        assert!(contains_section_keyword("Làm Bài 3"));
        assert!(!contains_section_keyword("no markers"));
    }
}
