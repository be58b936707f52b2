//! Full HTML document assembly
//!
//! Wraps the serialized body in a complete document whose embedded style
//! rules carry the layout bundle, so the packaging step (and a browser
//! preview) can interpret it without extra context.

use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::data::styles::{LayoutDirectives, Orientation};
use crate::utils::config::ResolvedColors;
use crate::utils::html::escape_html;

/// Serialized markup plus the layout it was produced for
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RenderedDocument {
    /// Complete `<html>` document
    pub html: String,
    pub layout: LayoutDirectives,
    pub title: Option<String>,
}

/// Letter paper in inches
const PAGE_WIDTH_IN: f32 = 8.5;
const PAGE_HEIGHT_IN: f32 = 11.0;

/// Build the complete document around `body`
pub fn build_document(
    body: &str,
    layout: &LayoutDirectives,
    colors: &ResolvedColors<'_>,
    title: Option<&str>,
    language: &str,
) -> String {
    let mut out = String::with_capacity(body.len() + 2048);

    out.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(out, "<html lang=\"{}\">", escape_html(language));
    out.push_str("<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<title>{}</title>",
        escape_html(title.unwrap_or("Document"))
    );
    out.push_str("<style>\n");
    out.push_str(&stylesheet(layout, colors));
    out.push_str("</style>\n</head>\n<body>\n");

    if let Some(title) = title {
        let _ = writeln!(
            out,
            "<h1 class=\"doc-title\" style=\"color:{}\">{}</h1>",
            colors.heading,
            escape_html(title)
        );
    }

    out.push_str(body);
    out.push_str("\n</body>\n</html>\n");
    out
}

/// Page size as CSS `width height` for the orientation
pub fn page_size_in(orientation: Orientation) -> (f32, f32) {
    match orientation {
        Orientation::Portrait => (PAGE_WIDTH_IN, PAGE_HEIGHT_IN),
        Orientation::Landscape => (PAGE_HEIGHT_IN, PAGE_WIDTH_IN),
    }
}

fn stylesheet(layout: &LayoutDirectives, colors: &ResolvedColors<'_>) -> String {
    let mut css = String::new();
    let (width, height) = page_size_in(layout.orientation);
    let m = &layout.margins;

    let _ = writeln!(
        css,
        "@page {{ size: {}in {}in; margin: {}in {}in {}in {}in; }}",
        width, height, m.top, m.right, m.bottom, m.left
    );
    let _ = writeln!(
        css,
        "body {{ font-family: {}; font-size: {}pt; line-height: {}; }}",
        layout.font_family.css(),
        layout.font_size_pt,
        layout.line_height
    );
    let _ = writeln!(
        css,
        "h1.doc-title {{ color: {}; text-align: center; }}",
        colors.heading
    );
    let _ = writeln!(css, ".section-marker {{ color: {}; font-weight: bold; }}", colors.section);
    let _ = writeln!(css, ".sub-item {{ color: {}; font-weight: 600; }}", colors.sub_item);
    css.push_str(".math-display { text-align: center; margin: 0.5em 0; }\n");
    css.push_str(".math-error { color: #cc0000; font-family: monospace; }\n");
    css.push_str(".answer-line { border-bottom: 1px dotted #999999; height: 1.6em; margin: 0; }\n");
    css.push_str(".spacer { height: 1em; margin: 0; }\n");
    css.push_str(
        ".flashcard { border: 2px solid #444444; border-radius: 8px; padding: 12pt; margin: 12pt 0; page-break-inside: avoid; }\n",
    );
    if layout.columns > 1 {
        let _ = writeln!(
            css,
            ".two-column {{ column-count: {}; column-gap: 0.3in; }}",
            layout.columns
        );
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::styles::OutputStyle;
    use crate::utils::config::Palette;

    #[test]
    fn test_document_shell() {
        let palette = Palette::default();
        let html = build_document(
            "<p>x</p>",
            OutputStyle::Standard.layout(),
            &palette.resolve(true),
            Some("A & B"),
            "vi",
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"vi\">"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<h1 class=\"doc-title\""));
        assert!(html.contains("<body>\n<h1"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_landscape_page_rule() {
        let palette = Palette::default();
        let html = build_document(
            "",
            OutputStyle::Landscape.layout(),
            &palette.resolve(true),
            None,
            "en",
        );
        assert!(html.contains("size: 11in 8.5in"));
        assert!(!html.contains("<h1"));
    }

    #[test]
    fn test_large_print_font() {
        let palette = Palette::default();
        let html = build_document(
            "",
            OutputStyle::LargePrint.layout(),
            &palette.resolve(true),
            None,
            "vi",
        );
        assert!(html.contains("font-size: 18pt"));
        assert!(html.contains("sans-serif"));
        assert!(html.contains("line-height: 1.8"));
    }

    #[test]
    fn test_two_column_rule_only_for_two_columns() {
        let palette = Palette::default();
        let two = build_document("", OutputStyle::TwoColumn.layout(), &palette.resolve(true), None, "vi");
        let one = build_document("", OutputStyle::Standard.layout(), &palette.resolve(true), None, "vi");
        assert!(two.contains("column-count: 2"));
        assert!(!one.contains("column-count"));
    }
}
