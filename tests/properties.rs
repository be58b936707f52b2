//! Property-based tests for segmentation and serialization
//!
//! Inputs are built from delimiter-heavy fragments so that unmatched,
//! escaped and nested delimiters show up far more often than in random
//! strings.

use proptest::prelude::*;
use texdocx::{reconstruct, render_html, segment, ExportOptions, OutputStyle, SegmentKind};

fn fragment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("$"),
        Just("$$"),
        Just("\\$"),
        Just("\\["),
        Just("\\]"),
        Just("\\("),
        Just("\\)"),
        Just("\\"),
        Just("x"),
        Just(" "),
        Just("\n"),
        Just("\n\n"),
        Just("\r\n"),
        Just("Câu 1: "),
        Just("Bài IV. "),
        Just("a) "),
        Just("{"),
        Just("}"),
        Just("\\frac"),
        Just("^"),
        Just("<&>"),
        Just("ồ"),
        Just("\0"),
    ]
}

fn delimiter_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

fn any_style() -> impl Strategy<Value = OutputStyle> {
    prop::sample::select(OutputStyle::ALL.to_vec())
}

proptest! {
    #[test]
    fn segments_reconstruct_input(input in delimiter_soup()) {
        prop_assert_eq!(reconstruct(&segment(&input)), input);
    }

    #[test]
    fn arbitrary_strings_reconstruct(input in any::<String>()) {
        prop_assert_eq!(reconstruct(&segment(&input)), input);
    }

    #[test]
    fn resegmentation_is_idempotent(input in delimiter_soup()) {
        let segments = segment(&input);
        prop_assert_eq!(segment(&reconstruct(&segments)), segments);
    }

    #[test]
    fn text_segments_never_adjacent(input in delimiter_soup()) {
        let segments = segment(&input);
        for pair in segments.windows(2) {
            prop_assert!(
                !(pair[0].kind == SegmentKind::Text && pair[1].kind == SegmentKind::Text)
            );
        }
        prop_assert!(segments.iter().all(|s| s.is_math() || !s.content.is_empty()));
    }

    #[test]
    fn layout_depends_only_on_style(input in delimiter_soup(), style in any_style()) {
        let out = render_html(&input, &ExportOptions::with_style(style));
        prop_assert_eq!(out.document.layout, *style.layout());
    }

    #[test]
    fn rendering_is_total(input in delimiter_soup(), style in any_style(), rich in any::<bool>()) {
        let out = render_html(&input, &ExportOptions::with_style(style).rich(rich));
        prop_assert!(out.document.html.starts_with("<!DOCTYPE html>"));
        let math = segment(&input).iter().filter(|s| s.is_math()).count();
        prop_assert!(out.warnings.len() <= math);
    }

    #[test]
    fn neutral_styles_have_no_accent_color(input in delimiter_soup()) {
        for style in [OutputStyle::Minimal, OutputStyle::Draft] {
            let out = render_html(&input, &ExportOptions::with_style(style));
            prop_assert!(!out.document.html.contains("#1d4ed8"));
            prop_assert!(!out.document.html.contains("#b45309"));
        }
    }
}
