//! Segment sequence to styled markup
//!
//! The serializer is total: malformed formulas become placeholders and are
//! reported as warnings, never as errors.
//!
//! ## Example
//!
//! ```rust
//! use texdocx::{segment, ExportOptions, OutputStyle, Serializer};
//!
//! let segments = segment("Câu 1: $x+1=0$");
//! let output = Serializer::default()
//!     .serialize(&segments, &ExportOptions::with_style(OutputStyle::Worksheet));
//! assert!(output.document.html.contains("section-marker"));
//! assert!(output.document.html.contains("answer-line"));
//! ```

use crate::core::document::{build_document, RenderedDocument};
use crate::core::highlight::{contains_section_keyword, highlight};
use crate::core::math::{render_segment, MathRenderer};
use crate::core::segment::TextSegment;
use crate::data::styles::StructuralExtra;
use crate::features::mathml::MathMlRenderer;
use crate::utils::config::ExportOptions;
use crate::utils::error::ConversionWarning;
use crate::utils::html::escape_text_with_breaks;

/// Text longer than this (in chars) gets answer lines in worksheet mode
pub const ANSWER_LINE_THRESHOLD: usize = 50;

/// Number of dotted lines in one answer block
pub const ANSWER_LINE_COUNT: usize = 3;

const SPACER: &str = "<p class=\"spacer\">&nbsp;</p>";

/// Serialized document with any non-fatal warnings
#[derive(Debug, Clone)]
pub struct SerializeOutput {
    pub document: RenderedDocument,
    pub warnings: Vec<ConversionWarning>,
}

impl SerializeOutput {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Re-serializes segments under an output style
pub struct Serializer<R = MathMlRenderer> {
    renderer: R,
}

impl Default for Serializer<MathMlRenderer> {
    fn default() -> Self {
        Self::new(MathMlRenderer::new())
    }
}

impl<R: MathRenderer> Serializer<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Serialize `segments` into a full document
    pub fn serialize(&self, segments: &[TextSegment], options: &ExportOptions) -> SerializeOutput {
        let layout = *options.style.layout();
        let colors = options.palette.resolve(layout.accent_colors);
        log::debug!(
            "serializing {} segments with style '{}' (rich text: {})",
            segments.len(),
            options.style,
            options.rich_text
        );

        let mut body = BodyBuilder::new(layout.extra);
        let mut warnings = Vec::new();
        let mut line_start = true;

        for (index, seg) in segments.iter().enumerate() {
            if seg.is_math() {
                let html = match render_segment(&self.renderer, &seg.content, seg.display_mode) {
                    Ok(html) => html,
                    Err((placeholder, err)) => {
                        log::warn!("math segment {} could not be rendered: {}", index, err);
                        warnings.push(
                            ConversionWarning::new(format!(
                                "formula '{}' could not be rendered: {}",
                                seg.content, err
                            ))
                            .at_segment(index)
                            .with_suggestion("check braces and command names"),
                        );
                        placeholder
                    }
                };
                body.push_math(html, seg.display_mode);
                line_start = seg.display_mode;
            } else {
                let html = if options.rich_text {
                    seg.content.clone()
                } else {
                    highlight(&escape_text_with_breaks(&seg.content), &colors, line_start)
                };
                body.push_text(html, &seg.content);
                line_start = seg.content.ends_with('\n') || seg.content.ends_with('\r');
            }
        }

        let html = build_document(
            &body.finish(),
            &layout,
            &colors,
            options.title.as_deref(),
            &options.language,
        );

        SerializeOutput {
            document: RenderedDocument {
                html,
                layout,
                title: options.title.clone(),
            },
            warnings,
        }
    }
}

/// Applies the structural extra of a style while the body is emitted
struct BodyBuilder {
    extra: StructuralExtra,
    /// Everything outside cards
    content: String,
    /// Flashcards only
    cards: Vec<String>,
}

impl BodyBuilder {
    fn new(extra: StructuralExtra) -> Self {
        Self {
            extra,
            content: String::new(),
            cards: Vec::new(),
        }
    }

    fn push_text(&mut self, html: String, raw: &str) {
        match self.extra {
            StructuralExtra::Flashcards if !raw.trim().is_empty() => self.cards.push(html),
            StructuralExtra::Flashcards => self.append_to_current(&html),
            StructuralExtra::AnswerLines => {
                self.content.push_str(&html);
                if needs_answer_lines(raw) {
                    self.content.push_str(&answer_lines());
                }
            }
            _ => self.content.push_str(&html),
        }
    }

    fn push_math(&mut self, html: String, display: bool) {
        match self.extra {
            StructuralExtra::Flashcards if display => self.cards.push(html),
            StructuralExtra::Flashcards => self.append_to_current(&html),
            StructuralExtra::AnswerLines => {
                self.content.push_str(&html);
                if display {
                    self.content.push_str(SPACER);
                }
            }
            _ => self.content.push_str(&html),
        }
    }

    /// Inline content joins the open card, or the loose content before the first one
    fn append_to_current(&mut self, html: &str) {
        match self.cards.last_mut() {
            Some(card) => card.push_str(html),
            None => self.content.push_str(html),
        }
    }

    fn finish(self) -> String {
        match self.extra {
            StructuralExtra::Flashcards => {
                let mut out = self.content;
                for card in self.cards {
                    out.push_str("<div class=\"flashcard\">");
                    out.push_str(&card);
                    out.push_str("</div>");
                }
                out
            }
            StructuralExtra::TwoColumnFlow => {
                format!("<div class=\"two-column\">{}</div>", self.content)
            }
            _ => self.content,
        }
    }
}

fn needs_answer_lines(raw: &str) -> bool {
    contains_section_keyword(raw) || raw.chars().count() > ANSWER_LINE_THRESHOLD
}

fn answer_lines() -> String {
    let mut out = String::from("<div class=\"answer-lines\">");
    for _ in 0..ANSWER_LINE_COUNT {
        out.push_str("<p class=\"answer-line\">");
        out.push_str(&".".repeat(120));
        out.push_str("</p>");
    }
    out.push_str("</div>");
    out
}
