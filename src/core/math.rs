//! Math fragment handling
//!
//! The typesetting itself is a collaborator behind [`MathRenderer`]. This
//! module only decides the inline/block wrapper, removes source annotations
//! from whatever the renderer produced and turns a failed render into a
//! visible placeholder.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::utils::html::escape_html;

lazy_static! {
    /// Source annotations (e.g. `encoding="application/x-tex"`) embedded in MathML
    static ref ANNOTATION_RE: Regex =
        Regex::new(r"(?is)<annotation(?:-xml)?\b[^>]*>.*?</annotation(?:-xml)?>")
            .expect("valid annotation regex");
}

/// Renderer failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathError {
    pub message: String,
}

impl MathError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MathError {}

/// Typesetting collaborator
///
/// Implementations:
/// - `MathMlRenderer`: LaTeX subset to MathML (default)
/// - any `Fn(&str, bool) -> Result<String, MathError>` closure (testing)
pub trait MathRenderer: Send + Sync {
    /// Render `expr` (delimiters stripped) as an embeddable fragment
    fn render(&self, expr: &str, display: bool) -> Result<String, MathError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, bool) -> Result<String, MathError> + Send + Sync,
{
    fn render(&self, expr: &str, display: bool) -> Result<String, MathError> {
        self(expr, display)
    }
}

/// Call the renderer, treating a panic like a reported failure
fn render_guarded<R: MathRenderer + ?Sized>(
    renderer: &R,
    expr: &str,
    display: bool,
) -> Result<String, MathError> {
    match catch_unwind(AssertUnwindSafe(|| renderer.render(expr, display))) {
        Ok(result) => result,
        Err(e) => {
            let message = if let Some(s) = e.downcast_ref::<&str>() {
                format!("renderer panicked: {}", s)
            } else if let Some(s) = e.downcast_ref::<String>() {
                format!("renderer panicked: {}", s)
            } else {
                "renderer panicked".to_string()
            };
            Err(MathError::new(message))
        }
    }
}

/// Remove every source annotation block from a fragment
pub fn strip_annotations(fragment: &str) -> String {
    ANNOTATION_RE.replace_all(fragment, "").into_owned()
}

/// Wrap a clean fragment for inline flow or as a centered block
pub fn wrap_fragment(fragment: &str, display: bool) -> String {
    if display {
        format!(
            "<div class=\"math-display\" style=\"text-align:center\">{}</div>",
            fragment
        )
    } else {
        format!("<span class=\"math-inline\">{}</span>", fragment)
    }
}

/// Visible stand-in for a formula that could not be rendered
pub fn error_placeholder(expr: &str, error: &MathError) -> String {
    format!(
        "<span class=\"math-error\" style=\"color:#cc0000\" title=\"{}\">[LaTeX Error: {}]</span>",
        escape_html(&error.message),
        escape_html(expr)
    )
}

/// Render one math segment into its final markup.
///
/// Returns the placeholder markup together with the error when the
/// renderer fails, so callers can keep going and still report it.
pub fn render_segment<R: MathRenderer + ?Sized>(
    renderer: &R,
    expr: &str,
    display: bool,
) -> Result<String, (String, MathError)> {
    match render_guarded(renderer, expr, display) {
        Ok(fragment) => Ok(wrap_fragment(&strip_annotations(&fragment), display)),
        Err(e) => Err((error_placeholder(expr, &e), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(expr: &str, _display: bool) -> Result<String, MathError> {
        Ok(format!(
            "<math><semantics><mi>{}</mi><annotation encoding=\"application/x-tex\">{}</annotation></semantics></math>",
            expr, expr
        ))
    }

    #[test]
    fn test_annotation_stripped() {
        let html = render_segment(&echo, "x", false).unwrap();
        assert!(!html.contains("annotation"));
        assert!(html.contains("<mi>x</mi>"));
        assert!(html.starts_with("<span class=\"math-inline\">"));
    }

    #[test]
    fn test_display_wrapper() {
        let html = render_segment(&echo, "y", true).unwrap();
        assert!(html.starts_with("<div class=\"math-display\""));
        assert!(html.contains("text-align:center"));
    }

    #[test]
    fn test_multiline_annotation() {
        let cleaned = strip_annotations("<mrow/><ANNOTATION encoding=\"x\">a\nb</ANNOTATION><mi/>");
        assert_eq!(cleaned, "<mrow/><mi/>");
    }

    #[test]
    fn test_failure_becomes_placeholder() {
        let failing = |_: &str, _: bool| -> Result<String, MathError> {
            Err(MathError::new("bad input"))
        };
        let (html, err) = render_segment(&failing, r"\frac{1}{<", false).unwrap_err();
        assert!(html.contains("[LaTeX Error: \\frac{1}{&lt;]"));
        assert_eq!(err.message, "bad input");
    }

    #[test]
    fn test_panic_becomes_placeholder() {
        let panicking = |_: &str, _: bool| -> Result<String, MathError> { panic!("boom") };
        let (html, err) = render_segment(&panicking, "x", true).unwrap_err();
        assert!(html.contains("LaTeX Error"));
        assert!(err.message.contains("boom"));
    }
}
