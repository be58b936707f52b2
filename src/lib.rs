//! # texdocx
//!
//! Segment mixed text/LaTeX content and export it as styled HTML and Word
//! documents.
//!
//! ## Features
//!
//! - **Lossless Segmentation**: `$$…$$`, `\[…\]`, `\(…\)` and `$…$` split
//!   out of plain text, concatenating back to the exact input
//! - **Nine Output Styles**: standard, notes, large print, worksheet,
//!   flashcards, two-column, minimal, landscape and draft presets
//! - **Semantic Highlighting**: `Câu 1:` / `Bài II.` section markers and
//!   `a)` sub-items picked out at line starts
//! - **MathML Rendering**: built-in renderer for the common LaTeX subset
//! - **Word Export**: `.docx` container that imports the styled HTML
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Segmentation
//!
//! ```rust
//! use texdocx::{reconstruct, segment};
//!
//! let raw = r"Solve $x^2=1$ then \[y = 2\]";
//! let segments = segment(raw);
//! assert_eq!(segments.len(), 4);
//! assert!(segments[3].display_mode);
//! assert_eq!(reconstruct(&segments), raw);
//! ```
//!
//! ### Export
//!
//! ```rust
//! use texdocx::{export_docx, render_html, ExportOptions, OutputStyle};
//!
//! let options = ExportOptions::with_style(OutputStyle::Worksheet).titled("Bài tập");
//!
//! let preview = render_html("Câu 1: Tính $\\frac{1}{2} + \\frac{1}{3}$", &options);
//! assert!(preview.document.html.contains("<mfrac>"));
//!
//! let docx = export_docx("Câu 1: Tính $x$", &options).unwrap();
//! assert_eq!(&docx[..2], b"PK");
//! ```

/// Core pipeline modules
pub mod core;

/// Data layer - static tables
pub mod data;

/// Feature modules - default collaborators
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export the pipeline
pub use core::segment;
pub use core::segment::{reconstruct, MathDelimiter, SegmentKind, TextSegment};
pub use core::serialize::{SerializeOutput, Serializer};
pub use core::{export_docx, render_html, ExportOutput, Exporter, RenderedDocument};
pub use core::{MathError, MathRenderer};

// Re-export styles
pub use data::styles;
pub use data::styles::{LayoutDirectives, OutputStyle};

// Re-export default collaborators
pub use features::docx::{AltChunkPackager, DocumentPackager};
pub use features::mathml::MathMlRenderer;

// Re-export utilities
pub use utils::config::{ExportOptions, Palette};
pub use utils::diagnostics;
pub use utils::error::{ConversionError, ConversionResult, ConversionWarning};

/// Split raw input and reassemble it, returning `true` when nothing was lost
///
/// Always `true` for any input; exposed for hosts that want to assert it.
pub fn is_lossless(raw: &str) -> bool {
    reconstruct(&segment(raw)) == raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_and_reconstruct() {
        let raw = "a $b$ c";
        let segments = segment(raw);
        assert_eq!(segments.len(), 3);
        assert!(is_lossless(raw));
    }

    #[test]
    fn test_render_html_default_style() {
        let out = render_html("Câu 1: $x$", &ExportOptions::default());
        assert!(out.document.html.contains("section-marker"));
        assert!(out.document.html.contains("math-inline"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_export_docx_is_zip() {
        let bytes = export_docx("hello", &ExportOptions::default()).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_style_parsing_from_root() {
        let style: OutputStyle = "worksheet".parse().unwrap();
        assert_eq!(style, OutputStyle::Worksheet);
        assert_eq!(style.layout().columns, 1);
    }
}
