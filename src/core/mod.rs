//! Core pipeline modules
//!
//! This module contains the conversion pipeline:
//! - `segment`: splits raw input into text and math segments
//! - `serialize`: re-serializes segments under an output style
//! - `highlight`: section and sub-item markers in plain text
//! - `math`: renderer seam and math fragment handling
//! - `document`: full HTML document assembly
//! - `export`: segment, serialize and pack in one call

pub mod document;
pub mod export;
pub mod highlight;
pub mod math;
pub mod segment;
pub mod serialize;

// Re-export main types and functions
pub use document::RenderedDocument;
pub use export::{export_docx, render_html, ExportOutput, Exporter};
pub use math::{MathError, MathRenderer};
pub use segment::{reconstruct, segment, MathDelimiter, SegmentKind, TextSegment};
pub use serialize::{SerializeOutput, Serializer};
