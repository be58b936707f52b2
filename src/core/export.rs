//! End-to-end export pipeline
//!
//! Segment, serialize, then pack. The two collaborators are injected so
//! the pipeline can run with a stub renderer or packager.

use log::debug;

use crate::core::math::MathRenderer;
use crate::core::segment::segment;
use crate::core::serialize::{SerializeOutput, Serializer};
use crate::features::docx::{AltChunkPackager, DocumentPackager};
use crate::features::mathml::MathMlRenderer;
use crate::utils::config::ExportOptions;
use crate::utils::error::{ConversionResult, ConversionWarning};

/// Packed container plus the warnings collected while serializing
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub warnings: Vec<ConversionWarning>,
}

/// Pipeline with an injected renderer and packager
pub struct Exporter<R = MathMlRenderer, P = AltChunkPackager> {
    serializer: Serializer<R>,
    packager: P,
}

impl Default for Exporter<MathMlRenderer, AltChunkPackager> {
    fn default() -> Self {
        Self::new(MathMlRenderer::new(), AltChunkPackager::new())
    }
}

impl<R: MathRenderer, P: DocumentPackager> Exporter<R, P> {
    pub fn new(renderer: R, packager: P) -> Self {
        Self {
            serializer: Serializer::new(renderer),
            packager,
        }
    }

    /// Segment and serialize without packing
    pub fn render(&self, raw: &str, options: &ExportOptions) -> SerializeOutput {
        let segments = segment(raw);
        self.serializer.serialize(&segments, options)
    }

    /// Full pipeline, keeping the warnings
    pub fn export_with_warnings(
        &self,
        raw: &str,
        options: &ExportOptions,
    ) -> ConversionResult<ExportOutput> {
        let output = self.render(raw, options);
        debug!(
            "packing document ({} bytes of HTML, {} warnings)",
            output.document.html.len(),
            output.warnings.len()
        );
        let bytes = self.packager.pack(&output.document)?;
        Ok(ExportOutput {
            bytes,
            warnings: output.warnings,
        })
    }

    /// Full pipeline; only packaging can fail
    pub fn export(&self, raw: &str, options: &ExportOptions) -> ConversionResult<Vec<u8>> {
        self.export_with_warnings(raw, options).map(|out| out.bytes)
    }
}

/// Render the preview document with the default renderer
pub fn render_html(raw: &str, options: &ExportOptions) -> SerializeOutput {
    Exporter::default().render(raw, options)
}

/// Produce `.docx` bytes with the default collaborators
pub fn export_docx(raw: &str, options: &ExportOptions) -> ConversionResult<Vec<u8>> {
    Exporter::default().export(raw, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::RenderedDocument;
    use crate::core::math::MathError;
    use crate::data::styles::OutputStyle;
    use crate::utils::error::ConversionError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn stub_renderer(expr: &str, _display: bool) -> Result<String, MathError> {
        Ok(format!("<m>{}</m>", expr))
    }

    #[test]
    fn test_render_with_stub() {
        let exporter = Exporter::new(stub_renderer, AltChunkPackager::new());
        let out = exporter.render("a $b$", &ExportOptions::default());
        assert!(out.document.html.contains("<m>b</m>"));
        assert!(!out.has_warnings());
    }

    #[test]
    fn test_packager_receives_rendered_document() {
        let calls = AtomicUsize::new(0);
        let packager = |doc: &RenderedDocument| -> ConversionResult<Vec<u8>> {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(doc.layout, *OutputStyle::Landscape.layout());
            Ok(doc.html.clone().into_bytes())
        };
        let exporter = Exporter::new(stub_renderer, packager);
        let bytes = exporter
            .export("x", &ExportOptions::with_style(OutputStyle::Landscape))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(String::from_utf8(bytes).unwrap().contains("<!DOCTYPE html>"));
    }

    #[test]
    fn test_packaging_failure_surfaces() {
        let failing = |_: &RenderedDocument| -> ConversionResult<Vec<u8>> {
            Err(ConversionError::packaging("disk full"))
        };
        let exporter = Exporter::new(stub_renderer, failing);
        let err = exporter.export("x", &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ConversionError::Packaging { .. }));
    }

    #[test]
    fn test_warnings_kept_on_export() {
        let failing_math = |_: &str, _: bool| -> Result<String, MathError> {
            Err(MathError::new("nope"))
        };
        let exporter = Exporter::new(failing_math, AltChunkPackager::new());
        let out = exporter
            .export_with_warnings("$x$", &ExportOptions::default())
            .unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(!out.bytes.is_empty());
    }

    #[test]
    fn test_default_entry_points() {
        let html = render_html("$x^2$", &ExportOptions::default());
        assert!(html.document.html.contains("<msup>"));
        let bytes = export_docx("$x^2$", &ExportOptions::default()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
