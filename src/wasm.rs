//! WASM bindings for texdocx
//!
//! This module provides JavaScript-accessible functions for segmentation,
//! preview rendering and `.docx` export.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{ConversionError, ExportOptions, OutputStyle};

/// Export options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct ExportConvertOptions {
    /// Style name, e.g. `worksheet` or `two-column`
    #[serde(default)]
    pub style: Option<String>,
    /// Text segments are already HTML
    #[serde(default)]
    pub rich_text: bool,
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    /// `lang` attribute of the document
    #[serde(default)]
    pub language: Option<String>,
}

#[cfg(feature = "wasm")]
impl ExportConvertOptions {
    fn into_options(self) -> Result<ExportOptions, ConversionError> {
        let style = match self.style.as_deref() {
            Some(name) => name.parse::<OutputStyle>()?,
            None => OutputStyle::default(),
        };
        let mut options = ExportOptions::with_style(style).rich(self.rich_text);
        options.title = self.title;
        if let Some(language) = self.language {
            options.language = language;
        }
        Ok(options)
    }
}

/// Rendering result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The rendered HTML document
    pub output: String,
    /// Whether rendering was successful
    pub success: bool,
    /// Error message if rendering failed
    pub error: Option<String>,
    /// Warnings during rendering
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl ConvertResult {
    fn failed(error: String) -> Self {
        ConvertResult {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

/// Summary of one style preset
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct StyleInfo {
    pub name: String,
    pub description: String,
    pub layout: crate::LayoutDirectives,
}

/// Summary of math check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn panic_message(e: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = e.downcast_ref::<&str>() {
        format!("Export failed: {}", s)
    } else if let Some(s) = e.downcast_ref::<String>() {
        format!("Export failed: {}", s)
    } else {
        "Export failed: unknown error (check browser console for details)".to_string()
    }
}

#[cfg(feature = "wasm")]
fn parse_options(options: JsValue) -> Result<ExportOptions, ConversionError> {
    let opts: ExportConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    opts.into_options()
}

/// Split input into text and math segments
///
/// # Returns
/// Array of `{ kind, content, displayMode, delimiter }`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "segmentText")]
pub fn segment_text_wasm(input: &str) -> JsValue {
    let segments = crate::segment(input);
    serde_wasm_bindgen::to_value(&segments).unwrap_or(JsValue::NULL)
}

/// Render the styled HTML preview
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "renderHtml")]
pub fn render_html_wasm(input: &str, options: JsValue) -> JsValue {
    let result = match parse_options(options) {
        Err(e) => ConvertResult::failed(e.to_string()),
        Ok(opts) => match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            crate::render_html(input, &opts)
        })) {
            Ok(out) => ConvertResult {
                output: out.document.html,
                success: true,
                error: None,
                warnings: out.warnings.iter().map(|w| w.to_string()).collect(),
            },
            Err(e) => ConvertResult::failed(panic_message(e)),
        },
    };

    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Export a `.docx` file
///
/// # Returns
/// The file bytes as a `Uint8Array`; throws on failure
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "exportDocx")]
pub fn export_docx_wasm(input: &str, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let opts = parse_options(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        crate::export_docx(input, &opts)
    })) {
        Ok(result) => result.map_err(|e| JsValue::from_str(&e.to_string())),
        Err(e) => Err(JsValue::from_str(&panic_message(e))),
    }
}

/// Check one formula for potential issues
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkMath")]
pub fn check_math_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_math(input);

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.message.clone()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
            DiagnosticLevel::Info => infos.push(d.message.clone()),
        }
    }

    let summary = CheckSummary {
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

/// List the style presets with their layout bundles
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "listStyles")]
pub fn list_styles_wasm() -> JsValue {
    let styles: Vec<StyleInfo> = OutputStyle::ALL
        .iter()
        .map(|style| StyleInfo {
            name: style.name().to_string(),
            description: style.description().to_string(),
            layout: *style.layout(),
        })
        .collect();
    serde_wasm_bindgen::to_value(&styles).unwrap_or(JsValue::NULL)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
