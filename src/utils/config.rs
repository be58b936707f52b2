//! Export options and configuration loading
//!
//! [`ExportOptions`] is everything the serializer needs besides the
//! segments. With the `config` feature it can be read from a TOML file:
//!
//! ```toml
//! style = "worksheet"
//! title = "Bài tập"
//!
//! [palette]
//! section = "#1d4ed8"
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::data::styles::OutputStyle;

#[cfg(feature = "config")]
use crate::utils::error::{ConversionError, ConversionResult};
#[cfg(feature = "config")]
use std::path::Path;

/// Highlight and heading colors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Palette {
    /// Section markers ("Câu 1", "Bài II")
    pub section: String,
    /// Sub-item markers ("a)", "b)")
    pub sub_item: String,
    /// Document title
    pub heading: String,
    /// Used for all three when a style has no accent colors
    pub neutral: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            section: "#1d4ed8".to_string(),  // Blue
            sub_item: "#b45309".to_string(), // Amber
            heading: "#111827".to_string(),  // Near black
            neutral: "#000000".to_string(),
        }
    }
}

/// Colors actually applied for one export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColors<'a> {
    pub section: &'a str,
    pub sub_item: &'a str,
    pub heading: &'a str,
}

impl Palette {
    pub fn resolve(&self, accent_colors: bool) -> ResolvedColors<'_> {
        if accent_colors {
            ResolvedColors {
                section: &self.section,
                sub_item: &self.sub_item,
                heading: &self.heading,
            }
        } else {
            ResolvedColors {
                section: &self.neutral,
                sub_item: &self.neutral,
                heading: &self.neutral,
            }
        }
    }
}

/// Options for one serialization
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ExportOptions {
    pub style: OutputStyle,
    /// Text segments are already markup and pass through untouched
    pub rich_text: bool,
    /// Optional document title, emitted as a heading
    pub title: Option<String>,
    pub palette: Palette,
    /// `lang` attribute of the generated document
    pub language: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            style: OutputStyle::Standard,
            rich_text: false,
            title: None,
            palette: Palette::default(),
            language: "vi".to_string(),
        }
    }
}

impl ExportOptions {
    pub fn with_style(style: OutputStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn rich(mut self, rich_text: bool) -> Self {
        self.rich_text = rich_text;
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Parse options from TOML text
#[cfg(feature = "config")]
pub fn options_from_toml_str(content: &str) -> ConversionResult<ExportOptions> {
    Ok(toml::from_str::<ExportOptions>(content)?)
}

/// Load options from a TOML file
#[cfg(feature = "config")]
pub fn load_options_from_toml(path: &Path) -> ConversionResult<ExportOptions> {
    let content = std::fs::read_to_string(path)?;
    options_from_toml_str(&content).map_err(|e| match e {
        ConversionError::Config { message, .. } => {
            ConversionError::config_at(message, path.display().to_string())
        }
        other => other,
    })
}
