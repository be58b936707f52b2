//! Output style presets
//!
//! Each [`OutputStyle`] selects one fixed row of [`STYLE_TABLE`]. Nothing
//! else in the crate branches on the style beyond the structural extra
//! stored in that row.

use phf::phf_map;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::error::ConversionError;

/// Named export preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OutputStyle {
    #[default]
    Standard,
    Minimal,
    Worksheet,
    Notes,
    TwoColumn,
    Landscape,
    LargePrint,
    Draft,
    Flashcards,
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Body font family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FontFamily {
    Serif,
    SansSerif,
}

impl FontFamily {
    /// CSS font stack
    pub fn css(self) -> &'static str {
        match self {
            FontFamily::Serif => "'Times New Roman', Times, serif",
            FontFamily::SansSerif => "Arial, Helvetica, sans-serif",
        }
    }
}

/// Style-dependent structural behaviour of the serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StructuralExtra {
    None,
    /// Dotted answer lines after qualifying text, spacer after display math
    AnswerLines,
    /// Qualifying segments wrapped in bordered cards
    Flashcards,
    /// Body flows in two columns
    TwoColumnFlow,
    /// No accent colors
    Plain,
}

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn uniform(inches: f32) -> Self {
        Self {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

/// Page and typography bundle for one style
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LayoutDirectives {
    pub margins: Margins,
    pub orientation: Orientation,
    pub font_size_pt: f32,
    pub font_family: FontFamily,
    pub line_height: f32,
    pub columns: u8,
    pub accent_colors: bool,
    pub extra: StructuralExtra,
}

const NORMAL_MARGINS: Margins = Margins::uniform(1.0);
const NARROW_MARGINS: Margins = Margins::uniform(0.5);
const WIDE_MARGINS: Margins = Margins::uniform(1.5);
const NOTES_MARGINS: Margins = Margins {
    top: 1.0,
    right: 1.0,
    bottom: 1.0,
    left: 2.5,
};

const NORMAL_FONT_PT: f32 = 12.0;
const LARGE_FONT_PT: f32 = 18.0;

const LINE_NORMAL: f32 = 1.5;
const LINE_TIGHT: f32 = 1.15;
const LINE_LOOSE: f32 = 1.8;
const LINE_DOUBLE: f32 = 2.0;

const BASE: LayoutDirectives = LayoutDirectives {
    margins: NORMAL_MARGINS,
    orientation: Orientation::Portrait,
    font_size_pt: NORMAL_FONT_PT,
    font_family: FontFamily::Serif,
    line_height: LINE_NORMAL,
    columns: 1,
    accent_colors: true,
    extra: StructuralExtra::None,
};

/// Layout bundle per style, indexed by [`OutputStyle::index`]
pub static STYLE_TABLE: [LayoutDirectives; 9] = [
    // standard
    BASE,
    // minimal
    LayoutDirectives {
        margins: NARROW_MARGINS,
        line_height: LINE_TIGHT,
        accent_colors: false,
        extra: StructuralExtra::Plain,
        ..BASE
    },
    // worksheet
    LayoutDirectives {
        extra: StructuralExtra::AnswerLines,
        ..BASE
    },
    // notes
    LayoutDirectives {
        margins: NOTES_MARGINS,
        ..BASE
    },
    // two-column
    LayoutDirectives {
        margins: NARROW_MARGINS,
        columns: 2,
        extra: StructuralExtra::TwoColumnFlow,
        ..BASE
    },
    // landscape
    LayoutDirectives {
        orientation: Orientation::Landscape,
        ..BASE
    },
    // large-print
    LayoutDirectives {
        font_size_pt: LARGE_FONT_PT,
        font_family: FontFamily::SansSerif,
        line_height: LINE_LOOSE,
        ..BASE
    },
    // draft
    LayoutDirectives {
        margins: WIDE_MARGINS,
        line_height: LINE_DOUBLE,
        accent_colors: false,
        extra: StructuralExtra::Plain,
        ..BASE
    },
    // flashcards
    LayoutDirectives {
        extra: StructuralExtra::Flashcards,
        ..BASE
    },
];

/// Accepted style names, including a few spellings users type
static STYLE_NAMES: phf::Map<&'static str, OutputStyle> = phf_map! {
    "standard" => OutputStyle::Standard,
    "default" => OutputStyle::Standard,
    "minimal" => OutputStyle::Minimal,
    "worksheet" => OutputStyle::Worksheet,
    "notes" => OutputStyle::Notes,
    "two-column" => OutputStyle::TwoColumn,
    "twocolumn" => OutputStyle::TwoColumn,
    "two_column" => OutputStyle::TwoColumn,
    "landscape" => OutputStyle::Landscape,
    "large-print" => OutputStyle::LargePrint,
    "largeprint" => OutputStyle::LargePrint,
    "large_print" => OutputStyle::LargePrint,
    "draft" => OutputStyle::Draft,
    "flashcards" => OutputStyle::Flashcards,
    "flashcard" => OutputStyle::Flashcards,
};

impl OutputStyle {
    pub const ALL: [OutputStyle; 9] = [
        OutputStyle::Standard,
        OutputStyle::Minimal,
        OutputStyle::Worksheet,
        OutputStyle::Notes,
        OutputStyle::TwoColumn,
        OutputStyle::Landscape,
        OutputStyle::LargePrint,
        OutputStyle::Draft,
        OutputStyle::Flashcards,
    ];

    fn index(self) -> usize {
        match self {
            OutputStyle::Standard => 0,
            OutputStyle::Minimal => 1,
            OutputStyle::Worksheet => 2,
            OutputStyle::Notes => 3,
            OutputStyle::TwoColumn => 4,
            OutputStyle::Landscape => 5,
            OutputStyle::LargePrint => 6,
            OutputStyle::Draft => 7,
            OutputStyle::Flashcards => 8,
        }
    }

    /// The fixed layout bundle of this style
    pub fn layout(self) -> &'static LayoutDirectives {
        &STYLE_TABLE[self.index()]
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputStyle::Standard => "standard",
            OutputStyle::Minimal => "minimal",
            OutputStyle::Worksheet => "worksheet",
            OutputStyle::Notes => "notes",
            OutputStyle::TwoColumn => "two-column",
            OutputStyle::Landscape => "landscape",
            OutputStyle::LargePrint => "large-print",
            OutputStyle::Draft => "draft",
            OutputStyle::Flashcards => "flashcards",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OutputStyle::Standard => "Default layout with accent highlighting",
            OutputStyle::Minimal => "Narrow margins, tight lines, no accent colors",
            OutputStyle::Worksheet => "Answer lines after questions and long paragraphs",
            OutputStyle::Notes => "Wide left margin for handwritten notes",
            OutputStyle::TwoColumn => "Narrow margins, content in two columns",
            OutputStyle::Landscape => "Landscape page orientation",
            OutputStyle::LargePrint => "Large sans-serif type with loose line spacing",
            OutputStyle::Draft => "Wide margins, double spacing, no accent colors",
            OutputStyle::Flashcards => "Each paragraph and display formula on its own card",
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputStyle {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        STYLE_NAMES.get(key.as_str()).copied().ok_or_else(|| {
            ConversionError::invalid(format!(
                "unknown style '{}' (expected one of: {})",
                s,
                OutputStyle::ALL
                    .iter()
                    .map(|style| style.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_round_trips() {
        for style in OutputStyle::ALL {
            assert_eq!(style.name().parse::<OutputStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("TwoColumn".parse::<OutputStyle>().unwrap(), OutputStyle::TwoColumn);
        assert_eq!(" large_print ".parse::<OutputStyle>().unwrap(), OutputStyle::LargePrint);
    }

    #[test]
    fn test_unknown_style() {
        let err = "glossy".parse::<OutputStyle>().unwrap_err();
        assert!(err.to_string().contains("glossy"));
        assert!(err.to_string().contains("flashcards"));
    }

    #[test]
    fn test_table_rows() {
        let minimal = OutputStyle::Minimal.layout();
        assert_eq!(minimal.margins, Margins::uniform(0.5));
        assert!(!minimal.accent_colors);

        let notes = OutputStyle::Notes.layout();
        assert!(notes.margins.left > notes.margins.right);

        let landscape = OutputStyle::Landscape.layout();
        assert_eq!(landscape.orientation, Orientation::Landscape);

        let large = OutputStyle::LargePrint.layout();
        assert_eq!(large.font_family, FontFamily::SansSerif);
        assert!(large.font_size_pt > OutputStyle::Standard.layout().font_size_pt);

        let draft = OutputStyle::Draft.layout();
        assert_eq!(draft.line_height, 2.0);
        assert_eq!(draft.extra, StructuralExtra::Plain);

        assert_eq!(OutputStyle::TwoColumn.layout().columns, 2);
        assert_eq!(OutputStyle::Worksheet.layout().extra, StructuralExtra::AnswerLines);
        assert_eq!(OutputStyle::Flashcards.layout().extra, StructuralExtra::Flashcards);
    }

    #[test]
    fn test_only_plain_styles_drop_accents() {
        for style in OutputStyle::ALL {
            let plain = matches!(style, OutputStyle::Minimal | OutputStyle::Draft);
            assert_eq!(style.layout().accent_colors, !plain, "{}", style);
        }
    }
}
