//! Data layer - Static tables
//!
//! This module contains the static data used by the pipeline:
//! - Output style presets and their layout bundles
//! - LaTeX symbol tables for MathML rendering

pub mod styles;
pub mod symbols;

// Re-export commonly used items
pub use styles::{
    FontFamily, LayoutDirectives, Margins, Orientation, OutputStyle, StructuralExtra,
    STYLE_TABLE,
};
