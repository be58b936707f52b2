//! Feature modules - Default collaborators
//!
//! This module contains the default implementations of the two
//! collaborator seams:
//! - MathML rendering of LaTeX formulas
//! - Word container packaging

pub mod docx;
pub mod mathml;

// Re-export commonly used types
pub use docx::{AltChunkPackager, DocumentPackager};
pub use mathml::MathMlRenderer;
