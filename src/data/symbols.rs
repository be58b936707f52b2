//! LaTeX command tables for MathML rendering
//!
//! Keys are command names without the leading backslash.

use phf::{phf_map, phf_set};

/// Greek letters, rendered as identifiers
pub static GREEK_LETTERS: phf::Map<&'static str, &'static str> = phf_map! {
    "alpha" => "α",
    "beta" => "β",
    "gamma" => "γ",
    "delta" => "δ",
    "epsilon" => "ϵ",
    "varepsilon" => "ε",
    "zeta" => "ζ",
    "eta" => "η",
    "theta" => "θ",
    "vartheta" => "ϑ",
    "iota" => "ι",
    "kappa" => "κ",
    "lambda" => "λ",
    "mu" => "μ",
    "nu" => "ν",
    "xi" => "ξ",
    "pi" => "π",
    "varpi" => "ϖ",
    "rho" => "ρ",
    "varrho" => "ϱ",
    "sigma" => "σ",
    "varsigma" => "ς",
    "tau" => "τ",
    "upsilon" => "υ",
    "phi" => "ϕ",
    "varphi" => "φ",
    "chi" => "χ",
    "psi" => "ψ",
    "omega" => "ω",
    "Gamma" => "Γ",
    "Delta" => "Δ",
    "Theta" => "Θ",
    "Lambda" => "Λ",
    "Xi" => "Ξ",
    "Pi" => "Π",
    "Sigma" => "Σ",
    "Upsilon" => "Υ",
    "Phi" => "Φ",
    "Psi" => "Ψ",
    "Omega" => "Ω",
};

/// Letter-like symbols, rendered as identifiers
pub static LETTER_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "infty" => "∞",
    "partial" => "∂",
    "nabla" => "∇",
    "emptyset" => "∅",
    "varnothing" => "∅",
    "hbar" => "ℏ",
    "ell" => "ℓ",
    "aleph" => "ℵ",
    "Re" => "ℜ",
    "Im" => "ℑ",
    "wp" => "℘",
    "triangle" => "△",
    "angle" => "∠",
    "degree" => "°",
    "circ" => "∘",
    "prime" => "′",
};

/// Relations, binary operators, arrows and punctuation, rendered as operators
pub static OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    // Binary operators
    "pm" => "±",
    "mp" => "∓",
    "times" => "×",
    "div" => "÷",
    "cdot" => "⋅",
    "ast" => "∗",
    "star" => "⋆",
    "bullet" => "∙",
    "oplus" => "⊕",
    "ominus" => "⊖",
    "otimes" => "⊗",
    "cup" => "∪",
    "cap" => "∩",
    "setminus" => "∖",
    "wedge" => "∧",
    "land" => "∧",
    "vee" => "∨",
    "lor" => "∨",
    "neg" => "¬",
    "lnot" => "¬",
    // Relations
    "leq" => "≤",
    "le" => "≤",
    "geq" => "≥",
    "ge" => "≥",
    "neq" => "≠",
    "ne" => "≠",
    "approx" => "≈",
    "equiv" => "≡",
    "sim" => "∼",
    "simeq" => "≃",
    "cong" => "≅",
    "propto" => "∝",
    "ll" => "≪",
    "gg" => "≫",
    "in" => "∈",
    "notin" => "∉",
    "ni" => "∋",
    "subset" => "⊂",
    "supset" => "⊃",
    "subseteq" => "⊆",
    "supseteq" => "⊇",
    "perp" => "⊥",
    "parallel" => "∥",
    "mid" => "∣",
    "forall" => "∀",
    "exists" => "∃",
    "nexists" => "∄",
    // Arrows
    "to" => "→",
    "rightarrow" => "→",
    "leftarrow" => "←",
    "gets" => "←",
    "leftrightarrow" => "↔",
    "Rightarrow" => "⇒",
    "Leftarrow" => "⇐",
    "Leftrightarrow" => "⇔",
    "implies" => "⟹",
    "iff" => "⟺",
    "mapsto" => "↦",
    "uparrow" => "↑",
    "downarrow" => "↓",
    "longrightarrow" => "⟶",
    "longleftarrow" => "⟵",
    // Dots and punctuation
    "ldots" => "…",
    "dots" => "…",
    "cdots" => "⋯",
    "vdots" => "⋮",
    "ddots" => "⋱",
    "colon" => ":",
    "therefore" => "∴",
    "because" => "∵",
    // Delimiters used without \left
    "langle" => "⟨",
    "rangle" => "⟩",
    "lfloor" => "⌊",
    "rfloor" => "⌋",
    "lceil" => "⌈",
    "rceil" => "⌉",
    "vert" => "|",
    "Vert" => "‖",
    "lvert" => "|",
    "rvert" => "|",
    "lVert" => "‖",
    "rVert" => "‖",
};

/// Large operators whose limits move above/below in display mode
pub static BIG_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "sum" => "∑",
    "prod" => "∏",
    "coprod" => "∐",
    "int" => "∫",
    "iint" => "∬",
    "iiint" => "∭",
    "oint" => "∮",
    "bigcup" => "⋃",
    "bigcap" => "⋂",
    "bigoplus" => "⨁",
    "bigotimes" => "⨂",
};

/// Upright function names
pub static FUNCTION_NAMES: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh", "coth",
    "log", "ln", "lg", "exp",
    "det", "dim", "ker", "deg", "arg", "gcd",
    "lim", "limsup", "liminf", "max", "min", "sup", "inf",
};

/// Function names that take limits like big operators
pub static LIMIT_FUNCTIONS: phf::Set<&'static str> = phf_set! {
    "lim", "limsup", "liminf", "max", "min", "sup", "inf", "det", "gcd",
};

/// Accent commands and the mark placed over the base
pub static ACCENTS: phf::Map<&'static str, &'static str> = phf_map! {
    "hat" => "^",
    "widehat" => "^",
    "bar" => "¯",
    "overline" => "¯",
    "vec" => "→",
    "overrightarrow" => "→",
    "dot" => "˙",
    "ddot" => "¨",
    "tilde" => "~",
    "widetilde" => "~",
};

/// Font commands and their MathML `mathvariant`
pub static FONT_VARIANTS: phf::Map<&'static str, &'static str> = phf_map! {
    "mathrm" => "normal",
    "mathbf" => "bold",
    "boldsymbol" => "bold-italic",
    "mathit" => "italic",
    "mathbb" => "double-struck",
    "mathcal" => "script",
    "mathscr" => "script",
    "mathfrak" => "fraktur",
    "mathsf" => "sans-serif",
    "mathtt" => "monospace",
};

/// Spacing commands and their widths in em
pub static SPACES: phf::Map<&'static str, &'static str> = phf_map! {
    "," => "0.1667em",
    ":" => "0.2222em",
    ">" => "0.2222em",
    ";" => "0.2778em",
    " " => "0.3333em",
    "quad" => "1em",
    "qquad" => "2em",
    "!" => "-0.1667em",
};

/// Commands with no visual effect in this renderer
pub static IGNORED_COMMANDS: phf::Set<&'static str> = phf_set! {
    "displaystyle", "textstyle", "scriptstyle", "limits", "nolimits",
    "big", "Big", "bigg", "Bigg", "bigl", "bigr", "Bigl", "Bigr",
};

/// Matrix-like environments and their surrounding fences
pub static MATRIX_FENCES: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "matrix" => ("", ""),
    "smallmatrix" => ("", ""),
    "pmatrix" => ("(", ")"),
    "bmatrix" => ("[", "]"),
    "Bmatrix" => ("{", "}"),
    "vmatrix" => ("|", "|"),
    "Vmatrix" => ("‖", "‖"),
    "cases" => ("{", ""),
    "array" => ("", ""),
    "aligned" => ("", ""),
    "align" => ("", ""),
    "align*" => ("", ""),
    "gathered" => ("", ""),
    "split" => ("", ""),
};

/// Look up a `\left`/`\right` delimiter given as a command name
pub fn command_delimiter(name: &str) -> Option<&'static str> {
    match name {
        "{" | "lbrace" => Some("{"),
        "}" | "rbrace" => Some("}"),
        "|" | "Vert" | "lVert" | "rVert" => Some("‖"),
        "vert" | "lvert" | "rvert" => Some("|"),
        "langle" => Some("⟨"),
        "rangle" => Some("⟩"),
        "lfloor" => Some("⌊"),
        "rfloor" => Some("⌋"),
        "lceil" => Some("⌈"),
        "rceil" => Some("⌉"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        assert_eq!(GREEK_LETTERS.get("alpha"), Some(&"α"));
        assert_eq!(OPERATORS.get("leq"), Some(&"≤"));
        assert!(BIG_OPERATORS.contains_key("sum"));
        assert!(FUNCTION_NAMES.contains("sin"));
        assert!(LIMIT_FUNCTIONS.iter().all(|f| FUNCTION_NAMES.contains(f)));
    }

    #[test]
    fn test_command_delimiters() {
        assert_eq!(command_delimiter("{"), Some("{"));
        assert_eq!(command_delimiter("langle"), Some("⟨"));
        assert_eq!(command_delimiter("alpha"), None);
    }
}
