//! LaTeX to MathML rendering
//!
//! The default [`MathRenderer`]. It covers the formula subset found in
//! worksheets and lecture notes: fractions, roots, scripts, groups, text,
//! fonts, accents, `\left`/`\right` fences, matrix-like environments and the
//! symbol tables in [`crate::data::symbols`]. Unknown commands are kept as
//! identifiers carrying the command name.
//!
//! Every result carries the source as an `application/x-tex` annotation,
//! which the serializer strips before embedding.
//!
//! ## Example
//!
//! ```rust
//! use texdocx::{MathMlRenderer, MathRenderer};
//!
//! let mathml = MathMlRenderer::new().render(r"\frac{1}{2}", false).unwrap();
//! assert!(mathml.contains("<mfrac>"));
//! ```

use log::debug;

use crate::core::math::{MathError, MathRenderer};
use crate::data::symbols::{
    command_delimiter, ACCENTS, BIG_OPERATORS, FONT_VARIANTS, FUNCTION_NAMES, GREEK_LETTERS,
    IGNORED_COMMANDS, LETTER_SYMBOLS, LIMIT_FUNCTIONS, MATRIX_FENCES, OPERATORS, SPACES,
};
use crate::utils::diagnostics::{check_math, nesting_depth, MAX_NESTING_DEPTH};
use crate::utils::html::escape_html;

const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Renders the LaTeX formula subset to presentation MathML
#[derive(Debug, Clone)]
pub struct MathMlRenderer {
    syntax_check: bool,
}

impl Default for MathMlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MathMlRenderer {
    pub fn new() -> Self {
        Self { syntax_check: true }
    }

    /// Run the diagnostics pass before rendering (on by default)
    pub fn with_syntax_check(mut self, enabled: bool) -> Self {
        self.syntax_check = enabled;
        self
    }
}

impl MathRenderer for MathMlRenderer {
    fn render(&self, expr: &str, display: bool) -> Result<String, MathError> {
        if nesting_depth(expr) > MAX_NESTING_DEPTH {
            return Err(too_deep());
        }

        if self.syntax_check {
            let check = check_math(expr);
            if let Some(diag) = check.first_error() {
                debug!("rejecting formula {:?}: {}", expr, diag.message);
                return Err(MathError::new(diag.message.clone()));
            }
        }

        let body = Parser::new(expr).parse()?;
        Ok(format!(
            "<math xmlns=\"{}\" display=\"{}\"><semantics><mrow>{}</mrow><annotation encoding=\"application/x-tex\">{}</annotation></semantics></math>",
            MATHML_NS,
            if display { "block" } else { "inline" },
            body,
            escape_html(expr)
        ))
    }
}

/// Why a row of atoms stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Eof,
    CloseBrace,
    Right,
    End,
    Cell,
    Row,
}

/// A rendered atom and whether its scripts become limits in display mode
struct Atom {
    markup: String,
    limits: bool,
}

impl Atom {
    fn plain(markup: String) -> Self {
        Self {
            markup,
            limits: false,
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    /// Run a nested parse, refusing to go past the nesting limit
    fn descend<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, MathError>,
    ) -> Result<T, MathError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(too_deep());
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse(&mut self) -> Result<String, MathError> {
        let mut out = String::new();
        loop {
            let (row, stop) = self.parse_row()?;
            out.push_str(&row);
            match stop {
                Stop::Eof => return Ok(out),
                // Alignment marks outside an environment are ignored
                Stop::Cell | Stop::Row => continue,
                Stop::CloseBrace => return Err(MathError::new("unmatched closing brace '}'")),
                Stop::Right => return Err(MathError::new("\\right without matching \\left")),
                Stop::End => return Err(MathError::new("\\end without matching \\begin")),
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Name of the command starting at the cursor, without consuming it
    fn peek_command(&self) -> Option<String> {
        if self.peek() != Some('\\') {
            return None;
        }
        let rest = &self.chars[self.pos + 1..];
        match rest.first() {
            None => None,
            Some(c) if c.is_ascii_alphabetic() => Some(
                rest.iter()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .collect(),
            ),
            Some(c) => Some(c.to_string()),
        }
    }

    /// Consume `\name` and return the name
    fn read_command(&mut self) -> Result<String, MathError> {
        let name = self
            .peek_command()
            .ok_or_else(|| MathError::new("dangling backslash at end of formula"))?;
        self.pos += 1 + name.chars().count();
        Ok(name)
    }

    fn parse_row(&mut self) -> Result<(String, Stop), MathError> {
        let mut out = String::new();
        loop {
            self.skip_spaces();
            let Some(c) = self.peek() else {
                return Ok((out, Stop::Eof));
            };
            match c {
                '}' => {
                    self.pos += 1;
                    return Ok((out, Stop::CloseBrace));
                }
                '&' => {
                    self.pos += 1;
                    return Ok((out, Stop::Cell));
                }
                '\\' if self.peek_at(1) == Some('\\') => {
                    self.pos += 2;
                    return Ok((out, Stop::Row));
                }
                '\\' => match self.peek_command().as_deref() {
                    Some("right") => return Ok((out, Stop::Right)),
                    Some("end") => return Ok((out, Stop::End)),
                    _ => {}
                },
                _ => {}
            }

            let atom = self.parse_atom()?;
            out.push_str(&self.parse_scripts(atom)?);
        }
    }

    /// Content of a `{...}` group whose opening brace is already consumed
    fn parse_group_body(&mut self) -> Result<String, MathError> {
        let (inner, stop) = self.parse_row()?;
        match stop {
            Stop::CloseBrace => Ok(inner),
            Stop::Eof => Err(MathError::new("missing closing brace '}'")),
            Stop::Right => Err(MathError::new("\\right inside a group without \\left")),
            Stop::End => Err(MathError::new("\\end inside a group without \\begin")),
            Stop::Cell | Stop::Row => Err(MathError::new("alignment mark inside a group")),
        }
    }

    fn parse_atom(&mut self) -> Result<Atom, MathError> {
        let Some(c) = self.peek() else {
            return Err(MathError::new("unexpected end of formula"));
        };

        match c {
            '{' => {
                self.pos += 1;
                let inner = self.descend(Self::parse_group_body)?;
                Ok(Atom::plain(format!("<mrow>{}</mrow>", inner)))
            }
            '\\' => self.descend(Self::parse_command),
            // Scripts with no base attach to an empty row
            '^' | '_' => Ok(Atom::plain("<mrow></mrow>".to_string())),
            c if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|d| d.is_ascii_digit() || d == '.' || d == ',')
                {
                    // A trailing separator is punctuation, not part of the number
                    if matches!(self.peek(), Some('.' | ','))
                        && !self.peek_at(1).is_some_and(|d| d.is_ascii_digit())
                    {
                        break;
                    }
                    self.pos += 1;
                }
                let number: String = self.chars[start..self.pos].iter().collect();
                Ok(Atom::plain(format!("<mn>{}</mn>", number)))
            }
            _ => {
                self.pos += 1;
                Ok(Atom::plain(char_markup(c)))
            }
        }
    }

    /// A single-token argument: a braced group, a command or one character
    fn parse_argument(&mut self, context: &str) -> Result<String, MathError> {
        self.skip_spaces();
        match self.peek() {
            None | Some('}') | Some('&') => {
                Err(MathError::new(format!("missing argument for {}", context)))
            }
            Some('{') => {
                self.pos += 1;
                Ok(format!("<mrow>{}</mrow>", self.descend(Self::parse_group_body)?))
            }
            Some('\\') => Ok(self.descend(Self::parse_command)?.markup),
            Some('^') | Some('_') => Err(MathError::new(format!(
                "unexpected script marker as argument of {}",
                context
            ))),
            Some(c) => {
                self.pos += 1;
                Ok(if c.is_ascii_digit() {
                    format!("<mn>{}</mn>", c)
                } else {
                    char_markup(c)
                })
            }
        }
    }

    /// Raw text of a `{...}` argument, for text-mode commands
    fn parse_raw_argument(&mut self, context: &str) -> Result<String, MathError> {
        self.skip_spaces();
        if self.peek() != Some('{') {
            return Err(MathError::new(format!("{} expects a braced argument", context)));
        }
        self.pos += 1;
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                }
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let text: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        return Ok(text);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(MathError::new(format!("missing closing brace for {}", context)))
    }

    fn parse_optional_argument(&mut self) -> Result<Option<String>, MathError> {
        self.skip_spaces();
        if self.peek() != Some('[') {
            return Ok(None);
        }
        self.pos += 1;
        let mut out = String::new();
        loop {
            self.skip_spaces();
            match self.peek() {
                None => return Err(MathError::new("missing closing ']' for optional argument")),
                Some(']') => {
                    self.pos += 1;
                    return Ok(Some(out));
                }
                Some('}') | Some('&') => {
                    return Err(MathError::new("unterminated optional argument"))
                }
                _ => {
                    let atom = self.parse_atom()?;
                    out.push_str(&self.parse_scripts(atom)?);
                }
            }
        }
    }

    fn parse_scripts(&mut self, base: Atom) -> Result<String, MathError> {
        let mut sup: Option<String> = None;
        let mut sub: Option<String> = None;

        loop {
            self.skip_spaces();
            match self.peek() {
                Some('^') => {
                    if sup.is_some() {
                        return Err(MathError::new("double superscript"));
                    }
                    self.pos += 1;
                    sup = Some(self.parse_argument("superscript")?);
                }
                Some('_') => {
                    if sub.is_some() {
                        return Err(MathError::new("double subscript"));
                    }
                    self.pos += 1;
                    sub = Some(self.parse_argument("subscript")?);
                }
                Some('\'') => {
                    let mut primes = String::new();
                    while self.peek() == Some('\'') {
                        primes.push('′');
                        self.pos += 1;
                    }
                    let primes = format!("<mo>{}</mo>", primes);
                    sup = Some(match sup {
                        Some(existing) => format!("<mrow>{}{}</mrow>", primes, existing),
                        None => primes,
                    });
                }
                _ => break,
            }
        }

        let (under, over) = if base.limits {
            ("munder", ("mover", "munderover"))
        } else {
            ("msub", ("msup", "msubsup"))
        };
        let base = base.markup;
        Ok(match (sub, sup) {
            (None, None) => base,
            (Some(sub), None) => format!("<{0}>{1}{2}</{0}>", under, base, sub),
            (None, Some(sup)) => format!("<{0}>{1}{2}</{0}>", over.0, base, sup),
            (Some(sub), Some(sup)) => format!("<{0}>{1}{2}{3}</{0}>", over.1, base, sub, sup),
        })
    }

    fn parse_command(&mut self) -> Result<Atom, MathError> {
        let name = self.read_command()?;

        if let Some(ch) = GREEK_LETTERS.get(name.as_str()) {
            // Uppercase Greek is upright by convention
            let upright = ch.chars().next().is_some_and(char::is_uppercase);
            return Ok(Atom::plain(if upright {
                format!("<mi mathvariant=\"normal\">{}</mi>", ch)
            } else {
                format!("<mi>{}</mi>", ch)
            }));
        }
        if let Some(ch) = LETTER_SYMBOLS.get(name.as_str()) {
            return Ok(Atom::plain(format!("<mi>{}</mi>", ch)));
        }
        if let Some(ch) = OPERATORS.get(name.as_str()) {
            return Ok(Atom::plain(format!("<mo>{}</mo>", ch)));
        }
        if let Some(ch) = BIG_OPERATORS.get(name.as_str()) {
            return Ok(Atom {
                markup: format!("<mo largeop=\"true\">{}</mo>", ch),
                limits: !name.contains("int"),
            });
        }
        if FUNCTION_NAMES.contains(name.as_str()) {
            return Ok(Atom {
                markup: format!("<mi>{}</mi>", name),
                limits: LIMIT_FUNCTIONS.contains(name.as_str()),
            });
        }
        if let Some(width) = SPACES.get(name.as_str()) {
            return Ok(Atom::plain(format!("<mspace width=\"{}\"/>", width)));
        }
        if IGNORED_COMMANDS.contains(name.as_str()) {
            return Ok(Atom::plain(String::new()));
        }
        if let Some(variant) = FONT_VARIANTS.get(name.as_str()) {
            let body = self.parse_argument(&format!("\\{}", name))?;
            return Ok(Atom::plain(format!(
                "<mstyle mathvariant=\"{}\">{}</mstyle>",
                variant, body
            )));
        }
        if let Some(mark) = ACCENTS.get(name.as_str()) {
            let body = self.parse_argument(&format!("\\{}", name))?;
            return Ok(Atom::plain(format!(
                "<mover accent=\"true\">{}<mo stretchy=\"true\">{}</mo></mover>",
                body,
                escape_html(mark)
            )));
        }

        match name.as_str() {
            "frac" | "dfrac" | "tfrac" | "cfrac" => {
                let num = self.parse_argument("\\frac numerator")?;
                let den = self.parse_argument("\\frac denominator")?;
                Ok(Atom::plain(format!("<mfrac>{}{}</mfrac>", num, den)))
            }
            "binom" | "dbinom" | "tbinom" => {
                let top = self.parse_argument("\\binom")?;
                let bottom = self.parse_argument("\\binom")?;
                Ok(Atom::plain(format!(
                    "<mrow><mo>(</mo><mfrac linethickness=\"0\">{}{}</mfrac><mo>)</mo></mrow>",
                    top, bottom
                )))
            }
            "sqrt" => {
                let index = self.parse_optional_argument()?;
                let body = self.parse_argument("\\sqrt")?;
                Ok(Atom::plain(match index {
                    Some(index) => format!("<mroot>{}<mrow>{}</mrow></mroot>", body, index),
                    None => format!("<msqrt>{}</msqrt>", body),
                }))
            }
            "text" | "textrm" | "textit" | "textbf" | "mbox" => {
                let text = self.parse_raw_argument(&format!("\\{}", name))?;
                Ok(Atom::plain(format!("<mtext>{}</mtext>", escape_html(&text))))
            }
            "operatorname" => {
                let text = self.parse_raw_argument("\\operatorname")?;
                Ok(Atom::plain(format!(
                    "<mi mathvariant=\"normal\">{}</mi>",
                    escape_html(&text)
                )))
            }
            "underline" => {
                let body = self.parse_argument("\\underline")?;
                Ok(Atom::plain(format!(
                    "<munder accentunder=\"true\">{}<mo stretchy=\"true\">_</mo></munder>",
                    body
                )))
            }
            "left" => self.parse_fence(),
            "begin" => self.parse_environment(),
            "{" | "}" | "$" | "%" | "&" | "#" | "_" | "|" => Ok(Atom::plain(format!(
                "<mo>{}</mo>",
                if name == "|" { "‖".to_string() } else { escape_html(&name) }
            ))),
            _ => {
                debug!("unknown command \\{} kept as identifier", name);
                Ok(Atom::plain(format!("<mi>{}</mi>", escape_html(&name))))
            }
        }
    }

    fn parse_delimiter(&mut self, context: &str) -> Result<&'static str, MathError> {
        self.skip_spaces();
        if self.peek() == Some('\\') {
            let name = self.read_command()?;
            return command_delimiter(&name).ok_or_else(|| {
                MathError::new(format!("invalid delimiter \\{} after {}", name, context))
            });
        }
        let delimiter = match self.peek() {
            Some('.') => "",
            Some('(') => "(",
            Some(')') => ")",
            Some('[') => "[",
            Some(']') => "]",
            Some('|') => "|",
            Some('/') => "/",
            Some('<') => "⟨",
            Some('>') => "⟩",
            Some(c) => {
                return Err(MathError::new(format!(
                    "invalid delimiter '{}' after {}",
                    c, context
                )))
            }
            None => return Err(MathError::new(format!("missing delimiter after {}", context))),
        };
        self.pos += 1;
        Ok(delimiter)
    }

    fn parse_fence(&mut self) -> Result<Atom, MathError> {
        let open = self.parse_delimiter("\\left")?;
        let (body, stop) = self.parse_row()?;
        if stop != Stop::Right {
            return Err(MathError::new("\\left without matching \\right"));
        }
        self.read_command()?;
        let close = self.parse_delimiter("\\right")?;
        Ok(Atom::plain(format!(
            "<mrow>{}<mrow>{}</mrow>{}</mrow>",
            fence(open),
            body,
            fence(close)
        )))
    }

    fn parse_environment(&mut self) -> Result<Atom, MathError> {
        let name = self.parse_raw_argument("\\begin")?;
        let name = name.trim().to_string();
        if name == "array" {
            // Column specification
            self.parse_raw_argument("\\begin{array}")?;
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        loop {
            let (cell, stop) = self.parse_row()?;
            current.push(cell);
            match stop {
                Stop::Cell => {}
                Stop::Row => rows.push(std::mem::take(&mut current)),
                Stop::End => {
                    rows.push(current);
                    break;
                }
                Stop::Eof => {
                    return Err(MathError::new(format!("missing \\end{{{}}}", name)))
                }
                Stop::CloseBrace => {
                    return Err(MathError::new(format!(
                        "unmatched '}}' inside environment '{}'",
                        name
                    )))
                }
                Stop::Right => {
                    return Err(MathError::new(format!(
                        "\\right without \\left inside environment '{}'",
                        name
                    )))
                }
            }
        }
        self.read_command()?;
        let closing = self.parse_raw_argument("\\end")?;
        if closing.trim() != name {
            return Err(MathError::new(format!(
                "environment '{}' closed by \\end{{{}}}",
                name,
                closing.trim()
            )));
        }

        // A trailing `\\` leaves an empty last row
        if rows.len() > 1 && rows.last().is_some_and(|r| r.iter().all(|c| c.is_empty())) {
            rows.pop();
        }

        let mut table = String::from("<mtable>");
        for row in &rows {
            table.push_str("<mtr>");
            for cell in row {
                table.push_str("<mtd>");
                table.push_str(cell);
                table.push_str("</mtd>");
            }
            table.push_str("</mtr>");
        }
        table.push_str("</mtable>");

        let (open, close) = MATRIX_FENCES.get(name.as_str()).copied().unwrap_or(("", ""));
        if open.is_empty() && close.is_empty() {
            Ok(Atom::plain(table))
        } else {
            Ok(Atom::plain(format!(
                "<mrow>{}{}{}</mrow>",
                fence(open),
                table,
                fence(close)
            )))
        }
    }
}

fn too_deep() -> MathError {
    MathError::new("formula nested too deeply")
}

fn fence(delimiter: &str) -> String {
    if delimiter.is_empty() {
        String::new()
    } else {
        format!(
            "<mo fence=\"true\" stretchy=\"true\">{}</mo>",
            escape_html(delimiter)
        )
    }
}

fn char_markup(c: char) -> String {
    match c {
        c if c.is_alphabetic() => format!("<mi>{}</mi>", c),
        '\'' => "<mo>′</mo>".to_string(),
        '~' => "<mspace width=\"0.3333em\"/>".to_string(),
        '-' => "<mo>−</mo>".to_string(),
        '*' => "<mo>∗</mo>".to_string(),
        c => format!("<mo>{}</mo>", escape_html(&c.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expr: &str) -> String {
        MathMlRenderer::new().render(expr, false).unwrap()
    }

    fn render_err(expr: &str) -> MathError {
        MathMlRenderer::new()
            .with_syntax_check(false)
            .render(expr, false)
            .unwrap_err()
    }

    #[test]
    fn test_wrapper_and_annotation() {
        let out = MathMlRenderer::new().render("x<y", true).unwrap();
        assert!(out.starts_with("<math xmlns=\"http://www.w3.org/1998/Math/MathML\" display=\"block\">"));
        assert!(out.contains("<annotation encoding=\"application/x-tex\">x&lt;y</annotation>"));
        assert!(out.contains("<mo>&lt;</mo>"));
    }

    #[test]
    fn test_identifiers_numbers_operators() {
        let out = render("2x + 3.5 = y");
        assert!(out.contains("<mn>2</mn><mi>x</mi><mo>+</mo><mn>3.5</mn><mo>=</mo><mi>y</mi>"));
    }

    #[test]
    fn test_fraction_and_root() {
        let out = render(r"\frac{a}{b} + \sqrt[3]{x}");
        assert!(out.contains("<mfrac><mrow><mi>a</mi></mrow><mrow><mi>b</mi></mrow></mfrac>"));
        assert!(out.contains("<mroot><mrow><mi>x</mi></mrow><mrow><mn>3</mn></mrow></mroot>"));
    }

    #[test]
    fn test_unbraced_fraction_arguments() {
        let out = render(r"\frac12");
        assert!(out.contains("<mfrac><mn>1</mn><mn>2</mn></mfrac>"));
    }

    #[test]
    fn test_scripts() {
        assert!(render("x^2").contains("<msup><mi>x</mi><mn>2</mn></msup>"));
        assert!(render("a_i^2").contains("<msubsup><mi>a</mi><mi>i</mi><mn>2</mn></msubsup>"));
        assert!(render("f'").contains("<msup><mi>f</mi><mo>′</mo></msup>"));
    }

    #[test]
    fn test_big_operator_limits() {
        let out = render(r"\sum_{i=1}^{n} i");
        assert!(out.contains("<munderover><mo largeop=\"true\">∑</mo>"));
        let int = render(r"\int_0^1 x");
        assert!(int.contains("<msubsup><mo largeop=\"true\">∫</mo>"));
    }

    #[test]
    fn test_symbols() {
        let out = render(r"\alpha \leq \Omega \infty");
        assert!(out.contains("<mi>α</mi>"));
        assert!(out.contains("<mo>≤</mo>"));
        assert!(out.contains("<mi mathvariant=\"normal\">Ω</mi>"));
        assert!(out.contains("<mi>∞</mi>"));
    }

    #[test]
    fn test_text_and_functions() {
        let out = render(r"\sin x \text{ if } x > 0");
        assert!(out.contains("<mi>sin</mi>"));
        assert!(out.contains("<mtext> if </mtext>"));
    }

    #[test]
    fn test_fences() {
        let out = render(r"\left( \frac{1}{2} \right]");
        assert!(out.contains("<mo fence=\"true\" stretchy=\"true\">(</mo>"));
        assert!(out.contains("<mo fence=\"true\" stretchy=\"true\">]</mo>"));
        let braces = render(r"\left\{ x \right.");
        assert!(braces.contains(">{</mo>"));
    }

    #[test]
    fn test_matrix_environment() {
        let out = render(r"\begin{pmatrix} a & b \\ c & d \end{pmatrix}");
        assert_eq!(out.matches("<mtr>").count(), 2);
        assert_eq!(out.matches("<mtd>").count(), 4);
        assert!(out.contains(">(</mo><mtable>"));
    }

    #[test]
    fn test_unknown_command_kept() {
        let out = render(r"\foo x");
        assert!(out.contains("<mi>foo</mi>"));
    }

    #[test]
    fn test_malformed_input() {
        assert!(render_err(r"\frac{1}{").message.contains("brace"));
        assert!(render_err("x^").message.contains("superscript"));
        assert!(render_err("x^1^2").message.contains("double superscript"));
        assert!(render_err(r"\left( x").message.contains("\\right"));
        assert!(render_err("a}").message.contains("unmatched"));
        assert!(render_err(r"\begin{matrix} a \end{pmatrix}")
            .message
            .contains("closed by"));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let depth = 5000;
        let braces = format!("{}x{}", "{".repeat(depth), "}".repeat(depth));
        assert_eq!(render_err(&braces).message, "formula nested too deeply");

        let roots = format!("{}x", "\\sqrt".repeat(depth));
        assert_eq!(render_err(&roots).message, "formula nested too deeply");

        let fences = format!("{}x{}", "\\left(".repeat(depth), "\\right)".repeat(depth));
        assert!(MathMlRenderer::new().render(&fences, true).is_err());
    }

    #[test]
    fn test_nesting_below_limit_renders() {
        let depth = 100;
        let out = render(&format!("{}x{}", "{".repeat(depth), "}".repeat(depth)));
        assert_eq!(out.matches("<mrow>").count(), depth + 1);
    }

    #[test]
    fn test_parser_guard_without_prepass() {
        let depth = MAX_NESTING_DEPTH + 10;
        let expr = format!("{}x{}", "{".repeat(depth), "}".repeat(depth));
        let err = Parser::new(&expr).parse().unwrap_err();
        assert_eq!(err.message, "formula nested too deeply");
    }

    #[test]
    fn test_syntax_check_rejects_unbalanced_braces() {
        assert!(MathMlRenderer::new().render(r"\frac{1}{", false).is_err());
    }
}
