//! Math expression diagnostics
//!
//! Checks the content of math segments before it reaches a renderer. It
//! reports:
//!
//! - Syntax errors found by mitex-parser
//! - Unbalanced braces, `\begin`/`\end` environments and `\left`/`\right`
//! - Commands that have no meaning inside a formula
//!
//! ## Example
//!
//! ```rust
//! use texdocx::diagnostics::check_math;
//!
//! let result = check_math(r"\frac{1}{");
//! assert!(result.has_errors());
//! ```

use mitex_parser::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use mitex_parser::CommandSpec;
use mitex_spec_gen::DEFAULT_SPEC;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

use crate::core::segment::{segment, TextSegment};
use fxhash::FxHashMap;
use lazy_static::lazy_static;

lazy_static! {
    /// Command specification for parsing formulas
    static ref MATH_SPEC: CommandSpec = {
        let commands: FxHashMap<String, _> = DEFAULT_SPEC
            .items()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        CommandSpec::new(commands)
    };

    /// Document-structure commands that cannot be typeset inside a formula
    static ref NON_MATH_COMMANDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("section");
        s.insert("subsection");
        s.insert("chapter");
        s.insert("item");
        s.insert("includegraphics");
        s.insert("maketitle");
        s.insert("documentclass");
        s.insert("usepackage");
        s.insert("newpage");
        s.insert("footnote");
        s
    };

    static ref ENVIRONMENT_RE: Regex =
        Regex::new(r"\\(begin|end)\s*\{([^}]*)\}").expect("valid environment regex");
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the formula renders but may look wrong
    Warning,
    /// Error - the formula cannot be rendered
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed, in bytes)
    pub column: Option<usize>,
    pub source_text: Option<String>,
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// First error message, if any
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics
            .iter()
            .find(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(plural(self.errors, "error"));
        }
        if self.warnings > 0 {
            parts.push(plural(self.warnings, "warning"));
        }
        if self.infos > 0 {
            parts.push(plural(self.infos, "note"));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

/// Deepest nesting a formula may have before it is rejected unparsed
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum nesting of a formula, measured in one linear pass.
///
/// Counts `{`, `\left` and `\begin` levels plus runs of back-to-back
/// commands (`\sqrt\sqrt\sqrt x`), which nest without braces.
pub fn nesting_depth(input: &str) -> usize {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut chain = 0usize;
    let mut max = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
                    end += 1;
                }
                if end == start {
                    // Escaped symbol: `\{`, `\\`, `\,`
                    chain = 0;
                    i = start + 1;
                    continue;
                }
                match &input[start..end] {
                    "left" | "begin" => depth += 1,
                    "right" | "end" => depth = depth.saturating_sub(1),
                    _ => {}
                }
                chain += 1;
                max = max.max(depth + chain);

                i = end;
                while i < bytes.len() && bytes[i] == b' ' {
                    i += 1;
                }
                if bytes.get(i) != Some(&b'\\') {
                    chain = 0;
                }
                continue;
            }
            b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }

    max
}

/// Check one formula (delimiters already stripped)
pub fn check_math(input: &str) -> CheckResult {
    let mut result = CheckResult::new();

    let depth = nesting_depth(input);
    if depth > MAX_NESTING_DEPTH {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("formula nested too deeply ({} levels)", depth),
            )
            .with_suggestion(format!(
                "Keep groups, fences and environments under {} levels",
                MAX_NESTING_DEPTH
            )),
        );
        return result;
    }

    let line_offsets = compute_line_offsets(input);

    let tree = mitex_parser::parse(input, MATH_SPEC.clone());
    check_node(&tree, &line_offsets, &mut result);

    check_brace_balance(input, &line_offsets, &mut result);
    check_environment_balance(input, &line_offsets, &mut result);
    check_left_right_balance(input, &mut result);

    result
}

/// Check every math segment of a raw document.
///
/// Returns the segment index with its result, for segments that have at
/// least one diagnostic.
pub fn check_document(raw: &str) -> Vec<(usize, TextSegment, CheckResult)> {
    segment(raw)
        .into_iter()
        .enumerate()
        .filter(|(_, seg)| seg.is_math())
        .filter_map(|(index, seg)| {
            let result = check_math(&seg.content);
            (!result.is_empty()).then_some((index, seg, result))
        })
        .collect()
}

/// Byte offsets of each line start
fn compute_line_offsets(input: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in input.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Convert byte offset to 1-indexed line and column
fn offset_to_location(offset: usize, line_offsets: &[usize]) -> (usize, usize) {
    let line = line_offsets
        .iter()
        .position(|&o| o > offset)
        .unwrap_or(line_offsets.len())
        - 1;

    let column = offset - line_offsets.get(line).unwrap_or(&0) + 1;
    (line + 1, column)
}

fn check_node(node: &SyntaxNode, line_offsets: &[usize], result: &mut CheckResult) {
    for child in node.children_with_tokens() {
        match child.kind() {
            SyntaxKind::TokenError => {
                let text = match &child {
                    SyntaxElement::Token(t) => t.text().to_string(),
                    SyntaxElement::Node(n) => n.text().to_string(),
                };

                let offset = child.text_range().start().into();
                let (line, col) = offset_to_location(offset, line_offsets);

                result.add(
                    Diagnostic::new(
                        DiagnosticLevel::Error,
                        format!("syntax error: unexpected '{}'", text),
                    )
                    .with_location(line, col)
                    .with_source(&text),
                );
            }

            SyntaxKind::ItemCmd => {
                if let SyntaxElement::Node(cmd_node) = &child {
                    check_command(cmd_node, line_offsets, result);
                }
            }

            _ => {
                if let SyntaxElement::Node(n) = child {
                    check_node(&n, line_offsets, result);
                }
            }
        }
    }
}

fn check_command(node: &SyntaxNode, line_offsets: &[usize], result: &mut CheckResult) {
    let text = node.text().to_string();
    let cmd_name: String = text
        .trim_start_matches('\\')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if NON_MATH_COMMANDS.contains(cmd_name.as_str()) {
        let offset: usize = node.text_range().start().into();
        let (line, col) = offset_to_location(offset, line_offsets);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!("command '\\{}' has no meaning inside a formula", cmd_name),
            )
            .with_location(line, col)
            .with_source(format!("\\{}", cmd_name))
            .with_suggestion("Move it outside the math delimiters"),
        );
    }

    check_node(node, line_offsets, result);
}

/// Escaped braces (`\{`, `\}`) are delimiters, not groups
fn check_brace_balance(input: &str, line_offsets: &[usize], result: &mut CheckResult) {
    let mut open_offsets: Vec<usize> = Vec::new();
    let mut chars = input.char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => open_offsets.push(offset),
            '}' => {
                if open_offsets.pop().is_none() {
                    let (line, col) = offset_to_location(offset, line_offsets);
                    result.add(
                        Diagnostic::new(DiagnosticLevel::Error, "unmatched closing brace '}'")
                            .with_location(line, col)
                            .with_suggestion("Check for missing opening brace"),
                    );
                }
            }
            _ => {}
        }
    }

    if let Some(&first) = open_offsets.first() {
        let (line, col) = offset_to_location(first, line_offsets);
        let depth = open_offsets.len();
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "{} unclosed brace{}",
                    depth,
                    if depth == 1 { "" } else { "s" }
                ),
            )
            .with_location(line, col)
            .with_suggestion("Check for missing closing brace '}'"),
        );
    }
}

fn check_environment_balance(input: &str, line_offsets: &[usize], result: &mut CheckResult) {
    let mut env_stack: Vec<(String, usize)> = Vec::new();

    for caps in ENVIRONMENT_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        let name = caps[2].trim().to_string();
        let (line, col) = offset_to_location(whole.start(), line_offsets);

        if &caps[1] == "begin" {
            env_stack.push((name, line));
            continue;
        }

        match env_stack.pop() {
            Some((open_name, open_line)) if open_name != name => {
                result.add(
                    Diagnostic::new(
                        DiagnosticLevel::Error,
                        format!(
                            "mismatched environment: opened '{}' at line {}, closed '{}'",
                            open_name, open_line, name
                        ),
                    )
                    .with_location(line, col)
                    .with_suggestion(format!("Use \\end{{{}}}", open_name)),
                );
            }
            Some(_) => {}
            None => {
                result.add(
                    Diagnostic::new(DiagnosticLevel::Error, format!("unmatched \\end{{{}}}", name))
                        .with_location(line, col)
                        .with_suggestion("Check for missing \\begin"),
                );
            }
        }
    }

    for (env_name, line) in env_stack {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("unclosed environment '{}' (opened at line {})", env_name, line),
            )
            .with_suggestion(format!("Add \\end{{{}}}", env_name)),
        );
    }
}

fn check_left_right_balance(input: &str, result: &mut CheckResult) {
    let lefts = count_command(input, "left");
    let rights = count_command(input, "right");
    if lefts != rights {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("{} \\left but {} \\right", lefts, rights),
            )
            .with_suggestion("Every \\left needs a matching \\right"),
        );
    }
}

/// Count `\name` occurrences not followed by another letter
/// (so `\left` does not match `\leftarrow`)
fn count_command(input: &str, name: &str) -> usize {
    let needle = format!("\\{}", name);
    input
        .match_indices(&needle)
        .filter(|(i, _)| {
            let escaped = input[..*i].ends_with('\\') && !input[..*i].ends_with("\\\\");
            let next = input[i + needle.len()..].chars().next();
            !escaped && !next.is_some_and(|c| c.is_ascii_alphabetic())
        })
        .count()
}

/// Longest source excerpt shown in a report header
const EXCERPT_CHARS: usize = 60;

fn excerpt(source: &str) -> String {
    let mut chars = source.chars();
    let mut out: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        out.push('…');
    }
    out.replace('\n', " ")
}

fn level_color(level: DiagnosticLevel) -> &'static str {
    match level {
        DiagnosticLevel::Error => "31",
        DiagnosticLevel::Warning => "33",
        DiagnosticLevel::Info => "34",
    }
}

/// Terminal report for the findings of [`check_document`].
///
/// One block per flagged segment (index, source with delimiters, indented
/// diagnostics) followed by a totals line over all segments.
pub fn format_diagnostics(
    findings: &[(usize, TextSegment, CheckResult)],
    use_color: bool,
) -> String {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    };

    let mut output = String::new();
    let mut totals = CheckResult::new();

    for (index, seg, result) in findings {
        let header = format!("segment {}: {}", index, excerpt(&seg.original_form()));
        output.push_str(&paint("1", &header));
        output.push('\n');

        for diag in &result.diagnostics {
            let body = diag
                .to_string()
                .lines()
                .map(|line| format!("  {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            output.push_str(&paint(level_color(diag.level), &body));
            output.push_str("\n");
        }
        output.push('\n');

        totals.errors += result.errors;
        totals.warnings += result.warnings;
        totals.infos += result.infos;
    }

    let summary = if findings.is_empty() {
        "Summary: no issues found".to_string()
    } else {
        format!(
            "Summary: {} in {} formula{}",
            totals.summary(),
            findings.len(),
            if findings.len() == 1 { "" } else { "s" }
        )
    };
    let code = if totals.has_errors() {
        "31"
    } else if totals.warnings > 0 {
        "33"
    } else {
        "32"
    };
    output.push_str(&paint(code, &summary));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_braces() {
        let result = check_math(r"\frac{1}{2}");
        assert!(!result.has_errors(), "Should pass for balanced braces");
    }

    #[test]
    fn test_unbalanced_braces() {
        let result = check_math(r"\frac{1}{");
        assert!(result.has_errors());
        assert!(result.first_error().unwrap().message.contains("unclosed"));
    }

    #[test]
    fn test_escaped_braces_are_not_groups() {
        let result = check_math(r"\left\{ x \right.");
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
    }

    #[test]
    fn test_stray_closing_brace() {
        let result = check_math("x}");
        assert!(result.has_errors());
    }

    #[test]
    fn test_environments() {
        assert!(!check_math(r"\begin{matrix}a&b\end{matrix}").has_errors());
        assert!(check_math(r"\begin{matrix}a&b").has_errors());
        assert!(check_math(r"\begin{matrix}a\end{pmatrix}").has_errors());
    }

    #[test]
    fn test_nesting_depth() {
        assert_eq!(nesting_depth("x + y"), 0);
        assert_eq!(nesting_depth(r"\frac{a}{b}"), 1);
        assert_eq!(nesting_depth("{{x}}{y}"), 2);
        assert_eq!(nesting_depth(r"\left( \left[ x \right] \right)"), 3);
        assert_eq!(nesting_depth(r"\sqrt\sqrt\sqrt x"), 3);
        assert_eq!(nesting_depth(r"\{ \{ \{ x"), 0);
        assert_eq!(nesting_depth(r"\begin{matrix} a \\ b \end{matrix}"), 2);
    }

    #[test]
    fn test_too_deep_reported_without_parsing() {
        let nested = |depth: usize| format!("{}x{}", "{".repeat(depth), "}".repeat(depth));

        let result = check_math(&nested(MAX_NESTING_DEPTH + 1));
        assert_eq!(result.errors, 1);
        assert!(result.first_error().unwrap().message.contains("nested too deeply"));

        assert!(!check_math(&nested(MAX_NESTING_DEPTH)).has_errors());
    }

    #[test]
    fn test_left_right() {
        assert!(!check_math(r"\left( x \right)").has_errors());
        assert!(check_math(r"\left( x").has_errors());
        assert!(!check_math(r"a \leftarrow b \rightarrow c").has_errors());
    }

    #[test]
    fn test_count_command_skips_longer_names() {
        assert_eq!(count_command(r"\left(\leftarrow\left.", "left"), 2);
    }

    #[test]
    fn test_check_document_reports_only_problems() {
        let report = check_document(r"ok $x^2$ bad $\frac{1}{$ end");
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].0, 3);
        assert!(report[0].2.has_errors());
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("2 warnings"));
        assert_eq!(CheckResult::new().summary(), "no issues found");
    }

    #[test]
    fn test_report_without_color() {
        let findings = check_document(r"ok $x$ then $\frac{1}{$");
        let text = format_diagnostics(&findings, false);
        assert!(text.starts_with("segment 3: $\\frac{1}{$\n  "));
        assert!(text.contains("\n  error: "));
        assert!(text.ends_with(" in 1 formula"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_report_totals_and_color() {
        let findings = check_document(r"$\frac{1}{$ and \[\left( x\]");
        let text = format_diagnostics(&findings, true);
        assert!(text.contains("\x1b[1msegment 0: $\\frac{1}{$\x1b[0m"));
        assert!(text.contains("\x1b[1msegment 2: \\[\\left( x\\]\x1b[0m"));
        assert!(text.contains("in 2 formulas"));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_report_clean_and_long_source() {
        assert_eq!(format_diagnostics(&[], false), "Summary: no issues found");

        let long = format!("${}{{$", "x".repeat(100));
        let text = format_diagnostics(&check_document(&long), false);
        let header = text.lines().next().unwrap();
        assert!(header.ends_with('…'));
        assert_eq!(header.chars().count(), "segment 0: ".len() + EXCERPT_CHARS + 1);
    }
}
