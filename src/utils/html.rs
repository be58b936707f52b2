//! Markup escaping helpers

/// Escape the five markup-significant characters
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape plain text and turn line breaks into `<br/>`.
///
/// `\r\n` and lone `\r` count as one break each.
pub fn escape_text_with_breaks(s: &str) -> String {
    let escaped = escape_html(s);
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut chars = escaped.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(LINE_BREAK);
            }
            '\n' => out.push_str(LINE_BREAK),
            _ => out.push(ch),
        }
    }
    out
}

/// Line-break marker emitted for plain-text newlines
pub const LINE_BREAK: &str = "<br/>";

/// Escape for XML text and attribute content
pub fn escape_xml(s: &str) -> String {
    escape_html(s).replace("&#39;", "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > \"d\" 'e'"), "a &lt; b &amp;&amp; c &gt; &quot;d&quot; &#39;e&#39;");
    }

    #[test]
    fn test_breaks() {
        assert_eq!(escape_text_with_breaks("a\nb\r\nc\rd"), "a<br/>b<br/>c<br/>d");
    }

    #[test]
    fn test_escape_xml_apostrophe() {
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }
}
