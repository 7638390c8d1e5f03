use std::borrow::Cow;

/// Escapes `"`, `&`, `'`, `<` and `>` for use in text content or a quoted
/// attribute value. Input without those characters is returned borrowed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '&', '\'', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("&quot;"),
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// `value` → `"value"`, escaped.
pub fn quote_attribute_value(value: &str) -> String {
    format!("\"{}\"", escape_html(value))
}
