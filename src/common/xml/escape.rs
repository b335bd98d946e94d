use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

// Text reaching attributes is already entity-escaped; only quotes remain
static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["\"", "'"])
        .expect("Failed to build XML attribute escaper")
});

static TEXT_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&amp;", "&lt;", "&gt;"])
        .expect("Failed to build XML text unescaper")
});

/// Escape the characters that may not appear raw in XML character data.
///
/// # Examples
///
/// ```
/// use rtf2xml::common::xml::escape_text;
/// assert_eq!(escape_text("a & b <c>"), "a &amp; b &lt;c&gt;");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Reverse [`escape_text`].
#[inline]
pub fn unescape_text(s: &str) -> String {
    TEXT_UNESCAPER.replace_all(s, &["&", "<", ">"])
}

/// Escape an attribute value that is already safe as character data.
///
/// # Examples
///
/// ```
/// use rtf2xml::common::xml::escape_attr;
/// assert_eq!(escape_attr(r#"say "hi" it's"#), "say &quot;hi&quot; it&apos;s");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    ATTR_ESCAPER.replace_all(s, &["&quot;", "&apos;"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trip() {
        let raw = "x < y && y > z";
        assert_eq!(unescape_text(&escape_text(raw)), raw);
    }

    #[test]
    fn test_attr_keeps_entities() {
        assert_eq!(escape_attr("Smith &amp; Co"), "Smith &amp; Co");
    }
}
