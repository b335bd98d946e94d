//! Line-oriented intermediate representation.
//!
//! Between passes a document is a stream of newline-terminated lines. Every
//! line starts with a 16 byte typed prefix `AA<BB<CCCCCCCCCC`, optionally
//! followed by `<` and a value:
//!
//! ```text
//! cw<pf<par-end___<nu<true        classified control word
//! tx<nu<__________<Hello          plain text (already XML-escaped)
//! tx<hx<__________<'e9            hex byte
//! tx<ut<__________<&#x00E9;       unicode entity
//! ob<nu<open-brack<0002           depth-numbered open brace
//! mi<mk<para-start                marker
//! mi<tg<open-att__<cell<width>72.00
//! ```
//!
//! Tag attribute values are stored escaped as character data, like text.

use smallvec::SmallVec;

/// Width of the name field in every prefix.
pub const NAME_WIDTH: usize = 10;

/// Length of the typed prefix.
pub const PREFIX_LEN: usize = 16;

/// Attribute list carried by tag lines.
pub type Attrs = Vec<(String, String)>;

/// Pad or truncate a name to exactly [`NAME_WIDTH`] bytes.
pub fn pad_name(name: &str) -> String {
    let mut out: String = name.chars().take(NAME_WIDTH).collect();
    while out.len() < NAME_WIDTH {
        out.push('_');
    }
    out
}

/// Marker prefixes emitted by the passes.
pub mod mk {
    pub const BODY_OPEN: &str = "mi<mk<body-open_";
    pub const BODY_CLOSE: &str = "mi<mk<body-close";
    pub const RTF_HEADER_BEGIN: &str = "mi<mk<rtfhed-beg";
    pub const RTF_HEADER_END: &str = "mi<mk<rtfhed-end";
    pub const FONT_TABLE_BEGIN: &str = "mi<mk<fonttb-beg";
    pub const FONT_TABLE_END: &str = "mi<mk<fonttb-end";
    pub const COLOR_TABLE_BEGIN: &str = "mi<mk<colrtb-beg";
    pub const COLOR_TABLE_END: &str = "mi<mk<colrtb-end";
    pub const STYLE_TABLE_BEGIN: &str = "mi<mk<stylsh-beg";
    pub const STYLE_TABLE_END: &str = "mi<mk<stylsh-end";
    pub const LIST_TABLE_BEGIN: &str = "mi<mk<listtb-beg";
    pub const LIST_TABLE_END: &str = "mi<mk<listtb-end";
    pub const OVERRIDE_TABLE_BEGIN: &str = "mi<mk<lovrtb-beg";
    pub const OVERRIDE_TABLE_END: &str = "mi<mk<lovrtb-end";
    pub const REVISION_TABLE_BEGIN: &str = "mi<mk<revtbl-beg";
    pub const REVISION_TABLE_END: &str = "mi<mk<revtbl-end";
    pub const DOC_INFO_BEGIN: &str = "mi<mk<doc-in-beg";
    pub const DOC_INFO_END: &str = "mi<mk<doc-in-end";

    pub const FOOTNOTE_REF: &str = "mi<mk<footnt-ind";
    pub const FOOTNOTE_OPEN: &str = "mi<mk<footnt-ope";
    pub const FOOTNOTE_CLOSE: &str = "mi<mk<footnt-clo";
    pub const FOOTNOTE_AREA_BEGIN: &str = "mi<mk<footnt-beg";
    pub const FOOTNOTE_AREA_END: &str = "mi<mk<footnt-end";
    pub const HEADER_REF: &str = "mi<mk<header-ind";
    pub const HEADER_OPEN: &str = "mi<mk<header-ope";
    pub const HEADER_CLOSE: &str = "mi<mk<head___clo";
    pub const HEADER_AREA_BEGIN: &str = "mi<mk<header-beg";
    pub const HEADER_AREA_END: &str = "mi<mk<header-end";

    pub const PICT_START: &str = "mi<mk<pict-start";
    pub const LIST_TEXT_BEGIN: &str = "mi<mk<lst-tx-beg";
    pub const LIST_TEXT_END: &str = "mi<mk<lst-tx-end";

    pub const INLINE_FIELD: &str = "mi<mk<inline-fld";
    pub const FIELD_BLOCK_START: &str = "mi<mk<fldbkstart";
    pub const FIELD_BLOCK_END: &str = "mi<mk<fldbk-end_";
    pub const SECTION_FIELD_BEGIN: &str = "mi<mk<sec-fd-beg";
    pub const SECTION_FIELD_END: &str = "mi<mk<sec-fd-end";

    pub const SECT_START: &str = "mi<mk<sect-start";
    pub const SECT_CLOSE: &str = "mi<mk<sect-close";
    pub const PARD_START: &str = "mi<mk<pard-start";
    pub const PARA_START: &str = "mi<mk<para-start";
    pub const PARA_END: &str = "mi<mk<para-end__";
    pub const BOGUS_PARD: &str = "mi<mk<bogus-pard";

    pub const TABLE_START: &str = "mi<mk<tabl-start";
    pub const TABLE_END: &str = "mi<mk<table-end_";
    pub const TABLE_INFO: &str = "mi<mk<table-info";
    pub const CLOSE_CELL: &str = "mi<mk<close_cell";

    pub const FONT: &str = "mi<mk<font______";
    pub const FONT_END: &str = "mi<mk<font-end__";
    pub const CAPS: &str = "mi<mk<caps______";
    pub const CAPS_END: &str = "mi<mk<caps-end__";
}

/// Build a classified control-word line. `name` must already be padded.
#[inline]
pub fn control(category: &str, name: &str, value: &str) -> String {
    format!("cw<{}<{}<nu<{}", category, name, value)
}

#[inline]
pub fn text(value: &str) -> String {
    format!("tx<nu<__________<{}", value)
}

#[inline]
pub fn hex(value: &str) -> String {
    format!("tx<hx<__________<{}", value)
}

#[inline]
pub fn unicode_entity(code: u32) -> String {
    format!("tx<ut<__________<{}", entity(code))
}

#[inline]
pub fn ms_char(name: &str) -> String {
    format!("tx<mc<__________<{}", name)
}

/// Format a code point as a hexadecimal character reference.
#[inline]
pub fn entity(code: u32) -> String {
    format!("&#x{:04X};", code)
}

#[inline]
pub fn open_bracket(num: usize) -> String {
    format!("ob<nu<open-brack<{:04}", num)
}

#[inline]
pub fn close_bracket(num: usize) -> String {
    format!("cb<nu<clos-brack<{:04}", num)
}

/// Marker line with a value, e.g. `mi<mk<footnt-ind<0001`.
#[inline]
pub fn marker_with(marker: &str, value: &str) -> String {
    format!("{}<{}", marker, value)
}

#[inline]
pub fn open_tag(element: &str) -> String {
    format!("mi<tg<open______<{}", element)
}

#[inline]
pub fn close_tag(element: &str) -> String {
    format!("mi<tg<close_____<{}", element)
}

#[inline]
pub fn empty_tag(element: &str) -> String {
    format!("mi<tg<empty_____<{}", element)
}

/// Open tag with attributes; falls back to a plain open tag when `attrs` is empty.
pub fn open_tag_with<K: AsRef<str>, V: AsRef<str>>(element: &str, attrs: &[(K, V)]) -> String {
    if attrs.is_empty() {
        return open_tag(element);
    }
    format!("mi<tg<open-att__<{}{}", element, pack_attrs(attrs))
}

/// Empty tag with attributes; falls back to a plain empty tag when `attrs` is empty.
pub fn empty_tag_with<K: AsRef<str>, V: AsRef<str>>(element: &str, attrs: &[(K, V)]) -> String {
    if attrs.is_empty() {
        return empty_tag(element);
    }
    format!("mi<tg<empty-att_<{}{}", element, pack_attrs(attrs))
}

fn pack_attrs<K: AsRef<str>, V: AsRef<str>>(attrs: &[(K, V)]) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        out.push('<');
        out.push_str(key.as_ref());
        out.push('>');
        out.push_str(value.as_ref());
    }
    out
}

/// Typed prefix of a line (first 16 bytes, or the whole line if shorter).
#[inline]
pub fn prefix(line: &str) -> &str {
    line.get(..PREFIX_LEN).unwrap_or(line)
}

/// Value of a non control-word line (after the prefix and `<`).
#[inline]
pub fn value(line: &str) -> &str {
    line.get(PREFIX_LEN + 1..).unwrap_or("")
}

#[inline]
pub fn is_control(line: &str) -> bool {
    line.starts_with("cw<")
}

#[inline]
pub fn is_text(line: &str) -> bool {
    line.starts_with("tx<")
}

#[inline]
pub fn is_open_bracket(line: &str) -> bool {
    line.starts_with("ob<")
}

#[inline]
pub fn is_close_bracket(line: &str) -> bool {
    line.starts_with("cb<")
}

#[inline]
pub fn is_marker(line: &str) -> bool {
    line.starts_with("mi<mk<")
}

#[inline]
pub fn is_tag(line: &str) -> bool {
    line.starts_with("mi<tg<")
}

/// Category of a control-word line (`pf`, `ci`, ...).
#[inline]
pub fn category(line: &str) -> &str {
    line.get(3..5).unwrap_or("")
}

/// Padded canonical name of a control-word line.
#[inline]
pub fn cw_name(line: &str) -> &str {
    line.get(6..PREFIX_LEN).unwrap_or("")
}

/// Value of a control-word line (after `<nu<`).
#[inline]
pub fn cw_value(line: &str) -> &str {
    line.get(20..).unwrap_or("")
}

/// Brace depth number of an `ob`/`cb` line.
#[inline]
pub fn bracket_number(line: &str) -> usize {
    value(line).parse().unwrap_or(0)
}

/// Kind of a tag line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    Empty,
}

/// Parsed `mi<tg<` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    pub element: &'a str,
    pub attrs: SmallVec<[(&'a str, &'a str); 8]>,
}

impl<'a> Tag<'a> {
    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Owned copy of the attributes.
    pub fn owned_attrs(&self) -> Attrs {
        self.attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Parse a tag line. Returns `None` for any other kind of line.
pub fn parse_tag(line: &str) -> Option<Tag<'_>> {
    if !is_tag(line) {
        return None;
    }
    let kind = match line.get(6..PREFIX_LEN)? {
        "open______" | "open-att__" => TagKind::Open,
        "close_____" => TagKind::Close,
        "empty_____" | "empty-att_" => TagKind::Empty,
        _ => return None,
    };
    let rest = value(line);
    let mut parts = rest.split('<');
    let element = parts.next().unwrap_or("");
    let mut attrs = SmallVec::new();
    for part in parts {
        match part.split_once('>') {
            Some((k, v)) => attrs.push((k, v)),
            None => attrs.push((part, "")),
        }
    }
    Some(Tag {
        kind,
        element,
        attrs,
    })
}

/// Whether `line` opens the given element.
#[inline]
pub fn opens(line: &str, element: &str) -> bool {
    matches!(parse_tag(line), Some(Tag { kind: TagKind::Open, element: e, .. }) if e == element)
}

/// Whether `line` closes the given element.
#[inline]
pub fn closes(line: &str, element: &str) -> bool {
    line.starts_with("mi<tg<close_____<") && value(line) == element
}

/// Net change in element nesting caused by a line (+1, -1 or 0).
#[inline]
pub fn tag_delta(line: &str) -> i32 {
    if line.starts_with("mi<tg<open") {
        1
    } else if line.starts_with("mi<tg<close") {
        -1
    } else {
        0
    }
}

/// Escape text destined for a `tx<nu<` line.
pub fn escape_text(raw: &str) -> String {
    crate::common::xml::escape_text(raw)
}

/// Trim a float to the shortest representation (`12`, `12.5`).
pub fn format_points(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_name() {
        assert_eq!(pad_name("par-end"), "par-end___");
        assert_eq!(pad_name("a-very-long-name"), "a-very-lon");
    }

    #[test]
    fn test_control_line_fields() {
        let line = control("pf", "par-end___", "true");
        assert_eq!(line, "cw<pf<par-end___<nu<true");
        assert_eq!(category(&line), "pf");
        assert_eq!(cw_name(&line), "par-end___");
        assert_eq!(cw_value(&line), "true");
    }

    #[test]
    fn test_tag_round_trip() {
        let line = open_tag_with("cell", &[("width", "72.00"), ("border", "single")]);
        assert_eq!(line, "mi<tg<open-att__<cell<width>72.00<border>single");
        let tag = parse_tag(&line).unwrap();
        assert_eq!(tag.kind, TagKind::Open);
        assert_eq!(tag.element, "cell");
        assert_eq!(tag.attr("width"), Some("72.00"));
        assert!(opens(&line, "cell"));
        assert!(closes(&close_tag("cell"), "cell"));
    }

    #[test]
    fn test_empty_attrs_fall_back() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(open_tag_with("para", &none), "mi<tg<open______<para");
        assert_eq!(empty_tag_with("para", &none), "mi<tg<empty_____<para");
    }

    #[test]
    fn test_brackets() {
        assert_eq!(open_bracket(2), "ob<nu<open-brack<0002");
        assert_eq!(bracket_number(&close_bracket(13)), 13);
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(12.0), "12");
        assert_eq!(format_points(10.5), "10.5");
        assert_eq!(format_points(-0.25), "-0.25");
    }

    #[test]
    fn test_tag_delta() {
        assert_eq!(tag_delta(&open_tag("para")), 1);
        assert_eq!(tag_delta(&close_tag("para")), -1);
        assert_eq!(tag_delta(&empty_tag("para")), 0);
        assert_eq!(tag_delta(mk::PARA_START), 0);
    }
}
