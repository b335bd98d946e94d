//! Document information (`{\info …}`).
//!
//! Text items become elements with character content, time items become
//! empty tags with their date parts as attributes, and counters become empty
//! tags with a `value` attribute.

use super::{TableResolver, text_value};
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;

/// Element name for a text item.
fn text_element(name: &str) -> Option<&'static str> {
    Some(match name {
        "title_____" => "title",
        "subject___" => "subject",
        "author____" => "author",
        "manager___" => "manager",
        "company___" => "company",
        "operator__" => "operator",
        "category__" => "category",
        "keywords__" => "keywords",
        "comment___" => "comment",
        "doc-notes_" => "doc-notes",
        "hyperlinkb" => "hyperlink-base",
        _ => return None,
    })
}

/// Element name for a time item.
fn time_element(name: &str) -> Option<&'static str> {
    Some(match name {
        "creat-time" => "creation-time",
        "revis-time" => "revision-time",
        "print-time" => "printing-time",
        "backuptime" => "backup-time",
        _ => return None,
    })
}

/// Element name for a numeric item.
fn number_element(name: &str) -> Option<&'static str> {
    Some(match name {
        "version___" => "version",
        "intern-ver" => "internal-version-number",
        "edit-time_" => "editing-time",
        "num-of-pag" => "number-of-pages",
        "num-of-wor" => "number-of-words",
        "num-of-chr" => "number-of-characters",
        "numofchrws" => "number-of-characters-with-spaces",
        "internal-i" => "internal-id",
        _ => return None,
    })
}

/// Attribute name for a date part.
fn time_part(name: &str) -> Option<&'static str> {
    Some(match name {
        "year______" => "year",
        "month_____" => "month",
        "day_______" => "day",
        "hour______" => "hour",
        "minute____" => "minute",
        "second____" => "second",
        _ => return None,
    })
}

/// One item of the info group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoItem {
    Text { element: &'static str, text: String },
    Time { element: &'static str, parts: ir::Attrs },
    Number { element: &'static str, value: String },
}

/// Document information/metadata.
#[derive(Debug, Clone, Default)]
pub struct DocInfo {
    items: Vec<InfoItem>,
}

impl DocInfo {
    pub fn items(&self) -> &[InfoItem] {
        &self.items
    }

    /// Text of the first item named `element`.
    pub fn text(&self, element: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            InfoItem::Text { element: e, text } if *e == element => Some(text.as_str()),
            _ => None,
        })
    }
}

impl TableResolver for DocInfo {
    fn kind(&self) -> TableKind {
        TableKind::Info
    }

    fn collect(&mut self, lines: &[String]) {
        let mut current: Option<InfoItem> = None;
        for line in lines {
            if ir::is_open_bracket(line) || ir::is_close_bracket(line) {
                if let Some(item) = current.take() {
                    self.items.push(item);
                }
                continue;
            }
            if let Some(text) = text_value(line) {
                if let Some(InfoItem::Text { text: buf, .. }) = current.as_mut() {
                    buf.push_str(text);
                }
                continue;
            }
            if !line.starts_with("cw<it<") {
                continue;
            }
            let name = ir::cw_name(line);
            let value = ir::cw_value(line);
            if let Some(element) = text_element(name) {
                if let Some(item) = current.take() {
                    self.items.push(item);
                }
                current = Some(InfoItem::Text {
                    element,
                    text: String::new(),
                });
            } else if let Some(element) = time_element(name) {
                if let Some(item) = current.take() {
                    self.items.push(item);
                }
                current = Some(InfoItem::Time {
                    element,
                    parts: Vec::new(),
                });
            } else if let Some(part) = time_part(name) {
                if let Some(InfoItem::Time { parts, .. }) = current.as_mut() {
                    parts.push((part.to_string(), value.to_string()));
                }
            } else if let Some(element) = number_element(name) {
                self.items.push(InfoItem::Number {
                    element,
                    value: value.to_string(),
                });
            }
        }
        if let Some(item) = current {
            self.items.push(item);
        }
    }

    fn table_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                InfoItem::Text { element, text } => {
                    out.push(ir::open_tag(element));
                    out.push(ir::text(text.trim()));
                    out.push(ir::close_tag(element));
                },
                InfoItem::Time { element, parts } => out.push(ir::empty_tag_with(element, parts)),
                InfoItem::Number { element, value } => {
                    out.push(ir::empty_tag_with(element, &[("value", value.as_str())]));
                },
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_items() {
        let lines: Vec<String> = [
            "ob<nu<open-brack<0002",
            "cw<di<doc-info__<nu<true",
            "ob<nu<open-brack<0003",
            "cw<it<title_____<nu<true",
            "tx<nu<__________<Annual &amp; Final",
            "cb<nu<clos-brack<0003",
            "ob<nu<open-brack<0003",
            "cw<it<creat-time<nu<true",
            "cw<it<year______<nu<2003",
            "cw<it<month_____<nu<7",
            "cw<it<day_______<nu<14",
            "cb<nu<clos-brack<0003",
            "cw<it<num-of-pag<nu<3",
            "cb<nu<clos-brack<0002",
        ]
        .iter()
        .map(|l| l.to_string())
        .collect();
        let mut info = DocInfo::default();
        info.collect(&lines);
        assert_eq!(info.text("title"), Some("Annual &amp; Final"));
        assert_eq!(
            info.table_lines(),
            vec![
                "mi<tg<open______<title",
                "tx<nu<__________<Annual &amp; Final",
                "mi<tg<close_____<title",
                "mi<tg<empty-att_<creation-time<year>2003<month>7<day>14",
                "mi<tg<empty-att_<number-of-pages<value>3",
            ]
        );
    }
}
