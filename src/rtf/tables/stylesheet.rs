//! Stylesheet.
//!
//! Each `{\sN … Name;}` entry becomes a `paragraph-style-in-table` (or
//! `character-style-in-table` for `\csN`) tag carrying the entry's
//! formatting as attributes. `\sbasedon` is resolved to the parent's name
//! with a walk bounded by the number of styles, so cycles keep the number.

use super::{NOT_DEFINED, TableResolver, reference, text_value, with_value};
use crate::rtf::control_words::attribute_name;
use crate::rtf::diagnostics::Diagnostics;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;
use std::collections::BTreeMap;

/// Style type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StyleType {
    /// Paragraph style
    #[default]
    Paragraph,
    /// Character style
    Character,
    /// Section style
    Section,
    /// Table style
    Table,
}

impl StyleType {
    fn element(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph-style-in-table",
            StyleType::Character => "character-style-in-table",
            StyleType::Section => "section-style-in-table",
            StyleType::Table => "table-style-in-table",
        }
    }
}

/// Style definition
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Style number
    pub num: i32,
    /// Style name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Based-on style number (parent style)
    pub based_on: Option<i32>,
    /// Next style number (style for next paragraph)
    pub next_style: Option<i32>,
    /// Formatting carried by the definition
    pub attrs: ir::Attrs,
}

/// Stylesheet keyed by (type, number).
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: BTreeMap<(StyleType, i32), Style>,
}

impl StyleSheet {
    /// Get a style by type and number.
    pub fn get(&self, style_type: StyleType, num: i32) -> Option<&Style> {
        self.styles.get(&(style_type, num))
    }

    /// Name of the parent of `style`, if the chain above it terminates.
    fn based_on_name(&self, style: &Style) -> Option<String> {
        let parent_num = style.based_on?;
        let parent = self.get(style.style_type, parent_num)?;
        let mut cursor = parent;
        for _ in 0..=self.styles.len() {
            match cursor.based_on.and_then(|n| self.get(style.style_type, n)) {
                Some(next) => cursor = next,
                None => return Some(parent.name.clone()),
            }
        }
        // cycle: leave the number
        Some(parent_num.to_string())
    }

    fn finish(&mut self, mut style: Style) {
        style.name = style.name.trim().to_string();
        if style.name.is_empty() && style.attrs.is_empty() && style.based_on.is_none() {
            return;
        }
        self.styles.insert((style.style_type, style.num), style);
    }
}

impl TableResolver for StyleSheet {
    fn kind(&self) -> TableKind {
        TableKind::Style
    }

    fn collect(&mut self, lines: &[String]) {
        let table_close = lines
            .first()
            .filter(|l| ir::is_open_bracket(l))
            .map(|l| ir::close_bracket(ir::bracket_number(l)));
        let mut current: Option<Style> = None;
        let mut entry_close: Option<String> = None;

        for line in lines.iter().skip(1) {
            if Some(line) == table_close.as_ref() {
                break;
            }
            if ir::is_open_bracket(line) && entry_close.is_none() {
                entry_close = Some(ir::close_bracket(ir::bracket_number(line)));
                current = Some(Style::default());
                continue;
            }
            if Some(line) == entry_close.as_ref() {
                entry_close = None;
                if let Some(style) = current.take() {
                    self.finish(style);
                }
                continue;
            }
            let style = current.get_or_insert_with(Style::default);
            if let Some(text) = text_value(line) {
                match text.split_once(';') {
                    Some((head, _)) => {
                        style.name.push_str(head);
                        if entry_close.is_none()
                            && let Some(style) = current.take()
                        {
                            self.finish(style);
                        }
                    },
                    None => style.name.push_str(text),
                }
                continue;
            }
            if !ir::is_control(line) {
                continue;
            }
            let value = ir::cw_value(line);
            match (ir::category(line), ir::cw_name(line)) {
                ("ss", "para-style") => {
                    style.style_type = StyleType::Paragraph;
                    style.num = value.parse().unwrap_or(0);
                },
                ("ss", "char-style") => {
                    style.style_type = StyleType::Character;
                    style.num = value.parse().unwrap_or(0);
                },
                ("ss", "sect-style") => {
                    style.style_type = StyleType::Section;
                    style.num = value.parse().unwrap_or(0);
                },
                ("ss", "tabl-style") => {
                    style.style_type = StyleType::Table;
                    style.num = value.parse().unwrap_or(0);
                },
                ("ss", "based-on__") => style.based_on = value.parse().ok(),
                ("ss", "next-style") => style.next_style = value.parse().ok(),
                ("pf" | "ci" | "ls", name) if name != "par-def___" && name != "plain_____" => {
                    style.attrs.push((attribute_name(name), value.to_string()));
                },
                _ => {},
            }
        }
    }

    fn table_lines(&self) -> Vec<String> {
        self.styles
            .values()
            .filter(|style| matches!(style.style_type, StyleType::Paragraph | StyleType::Character))
            .map(|style| {
                let mut attrs = vec![
                    ("num".to_string(), style.num.to_string()),
                    ("name".to_string(), style.name.clone()),
                ];
                if let Some(parent) = self.based_on_name(style) {
                    attrs.push(("based-on-style".to_string(), parent));
                }
                if let Some(next) = style
                    .next_style
                    .and_then(|n| self.get(style.style_type, n))
                {
                    attrs.push(("next-style".to_string(), next.name.clone()));
                }
                attrs.extend(style.attrs.iter().cloned());
                ir::empty_tag_with(style.style_type.element(), &attrs)
            })
            .collect()
    }

    fn rewrite(&self, line: &str, diag: &mut Diagnostics) -> Option<String> {
        let style_type = if line.starts_with("cw<ss<para-style") {
            StyleType::Paragraph
        } else if line.starts_with("cw<ss<char-style") {
            StyleType::Character
        } else {
            return None;
        };
        let name = match reference(line).and_then(|num| self.get(style_type, num)) {
            Some(style) => style.name.as_str(),
            None => {
                diag.degrade(&format!("style {} not defined", ir::cw_value(line)));
                NOT_DEFINED
            },
        };
        Some(with_value(line, name))
    }
}
