//! Font table.

use super::{NOT_DEFINED, TableResolver, reference, text_value, with_value};
use crate::rtf::diagnostics::Diagnostics;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;
use std::collections::BTreeMap;

/// Font definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Font {
    /// Font name
    pub name: String,
    /// Font family category (`roman`, `swiss`, …)
    pub family: Option<String>,
    /// Character set (Windows charset id)
    pub charset: Option<String>,
}

/// Font table keyed by `\fN` number.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: BTreeMap<i32, Font>,
}

impl FontTable {
    /// Get a font by number.
    #[inline]
    pub fn get(&self, num: i32) -> Option<&Font> {
        self.fonts.get(&num)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl TableResolver for FontTable {
    fn kind(&self) -> TableKind {
        TableKind::Font
    }

    fn collect(&mut self, lines: &[String]) {
        let mut current: Option<(i32, Font)> = None;
        for line in lines {
            if line.starts_with("cw<ci<font-style") {
                if let Some((num, font)) = current.take() {
                    self.fonts.insert(num, font);
                }
                current = reference(line).map(|num| (num, Font::default()));
                continue;
            }
            let Some((num, font)) = current.as_mut() else {
                continue;
            };
            if line.starts_with("cw<ri<font-famly") {
                font.family = Some(ir::cw_value(line).to_string());
            } else if line.starts_with("cw<ri<font-chrst") {
                font.charset = Some(ir::cw_value(line).to_string());
            } else if let Some(text) = text_value(line) {
                match text.split_once(';') {
                    Some((head, _)) => {
                        font.name.push_str(head);
                        let num = *num;
                        if let Some((_, mut font)) = current.take() {
                            font.name = font.name.trim().to_string();
                            self.fonts.insert(num, font);
                        }
                    },
                    None => font.name.push_str(text),
                }
            }
        }
        if let Some((num, mut font)) = current {
            font.name = font.name.trim().to_string();
            self.fonts.insert(num, font);
        }
    }

    fn table_lines(&self) -> Vec<String> {
        self.fonts
            .iter()
            .map(|(num, font)| {
                ir::empty_tag_with(
                    "font-in-table",
                    &[("num", num.to_string()), ("name", font.name.clone())],
                )
            })
            .collect()
    }

    fn rewrite(&self, line: &str, diag: &mut Diagnostics) -> Option<String> {
        if !line.starts_with("cw<ci<font-style") {
            return None;
        }
        let name = match reference(line).and_then(|num| self.get(num)) {
            Some(font) => font.name.as_str(),
            None => {
                diag.degrade(&format!("font {} not defined", ir::cw_value(line)));
                NOT_DEFINED
            },
        };
        Some(with_value(line, name))
    }
}
