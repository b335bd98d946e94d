//! List table (`{\*\listtable …}`).
//!
//! RTF numbering uses two tables: this one defines lists and their levels,
//! the override table maps the `\lsN` numbers paragraphs refer to onto
//! list ids.

use super::TableResolver;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;

/// A single level in a list (for multi-level lists)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLevel {
    /// Level number (0-8, where 0 is the top level)
    pub level: usize,
    /// Numbering type name (`bullet`, `arabic`, …)
    pub numbering_type: Option<String>,
    /// Start value for numbering
    pub start_at: Option<String>,
    /// Left indent of items at this level (points)
    pub left_indent: Option<String>,
    /// First-line indent (points)
    pub first_line_indent: Option<String>,
}

impl ListLevel {
    /// Check if this level is a bullet
    #[inline]
    pub fn is_bullet(&self) -> bool {
        self.numbering_type.as_deref() == Some("bullet")
    }
}

/// RTF list definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    /// Unique list identifier
    pub id: Option<String>,
    /// List template ID
    pub template_id: Option<String>,
    /// List levels (up to 9 levels)
    pub levels: Vec<ListLevel>,
}

/// List table containing all list definitions
#[derive(Debug, Clone, Default)]
pub struct ListTable {
    lists: Vec<List>,
}

impl ListTable {
    /// Get a list by ID
    pub fn get(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id.as_deref() == Some(id))
    }

    /// Get all lists
    #[inline]
    pub fn lists(&self) -> &[List] {
        &self.lists
    }
}

impl TableResolver for ListTable {
    fn kind(&self) -> TableKind {
        TableKind::List
    }

    fn collect(&mut self, lines: &[String]) {
        for line in lines.iter().filter(|l| ir::is_control(l)) {
            let value = ir::cw_value(line).to_string();
            if line.starts_with("cw<ls<list______") {
                self.lists.push(List::default());
                continue;
            }
            let Some(list) = self.lists.last_mut() else {
                continue;
            };
            if line.starts_with("cw<ls<list-level") {
                let level = list.levels.len();
                list.levels.push(ListLevel {
                    level,
                    ..ListLevel::default()
                });
                continue;
            }
            match ir::cw_name(line) {
                "lis-tbl-id" => list.id = Some(value),
                "lis-tem-id" => list.template_id = Some(value),
                name => {
                    let Some(level) = list.levels.last_mut() else {
                        continue;
                    };
                    match name {
                        "numb-type_" => level.numbering_type = Some(value),
                        "level-star" => level.start_at = Some(value),
                        "left-inden" => level.left_indent = Some(value),
                        "first-line" => level.first_line_indent = Some(value),
                        _ => {},
                    }
                },
            }
        }
    }

    fn table_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for list in &self.lists {
            let mut attrs = Vec::new();
            if let Some(id) = &list.id {
                attrs.push(("list-id", id.clone()));
            }
            if let Some(template) = &list.template_id {
                attrs.push(("list-template-id", template.clone()));
            }
            out.push(ir::open_tag_with("list-in-table", &attrs));
            for level in &list.levels {
                let mut attrs = vec![("level", level.level.to_string())];
                let optional = [
                    ("numbering-type", &level.numbering_type),
                    ("start", &level.start_at),
                    ("left-indent", &level.left_indent),
                    ("first-line-indent", &level.first_line_indent),
                ];
                for (key, value) in optional {
                    if let Some(value) = value {
                        attrs.push((key, value.clone()));
                    }
                }
                out.push(ir::empty_tag_with("level-in-table", &attrs));
            }
            out.push(ir::close_tag("list-in-table"));
        }
        out
    }
}
