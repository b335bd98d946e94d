//! List override table (`{\*\listoverridetable …}`).

use super::TableResolver;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;

/// List override entry (instance of a list)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOverride {
    /// Original list ID this overrides
    pub list_id: Option<String>,
    /// The `\lsN` number paragraphs use
    pub ls_number: Option<String>,
}

/// List override table containing list instances
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    overrides: Vec<ListOverride>,
}

impl OverrideTable {
    /// List id behind an `\lsN` number.
    pub fn list_id(&self, ls_number: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|o| o.ls_number.as_deref() == Some(ls_number))
            .and_then(|o| o.list_id.as_deref())
    }
}

impl TableResolver for OverrideTable {
    fn kind(&self) -> TableKind {
        TableKind::Override
    }

    fn collect(&mut self, lines: &[String]) {
        for line in lines.iter().filter(|l| ir::is_control(l)) {
            if line.starts_with("cw<ls<lis-overid") {
                self.overrides.push(ListOverride::default());
                continue;
            }
            let Some(entry) = self.overrides.last_mut() else {
                continue;
            };
            let value = ir::cw_value(line).to_string();
            match ir::cw_name(line) {
                "lis-tbl-id" => entry.list_id = Some(value),
                "list-id___" => entry.ls_number = Some(value),
                _ => {},
            }
        }
    }

    fn table_lines(&self) -> Vec<String> {
        self.overrides
            .iter()
            .map(|entry| {
                let mut attrs = Vec::new();
                if let Some(id) = &entry.list_id {
                    attrs.push(("list-id", id.as_str()));
                }
                if let Some(ls) = &entry.ls_number {
                    attrs.push(("ls-number", ls.as_str()));
                }
                ir::empty_tag_with("override-list", &attrs)
            })
            .collect()
    }
}
