//! Revision table (`{\*\revtbl {Unknown;}{Author;}}`).

use super::{NOT_DEFINED, TableResolver, reference, text_value, with_value};
use crate::rtf::diagnostics::Diagnostics;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;

/// Revision authors in table order.
#[derive(Debug, Clone, Default)]
pub struct RevisionTable {
    authors: Vec<String>,
}

impl RevisionTable {
    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

impl TableResolver for RevisionTable {
    fn kind(&self) -> TableKind {
        TableKind::Revision
    }

    fn collect(&mut self, lines: &[String]) {
        let mut name = String::new();
        for text in lines.iter().filter_map(|l| text_value(l)) {
            let mut rest = text;
            while let Some((head, tail)) = rest.split_once(';') {
                name.push_str(head);
                self.authors.push(name.trim().to_string());
                name.clear();
                rest = tail;
            }
            name.push_str(rest);
        }
    }

    fn table_lines(&self) -> Vec<String> {
        self.authors
            .iter()
            .enumerate()
            .map(|(num, name)| {
                ir::empty_tag_with("revision", &[("num", num.to_string()), ("name", name.clone())])
            })
            .collect()
    }

    fn rewrite(&self, line: &str, diag: &mut Diagnostics) -> Option<String> {
        if !line.starts_with("cw<ci<rev-author") {
            return None;
        }
        let author = reference(line)
            .and_then(|num| usize::try_from(num).ok())
            .and_then(|num| self.authors.get(num));
        match author {
            Some(name) => Some(with_value(line, name)),
            None => {
                diag.degrade(&format!("revision author {} not defined", ir::cw_value(line)));
                Some(with_value(line, NOT_DEFINED))
            },
        }
    }
}
