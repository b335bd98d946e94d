//! Destination-group pruning.
//!
//! `{\*\name …}` groups are only meaningful to readers that know `name`.
//! Known destinations are kept (minus the `\*` line), `\*\list` groups keep
//! their control words but lose their text, everything else is dropped along
//! with a few plain groups that never carry visible content.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use super::pass::{Pass, emit, matching_close, read_all};
use std::io::{BufRead, Write};

/// Starred destinations that survive.
const ALLOWED: &[&str] = &[
    "char-style",
    "listtable_",
    "lovr-table",
    "revi-table",
    "list-level",
    "level-text",
    "level-nums",
    "list-text_",
    "field-inst",
    "shape-pict",
    "company___",
    "bookmk-beg",
    "bookmk-end",
    "doc-info__",
    "annotation",
    "comment___",
];

/// Non-starred groups that only duplicate or annotate content.
const DROPPED_PLAIN: &[&str] = &["non-shpict", "index-mark", "toc-entry_"];

/// Non-starred groups that still count as destinations.
const PLAIN_DESTINATIONS: &[&str] = &[
    "font-table",
    "colr-table",
    "style-shet",
    "doc-info__",
    "listtable_",
    "revi-table",
    "field_____",
    "footnote__",
    "picture___",
    "header____",
    "header-l__",
    "header-r__",
    "header-f__",
    "footer____",
    "footer-l__",
    "footer-r__",
    "footer-f__",
];

const ASTERISK: &str = "cw<ml<asterisk__<nu<true";

/// Prunes unknown destination groups.
#[derive(Debug, Default)]
pub struct Destinations {
    groups_seen: usize,
    dropped: usize,
}

impl Destinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of destination groups found (kept or dropped).
    pub fn groups_seen(&self) -> usize {
        self.groups_seen
    }

    /// Number of groups removed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Skip a group and return the index after its closing brace.
    fn skip_group(&mut self, lines: &[String], start: usize, name: &str) -> usize {
        let num = ir::bracket_number(&lines[start]);
        self.dropped += 1;
        log::debug!("dropping destination group {}", name.trim_end_matches('_'));
        matching_close(lines, start + 1, num).map_or(lines.len(), |end| end + 1)
    }
}

impl Pass for Destinations {
    fn name(&self) -> &'static str {
        "destinations"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if !ir::is_open_bracket(line) {
                emit(output, line)?;
                i += 1;
                continue;
            }

            let next = lines.get(i + 1).map(String::as_str).unwrap_or("");
            if next == ASTERISK {
                self.groups_seen += 1;
                let word = lines.get(i + 2).map(String::as_str).unwrap_or("");
                let name = if ir::is_control(word) { ir::cw_name(word) } else { "" };
                if ALLOWED.contains(&name) {
                    emit(output, line)?;
                    i += 2;
                } else if name == "list______" {
                    let num = ir::bracket_number(line);
                    let end = matching_close(&lines, i + 1, num).unwrap_or(lines.len() - 1);
                    emit(output, line)?;
                    for inner in &lines[i + 2..=end] {
                        if !ir::is_text(inner) {
                            emit(output, inner)?;
                        }
                    }
                    i = end + 1;
                } else {
                    i = self.skip_group(&lines, i, if name.is_empty() { "unnamed" } else { name });
                }
                continue;
            }

            if ir::is_control(next) {
                let name = ir::cw_name(next);
                if DROPPED_PLAIN.contains(&name) {
                    self.groups_seen += 1;
                    i = self.skip_group(&lines, i, name);
                    continue;
                }
                if PLAIN_DESTINATIONS.contains(&name) {
                    self.groups_seen += 1;
                }
            }
            emit(output, line)?;
            i += 1;
        }
        log::debug!(
            "destinations: {} groups, {} dropped",
            self.groups_seen,
            self.dropped
        );
        Ok(())
    }
}
