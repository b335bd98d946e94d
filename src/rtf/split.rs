//! Footnote and header/footer hoisting.
//!
//! Notes and headers are written inline in RTF but must not be interleaved
//! with the paragraphs around them while the structural passes run. The
//! [`Split`] pass moves every such group to a side area after the document
//! and leaves a numbered indirection marker behind; [`Rejoin`] puts the
//! (by then fully tagged) content back in place of the marker.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit, matching_close, read_all};
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Which kind of group is hoisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitKind {
    Footnote,
    Header,
}

impl SplitKind {
    fn reference(&self) -> &'static str {
        match self {
            SplitKind::Footnote => mk::FOOTNOTE_REF,
            SplitKind::Header => mk::HEADER_REF,
        }
    }

    fn open(&self) -> &'static str {
        match self {
            SplitKind::Footnote => mk::FOOTNOTE_OPEN,
            SplitKind::Header => mk::HEADER_OPEN,
        }
    }

    fn close(&self) -> &'static str {
        match self {
            SplitKind::Footnote => mk::FOOTNOTE_CLOSE,
            SplitKind::Header => mk::HEADER_CLOSE,
        }
    }

    fn area_begin(&self) -> &'static str {
        match self {
            SplitKind::Footnote => mk::FOOTNOTE_AREA_BEGIN,
            SplitKind::Header => mk::HEADER_AREA_BEGIN,
        }
    }

    fn area_end(&self) -> &'static str {
        match self {
            SplitKind::Footnote => mk::FOOTNOTE_AREA_END,
            SplitKind::Header => mk::HEADER_AREA_END,
        }
    }

    fn element(&self) -> &'static str {
        match self {
            SplitKind::Footnote => "footnote",
            SplitKind::Header => "header-or-footer",
        }
    }

    /// Type of the group introduced by control word `line`, if it is one of ours.
    fn group_type(&self, line: &str) -> Option<&'static str> {
        match self {
            SplitKind::Footnote if line.starts_with("cw<nt<footnote__") => Some("footnote"),
            SplitKind::Header if ir::category(line) == "hf" => Some(match ir::cw_name(line) {
                "header-l__" => "header-left",
                "header-r__" => "header-right",
                "header-f__" => "header-first",
                "footer____" => "footer",
                "footer-l__" => "footer-left",
                "footer-r__" => "footer-right",
                "footer-f__" => "footer-first",
                _ => "header",
            }),
            _ => None,
        }
    }
}

/// Moves note or header groups to the end of the stream.
#[derive(Debug)]
pub struct Split {
    kind: SplitKind,
    count: usize,
    side: Vec<String>,
}

impl Split {
    pub fn new(kind: SplitKind) -> Self {
        Self {
            kind,
            count: 0,
            side: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Pass for Split {
    fn name(&self) -> &'static str {
        match self.kind {
            SplitKind::Footnote => "footnote_split",
            SplitKind::Header => "header_split",
        }
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
            let group_type = if ir::is_open_bracket(line) {
                lines.get(i + 1).and_then(|next| self.kind.group_type(next))
            } else {
                None
            };
            let Some(group_type) = group_type else {
                emit(output, line)?;
                i += 1;
                continue;
            };

            let end =
                matching_close(&lines, i + 1, ir::bracket_number(line)).unwrap_or(lines.len() - 1);
            self.count += 1;
            let num = format!("{:04}", self.count);
            emit(output, &ir::marker_with(self.kind.reference(), &num))?;

            self.side
                .push(format!("{}<{}<{}", self.kind.open(), num, group_type));
            self.side.push(line.clone());
            // the introducing word carries no content of its own
            self.side.extend(lines[i + 2..=end].iter().cloned());
            self.side.push(self.kind.close().to_string());
            i = end + 1;
        }

        if self.count > 0 {
            log::debug!("{}: hoisted {} group(s)", self.name(), self.count);
            emit(output, self.kind.area_begin())?;
            for line in &self.side {
                emit(output, line)?;
            }
            emit(output, self.kind.area_end())?;
        }
        Ok(())
    }
}

/// A hoisted block collected from the side area.
#[derive(Debug, Default)]
struct Block {
    group_type: String,
    lines: Vec<String>,
}

/// Puts hoisted groups back in place of their reference markers.
#[derive(Debug)]
pub struct Rejoin {
    kind: SplitKind,
}

impl Rejoin {
    pub fn new(kind: SplitKind) -> Self {
        Self { kind }
    }

    /// Remove the side area from `lines`, returning the blocks by number.
    fn collect(&self, lines: &mut Vec<String>) -> HashMap<String, Block> {
        let mut blocks = HashMap::new();
        let Some(begin) = lines.iter().position(|l| l == self.kind.area_begin()) else {
            return blocks;
        };
        let end = lines[begin..]
            .iter()
            .position(|l| l == self.kind.area_end())
            .map_or(lines.len(), |offset| begin + offset + 1);
        let area: Vec<String> = lines.drain(begin..end).collect();

        let open = format!("{}<", self.kind.open());
        let mut current: Option<(String, Block)> = None;
        for line in area {
            if let Some(rest) = line.strip_prefix(&open) {
                let (num, group_type) = rest.split_once('<').unwrap_or((rest, ""));
                current = Some((
                    num.to_string(),
                    Block {
                        group_type: group_type.to_string(),
                        lines: Vec::new(),
                    },
                ));
            } else if line == self.kind.close() {
                if let Some((num, block)) = current.take() {
                    blocks.insert(num, block);
                }
            } else if let Some((_, block)) = current.as_mut() {
                block.lines.push(line);
            }
        }
        blocks
    }
}

impl Pass for Rejoin {
    fn name(&self) -> &'static str {
        match self.kind {
            SplitKind::Footnote => "footnote_rejoin",
            SplitKind::Header => "header_rejoin",
        }
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut lines = read_all(input)?;
        let mut blocks = self.collect(&mut lines);
        let reference = format!("{}<", self.kind.reference());

        for line in &lines {
            let Some(num) = line.strip_prefix(&reference) else {
                emit(output, line)?;
                continue;
            };
            let Some(block) = blocks.remove(num) else {
                diag.report(3, &format!("no hoisted block for {}", line), None)?;
                continue;
            };
            let attrs = match self.kind {
                SplitKind::Footnote => vec![("num", num.trim_start_matches('0').to_string())],
                SplitKind::Header => vec![("type", block.group_type.clone())],
            };
            emit(output, &ir::open_tag_with(self.kind.element(), &attrs))?;
            for inner in &block.lines {
                emit(output, inner)?;
            }
            emit(output, &ir::close_tag(self.kind.element()))?;
        }

        if !blocks.is_empty() {
            log::warn!("{}: {} block(s) had no reference", self.name(), blocks.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn document() -> String {
        stream(&[
            "ob<nu<open-brack<0001",
            "tx<nu<__________<See",
            "ob<nu<open-brack<0002",
            "cw<nt<footnote__<nu<true",
            "tx<nu<__________<a note",
            "cb<nu<clos-brack<0002",
            "tx<nu<__________<here",
            "cb<nu<clos-brack<0001",
        ])
    }

    #[test]
    fn test_footnote_hoisted_to_end() {
        let mut pass = Split::new(SplitKind::Footnote);
        let out = run_on(&mut pass, &document());
        assert_eq!(pass.count(), 1);
        assert_eq!(
            out,
            stream(&[
                "ob<nu<open-brack<0001",
                "tx<nu<__________<See",
                "mi<mk<footnt-ind<0001",
                "tx<nu<__________<here",
                "cb<nu<clos-brack<0001",
                "mi<mk<footnt-beg",
                "mi<mk<footnt-ope<0001<footnote",
                "ob<nu<open-brack<0002",
                "tx<nu<__________<a note",
                "cb<nu<clos-brack<0002",
                "mi<mk<footnt-clo",
                "mi<mk<footnt-end",
            ])
        );
    }

    #[test]
    fn test_rejoin_replaces_reference() {
        let split = run_on(&mut Split::new(SplitKind::Footnote), &document());
        let out = run_on(&mut Rejoin::new(SplitKind::Footnote), &split);
        assert_eq!(
            out,
            stream(&[
                "ob<nu<open-brack<0001",
                "tx<nu<__________<See",
                "mi<tg<open-att__<footnote<num>1",
                "ob<nu<open-brack<0002",
                "tx<nu<__________<a note",
                "cb<nu<clos-brack<0002",
                "mi<tg<close_____<footnote",
                "tx<nu<__________<here",
                "cb<nu<clos-brack<0001",
            ])
        );
        assert!(!out.contains("footnt-"));
    }

    #[test]
    fn test_header_type_survives() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "ob<nu<open-brack<0002",
            "cw<hf<footer-l__<nu<true",
            "tx<nu<__________<page",
            "cb<nu<clos-brack<0002",
            "cb<nu<clos-brack<0001",
        ]);
        let split = run_on(&mut Split::new(SplitKind::Header), &input);
        assert!(split.contains("mi<mk<header-ind<0001\n"));
        assert!(split.contains("mi<mk<header-ope<0001<footer-left\n"));
        let out = run_on(&mut Rejoin::new(SplitKind::Header), &split);
        assert!(out.contains("mi<tg<open-att__<header-or-footer<type>footer-left\n"));
    }

    #[test]
    fn test_no_groups_leaves_stream_alone() {
        let input = stream(&["ob<nu<open-brack<0001", "cb<nu<clos-brack<0001"]);
        let out = run_on(&mut Split::new(SplitKind::Header), &input);
        assert_eq!(out, input);
    }
}
