//! Preamble division.
//!
//! Everything between `{\rtf1` and the first piece of body content is the
//! preamble: the document header words, the font/color/style/list/override/
//! revision tables, the info group and the page setup. This pass sorts it
//! into marked blocks inside `<preamble>`, synthesizes the tables a document
//! left out, and wraps the rest in `<body>`:
//!
//! ```text
//! <doc> ob <preamble> rtfhed… tables… page-definition headers-and-footers </preamble>
//! <body> body-open … body-close </body> cb [side areas] </doc>
//! ```

use super::control_words::attribute_name;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Tables recognized in the preamble, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Font,
    Color,
    Style,
    List,
    Override,
    Revision,
    Info,
}

impl TableKind {
    pub const ALL: [TableKind; 7] = [
        TableKind::Font,
        TableKind::Color,
        TableKind::Style,
        TableKind::List,
        TableKind::Override,
        TableKind::Revision,
        TableKind::Info,
    ];

    /// Table introduced by the first word of a group.
    fn from_opener(line: &str) -> Option<Self> {
        if !ir::is_control(line) {
            return None;
        }
        Some(match ir::cw_name(line) {
            "font-table" => TableKind::Font,
            "colr-table" => TableKind::Color,
            "style-shet" => TableKind::Style,
            "listtable_" => TableKind::List,
            "lovr-table" => TableKind::Override,
            "revi-table" => TableKind::Revision,
            "doc-info__" => TableKind::Info,
            _ => return None,
        })
    }

    pub fn begin(&self) -> &'static str {
        match self {
            TableKind::Font => mk::FONT_TABLE_BEGIN,
            TableKind::Color => mk::COLOR_TABLE_BEGIN,
            TableKind::Style => mk::STYLE_TABLE_BEGIN,
            TableKind::List => mk::LIST_TABLE_BEGIN,
            TableKind::Override => mk::OVERRIDE_TABLE_BEGIN,
            TableKind::Revision => mk::REVISION_TABLE_BEGIN,
            TableKind::Info => mk::DOC_INFO_BEGIN,
        }
    }

    pub fn end(&self) -> &'static str {
        match self {
            TableKind::Font => mk::FONT_TABLE_END,
            TableKind::Color => mk::COLOR_TABLE_END,
            TableKind::Style => mk::STYLE_TABLE_END,
            TableKind::List => mk::LIST_TABLE_END,
            TableKind::Override => mk::OVERRIDE_TABLE_END,
            TableKind::Revision => mk::REVISION_TABLE_END,
            TableKind::Info => mk::DOC_INFO_END,
        }
    }

    pub fn element(&self) -> &'static str {
        match self {
            TableKind::Font => "font-table",
            TableKind::Color => "color-table",
            TableKind::Style => "style-table",
            TableKind::List => "list-table",
            TableKind::Override => "override-table",
            TableKind::Revision => "revision-table",
            TableKind::Info => "doc-information",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Minimal content for a required table the document omitted.
    fn synthesized(&self) -> Option<Vec<String>> {
        let lines: &[&str] = match self {
            TableKind::Font => &[
                "ob<nu<open-brack<0002",
                "cw<ri<font-table<nu<true",
                "ob<nu<open-brack<0003",
                "cw<ci<font-style<nu<0",
                "tx<nu<__________<Times;",
                "cb<nu<clos-brack<0003",
                "cb<nu<clos-brack<0002",
            ],
            TableKind::Color => &[
                "ob<nu<open-brack<0002",
                "cw<ri<colr-table<nu<true",
                "cb<nu<clos-brack<0002",
            ],
            TableKind::Style => &[
                "ob<nu<open-brack<0002",
                "cw<ss<style-shet<nu<true",
                "ob<nu<open-brack<0003",
                "cw<ss<para-style<nu<0",
                "tx<nu<__________<Normal;",
                "cb<nu<clos-brack<0003",
                "cb<nu<clos-brack<0002",
            ],
            _ => return None,
        };
        Some(lines.iter().map(|l| l.to_string()).collect())
    }
}

/// Categories whose words belong to the body.
const BODY_CATEGORIES: &[&str] = &["pf", "ci", "ss", "tb", "sc", "ls", "fd", "bd", "nt"];

/// Categories of groups that are silently dropped from the preamble.
const IGNORED_GROUP_CATEGORIES: &[&str] = &["ri", "pa", "un", "it", "di"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    BeforeRoot,
    Preamble,
    InTable(TableKind, String),
    Ignore(String),
    Body,
    AfterBody,
}

/// Splits the document into preamble and body.
#[derive(Debug)]
pub struct Preamble {
    state: State,
    root_close: String,
    header: Vec<String>,
    tables: [Option<Vec<String>>; 7],
    page: ir::Attrs,
    headers: Vec<String>,
}

impl Preamble {
    pub fn new() -> Self {
        Self {
            state: State::BeforeRoot,
            root_close: String::new(),
            header: Vec::new(),
            tables: Default::default(),
            page: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Whether `line`, read at the top level of the preamble, starts the body.
    fn starts_body(line: &str, next: Option<&str>) -> bool {
        if ir::is_text(line) {
            return true;
        }
        if ir::is_marker(line) {
            return !line.starts_with(mk::HEADER_REF);
        }
        if ir::is_control(line) {
            return BODY_CATEGORIES.contains(&ir::category(line));
        }
        if ir::is_open_bracket(line) {
            let next = next.unwrap_or("");
            return TableKind::from_opener(next).is_none()
                && !(ir::is_control(next) && IGNORED_GROUP_CATEGORIES.contains(&ir::category(next)));
        }
        false
    }

    fn write_preamble(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        emit(output, mk::RTF_HEADER_BEGIN)?;
        for line in &self.header {
            emit(output, line)?;
        }
        emit(output, mk::RTF_HEADER_END)?;

        for kind in TableKind::ALL {
            let lines = match self.tables[kind.index()].take() {
                Some(lines) => lines,
                None => match kind.synthesized() {
                    Some(lines) => {
                        log::debug!("preamble: synthesizing {}", kind.element());
                        lines
                    },
                    None => continue,
                },
            };
            emit(output, kind.begin())?;
            emit(output, &ir::open_tag(kind.element()))?;
            for line in &lines {
                emit(output, line)?;
            }
            emit(output, &ir::close_tag(kind.element()))?;
            emit(output, kind.end())?;
        }

        emit(output, &ir::empty_tag_with("page-definition", &self.page))?;
        if !self.headers.is_empty() {
            emit(output, &ir::open_tag("headers-and-footers"))?;
            for line in &self.headers {
                emit(output, line)?;
            }
            emit(output, &ir::close_tag("headers-and-footers"))?;
        }
        emit(output, &ir::close_tag("preamble"))?;
        emit(output, &ir::open_tag("body"))?;
        emit(output, mk::BODY_OPEN)?;
        self.state = State::Body;
        Ok(())
    }

    fn close_body(&mut self, output: &mut dyn Write, line: &str) -> RtfResult<()> {
        emit(output, mk::BODY_CLOSE)?;
        emit(output, &ir::close_tag("body"))?;
        emit(output, line)?;
        self.state = State::AfterBody;
        Ok(())
    }
}

impl Default for Preamble {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Preamble {
    fn name(&self) -> &'static str {
        "preamble"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut lines = input.lines().peekable();
        while let Some(line) = lines.next() {
            let line = line?;
            let next = match lines.peek() {
                Some(Ok(next)) => Some(next.as_str()),
                _ => None,
            };

            match self.state.clone() {
                State::BeforeRoot => {
                    emit(output, &ir::open_tag("doc"))?;
                    emit(output, &line)?;
                    emit(output, &ir::open_tag("preamble"))?;
                    self.root_close = ir::close_bracket(ir::bracket_number(&line));
                    self.state = State::Preamble;
                },
                State::Preamble => {
                    if line == self.root_close {
                        self.write_preamble(output)?;
                        self.close_body(output, &line)?;
                    } else if ir::is_open_bracket(&line)
                        && let Some(kind) = next.and_then(TableKind::from_opener)
                    {
                        let close = ir::close_bracket(ir::bracket_number(&line));
                        self.tables[kind.index()] = Some(vec![line]);
                        self.state = State::InTable(kind, close);
                    } else if Self::starts_body(&line, next) {
                        self.write_preamble(output)?;
                        emit(output, &line)?;
                    } else if ir::is_open_bracket(&line) {
                        self.state = State::Ignore(ir::close_bracket(ir::bracket_number(&line)));
                    } else if line.starts_with(mk::HEADER_REF) {
                        self.headers.push(line);
                    } else if ir::is_control(&line) && ir::category(&line) == "pa" {
                        self.page
                            .push((attribute_name(ir::cw_name(&line)), ir::cw_value(&line).to_string()));
                    } else {
                        self.header.push(line);
                    }
                },
                State::InTable(kind, close) => {
                    let done = line == close;
                    if let Some(table) = self.tables[kind.index()].as_mut() {
                        table.push(line);
                    }
                    if done {
                        self.state = State::Preamble;
                    }
                },
                State::Ignore(close) => {
                    if line == close {
                        self.state = State::Preamble;
                    }
                },
                State::Body => {
                    if line == self.root_close {
                        self.close_body(output, &line)?;
                    } else {
                        emit(output, &line)?;
                    }
                },
                State::AfterBody => emit(output, &line)?,
            }
        }
        if self.state != State::BeforeRoot {
            emit(output, &ir::close_tag("doc"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    #[test]
    fn test_minimal_document() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "cw<ri<rtf_______<nu<1",
            "cw<ri<char-set__<nu<ansi",
            "tx<nu<__________<Hello",
            "cw<pf<par-end___<nu<true",
            "cb<nu<clos-brack<0001",
        ]);
        let out = run_on(&mut Preamble::new(), &input);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "mi<tg<open______<doc");
        assert_eq!(lines[1], "ob<nu<open-brack<0001");
        assert_eq!(lines[2], "mi<tg<open______<preamble");
        assert_eq!(lines[3], "mi<mk<rtfhed-beg");
        assert!(out.contains("mi<mk<fonttb-beg\nmi<tg<open______<font-table\n"));
        assert!(out.contains("tx<nu<__________<Times;\n"));
        assert!(out.contains("mi<tg<empty_____<page-definition\n"));
        assert!(out.ends_with(
            "mi<tg<open______<body\nmi<mk<body-open_\ntx<nu<__________<Hello\ncw<pf<par-end___<nu<true\n\
             mi<mk<body-close\nmi<tg<close_____<body\ncb<nu<clos-brack<0001\nmi<tg<close_____<doc\n"
        ));
    }

    #[test]
    fn test_tables_sorted_and_page_captured() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "cw<ri<rtf_______<nu<1",
            "ob<nu<open-brack<0002",
            "cw<ri<colr-table<nu<true",
            "tx<nu<__________<;",
            "cb<nu<clos-brack<0002",
            "ob<nu<open-brack<0002",
            "cw<ri<font-table<nu<true",
            "cw<ci<font-style<nu<0",
            "tx<nu<__________<Arial;",
            "cb<nu<clos-brack<0002",
            "ob<nu<open-brack<0002",
            "cw<un<generator_<nu<generator",
            "tx<nu<__________<Writer;",
            "cb<nu<clos-brack<0002",
            "cw<pa<paper-widt<nu<612.00",
            "cw<pa<margin-lef<nu<90.00",
            "mi<mk<header-ind<0001",
            "cw<pf<par-def___<nu<true",
            "tx<nu<__________<Body",
            "cb<nu<clos-brack<0001",
        ]);
        let out = run_on(&mut Preamble::new(), &input);
        let font = out.find("fonttb-beg").unwrap();
        let color = out.find("colrtb-beg").unwrap();
        assert!(font < color);
        assert!(out.contains("tx<nu<__________<Arial;\n"));
        assert!(!out.contains("Times;"));
        assert!(!out.contains("Writer"));
        assert!(out.contains(
            "mi<tg<empty-att_<page-definition<paper-width>612.00<margin-left>90.00\n"
        ));
        assert!(out.contains(
            "mi<tg<open______<headers-and-footers\nmi<mk<header-ind<0001\nmi<tg<close_____<headers-and-footers\n"
        ));
        assert!(out.contains("mi<tg<open______<body\nmi<mk<body-open_\ncw<pf<par-def___<nu<true\n"));
    }

    #[test]
    fn test_side_areas_follow_body() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "cw<ri<rtf_______<nu<1",
            "tx<nu<__________<x",
            "cb<nu<clos-brack<0001",
            "mi<mk<footnt-beg",
            "mi<mk<footnt-end",
        ]);
        let out = run_on(&mut Preamble::new(), &input);
        assert!(out.ends_with(
            "cb<nu<clos-brack<0001\nmi<mk<footnt-beg\nmi<mk<footnt-end\nmi<tg<close_____<doc\n"
        ));
    }
}
