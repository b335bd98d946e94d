//! Preamble table resolvers.
//!
//! Each table the preamble divider marked off is parsed by one resolver,
//! replaced with readable `*-in-table` tags, and then used to rewrite the
//! numeric references that follow it (`\f2` becomes `font-style=Arial`,
//! `\cf1` becomes `font-color=#ff0000`, …). Misses degrade to `not-defined`.

mod colors;
mod fonts;
mod info;
mod list_table;
mod overrides;
mod revisions;
mod stylesheet;

pub use colors::ColorTable;
pub use fonts::FontTable;
pub use info::DocInfo;
pub use list_table::ListTable;
pub use overrides::OverrideTable;
pub use revisions::RevisionTable;
pub use stylesheet::StyleSheet;

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use super::pass::{Pass, emit};
use super::preamble::TableKind;
use std::io::{BufRead, Write};

/// Name given to references that resolve to nothing.
pub const NOT_DEFINED: &str = "not-defined";

/// One preamble table: how to read it, show it and apply it.
pub trait TableResolver {
    /// Which table this resolver reads.
    fn kind(&self) -> TableKind;

    /// Parse the table's IR lines (without the begin/end markers and tags).
    fn collect(&mut self, lines: &[String]);

    /// Tag lines that replace the table's content.
    fn table_lines(&self) -> Vec<String>;

    /// Rewrite a line that follows the table; `None` keeps it unchanged.
    fn rewrite(&self, _line: &str, _diag: &mut Diagnostics) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeTable,
    InTable,
    AfterTable,
}

/// Runs one [`TableResolver`] over the stream.
#[derive(Debug)]
pub struct Resolve<T> {
    resolver: T,
    name: &'static str,
    state: State,
    table: Vec<String>,
}

impl<T: TableResolver> Resolve<T> {
    pub fn new(name: &'static str, resolver: T) -> Self {
        Self {
            resolver,
            name,
            state: State::BeforeTable,
            table: Vec::new(),
        }
    }

    pub fn resolver(&self) -> &T {
        &self.resolver
    }
}

impl<T: TableResolver> Pass for Resolve<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let kind = self.resolver.kind();
        let open = ir::open_tag(kind.element());
        let close = ir::close_tag(kind.element());
        for line in input.lines() {
            let line = line?;
            match self.state {
                State::BeforeTable => {
                    if line == kind.begin() {
                        self.state = State::InTable;
                    }
                    emit(output, &line)?;
                },
                State::InTable => {
                    if line == kind.end() {
                        self.resolver.collect(&self.table);
                        emit(output, &open)?;
                        for tag in self.resolver.table_lines() {
                            emit(output, &tag)?;
                        }
                        emit(output, &close)?;
                        emit(output, &line)?;
                        self.state = State::AfterTable;
                    } else if line != open && line != close {
                        self.table.push(line);
                    }
                },
                State::AfterTable => match self.resolver.rewrite(&line, diag) {
                    Some(rewritten) => emit(output, &rewritten)?,
                    None => emit(output, &line)?,
                },
            }
        }
        if self.state == State::InTable {
            log::warn!("{}: table never closed", self.name);
        }
        Ok(())
    }
}

/// Character data carried by a text line, as stored in the IR.
pub(crate) fn text_value(line: &str) -> Option<&str> {
    if line.starts_with("tx<nu<") || line.starts_with("tx<ut<") {
        Some(ir::value(line))
    } else {
        None
    }
}

/// Replace the value of a control-word line.
pub(crate) fn with_value(line: &str, value: &str) -> String {
    format!("{}<nu<{}", ir::prefix(line), value)
}

/// Parse the number of a reference line (`cw<ci<font-style<nu<3`).
pub(crate) fn reference(line: &str) -> Option<i32> {
    ir::cw_value(line).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    #[test]
    fn test_table_replaced_and_references_rewritten() {
        let input = stream(&[
            "mi<mk<fonttb-beg",
            "mi<tg<open______<font-table",
            "ob<nu<open-brack<0002",
            "cw<ri<font-table<nu<true",
            "ob<nu<open-brack<0003",
            "cw<ci<font-style<nu<0",
            "tx<nu<__________<Times;",
            "cb<nu<clos-brack<0003",
            "cb<nu<clos-brack<0002",
            "mi<tg<close_____<font-table",
            "mi<mk<fonttb-end",
            "cw<ci<font-style<nu<0",
            "cw<ci<font-style<nu<7",
        ]);
        let out = run_on(&mut Resolve::new("fonts", FontTable::default()), &input);
        assert_eq!(
            out,
            stream(&[
                "mi<mk<fonttb-beg",
                "mi<tg<open______<font-table",
                "mi<tg<empty-att_<font-in-table<num>0<name>Times",
                "mi<tg<close_____<font-table",
                "mi<mk<fonttb-end",
                "cw<ci<font-style<nu<Times",
                "cw<ci<font-style<nu<not-defined",
            ])
        );
    }
}
