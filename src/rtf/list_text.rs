//! List-text marking.
//!
//! Word writes the visible number or bullet of a list item as a
//! `{\listtext …}` (or older `{\pntext …}`) group in front of the item's
//! text. The group is bracketed with `lst-tx-beg`/`lst-tx-end` markers so the
//! paragraph and inline passes can recognize it.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit, matching_close, read_all};
use std::io::{BufRead, Write};

#[derive(Debug, Default)]
pub struct ListText {
    count: usize,
}

impl ListText {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pass for ListText {
    fn name(&self) -> &'static str {
        "list_text"
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
            let is_list_text = ir::is_open_bracket(line)
                && lines
                    .get(i + 1)
                    .is_some_and(|next| next.starts_with("cw<ls<list-text_"));
            if !is_list_text {
                emit(output, line)?;
                i += 1;
                continue;
            }

            let end =
                matching_close(&lines, i + 1, ir::bracket_number(line)).unwrap_or(lines.len() - 1);
            self.count += 1;
            emit(output, mk::LIST_TEXT_BEGIN)?;
            emit(output, line)?;
            for inner in &lines[i + 2..end] {
                if !inner.starts_with("cw<pf<par-def___") {
                    emit(output, inner)?;
                }
            }
            if end > i + 1 {
                emit(output, &lines[end])?;
            }
            emit(output, mk::LIST_TEXT_END)?;
            i = end + 1;
        }
        log::debug!("list_text: {} group(s)", self.count);
        Ok(())
    }
}
