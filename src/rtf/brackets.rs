//! Brace numbering and balance checking.
//!
//! Every `ob` line gets the depth it opens and its matching `cb` the same
//! number, so later passes can tell which close ends the group they track.

use super::diagnostics::Diagnostics;
use super::error::{RtfError, RtfResult};
use super::ir;
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Numbers (or re-numbers) braces by depth.
#[derive(Debug, Default)]
pub struct Brackets;

impl Pass for Brackets {
    fn name(&self) -> &'static str {
        "brackets"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut depth = 0usize;
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if ir::is_open_bracket(&line) {
                depth += 1;
                emit(output, &ir::open_bracket(depth))?;
            } else if ir::is_close_bracket(&line) {
                if depth == 0 {
                    return Err(RtfError::invalid_rtf_at("unmatched closing brace", index + 1));
                }
                emit(output, &ir::close_bracket(depth))?;
                depth -= 1;
            } else {
                emit(output, &line)?;
            }
        }
        if depth != 0 {
            return Err(RtfError::invalid_rtf(format!(
                "{} unclosed brace(s) at end of file",
                depth
            )));
        }
        Ok(())
    }
}

/// Verify that every `ob` is closed by a `cb` carrying the same number.
///
/// Returns the 1-based line of the first offending brace.
pub fn check(lines: impl Iterator<Item = String>) -> Result<(), usize> {
    let mut stack: Vec<usize> = Vec::new();
    let mut count = 0;
    for (index, line) in lines.enumerate() {
        count = index + 1;
        if ir::is_open_bracket(&line) {
            stack.push(ir::bracket_number(&line));
        } else if ir::is_close_bracket(&line) {
            match stack.pop() {
                Some(open) if open == ir::bracket_number(&line) => {},
                _ => return Err(index + 1),
            }
        }
    }
    if stack.is_empty() { Ok(()) } else { Err(count) }
}
