//! The transform pass abstraction.
//!
//! Every stage of the pipeline reads the previous stage's IR stream and
//! writes a new one. Passes keep their state in `self` and never hold on to
//! anything between invocations.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use std::io::{BufRead, Write};

/// A single stream-to-stream transform.
pub trait Pass {
    /// Name used for debug snapshots and log messages.
    fn name(&self) -> &'static str;

    /// Transform `input` into `output`.
    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        diag: &mut Diagnostics,
    ) -> RtfResult<()>;
}

/// Write one IR line.
#[inline]
pub(crate) fn emit(output: &mut dyn Write, line: &str) -> RtfResult<()> {
    output.write_all(line.as_bytes())?;
    output.write_all(b"\n")?;
    Ok(())
}

/// Read every line of an IR stream into memory (for passes that look ahead).
pub(crate) fn read_all(input: &mut dyn BufRead) -> RtfResult<Vec<String>> {
    let mut lines = Vec::new();
    for line in input.lines() {
        lines.push(line?);
    }
    Ok(lines)
}

/// Index of the `cb` closing the group opened by `ob` number `num`, searching from `from`.
pub(crate) fn matching_close(lines: &[String], from: usize, num: usize) -> Option<usize> {
    let close = ir::close_bracket(num);
    lines[from.min(lines.len())..]
        .iter()
        .position(|line| *line == close)
        .map(|offset| from + offset)
}

/// Run a pass over an in-memory IR string.
#[cfg(test)]
pub(crate) fn run_on(pass: &mut dyn Pass, input: &str) -> String {
    let mut diag = Diagnostics::default();
    run_with(pass, input, &mut diag).expect("pass failed")
}

/// Run a pass over an in-memory IR string with explicit diagnostics.
#[cfg(test)]
pub(crate) fn run_with(
    pass: &mut dyn Pass,
    input: &str,
    diag: &mut Diagnostics,
) -> RtfResult<String> {
    let mut reader = input.as_bytes();
    let mut out = Vec::new();
    pass.run(&mut reader, &mut out, diag)?;
    Ok(String::from_utf8(out).expect("IR is UTF-8"))
}

/// Join IR lines into a stream, one line each.
#[cfg(test)]
pub(crate) fn stream(lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
