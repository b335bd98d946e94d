//! Wraps body-level character formatting in groups.
//!
//! Older writers set character formatting directly in the body
//! (`\b bold\b0 plain`) instead of in `{…}` groups. The inline tagger only
//! scopes formatting by group, so runs of body-level `ci` words are wrapped
//! in synthesized brackets here. The formatting in force is replayed at the
//! start of every synthesized group until `\plain` clears it. Brace numbers
//! are left at zero; the bracket pass renumbers them afterwards.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Words that end a synthesized group.
const GROUP_ENDERS: &[&str] = &[
    "cw<pf<par-end___",
    "cw<pf<par-def___",
    "cw<tb<cell______",
    "cw<tb<row_______",
    "cw<sc<section___",
    "cw<sc<sect-defin",
];

#[derive(Debug, Default)]
pub struct AddBrackets {
    /// Body-level formatting in force, one line per word.
    active: Vec<String>,
    open: bool,
    content_seen: bool,
    wrapped: usize,
}

impl AddBrackets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of synthesized groups.
    pub fn wrapped(&self) -> usize {
        self.wrapped
    }

    fn close(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if self.open {
            emit(output, &ir::close_bracket(0))?;
            self.open = false;
        }
        Ok(())
    }

    fn set(&mut self, line: &str) {
        if line.starts_with("cw<ci<plain_____") {
            self.active.clear();
            return;
        }
        let key = ir::prefix(line).to_string();
        self.active.retain(|l| !l.starts_with(&key));
        self.active.push(line.to_string());
    }
}

impl Pass for AddBrackets {
    fn name(&self) -> &'static str {
        "add_brackets"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut in_body = false;
        let mut depth = 0usize;
        let mut base = 0usize;

        for line in input.lines() {
            let line = line?;
            if !in_body {
                if ir::is_open_bracket(&line) {
                    depth += 1;
                } else if ir::is_close_bracket(&line) {
                    depth = depth.saturating_sub(1);
                } else if line == mk::BODY_OPEN {
                    in_body = true;
                    base = depth;
                }
                emit(output, &line)?;
                continue;
            }

            if depth == base {
                if line.starts_with("cw<ci<") {
                    self.set(&line);
                    if self.open && self.content_seen {
                        self.close(output)?;
                    }
                    continue;
                }
                if line == mk::BODY_CLOSE
                    || ir::is_close_bracket(&line)
                    || GROUP_ENDERS.iter().any(|w| line.starts_with(w))
                {
                    self.close(output)?;
                } else if (ir::is_text(&line) || ir::is_open_bracket(&line))
                    && !self.open
                    && !self.active.is_empty()
                {
                    emit(output, &ir::open_bracket(0))?;
                    for word in &self.active {
                        emit(output, word)?;
                    }
                    self.open = true;
                    self.content_seen = false;
                    self.wrapped += 1;
                }
                if self.open && (ir::is_text(&line) || ir::is_open_bracket(&line)) {
                    self.content_seen = true;
                }
            }

            if ir::is_open_bracket(&line) {
                depth += 1;
            } else if ir::is_close_bracket(&line) {
                depth = depth.saturating_sub(1);
            }
            if line == mk::BODY_CLOSE {
                in_body = false;
            }
            emit(output, &line)?;
        }
        self.close(output)?;
        log::debug!("add_brackets: {} groups synthesized", self.wrapped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::brackets::Brackets;
    use crate::rtf::pass::{run_on, stream};

    #[test]
    fn test_body_level_runs_wrapped() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "mi<mk<body-open_",
            "cw<ci<bold______<nu<true",
            "tx<nu<__________<bold ",
            "cw<ci<italic____<nu<true",
            "tx<nu<__________<both",
            "cw<pf<par-end___<nu<true",
            "tx<nu<__________<still",
            "cw<ci<plain_____<nu<true",
            "tx<nu<__________<plain",
            "mi<mk<body-close",
            "cb<nu<clos-brack<0001",
        ]);
        let wrapped = run_on(&mut AddBrackets::new(), &input);
        let renumbered = run_on(&mut Brackets, &wrapped);
        assert_eq!(
            renumbered,
            stream(&[
                "ob<nu<open-brack<0001",
                "mi<mk<body-open_",
                "ob<nu<open-brack<0002",
                "cw<ci<bold______<nu<true",
                "tx<nu<__________<bold ",
                "cb<nu<clos-brack<0002",
                "ob<nu<open-brack<0002",
                "cw<ci<bold______<nu<true",
                "cw<ci<italic____<nu<true",
                "tx<nu<__________<both",
                "cb<nu<clos-brack<0002",
                "cw<pf<par-end___<nu<true",
                "ob<nu<open-brack<0002",
                "cw<ci<bold______<nu<true",
                "cw<ci<italic____<nu<true",
                "tx<nu<__________<still",
                "cb<nu<clos-brack<0002",
                "tx<nu<__________<plain",
                "mi<mk<body-close",
                "cb<nu<clos-brack<0001",
            ])
        );
    }

    #[test]
    fn test_grouped_formatting_untouched() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "mi<mk<body-open_",
            "ob<nu<open-brack<0002",
            "cw<ci<bold______<nu<true",
            "tx<nu<__________<bold",
            "cb<nu<clos-brack<0002",
            "mi<mk<body-close",
            "cb<nu<clos-brack<0001",
        ]);
        let mut pass = AddBrackets::new();
        assert_eq!(run_on(&mut pass, &input), input);
        assert_eq!(pass.wrapped(), 0);
    }
}
