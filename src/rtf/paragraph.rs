//! Paragraph inference.
//!
//! Paragraph content starts a `<para>`; `\par` and structural boundaries
//! (cells, rows, field blocks, sections, note and header ends) close it.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Markers that start a paragraph when none is open.
const OPENING_MARKERS: &[&str] = &[mk::INLINE_FIELD, mk::PICT_START, mk::LIST_TEXT_BEGIN, mk::FOOTNOTE_REF];

/// Markers that end an open paragraph.
const CLOSING_MARKERS: &[&str] = &[
    mk::FIELD_BLOCK_START,
    mk::FIELD_BLOCK_END,
    mk::BODY_CLOSE,
    mk::SECT_CLOSE,
    mk::SECT_START,
    mk::FOOTNOTE_CLOSE,
    mk::HEADER_CLOSE,
];

const PAR_END: &str = "cw<pf<par-end___";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeBody,
    NotParagraph,
    Paragraph,
}

#[derive(Debug)]
pub struct Paragraphs {
    state: State,
    empty_paragraphs: bool,
    count: usize,
}

impl Paragraphs {
    pub fn new(empty_paragraphs: bool) -> Self {
        Self {
            state: State::BeforeBody,
            empty_paragraphs,
            count: 0,
        }
    }

    /// Number of paragraphs written, empty ones included.
    pub fn count(&self) -> usize {
        self.count
    }

    fn opens(line: &str) -> bool {
        ir::is_text(line) || OPENING_MARKERS.iter().any(|m| line.starts_with(m))
    }

    fn closes(line: &str) -> bool {
        line.starts_with(PAR_END)
            || line.starts_with("cw<tb<cell______")
            || line.starts_with("cw<tb<row_______")
            || CLOSING_MARKERS.iter().any(|m| line.starts_with(m))
    }
}

impl Pass for Paragraphs {
    fn name(&self) -> &'static str {
        "paragraphs"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for line in input.lines() {
            let line = line?;
            match self.state {
                State::BeforeBody => {
                    if line == mk::BODY_OPEN {
                        self.state = State::NotParagraph;
                    }
                },
                State::NotParagraph => {
                    if Self::opens(&line) {
                        self.count += 1;
                        emit(output, mk::PARA_START)?;
                        emit(output, &ir::open_tag("para"))?;
                        self.state = State::Paragraph;
                    } else if line.starts_with(PAR_END) && self.empty_paragraphs {
                        self.count += 1;
                        emit(output, &ir::empty_tag("para"))?;
                    }
                },
                State::Paragraph => {
                    if Self::closes(&line) {
                        emit(output, mk::PARA_END)?;
                        emit(output, &ir::close_tag("para"))?;
                        self.state = State::NotParagraph;
                    } else if line.starts_with("cw<pf<par-def___") {
                        emit(output, mk::BOGUS_PARD)?;
                        continue;
                    }
                },
            }
            emit(output, &line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    #[test]
    fn test_paragraph_boundaries() {
        let input = stream(&[
            "mi<mk<body-open_",
            "cw<pf<par-def___<nu<true",
            "tx<nu<__________<Hello",
            "cw<pf<par-def___<nu<true",
            "cw<pf<par-end___<nu<true",
            "mi<mk<inline-fld",
            "tx<nu<__________<x",
            "mi<mk<body-close",
        ]);
        assert_eq!(
            run_on(&mut Paragraphs::new(true), &input),
            stream(&[
                "mi<mk<body-open_",
                "cw<pf<par-def___<nu<true",
                "mi<mk<para-start",
                "mi<tg<open______<para",
                "tx<nu<__________<Hello",
                "mi<mk<bogus-pard",
                "mi<mk<para-end__",
                "mi<tg<close_____<para",
                "cw<pf<par-end___<nu<true",
                "mi<mk<para-start",
                "mi<tg<open______<para",
                "mi<mk<inline-fld",
                "tx<nu<__________<x",
                "mi<mk<para-end__",
                "mi<tg<close_____<para",
                "mi<mk<body-close",
            ])
        );
    }

    #[test]
    fn test_lone_par() {
        let input = stream(&["mi<mk<body-open_", "cw<pf<par-end___<nu<true", "mi<mk<body-close"]);
        let mut pass = Paragraphs::new(true);
        assert!(run_on(&mut pass, &input).contains("mi<tg<empty_____<para\ncw<pf<par-end___<nu<true\n"));
        assert_eq!(pass.count(), 1);

        let mut pass = Paragraphs::new(false);
        assert!(!run_on(&mut pass, &input).contains("<para"));
        assert_eq!(pass.count(), 0);
    }

    #[test]
    fn test_side_areas() {
        let input = stream(&[
            "mi<mk<body-open_",
            "mi<mk<body-close",
            "mi<mk<footnt-ope<0001<footnote",
            "tx<nu<__________<Note",
            "mi<mk<footnt-clo",
        ]);
        let out = run_on(&mut Paragraphs::new(true), &input);
        assert!(out.contains("tx<nu<__________<Note\nmi<mk<para-end__\nmi<tg<close_____<para\nmi<mk<footnt-clo\n"));
    }
}
