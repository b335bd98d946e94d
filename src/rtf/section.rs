//! Section inference.
//!
//! RTF has no section start, only `\sect` ending one and `\sectd` resetting
//! the section formatting. A section is opened lazily before the first body
//! content and closed at `\sect` and at the end of the body. Values set after
//! `\sectd` (columns, margins, page size, break type, …) become the next
//! section's attributes; a `\sect` with no `\sectd` after it carries the
//! previous values forward.
//!
//! Field blocks never open or close sections, and side areas (footnotes,
//! headers) are left alone.

use super::control_words::attribute_name;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeBody,
    /// In the body with no section open
    Between,
    InSection,
    AfterBody,
}

/// Section formatting collected since the last `\sectd`.
#[derive(Debug, Clone, Default)]
struct SectionValues {
    attrs: ir::Attrs,
}

impl SectionValues {
    fn set(&mut self, key: String, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attrs.push((key, value.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct Sections {
    state: State,
    values: SectionValues,
    count: usize,
    field_depth: usize,
    /// `header-ind` markers seen before the section they belong to opened
    waiting_headers: Vec<String>,
}

impl Sections {
    pub fn new() -> Self {
        Self {
            state: State::BeforeBody,
            values: SectionValues::default(),
            count: 0,
            field_depth: 0,
            waiting_headers: Vec::new(),
        }
    }

    /// Number of sections written.
    pub fn count(&self) -> usize {
        self.count
    }

    fn open(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        self.count += 1;
        let mut attrs = vec![
            ("num".to_string(), self.count.to_string()),
            ("level".to_string(), "0".to_string()),
            ("type".to_string(), "rtf-native".to_string()),
        ];
        attrs.extend(self.values.attrs.iter().cloned());
        emit(output, mk::SECT_START)?;
        emit(output, &ir::open_tag_with("section", &attrs))?;
        for header in self.waiting_headers.drain(..) {
            emit(output, &header)?;
        }
        self.state = State::InSection;
        Ok(())
    }

    fn close(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        emit(output, mk::SECT_CLOSE)?;
        emit(output, &ir::close_tag("section"))?;
        self.state = State::Between;
        Ok(())
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Sections {
    fn name(&self) -> &'static str {
        "sections"
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
                State::BeforeBody | State::AfterBody => {
                    if line == mk::BODY_OPEN {
                        self.state = State::Between;
                    }
                    emit(output, &line)?;
                    continue;
                },
                State::Between | State::InSection => {},
            }

            if line == mk::BODY_CLOSE {
                if self.state == State::InSection {
                    self.close(output)?;
                }
                for header in self.waiting_headers.drain(..) {
                    emit(output, &header)?;
                }
                self.state = State::AfterBody;
                emit(output, &line)?;
                continue;
            }
            if line == mk::SECTION_FIELD_BEGIN {
                self.field_depth += 1;
            } else if line == mk::SECTION_FIELD_END {
                self.field_depth = self.field_depth.saturating_sub(1);
            }

            if line.starts_with("cw<sc<") {
                match ir::cw_name(&line) {
                    "section___" => {
                        if self.field_depth == 0 && self.state == State::InSection {
                            log::debug!("section {} ends", self.count);
                            self.close(output)?;
                        }
                    },
                    "sect-defin" => self.values = SectionValues::default(),
                    name => self.values.set(attribute_name(name), ir::cw_value(&line)),
                }
                continue;
            }
            if line.starts_with(mk::HEADER_REF) && self.state == State::Between {
                self.waiting_headers.push(line);
                continue;
            }
            if self.state == State::Between {
                self.open(output)?;
            }
            emit(output, &line)?;
        }
        Ok(())
    }
}
