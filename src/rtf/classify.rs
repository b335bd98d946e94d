//! Control-word classification.
//!
//! Turns the tokenizer's raw `\word123` lines into typed IR lines using the
//! closed table in [`control_words`](super::control_words), and braces into
//! (not yet numbered) `ob`/`cb` lines. Text lines pass through untouched.

use super::control_words::{self, Handler};
use super::diagnostics::Diagnostics;
use super::error::{RtfError, RtfResult};
use super::ir;
use super::languages::language_name;
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Split `\word-12` into (`word`, `Some(-12)`).
fn split_word(token: &str) -> (&str, Option<i32>) {
    let body = token.strip_prefix('\\').unwrap_or(token);
    let split = body
        .char_indices()
        .find(|(i, c)| c.is_ascii_digit() || (*c == '-' && *i > 0))
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    let (word, param) = body.split_at(split);
    (word, param.parse().ok())
}

/// Render a control word as one or more IR lines.
pub fn classify_word(token: &str) -> Vec<String> {
    let (word, param) = split_word(token);
    let Some(entry) = control_words::lookup(word) else {
        let raw = match param {
            Some(value) => format!("{}{}", word, value),
            None => word.to_string(),
        };
        return vec![ir::control("un", &ir::pad_name(word), &raw)];
    };

    let value = match entry.handler {
        Handler::Default => param.map_or_else(|| "true".to_string(), |v| v.to_string()),
        Handler::Bool => match param {
            Some(0) => "false".to_string(),
            _ => "true".to_string(),
        },
        Handler::DivideBy20 => format!("{:.2}", param.unwrap_or(0) as f64 / 20.0),
        Handler::DivideBy2 => ir::format_points(param.unwrap_or(0) as f64 / 2.0),
        Handler::Color => format!("{:02x}", param.unwrap_or(0).clamp(0, 255)),
        Handler::TwoPart(value) => match param {
            Some(0) => "false".to_string(),
            _ => value.to_string(),
        },
        Handler::ListType => control_words::list_type_name(param.unwrap_or(0)),
        Handler::Language => language_name(param.unwrap_or(0)),
        Handler::MsSub(name) => return vec![ir::ms_char(name)],
        Handler::NoSuperSub => {
            return vec![
                ir::control(entry.category, "subscript_", "false"),
                ir::control(entry.category, "superscrip", "false"),
            ];
        },
    };
    vec![ir::control(entry.category, entry.name, &value)]
}

/// Where the header check stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    ExpectBrace,
    ExpectRtf,
    Done,
}

/// Classifier pass with header validation.
#[derive(Debug)]
pub struct Classify {
    header: Header,
}

impl Classify {
    pub fn new() -> Self {
        Self {
            header: Header::ExpectBrace,
        }
    }

    fn check_header(&mut self, token: &str, line_no: usize) -> RtfResult<()> {
        match self.header {
            Header::ExpectBrace if token == "{" => self.header = Header::ExpectRtf,
            Header::ExpectRtf if token.starts_with("\\rtf") => self.header = Header::Done,
            Header::Done => {},
            _ => {
                return Err(RtfError::invalid_rtf_at(
                    "doesn't start with \\rtf",
                    line_no,
                ));
            },
        }
        Ok(())
    }
}

impl Default for Classify {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Classify {
    fn name(&self) -> &'static str {
        "classify"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            self.check_header(&line, index + 1)?;

            if line == "{" {
                emit(output, &ir::open_bracket(0))?;
            } else if line == "}" {
                emit(output, &ir::close_bracket(0))?;
            } else if line.starts_with('\\') {
                for classified in classify_word(&line) {
                    emit(output, &classified)?;
                }
            } else {
                emit(output, &line)?;
            }
        }
        if self.header != Header::Done {
            return Err(RtfError::invalid_rtf("doesn't start with \\rtf"));
        }
        Ok(())
    }
}
