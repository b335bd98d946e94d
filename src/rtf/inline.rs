//! Inline runs.
//!
//! Character formatting in RTF is scoped by groups: `{\b bold {\i both}}`.
//! Every group that sets character formatting becomes an `<inline>` element
//! around the text it covers. The element is only written once the group
//! reaches text inside a paragraph, is closed by the group's `}`, and is
//! closed and re-opened at paragraph boundaries so it never crosses one.
//!
//! Font and caps changes are additionally fenced by `font`/`font-end` and
//! `caps`/`caps-end` markers, which the body decoder uses to pick the
//! character map for symbol fonts and to uppercase caps runs.

use super::control_words::attribute_name;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// An `<inline>` that has been written and not yet closed.
#[derive(Debug, Clone, Copy)]
struct Written {
    font: bool,
    caps: bool,
    /// Element depth of the stream when it was written
    depth: usize,
}

/// One `{…}` group.
#[derive(Debug, Default)]
struct Group {
    num: usize,
    attrs: ir::Attrs,
    written: Option<Written>,
}

impl Group {
    fn set(&mut self, key: String, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attrs.push((key, value.to_string())),
        }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Writes `<inline>` elements for character formatting groups.
#[derive(Debug, Default)]
pub struct Inlines {
    in_body: bool,
    in_para: bool,
    depth: usize,
    groups: Vec<Group>,
    count: usize,
}

impl Inlines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `<inline>` elements written (re-opened ones counted again).
    pub fn count(&self) -> usize {
        self.count
    }

    fn write_pending(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        let depth = self.depth;
        for group in self.groups.iter_mut() {
            if group.attrs.is_empty() || group.written.is_some() {
                continue;
            }
            let font = match group.attr("font-style") {
                Some(face) => {
                    emit(output, &ir::marker_with(mk::FONT, face))?;
                    true
                },
                None => false,
            };
            let caps = match group.attr("caps") {
                Some(flag) => {
                    emit(output, &ir::marker_with(mk::CAPS, flag))?;
                    true
                },
                None => false,
            };
            emit(output, &ir::open_tag_with("inline", &group.attrs))?;
            group.written = Some(Written { font, caps, depth });
            self.count += 1;
        }
        Ok(())
    }

    fn close_written(written: Written, output: &mut dyn Write) -> RtfResult<()> {
        if written.font {
            emit(output, mk::FONT_END)?;
        }
        if written.caps {
            emit(output, mk::CAPS_END)?;
        }
        emit(output, &ir::close_tag("inline"))
    }

    /// Close written inlines from the top down for as long as `close` accepts them.
    fn close_while(
        &mut self,
        output: &mut dyn Write,
        close: impl Fn(&Written) -> bool,
    ) -> RtfResult<()> {
        for group in self.groups.iter_mut().rev() {
            let Some(written) = group.written else {
                continue;
            };
            if !close(&written) {
                break;
            }
            Self::close_written(written, output)?;
            group.written = None;
        }
        Ok(())
    }

    fn formatting(&mut self, line: &str, output: &mut dyn Write) -> RtfResult<()> {
        let Some(top) = self.groups.last_mut() else {
            return Ok(());
        };
        // new formatting after text: end the current run, the next text starts another
        if let Some(written) = top.written.take() {
            Self::close_written(written, output)?;
        }
        let name = ir::cw_name(line);
        if name == "plain_____" {
            top.attrs.clear();
        } else {
            top.set(attribute_name(name), ir::cw_value(line));
        }
        Ok(())
    }

    fn close_group(&mut self, num: usize, output: &mut dyn Write) -> RtfResult<()> {
        while let Some(group) = self.groups.pop() {
            if let Some(written) = group.written {
                Self::close_written(written, output)?;
            }
            if group.num == num {
                break;
            }
        }
        Ok(())
    }
}

impl Pass for Inlines {
    fn name(&self) -> &'static str {
        "inlines"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for line in input.lines() {
            let line = line?;
            if ir::is_open_bracket(&line) {
                self.groups.push(Group {
                    num: ir::bracket_number(&line),
                    ..Group::default()
                });
                emit(output, &line)?;
                continue;
            }
            if ir::is_close_bracket(&line) {
                self.close_group(ir::bracket_number(&line), output)?;
                emit(output, &line)?;
                continue;
            }
            if !self.in_body {
                self.in_body = line == mk::BODY_OPEN;
                emit(output, &line)?;
                continue;
            }

            if line.starts_with("cw<ci<") || line.starts_with("cw<ss<char-style") {
                self.formatting(&line, output)?;
                continue;
            }
            if ir::is_text(&line) || line == mk::PICT_START {
                if self.in_para {
                    self.write_pending(output)?;
                }
                emit(output, &line)?;
                continue;
            }

            if line == mk::PARA_START {
                self.in_para = true;
            } else if line == mk::PARA_END {
                self.close_while(output, |_| true)?;
                self.in_para = false;
            } else if line == mk::LIST_TEXT_BEGIN {
                emit(output, &line)?;
                emit(output, &ir::open_tag("list-text"))?;
                self.depth += 1;
                continue;
            } else if line == mk::LIST_TEXT_END {
                let depth = self.depth;
                self.close_while(output, |w| w.depth >= depth)?;
                emit(output, &ir::close_tag("list-text"))?;
                self.depth = self.depth.saturating_sub(1);
            } else if line.starts_with("mi<tg<open") {
                self.depth += 1;
            } else if line.starts_with("mi<tg<close") {
                let depth = self.depth;
                self.close_while(output, |w| w.depth >= depth)?;
                self.depth = self.depth.saturating_sub(1);
            }
            emit(output, &line)?;
        }
        self.close_while(output, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn in_paragraph(lines: &[&'static str]) -> String {
        let mut all = vec![
            "ob<nu<open-brack<0001",
            "mi<mk<body-open_",
            "mi<mk<para-start",
            "mi<tg<open______<para",
        ];
        all.extend_from_slice(lines);
        all.extend([
            "mi<mk<para-end__",
            "mi<tg<close_____<para",
            "mi<mk<body-close",
            "cb<nu<clos-brack<0001",
        ]);
        stream(&all)
    }

    fn visible(out: &str) -> Vec<&str> {
        out.lines()
            .filter(|l| l.starts_with("tx<") || l.contains("<inline") || l.starts_with("mi<mk<font") || l.starts_with("mi<mk<caps"))
            .collect()
    }

    #[test]
    fn test_nested_bold_italic() {
        let input = in_paragraph(&[
            "ob<nu<open-brack<0002",
            "cw<ci<bold______<nu<true",
            "tx<nu<__________<bold ",
            "ob<nu<open-brack<0003",
            "cw<ci<italic____<nu<true",
            "tx<nu<__________<bolditalic",
            "cb<nu<clos-brack<0003",
            "tx<nu<__________< still-bold",
            "cb<nu<clos-brack<0002",
        ]);
        let mut pass = Inlines::new();
        let out = run_on(&mut pass, &input);
        assert_eq!(pass.count(), 2);
        assert_eq!(
            visible(&out),
            vec![
                "mi<tg<open-att__<inline<bold>true",
                "tx<nu<__________<bold ",
                "mi<tg<open-att__<inline<italic>true",
                "tx<nu<__________<bolditalic",
                "mi<tg<close_____<inline",
                "tx<nu<__________< still-bold",
                "mi<tg<close_____<inline",
            ]
        );
        assert!(!out.contains("cw<ci<"));
    }

    #[test]
    fn test_font_and_caps_markers() {
        let input = in_paragraph(&[
            "ob<nu<open-brack<0002",
            "cw<ci<font-style<nu<Symbol",
            "cw<ci<caps______<nu<true",
            "tx<hx<__________<'61",
            "cb<nu<clos-brack<0002",
        ]);
        assert_eq!(
            visible(&run_on(&mut Inlines::new(), &input)),
            vec![
                "mi<mk<font______<Symbol",
                "mi<mk<caps______<true",
                "mi<tg<open-att__<inline<font-style>Symbol<caps>true",
                "tx<hx<__________<'61",
                "mi<mk<font-end__",
                "mi<mk<caps-end__",
                "mi<tg<close_____<inline",
            ]
        );
    }

    #[test]
    fn test_run_reopened_across_paragraphs() {
        let input = stream(&[
            "ob<nu<open-brack<0001",
            "mi<mk<body-open_",
            "ob<nu<open-brack<0002",
            "cw<ci<bold______<nu<true",
            "mi<mk<para-start",
            "mi<tg<open______<para",
            "tx<nu<__________<one",
            "mi<mk<para-end__",
            "mi<tg<close_____<para",
            "mi<mk<para-start",
            "mi<tg<open______<para",
            "tx<nu<__________<two",
            "cb<nu<clos-brack<0002",
            "tx<nu<__________<plain",
            "mi<mk<para-end__",
            "mi<tg<close_____<para",
            "mi<mk<body-close",
            "cb<nu<clos-brack<0001",
        ]);
        let out = run_on(&mut Inlines::new(), &input);
        assert_eq!(out.matches("mi<tg<open-att__<inline<bold>true").count(), 2);
        assert!(out.contains("tx<nu<__________<one\nmi<tg<close_____<inline\nmi<mk<para-end__\n"));
        assert!(out.contains("tx<nu<__________<two\nmi<tg<close_____<inline\ncb<nu<clos-brack<0002\ntx<nu<__________<plain\n"));
    }

    #[test]
    fn test_formatting_change_mid_group() {
        let input = in_paragraph(&[
            "ob<nu<open-brack<0002",
            "cw<ci<bold______<nu<true",
            "tx<nu<__________<a",
            "cw<ci<italic____<nu<true",
            "tx<nu<__________<b",
            "cw<ci<plain_____<nu<true",
            "tx<nu<__________<c",
            "cb<nu<clos-brack<0002",
        ]);
        assert_eq!(
            visible(&run_on(&mut Inlines::new(), &input)),
            vec![
                "mi<tg<open-att__<inline<bold>true",
                "tx<nu<__________<a",
                "mi<tg<close_____<inline",
                "mi<tg<open-att__<inline<bold>true<italic>true",
                "tx<nu<__________<b",
                "mi<tg<close_____<inline",
                "tx<nu<__________<c",
            ]
        );
    }

    #[test]
    fn test_list_text_element() {
        let input = in_paragraph(&[
            "mi<mk<lst-tx-beg",
            "ob<nu<open-brack<0002",
            "cw<ci<font-style<nu<Symbol",
            "tx<hx<__________<'b7",
            "cb<nu<clos-brack<0002",
            "mi<mk<lst-tx-end",
            "tx<nu<__________<item",
        ]);
        let out = run_on(&mut Inlines::new(), &input);
        assert!(out.contains(
            "mi<mk<lst-tx-beg\nmi<tg<open______<list-text\nob<nu<open-brack<0002\nmi<mk<font______<Symbol\n"
        ));
        assert!(out.contains(
            "mi<tg<close_____<inline\ncb<nu<clos-brack<0002\nmi<tg<close_____<list-text\nmi<mk<lst-tx-end\n"
        ));
    }
}
