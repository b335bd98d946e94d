//! Heading promotion.
//!
//! Paragraphs styled `heading N` start a nested `<section type="heading">`
//! that runs until the next heading of the same or a higher level, or until
//! the enclosing RTF section ends. Only headings sitting directly in a
//! section are promoted; headings inside tables, lists or field blocks stay
//! plain paragraphs.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::list::heading_level;
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
struct OpenHeading {
    level: usize,
}

/// Promotes `heading N` paragraphs to nested sections.
#[derive(Debug, Default)]
pub struct Headings {
    in_body: bool,
    depth: usize,
    /// Depth just inside the innermost `<section>` from the stream
    section_depth: Option<usize>,
    open: Vec<OpenHeading>,
    /// Running number per level, reset when a higher level opens
    numbers: Vec<usize>,
    count: usize,
}

impl Headings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of heading sections written.
    pub fn count(&self) -> usize {
        self.count
    }

    fn close_to(&mut self, level: usize, output: &mut dyn Write) -> RtfResult<()> {
        while self.open.last().is_some_and(|h| h.level >= level) {
            self.open.pop();
            emit(output, &ir::close_tag("section"))?;
        }
        Ok(())
    }

    fn open(&mut self, level: usize, output: &mut dyn Write) -> RtfResult<()> {
        self.close_to(level, output)?;
        if self.numbers.len() < level {
            self.numbers.resize(level, 0);
        }
        self.numbers.truncate(level);
        self.numbers[level - 1] += 1;
        let num = self
            .numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        self.count += 1;
        emit(
            output,
            &ir::open_tag_with(
                "section",
                &[
                    ("num", num),
                    ("level", level.to_string()),
                    ("type", "heading".to_string()),
                ],
            ),
        )?;
        self.open.push(OpenHeading { level });
        Ok(())
    }
}

impl Pass for Headings {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for line in input.lines() {
            let line = line?;
            if !self.in_body {
                self.in_body = line == mk::BODY_OPEN;
                emit(output, &line)?;
                continue;
            }
            if line == mk::BODY_CLOSE || line == mk::SECT_CLOSE {
                self.close_to(1, output)?;
            }

            match ir::parse_tag(&line) {
                Some(tag) if tag.kind == ir::TagKind::Open => {
                    if tag.element == "paragraph-definition"
                        && self.section_depth == Some(self.depth)
                        && let Some(level) = tag.attr("style").and_then(heading_level)
                    {
                        log::debug!("heading level {} promoted", level);
                        self.open(level, output)?;
                    }
                    self.depth += 1;
                    if tag.element == "section" {
                        self.section_depth = Some(self.depth);
                        self.numbers.clear();
                    }
                },
                Some(tag) if tag.kind == ir::TagKind::Close => {
                    if self.section_depth == Some(self.depth) {
                        self.close_to(1, output)?;
                        if tag.element == "section" {
                            self.section_depth = None;
                        }
                    }
                    self.depth = self.depth.saturating_sub(1);
                },
                _ => {},
            }
            emit(output, &line)?;
        }
        self.close_to(1, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn paragraph(style: &'static str, text: &'static str) -> Vec<String> {
        vec![
            "mi<mk<pard-start".to_string(),
            format!("mi<tg<open-att__<paragraph-definition<style>{}", style),
            "mi<tg<open______<para".to_string(),
            text.to_string(),
            "mi<tg<close_____<para".to_string(),
            "mi<tg<close_____<paragraph-definition".to_string(),
        ]
    }

    fn document(paragraphs: &[(&'static str, &'static str)]) -> String {
        let mut lines = vec![
            "mi<tg<open______<body".to_string(),
            "mi<mk<body-open_".to_string(),
            "mi<mk<sect-start".to_string(),
            "mi<tg<open-att__<section<num>1<level>0<type>rtf-native".to_string(),
        ];
        for (style, text) in paragraphs {
            lines.extend(paragraph(style, text));
        }
        lines.extend([
            "mi<mk<sect-close".to_string(),
            "mi<tg<close_____<section".to_string(),
            "mi<mk<body-close".to_string(),
            "mi<tg<close_____<body".to_string(),
        ]);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        stream(&refs)
    }

    fn sections(out: &str) -> Vec<&str> {
        out.lines()
            .filter(|l| l.contains("<section") || l.starts_with("tx<"))
            .collect()
    }

    #[test]
    fn test_nested_headings() {
        let input = document(&[
            ("heading 1", "tx<nu<__________<Intro"),
            ("Normal", "tx<nu<__________<text"),
            ("heading 2", "tx<nu<__________<Detail"),
            ("heading 1", "tx<nu<__________<Next"),
        ]);
        let mut pass = Headings::new();
        let out = run_on(&mut pass, &input);
        assert_eq!(pass.count(), 3);
        assert_eq!(
            sections(&out),
            vec![
                "mi<tg<open-att__<section<num>1<level>0<type>rtf-native",
                "mi<tg<open-att__<section<num>1<level>1<type>heading",
                "tx<nu<__________<Intro",
                "tx<nu<__________<text",
                "mi<tg<open-att__<section<num>1.1<level>2<type>heading",
                "tx<nu<__________<Detail",
                "mi<tg<close_____<section",
                "mi<tg<close_____<section",
                "mi<tg<open-att__<section<num>2<level>1<type>heading",
                "tx<nu<__________<Next",
                "mi<tg<close_____<section",
                "mi<tg<close_____<section",
            ]
        );
    }

    #[test]
    fn test_heading_in_cell_not_promoted() {
        let mut lines = vec![
            "mi<mk<body-open_".to_string(),
            "mi<tg<open-att__<section<num>1<level>0<type>rtf-native".to_string(),
            "mi<tg<open______<table".to_string(),
            "mi<tg<open______<cell".to_string(),
        ];
        lines.extend(paragraph("heading 1", "tx<nu<__________<cell"));
        lines.extend([
            "mi<tg<close_____<cell".to_string(),
            "mi<tg<close_____<table".to_string(),
            "mi<tg<close_____<section".to_string(),
        ]);
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut pass = Headings::new();
        let out = run_on(&mut pass, &stream(&refs));
        assert_eq!(pass.count(), 0);
        assert!(!out.contains("type>heading"));
    }
}
