//! Style and border grouping.
//!
//! Consecutive paragraph definitions that share a style are wrapped in a
//! `<style-group>`; consecutive ones that share the same paragraph borders
//! in a `<border-group>`. A group only spans siblings: it ends when another
//! kind of element opens beside it or when its container closes.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// What a grouping pass groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Style,
    Border,
}

impl GroupBy {
    fn element(&self) -> &'static str {
        match self {
            GroupBy::Style => "style-group",
            GroupBy::Border => "border-group",
        }
    }

    /// Attributes identifying the group a definition belongs to, `None` for no group.
    fn key(&self, tag: &ir::Tag<'_>) -> Option<ir::Attrs> {
        match self {
            GroupBy::Style => tag
                .attr("style")
                .map(|style| vec![("name".to_string(), style.to_string())]),
            GroupBy::Border => {
                let borders: ir::Attrs = tag
                    .attrs
                    .iter()
                    .filter(|(k, _)| k.starts_with("border-paragraph"))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (!borders.is_empty()).then_some(borders)
            },
        }
    }
}

#[derive(Debug)]
struct OpenGroup {
    key: ir::Attrs,
    depth: usize,
}

/// Wraps runs of like paragraph definitions.
#[derive(Debug)]
pub struct Grouping {
    by: GroupBy,
    in_body: bool,
    depth: usize,
    open: Option<OpenGroup>,
    count: usize,
}

impl Grouping {
    pub fn new(by: GroupBy) -> Self {
        Self {
            by,
            in_body: false,
            depth: 0,
            open: None,
            count: 0,
        }
    }

    /// Number of groups written.
    pub fn count(&self) -> usize {
        self.count
    }

    fn close(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if self.open.take().is_some() {
            emit(output, &ir::close_tag(self.by.element()))?;
        }
        Ok(())
    }

    fn definition(&mut self, tag: &ir::Tag<'_>, output: &mut dyn Write) -> RtfResult<()> {
        let key = self.by.key(tag);
        if let Some(open) = &self.open
            && open.depth == self.depth
            && Some(&open.key) == key.as_ref()
        {
            return Ok(());
        }
        self.close(output)?;
        if let Some(key) = key {
            self.count += 1;
            emit(output, &ir::open_tag_with(self.by.element(), &key))?;
            self.open = Some(OpenGroup {
                key,
                depth: self.depth,
            });
        }
        Ok(())
    }
}

impl Pass for Grouping {
    fn name(&self) -> &'static str {
        match self.by {
            GroupBy::Style => "style_groups",
            GroupBy::Border => "border_groups",
        }
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

            match ir::parse_tag(&line) {
                Some(tag) if tag.kind == ir::TagKind::Open => {
                    if tag.element == "paragraph-definition" {
                        self.definition(&tag, output)?;
                    } else if self.open.as_ref().is_some_and(|g| g.depth == self.depth) {
                        self.close(output)?;
                    }
                    self.depth += 1;
                },
                Some(tag) if tag.kind == ir::TagKind::Close => {
                    if self.open.as_ref().is_some_and(|g| g.depth >= self.depth) {
                        self.close(output)?;
                    }
                    self.depth = self.depth.saturating_sub(1);
                },
                _ => {},
            }
            emit(output, &line)?;
        }
        self.close(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn definition(attrs: &str) -> Vec<String> {
        vec![
            "mi<mk<pard-start".to_string(),
            format!("mi<tg<open-att__<paragraph-definition{}", attrs),
            "mi<tg<open______<para".to_string(),
            "tx<nu<__________<x".to_string(),
            "mi<tg<close_____<para".to_string(),
            "mi<tg<close_____<paragraph-definition".to_string(),
        ]
    }

    fn body(parts: Vec<Vec<String>>) -> String {
        let mut lines = vec![
            "mi<tg<open______<body".to_string(),
            "mi<mk<body-open_".to_string(),
        ];
        for part in parts {
            lines.extend(part);
        }
        lines.push("mi<tg<close_____<body".to_string());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        stream(&refs)
    }

    fn groups(out: &str) -> Vec<&str> {
        out.lines().filter(|l| l.contains("-group")).collect()
    }

    #[test]
    fn test_style_runs() {
        let input = body(vec![
            definition("<style>Normal"),
            definition("<style>Normal"),
            definition("<style>Quote"),
        ]);
        let mut pass = Grouping::new(GroupBy::Style);
        let out = run_on(&mut pass, &input);
        assert_eq!(pass.count(), 2);
        assert_eq!(
            groups(&out),
            vec![
                "mi<tg<open-att__<style-group<name>Normal",
                "mi<tg<close_____<style-group",
                "mi<tg<open-att__<style-group<name>Quote",
                "mi<tg<close_____<style-group",
            ]
        );
        assert!(out.ends_with("mi<tg<close_____<style-group\nmi<tg<close_____<body\n"));
    }

    #[test]
    fn test_table_breaks_group() {
        let mut table = vec![
            "mi<tg<open______<table".to_string(),
            "mi<tg<open______<cell".to_string(),
        ];
        table.extend(definition("<style>Normal"));
        table.extend([
            "mi<tg<close_____<cell".to_string(),
            "mi<tg<close_____<table".to_string(),
        ]);
        let input = body(vec![definition("<style>Normal"), table, definition("<style>Normal")]);
        let mut pass = Grouping::new(GroupBy::Style);
        let out = run_on(&mut pass, &input);
        assert_eq!(pass.count(), 3);
        assert!(out.contains("mi<tg<close_____<style-group\nmi<tg<open______<table\n"));
        assert!(out.contains("mi<tg<close_____<style-group\nmi<tg<close_____<cell\n"));
    }

    #[test]
    fn test_border_runs() {
        let input = body(vec![
            definition("<style>Normal<border-paragraph-top-line-style>single"),
            definition("<style>Quote<border-paragraph-top-line-style>single"),
            definition("<style>Normal"),
        ]);
        let mut pass = Grouping::new(GroupBy::Border);
        let out = run_on(&mut pass, &input);
        assert_eq!(pass.count(), 1);
        assert_eq!(
            groups(&out),
            vec![
                "mi<tg<open-att__<border-group<border-paragraph-top-line-style>single",
                "mi<tg<close_____<border-group",
            ]
        );
        assert!(out.contains(
            "mi<tg<close_____<border-group\nmi<tg<open-att__<paragraph-definition<style>Normal\n"
        ));
    }
}
