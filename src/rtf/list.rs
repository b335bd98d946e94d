//! List building.
//!
//! RTF never marks a list as such: a paragraph belongs to one when its
//! definition carries `\lsN` (and `\ilvlN`). This pass wraps runs of such
//! paragraph definitions in `<list>`/`<item>` elements. Items with the same
//! list id and a deeper left indent open a nested list inside the current
//! item; a shallower or equal indent starts a new item at that level.
//!
//! The list type (`ordered` or `unordered`) is looked up through the
//! override table (`\ls` number to list id) and the level's numbering type
//! in the list table, both already written into the preamble.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit, read_all};
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Lines before which every open list is closed.
const HARD_ENDERS: &[&str] = &[
    mk::BODY_CLOSE,
    mk::SECT_CLOSE,
    mk::SECT_START,
    mk::TABLE_START,
    mk::FIELD_BLOCK_START,
    mk::FIELD_BLOCK_END,
    mk::CLOSE_CELL,
    mk::FOOTNOTE_OPEN,
    mk::FOOTNOTE_CLOSE,
    mk::FOOTNOTE_AREA_BEGIN,
    mk::FOOTNOTE_AREA_END,
    mk::HEADER_OPEN,
    mk::HEADER_CLOSE,
    mk::HEADER_AREA_BEGIN,
    mk::HEADER_AREA_END,
];

/// Whether a style name is one of Word's built-in headings.
pub fn is_heading_style(style: &str) -> bool {
    heading_level(style).is_some()
}

/// Level of a `heading N` style name.
pub fn heading_level(style: &str) -> Option<usize> {
    let lower = style.trim().to_ascii_lowercase();
    let level = lower.strip_prefix("heading")?.trim();
    level.parse().ok().filter(|n| (1..=9).contains(n))
}

/// Numbering information gathered from the preamble tables.
#[derive(Debug, Default)]
struct Numbering {
    /// `\ls` number to list id
    overrides: HashMap<String, String>,
    /// list id to numbering type per level
    levels: HashMap<String, Vec<Option<String>>>,
}

impl Numbering {
    fn collect(lines: &[String]) -> Self {
        let mut numbering = Numbering::default();
        let mut current: Option<String> = None;
        for line in lines {
            if line == mk::BODY_OPEN {
                break;
            }
            let Some(tag) = ir::parse_tag(line) else {
                continue;
            };
            match (tag.kind, tag.element) {
                (ir::TagKind::Empty, "override-list") => {
                    if let (Some(id), Some(ls)) = (tag.attr("list-id"), tag.attr("ls-number")) {
                        numbering.overrides.insert(ls.to_string(), id.to_string());
                    }
                },
                (ir::TagKind::Open, "list-in-table") => {
                    current = tag.attr("list-id").map(str::to_string);
                    if let Some(id) = &current {
                        numbering.levels.entry(id.clone()).or_default();
                    }
                },
                (ir::TagKind::Close, "list-in-table") => current = None,
                (ir::TagKind::Empty, "level-in-table") => {
                    if let Some(levels) = current.as_ref().and_then(|id| numbering.levels.get_mut(id)) {
                        levels.push(tag.attr("numbering-type").map(str::to_string));
                    }
                },
                _ => {},
            }
        }
        numbering
    }

    /// `ordered` or `unordered` for a paragraph's `\ls` number and level.
    fn list_type(&self, ls: &str, level: usize) -> &'static str {
        let id = self.overrides.get(ls).map(String::as_str).unwrap_or(ls);
        let numbering = self
            .levels
            .get(id)
            .and_then(|levels| levels.get(level))
            .and_then(|t| t.as_deref());
        match numbering {
            Some("bullet") => "unordered",
            _ => "ordered",
        }
    }
}

/// One open `<list>`.
#[derive(Debug, Clone)]
struct OpenList {
    id: String,
    indent: f64,
    /// Element depth of the stream when the list opened
    depth: usize,
    item_open: bool,
}

/// Builds `<list>`/`<item>` structure around list paragraphs.
#[derive(Debug, Default)]
pub struct Lists {
    numbering: Numbering,
    stack: Vec<OpenList>,
    depth: usize,
    count: usize,
}

impl Lists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `<list>` elements written, nested ones included.
    pub fn count(&self) -> usize {
        self.count
    }

    fn open_list(
        &mut self,
        output: &mut dyn Write,
        id: &str,
        level: usize,
        indent: f64,
    ) -> RtfResult<()> {
        let list_type = self.numbering.list_type(id, level);
        self.count += 1;
        emit(
            output,
            &ir::open_tag_with(
                "list",
                &[
                    ("list-id", id.to_string()),
                    ("level", level.to_string()),
                    ("list-type", list_type.to_string()),
                ],
            ),
        )?;
        emit(output, &ir::open_tag("item"))?;
        self.stack.push(OpenList {
            id: id.to_string(),
            indent,
            depth: self.depth,
            item_open: true,
        });
        Ok(())
    }

    fn close_top(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if let Some(list) = self.stack.pop() {
            if list.item_open {
                emit(output, &ir::close_tag("item"))?;
            }
            emit(output, &ir::close_tag("list"))?;
        }
        Ok(())
    }

    fn close_all(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        while !self.stack.is_empty() {
            self.close_top(output)?;
        }
        Ok(())
    }

    fn next_item(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if let Some(list) = self.stack.last_mut() {
            if list.item_open {
                emit(output, &ir::close_tag("item"))?;
            }
            emit(output, &ir::open_tag("item"))?;
            list.item_open = true;
        }
        Ok(())
    }

    /// Place a paragraph definition into the list structure.
    fn definition(&mut self, output: &mut dyn Write, tag: &ir::Tag<'_>) -> RtfResult<()> {
        let indent: f64 = tag
            .attr("left-indent")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);
        let id = tag
            .attr("list-id")
            .filter(|_| !tag.attr("style").is_some_and(is_heading_style));
        let level: usize = tag
            .attr("list-level")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let Some(id) = id else {
            // plain paragraphs indented deeper than a list continue its item
            while self.stack.last().is_some_and(|list| list.indent >= indent) {
                self.close_top(output)?;
            }
            return Ok(());
        };

        loop {
            let Some(top) = self.stack.last() else {
                return self.open_list(output, id, level, indent);
            };
            if top.id != id {
                if top.indent >= indent {
                    self.close_top(output)?;
                    continue;
                }
                // a different list nested inside the current item
                return self.open_list(output, id, level, indent);
            }
            if indent > top.indent {
                return self.open_list(output, id, level, indent);
            }
            let deeper_sibling = self
                .stack
                .iter()
                .rev()
                .nth(1)
                .is_some_and(|parent| parent.id == id && parent.indent >= indent);
            if deeper_sibling {
                self.close_top(output)?;
                continue;
            }
            return self.next_item(output);
        }
    }
}

impl Pass for Lists {
    fn name(&self) -> &'static str {
        "lists"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        self.numbering = Numbering::collect(&lines);
        let mut in_body = false;

        for line in &lines {
            if !in_body {
                in_body = line == mk::BODY_OPEN;
                emit(output, line)?;
                continue;
            }

            if HARD_ENDERS.iter().any(|m| line.starts_with(m)) {
                self.close_all(output)?;
            }
            match ir::parse_tag(line) {
                Some(tag) if tag.kind == ir::TagKind::Open && tag.element == "paragraph-definition" => {
                    self.definition(output, &tag)?;
                    self.depth += 1;
                },
                Some(tag) if tag.kind == ir::TagKind::Open => self.depth += 1,
                Some(tag) if tag.kind == ir::TagKind::Close => {
                    // a container closing around open lists ends them
                    while self.stack.last().is_some_and(|list| list.depth >= self.depth) {
                        self.close_top(output)?;
                    }
                    self.depth = self.depth.saturating_sub(1);
                },
                _ => {},
            }
            emit(output, line)?;
        }
        self.close_all(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    fn preamble() -> Vec<&'static str> {
        vec![
            "mi<tg<open______<list-table",
            "mi<tg<open-att__<list-in-table<list-id>42",
            "mi<tg<empty-att_<level-in-table<level>0<numbering-type>bullet",
            "mi<tg<empty-att_<level-in-table<level>1<numbering-type>arabic",
            "mi<tg<close_____<list-in-table",
            "mi<tg<close_____<list-table",
            "mi<tg<open______<override-table",
            "mi<tg<empty-att_<override-list<list-id>42<ls-number>1",
            "mi<tg<close_____<override-table",
            "mi<tg<open______<body",
            "mi<mk<body-open_",
        ]
    }

    fn paragraph(definition: &'static str, text: &'static str) -> Vec<&'static str> {
        vec![
            "mi<mk<pard-start",
            definition,
            "mi<mk<para-start",
            "mi<tg<open______<para",
            text,
            "mi<mk<para-end__",
            "mi<tg<close_____<para",
            "mi<tg<close_____<paragraph-definition",
        ]
    }

    #[test]
    fn test_two_items_and_nested_list() {
        let mut lines = preamble();
        lines.extend(paragraph(
            "mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>36<list-id>1",
            "tx<nu<__________<para1",
        ));
        lines.extend(paragraph(
            "mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>36<list-id>1",
            "tx<nu<__________<para2",
        ));
        lines.extend(paragraph(
            "mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>72<list-id>1<list-level>1",
            "tx<nu<__________<para3",
        ));
        lines.extend(["mi<mk<body-close", "mi<tg<close_____<body"]);

        let mut pass = Lists::new();
        let out = run_on(&mut pass, &stream(&lines));
        assert_eq!(pass.count(), 2);

        let tags: Vec<&str> = out
            .lines()
            .skip_while(|l| *l != "mi<tg<open______<body")
            .filter(|l| l.contains("__<list") || l.contains("__<item") || l.starts_with("tx<"))
            .collect();
        assert_eq!(
            tags,
            vec![
                "mi<tg<open-att__<list<list-id>1<level>0<list-type>unordered",
                "mi<tg<open______<item",
                "tx<nu<__________<para1",
                "mi<tg<close_____<item",
                "mi<tg<open______<item",
                "tx<nu<__________<para2",
                "mi<tg<open-att__<list<list-id>1<level>1<list-type>ordered",
                "mi<tg<open______<item",
                "tx<nu<__________<para3",
                "mi<tg<close_____<item",
                "mi<tg<close_____<list",
                "mi<tg<close_____<item",
                "mi<tg<close_____<list",
            ]
        );
        assert!(out.ends_with("mi<tg<close_____<list\nmi<mk<body-close\nmi<tg<close_____<body\n"));
    }

    #[test]
    fn test_back_out_of_nesting() {
        let mut lines = preamble();
        for (def, text) in [
            ("mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>36<list-id>1", "tx<nu<__________<a"),
            ("mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>72<list-id>1", "tx<nu<__________<b"),
            ("mi<tg<open-att__<paragraph-definition<style>Normal<left-indent>36<list-id>1", "tx<nu<__________<c"),
            ("mi<tg<open-att__<paragraph-definition<style>Normal", "tx<nu<__________<after"),
        ] {
            lines.extend(paragraph(def, text));
        }
        lines.push("mi<mk<body-close");
        let out = run_on(&mut Lists::new(), &stream(&lines));
        assert_eq!(out.matches("mi<tg<open-att__<list<").count(), 2);
        assert_eq!(out.matches("mi<tg<close_____<list\n").count(), 2);
        // c is a sibling of a, after the nested list closed
        assert!(out.contains(
            "mi<tg<close_____<item\nmi<tg<close_____<list\nmi<tg<close_____<item\nmi<tg<open______<item\n"
        ));
        let after = out.find("tx<nu<__________<after").unwrap();
        let last_close = out.rfind("mi<tg<close_____<list").unwrap();
        assert!(last_close < after);
    }

    #[test]
    fn test_unknown_level_is_ordered() {
        let numbering = Numbering::collect(
            &preamble().iter().map(|l| l.to_string()).collect::<Vec<_>>(),
        );
        assert_eq!(numbering.list_type("1", 0), "unordered");
        assert_eq!(numbering.list_type("1", 1), "ordered");
        assert_eq!(numbering.list_type("1", 7), "ordered");
        assert_eq!(numbering.list_type("9", 0), "ordered");
    }

    #[test]
    fn test_lists_close_before_cell_end() {
        let mut lines = preamble();
        lines.push("mi<tg<open______<cell");
        lines.extend(paragraph(
            "mi<tg<open-att__<paragraph-definition<style>Normal<list-id>1",
            "tx<nu<__________<in cell",
        ));
        lines.extend(["mi<mk<close_cell", "mi<tg<close_____<cell"]);
        let out = run_on(&mut Lists::new(), &stream(&lines));
        assert!(out.ends_with(
            "mi<tg<close_____<item\nmi<tg<close_____<list\nmi<mk<close_cell\nmi<tg<close_____<cell\n"
        ));
    }

    #[test]
    fn test_headings_never_listed() {
        assert_eq!(heading_level("heading 2"), Some(2));
        assert_eq!(heading_level("Heading 1"), Some(1));
        assert_eq!(heading_level("Normal"), None);
        let mut lines = preamble();
        lines.extend(paragraph(
            "mi<tg<open-att__<paragraph-definition<style>heading 1<list-id>1",
            "tx<nu<__________<Title",
        ));
        let out = run_on(&mut Lists::new(), &stream(&lines));
        assert!(!out.contains("<list<"));
    }
}
