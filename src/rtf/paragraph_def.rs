//! Paragraph definitions.
//!
//! Everything set between `\pard` and a paragraph's first content (indents,
//! spacing, alignment, tabs, borders, style, list membership) is written as
//! one `<paragraph-definition>` wrapping the paragraphs it governs. A
//! definition stays open over following paragraphs until the next `\pard`,
//! and is re-opened with the same attributes after a boundary (cell, field
//! block, section, note) forces it closed.

use super::border::parse_border;
use super::control_words::attribute_name;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Style name used when a definition names none.
pub const DEFAULT_STYLE: &str = "Normal";

/// Lines that force an open definition closed.
const BOUNDARIES: &[&str] = &[
    mk::FIELD_BLOCK_START,
    mk::FIELD_BLOCK_END,
    mk::SECT_CLOSE,
    mk::SECT_START,
    mk::BODY_CLOSE,
    mk::FOOTNOTE_OPEN,
    mk::FOOTNOTE_CLOSE,
    mk::HEADER_OPEN,
    mk::HEADER_CLOSE,
    "cw<tb<cell______",
    "cw<tb<row_______",
];

/// Tab alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabAlignment {
    /// Left-aligned tab (default)
    #[default]
    Left,
    /// Center-aligned tab
    Center,
    /// Right-aligned tab
    Right,
    /// Decimal-aligned tab
    Decimal,
    /// Vertical bar at the position
    Bar,
}

impl TabAlignment {
    fn from_value(value: &str) -> Self {
        match value {
            "center" => TabAlignment::Center,
            "right" => TabAlignment::Right,
            "decimal" => TabAlignment::Decimal,
            _ => TabAlignment::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabAlignment::Left => "left",
            TabAlignment::Center => "center",
            TabAlignment::Right => "right",
            TabAlignment::Decimal => "decimal",
            TabAlignment::Bar => "bar",
        }
    }
}

/// Tab leader character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabLeader {
    /// No leader (default)
    #[default]
    None,
    /// Dotted leader
    Dot,
    /// Middle dot leader
    MiddleDot,
    /// Hyphen leader
    Hyphen,
    /// Underline leader
    Underline,
    /// Thick line leader
    ThickLine,
    /// Equal sign leader
    Equal,
}

impl TabLeader {
    fn from_value(value: &str) -> Self {
        match value {
            "dot" => TabLeader::Dot,
            "middle-dot" => TabLeader::MiddleDot,
            "hyphen" => TabLeader::Hyphen,
            "underline" => TabLeader::Underline,
            "thick" => TabLeader::ThickLine,
            "equal" => TabLeader::Equal,
            _ => TabLeader::None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TabLeader::None => None,
            TabLeader::Dot => Some("dot"),
            TabLeader::MiddleDot => Some("middle-dot"),
            TabLeader::Hyphen => Some("hyphen"),
            TabLeader::Underline => Some("underline"),
            TabLeader::ThickLine => Some("thick"),
            TabLeader::Equal => Some("equal"),
        }
    }
}

/// Tab stop definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabStop {
    /// Tab position in points
    pub position: f64,
    /// Tab alignment
    pub alignment: TabAlignment,
    /// Tab leader
    pub leader: TabLeader,
}

impl TabStop {
    /// `position:type[:leader];`
    fn pack(&self, out: &mut String) {
        out.push_str(&ir::format_points(self.position));
        out.push(':');
        out.push_str(self.alignment.as_str());
        if let Some(leader) = self.leader.as_str() {
            out.push(':');
            out.push_str(leader);
        }
        out.push(';');
    }
}

/// Attributes of the definition being collected.
#[derive(Debug, Clone, Default)]
struct Definition {
    style: Option<String>,
    attrs: ir::Attrs,
    tabs: Vec<TabStop>,
    next_alignment: TabAlignment,
    next_leader: TabLeader,
}

impl Definition {
    fn set(&mut self, key: String, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    fn add_tab(&mut self, position: f64, alignment: TabAlignment) {
        self.tabs.push(TabStop {
            position,
            alignment,
            leader: std::mem::take(&mut self.next_leader),
        });
        self.next_alignment = TabAlignment::Left;
    }

    fn take(&mut self, line: &str) {
        let name = ir::cw_name(line);
        let value = ir::cw_value(line);
        match (ir::category(line), name) {
            ("pf", "par-def___" | "par-end___") => {},
            ("pf", "tab-kind__") => self.next_alignment = TabAlignment::from_value(value),
            ("pf", "tab-leader") => self.next_leader = TabLeader::from_value(value),
            ("pf", "tab-stop__") => {
                let alignment = self.next_alignment;
                self.add_tab(value.parse().unwrap_or(0.0), alignment);
            },
            ("pf", "tab-bar-st") => self.add_tab(value.parse().unwrap_or(0.0), TabAlignment::Bar),
            ("pf", _) => self.set(attribute_name(name), value.to_string()),
            ("ss", "para-style") => self.style = Some(value.to_string()),
            ("ls", "list-id___" | "list-lvl__") => self.set(attribute_name(name), value.to_string()),
            ("bd", _) if name.starts_with("bor-par") => {
                for (key, value) in parse_border(name, value) {
                    self.set(key, value);
                }
            },
            _ => {},
        }
    }

    fn attrs(&self) -> ir::Attrs {
        let mut attrs = vec![(
            "style".to_string(),
            self.style.clone().unwrap_or_else(|| DEFAULT_STYLE.to_string()),
        )];
        attrs.extend(self.attrs.iter().cloned());
        if !self.tabs.is_empty() {
            let mut packed = String::new();
            for tab in &self.tabs {
                tab.pack(&mut packed);
            }
            attrs.push(("tabs".to_string(), packed));
        }
        attrs
    }
}

#[derive(Debug)]
pub struct ParagraphDefinitions {
    in_body: bool,
    current: Definition,
    /// A `\pard` (or stray `\pard` inside a paragraph) since the last emission
    reset: bool,
    open: bool,
    count: usize,
}

impl ParagraphDefinitions {
    pub fn new() -> Self {
        Self {
            in_body: false,
            current: Definition::default(),
            reset: true,
            open: false,
            count: 0,
        }
    }

    /// Number of definitions written.
    pub fn count(&self) -> usize {
        self.count
    }

    fn close(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if self.open {
            emit(output, &ir::close_tag("paragraph-definition"))?;
            self.open = false;
        }
        Ok(())
    }
}

impl Default for ParagraphDefinitions {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for ParagraphDefinitions {
    fn name(&self) -> &'static str {
        "paragraph_definitions"
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

            if line.starts_with("cw<pf<par-def___") || line == mk::BOGUS_PARD {
                self.current = Definition::default();
                self.reset = true;
                if line == mk::BOGUS_PARD {
                    continue;
                }
            } else if line == mk::PARA_START {
                if self.reset || !self.open {
                    self.close(output)?;
                    self.count += 1;
                    emit(output, mk::PARD_START)?;
                    emit(output, &ir::open_tag_with("paragraph-definition", &self.current.attrs()))?;
                    self.open = true;
                    self.reset = false;
                }
            } else {
                if BOUNDARIES.iter().any(|b| line.starts_with(b)) {
                    self.close(output)?;
                }
                if ir::is_control(&line) {
                    self.current.take(&line);
                }
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

    #[test]
    fn test_definition_attributes() {
        let input = stream(&[
            "mi<mk<body-open_",
            "cw<pf<par-def___<nu<true",
            "cw<ss<para-style<nu<heading 1",
            "cw<pf<left-inden<nu<36.00",
            "cw<pf<align_____<nu<center",
            "cw<pf<tab-kind__<nu<right",
            "cw<pf<tab-leader<nu<dot",
            "cw<pf<tab-stop__<nu<72.00",
            "cw<pf<tab-stop__<nu<144.50",
            "cw<bd<bor-par-bo<nu<bdr-single|bdr-li-wid:0.50",
            "mi<mk<para-start",
            "mi<tg<open______<para",
        ]);
        let out = run_on(&mut ParagraphDefinitions::new(), &input);
        assert!(out.contains(
            "mi<mk<pard-start\nmi<tg<open-att__<paragraph-definition<style>heading 1<left-indent>36.00<align>center<border-paragraph-bottom-line-style>single<border-paragraph-bottom-line-width>0.50<tabs>72:right:dot;144.5:left;\nmi<mk<para-start\n"
        ));
    }

    #[test]
    fn test_sticky_definitions() {
        let input = stream(&[
            "mi<mk<body-open_",
            "cw<pf<par-def___<nu<true",
            "mi<mk<para-start",
            "cw<pf<par-end___<nu<true",
            "mi<mk<para-start",
            "cw<tb<cell______<nu<true",
            "mi<mk<para-start",
            "cw<pf<par-def___<nu<true",
            "cw<pf<align_____<nu<right",
            "mi<mk<para-start",
            "mi<mk<body-close",
        ]);
        let mut pass = ParagraphDefinitions::new();
        assert_eq!(
            run_on(&mut pass, &input),
            stream(&[
                "mi<mk<body-open_",
                "cw<pf<par-def___<nu<true",
                "mi<mk<pard-start",
                "mi<tg<open-att__<paragraph-definition<style>Normal",
                "mi<mk<para-start",
                "cw<pf<par-end___<nu<true",
                "mi<mk<para-start",
                "mi<tg<close_____<paragraph-definition",
                "cw<tb<cell______<nu<true",
                "mi<mk<pard-start",
                "mi<tg<open-att__<paragraph-definition<style>Normal",
                "mi<mk<para-start",
                "cw<pf<par-def___<nu<true",
                "cw<pf<align_____<nu<right",
                "mi<tg<close_____<paragraph-definition",
                "mi<mk<pard-start",
                "mi<tg<open-att__<paragraph-definition<style>Normal<align>right",
                "mi<mk<para-start",
                "mi<tg<close_____<paragraph-definition",
                "mi<mk<body-close",
            ])
        );
        assert_eq!(pass.count(), 3);
    }
}
