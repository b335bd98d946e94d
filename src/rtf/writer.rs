//! XML serializer.
//!
//! The last pass: tag lines become elements, text lines become character
//! data (already escaped), everything else is dropped. The document gets an
//! XML declaration naming `US-ASCII` when every byte is ASCII and `UTF-8`
//! otherwise, and an optional DOCTYPE.

use super::diagnostics::{Diagnostics, INTERNAL_LEVEL};
use super::error::RtfResult;
use super::ir::{self, TagKind};
use super::options::{ConvertOptions, DEFAULT_DTD_PUBLIC_ID, DEFAULT_DTD_SYSTEM_ID};
use super::pass::Pass;
use crate::common::xml::escape_attr;
use std::io::{BufRead, Write};

/// Elements that start on a new line when indenting.
const BLOCK_ELEMENTS: &[&str] = &[
    "doc",
    "preamble",
    "body",
    "font-table",
    "color-table",
    "style-table",
    "list-table",
    "section",
    "para",
    "cell",
    "row",
    "table",
    "list",
    "item",
    "style-group",
    "border-group",
    "styles-in-body",
    "list-in-table",
    "override-table",
    "override-list",
    "revision-table",
    "doc-information",
    "page-definition",
    "section-definition",
    "headers-and-footers",
    "paragraph-definition",
    "field-block",
    "footnote",
    "header-or-footer",
];

/// Block elements that are also preceded by a blank line.
const SEPARATED_ELEMENTS: &[&str] = &["preamble", "body", "section", "table"];

/// Which DOCTYPE to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doctype {
    None,
    Public { public_id: String, system_id: String },
    System(String),
}

impl Doctype {
    pub fn from_options(options: &ConvertOptions) -> Self {
        if options.no_dtd {
            return Doctype::None;
        }
        match options.dtd.as_deref() {
            None => Doctype::Public {
                public_id: DEFAULT_DTD_PUBLIC_ID.to_string(),
                system_id: DEFAULT_DTD_SYSTEM_ID.to_string(),
            },
            Some("") => Doctype::None,
            Some(path) => Doctype::System(path.to_string()),
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Doctype::None => None,
            Doctype::Public {
                public_id,
                system_id,
            } => Some(format!(
                "<!DOCTYPE doc PUBLIC \"{}\" \"{}\">",
                public_id, system_id
            )),
            Doctype::System(path) => Some(format!("<!DOCTYPE doc SYSTEM \"{}\">", path)),
        }
    }
}

/// Turns the final IR stream into XML.
#[derive(Debug)]
pub struct XmlWriter {
    indent: bool,
    doctype: Doctype,
    open: Vec<String>,
}

impl XmlWriter {
    pub fn new(indent: bool, doctype: Doctype) -> Self {
        Self {
            indent,
            doctype,
            open: Vec::new(),
        }
    }

    pub fn from_options(options: &ConvertOptions) -> Self {
        Self::new(options.indent, Doctype::from_options(options))
    }

    fn break_before(&self, element: &str, kind: TagKind, body: &mut String) {
        if !self.indent || !BLOCK_ELEMENTS.contains(&element) {
            return;
        }
        // `</para>` follows its text directly
        if kind == TagKind::Close && element == "para" {
            return;
        }
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        if kind == TagKind::Open && SEPARATED_ELEMENTS.contains(&element) && !body.ends_with("\n\n") {
            body.push('\n');
        }
    }

    fn write_tag(&mut self, tag: &ir::Tag<'_>, body: &mut String, diag: &mut Diagnostics, line: usize) -> RtfResult<()> {
        self.break_before(tag.element, tag.kind, body);
        match tag.kind {
            TagKind::Open | TagKind::Empty => {
                body.push('<');
                body.push_str(tag.element);
                for (key, value) in &tag.attrs {
                    body.push(' ');
                    body.push_str(key);
                    body.push_str("=\"");
                    body.push_str(&escape_attr(value));
                    body.push('"');
                }
                if tag.kind == TagKind::Empty {
                    body.push('/');
                } else {
                    self.open.push(tag.element.to_string());
                }
                body.push('>');
            },
            TagKind::Close => {
                match self.open.last() {
                    Some(top) if top == tag.element => {
                        self.open.pop();
                    },
                    top => {
                        let message = format!(
                            "</{}> closes <{}>",
                            tag.element,
                            top.map(String::as_str).unwrap_or("nothing")
                        );
                        diag.report(INTERNAL_LEVEL, &message, Some(line))?;
                        if let Some(pos) = self.open.iter().rposition(|e| e == tag.element) {
                            // close what was left open inside it
                            while self.open.len() > pos + 1 {
                                if let Some(inner) = self.open.pop() {
                                    body.push_str(&format!("</{}>", inner));
                                }
                            }
                            self.open.pop();
                        } else {
                            return Ok(());
                        }
                    },
                }
                body.push_str("</");
                body.push_str(tag.element);
                body.push('>');
            },
        }
        Ok(())
    }
}

impl Pass for XmlWriter {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut body = String::new();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if let Some(tag) = ir::parse_tag(&line) {
                self.write_tag(&tag, &mut body, diag, index + 1)?;
            } else if line.starts_with("tx<nu<") || line.starts_with("tx<ut<") {
                body.push_str(ir::value(&line));
            }
        }
        if !self.open.is_empty() {
            diag.report(
                INTERNAL_LEVEL,
                &format!("{} element(s) left open", self.open.len()),
                None,
            )?;
            while let Some(element) = self.open.pop() {
                body.push_str(&format!("</{}>", element));
            }
        }

        let encoding = if body.is_ascii() { "US-ASCII" } else { "UTF-8" };
        writeln!(output, "<?xml version=\"1.0\" encoding=\"{}\" ?>", encoding)?;
        if let Some(doctype) = self.doctype.render() {
            writeln!(output, "{}", doctype)?;
        }
        output.write_all(body.trim_start_matches('\n').as_bytes())?;
        output.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, run_with, stream};

    fn simple() -> String {
        stream(&[
            "mi<tg<open______<doc",
            "ob<nu<open-brack<0001",
            "mi<tg<open-att__<section<num>1",
            "mi<tg<open______<para",
            "tx<nu<__________<Tom &amp; Jerry",
            "tx<ut<__________<&#x00E9;",
            "mi<tg<empty-att_<font-in-table<name>Say \"hi\"",
            "mi<tg<close_____<para",
            "mi<tg<empty_____<para",
            "mi<tg<close_____<section",
            "cb<nu<clos-brack<0001",
            "mi<tg<close_____<doc",
        ])
    }

    #[test]
    fn test_elements_and_text() {
        let out = run_on(&mut XmlWriter::new(false, Doctype::None), &simple());
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"US-ASCII\" ?>\n\
             <doc><section num=\"1\"><para>Tom &amp; Jerry&#x00E9;<font-in-table name=\"Say &quot;hi&quot;\"/></para><para/></section></doc>\n"
        );
    }

    #[test]
    fn test_doctype_and_encoding() {
        let input = stream(&["mi<tg<open______<doc", "tx<nu<__________<caf\u{e9}", "mi<tg<close_____<doc"]);
        let out = run_on(&mut XmlWriter::new(false, Doctype::System("rtf2xml.dtd".into())), &input);
        assert!(out.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<!DOCTYPE doc SYSTEM \"rtf2xml.dtd\">\n<doc>"
        ));

        let options = ConvertOptions::default();
        assert!(matches!(Doctype::from_options(&options), Doctype::Public { .. }));
        assert_eq!(Doctype::from_options(&options.clone().with_dtd("")), Doctype::None);
        assert_eq!(Doctype::from_options(&options.without_dtd()), Doctype::None);
    }

    #[test]
    fn test_indentation() {
        let out = run_on(&mut XmlWriter::new(true, Doctype::None), &simple());
        assert!(out.contains("<doc>\n\n<section num=\"1\">\n<para>Tom"));
        assert!(out.contains("name=\"Say &quot;hi&quot;\"/></para>\n<para/>\n</section>\n</doc>"));
    }

    #[test]
    fn test_mismatched_close_repaired() {
        let input = stream(&[
            "mi<tg<open______<doc",
            "mi<tg<open______<para",
            "mi<tg<open______<inline",
            "mi<tg<close_____<para",
            "mi<tg<close_____<doc",
        ]);
        let mut diag = Diagnostics::new(1);
        let out = run_with(&mut XmlWriter::new(false, Doctype::None), &input, &mut diag).unwrap();
        assert!(out.ends_with("<doc><para><inline></inline></para></doc>\n"));
        assert_eq!(diag.exit_level(), INTERNAL_LEVEL);

        let mut strict = Diagnostics::new(6);
        assert!(run_with(&mut XmlWriter::new(false, Doctype::None), &input, &mut strict).is_err());
    }
}
