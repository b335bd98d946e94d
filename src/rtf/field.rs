//! Field and bookmark resolution.
//!
//! RTF fields are structured as:
//! {\field{\*\fldinst FIELD_INSTRUCTION}{\fldrslt FIELD_RESULT}}
//!
//! The instruction group is replaced by a `<field>` element around the
//! result. Fields whose result spans paragraphs become `<field-block>`
//! elements fenced by markers that keep sections and paragraphs from
//! crossing them. Bookmark groups become `<bookmark-start/>` and
//! `<bookmark-end/>`.

use super::decode::special_char;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::pass::{Pass, emit, matching_close, read_all};
use crate::common::encoding::{codepage_to_encoding, decode_bytes};
use crate::common::xml::unescape_text;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::io::{BufRead, Write};

/// Field type in RTF documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Hyperlink field
    Hyperlink,
    /// Cross-reference
    Reference,
    /// Page number of a bookmark
    PageReference,
    /// Footnote number of a bookmark
    NoteReference,
    /// Page number
    Page,
    NumberOfPages,
    /// Date/time
    Date,
    Time,
    /// Table of contents
    Toc,
    TocEntry,
    /// Equation/formula
    Equation,
    /// Index
    Index,
    IndexEntry,
    /// Character from a symbol font
    Symbol,
    IncludePicture,
    Sequence,
    MergeField,
    /// Unknown or custom field
    Unknown,
}

impl FieldType {
    fn from_keyword(word: &str) -> Self {
        match word.to_ascii_uppercase().as_str() {
            "HYPERLINK" => FieldType::Hyperlink,
            "REF" => FieldType::Reference,
            "PAGEREF" => FieldType::PageReference,
            "NOTEREF" => FieldType::NoteReference,
            "PAGE" => FieldType::Page,
            "NUMPAGES" => FieldType::NumberOfPages,
            "DATE" | "CREATEDATE" | "SAVEDATE" | "PRINTDATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "TOC" => FieldType::Toc,
            "TC" => FieldType::TocEntry,
            "EQ" => FieldType::Equation,
            "INDEX" => FieldType::Index,
            "XE" => FieldType::IndexEntry,
            "SYMBOL" => FieldType::Symbol,
            "INCLUDEPICTURE" => FieldType::IncludePicture,
            "SEQ" => FieldType::Sequence,
            "MERGEFIELD" => FieldType::MergeField,
            _ => FieldType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Hyperlink => "hyperlink",
            FieldType::Reference => "reference",
            FieldType::PageReference => "page-reference",
            FieldType::NoteReference => "note-reference",
            FieldType::Page => "page",
            FieldType::NumberOfPages => "number-of-pages",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Toc => "toc",
            FieldType::TocEntry => "toc-entry",
            FieldType::Equation => "equation",
            FieldType::Index => "index",
            FieldType::IndexEntry => "index-entry",
            FieldType::Symbol => "symbol",
            FieldType::IncludePicture => "include-picture",
            FieldType::Sequence => "sequence",
            FieldType::MergeField => "merge-field",
            FieldType::Unknown => "none",
        }
    }
}

/// Split an instruction into words, keeping quoted arguments whole.
fn instruction_words(instruction: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut rest = instruction.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').unwrap_or(quoted.len());
            words.push(&quoted[..end]);
            rest = quoted.get(end + 1..).unwrap_or("").trim_start();
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            words.push(&rest[..end]);
            rest = rest[end..].trim_start();
        }
    }
    words
}

/// Parsed RTF field instruction.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    /// Field type
    pub field_type: FieldType,
    /// Field instruction (the command)
    pub instruction: Cow<'a, str>,
}

impl<'a> Field<'a> {
    /// Parse a field instruction to extract the type and parameters.
    pub fn parse_instruction(instruction: &'a str) -> Self {
        let keyword = instruction.split_whitespace().next().unwrap_or("");
        Self {
            field_type: FieldType::from_keyword(keyword),
            instruction: Cow::Borrowed(instruction),
        }
    }

    /// Value of the `type` attribute; unknown fields keep their keyword.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self.field_type {
            FieldType::Unknown => match self.instruction.split_whitespace().next() {
                Some(keyword) => Cow::Owned(keyword.to_ascii_lowercase()),
                None => Cow::Borrowed(FieldType::Unknown.as_str()),
            },
            other => Cow::Borrowed(other.as_str()),
        }
    }

    /// First argument after the keyword that is not a switch.
    fn argument(&self) -> Option<&str> {
        instruction_words(&self.instruction)
            .into_iter()
            .skip(1)
            .take_while(|word| !word.starts_with('\\'))
            .next()
    }

    /// Argument following `switch` (e.g. `\l`).
    fn switch(&self, switch: &str) -> Option<&str> {
        let words = instruction_words(&self.instruction);
        let at = words.iter().position(|word| *word == switch)?;
        words.get(at + 1).copied()
    }

    /// Extract URL from a HYPERLINK field instruction.
    ///
    /// HYPERLINK fields have format: HYPERLINK "url" \o "tooltip"
    pub fn extract_url(&self) -> Option<&str> {
        if self.field_type != FieldType::Hyperlink {
            return None;
        }
        self.argument()
    }

    /// Extract bookmark name from a REF/PAGEREF/NOTEREF instruction or a
    /// hyperlink's `\l` anchor.
    pub fn extract_bookmark(&self) -> Option<&str> {
        match self.field_type {
            FieldType::Reference | FieldType::PageReference | FieldType::NoteReference => self.argument(),
            FieldType::Hyperlink => self.switch("\\l"),
            _ => None,
        }
    }

    /// Attributes for the `<field>` element.
    pub fn attrs(&self) -> ir::Attrs {
        let mut attrs = vec![("type".to_string(), self.type_name().into_owned())];
        let mut push = |key: &str, value: Option<&str>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                attrs.push((key.to_string(), ir::escape_text(value)));
            }
        };
        match self.field_type {
            FieldType::Hyperlink => {
                push("link", self.extract_url());
                push("bookmark", self.extract_bookmark());
            },
            FieldType::Reference | FieldType::PageReference | FieldType::NoteReference => {
                push("bookmark", self.extract_bookmark());
            },
            FieldType::Symbol => {
                push("number", self.argument());
                push("font", self.switch("\\f"));
            },
            FieldType::IncludePicture => push("link", self.argument()),
            FieldType::Date | FieldType::Time => push("date-format", self.switch("\\@")),
            FieldType::Page | FieldType::NumberOfPages => {},
            _ => push("argument", self.argument()),
        }
        attrs
    }
}

/// Plain text of the lines of a field instruction group.
fn instruction_text(lines: &[String], encoding: &'static Encoding) -> String {
    let mut text = String::new();
    let mut bytes = Vec::new();
    for line in lines {
        if let Some(hex) = line.strip_prefix("tx<hx<__________<'") {
            if let Ok(byte) = u8::from_str_radix(hex, 16) {
                bytes.push(byte);
            }
            continue;
        }
        if !bytes.is_empty() {
            text.push_str(&decode_bytes(encoding, &bytes));
            bytes.clear();
        }
        if let Some(value) = line.strip_prefix("tx<nu<__________<") {
            text.push_str(&unescape_text(value));
        } else if let Some(c) = line
            .strip_prefix("tx<ut<__________<&#x")
            .and_then(|v| v.strip_suffix(';'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32)
        {
            text.push(c);
        } else if let Some(c) = line
            .strip_prefix("tx<mc<__________<")
            .and_then(special_char)
            .and_then(char::from_u32)
        {
            text.push(c);
        }
    }
    if !bytes.is_empty() {
        text.push_str(&decode_bytes(encoding, &bytes));
    }
    text
}

/// Resolves `\field` and bookmark groups.
#[derive(Debug)]
pub struct Fields {
    count: usize,
    /// Codepage of `\'hh` bytes inside instructions
    encoding: &'static Encoding,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            count: 0,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields converted.
    pub fn count(&self) -> usize {
        self.count
    }

    fn transform(&mut self, lines: &[String], output: &mut dyn Write) -> RtfResult<()> {
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if ir::is_open_bracket(line) {
                let next = lines.get(i + 1).map(String::as_str).unwrap_or("");
                let num = ir::bracket_number(line);
                let end = matching_close(lines, i + 1, num);
                match end {
                    Some(end) if next.starts_with("cw<fd<field_____") => {
                        self.field(&lines[i..=end], output)?;
                        i = end + 1;
                        continue;
                    },
                    Some(end) if next.starts_with("cw<an<bookmk-beg") || next.starts_with("cw<an<bookmk-end") => {
                        let element = if next.starts_with("cw<an<bookmk-beg") {
                            "bookmark-start"
                        } else {
                            "bookmark-end"
                        };
                        let name: String = lines[i + 2..end]
                            .iter()
                            .filter_map(|l| l.strip_prefix("tx<nu<__________<"))
                            .collect();
                        emit(output, &ir::empty_tag_with(element, &[("name", name.trim())]))?;
                        i = end + 1;
                        continue;
                    },
                    _ => {},
                }
            }
            emit(output, line)?;
            i += 1;
        }
        Ok(())
    }

    /// Convert one `{\field …}` group (brackets included).
    fn field(&mut self, group: &[String], output: &mut dyn Write) -> RtfResult<()> {
        self.count += 1;
        let last = group.len() - 1;
        let mut instruction = String::new();
        let mut result: Option<(usize, usize)> = None;
        let mut loose = Vec::new();

        let mut j = 2;
        while j < last {
            let line = &group[j];
            if ir::is_open_bracket(line) {
                let end = matching_close(group, j + 1, ir::bracket_number(line)).unwrap_or(last - 1);
                let first = group.get(j + 1).map(String::as_str).unwrap_or("");
                if first.starts_with("cw<fd<field-inst") {
                    instruction.push_str(&instruction_text(&group[j + 1..end], self.encoding));
                } else if first.starts_with("cw<fd<field-rslt") {
                    result = Some((j, end));
                } else {
                    loose.extend(group[j..=end].iter().cloned());
                }
                j = end + 1;
                continue;
            }
            if !line.starts_with("cw<fd<") {
                loose.push(line.clone());
            }
            j += 1;
        }

        let field = Field::parse_instruction(instruction.trim());
        let attrs = field.attrs();
        let block = result.is_some_and(|(start, end)| {
            group[start..end]
                .iter()
                .any(|l| l.starts_with("cw<pf<par-end___"))
        });
        log::debug!(
            "field {} ({})",
            field.type_name(),
            if block { "block" } else { "inline" }
        );

        if block {
            emit(output, mk::SECTION_FIELD_BEGIN)?;
            emit(output, mk::FIELD_BLOCK_START)?;
            emit(output, &ir::open_tag_with("field-block", &attrs))?;
        }
        emit(output, &group[0])?;
        if !block {
            emit(output, mk::INLINE_FIELD)?;
        }
        match result {
            Some((start, end)) => {
                if !block {
                    emit(output, &ir::open_tag_with("field", &attrs))?;
                }
                // formatting on the field group applies to its result
                emit(output, &group[start])?;
                for line in &loose {
                    emit(output, line)?;
                }
                self.transform(&group[start + 2..end], output)?;
                emit(output, &group[end])?;
                if !block {
                    emit(output, &ir::close_tag("field"))?;
                }
            },
            None => {
                for line in &loose {
                    emit(output, line)?;
                }
                emit(output, &ir::empty_tag_with("field", &attrs))?;
            },
        }
        emit(output, &group[last])?;
        if block {
            emit(output, mk::FIELD_BLOCK_END)?;
            emit(output, &ir::close_tag("field-block"))?;
            emit(output, mk::SECTION_FIELD_END)?;
        }
        Ok(())
    }
}

impl Pass for Fields {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        if let Some(encoding) = lines
            .iter()
            .find(|l| l.starts_with("cw<ri<ansi-codpg"))
            .and_then(|l| ir::cw_value(l).parse().ok())
            .and_then(codepage_to_encoding)
        {
            self.encoding = encoding;
        }
        self.transform(&lines, output)
    }
}
