//! Conversion driver.
//!
//! [`RtfToXml`] runs every pass in order over a single active file inside a
//! scoped temp directory. Each pass reads the active file, writes its
//! successor next to it, and the successor is renamed over the original.
//! With a debug directory configured, a copy of the stream is kept after
//! every pass and the brace numbering is re-checked.
//!
//! # Example
//!
//! ```rust
//! use rtf2xml::rtf::{ConvertOptions, RtfToXml};
//!
//! let converter = RtfToXml::new(ConvertOptions::new().without_dtd());
//! let xml = converter.convert_str(r"{\rtf1\ansi Hello\par}")?;
//! assert!(xml.contains("<para>Hello</para>"));
//! # Ok::<(), rtf2xml::rtf::RtfError>(())
//! ```

use super::add_brackets::AddBrackets;
use super::body_styles::BodyStyles;
use super::border::BorderCombine;
use super::brackets::{self, Brackets};
use super::charmap::CharMaps;
use super::classify::Classify;
use super::decode::{Decode, DecodeScope, FontConversion};
use super::destinations::Destinations;
use super::diagnostics::Diagnostics;
use super::error::{RtfError, RtfResult};
use super::field::Fields;
use super::grouping::{GroupBy, Grouping};
use super::headings::Headings;
use super::inline::Inlines;
use super::lexer::Tokenize;
use super::line_endings::LineEndings;
use super::list::Lists;
use super::list_text::ListText;
use super::options::ConvertOptions;
use super::paragraph::Paragraphs;
use super::paragraph_def::ParagraphDefinitions;
use super::pass::Pass;
use super::picture::Pictures;
use super::preamble::Preamble;
use super::section::Sections;
use super::split::{Rejoin, Split, SplitKind};
use super::table::{TableInfo, Tables};
use super::tables::{
    ColorTable, DocInfo, FontTable, ListTable, OverrideTable, Resolve, RevisionTable, StyleSheet,
};
use super::writer::XmlWriter;
use crate::common::encoding::encoding_for_name;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ACTIVE_FILE: &str = "active.data";
const NEXT_FILE: &str = "next.data";

/// The active IR file and the bookkeeping around it.
struct Pipeline<'a> {
    options: &'a ConvertOptions,
    _dir: TempDir,
    active: PathBuf,
    next: PathBuf,
    diag: Diagnostics,
    /// Braces carry depth numbers that can be checked
    numbered: bool,
}

impl<'a> Pipeline<'a> {
    fn new(options: &'a ConvertOptions, input: &mut dyn Read) -> RtfResult<Self> {
        let dir = tempfile::tempdir()?;
        let active = dir.path().join(ACTIVE_FILE);
        let next = dir.path().join(NEXT_FILE);
        let mut file = BufWriter::new(File::create(&active)?);
        io::copy(input, &mut file)?;
        file.flush()?;
        if let Some(deb_dir) = &options.deb_dir {
            fs::create_dir_all(deb_dir)?;
        }
        Ok(Self {
            options,
            _dir: dir,
            active,
            next,
            diag: Diagnostics::new(options.run_level),
            numbered: false,
        })
    }

    fn run(&mut self, pass: &mut dyn Pass) -> RtfResult<()> {
        log::debug!("pass {} started", pass.name());
        {
            let mut reader = BufReader::new(File::open(&self.active)?);
            let mut writer = BufWriter::new(File::create(&self.next)?);
            pass.run(&mut reader, &mut writer, &mut self.diag)?;
            writer.flush()?;
        }
        fs::rename(&self.next, &self.active)?;
        log::debug!("pass {} finished", pass.name());

        match pass.name() {
            "brackets" => self.numbered = true,
            "add_brackets" => self.numbered = false,
            _ => {},
        }
        self.snapshot(pass.name())
    }

    fn snapshot(&self, name: &str) -> RtfResult<()> {
        let Some(deb_dir) = &self.options.deb_dir else {
            return Ok(());
        };
        fs::copy(&self.active, deb_dir.join(format!("{}.data", name)))?;
        if self.numbered && name != "xml" {
            let reader = BufReader::new(File::open(&self.active)?);
            if let Err(line) = brackets::check(reader.lines().map_while(Result::ok)) {
                log::error!("brace numbering broken after {} at line {}", name, line);
            }
        }
        Ok(())
    }

    fn finish(self, output: &mut dyn Write) -> RtfResult<u8> {
        let mut reader = BufReader::new(File::open(&self.active)?);
        io::copy(&mut reader, output)?;
        output.flush()?;
        Ok(self.diag.exit_level())
    }
}

/// Converts RTF documents to XML.
#[derive(Debug, Clone, Default)]
pub struct RtfToXml {
    options: ConvertOptions,
}

impl RtfToXml {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert the file at `input` and write the XML to `output`.
    ///
    /// Returns the exit level: 0 for a clean run, otherwise the highest
    /// severity recorded.
    pub fn convert_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> RtfResult<u8> {
        let mut reader = BufReader::new(File::open(input.as_ref())?);
        let mut writer = BufWriter::new(File::create(output.as_ref())?);
        self.convert_to_writer(&mut reader, &mut writer)
    }

    /// Convert RTF read from `reader`, writing XML to `writer`.
    pub fn convert_to_writer<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> RtfResult<u8> {
        let mut pipeline = Pipeline::new(&self.options, &mut reader)?;
        self.run_passes(&mut pipeline)?;
        let level = pipeline.finish(&mut writer)?;
        if level > 0 {
            log::warn!("conversion finished with exit level {}", level);
        }
        Ok(level)
    }

    /// Convert an RTF string to an XML string.
    pub fn convert_str(&self, rtf: &str) -> RtfResult<String> {
        let mut out = Vec::new();
        self.convert_to_writer(rtf.as_bytes(), &mut out)?;
        String::from_utf8(out)
            .map_err(|_| RtfError::invalid_code("serializer produced invalid UTF-8", None))
    }

    fn run_passes(&self, pipeline: &mut Pipeline<'_>) -> RtfResult<()> {
        let options = &self.options;
        let encoding = encoding_for_name(&options.default_encoding).ok_or_else(|| {
            RtfError::invalid_code(
                format!("unknown default encoding {}", options.default_encoding),
                None,
            )
        })?;
        let maps = match &options.char_data {
            Some(path) => Cow::Owned(CharMaps::load(path)?),
            None => Cow::Borrowed(CharMaps::packaged()),
        };
        let conversion = FontConversion::from_options(options);

        pipeline.run(&mut LineEndings::new(options.replace_illegals))?;
        pipeline.run(&mut Tokenize)?;
        pipeline.run(&mut Classify::new())?;
        pipeline.run(&mut Brackets)?;
        let mut destinations = Destinations::new();
        pipeline.run(&mut destinations)?;
        pipeline.run(&mut Pictures::new(options.picture_dir()))?;
        pipeline.run(&mut BorderCombine::new())?;
        pipeline.run(&mut Split::new(SplitKind::Footnote))?;
        pipeline.run(&mut Split::new(SplitKind::Header))?;
        pipeline.run(&mut ListText::new())?;
        pipeline.run(&mut Preamble::new())?;
        pipeline.run(&mut Decode::new(
            DecodeScope::Preamble,
            encoding,
            maps.clone(),
            conversion,
        ))?;

        pipeline.run(&mut Resolve::new("fonts", FontTable::default()))?;
        pipeline.run(&mut Resolve::new("colors", ColorTable::default()))?;
        pipeline.run(&mut Resolve::new("styles", StyleSheet::default()))?;
        pipeline.run(&mut Resolve::new("list_table", ListTable::default()))?;
        pipeline.run(&mut Resolve::new("override_table", OverrideTable::default()))?;
        pipeline.run(&mut Resolve::new("revisions", RevisionTable::default()))?;
        pipeline.run(&mut Resolve::new("info", DocInfo::default()))?;

        if destinations.groups_seen() > 0 {
            let mut shim = AddBrackets::new();
            pipeline.run(&mut shim)?;
            log::debug!("wrapped {} body-level formatting run(s)", shim.wrapped());
            pipeline.run(&mut Brackets)?;
        }

        pipeline.run(&mut Fields::new())?;
        pipeline.run(&mut Sections::new())?;
        pipeline.run(&mut Paragraphs::new(options.empty_paragraphs))?;
        pipeline.run(&mut ParagraphDefinitions::new())?;
        pipeline.run(&mut BodyStyles::new())?;
        pipeline.run(&mut Tables::new())?;
        pipeline.run(&mut TableInfo)?;
        if options.form_lists {
            pipeline.run(&mut Lists::new())?;
        }
        if options.headings_to_sections {
            pipeline.run(&mut Headings::new())?;
        }
        if options.group_styles {
            pipeline.run(&mut Grouping::new(GroupBy::Style))?;
        }
        if options.group_borders {
            pipeline.run(&mut Grouping::new(GroupBy::Border))?;
        }
        pipeline.run(&mut Inlines::new())?;
        pipeline.run(&mut Decode::new(DecodeScope::Body, encoding, maps, conversion))?;
        pipeline.run(&mut Rejoin::new(SplitKind::Footnote))?;
        pipeline.run(&mut Rejoin::new(SplitKind::Header))?;
        pipeline.run(&mut XmlWriter::from_options(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn convert(rtf: &str) -> String {
        RtfToXml::new(ConvertOptions::new().without_dtd())
            .convert_str(rtf)
            .expect("conversion failed")
    }

    fn convert_with(options: ConvertOptions, rtf: &str) -> String {
        RtfToXml::new(options.without_dtd())
            .convert_str(rtf)
            .expect("conversion failed")
    }

    #[test]
    fn test_minimal_document() {
        let xml = convert(r"{\rtf1\ansi Hello\par}");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"US-ASCII\" ?>\n<doc>"));
        assert_eq!(xml.matches("<section").count(), 1);
        assert_eq!(xml.matches("<para>").count(), 1);
        assert!(xml.contains("<para>Hello</para>"));
        assert!(xml.contains("<preamble>"));
        assert!(xml.trim_end().ends_with("</doc>"));
    }

    #[test]
    fn test_default_doctype() {
        let xml = RtfToXml::default()
            .convert_str(r"{\rtf1\ansi Hello\par}")
            .unwrap();
        assert!(xml.contains(
            "<!DOCTYPE doc PUBLIC \"-//RTF2XML//DTD rtf2xml 1.0//EN\" \"http://rtf2xml.sourceforge.net/dtd/rtf2xml.dtd\">"
        ));
    }

    #[test]
    fn test_unicode_with_ansi_alternate() {
        let xml = convert(r"{\rtf1\ansi\uc1 caf\u233\'e9\par}");
        assert!(xml.contains("caf&#x00E9;</para>"));

        let xml = convert(r"{\rtf1\ansi\uc0 caf\u233\'e9\par}");
        assert!(xml.contains("caf&#x00E9;&#x00E9;</para>"));
    }

    #[test]
    fn test_simple_table() {
        let xml = convert(
            r"{\rtf1\ansi \trowd\cellx1440\cellx2880 A\cell B\cell\row C\cell D\cell\row}",
        );
        assert!(xml.contains("<table"));
        assert!(xml.contains("number-of-rows=\"2\""));
        assert!(xml.contains("number-of-columns=\"2\""));
        assert_eq!(xml.matches("<row").count(), 2);
        assert_eq!(xml.matches("<cell width=\"72.00\"").count(), 4);
        for text in ["A", "B", "C", "D"] {
            assert!(xml.contains(&format!("<para>{}</para>", text)), "{} outside a paragraph", text);
        }
        let second_cell = xml.match_indices("<cell ").nth(1).map(|(i, _)| i).unwrap();
        let second_end = second_cell + xml[second_cell..].find("</cell>").unwrap();
        assert!(xml[second_cell..second_end].contains(">B<"));
    }

    #[test]
    fn test_sections_inside_body() {
        let mut out = Vec::new();
        let options = ConvertOptions::new().without_dtd().with_run_level(5);
        let level = RtfToXml::new(options)
            .convert_to_writer(r"{\rtf1\ansi one\par\sect two\par}".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(level, 0);

        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("<body><section num=\"1\""));
        assert!(xml.contains("</section><section num=\"2\""));
        assert!(xml.contains("</section></body>"));
        let body = xml.find("<body>").unwrap();
        let body_end = xml.find("</body>").unwrap();
        assert!(xml.match_indices("<section ").all(|(i, _)| body < i && i < body_end));
        assert!(xml.contains(">one</para>"));
        assert!(xml.contains(">two</para>"));
    }

    #[test]
    fn test_heading_becomes_section() {
        let rtf = r"{\rtf1{\stylesheet{\s1 heading 1;}{\s0 Normal;}}\pard\s1 Title\par\pard\s0 text\par}";
        let xml = convert(rtf);
        assert!(xml.contains("type=\"heading\""));
        let heading = xml.find("type=\"heading\"").unwrap();
        let title = xml.find("Title").unwrap();
        let text = xml.find(">text<").unwrap();
        assert!(heading < title && title < text);
        // the heading section closes inside the rtf section
        assert!(xml.contains("</section></section></body>"));
    }

    #[test]
    fn test_list_items_and_nesting() {
        let rtf = concat!(
            r"{\rtf1\ansi",
            r"\pard\ls1\li720 para1\par",
            r"\pard\ls1\li720 para2\par",
            r"\pard\ls1\ilvl1\li1440 para3\par",
            r"\pard after\par}",
        );
        let xml = convert(rtf);
        assert_eq!(xml.matches("<list ").count(), 2);
        assert_eq!(xml.matches("<item>").count(), 3);

        let first_item = xml.find("<item>").unwrap();
        let para1 = xml.find(">para1<").unwrap();
        let para2 = xml.find(">para2<").unwrap();
        let nested = xml.match_indices("<list ").nth(1).map(|(i, _)| i).unwrap();
        let para3 = xml.find(">para3<").unwrap();
        assert!(first_item < para1 && para1 < para2 && para2 < nested && nested < para3);
        // the nested list sits inside the second item
        assert!(!xml[para2..nested].contains("</item>"));
        assert!(xml[para3..].contains("</list></item></list>"));

        let after = xml.find(">after<").unwrap();
        assert!(xml.rfind("</list>").unwrap() < after);
    }

    #[test]
    fn test_symbol_font_switch() {
        let rtf = r"{\rtf1\ansi{\fonttbl{\f0 Times;}{\f1 Symbol;}}\f0 x {\f1\'61}\par}";
        let xml = convert_with(ConvertOptions::new().with_symbol_fonts(), rtf);
        assert!(xml.contains("<font-in-table num=\"0\" name=\"Times\"/>"));
        assert!(xml.contains("<font-in-table num=\"1\" name=\"Symbol\"/>"));
        assert!(xml.contains("&#x03B1;"));

        let plain = convert(rtf);
        assert!(!plain.contains("&#x03B1;"));
    }

    #[test]
    fn test_nested_bold_italic() {
        let xml = convert(r"{\rtf1\ansi {\b bold {\i bolditalic} still-bold}\par}");
        assert!(xml.contains(
            "<inline bold=\"true\">bold <inline italic=\"true\">bolditalic</inline> still-bold</inline>"
        ));
    }

    #[test]
    fn test_empty_input() {
        let err = RtfToXml::default().convert_str("  \n").unwrap_err();
        assert!(err.is_invalid_rtf());
        assert!(err.to_string().contains("file appears to be empty"));
    }

    #[test]
    fn test_missing_rtf_header() {
        let err = RtfToXml::default().convert_str("{\\ansi Hello}").unwrap_err();
        assert!(err.to_string().contains("doesn't start with \\rtf"));
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = RtfToXml::default().convert_str(r"{\rtf1\ansi {Hello\par}").unwrap_err();
        assert!(err.is_invalid_rtf());
    }

    #[test]
    fn test_leading_par() {
        let xml = convert(r"{\rtf1\ansi \par Hello\par}");
        assert!(xml.contains("<para/>"));

        let options = ConvertOptions::new().with_empty_paragraphs(false);
        let xml = convert_with(options, r"{\rtf1\ansi \par Hello\par}");
        assert!(!xml.contains("<para/>"));
        assert!(xml.contains("<para>Hello</para>"));
    }

    #[test]
    fn test_file_conversion_with_snapshots() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.rtf");
        let output = dir.path().join("out.xml");
        let debug = dir.path().join("debug");
        fs::write(&input, "{\\rtf1\\ansi\r\nHello\\par\r\n}").unwrap();

        let options = ConvertOptions::new().with_debug_dir(&debug);
        let level = RtfToXml::new(options).convert_file(&input, &output).unwrap();
        assert!(level < crate::rtf::diagnostics::INTERNAL_LEVEL);
        assert!(fs::read_to_string(&output).unwrap().contains("Hello"));
        assert!(debug.join("tokenize.data").exists());
        assert!(debug.join("brackets.data").exists());
        assert!(debug.join("xml.data").exists());
    }

    #[test]
    fn test_optional_passes_off() {
        let rtf = r"{\rtf1\ansi{\stylesheet{\s1 heading 1;}}\pard\s1 Title\par}";
        let options = ConvertOptions::new()
            .with_lists(false)
            .with_headings_to_sections(false)
            .with_grouping(false, false);
        let xml = convert_with(options, rtf);
        assert!(!xml.contains("type=\"heading\""));
        assert!(!xml.contains("<style-group"));
        assert!(xml.contains("Title"));
    }
}
