//! rtf2xml - convert Rich Text Format documents to structured XML
//!
//! The conversion runs as a sequence of stream passes over a line-oriented
//! intermediate representation and produces XML describing the document's
//! preamble tables, sections, paragraphs, tables, lists, fields, footnotes
//! and inline formatting.
//!
//! # Example
//!
//! ```no_run
//! use rtf2xml::{ConvertOptions, RtfToXml};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ConvertOptions::new()
//!     .with_out_dir("out")
//!     .with_base_name("report")
//!     .with_indent();
//! let level = RtfToXml::new(options).convert_file("report.rtf", "out/report.xml")?;
//! if level > 0 {
//!     eprintln!("converted with warnings (level {})", level);
//! }
//! # Ok(())
//! # }
//! ```

/// Helpers shared by the passes (codepages, XML escaping)
pub mod common;

/// The RTF to XML pipeline
pub mod rtf;

pub use rtf::{ConvertOptions, RtfError, RtfResult, RtfToXml};
