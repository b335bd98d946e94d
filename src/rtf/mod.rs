//! RTF to XML conversion.
//!
//! The converter is a chain of passes over a line-oriented intermediate
//! representation (see [`ir`]). Early passes tokenize and classify the RTF,
//! the middle ones resolve the preamble tables and infer document structure
//! (sections, paragraphs, tables, lists, headings, inline runs), and the
//! last one serializes the result as XML.
//!
//! # Architecture
//!
//! - **Lexing**: line normalization, tokenizing, control-word classification
//! - **Cleanup**: brace numbering, destination pruning, picture extraction,
//!   border combining, footnote and header splitting
//! - **Tables**: preamble division and the font/color/style/list resolvers
//! - **Structure**: fields, sections, paragraphs, definitions, tables, lists,
//!   headings, grouping, inline runs
//! - **Output**: text decoding and XML serialization
//!
//! # Example
//!
//! ```rust
//! use rtf2xml::rtf::{ConvertOptions, RtfToXml};
//!
//! let options = ConvertOptions::new().without_dtd().with_indent();
//! let xml = RtfToXml::new(options).convert_str(r"{\rtf1\ansi {\b Hello} World\par}")?;
//! assert!(xml.contains("<inline bold=\"true\">Hello</inline>"));
//! # Ok::<(), rtf2xml::rtf::RtfError>(())
//! ```

pub mod add_brackets;
pub mod body_styles;
pub mod border;
pub mod brackets;
pub mod charmap;
pub mod classify;
pub mod control_words;
pub mod controller;
pub mod decode;
pub mod destinations;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod grouping;
pub mod headings;
pub mod inline;
pub mod ir;
pub mod languages;
pub mod lexer;
pub mod line_endings;
pub mod list;
pub mod list_text;
pub mod options;
pub mod paragraph;
pub mod paragraph_def;
pub mod pass;
pub mod picture;
pub mod preamble;
pub mod section;
pub mod split;
pub mod table;
pub mod tables;
pub mod writer;

// Re-exports
pub use controller::RtfToXml;
pub use diagnostics::Diagnostics;
pub use error::{RtfError, RtfResult};
pub use options::ConvertOptions;
pub use pass::Pass;
