//! Hex escapes and special characters to unicode.
//!
//! Runs twice: over the preamble before the tables are resolved (so font and
//! style names are readable), and over the body once the inline tagger has
//! marked where fonts and caps change.
//!
//! * `tx<hx` bytes are decoded through the document codepage, or through a
//!   symbol font's map while one is active. Consecutive bytes are decoded
//!   together so multi-byte codepages work.
//! * `tx<mc` special characters become character references.
//! * `tx<nu`/`tx<ut` text is remapped inside symbol fonts and uppercased
//!   inside caps runs.
//!
//! Bytes with no mapping become `<udef_symbol num=.. description=not-in-table/>`.

use super::charmap::{CharMaps, SymbolFont};
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir::{self, mk};
use super::options::ConvertOptions;
use super::pass::{Pass, emit};
use crate::common::encoding::{codepage_to_encoding, decode_bytes, is_multi_byte};
use crate::common::xml::unescape_text;
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::io::{BufRead, Write};

/// Which part of the document a decoder instance converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeScope {
    Preamble,
    Body,
}

/// Which font remappings are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FontConversion {
    pub symbol: bool,
    pub wingdings: bool,
    pub zapf: bool,
    pub caps: bool,
}

impl FontConversion {
    pub fn from_options(options: &ConvertOptions) -> Self {
        Self {
            symbol: options.convert_symbol,
            wingdings: options.convert_wingdings,
            zapf: options.convert_zapf,
            caps: options.convert_caps,
        }
    }

    fn enabled(&self, font: SymbolFont) -> bool {
        match font {
            SymbolFont::Symbol => self.symbol,
            SymbolFont::Wingdings => self.wingdings,
            SymbolFont::ZapfDingbats => self.zapf,
        }
    }
}

/// Code point of a `tx<mc` special character, `None` for ones that are dropped.
pub(crate) fn special_char(name: &str) -> Option<u32> {
    Some(match name {
        "tab" => 0x0009,
        "emdash" => 0x2014,
        "endash" => 0x2013,
        "bullet" => 0x2022,
        "lquote" => 0x2018,
        "rquote" => 0x2019,
        "ldblquote" => 0x201C,
        "rdblquote" => 0x201D,
        "non-breaking-space" => 0x00A0,
        "non-breaking-hyphen" => 0x2011,
        "optional-hyphen" => 0x00AD,
        "emspace" => 0x2003,
        "enspace" => 0x2002,
        "qmspace" => 0x2005,
        "zero-width-joiner" => 0x200D,
        "zero-width-non-joiner" => 0x200C,
        "left-to-right-mark" => 0x200E,
        "right-to-left-mark" => 0x200F,
        _ => return None,
    })
}

/// Special characters that are structural rather than textual.
fn break_element(name: &str) -> Option<&'static str> {
    match name {
        "line-break" => Some("line-break"),
        "page-break" => Some("page-break"),
        "column-break" => Some("column-break"),
        _ => None,
    }
}

/// The decoder pass.
pub struct Decode {
    scope: DecodeScope,
    maps: Cow<'static, CharMaps>,
    conversion: FontConversion,
    default_encoding: &'static Encoding,
    declared: Option<&'static Encoding>,
    char_set: Option<&'static Encoding>,
    fonts: Vec<Option<SymbolFont>>,
    caps: Vec<bool>,
}

impl Decode {
    pub fn new(
        scope: DecodeScope,
        default_encoding: &'static Encoding,
        maps: Cow<'static, CharMaps>,
        conversion: FontConversion,
    ) -> Self {
        Self {
            scope,
            maps,
            conversion,
            default_encoding,
            declared: None,
            char_set: None,
            fonts: Vec::new(),
            caps: Vec::new(),
        }
    }

    fn encoding(&self) -> &'static Encoding {
        self.declared
            .or(self.char_set)
            .unwrap_or(self.default_encoding)
    }

    fn symbol_font(&self) -> Option<SymbolFont> {
        self.fonts
            .last()
            .copied()
            .flatten()
            .filter(|font| self.conversion.enabled(*font))
    }

    fn caps_active(&self) -> bool {
        self.conversion.caps && self.symbol_font().is_none() && self.caps.last() == Some(&true)
    }

    fn note_header_word(&mut self, line: &str) {
        if line.starts_with("cw<ri<ansi-codpg") {
            self.declared = ir::cw_value(line).parse().ok().and_then(codepage_to_encoding);
        } else if line.starts_with("cw<ri<char-set__") {
            self.char_set = match ir::cw_value(line) {
                "mac" => Some(encoding_rs::MACINTOSH),
                "pc" => codepage_to_encoding(437),
                "pca" => codepage_to_encoding(850),
                _ => None,
            };
        }
    }

    /// Emit decoded characters: ASCII runs as text, everything else as references.
    fn emit_chars(&self, output: &mut dyn Write, chars: &str, caps: bool) -> RtfResult<()> {
        let upper;
        let chars = if caps {
            upper = chars.chars().map(|c| self.maps.uppercase(c)).collect::<String>();
            upper.as_str()
        } else {
            chars
        };
        let mut ascii = String::new();
        for c in chars.chars() {
            if c.is_ascii() {
                ascii.push(c);
                continue;
            }
            if !ascii.is_empty() {
                emit(output, &ir::text(&ir::escape_text(&ascii)))?;
                ascii.clear();
            }
            emit(output, &ir::unicode_entity(c as u32))?;
        }
        if !ascii.is_empty() {
            emit(output, &ir::text(&ir::escape_text(&ascii)))?;
        }
        Ok(())
    }

    fn undefined(&self, output: &mut dyn Write, num: &str, diag: &mut Diagnostics) -> RtfResult<()> {
        diag.degrade(&format!("byte {} not in table", num));
        emit(
            output,
            &ir::empty_tag_with("udef_symbol", &[("num", num), ("description", "not-in-table")]),
        )
    }

    fn flush_hex(&self, pending: &mut Vec<u8>, output: &mut dyn Write, diag: &mut Diagnostics) -> RtfResult<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let bytes = std::mem::take(pending);
        if let Some(font) = self.symbol_font() {
            for byte in bytes {
                match self.maps.symbol(font, byte).and_then(char::from_u32) {
                    Some(c) => self.emit_chars(output, c.encode_utf8(&mut [0; 4]), false)?,
                    None => self.undefined(output, &format!("{:02x}", byte), diag)?,
                }
            }
            return Ok(());
        }

        let encoding = self.encoding();
        let caps = self.caps_active();
        if is_multi_byte(encoding) {
            let decoded = decode_bytes(encoding, &bytes);
            let run: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            for (index, piece) in decoded.split('\u{FFFD}').enumerate() {
                if index > 0 {
                    self.undefined(output, &run, diag)?;
                }
                self.emit_chars(output, piece, caps)?;
            }
            return Ok(());
        }
        for byte in bytes {
            let decoded = decode_bytes(encoding, &[byte]);
            if decoded.contains('\u{FFFD}') {
                self.undefined(output, &format!("{:02x}", byte), diag)?;
            } else {
                self.emit_chars(output, &decoded, caps)?;
            }
        }
        Ok(())
    }

    /// Rewrite a text line inside a symbol font or caps run.
    fn convert_text(&self, line: &str, output: &mut dyn Write) -> RtfResult<()> {
        if let Some(font) = self.symbol_font() {
            let mapped: String = unescape_text(ir::value(line))
                .chars()
                .map(|c| {
                    u8::try_from(c as u32)
                        .ok()
                        .and_then(|byte| self.maps.symbol(font, byte))
                        .and_then(char::from_u32)
                        .unwrap_or(c)
                })
                .collect();
            return self.emit_chars(output, &mapped, false);
        }
        if self.caps_active() {
            return self.emit_chars(output, &unescape_text(ir::value(line)), true);
        }
        emit(output, line)
    }

    fn convert_entity(&self, line: &str, output: &mut dyn Write) -> RtfResult<()> {
        let code = ir::value(line)
            .strip_prefix("&#x")
            .and_then(|rest| rest.strip_suffix(';'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match code {
            Some(c) if self.caps_active() => self.emit_chars(output, c.encode_utf8(&mut [0; 4]), true),
            _ => emit(output, line),
        }
    }

    fn convert_special(&self, line: &str, output: &mut dyn Write) -> RtfResult<()> {
        let name = ir::value(line);
        if let Some(element) = break_element(name) {
            return emit(output, &ir::empty_tag(element));
        }
        match special_char(name) {
            Some(code) => emit(output, &ir::unicode_entity(code)),
            None => Ok(()),
        }
    }

    fn track_marker(&mut self, line: &str) -> bool {
        if let Some(face) = line.strip_prefix(mk::FONT).and_then(|v| v.strip_prefix('<')) {
            self.fonts.push(SymbolFont::from_face(face));
        } else if line == mk::FONT_END {
            self.fonts.pop();
        } else if let Some(flag) = line.strip_prefix(mk::CAPS).and_then(|v| v.strip_prefix('<')) {
            self.caps.push(flag == "true");
        } else if line == mk::CAPS_END {
            self.caps.pop();
        } else {
            return false;
        }
        true
    }
}

impl Pass for Decode {
    fn name(&self) -> &'static str {
        match self.scope {
            DecodeScope::Preamble => "decode_preamble",
            DecodeScope::Body => "decode_body",
        }
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut in_scope = self.scope == DecodeScope::Preamble;
        let mut pending = Vec::new();

        for line in input.lines() {
            let line = line?;
            if in_scope && line.starts_with("tx<hx") {
                let byte = ir::value(&line)
                    .strip_prefix('\'')
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = byte {
                    pending.push(byte);
                    continue;
                }
            }
            self.flush_hex(&mut pending, output, diag)?;

            if line.starts_with("cw<ri<") {
                self.note_header_word(&line);
            }
            if line == mk::BODY_OPEN {
                in_scope = self.scope == DecodeScope::Body;
                emit(output, &line)?;
                continue;
            }
            if !in_scope {
                emit(output, &line)?;
                continue;
            }
            if self.scope == DecodeScope::Body && self.track_marker(&line) {
                continue;
            }
            match ir::prefix(&line) {
                "tx<nu<__________" => self.convert_text(&line, output)?,
                "tx<ut<__________" => self.convert_entity(&line, output)?,
                "tx<mc<__________" => self.convert_special(&line, output)?,
                _ => emit(output, &line)?,
            }
        }
        self.flush_hex(&mut pending, output, diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, run_with, stream};

    fn body(conversion: FontConversion) -> Decode {
        Decode::new(
            DecodeScope::Body,
            encoding_rs::WINDOWS_1252,
            Cow::Borrowed(CharMaps::packaged()),
            conversion,
        )
    }

    #[test]
    fn test_codepage_bytes() {
        let input = stream(&[
            "cw<ri<ansi-codpg<nu<1252",
            "mi<mk<body-open_",
            "tx<nu<__________<caf",
            "tx<hx<__________<'e9",
            "tx<mc<__________<emdash",
            "tx<mc<__________<line-break",
        ]);
        assert_eq!(
            run_on(&mut body(FontConversion::default()), &input),
            stream(&[
                "cw<ri<ansi-codpg<nu<1252",
                "mi<mk<body-open_",
                "tx<nu<__________<caf",
                "tx<ut<__________<&#x00E9;",
                "tx<ut<__________<&#x2014;",
                "mi<tg<empty_____<line-break",
            ])
        );
    }

    #[test]
    fn test_multi_byte_run() {
        let input = stream(&[
            "cw<ri<ansi-codpg<nu<936",
            "mi<mk<body-open_",
            "tx<hx<__________<'c4",
            "tx<hx<__________<'e3",
            "tx<hx<__________<'41",
        ]);
        assert_eq!(
            run_on(&mut body(FontConversion::default()), &input),
            stream(&[
                "cw<ri<ansi-codpg<nu<936",
                "mi<mk<body-open_",
                "tx<ut<__________<&#x4F60;",
                "tx<nu<__________<A",
            ])
        );
    }

    #[test]
    fn test_unmapped_byte() {
        let input = stream(&["cw<ri<ansi-codpg<nu<1253", "mi<mk<body-open_", "tx<hx<__________<'aa"]);
        let mut diag = Diagnostics::default();
        let out = run_with(&mut body(FontConversion::default()), &input, &mut diag).unwrap();
        assert!(out.contains("mi<tg<empty-att_<udef_symbol<num>aa<description>not-in-table"));
        assert_eq!(diag.exit_level(), 1);
    }

    #[test]
    fn test_symbol_font() {
        let input = stream(&[
            "mi<mk<body-open_",
            "mi<mk<font______<Symbol",
            "tx<hx<__________<'61",
            "tx<nu<__________<b",
            "mi<mk<font-end__",
            "tx<hx<__________<'61",
        ]);
        let conversion = FontConversion {
            symbol: true,
            ..FontConversion::default()
        };
        assert_eq!(
            run_on(&mut body(conversion), &input),
            stream(&[
                "mi<mk<body-open_",
                "tx<ut<__________<&#x03B1;",
                "tx<ut<__________<&#x03B2;",
                "tx<nu<__________<a",
            ])
        );
        // switched off: plain codepage decoding
        assert!(run_on(&mut body(FontConversion::default()), &input).contains("tx<nu<__________<a\ntx<nu<__________<b\n"));
    }

    #[test]
    fn test_caps_runs() {
        let input = stream(&[
            "mi<mk<body-open_",
            "mi<mk<caps______<true",
            "tx<nu<__________<fish &amp; chips",
            "tx<ut<__________<&#x00E9;",
            "mi<mk<caps______<false",
            "tx<nu<__________<quiet",
            "mi<mk<caps-end__",
            "mi<mk<caps-end__",
            "tx<nu<__________<after",
        ]);
        let conversion = FontConversion {
            caps: true,
            ..FontConversion::default()
        };
        assert_eq!(
            run_on(&mut body(conversion), &input),
            stream(&[
                "mi<mk<body-open_",
                "tx<nu<__________<FISH &amp; CHIPS",
                "tx<ut<__________<&#x00C9;",
                "tx<nu<__________<quiet",
                "tx<nu<__________<after",
            ])
        );
    }

    #[test]
    fn test_preamble_scope_leaves_body() {
        let input = stream(&[
            "cw<ri<char-set__<nu<mac",
            "tx<hx<__________<'8e",
            "mi<mk<body-open_",
            "tx<hx<__________<'8e",
        ]);
        let mut pass = Decode::new(
            DecodeScope::Preamble,
            encoding_rs::WINDOWS_1252,
            Cow::Borrowed(CharMaps::packaged()),
            FontConversion::default(),
        );
        assert_eq!(
            run_on(&mut pass, &input),
            stream(&[
                "cw<ri<char-set__<nu<mac",
                "tx<ut<__________<&#x00E9;",
                "mi<mk<body-open_",
                "tx<hx<__________<'8e",
            ])
        );
    }
}
