//! RTF lexer/tokenizer.
//!
//! Splits normalized RTF into one token per line. Braces stay as `{`/`}`,
//! control words and symbols keep their raw `\name123` form for the
//! classifier, and text is emitted as `tx<` lines:
//!
//! * plain runs → `tx<nu<__________<escaped text`
//! * `\'HH` → `tx<hx<__________<'hh`
//! * `\uN` → `tx<ut<__________<&#xNNNN;`, followed by skipping the
//!   `\uc` fallback units
//! * a `\u` surrogate pair → one `tx<ut` line for the combined code point
//! * `\{`, `\}`, `\\` → literal text

use super::diagnostics::Diagnostics;
use super::error::{RtfError, RtfResult};
use super::ir;
use super::pass::{Pass, emit};
use smallvec::SmallVec;
use std::io::{BufRead, Write};

/// Longest control word name accepted before the word is cut.
const MAX_WORD_LEN: usize = 32;

/// Stands in for surrogate halves that have no partner.
const REPLACEMENT: u32 = 0xFFFD;

/// RTF Lexer.
pub struct Lexer<'a> {
    /// Source input
    input: &'a [u8],
    /// Current position in bytes
    pos: usize,
    /// `\uc` value per open group
    uc_stack: SmallVec<[usize; 16]>,
    /// Fallback units still to be skipped after a `\u`
    skip: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        let mut uc_stack = SmallVec::new();
        uc_stack.push(1);
        Self {
            input,
            pos: 0,
            uc_stack,
            skip: 0,
        }
    }

    /// Tokenize the entire input into IR token lines.
    pub fn tokenize(&mut self) -> RtfResult<Vec<String>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(join_surrogates(tokens))
    }

    /// Get the next token, skipping fallback units of a preceding `\u`.
    fn next_token(&mut self) -> RtfResult<Option<String>> {
        loop {
            if self.pos >= self.input.len() {
                return Ok(None);
            }
            let token = match self.input[self.pos] {
                b'{' => {
                    self.pos += 1;
                    self.skip = 0;
                    let uc = self.current_uc();
                    self.uc_stack.push(uc);
                    Some("{".to_string())
                },
                b'}' => {
                    self.pos += 1;
                    self.skip = 0;
                    if self.uc_stack.len() > 1 {
                        self.uc_stack.pop();
                    }
                    Some("}".to_string())
                },
                b'\n' => {
                    self.pos += 1;
                    None
                },
                b'\\' => self.parse_control()?,
                _ => self.parse_text(),
            };
            if token.is_some() {
                return Ok(token);
            }
        }
    }

    #[inline]
    fn current_uc(&self) -> usize {
        self.uc_stack.last().copied().unwrap_or(1)
    }

    /// Consume one fallback unit if a skip is pending.
    #[inline]
    fn take_skip(&mut self) -> bool {
        if self.skip > 0 {
            self.skip -= 1;
            true
        } else {
            false
        }
    }

    /// Parse a control word or control symbol.
    fn parse_control(&mut self) -> RtfResult<Option<String>> {
        self.pos += 1; // Skip '\'

        let Some(&ch) = self.input.get(self.pos) else {
            return Err(RtfError::invalid_rtf("premature end of file after backslash"));
        };

        match ch {
            b'\\' | b'{' | b'}' => {
                self.pos += 1;
                if self.take_skip() {
                    return Ok(None);
                }
                let literal = (ch as char).to_string();
                return Ok(Some(ir::text(&literal)));
            },
            b'\'' => return self.parse_hex(),
            b'\n' => {
                self.pos += 1;
                if self.take_skip() {
                    return Ok(None);
                }
                return Ok(Some("\\par".to_string()));
            },
            _ if !ch.is_ascii_alphabetic() => {
                self.pos += 1;
                if self.take_skip() {
                    return Ok(None);
                }
                return Ok(Some(format!("\\{}", ch as char)));
            },
            _ => {},
        }

        let start = self.pos;
        while self.pos < self.input.len()
            && self.input[self.pos].is_ascii_alphabetic()
            && self.pos - start < MAX_WORD_LEN
        {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| RtfError::invalid_rtf("malformed control word"))?
            .to_string();

        let param = self.parse_numeric_parameter();

        // Skip optional space delimiter after control word
        if self.input.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }

        match word.as_str() {
            "u" => {
                let Some(value) = param else {
                    return Err(RtfError::invalid_rtf("malformed unicode escape \\u"));
                };
                if self.take_skip() {
                    return Ok(None);
                }
                let code = (if value < 0 { value + 65536 } else { value }) as u32;
                self.skip = self.current_uc();
                let code = if char::from_u32(code).is_some() || is_surrogate(code) {
                    code
                } else {
                    REPLACEMENT
                };
                return Ok(Some(ir::unicode_entity(code)));
            },
            "uc" => {
                let value = param.unwrap_or(1).max(0) as usize;
                if let Some(top) = self.uc_stack.last_mut() {
                    *top = value;
                }
            },
            "bin" => {
                let count = param.unwrap_or(0).max(0) as usize;
                self.pos = (self.pos + count).min(self.input.len());
                return Ok(None);
            },
            _ => {},
        }

        if self.take_skip() {
            return Ok(None);
        }

        Ok(Some(match param {
            Some(value) => format!("\\{}{}", word, value),
            None => format!("\\{}", word),
        }))
    }

    /// Parse numeric parameter after control word.
    fn parse_numeric_parameter(&mut self) -> Option<i32> {
        let start = self.pos;
        let mut end = self.pos;
        if self.input.get(end) == Some(&b'-') {
            end += 1;
        }
        let digits_start = end;
        while end < self.input.len() && self.input[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits_start {
            return None;
        }
        self.pos = end;
        let text = std::str::from_utf8(&self.input[start..end]).ok()?;
        // Out-of-range parameters saturate rather than fail
        Some(text.parse::<i64>().ok()?.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Parse hexadecimal character escape (\').
    fn parse_hex(&mut self) -> RtfResult<Option<String>> {
        self.pos += 1; // Skip '\''

        let hex = self
            .input
            .get(self.pos..self.pos + 2)
            .filter(|pair| pair.iter().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| RtfError::invalid_rtf("malformed hex escape \\'"))?;
        let value = format!("'{}", std::str::from_utf8(hex).unwrap_or("00").to_ascii_lowercase());
        self.pos += 2;

        if self.take_skip() {
            return Ok(None);
        }
        Ok(Some(ir::hex(&value)))
    }

    /// Parse plain text until a special character.
    fn parse_text(&mut self) -> Option<String> {
        let rest = &self.input[self.pos..];
        let len = memchr::memchr3(b'\\', b'{', b'}', rest).unwrap_or(rest.len());
        let run = &rest[..len];
        self.pos += len;

        let mut text = String::with_capacity(run.len());
        for &byte in run {
            if byte == b'\n' {
                continue;
            }
            if self.take_skip() {
                continue;
            }
            text.push(byte as char);
        }

        if text.is_empty() {
            return None;
        }
        Some(ir::text(&ir::escape_text(&text)))
    }
}

#[inline]
fn is_surrogate(code: u32) -> bool {
    (0xD800..=0xDFFF).contains(&code)
}

/// Code point of a `\u` token.
fn unicode_code(token: &str) -> Option<u32> {
    token
        .strip_prefix("tx<ut<__________<&#x")?
        .strip_suffix(';')
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
}

/// Join UTF-16 surrogate pairs written as two `\u` words into one code
/// point. Halves without a partner become U+FFFD.
fn join_surrogates(tokens: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let Some(code) = unicode_code(&token).filter(|c| is_surrogate(*c)) else {
            out.push(token);
            continue;
        };
        let low = iter
            .peek()
            .and_then(|next| unicode_code(next))
            .filter(|low| (0xDC00..=0xDFFF).contains(low));
        match low {
            Some(low) if code <= 0xDBFF => {
                iter.next();
                out.push(ir::unicode_entity(
                    0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00),
                ));
            },
            _ => out.push(ir::unicode_entity(REPLACEMENT)),
        }
    }
    out
}

/// Tokenizer pass.
#[derive(Debug, Default)]
pub struct Tokenize;

impl Pass for Tokenize {
    fn name(&self) -> &'static str {
        "tokenize"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let tokens = Lexer::new(&bytes).tokenize()?;
        log::debug!("tokenized {} tokens", tokens.len());
        for token in &tokens {
            emit(output, token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        Lexer::new(input.as_bytes()).tokenize().unwrap()
    }

    #[test]
    fn test_simple_tokenization() {
        let tokens = tokens(r"{\rtf1\ansi Hello}");
        assert_eq!(
            tokens,
            vec!["{", "\\rtf1", "\\ansi", "tx<nu<__________<Hello", "}"]
        );
    }

    #[test]
    fn test_escaped_braces_are_text() {
        let tokens = tokens(r"{a\{b\}\\}");
        assert_eq!(
            tokens,
            vec![
                "{",
                "tx<nu<__________<a",
                "tx<nu<__________<{",
                "tx<nu<__________<b",
                "tx<nu<__________<}",
                "tx<nu<__________<\\",
                "}",
            ]
        );
    }

    #[test]
    fn test_negative_parameter_and_symbol() {
        let tokens = tokens(r"\fi-360\~x");
        assert_eq!(tokens, vec!["\\fi-360", "\\~", "tx<nu<__________<x"]);
    }

    #[test]
    fn test_unicode_skips_alternate() {
        let tokens = tokens(r"\u233\'e9 x");
        assert_eq!(
            tokens,
            vec!["tx<ut<__________<&#x00E9;", "tx<nu<__________< x"]
        );
    }

    #[test]
    fn test_unicode_with_uc0_keeps_alternate() {
        let tokens = tokens(r"\uc0\u233\'e9");
        assert_eq!(
            tokens,
            vec!["\\uc0", "tx<ut<__________<&#x00E9;", "tx<hx<__________<'e9"]
        );
    }

    #[test]
    fn test_uc_is_group_scoped() {
        let tokens = tokens(r"{\uc2\u8212--}\u8212-");
        assert_eq!(
            tokens,
            vec![
                "{",
                "\\uc2",
                "tx<ut<__________<&#x2014;",
                "}",
                "tx<ut<__________<&#x2014;",
            ]
        );
    }

    #[test]
    fn test_negative_unicode() {
        let tokens = tokens(r"\u-3913?");
        assert_eq!(tokens, vec!["tx<ut<__________<&#xF0B7;"]);
    }

    #[test]
    fn test_surrogate_pair_joined() {
        let tokens = tokens(r"\uc0 x\u-10179\u-8694 y");
        assert_eq!(
            tokens,
            vec![
                "\\uc0",
                "tx<nu<__________<x",
                "tx<ut<__________<&#x1F60A;",
                "tx<nu<__________<y",
            ]
        );
    }

    #[test]
    fn test_lone_surrogates_replaced() {
        let tokens = tokens(r"\u-10179?x\u-8694?\u-10179?");
        assert_eq!(
            tokens,
            vec![
                "tx<ut<__________<&#xFFFD;",
                "tx<nu<__________<x",
                "tx<ut<__________<&#xFFFD;",
                "tx<ut<__________<&#xFFFD;",
            ]
        );
    }

    #[test]
    fn test_text_is_escaped_and_newlines_dropped() {
        let tokens = tokens("a <b>\n& c");
        assert_eq!(tokens, vec!["tx<nu<__________<a &lt;b&gt;&amp; c"]);
    }

    #[test]
    fn test_backslash_newline_is_par() {
        let tokens = tokens("a\\\nb");
        assert_eq!(
            tokens,
            vec!["tx<nu<__________<a", "\\par", "tx<nu<__________<b"]
        );
    }

    #[test]
    fn test_errors() {
        assert!(Lexer::new(b"abc\\").tokenize().is_err());
        assert!(Lexer::new(b"\\'zz").tokenize().is_err());
        assert!(Lexer::new(b"\\u x").tokenize().is_err());
    }
}
