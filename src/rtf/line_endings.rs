//! Raw input normalization.
//!
//! Line endings are unified to LF, control bytes that can never appear in
//! RTF are removed, and 8-bit bytes are rewritten as `\'HH` escapes so the
//! rest of the pipeline only ever sees 7-bit text. The payload of a
//! `\binN` word is copied through untouched so the lexer can skip exactly
//! `N` bytes.

use super::diagnostics::Diagnostics;
use super::error::{RtfError, RtfResult};
use super::pass::Pass;
use std::io::{BufRead, Write};

/// Normalizes line endings and illegal bytes.
#[derive(Debug, Clone)]
pub struct LineEndings {
    replace_illegals: bool,
}

impl LineEndings {
    pub fn new(replace_illegals: bool) -> Self {
        Self { replace_illegals }
    }

    /// Normalize a complete byte buffer.
    pub fn normalize(&self, bytes: &[u8]) -> RtfResult<Vec<u8>> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(RtfError::invalid_rtf("file appears to be empty"));
        }

        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let byte = bytes[i];
            match byte {
                b'\\' if bytes.get(i + 1) == Some(&b'\\') => {
                    out.extend_from_slice(b"\\\\");
                    i += 1;
                },
                b'\\' => {
                    if let Some((header, count)) = binary_header(&bytes[i..]) {
                        let end = (i + header + count).min(bytes.len());
                        out.extend_from_slice(&bytes[i..end]);
                        i = end;
                        continue;
                    }
                    out.push(byte);
                },
                b'\r' => {
                    out.push(b'\n');
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                },
                b'\n' | b'\t' => out.push(byte),
                0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F if self.replace_illegals => {},
                0x80..=0xFF => {
                    out.extend_from_slice(format!("\\'{:02x}", byte).as_bytes());
                },
                _ => out.push(byte),
            }
            i += 1;
        }
        Ok(out)
    }
}

/// Length of a `\binN ` header at the start of `bytes` and its byte count.
fn binary_header(bytes: &[u8]) -> Option<(usize, usize)> {
    let rest = bytes.strip_prefix(b"\\bin")?;
    let mut len = 0;
    if rest.first() == Some(&b'-') {
        len += 1;
    }
    let digits = rest[len..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 && rest.get(len).is_some_and(u8::is_ascii_alphabetic) {
        // a longer word such as `\binfsxn`
        return None;
    }
    let count = std::str::from_utf8(&rest[..len + digits])
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .map_or(0, |value| value.clamp(0, i64::from(i32::MAX)) as usize);
    len += digits;
    if rest.get(len) == Some(&b' ') {
        len += 1;
    }
    Some((4 + len, count))
}

impl Default for LineEndings {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Pass for LineEndings {
    fn name(&self) -> &'static str {
        "line_endings"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let normalized = self.normalize(&bytes)?;
        output.write_all(&normalized)?;
        Ok(())
    }
}
