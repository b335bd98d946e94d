//! Character maps for fonts whose glyphs are not in any codepage.
//!
//! Symbol, Wingdings and Zapf Dingbats place pictographs at ordinary byte
//! positions. Their maps, plus an uppercase table for code points where
//! `char::to_uppercase` yields more than one character, live in a small
//! sectioned data file:
//!
//! ```text
//! [ms_symbol]
//! 61 03B1
//! ```
//!
//! The packaged copy is compiled in; a replacement can be loaded from disk.

use super::error::{RtfError, RtfResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

const PACKAGED: &str = include_str!("char_set.data");

static PACKAGED_MAPS: Lazy<CharMaps> = Lazy::new(|| CharMaps::parse(PACKAGED));

/// Font whose text is remapped byte by byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFont {
    Symbol,
    Wingdings,
    ZapfDingbats,
}

impl SymbolFont {
    /// Recognize a font face name.
    pub fn from_face(face: &str) -> Option<Self> {
        let face = face.trim().to_ascii_lowercase();
        if face == "symbol" || face.starts_with("symbol ") {
            Some(SymbolFont::Symbol)
        } else if face.starts_with("wingdings") {
            Some(SymbolFont::Wingdings)
        } else if face.starts_with("zapf dingbats") || face.starts_with("zapfdingbats") || face == "dingbats" {
            Some(SymbolFont::ZapfDingbats)
        } else {
            None
        }
    }

    /// Section of the data file holding this font's map.
    pub fn section(&self) -> &'static str {
        match self {
            SymbolFont::Symbol => "ms_symbol",
            SymbolFont::Wingdings => "ms_wingdings",
            SymbolFont::ZapfDingbats => "ms_dingbats",
        }
    }
}

/// Parsed character maps, keyed by section name.
#[derive(Debug, Clone, Default)]
pub struct CharMaps {
    sections: HashMap<String, HashMap<u32, u32>>,
}

impl CharMaps {
    /// The maps compiled into the crate.
    pub fn packaged() -> &'static CharMaps {
        &PACKAGED_MAPS
    }

    /// Load maps from a file in the same format as the packaged data.
    pub fn load(path: &Path) -> RtfResult<CharMaps> {
        let data = std::fs::read_to_string(path)?;
        let maps = CharMaps::parse(&data);
        if maps.sections.is_empty() {
            return Err(RtfError::invalid_rtf(format!(
                "no character maps found in {}",
                path.display()
            )));
        }
        Ok(maps)
    }

    /// Parse sectioned map text. Malformed lines are skipped.
    pub fn parse(data: &str) -> CharMaps {
        let mut maps = CharMaps::default();
        let mut current: Option<String> = None;
        for (index, raw) in data.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(name.trim().to_string());
                maps.sections.entry(name.trim().to_string()).or_default();
                continue;
            }
            let Some(section) = current.as_ref() else {
                log::warn!("character map line {} outside any section", index + 1);
                continue;
            };
            let mut fields = line.split_whitespace();
            let parsed = fields
                .next()
                .zip(fields.next())
                .and_then(|(from, to)| {
                    Some((u32::from_str_radix(from, 16).ok()?, u32::from_str_radix(to, 16).ok()?))
                });
            match parsed {
                Some((from, to)) => {
                    if let Some(map) = maps.sections.get_mut(section) {
                        map.insert(from, to);
                    }
                },
                None => log::warn!("malformed character map line {}: {}", index + 1, line),
            }
        }
        maps
    }

    /// Look `key` up in `section`.
    pub fn get(&self, section: &str, key: u32) -> Option<u32> {
        self.sections.get(section)?.get(&key).copied()
    }

    /// Code point a byte of a symbol font stands for.
    #[inline]
    pub fn symbol(&self, font: SymbolFont, byte: u8) -> Option<u32> {
        self.get(font.section(), u32::from(byte))
    }

    /// Uppercase form of `c`, preferring the `caps_uni` table.
    pub fn uppercase(&self, c: char) -> String {
        if let Some(upper) = self.get("caps_uni", c as u32).and_then(char::from_u32) {
            return upper.to_string();
        }
        c.to_uppercase().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packaged_maps() {
        let maps = CharMaps::packaged();
        assert_eq!(maps.symbol(SymbolFont::Symbol, 0x61), Some(0x03B1));
        assert_eq!(maps.symbol(SymbolFont::Symbol, 0x44), Some(0x0394));
        assert_eq!(maps.symbol(SymbolFont::ZapfDingbats, 0x21), Some(0x2701));
        assert_eq!(maps.symbol(SymbolFont::Wingdings, 0xFC), Some(0x2714));
        assert_eq!(maps.uppercase('é'), "É");
        assert_eq!(maps.uppercase('ß'), "SS");
    }

    #[test]
    fn test_face_names() {
        assert_eq!(SymbolFont::from_face("Symbol"), Some(SymbolFont::Symbol));
        assert_eq!(SymbolFont::from_face("Wingdings 2"), Some(SymbolFont::Wingdings));
        assert_eq!(SymbolFont::from_face("Zapf Dingbats"), Some(SymbolFont::ZapfDingbats));
        assert_eq!(SymbolFont::from_face("Times New Roman"), None);
    }

    #[test]
    fn test_parse_skips_bad_lines() {
        let maps = CharMaps::parse("# maps\n[custom]\n41 0391\nnot a pair\n42\n");
        assert_eq!(maps.get("custom", 0x41), Some(0x0391));
        assert_eq!(maps.get("custom", 0x42), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chars.data");
        std::fs::write(&path, "[ms_symbol]\n61 0061\n").unwrap();
        let maps = CharMaps::load(&path).unwrap();
        assert_eq!(maps.symbol(SymbolFont::Symbol, 0x61), Some(0x61));

        std::fs::write(&path, "nothing here\n").unwrap();
        assert!(CharMaps::load(&path).is_err());
    }
}
