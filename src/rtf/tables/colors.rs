//! Color table.

use super::{NOT_DEFINED, TableResolver, reference, text_value, with_value};
use crate::rtf::diagnostics::Diagnostics;
use crate::rtf::ir;
use crate::rtf::preamble::TableKind;

/// Value of a color table entry with no components (the "auto" color).
pub const AUTO: &str = "auto";

/// Words whose value is a color table index.
const COLOR_REFERENCES: &[&str] = &[
    "cw<ci<font-color",
    "cw<ci<back-color",
    "cw<ci<highlight_",
    "cw<ci<under-colr",
    "cw<pf<shade-back",
    "cw<pf<shade-fore",
    "cw<tb<cell-shade",
];

/// RTF color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Color table containing document colors; `None` entries are "auto".
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<Option<Color>>,
}

impl ColorTable {
    /// Resolved value of color `index`.
    pub fn value(&self, index: i32) -> Option<String> {
        let entry = self.colors.get(usize::try_from(index).ok()?)?;
        Some(entry.map_or_else(|| AUTO.to_string(), |color| color.hex()))
    }

    fn resolve(&self, raw: &str, diag: &mut Diagnostics) -> String {
        match raw.parse().ok().and_then(|index| self.value(index)) {
            Some(value) => value,
            None => {
                diag.degrade(&format!("color {} not defined", raw));
                NOT_DEFINED.to_string()
            },
        }
    }
}

impl TableResolver for ColorTable {
    fn kind(&self) -> TableKind {
        TableKind::Color
    }

    fn collect(&mut self, lines: &[String]) {
        let mut current: Option<Color> = None;
        for line in lines {
            if line.starts_with("cw<ci<") {
                let component = u8::from_str_radix(ir::cw_value(line), 16).unwrap_or(0);
                match ir::cw_name(line) {
                    "red_______" => current.get_or_insert_with(Color::default).red = component,
                    "green_____" => current.get_or_insert_with(Color::default).green = component,
                    "blue______" => current.get_or_insert_with(Color::default).blue = component,
                    _ => {},
                }
            } else if let Some(text) = text_value(line) {
                for _ in text.matches(';') {
                    self.colors.push(current.take());
                }
            }
        }
    }

    fn table_lines(&self) -> Vec<String> {
        (0..self.colors.len())
            .filter_map(|index| {
                let value = self.value(index as i32)?;
                Some(ir::empty_tag_with(
                    "color-in-table",
                    &[("num", index.to_string()), ("value", value)],
                ))
            })
            .collect()
    }

    fn rewrite(&self, line: &str, diag: &mut Diagnostics) -> Option<String> {
        if COLOR_REFERENCES.iter().any(|prefix| line.starts_with(prefix)) {
            reference(line)?;
            let value = self.resolve(ir::cw_value(line), diag);
            return Some(with_value(line, &value));
        }
        if line.starts_with("cw<bd<") && line.contains("bdr-color_:") {
            let parts: Vec<String> = ir::cw_value(line)
                .split('|')
                .map(|part| match part.strip_prefix("bdr-color_:") {
                    Some(raw) if raw.parse::<i32>().is_ok() => {
                        format!("bdr-color_:{}", self.resolve(raw, diag))
                    },
                    _ => part.to_string(),
                })
                .collect();
            return Some(with_value(line, &parts.join("|")));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ColorTable {
        let lines: Vec<String> = [
            "ob<nu<open-brack<0002",
            "cw<ri<colr-table<nu<true",
            "tx<nu<__________<;",
            "cw<ci<red_______<nu<ff",
            "cw<ci<green_____<nu<00",
            "cw<ci<blue______<nu<00",
            "tx<nu<__________<;",
            "cw<ci<red_______<nu<00",
            "cw<ci<green_____<nu<80",
            "cw<ci<blue______<nu<ff",
            "tx<nu<__________<;",
            "cb<nu<clos-brack<0002",
        ]
        .iter()
        .map(|l| l.to_string())
        .collect();
        let mut colors = ColorTable::default();
        colors.collect(&lines);
        colors
    }

    #[test]
    fn test_entries() {
        let colors = table();
        assert_eq!(colors.value(0).as_deref(), Some("auto"));
        assert_eq!(colors.value(1).as_deref(), Some("#ff0000"));
        assert_eq!(colors.value(2).as_deref(), Some("#0080ff"));
        assert_eq!(colors.value(3), None);
        assert_eq!(
            colors.table_lines()[1],
            "mi<tg<empty-att_<color-in-table<num>1<value>#ff0000"
        );
    }

    #[test]
    fn test_rewrites() {
        let colors = table();
        let mut diag = Diagnostics::default();
        assert_eq!(
            colors.rewrite("cw<ci<font-color<nu<1", &mut diag).as_deref(),
            Some("cw<ci<font-color<nu<#ff0000")
        );
        assert_eq!(
            colors.rewrite("cw<ci<highlight_<nu<9", &mut diag).as_deref(),
            Some("cw<ci<highlight_<nu<not-defined")
        );
        assert_eq!(
            colors
                .rewrite("cw<bd<bor-par-to<nu<bdr-single|bdr-color_:2", &mut diag)
                .as_deref(),
            Some("cw<bd<bor-par-to<nu<bdr-single|bdr-color_:#0080ff")
        );
        assert_eq!(colors.rewrite("cw<ci<bold______<nu<true", &mut diag), None);
    }
}
