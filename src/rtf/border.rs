//! Border support.
//!
//! RTF spreads one border over several words: a position word (`\brdrt`,
//! `\clbrdrl`, …) followed by style, width, spacing and color words. The
//! [`BorderCombine`] pass folds them into one line,
//!
//! ```text
//! cw<bd<bor-par-to<nu<bdr-hair__|bdr-li-wid:0.50|bdr-sp-wid:1.00|bdr-color_:2
//! ```
//!
//! and [`parse_border`] expands such a line into flat XML attributes.

use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use super::pass::{Pass, emit};
use std::io::{BufRead, Write};

/// Border style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// No border
    #[default]
    None,
    /// Single line border
    Single,
    /// Thick line border
    Thick,
    /// Shadowed border
    Shadowed,
    /// Double line border
    Double,
    /// Dotted border
    Dotted,
    /// Dashed border
    Dashed,
    /// Small dashes
    DashedSmall,
    /// Dot-dash border
    DotDash,
    /// Dot-dot-dash border
    DotDotDash,
    /// Hairline border
    Hairline,
    /// Inset border (3D)
    Inset,
    /// Outset border (3D)
    Outset,
    /// Triple line border
    Triple,
    /// Wavy border
    Wavy,
    /// Double wavy border
    WavyDouble,
    /// Embossed border
    Embossed,
    /// Engraved border
    Engraved,
}

impl BorderStyle {
    /// Style for a `bt` canonical name, if it is a style word.
    pub fn from_canonical(name: &str) -> Option<Self> {
        Some(match name {
            "bdr-single" => BorderStyle::Single,
            "bdr-thick_" => BorderStyle::Thick,
            "bdr-shadow" => BorderStyle::Shadowed,
            "bdr-double" => BorderStyle::Double,
            "bdr-dotted" => BorderStyle::Dotted,
            "bdr-dashed" => BorderStyle::Dashed,
            "bdr-dsh-sm" => BorderStyle::DashedSmall,
            "bdr-dot-ds" => BorderStyle::DotDash,
            "bdr-dot-dd" => BorderStyle::DotDotDash,
            "bdr-hair__" => BorderStyle::Hairline,
            "bdr-inset_" => BorderStyle::Inset,
            "bdr-outset" => BorderStyle::Outset,
            "bdr-triple" => BorderStyle::Triple,
            "bdr-wavy__" => BorderStyle::Wavy,
            "bdr-d-wav_" => BorderStyle::WavyDouble,
            "bdr-emboss" => BorderStyle::Embossed,
            "bdr-engrav" => BorderStyle::Engraved,
            "bdr-none__" => BorderStyle::None,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Single => "single",
            BorderStyle::Thick => "thick",
            BorderStyle::Shadowed => "shadowed",
            BorderStyle::Double => "double",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::DashedSmall => "dashed-small",
            BorderStyle::DotDash => "dot-dash",
            BorderStyle::DotDotDash => "dot-dot-dash",
            BorderStyle::Hairline => "hairline",
            BorderStyle::Inset => "inset",
            BorderStyle::Outset => "outset",
            BorderStyle::Triple => "triple",
            BorderStyle::Wavy => "wavy",
            BorderStyle::WavyDouble => "double-wavy",
            BorderStyle::Embossed => "emboss",
            BorderStyle::Engraved => "engrave",
        }
    }
}

/// Attribute prefix for a border position word (`bor-par-to` → `border-paragraph-top`).
pub fn position_name(name: &str) -> Option<String> {
    let (owner, side) = name.rsplit_once('-')?;
    let owner = match owner {
        "bor-par" => "border-paragraph",
        "bor-cel" => "border-cell",
        "bor-t-r" => "border-table-row",
        _ => return None,
    };
    let side = match side {
        "to" => "top",
        "bo" => "bottom",
        "le" => "left",
        "ri" => "right",
        "bx" => "box",
        "be" => "between",
        "ba" => "bar",
        "hi" => "horizontal-inside",
        "vi" => "vertical-inside",
        _ => return None,
    };
    Some(format!("{}-{}", owner, side))
}

/// Expand a combined border line into attributes.
///
/// `name` is the position word, `value` its combined value. A border with
/// no style word yields no attributes.
pub fn parse_border(name: &str, value: &str) -> ir::Attrs {
    let Some(prefix) = position_name(name) else {
        return Vec::new();
    };
    let mut style = None;
    let mut rest = Vec::new();
    for part in value.split('|') {
        match part.split_once(':') {
            Some((key, v)) => {
                let key = match key {
                    "bdr-li-wid" => "line-width",
                    "bdr-sp-wid" => "padding",
                    "bdr-color_" => "color",
                    _ => continue,
                };
                rest.push((format!("{}-{}", prefix, key), v.to_string()));
            },
            None => {
                if let Some(found) = BorderStyle::from_canonical(part) {
                    style = Some(found);
                }
            },
        }
    }
    let Some(style) = style else {
        return Vec::new();
    };
    let mut attrs = vec![(format!("{}-line-style", prefix), style.as_str().to_string())];
    attrs.extend(rest);
    attrs
}

/// One piece of a combined border value.
fn border_part(line: &str) -> String {
    let name = ir::cw_name(line);
    let value = ir::cw_value(line);
    if BorderStyle::from_canonical(name).is_some() || value == "true" {
        name.to_string()
    } else {
        format!("{}:{}", name, value)
    }
}

/// Folds border position + style words into single lines.
#[derive(Debug, Default)]
pub struct BorderCombine {
    pending: Option<String>,
}

impl BorderCombine {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self, output: &mut dyn Write) -> RtfResult<()> {
        if let Some(line) = self.pending.take() {
            emit(output, &line)?;
        }
        Ok(())
    }
}

impl Pass for BorderCombine {
    fn name(&self) -> &'static str {
        "border_combine"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        for line in input.lines() {
            let line = line?;
            if line.starts_with("cw<bd<") {
                self.flush(output)?;
                self.pending = Some(line);
                continue;
            }
            if line.starts_with("cw<bt<")
                && let Some(pending) = self.pending.as_mut()
            {
                let part = border_part(&line);
                if ir::cw_value(pending) == "true" {
                    let head = ir::prefix(pending).to_string();
                    *pending = format!("{}<nu<{}", head, part);
                } else {
                    pending.push('|');
                    pending.push_str(&part);
                }
                continue;
            }
            self.flush(output)?;
            emit(output, &line)?;
        }
        self.flush(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::pass::{run_on, stream};

    #[test]
    fn test_combine() {
        let input = stream(&[
            "cw<bd<bor-par-to<nu<true",
            "cw<bt<bdr-hair__<nu<true",
            "cw<bt<bdr-li-wid<nu<0.50",
            "cw<bt<bdr-sp-wid<nu<1.00",
            "cw<bt<bdr-color_<nu<2",
            "tx<nu<__________<text",
        ]);
        let out = run_on(&mut BorderCombine::new(), &input);
        assert_eq!(
            out,
            stream(&[
                "cw<bd<bor-par-to<nu<bdr-hair__|bdr-li-wid:0.50|bdr-sp-wid:1.00|bdr-color_:2",
                "tx<nu<__________<text",
            ])
        );
    }

    #[test]
    fn test_combine_is_idempotent() {
        let input = stream(&[
            "cw<tb<row-def___<nu<true",
            "cw<bd<bor-cel-le<nu<true",
            "cw<bt<bdr-single<nu<true",
            "cw<bt<bdr-li-wid<nu<0.75",
            "cw<bd<bor-cel-ri<nu<true",
            "cw<bt<bdr-double<nu<true",
            "cw<tb<cell-posit<nu<72.00",
        ]);
        let once = run_on(&mut BorderCombine::new(), &input);
        let twice = run_on(&mut BorderCombine::new(), &once);
        assert_eq!(once, twice);
        assert!(once.contains("cw<bd<bor-cel-le<nu<bdr-single|bdr-li-wid:0.75\n"));
        assert!(once.contains("cw<bd<bor-cel-ri<nu<bdr-double\n"));
    }

    #[test]
    fn test_parse_border() {
        let attrs = parse_border(
            "bor-par-to",
            "bdr-hair__|bdr-li-wid:0.50|bdr-sp-wid:1.00|bdr-color_:#ff0000",
        );
        assert_eq!(
            attrs,
            vec![
                ("border-paragraph-top-line-style".to_string(), "hairline".to_string()),
                ("border-paragraph-top-line-width".to_string(), "0.50".to_string()),
                ("border-paragraph-top-padding".to_string(), "1.00".to_string()),
                ("border-paragraph-top-color".to_string(), "#ff0000".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_border_positions() {
        assert_eq!(
            position_name("bor-t-r-hi").as_deref(),
            Some("border-table-row-horizontal-inside")
        );
        assert_eq!(position_name("bor-par-bx").as_deref(), Some("border-paragraph-box"));
        assert!(parse_border("bor-cel-bo", "true").is_empty());
        assert!(parse_border("unknown___", "bdr-single").is_empty());
    }
}
