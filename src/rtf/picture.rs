//! Picture extraction.
//!
//! Each `{\pict …}` group is copied, as RTF, into a side file
//! (`<out_dir>/<base>_rtf_pict_dir/picts.rtf`) and replaced in the main
//! stream by a `pict-start` marker plus an empty `<pict/>` tag. RTF supports
//! several image formats:
//! - Windows Metafile (WMF)
//! - Enhanced Metafile (EMF)
//! - PNG
//! - JPEG
//! - DIB / device-dependent bitmaps
//! - Mac PICT

use super::control_words;
use super::diagnostics::Diagnostics;
use super::error::RtfResult;
use super::ir;
use super::pass::{Pass, emit, matching_close, read_all};
use crate::common::xml::unescape_text;
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Side file holding every extracted picture.
pub const PICTURE_FILE: &str = "picts.rtf";

/// Image type of an RTF picture, from its blip control word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    /// Enhanced Metafile
    Emf,
    /// Windows Metafile
    Wmf,
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// Bitmap (DIB or device dependent)
    Bitmap,
    /// Mac PICT format
    Pict,
    /// Unknown or unsupported format
    Unknown,
}

impl ImageType {
    /// Image type for a picture-category canonical name.
    fn from_blip(name: &str) -> Option<Self> {
        Some(match name {
            "png-blip__" => ImageType::Png,
            "jpeg-blip_" => ImageType::Jpeg,
            "emf-blip__" => ImageType::Emf,
            "wmetafile_" => ImageType::Wmf,
            "mac-pict__" => ImageType::Pict,
            "dib-bitmap" | "win-bitmap" => ImageType::Bitmap,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Emf => "emf",
            ImageType::Wmf => "wmf",
            ImageType::Png => "png",
            ImageType::Jpeg => "jpg",
            ImageType::Bitmap => "bmp",
            ImageType::Pict => "pict",
            ImageType::Unknown => "unknown",
        }
    }
}

/// Size information gathered from a picture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictInfo {
    /// Image type
    pub image_type: ImageType,
    /// Picture width (in twips, 1/1440 inch)
    pub width: Option<i32>,
    /// Picture height (in twips)
    pub height: Option<i32>,
    /// Goal width (desired width in twips)
    pub goal_width: Option<i32>,
    /// Goal height (desired height in twips)
    pub goal_height: Option<i32>,
    /// Horizontal scaling percentage
    pub scale_x: Option<i32>,
    /// Vertical scaling percentage
    pub scale_y: Option<i32>,
}

impl Default for PictInfo {
    fn default() -> Self {
        Self {
            image_type: ImageType::Unknown,
            width: None,
            height: None,
            goal_width: None,
            goal_height: None,
            scale_x: None,
            scale_y: None,
        }
    }
}

impl PictInfo {
    /// Collect the picture properties from the lines of one group.
    pub fn from_group(lines: &[String]) -> Self {
        let mut info = PictInfo::default();
        for line in lines.iter().filter(|l| ir::is_control(l) && ir::category(l) == "gr") {
            let name = ir::cw_name(line);
            if let Some(kind) = ImageType::from_blip(name) {
                info.image_type = kind;
                continue;
            }
            let value = ir::cw_value(line).parse().ok();
            match name {
                "pict-width" => info.width = value,
                "pict-hght_" => info.height = value,
                "pict-wgoal" => info.goal_width = value,
                "pict-hgoal" => info.goal_height = value,
                "pict-scl-x" => info.scale_x = value,
                "pict-scl-y" => info.scale_y = value,
                _ => {},
            }
        }
        info
    }

    /// Get the computed width in twips, considering scaling.
    #[inline]
    pub fn computed_width(&self) -> Option<i32> {
        self.goal_width.or(self.width).map(|w| scaled(w, self.scale_x))
    }

    /// Get the computed height in twips, considering scaling.
    #[inline]
    pub fn computed_height(&self) -> Option<i32> {
        self.goal_height
            .or(self.height)
            .map(|h| scaled(h, self.scale_y))
    }
}

/// Apply a percentage scale, saturating at the `i32` range.
fn scaled(value: i32, scale: Option<i32>) -> i32 {
    match scale {
        Some(scale) => {
            let product = i64::from(value) * i64::from(scale) / 100;
            product.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        },
        None => value,
    }
}

/// Render the lines of one group back to RTF.
pub fn to_rtf(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        if ir::is_open_bracket(line) {
            out.push('{');
        } else if ir::is_close_bracket(line) {
            out.push('}');
        } else if ir::is_control(line) {
            let value = ir::cw_value(line);
            let word = match ir::category(line) {
                "un" => Some(value.to_string()),
                category => control_words::rtf_word(category, ir::cw_name(line)).map(|word| {
                    if value == "true" {
                        word.to_string()
                    } else {
                        format!("{}{}", word, value)
                    }
                }),
            };
            if let Some(word) = word {
                out.push('\\');
                out.push_str(&word);
                out.push(' ');
            }
        } else if line.starts_with("tx<hx<") {
            out.push('\\');
            out.push_str(ir::value(line));
        } else if line.starts_with("tx<nu<") {
            out.push_str(&unescape_text(ir::value(line)));
        }
    }
    out
}

/// Extracts picture groups into a side file.
#[derive(Debug)]
pub struct Pictures {
    dir: Option<PathBuf>,
    count: usize,
    side: String,
}

impl Pictures {
    /// `dir` is the picture directory; `None` only replaces the groups.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            count: 0,
            side: String::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn write_side_file(&self) -> RtfResult<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        if self.count == 0 {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        let mut doc = String::from("{\\rtf1 {\\fonttbl\\f0\\fnil ;}{\\colortbl;}\\pard\\plain\n");
        doc.push_str(&self.side);
        doc.push_str("\\par}\n");
        fs::write(dir.join(PICTURE_FILE), doc)?;
        log::debug!("wrote {} picture(s) to {}", self.count, dir.display());
        Ok(())
    }
}

impl Pass for Pictures {
    fn name(&self) -> &'static str {
        "pictures"
    }

    fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        _diag: &mut Diagnostics,
    ) -> RtfResult<()> {
        let lines = read_all(input)?;
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let starts_picture = ir::is_open_bracket(line)
                && lines
                    .get(i + 1)
                    .is_some_and(|next| next.starts_with("cw<gr<picture___"));
            if !starts_picture {
                emit(output, line)?;
                i += 1;
                continue;
            }

            let end = matching_close(&lines, i + 1, ir::bracket_number(line))
                .unwrap_or(lines.len() - 1);
            let group = &lines[i..=end];
            let info = PictInfo::from_group(group);
            self.count += 1;
            self.side.push_str(&to_rtf(group));
            self.side.push('\n');

            let mut attrs = vec![
                ("num".to_string(), self.count.to_string()),
                ("type".to_string(), info.image_type.as_str().to_string()),
            ];
            if let Some(width) = info.computed_width() {
                attrs.push(("width".to_string(), format!("{:.2}", width as f64 / 20.0)));
            }
            if let Some(height) = info.computed_height() {
                attrs.push(("height".to_string(), format!("{:.2}", height as f64 / 20.0)));
            }
            emit(output, ir::mk::PICT_START)?;
            emit(output, &ir::empty_tag_with("pict", &attrs))?;
            i = end + 1;
        }
        self.write_side_file()
    }
}
