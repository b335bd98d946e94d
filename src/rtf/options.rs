//! Conversion options.

use std::path::PathBuf;

/// Public identifier used when no DTD path is configured.
pub const DEFAULT_DTD_PUBLIC_ID: &str = "-//RTF2XML//DTD rtf2xml 1.0//EN";

/// Default system identifier paired with [`DEFAULT_DTD_PUBLIC_ID`].
pub const DEFAULT_DTD_SYSTEM_ID: &str = "http://rtf2xml.sourceforge.net/dtd/rtf2xml.dtd";

/// Options controlling one RTF to XML conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory for the picture side file (`<name>_rtf_pict_dir/picts.rtf`)
    pub out_dir: Option<PathBuf>,
    /// Base name used for the picture directory
    pub base_name: String,
    /// DTD reference: `None` uses the default public id, `Some("")` disables it
    pub dtd: Option<String>,
    /// Omit the DTD reference entirely
    pub no_dtd: bool,
    /// Directory receiving a snapshot of the IR after every pass
    pub deb_dir: Option<PathBuf>,
    /// Remap text in Symbol fonts to unicode
    pub convert_symbol: bool,
    /// Remap text in Wingdings fonts to unicode
    pub convert_wingdings: bool,
    /// Remap text in Zapf Dingbats fonts to unicode
    pub convert_zapf: bool,
    /// Uppercase text marked with `\caps`
    pub convert_caps: bool,
    /// Severity (1..=6) above which internal errors abort
    pub run_level: u8,
    /// Newlines between block-level elements
    pub indent: bool,
    /// Remove control bytes from the input
    pub replace_illegals: bool,
    /// Build `<list>`/`<item>` structure
    pub form_lists: bool,
    /// Promote `heading N` paragraphs to nested sections
    pub headings_to_sections: bool,
    /// Wrap consecutive same-style paragraphs in `<style-group>`
    pub group_styles: bool,
    /// Wrap consecutive same-border paragraphs in `<border-group>`
    pub group_borders: bool,
    /// Emit `<para/>` for a lone `\par`
    pub empty_paragraphs: bool,
    /// Character-map definitions replacing the packaged ones
    pub char_data: Option<PathBuf>,
    /// Codepage used when the document declares none
    pub default_encoding: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            out_dir: None,
            base_name: "doc".to_string(),
            dtd: None,
            no_dtd: false,
            deb_dir: None,
            convert_symbol: false,
            convert_wingdings: false,
            convert_zapf: false,
            convert_caps: false,
            run_level: 1,
            indent: false,
            replace_illegals: true,
            form_lists: true,
            headings_to_sections: true,
            group_styles: true,
            group_borders: true,
            empty_paragraphs: true,
            char_data: None,
            default_encoding: "cp1252".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory used for side files.
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Set the base name for side files.
    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = name.into();
        self
    }

    /// Set the DTD reference (empty string disables it).
    pub fn with_dtd(mut self, dtd: impl Into<String>) -> Self {
        self.dtd = Some(dtd.into());
        self
    }

    /// Omit the DTD reference.
    pub fn without_dtd(mut self) -> Self {
        self.no_dtd = true;
        self
    }

    /// Copy every intermediate stream into `dir`.
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.deb_dir = Some(dir.into());
        self
    }

    /// Enable Symbol, Wingdings and Zapf Dingbats remapping.
    pub fn with_symbol_fonts(mut self) -> Self {
        self.convert_symbol = true;
        self.convert_wingdings = true;
        self.convert_zapf = true;
        self
    }

    /// Enable caps conversion.
    pub fn with_caps(mut self) -> Self {
        self.convert_caps = true;
        self
    }

    /// Set the run level.
    pub fn with_run_level(mut self, level: u8) -> Self {
        self.run_level = level;
        self
    }

    /// Enable indentation of block elements.
    pub fn with_indent(mut self) -> Self {
        self.indent = true;
        self
    }

    /// Enable or disable list building.
    pub fn with_lists(mut self, form_lists: bool) -> Self {
        self.form_lists = form_lists;
        self
    }

    /// Enable or disable heading promotion.
    pub fn with_headings_to_sections(mut self, enabled: bool) -> Self {
        self.headings_to_sections = enabled;
        self
    }

    /// Enable or disable style and border grouping.
    pub fn with_grouping(mut self, styles: bool, borders: bool) -> Self {
        self.group_styles = styles;
        self.group_borders = borders;
        self
    }

    /// Enable or disable `<para/>` for empty paragraphs.
    pub fn with_empty_paragraphs(mut self, enabled: bool) -> Self {
        self.empty_paragraphs = enabled;
        self
    }

    /// Load character maps from a file instead of the packaged ones.
    pub fn with_char_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.char_data = Some(path.into());
        self
    }

    /// Set the fallback codepage name.
    pub fn with_default_encoding(mut self, name: impl Into<String>) -> Self {
        self.default_encoding = name.into();
        self
    }

    /// Directory receiving extracted pictures, if any.
    pub fn picture_dir(&self) -> Option<PathBuf> {
        self.out_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}_rtf_pict_dir", self.base_name)))
    }
}
