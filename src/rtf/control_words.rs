//! Closed table of recognized RTF control words.
//!
//! Each RTF word maps to a category, a canonical ten character name and the
//! handler that shapes its value. Anything not listed is classified as
//! `cw<un<…` by the classifier.

use phf::phf_map;

/// How a control word's parameter becomes an IR value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Parameter as-is, `true` when absent
    Default,
    /// `0` → `false`, anything else → `true`
    Bool,
    /// Twips to points
    DivideBy20,
    /// Half-points to points
    DivideBy2,
    /// Color component as two hex digits
    Color,
    /// The word itself carries the value; a `0` parameter turns it off
    TwoPart(&'static str),
    /// List numbering type
    ListType,
    /// Locale identifier
    Language,
    /// Special character, emitted as `tx<mc<`
    MsSub(&'static str),
    /// `\nosupersub` clears both sub- and superscript
    NoSuperSub,
}

/// Table entry for one RTF word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWord {
    pub category: &'static str,
    pub name: &'static str,
    pub handler: Handler,
}

const fn w(category: &'static str, name: &'static str, handler: Handler) -> ControlWord {
    ControlWord {
        category,
        name,
        handler,
    }
}

use Handler::{
    Bool, Color, Default as Plain, DivideBy2, DivideBy20, Language, ListType, MsSub, NoSuperSub,
    TwoPart,
};

static CONTROL_WORDS: phf::Map<&'static str, ControlWord> = phf_map! {
    // root information
    "rtf" => w("ri", "rtf_______", Plain),
    "ansi" => w("ri", "char-set__", TwoPart("ansi")),
    "mac" => w("ri", "char-set__", TwoPart("mac")),
    "pc" => w("ri", "char-set__", TwoPart("pc")),
    "pca" => w("ri", "char-set__", TwoPart("pca")),
    "ansicpg" => w("ri", "ansi-codpg", Plain),
    "deff" => w("ri", "deflt-font", Plain),
    "deflang" => w("ri", "deflt-lang", Language),
    "deflangfe" => w("ri", "def-lng-fe", Language),
    "fonttbl" => w("ri", "font-table", Plain),
    "colortbl" => w("ri", "colr-table", Plain),
    "revtbl" => w("ri", "revi-table", Plain),
    "fcharset" => w("ri", "font-chrst", Plain),
    "fprq" => w("ri", "font-pitch", Plain),
    "fnil" => w("ri", "font-famly", TwoPart("nil")),
    "froman" => w("ri", "font-famly", TwoPart("roman")),
    "fswiss" => w("ri", "font-famly", TwoPart("swiss")),
    "fmodern" => w("ri", "font-famly", TwoPart("modern")),
    "fscript" => w("ri", "font-famly", TwoPart("script")),
    "fdecor" => w("ri", "font-famly", TwoPart("decorative")),
    "ftech" => w("ri", "font-famly", TwoPart("technical")),
    "fbidi" => w("ri", "font-famly", TwoPart("bidi")),
    "uc" => w("nu", "uni-skip__", Plain),

    // stylesheet
    "stylesheet" => w("ss", "style-shet", Plain),
    "s" => w("ss", "para-style", Plain),
    "cs" => w("ss", "char-style", Plain),
    "ds" => w("ss", "sect-style", Plain),
    "ts" => w("ss", "tabl-style", Plain),
    "sbasedon" => w("ss", "based-on__", Plain),
    "snext" => w("ss", "next-style", Plain),
    "additive" => w("ss", "additive__", Bool),
    "sautoupd" => w("ss", "auto-updat", Bool),
    "shidden" => w("ss", "hidden-sty", Bool),
    "slink" => w("ss", "linked-sty", Plain),
    "sqformat" => w("ss", "quick-form", Bool),
    "spriority" => w("ss", "priority__", Plain),
    "ssemihidden" => w("ss", "semihidden", Bool),
    "sunhideused" => w("ss", "unhideused", Bool),

    // paragraph formatting
    "par" => w("pf", "par-end___", Plain),
    "pard" => w("pf", "par-def___", Plain),
    "li" => w("pf", "left-inden", DivideBy20),
    "lin" => w("pf", "left-inden", DivideBy20),
    "ri" => w("pf", "right-inde", DivideBy20),
    "rin" => w("pf", "right-inde", DivideBy20),
    "fi" => w("pf", "first-line", DivideBy20),
    "sb" => w("pf", "space-befo", DivideBy20),
    "sa" => w("pf", "space-afte", DivideBy20),
    "sl" => w("pf", "line-space", DivideBy20),
    "slmult" => w("pf", "line-mult_", Plain),
    "ql" => w("pf", "align_____", TwoPart("left")),
    "qr" => w("pf", "align_____", TwoPart("right")),
    "qc" => w("pf", "align_____", TwoPart("center")),
    "qj" => w("pf", "align_____", TwoPart("justified")),
    "qd" => w("pf", "align_____", TwoPart("distributed")),
    "widctlpar" => w("pf", "widow-cntl", TwoPart("true")),
    "nowidctlpar" => w("pf", "widow-cntl", TwoPart("false")),
    "keepn" => w("pf", "keep-w-nex", Bool),
    "keep" => w("pf", "keep-toget", Bool),
    "pagebb" => w("pf", "page-break", Bool),
    "adjustright" => w("pf", "adjust-rgt", Bool),
    "hyphpar" => w("pf", "hyphenate_", Bool),
    "noline" => w("pf", "no-line-nm", Bool),
    "outlinelevel" => w("pf", "outline-lv", Plain),
    "rtlpar" => w("pf", "direction_", TwoPart("rtl")),
    "ltrpar" => w("pf", "direction_", TwoPart("ltr")),
    "contextualspace" => w("pf", "contex-spc", Bool),
    "shading" => w("pf", "shading___", Plain),
    "cbpat" => w("pf", "shade-back", Plain),
    "cfpat" => w("pf", "shade-fore", Plain),
    "tx" => w("pf", "tab-stop__", DivideBy20),
    "tb" => w("pf", "tab-bar-st", DivideBy20),
    "tqr" => w("pf", "tab-kind__", TwoPart("right")),
    "tqc" => w("pf", "tab-kind__", TwoPart("center")),
    "tqdec" => w("pf", "tab-kind__", TwoPart("decimal")),
    "tldot" => w("pf", "tab-leader", TwoPart("dot")),
    "tlhyph" => w("pf", "tab-leader", TwoPart("hyphen")),
    "tlul" => w("pf", "tab-leader", TwoPart("underline")),
    "tlth" => w("pf", "tab-leader", TwoPart("thick")),
    "tleq" => w("pf", "tab-leader", TwoPart("equal")),
    "tlmdot" => w("pf", "tab-leader", TwoPart("middle-dot")),

    // page
    "paperw" => w("pa", "paper-widt", DivideBy20),
    "paperh" => w("pa", "paper-hght", DivideBy20),
    "margl" => w("pa", "margin-lef", DivideBy20),
    "margr" => w("pa", "margin-rig", DivideBy20),
    "margt" => w("pa", "margin-top", DivideBy20),
    "margb" => w("pa", "margin-bot", DivideBy20),
    "gutter" => w("pa", "gutter____", DivideBy20),
    "landscape" => w("pa", "landscape_", Bool),
    "facingp" => w("pa", "facing-pag", Bool),
    "deftab" => w("pa", "deft-tab__", DivideBy20),

    // section
    "sect" => w("sc", "section___", Plain),
    "sectd" => w("sc", "sect-defin", Plain),
    "cols" => w("sc", "columns___", Plain),
    "colsx" => w("sc", "col-space_", DivideBy20),
    "marglsxn" => w("sc", "margin-lef", DivideBy20),
    "margrsxn" => w("sc", "margin-rig", DivideBy20),
    "margtsxn" => w("sc", "margin-top", DivideBy20),
    "margbsxn" => w("sc", "margin-bot", DivideBy20),
    "guttersxn" => w("sc", "gutter____", DivideBy20),
    "pgwsxn" => w("sc", "page-width", DivideBy20),
    "pghsxn" => w("sc", "page-hght_", DivideBy20),
    "lndscpsxn" => w("sc", "landscape_", Bool),
    "sbknone" => w("sc", "sect-break", TwoPart("no-break")),
    "sbkcol" => w("sc", "sect-break", TwoPart("column")),
    "sbkpage" => w("sc", "sect-break", TwoPart("page")),
    "sbkeven" => w("sc", "sect-break", TwoPart("even-page")),
    "sbkodd" => w("sc", "sect-break", TwoPart("odd-page")),
    "titlepg" => w("sc", "title-page", Bool),
    "headery" => w("sc", "header-y__", DivideBy20),
    "footery" => w("sc", "footer-y__", DivideBy20),
    "pgnstarts" => w("sc", "pg-nm-star", Plain),
    "pgnrestart" => w("sc", "pg-nm-rest", Bool),
    "linemod" => w("sc", "line-numbe", Plain),

    // character information
    "b" => w("ci", "bold______", Bool),
    "i" => w("ci", "italic____", Bool),
    "ul" => w("ci", "underlined", TwoPart("single")),
    "uld" => w("ci", "underlined", TwoPart("dotted")),
    "uldash" => w("ci", "underlined", TwoPart("dash")),
    "uldashd" => w("ci", "underlined", TwoPart("dash-dot")),
    "uldashdd" => w("ci", "underlined", TwoPart("dash-dot-dot")),
    "uldb" => w("ci", "underlined", TwoPart("double")),
    "ulth" => w("ci", "underlined", TwoPart("thick")),
    "ulw" => w("ci", "underlined", TwoPart("word")),
    "ulwave" => w("ci", "underlined", TwoPart("wave")),
    "ulhwave" => w("ci", "underlined", TwoPart("heavy-wave")),
    "ululdbwave" => w("ci", "underlined", TwoPart("double-wave")),
    "ulnone" => w("ci", "underlined", TwoPart("false")),
    "ulc" => w("ci", "under-colr", Plain),
    "strike" => w("ci", "strike-thr", Bool),
    "striked" => w("ci", "dbl-strike", Bool),
    "scaps" => w("ci", "small-caps", Bool),
    "caps" => w("ci", "caps______", Bool),
    "v" => w("ci", "hidden____", Bool),
    "outl" => w("ci", "outline___", Bool),
    "shad" => w("ci", "shadow____", Bool),
    "embo" => w("ci", "emboss____", Bool),
    "impr" => w("ci", "engrave___", Bool),
    "sub" => w("ci", "subscript_", Bool),
    "super" => w("ci", "superscrip", Bool),
    "nosupersub" => w("ci", "subscript_", NoSuperSub),
    "up" => w("ci", "sup-up____", DivideBy2),
    "dn" => w("ci", "sub-down__", DivideBy2),
    "f" => w("ci", "font-style", Plain),
    "fs" => w("ci", "font-size_", DivideBy2),
    "cf" => w("ci", "font-color", Plain),
    "cb" => w("ci", "back-color", Plain),
    "highlight" => w("ci", "highlight_", Plain),
    "plain" => w("ci", "plain_____", Plain),
    "lang" => w("ci", "language__", Language),
    "langfe" => w("ci", "lang-east_", Language),
    "expndtw" => w("ci", "expand-twp", DivideBy20),
    "kerning" => w("ci", "kerning___", DivideBy2),
    "deleted" => w("ci", "deleted___", Bool),
    "revised" => w("ci", "revised___", Bool),
    "revauth" => w("ci", "rev-author", Plain),
    "red" => w("ci", "red_______", Color),
    "green" => w("ci", "green_____", Color),
    "blue" => w("ci", "blue______", Color),

    // tables
    "trowd" => w("tb", "row-def___", Plain),
    "cellx" => w("tb", "cell-posit", DivideBy20),
    "cell" => w("tb", "cell______", Plain),
    "row" => w("tb", "row_______", Plain),
    "intbl" => w("tb", "in-table__", Plain),
    "itap" => w("tb", "nest-level", Plain),
    "trleft" => w("tb", "row-pos-le", DivideBy20),
    "trhdr" => w("tb", "row-header", Bool),
    "trgaph" => w("tb", "half-gap__", DivideBy20),
    "trrh" => w("tb", "row-height", DivideBy20),
    "trql" => w("tb", "row-align_", TwoPart("left")),
    "trqr" => w("tb", "row-align_", TwoPart("right")),
    "trqc" => w("tb", "row-align_", TwoPart("center")),
    "trkeep" => w("tb", "row-keep__", Bool),
    "lastrow" => w("tb", "last-row__", Bool),
    "clvertalt" => w("tb", "cell-valig", TwoPart("top")),
    "clvertalc" => w("tb", "cell-valig", TwoPart("center")),
    "clvertalb" => w("tb", "cell-valig", TwoPart("bottom")),
    "clmgf" => w("tb", "cell-merge", TwoPart("first")),
    "clmrg" => w("tb", "cell-merge", TwoPart("previous")),
    "clvmgf" => w("tb", "cell-vmerg", TwoPart("first")),
    "clvmrg" => w("tb", "cell-vmerg", TwoPart("previous")),
    "clcbpat" => w("tb", "cell-shade", Plain),
    "nestcell" => w("tb", "nest-cell_", Plain),
    "nestrow" => w("tb", "nest-row__", Plain),

    // border positions
    "brdrt" => w("bd", "bor-par-to", Plain),
    "brdrb" => w("bd", "bor-par-bo", Plain),
    "brdrl" => w("bd", "bor-par-le", Plain),
    "brdrr" => w("bd", "bor-par-ri", Plain),
    "box" => w("bd", "bor-par-bx", Plain),
    "brdrbtw" => w("bd", "bor-par-be", Plain),
    "brdrbar" => w("bd", "bor-par-ba", Plain),
    "clbrdrt" => w("bd", "bor-cel-to", Plain),
    "clbrdrb" => w("bd", "bor-cel-bo", Plain),
    "clbrdrl" => w("bd", "bor-cel-le", Plain),
    "clbrdrr" => w("bd", "bor-cel-ri", Plain),
    "trbrdrt" => w("bd", "bor-t-r-to", Plain),
    "trbrdrb" => w("bd", "bor-t-r-bo", Plain),
    "trbrdrl" => w("bd", "bor-t-r-le", Plain),
    "trbrdrr" => w("bd", "bor-t-r-ri", Plain),
    "trbrdrh" => w("bd", "bor-t-r-hi", Plain),
    "trbrdrv" => w("bd", "bor-t-r-vi", Plain),

    // border types
    "brdrs" => w("bt", "bdr-single", Plain),
    "brdrth" => w("bt", "bdr-thick_", Plain),
    "brdrsh" => w("bt", "bdr-shadow", Plain),
    "brdrdb" => w("bt", "bdr-double", Plain),
    "brdrdot" => w("bt", "bdr-dotted", Plain),
    "brdrdash" => w("bt", "bdr-dashed", Plain),
    "brdrdashsm" => w("bt", "bdr-dsh-sm", Plain),
    "brdrdashd" => w("bt", "bdr-dot-ds", Plain),
    "brdrdashdd" => w("bt", "bdr-dot-dd", Plain),
    "brdrhair" => w("bt", "bdr-hair__", Plain),
    "brdrinset" => w("bt", "bdr-inset_", Plain),
    "brdroutset" => w("bt", "bdr-outset", Plain),
    "brdrtriple" => w("bt", "bdr-triple", Plain),
    "brdrwavy" => w("bt", "bdr-wavy__", Plain),
    "brdrwavydb" => w("bt", "bdr-d-wav_", Plain),
    "brdremboss" => w("bt", "bdr-emboss", Plain),
    "brdrengrave" => w("bt", "bdr-engrav", Plain),
    "brdrnone" => w("bt", "bdr-none__", Plain),
    "brdrnil" => w("bt", "bdr-none__", Plain),
    "brdrw" => w("bt", "bdr-li-wid", DivideBy20),
    "brsp" => w("bt", "bdr-sp-wid", DivideBy20),
    "brdrcf" => w("bt", "bdr-color_", Plain),

    // lists
    "ls" => w("ls", "list-id___", Plain),
    "ilvl" => w("ls", "list-lvl__", Plain),
    "listid" => w("ls", "lis-tbl-id", Plain),
    "listtemplateid" => w("ls", "lis-tem-id", Plain),
    "listtable" => w("ls", "listtable_", Plain),
    "list" => w("ls", "list______", Plain),
    "listlevel" => w("ls", "list-level", Plain),
    "levelnfc" => w("ls", "numb-type_", ListType),
    "levelnfcn" => w("ls", "numb-type_", ListType),
    "levelstartat" => w("ls", "level-star", Plain),
    "levelfollow" => w("ls", "lev-follow", Plain),
    "leveljc" => w("ls", "lev-align_", Plain),
    "leveltext" => w("ls", "level-text", Plain),
    "levelnumbers" => w("ls", "level-nums", Plain),
    "listname" => w("ls", "list-name_", Plain),
    "listsimple" => w("ls", "list-simpl", Bool),
    "listhybrid" => w("ls", "list-hybri", Bool),
    "listoverridetable" => w("ls", "lovr-table", Plain),
    "listoverride" => w("ls", "lis-overid", Plain),
    "listoverridecount" => w("ls", "ovrid-cnt_", Plain),
    "listtext" => w("ls", "list-text_", Plain),
    "pntext" => w("ls", "list-text_", Plain),

    // fields
    "field" => w("fd", "field_____", Plain),
    "fldinst" => w("fd", "field-inst", Plain),
    "fldrslt" => w("fd", "field-rslt", Plain),
    "fldlock" => w("fd", "field-lock", Bool),
    "flddirty" => w("fd", "field-dirt", Bool),

    // document information
    "info" => w("di", "doc-info__", Plain),
    "title" => w("it", "title_____", Plain),
    "subject" => w("it", "subject___", Plain),
    "author" => w("it", "author____", Plain),
    "manager" => w("it", "manager___", Plain),
    "company" => w("it", "company___", Plain),
    "operator" => w("it", "operator__", Plain),
    "category" => w("it", "category__", Plain),
    "keywords" => w("it", "keywords__", Plain),
    "comment" => w("it", "comment___", Plain),
    "doccomm" => w("it", "doc-notes_", Plain),
    "hlinkbase" => w("it", "hyperlinkb", Plain),
    "creatim" => w("it", "creat-time", Plain),
    "revtim" => w("it", "revis-time", Plain),
    "printim" => w("it", "print-time", Plain),
    "buptim" => w("it", "backuptime", Plain),
    "yr" => w("it", "year______", Plain),
    "mo" => w("it", "month_____", Plain),
    "dy" => w("it", "day_______", Plain),
    "hr" => w("it", "hour______", Plain),
    "min" => w("it", "minute____", Plain),
    "sec" => w("it", "second____", Plain),
    "version" => w("it", "version___", Plain),
    "vern" => w("it", "intern-ver", Plain),
    "edmins" => w("it", "edit-time_", Plain),
    "nofpages" => w("it", "num-of-pag", Plain),
    "nofwords" => w("it", "num-of-wor", Plain),
    "nofchars" => w("it", "num-of-chr", Plain),
    "nofcharsws" => w("it", "numofchrws", Plain),
    "id" => w("it", "internal-i", Plain),

    // headers and footers
    "header" => w("hf", "header____", Plain),
    "headerl" => w("hf", "header-l__", Plain),
    "headerr" => w("hf", "header-r__", Plain),
    "headerf" => w("hf", "header-f__", Plain),
    "footer" => w("hf", "footer____", Plain),
    "footerl" => w("hf", "footer-l__", Plain),
    "footerr" => w("hf", "footer-r__", Plain),
    "footerf" => w("hf", "footer-f__", Plain),

    // notes, anchors, index, contents
    "footnote" => w("nt", "footnote__", Plain),
    "chftn" => w("nt", "note-num__", Plain),
    "ftnalt" => w("nt", "endnote___", Bool),
    "bkmkstart" => w("an", "bookmk-beg", Plain),
    "bkmkend" => w("an", "bookmk-end", Plain),
    "annotation" => w("an", "annotation", Plain),
    "atnid" => w("an", "annot-id__", Plain),
    "xe" => w("in", "index-mark", Plain),
    "txe" => w("in", "index-text", Plain),
    "tc" => w("tc", "toc-entry_", Plain),
    "tcn" => w("tc", "toc-entry_", Plain),
    "tcl" => w("tc", "toc-level_", Plain),

    // pictures
    "pict" => w("gr", "picture___", Plain),
    "shppict" => w("gr", "shape-pict", Plain),
    "nonshppict" => w("gr", "non-shpict", Plain),
    "pngblip" => w("gr", "png-blip__", Plain),
    "jpegblip" => w("gr", "jpeg-blip_", Plain),
    "emfblip" => w("gr", "emf-blip__", Plain),
    "wmetafile" => w("gr", "wmetafile_", Plain),
    "macpict" => w("gr", "mac-pict__", Plain),
    "dibitmap" => w("gr", "dib-bitmap", Plain),
    "wbitmap" => w("gr", "win-bitmap", Plain),
    "picw" => w("gr", "pict-width", Plain),
    "pich" => w("gr", "pict-hght_", Plain),
    "picwgoal" => w("gr", "pict-wgoal", Plain),
    "pichgoal" => w("gr", "pict-hgoal", Plain),
    "picscalex" => w("gr", "pict-scl-x", Plain),
    "picscaley" => w("gr", "pict-scl-y", Plain),
    "piccropl" => w("gr", "pict-crp-l", Plain),
    "piccropr" => w("gr", "pict-crp-r", Plain),
    "piccropt" => w("gr", "pict-crp-t", Plain),
    "piccropb" => w("gr", "pict-crp-b", Plain),
    "picbpp" => w("gr", "pict-bpp__", Plain),
    "picbmp" => w("gr", "pict-bmp__", Plain),
    "bliptag" => w("gr", "blip-tag__", Plain),
    "blipupi" => w("gr", "blip-upi__", Plain),

    // miscellaneous and special characters
    "*" => w("ml", "asterisk__", Plain),
    "line" => w("ml", "line-break", MsSub("line-break")),
    "page" => w("ml", "page-break", MsSub("page-break")),
    "column" => w("ml", "col-break_", MsSub("column-break")),
    "tab" => w("ml", "tab_______", MsSub("tab")),
    "emdash" => w("ml", "emdash____", MsSub("emdash")),
    "endash" => w("ml", "endash____", MsSub("endash")),
    "emspace" => w("ml", "emspace___", MsSub("emspace")),
    "enspace" => w("ml", "enspace___", MsSub("enspace")),
    "qmspace" => w("ml", "qmspace___", MsSub("qmspace")),
    "bullet" => w("ml", "bullet____", MsSub("bullet")),
    "lquote" => w("ml", "lquote____", MsSub("lquote")),
    "rquote" => w("ml", "rquote____", MsSub("rquote")),
    "ldblquote" => w("ml", "ldblquote_", MsSub("ldblquote")),
    "rdblquote" => w("ml", "rdblquote_", MsSub("rdblquote")),
    "zwj" => w("ml", "zero-joinr", MsSub("zero-width-joiner")),
    "zwnj" => w("ml", "zero-njoin", MsSub("zero-width-non-joiner")),
    "ltrmark" => w("ml", "ltr-mark__", MsSub("left-to-right-mark")),
    "rtlmark" => w("ml", "rtl-mark__", MsSub("right-to-left-mark")),
    "~" => w("ml", "nb-space__", MsSub("non-breaking-space")),
    "_" => w("ml", "nb-hyphen_", MsSub("non-breaking-hyphen")),
    "-" => w("ml", "opt-hyphen", MsSub("optional-hyphen")),
    ":" => w("ml", "subentry__", MsSub("subentry")),
    "|" => w("ml", "formula___", MsSub("formula-character")),
};

/// List numbering types keyed by `\levelnfc` value.
static LIST_TYPES: phf::Map<u32, &'static str> = phf_map! {
    0u32 => "arabic",
    1u32 => "uppercase-roman",
    2u32 => "lowercase-roman",
    3u32 => "uppercase-letter",
    4u32 => "lowercase-letter",
    5u32 => "ordinal-number",
    6u32 => "cardinal-text-number",
    7u32 => "ordinal-text-number",
    10u32 => "kanji-numbering-without-digit",
    11u32 => "kanji-numbering-digit",
    12u32 => "katana-1",
    13u32 => "katana-2",
    14u32 => "double-byte",
    15u32 => "kanji-numbering-3",
    16u32 => "kanji-numbering-4",
    17u32 => "circle-numbering",
    18u32 => "double-byte-arabic",
    19u32 => "phonetic-katana-order",
    20u32 => "phonetic-katana-iroha",
    21u32 => "phonetic-katana-order-db",
    22u32 => "arabic-leading-zero",
    23u32 => "bullet",
    24u32 => "korean-numbering-2",
    25u32 => "korean-numbering-1",
    26u32 => "gb1",
    27u32 => "gb2",
    28u32 => "gb3",
    29u32 => "gb4",
    30u32 => "zodiac-1",
    31u32 => "zodiac-2",
    32u32 => "zodiac-3",
    33u32 => "taiwanese-1",
    34u32 => "taiwanese-2",
    35u32 => "taiwanese-3",
    36u32 => "taiwanese-4",
    37u32 => "chinese-1",
    38u32 => "chinese-2",
    39u32 => "chinese-3",
    40u32 => "chinese-4",
    41u32 => "korean-1",
    42u32 => "korean-2",
    43u32 => "korean-3",
    44u32 => "korean-4",
    45u32 => "hebrew-1",
    46u32 => "arabic-alpha",
    47u32 => "hebrew-2",
    48u32 => "arabic-abjad",
    255u32 => "no-number",
};

/// XML attribute names for canonical names whose short form is unreadable.
static ATTRIBUTES: phf::Map<&'static str, &'static str> = phf_map! {
    // paragraph
    "left-inden" => "left-indent",
    "right-inde" => "right-indent",
    "first-line" => "first-line-indent",
    "space-befo" => "space-before",
    "space-afte" => "space-after",
    "line-space" => "line-spacing",
    "line-mult_" => "line-multiple",
    "widow-cntl" => "widow-control",
    "keep-w-nex" => "keep-with-next",
    "keep-toget" => "keep-together",
    "page-break" => "page-break-before",
    "adjust-rgt" => "adjust-right",
    "outline-lv" => "outline-level",
    "no-line-nm" => "no-line-numbering",
    "shade-back" => "shading-background",
    "shade-fore" => "shading-foreground",
    "contex-spc" => "contextual-spacing",
    // styles and lists
    "para-style" => "style",
    "char-style" => "character-style",
    "based-on__" => "based-on-style",
    "list-id___" => "list-id",
    "list-lvl__" => "list-level",
    "lis-tbl-id" => "list-id",
    "lis-tem-id" => "list-template-id",
    "numb-type_" => "numbering-type",
    "level-star" => "start",
    "lev-follow" => "follow",
    "lev-align_" => "level-align",
    "list-simpl" => "simple",
    "list-hybri" => "hybrid",
    // character
    "italic____" => "italic",
    "strike-thr" => "strike-through",
    "dbl-strike" => "double-strike-through",
    "superscrip" => "superscript",
    "sup-up____" => "raise",
    "sub-down__" => "lower",
    "font-size_" => "font-size",
    "back-color" => "background-color",
    "under-colr" => "underline-color",
    "lang-east_" => "east-asian-language",
    "expand-twp" => "expand",
    "rev-author" => "revision-author",
    // section and page
    "col-space_" => "column-space",
    "margin-lef" => "margin-left",
    "margin-rig" => "margin-right",
    "margin-bot" => "margin-bottom",
    "page-hght_" => "page-height",
    "paper-widt" => "paper-width",
    "paper-hght" => "paper-height",
    "sect-break" => "section-break",
    "header-y__" => "header-position",
    "footer-y__" => "footer-position",
    "pg-nm-star" => "page-number-start",
    "pg-nm-rest" => "page-number-restart",
    "line-numbe" => "line-numbering",
    "facing-pag" => "facing-pages",
    "deft-tab__" => "default-tab",
    // tables
    "row-pos-le" => "left-row-position",
    "row-header" => "header",
    "half-gap__" => "half-space-between-cells",
    "row-align_" => "row-alignment",
    "row-keep__" => "keep-row-together",
    "cell-valig" => "vertical-align",
    "cell-merge" => "merge",
    "cell-vmerg" => "vertical-merge",
    "cell-shade" => "shading",
    "nest-level" => "nesting-level",
};

/// Look up an RTF word (without backslash or parameter).
#[inline]
pub fn lookup(word: &str) -> Option<&'static ControlWord> {
    CONTROL_WORDS.get(word)
}

/// Numbering-type name for a `\levelnfc` value.
pub fn list_type_name(value: i32) -> String {
    u32::try_from(value)
        .ok()
        .and_then(|v| LIST_TYPES.get(&v))
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

/// XML attribute name for a canonical control-word name.
pub fn attribute_name(canonical: &str) -> String {
    match ATTRIBUTES.get(canonical) {
        Some(name) => name.to_string(),
        None => canonical.trim_end_matches('_').to_string(),
    }
}

/// Recover the RTF word for a canonical name within a category.
///
/// Several words can share a canonical name; the first table entry found
/// wins. Only used for words whose value survives classification unchanged.
pub fn rtf_word(category: &str, canonical: &str) -> Option<&'static str> {
    CONTROL_WORDS
        .entries()
        .find(|(_, cw)| cw.category == category && cw.name == canonical)
        .map(|(word, _)| *word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_are_ten_chars() {
        for (word, cw) in CONTROL_WORDS.entries() {
            assert_eq!(cw.name.len(), 10, "bad canonical name for \\{}", word);
            assert_eq!(cw.category.len(), 2);
        }
    }

    #[test]
    fn test_lookup() {
        let par = lookup("par").unwrap();
        assert_eq!(par.category, "pf");
        assert_eq!(par.name, "par-end___");
        assert_eq!(lookup("qc").unwrap().handler, Handler::TwoPart("center"));
        assert!(lookup("nosuchword").is_none());
    }

    #[test]
    fn test_list_types() {
        assert_eq!(list_type_name(23), "bullet");
        assert_eq!(list_type_name(0), "arabic");
        assert_eq!(list_type_name(99), "99");
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(attribute_name("left-inden"), "left-indent");
        assert_eq!(attribute_name("bold______"), "bold");
        assert_eq!(attribute_name("align_____"), "align");
    }

    #[test]
    fn test_rtf_word_reverse() {
        assert_eq!(rtf_word("gr", "picture___"), Some("pict"));
        assert_eq!(rtf_word("gr", "png-blip__"), Some("pngblip"));
        assert_eq!(rtf_word("gr", "no-such___"), None);
    }
}
