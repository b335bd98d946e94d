//! Character encoding utilities for RTF codepages.
//!
//! RTF documents declare their 8-bit character set with `\ansi`, `\mac`,
//! `\pc`, `\pca` and refine it with `\ansicpg N`. Hex escapes (`\'HH`) are
//! bytes in that codepage; this module maps codepage identifiers to
//! `encoding_rs` encodings and decodes byte runs to UTF-8.

use encoding_rs::Encoding;

/// Map Windows codepage identifier to encoding_rs Encoding.
///
/// # Arguments
/// * `codepage` - Windows codepage number (e.g., 936 for Simplified Chinese, 1252 for Western European)
///
/// # Returns
/// Returns `Some(&'static Encoding)` if the codepage is supported, `None` otherwise.
///
/// # Examples
/// ```
/// use rtf2xml::common::encoding::codepage_to_encoding;
///
/// let encoding = codepage_to_encoding(936).unwrap();
/// assert_eq!(encoding.name(), "GBK");
/// ```
#[inline]
pub fn codepage_to_encoding(codepage: u32) -> Option<&'static Encoding> {
    match codepage {
        // DOS codepages
        437 => Some(encoding_rs::IBM866), // IBM866 (close approximation to CP437)
        850 => Some(encoding_rs::IBM866), // DOS Latin 1 (approximation)
        866 => Some(encoding_rs::IBM866),

        // Windows codepages (Western scripts)
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Central European
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European (most common, default ANSI)
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS), // Japanese Shift-JIS
        936 => Some(encoding_rs::GBK),       // Simplified Chinese (GB2312/GBK)
        949 => Some(encoding_rs::EUC_KR),    // Korean
        950 => Some(encoding_rs::BIG5),      // Traditional Chinese (Big5)
        20936 => Some(encoding_rs::GBK),     // GB2312
        54936 => Some(encoding_rs::GB18030), // Chinese GB18030 (superset of GBK)
        20932 => Some(encoding_rs::EUC_JP),  // Japanese EUC-JP

        // ISO 8859 series
        28591 => Some(encoding_rs::WINDOWS_1252), // ISO-8859-1 approximation
        28592 => Some(encoding_rs::ISO_8859_2),
        28593 => Some(encoding_rs::ISO_8859_3),
        28594 => Some(encoding_rs::ISO_8859_4),
        28595 => Some(encoding_rs::ISO_8859_5),
        28596 => Some(encoding_rs::ISO_8859_6),
        28597 => Some(encoding_rs::ISO_8859_7),
        28598 => Some(encoding_rs::ISO_8859_8),
        28603 => Some(encoding_rs::ISO_8859_13),
        28605 => Some(encoding_rs::ISO_8859_15),

        // KOI8 series
        20866 => Some(encoding_rs::KOI8_R),
        21866 => Some(encoding_rs::KOI8_U),

        // Macintosh
        10000 => Some(encoding_rs::MACINTOSH),
        10001 => Some(encoding_rs::SHIFT_JIS),
        10007 => Some(encoding_rs::X_MAC_CYRILLIC),

        65001 => Some(encoding_rs::UTF_8),

        _ => None,
    }
}

/// Resolve a codepage name such as `cp1252`, `ansicpg1251` or `mac_roman`.
///
/// Names that `encoding_rs` knows as labels (`windows-1252`, `utf-8`, ...)
/// are accepted as well.
pub fn encoding_for_name(name: &str) -> Option<&'static Encoding> {
    let lower = name.trim().to_ascii_lowercase();
    let digits = lower
        .trim_start_matches("ansicpg")
        .trim_start_matches("cp")
        .trim_start_matches("windows-");
    if let Ok(codepage) = digits.parse::<u32>() {
        return codepage_to_encoding(codepage);
    }
    match lower.as_str() {
        "mac_roman" | "mac-roman" | "macroman" => Some(encoding_rs::MACINTOSH),
        _ => Encoding::for_label(lower.as_bytes()),
    }
}

/// Decode a run of codepage bytes.
///
/// Unmappable sequences decode to U+FFFD; callers treat that as "not in table".
#[inline]
pub fn decode_bytes(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Whether a multi-byte encoding needs consecutive bytes decoded together.
#[inline]
pub fn is_multi_byte(encoding: &'static Encoding) -> bool {
    encoding == encoding_rs::SHIFT_JIS
        || encoding == encoding_rs::GBK
        || encoding == encoding_rs::GB18030
        || encoding == encoding_rs::EUC_KR
        || encoding == encoding_rs::BIG5
        || encoding == encoding_rs::EUC_JP
        || encoding == encoding_rs::UTF_8
}
