//! Catalogue of well-known encodings and their `iconv` names.
//!
//! Converters accept any name the system primitive knows; this list only
//! describes the common ones (BOMs, stateful encodings, grouping for the CLI).

use std::fmt;

use serde::Serialize;

use crate::aliases::fix_encoding_name;

/// Well-known character encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    // Unicode encodings
    /// UTF-8 (variable length, 1-4 bytes)
    UTF8,
    /// UTF-7 (stateful, 7-bit safe)
    UTF7,
    /// UTF-16 with byte order mark
    UTF16,
    /// UTF-16 little endian
    UTF16LE,
    /// UTF-16 big endian
    UTF16BE,
    /// UTF-32 with byte order mark
    UTF32,
    /// UTF-32 little endian
    UTF32LE,
    /// UTF-32 big endian
    UTF32BE,

    // ASCII and Latin encodings
    /// ASCII (7-bit, 0-127)
    ASCII,
    /// ISO-8859-1 (Latin-1) - Western European
    ISO_8859_1,
    /// ISO-8859-2 (Latin-2) - Central/Eastern European
    ISO_8859_2,
    /// ISO-8859-5 (Cyrillic)
    ISO_8859_5,
    /// ISO-8859-7 (Greek)
    ISO_8859_7,
    /// ISO-8859-15 (Latin-9) - Western European with Euro
    ISO_8859_15,

    // Windows code pages
    /// Windows-1250 (Central/Eastern European)
    WINDOWS_1250,
    /// Windows-1251 (Cyrillic)
    WINDOWS_1251,
    /// Windows-1252 (Western European)
    WINDOWS_1252,

    // EBCDIC variants
    /// IBM EBCDIC Code Page 037 (US/Canada)
    EBCDIC_037,
    /// IBM EBCDIC Code Page 500 (International)
    EBCDIC_500,
    /// IBM EBCDIC Code Page 1047 (Latin-1)
    EBCDIC_1047,

    // DOS/OEM code pages
    /// DOS Code Page 437 (US OEM)
    CP_437,
    /// DOS Code Page 850 (Western European OEM)
    CP_850,
    /// DOS Code Page 866 (Russian OEM)
    CP_866,

    /// Macintosh Roman
    MAC_ROMAN,

    // Asian encodings
    /// Shift-JIS (Japanese)
    SHIFT_JIS,
    /// EUC-JP (Japanese)
    EUC_JP,
    /// ISO-2022-JP (Japanese, stateful)
    ISO_2022_JP,
    /// GB18030 (Chinese)
    GB18030,
    /// Big5 (Traditional Chinese)
    BIG5,
    /// EUC-KR (Korean)
    EUC_KR,
    /// ISO-2022-KR (Korean, stateful)
    ISO_2022_KR,
}

impl Encoding {
    /// Every catalogued encoding, grouped by category
    pub const ALL: &'static [Encoding] = &[
        Encoding::UTF8,
        Encoding::UTF7,
        Encoding::UTF16,
        Encoding::UTF16LE,
        Encoding::UTF16BE,
        Encoding::UTF32,
        Encoding::UTF32LE,
        Encoding::UTF32BE,
        Encoding::ASCII,
        Encoding::ISO_8859_1,
        Encoding::ISO_8859_2,
        Encoding::ISO_8859_5,
        Encoding::ISO_8859_7,
        Encoding::ISO_8859_15,
        Encoding::WINDOWS_1250,
        Encoding::WINDOWS_1251,
        Encoding::WINDOWS_1252,
        Encoding::EBCDIC_037,
        Encoding::EBCDIC_500,
        Encoding::EBCDIC_1047,
        Encoding::CP_437,
        Encoding::CP_850,
        Encoding::CP_866,
        Encoding::MAC_ROMAN,
        Encoding::SHIFT_JIS,
        Encoding::EUC_JP,
        Encoding::ISO_2022_JP,
        Encoding::GB18030,
        Encoding::BIG5,
        Encoding::EUC_KR,
        Encoding::ISO_2022_KR,
    ];

    /// Name of this encoding as understood by `iconv`
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF7 => "UTF-7",
            Encoding::UTF16 => "UTF-16",
            Encoding::UTF16LE => "UTF-16LE",
            Encoding::UTF16BE => "UTF-16BE",
            Encoding::UTF32 => "UTF-32",
            Encoding::UTF32LE => "UTF-32LE",
            Encoding::UTF32BE => "UTF-32BE",

            Encoding::ASCII => "US-ASCII",
            Encoding::ISO_8859_1 => "ISO-8859-1",
            Encoding::ISO_8859_2 => "ISO-8859-2",
            Encoding::ISO_8859_5 => "ISO-8859-5",
            Encoding::ISO_8859_7 => "ISO-8859-7",
            Encoding::ISO_8859_15 => "ISO-8859-15",

            Encoding::WINDOWS_1250 => "WINDOWS-1250",
            Encoding::WINDOWS_1251 => "WINDOWS-1251",
            Encoding::WINDOWS_1252 => "WINDOWS-1252",

            Encoding::EBCDIC_037 => "IBM037",
            Encoding::EBCDIC_500 => "IBM500",
            Encoding::EBCDIC_1047 => "IBM1047",

            Encoding::CP_437 => "CP437",
            Encoding::CP_850 => "CP850",
            Encoding::CP_866 => "CP866",

            Encoding::MAC_ROMAN => "MACINTOSH",

            Encoding::SHIFT_JIS => "SHIFT_JIS",
            Encoding::EUC_JP => "EUC-JP",
            Encoding::ISO_2022_JP => "ISO-2022-JP",
            Encoding::GB18030 => "GB18030",
            Encoding::BIG5 => "BIG5",
            Encoding::EUC_KR => "EUC-KR",
            Encoding::ISO_2022_KR => "ISO-2022-KR",
        }
    }

    /// Look up a catalogued encoding by name.
    ///
    /// The name is alias-fixed first and compared case-insensitively.
    pub fn from_name(name: &str) -> Option<Encoding> {
        let name = fix_encoding_name(name);
        Encoding::ALL
            .iter()
            .copied()
            .find(|encoding| encoding.name().eq_ignore_ascii_case(name))
    }

    /// Group used when listing encodings
    pub fn category(self) -> &'static str {
        match self {
            Encoding::UTF8
            | Encoding::UTF7
            | Encoding::UTF16
            | Encoding::UTF16LE
            | Encoding::UTF16BE
            | Encoding::UTF32
            | Encoding::UTF32LE
            | Encoding::UTF32BE => "unicode",
            Encoding::ASCII => "ascii",
            Encoding::ISO_8859_1
            | Encoding::ISO_8859_2
            | Encoding::ISO_8859_5
            | Encoding::ISO_8859_7
            | Encoding::ISO_8859_15 => "iso",
            Encoding::WINDOWS_1250 | Encoding::WINDOWS_1251 | Encoding::WINDOWS_1252 => "windows",
            Encoding::EBCDIC_037 | Encoding::EBCDIC_500 | Encoding::EBCDIC_1047 => "ebcdic",
            Encoding::CP_437 | Encoding::CP_850 | Encoding::CP_866 => "dos",
            Encoding::MAC_ROMAN => "mac",
            Encoding::SHIFT_JIS
            | Encoding::EUC_JP
            | Encoding::ISO_2022_JP
            | Encoding::GB18030
            | Encoding::BIG5
            | Encoding::EUC_KR
            | Encoding::ISO_2022_KR => "asian",
        }
    }

    /// Check if this encoding uses variable-length or multi-unit characters
    pub fn is_multibyte(self) -> bool {
        matches!(self.category(), "unicode" | "asian")
    }

    /// Check if output in this encoding carries shift state that must be
    /// closed with a trailing sequence
    pub fn is_stateful(self) -> bool {
        matches!(
            self,
            Encoding::UTF7 | Encoding::ISO_2022_JP | Encoding::ISO_2022_KR
        )
    }

    /// Get the byte order mark (BOM) for this encoding if it has one
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::UTF8 => Some(&[0xEF, 0xBB, 0xBF]),
            Encoding::UTF16LE => Some(&[0xFF, 0xFE]),
            Encoding::UTF16BE => Some(&[0xFE, 0xFF]),
            Encoding::UTF32LE => Some(&[0xFF, 0xFE, 0x00, 0x00]),
            Encoding::UTF32BE => Some(&[0x00, 0x00, 0xFE, 0xFF]),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
