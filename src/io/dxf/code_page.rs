//! `$DWGCODEPAGE` handling for drawings saved before AutoCAD 2007.
//!
//! Later releases always write UTF-8; older ones write text in the code page
//! named in the header, which is looked up here.

use encoding_rs::Encoding;

/// Look up the text encoding named by a `$DWGCODEPAGE` value.
///
/// Returns `None` when no transcoding is needed (ASCII / UTF-8). Unknown
/// names fall back to Windows-1252, the most common DXF code page.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase();

    if let Some(number) = name.strip_prefix("ansi_") {
        return Some(match number {
            "874" => encoding_rs::WINDOWS_874,
            "932" => encoding_rs::SHIFT_JIS,
            "936" => encoding_rs::GBK,
            "949" => encoding_rs::EUC_KR,
            "950" => encoding_rs::BIG5,
            "1250" => encoding_rs::WINDOWS_1250,
            "1251" => encoding_rs::WINDOWS_1251,
            "1253" => encoding_rs::WINDOWS_1253,
            "1254" => encoding_rs::WINDOWS_1254,
            "1255" => encoding_rs::WINDOWS_1255,
            "1256" => encoding_rs::WINDOWS_1256,
            "1257" => encoding_rs::WINDOWS_1257,
            "1258" => encoding_rs::WINDOWS_1258,
            _ => encoding_rs::WINDOWS_1252,
        });
    }

    if let Some(number) = name.strip_prefix("dos") {
        // encoding_rs has no OEM code pages; map to the nearest Windows page
        return Some(match number {
            "437" | "855" | "866" => encoding_rs::IBM866,
            "852" => encoding_rs::WINDOWS_1250,
            "857" => encoding_rs::WINDOWS_1254,
            "869" => encoding_rs::WINDOWS_1253,
            _ => encoding_rs::WINDOWS_1252,
        });
    }

    let iso = name
        .strip_prefix("iso8859-")
        .or_else(|| name.strip_prefix("iso_8859-"));
    if let Some(part) = iso {
        return Some(match part {
            "2" => encoding_rs::ISO_8859_2,
            "3" => encoding_rs::ISO_8859_3,
            "4" => encoding_rs::ISO_8859_4,
            "5" => encoding_rs::ISO_8859_5,
            "6" => encoding_rs::ISO_8859_6,
            "7" => encoding_rs::ISO_8859_7,
            "8" => encoding_rs::ISO_8859_8,
            "9" => encoding_rs::WINDOWS_1254,
            "10" => encoding_rs::ISO_8859_10,
            "13" => encoding_rs::ISO_8859_13,
            "14" => encoding_rs::ISO_8859_14,
            "15" => encoding_rs::ISO_8859_15,
            _ => encoding_rs::WINDOWS_1252,
        });
    }

    match name.as_str() {
        "ascii" | "utf-8" | "utf8" | "unicode" | "" => None,
        "gb2312" => Some(encoding_rs::GBK),
        "big5" => Some(encoding_rs::BIG5),
        "korean" | "johab" => Some(encoding_rs::EUC_KR),
        "koi8-r" => Some(encoding_rs::KOI8_R),
        "koi8-u" => Some(encoding_rs::KOI8_U),
        _ => Some(encoding_rs::WINDOWS_1252),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_pages() {
        assert_eq!(encoding_from_code_page("ANSI_1252"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(encoding_from_code_page("ansi_1251"), Some(encoding_rs::WINDOWS_1251));
        assert_eq!(encoding_from_code_page("ANSI_932"), Some(encoding_rs::SHIFT_JIS));
    }

    #[test]
    fn test_iso_pages() {
        assert_eq!(encoding_from_code_page("ISO8859-2"), Some(encoding_rs::ISO_8859_2));
        assert_eq!(encoding_from_code_page("iso_8859-15"), Some(encoding_rs::ISO_8859_15));
    }

    #[test]
    fn test_unicode_needs_no_transcoding() {
        assert_eq!(encoding_from_code_page("ASCII"), None);
        assert_eq!(encoding_from_code_page("UTF-8"), None);
    }

    #[test]
    fn test_unknown_falls_back_to_windows_1252() {
        assert_eq!(
            encoding_from_code_page("SOMETHING_UNKNOWN"),
            Some(encoding_rs::WINDOWS_1252)
        );
    }
}
