//! DXF code page ($DWGCODEPAGE) to encoding mapping and byte decoding.

use crate::types::DxfVersion;
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Get the `encoding_rs` encoding for a DXF code page string.
///
/// Returns `None` for UTF-8 and plain ASCII. Unrecognised names fall back to
/// Windows-1252.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase();
    let encoding = match name.as_str() {
        "ascii" | "utf-8" | "utf8" | "unicode" => return None,

        "ansi_932" | "dos932" => encoding_rs::SHIFT_JIS,
        "ansi_936" | "gb2312" => encoding_rs::GBK,
        "ansi_949" | "korean" | "johab" => encoding_rs::EUC_KR,
        "ansi_950" | "big5" => encoding_rs::BIG5,

        "ansi_874" => encoding_rs::WINDOWS_874,
        "ansi_1250" | "dos852" => encoding_rs::WINDOWS_1250,
        "ansi_1251" => encoding_rs::WINDOWS_1251,
        "ansi_1253" | "dos869" => encoding_rs::WINDOWS_1253,
        "ansi_1254" | "dos857" => encoding_rs::WINDOWS_1254,
        "ansi_1255" => encoding_rs::WINDOWS_1255,
        "ansi_1256" => encoding_rs::WINDOWS_1256,
        "ansi_1257" => encoding_rs::WINDOWS_1257,
        "ansi_1258" => encoding_rs::WINDOWS_1258,
        "dos855" | "dos866" => encoding_rs::IBM866,
        "koi8-r" => encoding_rs::KOI8_R,
        "koi8-u" => encoding_rs::KOI8_U,

        iso if iso.starts_with("iso8859-") || iso.starts_with("iso_8859-") => {
            let part = iso.rsplit('-').next().unwrap_or_default();
            match part {
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
            }
        }

        _ => encoding_rs::WINDOWS_1252,
    };
    Some(encoding)
}

/// Decode a DXF document held as raw bytes.
///
/// Valid UTF-8 is borrowed as is. Anything else is decoded with the
/// encoding named by `$DWGCODEPAGE`, or Windows-1252 when the header names
/// none. The flag is true when some bytes could not be mapped.
pub fn decode_bytes(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (Cow::Borrowed(text), false);
    }

    let version = header_value(bytes, "$ACADVER")
        .map(DxfVersion::from_version_string)
        .unwrap_or(DxfVersion::Unknown);
    let encoding = if version.is_utf8() {
        encoding_rs::UTF_8
    } else {
        header_value(bytes, "$DWGCODEPAGE")
            .and_then(encoding_from_code_page)
            .unwrap_or(encoding_rs::WINDOWS_1252)
    };

    tracing::debug!(encoding = encoding.name(), "decoding non UTF-8 document");
    let (text, malformed) = encoding.decode_without_bom_handling(bytes);
    (text, malformed)
}

/// The value line two lines after header variable `name`, scanning the raw
/// bytes up to the end of the first section
fn header_value<'a>(bytes: &'a [u8], name: &str) -> Option<&'a str> {
    let mut lines = bytes.split(|b| *b == b'\n').map(|line| line.trim_ascii());
    while let Some(line) = lines.next() {
        if line == b"ENDSEC" {
            return None;
        }
        if line == name.as_bytes() {
            lines.next()?;
            return lines.next().and_then(|value| std::str::from_utf8(value).ok());
        }
    }
    None
}
