use tracing::warn;

use crate::error::Result;
use crate::parsers::TextExtractor;
use crate::types::FileType;

pub struct TxtExtractor;

impl TextExtractor for TxtExtractor {
    fn format(&self) -> FileType {
        FileType::Txt
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(extract_from_mem(bytes))
    }
}

/// Decode plain text. Never fails: UTF-16 files with a byte order mark are
/// decoded as such when the rest decodes cleanly, and invalid UTF-8 is
/// replaced with U+FFFD.
pub fn extract_from_mem(bytes: &[u8]) -> String {
    if let Some(text) = decode_utf16(bytes) {
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!("Text file is not valid UTF-8 ({e}), replacing invalid sequences");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (body, from_bytes): (&[u8], fn([u8; 2]) -> u16) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => (rest, u16::from_be_bytes),
        _ => return None,
    };
    if body.len() % 2 != 0 {
        return None;
    }

    // a Latin-1 file starting with "ÿþ" looks like a BOM but won't decode
    char::decode_utf16(body.chunks_exact(2).map(|pair| from_bytes([pair[0], pair[1]])))
        .collect::<std::result::Result<String, _>>()
        .ok()
}
