pub mod docx;
pub mod pdf;
pub mod txt;

use std::path::Path;
use std::time::Instant;

use tracing::debug;

use crate::error::{AtsError, Result};
use crate::types::{FileType, RawDocument};
use crate::utils::parse_filetype;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use txt::TxtExtractor;

/// Turns the bytes of one document format into plain text.
pub trait TextExtractor: Send + Sync {
    fn format(&self) -> FileType;

    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

static PDF: PdfExtractor = PdfExtractor;
static DOCX: DocxExtractor = DocxExtractor;
static TXT: TxtExtractor = TxtExtractor;

pub fn extractor_for(format: FileType) -> &'static dyn TextExtractor {
    match format {
        FileType::Pdf => &PDF,
        FileType::Docx => &DOCX,
        FileType::Txt => &TXT,
    }
}

/// Extract the text of an in-memory document.
pub fn extract(document: RawDocument<'_>) -> Result<String> {
    let start = Instant::now();
    let text = extractor_for(document.format).extract(document.bytes)?;
    debug!(
        "Extracted {} chars from {} bytes of {} in {} ms",
        text.chars().count(),
        document.bytes.len(),
        document.format,
        start.elapsed().as_millis()
    );
    Ok(text)
}

/// Like [`extract`], with the format given as a tag such as `"pdf"`.
pub fn extract_tagged(bytes: &[u8], format_tag: &str) -> Result<String> {
    let format = format_tag.parse::<FileType>()?;
    extract(RawDocument::new(bytes, format))
}

/// Read and extract a document from disk. Without an explicit format the
/// file extension decides.
pub fn extract_from_path(path: &Path, format: Option<FileType>) -> Result<String> {
    let format = match format {
        Some(format) => format,
        None => parse_filetype(path)?,
    };
    let bytes = std::fs::read(path).map_err(|source| AtsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract(RawDocument::new(&bytes, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_format() {
        for format in FileType::ALL {
            assert_eq!(extractor_for(format).format(), format);
        }
    }

    #[test]
    fn test_extract_tagged_rejects_unknown_format() {
        assert!(matches!(
            extract_tagged(b"hello", "rtf"),
            Err(AtsError::UnsupportedFormat(_))
        ));
        assert_eq!(extract_tagged(b"hello", "TXT").unwrap(), "hello");
    }

    #[test]
    fn test_extract_from_path_missing_file() {
        let result = extract_from_path(Path::new("/nonexistent/resume.txt"), None);
        assert!(matches!(result, Err(AtsError::Io { .. })));
    }
}
