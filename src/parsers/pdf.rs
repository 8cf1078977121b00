use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::{AtsError, Result};
use crate::parsers::TextExtractor;
use crate::types::FileType;

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn format(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        extract_from_mem(bytes)
    }
}

/// Extract text page by page and join the pages with a blank line.
///
/// Pages without a text layer (scanned images) come back empty; the
/// document as a whole still succeeds. There is no OCR.
pub fn extract_from_mem(bytes: &[u8]) -> Result<String> {
    let pages = extract_pages(bytes)?;

    let empty = pages.iter().filter(|page| page.trim().is_empty()).count();
    if empty > 0 {
        warn!(
            "{} of {} pdf pages have no extractable text (image-only pages are not OCR'd)",
            empty,
            pages.len()
        );
    }
    debug!("Extracted {} pdf pages", pages.len());

    Ok(pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    // pdf-extract panics on some malformed inputs instead of returning an error
    panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| AtsError::corrupt(FileType::Pdf, "malformed PDF structure"))?
    .map_err(|e| AtsError::corrupt(FileType::Pdf, e.to_string()))
}
