use std::path::PathBuf;

use thiserror::Error;

use crate::types::FileType;

/// Errors raised while turning a resume file into text.
///
/// Keyword extraction and scoring never fail, so everything here originates
/// in the document layer.
#[derive(Debug, Error)]
pub enum AtsError {
    #[error("Unsupported file type '{0}'. Only pdf, docx and txt files are supported")]
    UnsupportedFormat(String),

    #[error("Could not read {format} document: {reason}")]
    CorruptDocument { format: FileType, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AtsError {
    pub(crate) fn corrupt(format: FileType, reason: impl Into<String>) -> Self {
        AtsError::CorruptDocument {
            format,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AtsError>;
