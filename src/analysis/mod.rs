//! Keyword extraction and ATS scoring.

pub mod keywords;
pub mod scoring;
pub mod tokenizer;

use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::parsers;
use crate::types::{AtsReport, FileType, KeywordSet, RawDocument};

pub use keywords::extract_keywords;
pub use scoring::{score, score_with};
pub use tokenizer::{normalize, tokenize, Token};

/// Extract a resume, derive the job description's keywords and score the pair.
pub fn analyze(
    document: RawDocument<'_>,
    job_description: &str,
    config: &ScoringConfig,
) -> Result<AtsReport> {
    let resume_text = parsers::extract(document)?;
    let keywords = extract_keywords(job_description, config);
    Ok(report(resume_text, keywords, config))
}

/// Same as [`analyze`] for a file on disk.
pub fn analyze_path(
    path: &Path,
    format: Option<FileType>,
    job_description: &str,
    config: &ScoringConfig,
) -> Result<AtsReport> {
    let resume_text = parsers::extract_from_path(path, format)?;
    let keywords = extract_keywords(job_description, config);
    Ok(report(resume_text, keywords, config))
}

/// Score already-extracted text against a prepared keyword set.
pub fn report(resume_text: String, keywords: KeywordSet, config: &ScoringConfig) -> AtsReport {
    let start = Instant::now();
    let result = score_with(&resume_text, &keywords, config);
    info!(
        "Scored resume: {} ({} of {} keywords missing) in {} ms",
        result.score,
        result.missing.len(),
        keywords.len(),
        start.elapsed().as_millis()
    );

    AtsReport {
        resume_text,
        keywords,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_plain_text() {
        let resume = b"Experienced Python developer skilled in REST APIs";
        let report = analyze(
            RawDocument::new(resume, FileType::Txt),
            "Looking for a Python developer with experience in machine learning and REST APIs",
            &ScoringConfig::default(),
        )
        .unwrap();

        assert_eq!(report.resume_text, "Experienced Python developer skilled in REST APIs");
        assert_eq!(report.keywords.len(), 10);
        assert_eq!(report.result.score, 70);
        assert_eq!(report.result.missing_joined(), "machine learning,machine,learning");
    }

    #[test]
    fn test_analyze_reports_corrupt_documents() {
        let result = analyze(
            RawDocument::new(b"not a zip", FileType::Docx),
            "Rust engineer",
            &ScoringConfig::default(),
        );
        assert!(matches!(
            result,
            Err(crate::error::AtsError::CorruptDocument { .. })
        ));
    }
}
