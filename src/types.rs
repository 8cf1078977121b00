use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::AtsError;

/// Supported resume file types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Microsoft Word document (.docx)
    Docx,
    /// Portable Document Format (.pdf)
    Pdf,
    /// Plain text (.txt)
    Txt,
}

impl FileType {
    pub const ALL: [FileType; 3] = [FileType::Pdf, FileType::Docx, FileType::Txt];

    /// Get the file extension for this file type
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Docx => ".docx",
            FileType::Pdf => ".pdf",
            FileType::Txt => ".txt",
        }
    }

    /// Get the MIME type for this file type
    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            FileType::Pdf => "application/pdf",
            FileType::Txt => "text/plain",
        }
    }

    pub fn tag(&self) -> &'static str {
        &self.extension()[1..]
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FileType {
    type Err = AtsError;

    /// Accepts `pdf`, `.PDF`, `docx`, `txt` and so on.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().trim_start_matches('.').to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|ft| ft.tag() == normalized)
            .ok_or_else(|| AtsError::UnsupportedFormat(tag.to_string()))
    }
}

/// A resume as it arrives from the caller: raw bytes plus the declared format.
#[derive(Clone, Copy, Debug)]
pub struct RawDocument<'a> {
    pub bytes: &'a [u8],
    pub format: FileType,
}

impl<'a> RawDocument<'a> {
    pub fn new(bytes: &'a [u8], format: FileType) -> Self {
        Self { bytes, format }
    }
}

/// Ordered, duplicate-free keywords derived from a job description.
/// Order is rank: the most relevant keyword comes first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet {
    pub(crate) entries: Vec<String>,
}

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KeywordDetail {
    pub found: bool,
    pub occurrences: u32,
}

/// Outcome of scoring one resume against one keyword set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// 0 to 100
    pub score: u8,
    #[serde(rename = "missing_keywords")]
    pub missing: Vec<String>,
    /// One entry per keyword, in keyword-set order.
    #[serde(serialize_with = "details_as_map")]
    pub details: Vec<(String, KeywordDetail)>,
}

fn details_as_map<S>(details: &[(String, KeywordDetail)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(details.len()))?;
    for (keyword, detail) in details {
        map.serialize_entry(keyword, detail)?;
    }
    map.end()
}

impl MatchResult {
    pub fn found(&self) -> impl Iterator<Item = &str> {
        self.details
            .iter()
            .filter(|(_, d)| d.found)
            .map(|(k, _)| k.as_str())
    }

    pub fn detail(&self, keyword: &str) -> Option<&KeywordDetail> {
        self.details
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, d)| d)
    }

    /// Missing keywords as a single comma-separated field.
    /// `utils::split_keywords` reverses this.
    pub fn missing_joined(&self) -> String {
        crate::utils::join_keywords(&self.missing)
    }
}

/// Everything produced for one resume/job-description pair.
#[derive(Clone, Debug, Serialize)]
pub struct AtsReport {
    pub resume_text: String,
    pub keywords: KeywordSet,
    #[serde(flatten)]
    pub result: MatchResult,
}
