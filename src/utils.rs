use std::path::Path;

use anyhow::{Context, Result};
use nom::branch::alt;
use nom::bytes::complete::is_not;
use nom::character::complete::{anychar, char, none_of, space0};
use nom::multi::{fold_many0, separated_list0};
use nom::sequence::preceded;
use nom::IResult;
use tracing::warn;

use crate::error::AtsError;
use crate::types::FileType;

/// Parse a keyword line in the format "term" or "term,note"
pub fn parse_keyword_line(input: &str) -> IResult<&str, &str> {
    let (input, _) = space0(input)?;
    let (input, term) = is_not(",")(input)?;

    Ok((input, term.trim()))
}

/// Read keywords from a file, one per line
pub fn read_keywords_from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keywords file: {}", path.display()))?;

    read_keywords_from_str(&content)
}

pub fn read_keywords_from_str(content: &str) -> Result<Vec<String>> {
    let mut keywords = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_keyword_line(line) {
            Ok((_, term)) if !term.is_empty() => keywords.push(term.to_string()),
            _ => warn!("Failed to parse keyword line {}: '{}'", line_num + 1, line),
        }
    }

    if keywords.is_empty() {
        return Err(anyhow::anyhow!("No valid keywords found in input"));
    }

    Ok(keywords)
}

/// Parse file type from a file path's extension
pub fn parse_filetype(path: &Path) -> std::result::Result<FileType, AtsError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| AtsError::UnsupportedFormat(path.display().to_string()))?
        .parse()
}

/// Join keywords into one comma-separated field, escaping `,` and `\`.
pub fn join_keywords<S: AsRef<str>>(keywords: &[S]) -> String {
    keywords
        .iter()
        .map(|k| k.as_ref().replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(",")
}

fn escaped_keyword(input: &str) -> IResult<&str, String> {
    fold_many0(
        alt((preceded(char('\\'), anychar), none_of("\\,"))),
        String::new,
        |mut keyword, c| {
            keyword.push(c);
            keyword
        },
    )(input)
}

/// Inverse of [`join_keywords`].
pub fn split_keywords(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }

    match separated_list0(char(','), escaped_keyword)(joined) {
        Ok((rest, mut keywords)) => {
            // only a dangling escape character can be left over
            if let Some(last) = keywords.last_mut() {
                last.push_str(rest);
            }
            keywords
        }
        Err(_) => vec![joined.to_string()],
    }
}
