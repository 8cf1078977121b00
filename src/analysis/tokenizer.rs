//! Text normalization shared by keyword extraction and scoring.
//!
//! Lowercases, drops punctuation except hyphens inside a word, splits on
//! whitespace and filters short tokens and stop words. Every token carries a
//! position so callers can tell whether two tokens sat next to each other in
//! the source: filtered words and clause punctuation leave a gap.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::config::DEFAULT_MIN_TOKEN_LEN;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "if", "in", "into", "is", "it", "its", "just", "may", "me", "more",
    "most", "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "within",
    "would", "you", "your", "yours",
    // job posting filler
    "looking", "seeking", "candidate", "candidates", "ideal", "ideally", "plus", "including",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// A normalized token and its slot in the source word stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn is_followed_by(&self, next: &Token) -> bool {
        next.position == self.position + 1
    }
}

/// Punctuation that ends a phrase, so the words around it are never adjacent.
fn is_clause_break(ch: char) -> bool {
    matches!(ch, '.' | ',' | ';' | ':' | '!' | '?' | '•' | '|')
}

fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}')
}

pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with(text, DEFAULT_MIN_TOKEN_LEN)
}

pub fn tokenize_with(text: &str, min_len: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut position = 0;
    let mut word = String::new();

    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == '-' {
            word.push(ch);
            continue;
        }
        if is_apostrophe(ch) {
            continue;
        }

        flush_word(&mut word, &mut position, &mut tokens, min_len);
        if is_clause_break(ch) {
            position += 1;
        }
    }
    flush_word(&mut word, &mut position, &mut tokens, min_len);

    tokens
}

fn flush_word(word: &mut String, position: &mut usize, tokens: &mut Vec<Token>, min_len: usize) {
    if word.is_empty() {
        return;
    }

    let trimmed = word.trim_matches('-');
    if !trimmed.is_empty() && trimmed.chars().count() >= min_len && !is_stop_word(trimmed) {
        tokens.push(Token {
            text: trimmed.to_string(),
            position: *position,
        });
    }
    // dropped words still occupy a slot
    *position += 1;
    word.clear();
}

/// Token text only, in source order.
pub fn normalize(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.text).collect()
}

/// Key under which word variants compare equal ("apis" and "api",
/// "experienced" and "experience"). Hyphenated words are keyed part by part.
pub fn variant_key(token: &str) -> String {
    if !token.contains('-') {
        return strip_suffix(token).to_string();
    }
    token
        .split('-')
        .map(strip_suffix)
        .collect::<Vec<_>>()
        .join("-")
}

fn strip_suffix(word: &str) -> &str {
    const MIN_STEM: usize = 3;
    let long_enough = |s: &&str| s.chars().count() >= MIN_STEM;

    if word.chars().count() <= MIN_STEM {
        return word;
    }

    let stem = if let Some(stem) = word.strip_suffix("ies") {
        stem
    } else if let Some(stem) = word.strip_suffix("ing") {
        stem
    } else if let Some(stem) = word.strip_suffix("ed") {
        stem
    } else if let Some(stem) = word.strip_suffix("es").filter(|s| {
        s.ends_with(|c: char| matches!(c, 's' | 'x' | 'z')) || s.ends_with("ch") || s.ends_with("sh")
    }) {
        stem
    } else if word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    };
    let stem = Some(stem).filter(long_enough).unwrap_or(word);

    // "technology" and "technologies" both end up as "technolog"
    let stem = stem.strip_suffix('y').filter(long_enough).unwrap_or(stem);
    stem.strip_suffix('e').filter(long_enough).unwrap_or(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(
            normalize("Looking for a Python developer with experience in machine learning and REST APIs"),
            vec!["python", "developer", "experience", "machine", "learning", "rest", "apis"]
        );
    }

    #[test]
    fn test_normalize_keeps_internal_hyphens() {
        assert_eq!(
            normalize("Full-stack engineer -- front-end, back-end-"),
            vec!["full-stack", "engineer", "front-end", "back-end"]
        );
    }

    #[test]
    fn test_normalize_punctuation_splits_words() {
        assert_eq!(normalize("Python,Java;C++ (Go)"), vec!["python", "java", "go"]);
        assert_eq!(normalize("CI/CD pipelines"), vec!["ci", "cd", "pipelines"]);
        assert_eq!(normalize("The company's product"), vec!["companys", "product"]);
    }

    #[test]
    fn test_normalize_empty_and_stop_words_only() {
        assert!(normalize("").is_empty());
        assert!(normalize("the and with a I").is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let text = "Senior Rust Engineer: async, Tokio, gRPC & distributed systems.";
        assert_eq!(normalize(text), normalize(text));
    }

    #[test]
    fn test_tokenize_positions_leave_gaps() {
        let tokens = tokenize("Python developer with experience. Machine learning");
        let positions: Vec<_> = tokens.iter().map(|t| (t.text.as_str(), t.position)).collect();
        assert_eq!(
            positions,
            vec![("python", 0), ("developer", 1), ("experience", 3), ("machine", 5), ("learning", 6)]
        );
        assert!(tokens[0].is_followed_by(&tokens[1]));
        assert!(!tokens[1].is_followed_by(&tokens[2]));
        assert!(!tokens[2].is_followed_by(&tokens[3]));
        assert!(tokens[3].is_followed_by(&tokens[4]));
    }

    #[test]
    fn test_tokenize_line_breaks_keep_adjacency() {
        let tokens = tokenize("machine\nlearning");
        assert!(tokens[0].is_followed_by(&tokens[1]));
    }

    #[test]
    fn test_tokenize_with_min_len() {
        let texts: Vec<_> = tokenize_with("go rust sql", 3).into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["rust", "sql"]);
    }

    #[test]
    fn test_tokenize_with_zero_min_len_skips_bare_hyphens() {
        let tokens = tokenize_with("rust -- go", 0);
        let positions: Vec<_> = tokens.iter().map(|t| (t.text.as_str(), t.position)).collect();
        assert_eq!(positions, vec![("rust", 0), ("go", 2)]);
    }

    #[test]
    fn test_variant_key() {
        assert_eq!(variant_key("experienced"), variant_key("experience"));
        assert_eq!(variant_key("apis"), variant_key("api"));
        assert_eq!(variant_key("developers"), variant_key("developer"));
        assert_eq!(variant_key("technologies"), variant_key("technology"));
        assert_eq!(variant_key("processes"), variant_key("process"));
        assert_eq!(variant_key("learning"), "learn");
        assert_eq!(variant_key("full-stacks"), "full-stack");
        assert_eq!(variant_key("aws"), "aws");
        assert_eq!(variant_key("business"), "business");
        assert_ne!(variant_key("python"), variant_key("pythons-x"));
    }
}
