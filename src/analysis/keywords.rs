use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::debug;

use crate::analysis::tokenizer::{tokenize_with, variant_key, Token};
use crate::config::ScoringConfig;
use crate::types::KeywordSet;

#[derive(Debug)]
struct Candidate {
    text: String,
    frequency: u32,
    first_position: usize,
    is_phrase: bool,
}

/// Key under which two phrases count as the same keyword.
pub(crate) fn phrase_key<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    words.into_iter().map(variant_key).collect::<Vec<_>>().join(" ")
}

/// Derive the ranked keyword set of a job description.
///
/// Candidates are single tokens and pairs of adjacent tokens. Tokens are
/// adjacent only when nothing sat between them in the source: a dropped stop
/// word or clause punctuation breaks the pair, so "experience in machine"
/// yields no phrase. Both words of a phrase stay candidates on their own.
///
/// Variants of the same word ("API", "APIs") merge into the first spelling
/// seen. Ranking is by frequency, then by first occurrence, since postings
/// tend to list the required skills first.
pub fn extract_keywords(job_description: &str, config: &ScoringConfig) -> KeywordSet {
    let tokens = tokenize_with(job_description, config.min_token_len);

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut record = |text: String, key: String, position: usize, is_phrase: bool| {
        match index.get(&key) {
            Some(&i) => candidates[i].frequency += 1,
            None => {
                index.insert(key, candidates.len());
                candidates.push(Candidate {
                    text,
                    frequency: 1,
                    first_position: position,
                    is_phrase,
                });
            }
        }
    };

    for (i, token) in tokens.iter().enumerate() {
        if let Some(next) = tokens.get(i + 1).filter(|next| token.is_followed_by(next)) {
            record(
                format!("{} {}", token.text, next.text),
                phrase_key([token.text.as_str(), next.text.as_str()]),
                token.position,
                true,
            );
        }
        record(token.text.clone(), variant_key(&token.text), token.position, false);
    }

    candidates.sort_by_key(|c| (Reverse(c.frequency), c.first_position, !c.is_phrase));
    if config.max_keywords > 0 {
        candidates.truncate(config.max_keywords);
    }

    debug!(
        "Extracted {} keywords from {} job description tokens",
        candidates.len(),
        tokens.len()
    );

    KeywordSet {
        entries: candidates.into_iter().map(|c| c.text).collect(),
    }
}

impl KeywordSet {
    /// Build a keyword set from caller-supplied terms instead of a job description.
    ///
    /// Terms are normalized like any other text. A term whose words are
    /// separated by stop words or punctuation splits into its adjacent runs
    /// ("bachelor of science" yields "bachelor" and "science"). Later
    /// duplicates of an earlier term are dropped.
    pub fn from_terms<I, S>(terms: I, config: &ScoringConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = std::collections::HashSet::new();
        let mut entries = Vec::new();

        for term in terms {
            let tokens = tokenize_with(term.as_ref(), config.min_token_len);
            for run in adjacent_runs(&tokens) {
                let key = phrase_key(run.iter().map(|t| t.text.as_str()));
                if seen.insert(key) {
                    entries.push(
                        run.iter()
                            .map(|t| t.text.as_str())
                            .collect::<Vec<_>>()
                            .join(" "),
                    );
                }
            }
        }

        KeywordSet { entries }
    }
}

fn adjacent_runs(tokens: &[Token]) -> Vec<&[Token]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=tokens.len() {
        if i == tokens.len() || !tokens[i - 1].is_followed_by(&tokens[i]) {
            if start < i {
                runs.push(&tokens[start..i]);
            }
            start = i;
        }
    }
    runs
}
