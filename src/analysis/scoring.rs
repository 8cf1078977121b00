use tracing::debug;

use crate::analysis::tokenizer::{tokenize_with, variant_key, Token};
use crate::config::ScoringConfig;
use crate::types::{KeywordDetail, KeywordSet, MatchResult};

/// Resume tokens alongside their variant keys, ready for window scans.
struct ResumeView {
    tokens: Vec<Token>,
    keys: Vec<String>,
}

impl ResumeView {
    fn new(resume_text: &str, config: &ScoringConfig) -> Self {
        let tokens = tokenize_with(resume_text, config.min_token_len);
        let keys = tokens.iter().map(|t| variant_key(&t.text)).collect();
        Self { tokens, keys }
    }

    /// Number of places where `phrase` appears as a run of adjacent tokens.
    fn occurrences(&self, phrase: &[String]) -> usize {
        let n = phrase.len();
        if n == 0 || n > self.keys.len() {
            return 0;
        }

        (0..=self.keys.len() - n)
            .filter(|&start| {
                self.keys[start..start + n] == *phrase
                    && self.tokens[start..start + n]
                        .windows(2)
                        .all(|pair| pair[0].is_followed_by(&pair[1]))
            })
            .count()
    }
}

/// Score `resume_text` against `keywords` with the default configuration.
pub fn score(resume_text: &str, keywords: &KeywordSet) -> MatchResult {
    score_with(resume_text, keywords, &ScoringConfig::default())
}

pub fn score_with(resume_text: &str, keywords: &KeywordSet, config: &ScoringConfig) -> MatchResult {
    let resume = ResumeView::new(resume_text, config);

    let mut missing = Vec::new();
    let mut details = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        let phrase: Vec<String> = keyword.split(' ').map(variant_key).collect();
        let occurrences = u32::try_from(resume.occurrences(&phrase)).unwrap_or(u32::MAX);
        let found = occurrences > 0;
        if !found {
            missing.push(keyword.clone());
        }
        details.push((keyword.clone(), KeywordDetail { found, occurrences }));
    }

    let matched = keywords.len() - missing.len();
    let score = percentage(matched, keywords.len());

    debug!(
        "Matched {}/{} keywords against {} resume tokens, score {}",
        matched,
        keywords.len(),
        resume.tokens.len(),
        score
    );

    MatchResult {
        score,
        missing,
        details,
    }
}

/// `round(100 * matched / total)` rounding halves up; an empty keyword set scores 100.
fn percentage(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let rounded = (200 * matched + total) / (2 * total);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::extract_keywords;

    const PYTHON_JD: &str =
        "Looking for a Python developer with experience in machine learning and REST APIs";

    fn python_keywords() -> KeywordSet {
        extract_keywords(PYTHON_JD, &ScoringConfig::default())
    }

    fn terms(list: &[&str]) -> KeywordSet {
        KeywordSet::from_terms(list, &ScoringConfig::default())
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(0, 0), 100);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(4, 5), 80);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn test_score_scenario() {
        let result = score("Experienced Python developer skilled in REST APIs", &python_keywords());

        for keyword in ["python", "developer", "experience", "rest apis", "python developer"] {
            assert!(result.detail(keyword).unwrap().found, "{keyword} should be found");
        }
        assert_eq!(result.missing, vec!["machine learning", "machine", "learning"]);
        assert_eq!(result.score, 70);
    }

    #[test]
    fn test_five_keyword_scenario() {
        let keywords = terms(&["python", "machine learning", "rest apis", "developer", "experience"]);
        let result = score("Experienced Python developer skilled in REST APIs", &keywords);
        assert_eq!(result.missing, vec!["machine learning"]);
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_empty_keyword_set_scores_100() {
        let result = score("anything at all", &KeywordSet::default());
        assert_eq!(result.score, 100);
        assert!(result.missing.is_empty());
        assert!(result.details.is_empty());

        let result = score("", &extract_keywords("", &ScoringConfig::default()));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_empty_resume_misses_everything_in_order() {
        let keywords = python_keywords();
        let result = score("", &keywords);
        assert_eq!(result.score, 0);
        assert_eq!(result.missing, keywords.as_slice());
        assert!(result.details.iter().all(|(_, d)| !d.found && d.occurrences == 0));
    }

    #[test]
    fn test_details_partition_keyword_set() {
        let keywords = python_keywords();
        let result = score("Python, machine learning and more python", &keywords);

        let keys: Vec<&str> = result.details.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, keywords.iter().collect::<Vec<_>>());

        let found: Vec<&str> = result.found().collect();
        assert_eq!(found.len() + result.missing.len(), keywords.len());
        assert!(found.iter().all(|k| !result.missing.iter().any(|m| m == k)));
        assert_eq!(result.detail("python").unwrap().occurrences, 2);
    }

    #[test]
    fn test_bigram_requires_adjacency() {
        let keywords = terms(&["machine learning"]);
        assert_eq!(score("machine learning", &keywords).score, 100);
        assert_eq!(score("Machine\nLearning", &keywords).score, 100);
        assert_eq!(score("machine vision, learning", &keywords).score, 0);
        assert_eq!(score("machine. Learning", &keywords).score, 0);
        assert_eq!(score("learning machine", &keywords).score, 0);
    }

    #[test]
    fn test_bigram_occurrence_count() {
        let keywords = terms(&["rest apis"]);
        let result = score("REST APIs everywhere; REST API design", &keywords);
        assert_eq!(result.detail("rest apis").unwrap().occurrences, 2);
    }

    #[test]
    fn test_score_is_idempotent() {
        let keywords = python_keywords();
        let resume = "Senior developer, Python and REST APIs";
        let first = serde_json::to_string(&score(resume, &keywords)).unwrap();
        let second = serde_json::to_string(&score(resume, &keywords)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_adding_missing_keyword_never_lowers_score() {
        let keywords = python_keywords();
        let mut resume = String::from("Python developer");
        let mut previous = score(&resume, &keywords).score;

        for keyword in score(&resume, &keywords).missing {
            resume.push_str(". ");
            resume.push_str(&keyword);
            let next = score(&resume, &keywords).score;
            assert!(next >= previous);
            previous = next;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_score_stays_in_range() {
        let keywords = python_keywords();
        let repeated = PYTHON_JD.repeat(20);
        for resume in ["", "python", PYTHON_JD, repeated.as_str()] {
            assert!(score(resume, &keywords).score <= 100);
        }
        assert_eq!(score(PYTHON_JD, &keywords).score, 100);
    }

    #[test]
    fn test_min_token_len_is_respected() {
        let config = ScoringConfig {
            min_token_len: 3,
            ..ScoringConfig::default()
        };
        let keywords = extract_keywords("Go and Rust", &config);
        assert_eq!(keywords.as_slice(), ["rust"]);
        assert_eq!(score_with("go rust", &keywords, &config).score, 100);
    }
}
