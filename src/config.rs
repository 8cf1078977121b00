use anyhow::{bail, Context, Result};

pub const DEFAULT_MAX_KEYWORDS: usize = 25;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;
/// Filter used when neither `RUST_LOG` nor a CLI flag sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Knobs for keyword extraction and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Size cap for the keyword set; 0 disables the cap.
    pub max_keywords: usize,
    /// Tokens with fewer characters are discarded. Empty tokens always are.
    pub min_token_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

impl ScoringConfig {
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }
}

/// Application configuration loaded from environment variables.
/// Everything has a default, so a bare environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            scoring: ScoringConfig {
                max_keywords: parse_env("ATSCORE_MAX_KEYWORDS", DEFAULT_MAX_KEYWORDS, 0)?,
                min_token_len: parse_env("ATSCORE_MIN_TOKEN_LEN", DEFAULT_MIN_TOKEN_LEN, 1)?,
            },
        })
    }
}

fn parse_env(key: &str, default: usize, min: usize) -> Result<usize> {
    parse_setting(key, std::env::var(key).ok().as_deref(), default, min)
}

fn parse_setting(key: &str, raw: Option<&str>, default: usize, min: usize) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))?;
    if value < min {
        bail!("{key} must be at least {min}, got {value}");
    }
    Ok(value)
}
