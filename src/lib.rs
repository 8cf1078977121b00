pub mod analysis;
pub mod cmd;
pub mod config;
pub mod error;
pub mod parsers;
pub mod types;
pub mod utils;

pub use analysis::{analyze, analyze_path, extract_keywords, normalize, score};
pub use config::{Config, ScoringConfig};
pub use error::AtsError;
pub use parsers::{extract, extract_from_path};
pub use types::{AtsReport, FileType, KeywordDetail, KeywordSet, MatchResult, RawDocument};
pub use utils::{join_keywords, parse_filetype, read_keywords_from_file, split_keywords};
