use atscore::analysis::{report, score_with};
use atscore::{
    analyze, analyze_path, extract_keywords, score, split_keywords, FileType, KeywordSet,
    RawDocument, ScoringConfig,
};

const JOB_DESCRIPTION: &str = "\
Senior Backend Engineer

We are looking for a backend engineer with strong Python and Rust skills.
You will design REST APIs, own PostgreSQL schemas and deploy services on Kubernetes.
Experience with machine learning pipelines is a plus. Python and Kubernetes are required.";

const STRONG_RESUME: &str = "\
Jane Doe - Backend Engineer
Seven years building REST APIs in Python and Rust.
Designed PostgreSQL schemas, deployed services to Kubernetes clusters,
and maintained machine learning pipelines for the data team.";

const WEAK_RESUME: &str = "Graphic designer. Photoshop, Illustrator, typography.";

fn config() -> ScoringConfig {
    ScoringConfig::default()
}

#[test]
fn strong_resume_beats_weak_resume() {
    let keywords = extract_keywords(JOB_DESCRIPTION, &config());
    assert_eq!(keywords.len(), 25);

    let strong = score(STRONG_RESUME, &keywords);
    let weak = score(WEAK_RESUME, &keywords);
    assert!(strong.score > weak.score, "{} <= {}", strong.score, weak.score);
    assert!(strong.score >= 50);

    // repeated terms rank first, earliest mention breaking ties
    assert_eq!(
        &keywords.as_slice()[..5],
        ["backend engineer", "backend", "engineer", "python", "kubernetes"]
    );
    assert_eq!(strong.score, 68);
    assert_eq!(weak.score, 0);
    assert!(strong.detail("python").unwrap().found);
    assert!(strong.detail("rest apis").unwrap().found);
}

#[test]
fn every_keyword_is_either_found_or_missing() {
    let keywords = extract_keywords(JOB_DESCRIPTION, &config());
    for resume in [STRONG_RESUME, WEAK_RESUME, ""] {
        let result = score(resume, &keywords);
        assert_eq!(result.details.len(), keywords.len());

        let mut all: Vec<&str> = result.found().collect();
        all.extend(result.missing.iter().map(String::as_str));
        all.sort_unstable();
        let mut expected: Vec<&str> = keywords.iter().collect();
        expected.sort_unstable();
        assert_eq!(all, expected);
    }
}

#[test]
fn missing_keywords_keep_rank_order() {
    let keywords = extract_keywords(JOB_DESCRIPTION, &config());
    let result = score(WEAK_RESUME, &keywords);
    assert_eq!(result.score, 0);
    assert_eq!(result.missing, keywords.as_slice());
}

#[test]
fn missing_keywords_survive_join_and_split() {
    let keywords = extract_keywords(JOB_DESCRIPTION, &config());
    let result = score("Python only", &keywords);
    assert_eq!(split_keywords(&result.missing_joined()), result.missing);
}

#[test]
fn custom_keyword_list_scores_exactly() {
    let keywords = KeywordSet::from_terms(
        ["Python", "Machine Learning", "REST APIs", "Developer", "Experience"],
        &config(),
    );
    let result = score_with(
        "Experienced Python developer skilled in REST APIs",
        &keywords,
        &config(),
    );
    assert_eq!(result.score, 80);
    assert_eq!(result.missing, vec!["machine learning"]);
}

#[test]
fn analyze_path_matches_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.txt");
    std::fs::write(&path, STRONG_RESUME).unwrap();

    let from_path = analyze_path(&path, None, JOB_DESCRIPTION, &config()).unwrap();
    let from_memory = analyze(
        RawDocument::new(STRONG_RESUME.as_bytes(), FileType::Txt),
        JOB_DESCRIPTION,
        &config(),
    )
    .unwrap();

    assert_eq!(from_path.result, from_memory.result);
    assert_eq!(from_path.resume_text, STRONG_RESUME);
}

#[test]
fn report_serializes_match_result_fields() {
    let keywords = KeywordSet::from_terms(["rust", "go"], &config());
    let report = report("Rust".to_string(), keywords, &config());
    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert_eq!(json["score"], 50);
    assert_eq!(json["missing_keywords"], serde_json::json!(["go"]));
    assert_eq!(json["details"]["rust"]["found"], true);
    assert_eq!(json["details"]["go"]["occurrences"], 0);
    assert_eq!(json["keywords"], serde_json::json!(["rust", "go"]));
}

#[test]
fn empty_job_description_imposes_nothing() {
    let keywords = extract_keywords("", &config());
    let result = score(STRONG_RESUME, &keywords);
    assert_eq!(result.score, 100);
    assert!(result.missing.is_empty());
}
