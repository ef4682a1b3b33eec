use super::*;
use std::collections::HashMap;

/// Minimal record for exercising the engine without the snippet store
#[derive(Debug, Clone, PartialEq)]
struct TestRecord {
    id: String,
    name: String,
    description: String,
    tags: Vec<String>,
    content: String,
}

impl Searchable for TestRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn content(&self) -> &str {
        &self.content
    }
}

fn record(id: &str, name: &str, description: &str, tags: &[&str], content: &str) -> TestRecord {
    TestRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        content: content.to_string(),
    }
}

fn library() -> Vec<TestRecord> {
    vec![
        record(
            "flask-run",
            "Flask development server",
            "Start Flask app with custom port and debug enabled",
            &["python", "flask", "development"],
            "python -m flask --app {{app_name:app}} run --debug --port {{port:5000}}",
        ),
        record(
            "git-uncommit",
            "Undo last commit (keep changes)",
            "Git command to undo last commit but keep changes in working directory",
            &["git", "version-control"],
            "git reset --soft HEAD~1",
        ),
        record(
            "win-reset-network",
            "Reset network adapter",
            "Reset all network settings (requires admin)",
            &["windows", "network", "admin"],
            "ipconfig /release\nipconfig /renew\nnetsh winsock reset catalog",
        ),
        record(
            "pytest-run",
            "Run test suite",
            "Run pytest with coverage",
            &["python", "testing"],
            "pytest --cov=src tests/",
        ),
        record(
            "llm-code-review",
            "Code review prompt",
            "Request detailed code review from LLM",
            &["llm", "code-review", "ai"],
            "Please review the following code:\n{{code_snippet}}",
        ),
    ]
}

fn ids(results: &[SearchResult<'_, TestRecord>]) -> Vec<String> {
    results.iter().map(|r| r.record.id.clone()).collect()
}

// ============================================
// EMPTY QUERY / EMPTY COLLECTION
// ============================================

#[test]
fn test_empty_query_returns_nothing() {
    let records = library();
    let engine = SearchEngine::new(&records);
    assert!(engine.search("", 0.0).is_empty());
    assert!(engine.search("", 60.0).is_empty());
}

#[test]
fn test_whitespace_query_returns_nothing() {
    let records = library();
    let engine = SearchEngine::new(&records);
    assert!(engine.search("   ", 0.0).is_empty());
    assert!(engine.search("\t\n ", 0.0).is_empty());
}

#[test]
fn test_empty_collection_returns_empty_list() {
    let records: Vec<TestRecord> = Vec::new();
    let engine = SearchEngine::new(&records);
    assert!(engine.search("flask", 0.0).is_empty());
}

// ============================================
// ORDERING AND BOUNDS
// ============================================

#[test]
fn test_search_is_deterministic() {
    let records = library();
    let engine = SearchEngine::new(&records);
    let first = engine.search("reset", 10.0);
    let second = engine.search("reset", 10.0);

    assert_eq!(ids(&first), ids(&second));
    let first_scores: Vec<f64> = first.iter().map(|r| r.score).collect();
    let second_scores: Vec<f64> = second.iter().map(|r| r.score).collect();
    assert_eq!(first_scores, second_scores);
}

#[test]
fn test_threshold_monotonicity() {
    let records = library();
    let engine = SearchEngine::new(&records);
    let strict = ids(&engine.search("test", 80.0));
    let loose = ids(&engine.search("test", 10.0));

    for id in &strict {
        assert!(loose.contains(id), "{} missing from low-threshold results", id);
    }
    assert!(loose.len() >= strict.len());
}

#[test]
fn test_scores_within_bounds_and_descending() {
    let records = library();
    let engine = SearchEngine::new(&records);

    for query in ["git", "flask", "review", "net", "zzzz", "{{", "🦀", "ünï"] {
        let results = engine.search(query, 0.0);
        for result in &results {
            assert!(
                (0.0..=100.0).contains(&result.score),
                "{} scored {}",
                query,
                result.score
            );
        }
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score, "unsorted for {}", query);
        }
    }
}

#[test]
fn test_scores_rounded_to_two_decimals() {
    let records = library();
    let engine = SearchEngine::new(&records);
    for result in engine.search("commit", 0.0) {
        let scaled = result.score * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "{}", result.score);
    }
}

#[test]
fn test_threshold_is_inclusive() {
    let records = vec![record("a", "docker", "", &[], "")];
    let engine = SearchEngine::new(&records);
    let results = engine.search("docker", 100.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 100.0);
}

#[test]
fn test_equal_scores_keep_collection_order() {
    let records = vec![
        record("first", "docker compose", "", &[], ""),
        record("second", "docker compose", "", &[], ""),
        record("third", "docker compose", "", &[], ""),
    ];
    let engine = SearchEngine::new(&records);
    let results = engine.search("docker", 0.0);
    assert_eq!(ids(&results), vec!["first", "second", "third"]);
}

// ============================================
// SCORING
// ============================================

#[test]
fn test_name_match_outranks_content_match() {
    let records = vec![
        record("in-content", "something", "", &[], "git helper"),
        record("in-name", "git helper", "", &[], "something"),
    ];
    let engine = SearchEngine::new(&records);
    let results = engine.search("git", 0.0);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.id, "in-name");
    assert!(results[0].score > results[1].score);
    // (100 * 3 + 50 * 1) / 4 and (50 * 3 + 100 * 1) / 4
    assert_eq!(results[0].score, 87.5);
    assert_eq!(results[1].score, 62.5);
}

#[test]
fn test_typo_tolerance() {
    let records = library();
    let engine = SearchEngine::new(&records);
    let results = engine.search("flsk", 40.0);

    let flask = results
        .iter()
        .find(|r| r.record.id == "flask-run")
        .expect("flask snippet should match a typo");
    assert!(flask.score > 0.0);
    assert!((flask.score - 75.0).abs() < 1e-9);
}

#[test]
fn test_query_is_case_insensitive_and_trimmed() {
    let records = vec![record("a", "Flask", "", &[], "")];
    let engine = SearchEngine::new(&records);
    let results = engine.search("  FLASK  ", 0.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 100.0);
}

#[test]
fn test_missing_fields_are_not_penalized() {
    let sparse = record("sparse", "docker", "", &[], "");
    let full = record(
        "full",
        "docker",
        "docker helper",
        &["docker"],
        "docker compose up",
    );
    let records = vec![sparse, full];
    let engine = SearchEngine::new(&records);
    let results = engine.search("docker", 0.0);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.score == 100.0));
}

#[test]
fn test_record_without_fields_scores_zero() {
    let records = vec![record("blank", "", "", &[], "")];
    let engine = SearchEngine::new(&records);

    assert_eq!(engine.score(&records[0], "anything"), 0.0);
    assert!(engine.search("anything", 1.0).is_empty());
}

#[test]
fn test_best_tag_counts() {
    let records = vec![record("k8s", "", "", &["zzz", "kubernetes", "zzz"], "")];
    let engine = SearchEngine::new(&records);
    assert_eq!(engine.score(&records[0], "kube"), 100.0);
}

#[test]
fn test_custom_weights_change_ranking() {
    let records = vec![
        record("in-content", "something", "", &[], "git helper"),
        record("in-name", "git helper", "", &[], "something"),
    ];
    let weights = FieldWeights {
        name: 1.0,
        description: 1.0,
        tags: 1.0,
        content: 10.0,
    };
    let engine = SearchEngine::with_weights(&records, weights);
    let results = engine.search("git", 0.0);

    assert_eq!(results[0].record.id, "in-content");
    assert_eq!(engine.weights(), weights);
}

#[test]
fn test_default_weights() {
    let weights = FieldWeights::default();
    assert_eq!(weights.name, 3.0);
    assert_eq!(weights.description, 2.0);
    assert_eq!(weights.tags, 2.0);
    assert_eq!(weights.content, 1.0);
    assert_eq!(DEFAULT_FUZZY_THRESHOLD, 60.0);
}

#[test]
fn test_unusual_queries_never_panic() {
    let records = library();
    let engine = SearchEngine::new(&records);
    for query in ["!@#$%^&*()", "{{}}", "\\", "日本語", "🦀🦀🦀", "a", "x".repeat(200).as_str()] {
        let _ = engine.search(query, 0.0);
    }
}

// ============================================
// RANKING
// ============================================

fn usage_map(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_rank_results_prefers_usage_then_score() {
    let records = vec![
        record("exact", "docker", "", &[], ""),
        record("close", "dockerfile lint", "", &["dokcer"], ""),
        record("used", "docker compose", "", &[], "docker compose up -d"),
    ];
    let engine = SearchEngine::new(&records);
    let usage = usage_map(&[("used", 5)]);

    let ranked = rank_results(
        engine.search("docker", 0.0),
        |r: &TestRecord| usage.get(&r.id).copied().unwrap_or(0),
        10,
    );

    assert_eq!(ranked[0].record.id, "used");
    for pair in ranked[1..].windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_rank_results_truncates() {
    let records = library();
    let engine = SearchEngine::new(&records);
    let ranked = rank_results(engine.search("e", 0.0), |_: &TestRecord| 0, 2);
    assert!(ranked.len() <= 2);
}

#[test]
fn test_search_ranked_matches_manual_pipeline() {
    let records = library();
    let engine = SearchEngine::new(&records);
    let usage = usage_map(&[("pytest-run", 3)]);
    let count = |r: &TestRecord| usage.get(&r.id).copied().unwrap_or(0);

    let manual = rank_results(engine.search("run", 20.0), count, 3);
    let combined = search_ranked(&engine, "run", 20.0, count, 3);
    assert_eq!(ids(&manual), ids(&combined));
}

#[test]
fn test_browse_order_usage_then_name() {
    let records = vec![
        record("b", "beta", "", &[], "x"),
        record("a", "Alpha", "", &[], "x"),
        record("c", "charlie", "", &[], "x"),
    ];
    let usage = usage_map(&[("c", 2)]);

    let ordered = browse_order(&records, |r: &TestRecord| usage.get(&r.id).copied().unwrap_or(0), 10);
    let order: Vec<&str> = ordered.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec!["c", "a", "b"]);

    let limited = browse_order(&records, |_: &TestRecord| 0, 1);
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, "a");
}
