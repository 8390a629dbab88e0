//! Integration tests for the topicdiff commands.
//!
//! Each test writes a topic-model document to a temp dir and runs a command
//! against default settings, checking the JSON written.

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use topicdiff_cli::{execute, Commands};
use topicdiff_types::{MatchStrategy, Settings, TopicRef};

const GROWING: &str = r##"[
    {"topics": [[["a", 0.5], ["b", 0.5]], [["c", 1.0]]]},
    {"topics": [[["c", 1.0]], [["a", 0.5], ["b", 0.5]], [["b", 0.6], ["d", 0.4, "#80b1d3"]]]}
]"##;

const SWAPPED: &str = r#"[
    {"topics": [[["a", 1.0]], [["b", 1.0]]]},
    {"topics": [[["b", 1.0]], [["a", 1.0]]]}
]"#;

/// Temp dir holding one data document.
struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

impl Fixture {
    fn new(json: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("topics.json");
        std::fs::write(&path, json).expect("Failed to write fixture");
        Self { _dir: dir, path }
    }
}

fn run(command: Commands) -> Value {
    let mut out = Vec::new();
    execute(&command, &Settings::default(), &mut out).expect("command failed");
    serde_json::from_slice(&out).expect("output is not JSON")
}

#[test]
fn test_distance_between_topics() {
    let fixture = Fixture::new(GROWING);
    let value = run(Commands::Distance {
        file: fixture.path.clone(),
        a: TopicRef::new(0, 0),
        b: TopicRef::new(1, 1),
    });
    assert_eq!(value["a"]["model"], 0);
    assert!(value["distance"].as_f64().unwrap().abs() < 1e-12);
}

#[test]
fn test_distance_unknown_topic() {
    let fixture = Fixture::new(GROWING);
    let mut out = Vec::new();
    let result = execute(
        &Commands::Distance {
            file: fixture.path.clone(),
            a: TopicRef::new(0, 0),
            b: TopicRef::new(4, 0),
        },
        &Settings::default(),
        &mut out,
    );
    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn test_forest_with_links() {
    let fixture = Fixture::new(GROWING);
    let value = run(Commands::Forest {
        file: fixture.path.clone(),
        links: true,
        min_prob: Some(0.3),
    });

    let edges = value["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 3);
    // Root 0-0 keeps its exact match first, then the partial match
    assert_eq!(edges[0]["child"]["topic"], 1);
    assert_eq!(edges[1]["child"]["topic"], 2);
    assert_eq!(edges[2]["parent"]["topic"], 1);
    assert_eq!(edges[2]["child"]["topic"], 0);

    let layers = value["layers"].as_array().unwrap();
    assert_eq!(layers[1].as_array().unwrap().len(), 3);

    let links = value["links"].as_array().unwrap();
    let terms: Vec<&str> = links.iter().map(|l| l["term"].as_str().unwrap()).collect();
    assert_eq!(terms, vec!["a", "b", "b", "c"]);
}

#[test]
fn test_forest_without_links() {
    let fixture = Fixture::new(GROWING);
    let value = run(Commands::Forest {
        file: fixture.path.clone(),
        links: false,
        min_prob: None,
    });
    assert!(value["links"].as_array().unwrap().is_empty());
    assert_eq!(value["top_terms"][0][0], "c");
}

#[test]
fn test_forest_rejects_bad_min_prob() {
    let fixture = Fixture::new(GROWING);
    let mut out = Vec::new();
    let result = execute(
        &Commands::Forest {
            file: fixture.path.clone(),
            links: true,
            min_prob: Some(3.0),
        },
        &Settings::default(),
        &mut out,
    );
    assert!(result.is_err());
}

#[test]
fn test_forest_rejects_invalid_probabilities() {
    let fixture = Fixture::new(r#"[{"topics": [[["a", -0.2]]]}]"#);
    let mut out = Vec::new();
    let result = execute(
        &Commands::Forest {
            file: fixture.path.clone(),
            links: false,
            min_prob: None,
        },
        &Settings::default(),
        &mut out,
    );
    assert!(result.is_err());
}

#[test]
fn test_match_skips_unequal_pairs() {
    let fixture = Fixture::new(GROWING);
    let value = run(Commands::Match {
        file: fixture.path.clone(),
        strategy: None,
    });
    assert!(value.as_array().unwrap().is_empty());
}

#[test]
fn test_match_swapped_topics() {
    let fixture = Fixture::new(SWAPPED);
    let value = run(Commands::Match {
        file: fixture.path.clone(),
        strategy: Some(MatchStrategy::Greedy),
    });
    let pairs = value.as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["mapping"], serde_json::json!([1, 0]));
    assert!(pairs[0]["total_cost"].as_f64().unwrap().abs() < 1e-12);
}

#[test]
fn test_match_and_reorder_share_supplied_diff() {
    // The supplied diff contradicts the topics' own distances
    let fixture = Fixture::new(
        r#"[
        {"topics": [[["a", 1.0]], [["b", 1.0]]]},
        {"topics": [[["a", 1.0]], [["b", 1.0]]], "diff": [[0.9, 0.1], [0.1, 0.9]]}
    ]"#,
    );
    let matched = run(Commands::Match {
        file: fixture.path.clone(),
        strategy: None,
    });
    assert_eq!(matched[0]["mapping"], serde_json::json!([1, 0]));
    assert!((matched[0]["total_cost"].as_f64().unwrap() - 0.2).abs() < 1e-12);

    let reordered = run(Commands::Reorder {
        file: fixture.path.clone(),
        strategy: None,
    });
    assert_eq!(reordered[1]["topics"][0][0][0], "b");
    assert_eq!(reordered[1]["topics"][1][0][0], "a");
}

#[test]
fn test_forest_rejects_topic_mass_above_one() {
    let fixture = Fixture::new(
        r#"[{"topics": [[["x", 1.0], ["y", 1.0]]]}, {"topics": [[["z", 1.0]]]}]"#,
    );
    let mut out = Vec::new();
    let result = execute(
        &Commands::Forest {
            file: fixture.path.clone(),
            links: false,
            min_prob: None,
        },
        &Settings::default(),
        &mut out,
    );
    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn test_reorder_outputs_document() {
    let fixture = Fixture::new(SWAPPED);
    let value = run(Commands::Reorder {
        file: fixture.path.clone(),
        strategy: None,
    });
    assert_eq!(value[1]["topics"][0][0][0], "a");
    assert_eq!(value[1]["topics"][1][0][0], "b");
}

#[test]
fn test_top_terms_limit() {
    let fixture = Fixture::new(GROWING);
    let value = run(Commands::TopTerms {
        file: fixture.path.clone(),
        n: Some(2),
    });
    let terms = value.as_array().unwrap();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0][0], "c");
    assert_eq!(terms[1][0], "b");
}

#[test]
fn test_missing_file() {
    let mut out = Vec::new();
    let result = execute(
        &Commands::TopTerms {
            file: PathBuf::from("/nonexistent/topics.json"),
            n: None,
        },
        &Settings::default(),
        &mut out,
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read topic models"));
}
