//! Score File Migration Tests
//!
//! Legacy score files found on first start are read once, rewritten in the
//! current schema, and never consulted again.

use std::fs;
use std::path::Path;

use jontrain_core::scores::{
    Category, LoadSource, ScoreRecord, ScoreStore, StoreConfig, LEGACY_FILENAME, MAX_ENTRIES,
    SCHEMA_FILENAME, SCHEMA_VERSION,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

/// `{"mult":[{"name":"A","points":5,"date":"x"}]}` migrates to the current
/// schema with every other category empty.
#[test]
fn test_bare_legacy_file_migrates() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join(LEGACY_FILENAME);
    fs::write(&legacy, r#"{"mult":[{"name":"A","points":5,"date":"x"}]}"#).unwrap();

    let store = ScoreStore::load(StoreConfig::new(dir.path()).with_legacy_paths(vec![legacy.clone()]));
    assert_eq!(store.load_source(), &LoadSource::LegacyBare(legacy));

    let mult = store.scores(Category::Mult);
    assert_eq!(mult.len(), 1);
    assert_eq!((mult[0].name.as_str(), mult[0].points, mult[0].date.as_str()), ("A", 5, "x"));
    for category in Category::ALL.into_iter().filter(|c| *c != Category::Mult) {
        assert!(store.scores(category).is_empty(), "{} should be empty", category);
    }

    let written = read_json(&dir.path().join(SCHEMA_FILENAME));
    assert_eq!(written["schema_version"], json!(SCHEMA_VERSION));
    assert_eq!(written["data"]["mult"][0]["name"], json!("A"));
    assert_eq!(written["data"].as_object().unwrap().len(), 6);
}

#[test]
fn test_second_start_reads_current_file() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join(LEGACY_FILENAME);
    fs::write(&legacy, r#"{"data":{"div":[{"name":"B","points":2,"date":"y"}]}}"#).unwrap();
    let config = StoreConfig::new(dir.path()).with_legacy_paths(vec![legacy.clone()]);

    let first = ScoreStore::load(config.clone());
    assert_eq!(first.load_source(), &LoadSource::LegacyWrapped(legacy.clone()));

    // Later edits to the legacy file have no effect.
    fs::write(&legacy, r#"{"div":[{"name":"Changed","points":100,"date":"z"}]}"#).unwrap();
    let second = ScoreStore::load(config);
    assert_eq!(second.load_source(), &LoadSource::Current);
    assert_eq!(second.scores(Category::Div)[0].name, "B");
}

#[test]
fn test_oversized_legacy_lists_are_normalised() {
    let dir = TempDir::new().unwrap();
    let legacy = dir.path().join(LEGACY_FILENAME);
    let entries: Vec<Value> = (0..15)
        .map(|i| json!({"name": format!("P{}", i), "points": i, "date": "d"}))
        .collect();
    fs::write(&legacy, serde_json::to_vec(&json!({ "all": entries })).unwrap()).unwrap();

    let store = ScoreStore::load(StoreConfig::new(dir.path()).with_legacy_paths(vec![legacy]));
    let all = store.scores(Category::All);
    assert_eq!(all.len(), MAX_ENTRIES);
    assert_eq!(all[0].points, 14);
    assert!(all.windows(2).all(|w| w[0].points >= w[1].points));
}

#[test]
fn test_ranking_keeps_earlier_entry_ahead_on_ties() {
    let dir = TempDir::new().unwrap();
    let mut store = ScoreStore::load(StoreConfig::new(dir.path()).with_legacy_paths(Vec::new()));
    let now = chrono::Local::now();

    for (name, points) in [("First", 10), ("Second", 10), ("Low", 3)] {
        store.record_result(Category::MultDiv, ScoreRecord::new(name, points, now)).unwrap();
    }
    let names: Vec<&str> = store.scores(Category::MultDiv).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Low"]);

    for i in 0..MAX_ENTRIES {
        store.record_result(Category::MultDiv, ScoreRecord::new(&format!("Hi{}", i), 50, now)).unwrap();
    }
    let outcome = store.record_result(Category::MultDiv, ScoreRecord::new("Late", 1, now)).unwrap();
    assert_eq!(outcome.rank, None);
    assert_eq!(outcome.entries.len(), MAX_ENTRIES);
    assert!(outcome.entries.iter().all(|r| r.points == 50));
}
