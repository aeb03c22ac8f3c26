//! Tests for the score store.

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().join("data")).with_legacy_paths(vec![
        dir.path().join("cwd").join(LEGACY_FILENAME),
        dir.path().join("data").join(LEGACY_FILENAME),
    ])
}

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

fn read_back(config: &StoreConfig) -> Value {
    serde_json::from_slice(&std::fs::read(config.score_path()).unwrap()).unwrap()
}

fn record(name: &str, points: u64) -> ScoreRecord {
    ScoreRecord::new(name, points, Local::now())
}

#[test]
fn test_fresh_load_creates_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = ScoreStore::load(config.clone());
    assert_eq!(store.load_source(), &LoadSource::Fresh);
    assert_eq!(store.database().data, CategoryTable::default());
    let written = read_back(&config);
    assert_eq!(written["schema_version"], "1.0");
    assert_eq!(written["data"].as_object().unwrap().len(), 6);
}

#[test]
fn test_load_current_schema() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_json(
        &config.score_path(),
        &json!({
            "schema_version": "1.0",
            "app_version": "0.7",
            "saved_at": "2024-01-01 00:00:00",
            "data": {
                "div": [{"name": "Ada", "points": 12, "date": "d", "app_version": "0.7", "schema_version": "1.0"}],
                "unknown": [],
                "all": {"not": "a list"}
            }
        }),
    );
    let store = ScoreStore::load(config);
    assert_eq!(store.load_source(), &LoadSource::Current);
    assert_eq!(store.database().saved_at, "2024-01-01 00:00:00");
    assert_eq!(store.scores(Category::Div)[0].name, "Ada");
    assert!(store.scores(Category::All).is_empty());
    assert!(store.scores(Category::Mult).is_empty());
}

#[test]
fn test_migrates_bare_legacy_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_json(&config.legacy_paths[0], &json!({"mult": [{"name": "A", "points": 5, "date": "x"}]}));

    let store = ScoreStore::load(config.clone());
    assert_eq!(store.load_source(), &LoadSource::LegacyBare(config.legacy_paths[0].clone()));
    let mult = store.scores(Category::Mult);
    assert_eq!(mult.len(), 1);
    assert_eq!(mult[0].name, "A");
    assert_eq!(mult[0].points, 5);
    assert_eq!(mult[0].date, "x");
    for category in Category::ALL.iter().filter(|c| **c != Category::Mult) {
        assert!(store.scores(*category).is_empty());
    }

    let written = read_back(&config);
    assert_eq!(written["schema_version"], SCHEMA_VERSION);
    assert_eq!(written["data"]["mult"][0]["name"], "A");
    assert!(written["data"]["mult"][0].get("app_version").is_none());
}

#[test]
fn test_migration_happens_once() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_json(&config.legacy_paths[0], &json!({"mult": [{"name": "A", "points": 5, "date": "x"}]}));
    let first = ScoreStore::load(config.clone());
    assert!(matches!(first.load_source(), LoadSource::LegacyBare(_)));

    let second = ScoreStore::load(config);
    assert_eq!(second.load_source(), &LoadSource::Current);
    assert_eq!(second.scores(Category::Mult).len(), 1);
}

#[test]
fn test_migrates_wrapped_legacy_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_json(
        &config.legacy_paths[1],
        &json!({"data": {"div_rest": [{"name": "W", "points": 2, "date": "y"}], "zzz": []}}),
    );
    let store = ScoreStore::load(config.clone());
    assert_eq!(store.load_source(), &LoadSource::LegacyWrapped(config.legacy_paths[1].clone()));
    assert_eq!(store.scores(Category::DivRest)[0].name, "W");
    assert_eq!(store.database().data.total_records(), 1);
}

#[test]
fn test_legacy_paths_checked_in_order() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::create_dir_all(config.legacy_paths[0].parent().unwrap()).unwrap();
    std::fs::write(&config.legacy_paths[0], b"{ not json").unwrap();
    write_json(&config.legacy_paths[1], &json!({"all": [{"name": "Second", "points": 1, "date": ""}]}));
    let store = ScoreStore::load(config);
    assert_eq!(store.scores(Category::All)[0].name, "Second");
}

#[test]
fn test_mismatched_schema_falls_back_to_legacy() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_json(&config.score_path(), &json!({"schema_version": "0.9", "data": {}}));
    write_json(&config.legacy_paths[0], &json!({"div": [{"name": "L", "points": 4, "date": ""}]}));
    let store = ScoreStore::load(config);
    assert!(matches!(store.load_source(), LoadSource::LegacyBare(_)));
    assert_eq!(store.scores(Category::Div)[0].name, "L");
}

#[test]
fn test_record_result_persists() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let mut store = ScoreStore::load(config.clone());
    let outcome = store.record_result(Category::Mult, record("Jon", 42)).unwrap();
    assert_eq!(outcome.rank, Some(1));
    assert!(outcome.survived());
    assert_eq!(outcome.entries.len(), 1);

    let reloaded = ScoreStore::load(config);
    assert_eq!(reloaded.scores(Category::Mult)[0].name, "Jon");
    assert_eq!(reloaded.scores(Category::Mult)[0].points, 42);
}

#[test]
fn test_record_result_reports_truncation() {
    let dir = TempDir::new().unwrap();
    let mut store = ScoreStore::load(config_in(&dir));
    for i in 0..MAX_ENTRIES {
        store.record_result(Category::All, record(&format!("p{i}"), 50)).unwrap();
    }
    let outcome = store.record_result(Category::All, record("low", 10)).unwrap();
    assert!(!outcome.survived());
    assert_eq!(outcome.entries.len(), MAX_ENTRIES);
    assert_eq!(store.scores(Category::All).len(), MAX_ENTRIES);
}

#[test]
fn test_failed_save_leaves_memory_untouched() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();
    let config = StoreConfig::new(blocker.join("data")).with_legacy_paths(vec![]);

    let mut store = ScoreStore::load(config);
    let before = store.database().clone();
    let result = store.record_result(Category::Mult, record("x", 1));
    assert!(matches!(result, Err(StoreError::Io { .. })));
    assert_eq!(store.database(), &before);
    assert!(store.scores(Category::Mult).is_empty());

    let (data, _) = CategoryTable::default().with_record(Category::Div, record("y", 2));
    assert!(store.replace(data).is_err());
    assert_eq!(store.database(), &before);
}

#[test]
fn test_replace_swaps_whole_table() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let mut store = ScoreStore::load(config.clone());
    store.record_result(Category::Mult, record("old", 1)).unwrap();

    let (data, _) = CategoryTable::default().with_record(Category::Div, record("new", 9));
    store.replace(data.clone()).unwrap();
    assert!(store.scores(Category::Mult).is_empty());
    assert_eq!(store.database().data, data);
    assert_eq!(ScoreStore::load(config).database().data, data);
}

#[test]
fn test_save_refreshes_schema_tag() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let mut store = ScoreStore::load(config.clone());
    store.save().unwrap();
    let written = read_back(&config);
    assert_eq!(written["schema_version"], SCHEMA_VERSION);
    assert_eq!(written["app_version"], APP_VERSION);
    assert_eq!(written["saved_at"], store.database().saved_at.as_str());
}

#[test]
fn test_write_atomic_replaces_existing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("file.json");
    write_atomic(&path, b"one").unwrap();
    write_atomic(&path, b"two").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"two");
    let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}
