//! Tests for score records and the category table.

use super::*;
use chrono::TimeZone;
use serde_json::json;

fn record(name: &str, points: u64) -> ScoreRecord {
    ScoreRecord {
        name: name.to_string(),
        points,
        date: "01.01.2025 10:00".to_string(),
        app_version: None,
        schema_version: None,
        extra: Map::new(),
    }
}

fn fixed_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap()
}

#[test]
fn test_category_keys_round_trip() {
    for category in Category::ALL {
        assert_eq!(Category::from_key(category.as_str()), Some(category));
        assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
    }
    assert_eq!(Category::from_key("bogus"), None);
    assert!("bogus".parse::<Category>().is_err());
}

#[test]
fn test_category_serializes_as_storage_key() {
    assert_eq!(serde_json::to_string(&Category::DivDivRest).unwrap(), "\"div_divrest\"");
    assert_eq!(serde_json::to_string(&Category::MultDiv).unwrap(), "\"mult_div\"");
}

#[test]
fn test_new_record_defaults_blank_name() {
    let r = ScoreRecord::new("   ", 7, fixed_time());
    assert_eq!(r.name, DEFAULT_PLAYER_NAME);
    assert_eq!(r.date, "07.03.2025 09:05");
    assert_eq!(r.app_version.as_deref(), Some(APP_VERSION));
    assert_eq!(r.schema_version.as_deref(), Some(SCHEMA_VERSION));
}

#[test]
fn test_new_record_trims_name() {
    assert_eq!(ScoreRecord::new(" Jon ", 1, fixed_time()).name, "Jon");
}

#[test]
fn test_default_table_has_all_categories_empty() {
    let table = CategoryTable::default();
    assert_eq!(table.iter().count(), 6);
    assert!(table.iter().all(|(_, v)| v.is_empty()));
    assert_eq!(table.total_records(), 0);
}

#[test]
fn test_from_json_map_merge_policy() {
    let data = json!({
        "mult": [{"name": "A", "points": 5, "date": "x"}],
        "div": "not a list",
        "future_mode": [{"name": "B", "points": 9, "date": "y"}],
    });
    let table = CategoryTable::from_json_map(data.as_object().unwrap());
    assert_eq!(table.get(Category::Mult).len(), 1);
    assert_eq!(table.get(Category::Mult)[0].name, "A");
    assert!(table.get(Category::Div).is_empty());
    assert_eq!(table.total_records(), 1);
    assert_eq!(table.iter().count(), 6);
}

#[test]
fn test_from_json_map_skips_unreadable_entries() {
    let data = json!({
        "all": [
            {"name": "ok", "points": 3, "date": "d"},
            "garbage",
            {"name": "neg", "points": -1, "date": "d"},
        ]
    });
    let table = CategoryTable::from_json_map(data.as_object().unwrap());
    assert_eq!(table.get(Category::All).len(), 1);
    assert_eq!(table.get(Category::All)[0].name, "ok");
}

#[test]
fn test_from_json_map_keeps_whole_float_points() {
    let data = json!({
        "mult": [
            {"name": "float", "points": 5.0, "date": "d"},
            {"name": "half", "points": 2.5, "date": "d"},
        ]
    });
    let table = CategoryTable::from_json_map(data.as_object().unwrap());
    let list = table.get(Category::Mult);
    assert_eq!(list.len(), 1);
    assert_eq!((list[0].name.as_str(), list[0].points), ("float", 5));
}

#[test]
fn test_unknown_record_fields_survive_rewrite() {
    let data = json!({"div": [{"name": "A", "points": 4, "date": "d", "level": 3, "mode": "fast"}]});
    let table = CategoryTable::from_json_map(data.as_object().unwrap());
    let entry = &table.get(Category::Div)[0];
    assert_eq!(entry.extra.get("level"), Some(&json!(3)));

    let db = ScoreDatabase::with_data(table.clone(), fixed_time());
    let written: Value = serde_json::from_slice(&db.to_canonical_json().unwrap()).unwrap();
    assert_eq!(written["data"]["div"][0]["level"], json!(3));
    assert_eq!(written["data"]["div"][0]["mode"], json!("fast"));
    assert!(written["data"]["div"][0].get("app_version").is_none());
    assert_eq!(ScoreDatabase::from_current_json(&written).unwrap().data, table);
}

#[test]
fn test_from_json_map_normalizes_order_and_length() {
    let entries: Vec<_> = (0..15).map(|i| json!({"name": format!("p{i}"), "points": i, "date": ""})).collect();
    let data = json!({ "div": entries });
    let table = CategoryTable::from_json_map(data.as_object().unwrap());
    let list = table.get(Category::Div);
    assert_eq!(list.len(), MAX_ENTRIES);
    assert_eq!(list[0].points, 14);
    assert_eq!(list[9].points, 5);
}

#[test]
fn test_with_record_ranks_and_reports_position() {
    let table = CategoryTable::default();
    let (table, rank) = table.with_record(Category::Mult, record("a", 10));
    assert_eq!(rank, Some(1));
    let (table, rank) = table.with_record(Category::Mult, record("b", 20));
    assert_eq!(rank, Some(1));
    let (table, rank) = table.with_record(Category::Mult, record("c", 15));
    assert_eq!(rank, Some(2));
    let names: Vec<_> = table.get(Category::Mult).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
}

#[test]
fn test_with_record_ties_keep_insertion_order() {
    let mut table = CategoryTable::default();
    for name in ["first", "second", "third"] {
        let (next, _) = table.with_record(Category::All, record(name, 5));
        table = next;
    }
    let (table, rank) = table.with_record(Category::All, record("fourth", 5));
    assert_eq!(rank, Some(4));
    let names: Vec<_> = table.get(Category::All).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_with_record_truncates_and_reports_drop() {
    let mut table = CategoryTable::default();
    for i in 0..10 {
        let (next, _) = table.with_record(Category::Div, record(&format!("p{i}"), 100));
        table = next;
    }
    let (after, rank) = table.with_record(Category::Div, record("late", 100));
    assert_eq!(rank, None);
    assert_eq!(after.get(Category::Div).len(), MAX_ENTRIES);
    assert!(after.get(Category::Div).iter().all(|r| r.name != "late"));

    let (after, rank) = table.with_record(Category::Div, record("best", 101));
    assert_eq!(rank, Some(1));
    assert_eq!(after.get(Category::Div).len(), MAX_ENTRIES);
    assert_eq!(after.get(Category::Div).last().unwrap().name, "p8");
}

#[test]
fn test_with_record_leaves_original_untouched() {
    let table = CategoryTable::default();
    let (next, _) = table.with_record(Category::Mult, record("a", 1));
    assert_eq!(table.total_records(), 0);
    assert_eq!(next.total_records(), 1);
}

#[test]
fn test_ranking_invariant_over_many_inserts() {
    let mut table = CategoryTable::default();
    let mut inserted: Vec<(u64, usize)> = Vec::new();
    for i in 0..40usize {
        let points = ((i * 37) % 11) as u64;
        let (next, _) = table.with_record(Category::MultDiv, record(&i.to_string(), points));
        table = next;
        inserted.push((points, i));
    }
    let list = table.get(Category::MultDiv);
    assert!(list.len() <= MAX_ENTRIES);
    for pair in list.windows(2) {
        assert!(pair[0].points >= pair[1].points);
        if pair[0].points == pair[1].points {
            let a: usize = pair[0].name.parse().unwrap();
            let b: usize = pair[1].name.parse().unwrap();
            assert!(a < b, "ties must keep insertion order");
        }
    }
    inserted.sort_by(|a, b| b.0.cmp(&a.0));
    let expected: Vec<String> = inserted.iter().take(MAX_ENTRIES).map(|(_, i)| i.to_string()).collect();
    let actual: Vec<String> = list.iter().map(|r| r.name.clone()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_from_current_json_requires_exact_schema() {
    let good = json!({"schema_version": "1.0", "app_version": "0.8", "saved_at": "s", "data": {}});
    let db = ScoreDatabase::from_current_json(&good).unwrap();
    assert_eq!(db.app_version, "0.8");
    assert_eq!(db.saved_at, "s");
    assert_eq!(db.data, CategoryTable::default());

    let other = json!({"schema_version": "2.0", "data": {}});
    assert!(ScoreDatabase::from_current_json(&other).is_none());
    let no_data = json!({"schema_version": "1.0"});
    assert!(ScoreDatabase::from_current_json(&no_data).is_none());
    let bad_data = json!({"schema_version": "1.0", "data": []});
    assert!(ScoreDatabase::from_current_json(&bad_data).is_none());
}

#[test]
fn test_canonical_json_layout() {
    let (data, _) = CategoryTable::default().with_record(Category::Mult, record("Jörg", 3));
    let db = ScoreDatabase::with_data(data, fixed_time());
    let text = String::from_utf8(db.to_canonical_json().unwrap()).unwrap();
    assert!(text.starts_with("{\n    \"schema_version\": \"1.0\""));
    assert!(text.contains("\"saved_at\": \"2025-03-07 09:05:00\""));
    assert!(text.contains("Jörg"));
    assert!(!text.contains("app_version\": null"));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(ScoreDatabase::from_current_json(&parsed).unwrap(), db);
}

#[test]
fn test_canonical_json_is_deterministic() {
    let db = ScoreDatabase::with_data(CategoryTable::default(), fixed_time());
    assert_eq!(db.to_canonical_json().unwrap(), db.clone().to_canonical_json().unwrap());
}
