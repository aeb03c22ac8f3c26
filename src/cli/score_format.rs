// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text rendering of highscore tables for the command line.

use crate::scores::{Category, ScoreDatabase, ScoreRecord, MAX_ENTRIES};

const NAME_WIDTH: usize = 20;

/// Display title of a category.
pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Mult => "Mal-nehmen",
        Category::Div => "Teilen",
        Category::MultDiv => "Mal-nehmen und Teilen ohne Rest",
        Category::DivRest => "Teilen mit Rest",
        Category::DivDivRest => "Teilen mit und ohne Rest",
        Category::All => "Alles gemischt",
    }
}

/// One category as a ranked table.
pub fn format_category(category: Category, records: &[ScoreRecord]) -> String {
    let mut out = format!("{} [{}]\n", category_label(category), category.as_str());
    if records.is_empty() {
        out.push_str("  (keine Einträge)\n");
        return out;
    }
    out.push_str(&format!("   # | {:w$} | Punkte | Datum\n", "Name", w = NAME_WIDTH));
    out.push_str(&format!("  ---+-{}-+--------+-----------------\n", "-".repeat(NAME_WIDTH)));
    for (i, record) in records.iter().take(MAX_ENTRIES).enumerate() {
        out.push_str(&format!(
            "  {:>2} | {:w$} | {:>6} | {}\n",
            i + 1,
            truncate(&record.name, NAME_WIDTH),
            record.points,
            record.date,
            w = NAME_WIDTH
        ));
    }
    out
}

/// Every category, preceded by the file header.
pub fn format_database(db: &ScoreDatabase) -> String {
    let mut out = format!(
        "Highscores (Schema {}, App {}, gespeichert {})\n",
        db.schema_version, db.app_version, db.saved_at
    );
    for (category, records) in db.data.iter() {
        out.push('\n');
        out.push_str(&format_category(category, records));
    }
    out
}

/// Listing of category keys and titles.
pub fn format_category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| format!("  {:12} {}\n", c.as_str(), category_label(*c)))
        .collect()
}

/// Shorten to `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
#[path = "score_format_tests.rs"]
mod tests;
