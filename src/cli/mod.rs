// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end helpers.

pub mod score_format;

pub use score_format::{category_label, format_category, format_category_list, format_database};
