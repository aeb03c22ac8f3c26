// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gameplay categories and their stable storage keys.

use serde::{Deserialize, Serialize};

/// One of the six drill modes. The storage key is the persisted identifier;
/// display names belong to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "mult")]
    Mult,
    #[serde(rename = "div")]
    Div,
    #[serde(rename = "mult_div")]
    MultDiv,
    #[serde(rename = "div_rest")]
    DivRest,
    #[serde(rename = "div_divrest")]
    DivDivRest,
    #[serde(rename = "all")]
    All,
}

impl Category {
    /// Every category, in storage order.
    pub const ALL: [Category; 6] = [
        Category::Mult,
        Category::Div,
        Category::MultDiv,
        Category::DivRest,
        Category::DivDivRest,
        Category::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mult => "mult",
            Category::Div => "div",
            Category::MultDiv => "mult_div",
            Category::DivRest => "div_rest",
            Category::DivDivRest => "div_divrest",
            Category::All => "all",
        }
    }

    /// Look up a category by storage key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
