use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One place with its economic-mixing score.
///
/// Every numeric field that is present is finite and lies in [0, 1]
/// (position excepted). Shard files store points in exactly this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// `[longitude, latitude]`
    pub position: [f64; 2],
    pub score: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p1a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p3a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p4a: Option<f64>,
}

impl Point {
    #[inline] pub fn lng(&self) -> f64 { self.position[0] }
    #[inline] pub fn lat(&self) -> f64 { self.position[1] }

    /// Visit shares for the four income groups, lowest first.
    pub fn income_shares(&self) -> [Option<f64>; 4] {
        [self.p1a, self.p2a, self.p3a, self.p4a]
    }

    /// Visit share of a single income group, if the source supplied one.
    pub fn income_share(&self, group: IncomeGroup) -> Option<f64> {
        self.income_shares()[group.index()]
    }

    /// City id, ignoring blank values.
    pub fn city_id(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Income quartile, written `$` (lowest) through `$$$$` (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeGroup {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    LowerMiddle,
    #[serde(rename = "$$$")]
    UpperMiddle,
    #[serde(rename = "$$$$")]
    High,
}

impl IncomeGroup {
    pub const ALL: [IncomeGroup; 4] = [
        IncomeGroup::Low,
        IncomeGroup::LowerMiddle,
        IncomeGroup::UpperMiddle,
        IncomeGroup::High,
    ];

    /// Position of this group in `Point::income_shares`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            IncomeGroup::Low => 0,
            IncomeGroup::LowerMiddle => 1,
            IncomeGroup::UpperMiddle => 2,
            IncomeGroup::High => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            IncomeGroup::Low => "$",
            IncomeGroup::LowerMiddle => "$$",
            IncomeGroup::UpperMiddle => "$$$",
            IncomeGroup::High => "$$$$",
        }
    }
}

impl fmt::Display for IncomeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for IncomeGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        IncomeGroup::ALL.into_iter()
            .find(|group| group.symbol() == s.trim())
            .ok_or_else(|| anyhow!("Unknown income group: {}. Expected one of $, $$, $$$, $$$$", s))
    }
}
