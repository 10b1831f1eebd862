//! Core data types for the Trade Similarity Index tables
//!
//! - `FlowType`: trade direction (exports or imports)
//! - `YearSet`, `PartnerSet`, `MemberStateSet`: the enumerated selection domains
//! - `HeatmapMatrix`: one (reporter x partner) slice of index values
//! - `LineSeries`: one reporter's index values over the years, with styling

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use super::error::{DataError, DataResult};

/// Trade direction selecting which dataset is displayed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowType {
    Export,
    Import,
}

impl FlowType {
    /// All flow types in selector order
    pub fn all() -> &'static [FlowType] {
        &[FlowType::Export, FlowType::Import]
    }

    /// Canonical key used in dataset files and selections
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Export => "EXPORT",
            FlowType::Import => "IMPORT",
        }
    }

    /// Human-readable label for titles and selectors
    pub fn label(&self) -> &'static str {
        match self {
            FlowType::Export => "Exports",
            FlowType::Import => "Imports",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flow string that is neither EXPORT nor IMPORT
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flow type: {0:?}")]
pub struct UnknownFlowType(pub String);

impl FromStr for FlowType {
    type Err = UnknownFlowType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXPORT" => Ok(FlowType::Export),
            "IMPORT" => Ok(FlowType::Import),
            _ => Err(UnknownFlowType(s.to_string())),
        }
    }
}

/// Ordered set of supported year labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSet(Vec<String>);

impl YearSet {
    /// Build a year set; labels must be strictly ascending (hence unique)
    pub fn new(years: Vec<String>) -> DataResult<Self> {
        if let Some(pair) = years.windows(2).find(|w| !year_before(&w[0], &w[1])) {
            return Err(DataError::Malformed(format!(
                "years must be strictly ascending, found {:?} before {:?}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(years))
    }

    pub fn contains(&self, year: &str) -> bool {
        self.0.iter().any(|y| y == year)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Most recent year, if any
    pub fn latest(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

/// Compare year labels numerically when both parse, lexically otherwise
fn year_before(a: &str, b: &str) -> bool {
    match (a.parse::<i32>(), b.parse::<i32>()) {
        (Ok(a), Ok(b)) => a < b,
        _ => a < b,
    }
}

/// A country code with its display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Third countries eligible as comparison partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerSet {
    partners: Vec<Country>,
}

impl PartnerSet {
    /// Build from partner codes, labelling each from `names` (falls back to the code)
    pub fn new(codes: Vec<String>, names: &HashMap<String, String>) -> DataResult<Self> {
        let mut seen = HashSet::new();
        let mut partners = Vec::with_capacity(codes.len());

        for code in codes {
            if !seen.insert(code.clone()) {
                return Err(DataError::Malformed(format!(
                    "duplicate partner code {:?}",
                    code
                )));
            }
            let name = names.get(&code).cloned().unwrap_or_else(|| code.clone());
            partners.push(Country { code, name });
        }

        Ok(Self { partners })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.partners.iter().find(|p| p.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.partners.iter()
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

/// A reporting Member State
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberState {
    pub code: String,
    /// Joined in 2004 or later
    #[serde(default)]
    pub new_member: bool,
}

/// The fixed set of reporting Member States
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberStateSet {
    members: Vec<MemberState>,
}

impl MemberStateSet {
    pub fn new(members: Vec<MemberState>) -> DataResult<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = members.iter().find(|m| !seen.insert(m.code.as_str())) {
            return Err(DataError::Malformed(format!(
                "duplicate member state {:?}",
                dup.code
            )));
        }
        Ok(Self { members })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.members.iter().any(|m| m.code == code)
    }

    pub fn is_new_member(&self, code: &str) -> bool {
        self.members.iter().any(|m| m.code == code && m.new_member)
    }

    /// Codes of the new member states, in table order
    pub fn new_members(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|m| m.new_member)
            .map(|m| m.code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberState> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Similarity-index values for one (flow, year), rows are reporters and columns partners
///
/// Field names follow the heatmap trace layout so the matrix can be handed to
/// the renderer unchanged. A `None` cell is an explicitly missing value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapMatrix {
    /// Partner codes (columns)
    pub x: Vec<String>,
    /// Reporter codes (rows)
    pub y: Vec<String>,
    /// Row-major values, `z[row][col]`
    pub z: Vec<Vec<Option<f64>>>,
}

impl HeatmapMatrix {
    /// Check that `z` has one row per reporter and one cell per partner
    pub fn check_shape(&self) -> Result<(), String> {
        if self.z.len() != self.y.len() {
            return Err(format!(
                "{} rows for {} reporters",
                self.z.len(),
                self.y.len()
            ));
        }
        if let Some((i, row)) = self
            .z
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.x.len())
        {
            return Err(format!(
                "row {} ({}) has {} cells for {} partners",
                i,
                self.y[i],
                row.len(),
                self.x.len()
            ));
        }
        Ok(())
    }

    /// Value for a (reporter, partner) cell; `None` if absent or missing
    pub fn cell(&self, reporter: &str, partner: &str) -> Option<f64> {
        let row = self.y.iter().position(|r| r == reporter)?;
        let col = self.x.iter().position(|p| p == partner)?;
        self.z.get(row)?.get(col).copied().flatten()
    }

    /// Iterate all cells as (reporter, partner, value)
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, Option<f64>)> {
        self.y.iter().zip(self.z.iter()).flat_map(move |(reporter, row)| {
            self.x
                .iter()
                .zip(row.iter())
                .map(move |(partner, value)| (reporter.as_str(), partner.as_str(), *value))
        })
    }

    /// Number of present (non-missing) cells
    pub fn present_cells(&self) -> usize {
        self.z.iter().flatten().filter(|v| v.is_some()).count()
    }
}

/// One reporter's index values across years, plus its display styling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineSeries {
    /// Reporter code, also the legend label
    pub name: String,
    /// Year labels
    pub x: Vec<String>,
    /// Index values, one per year label
    pub y: Vec<f64>,
    /// Styling keys (mode, line, marker, ...) kept verbatim
    #[serde(flatten)]
    pub style: serde_json::Map<String, serde_json::Value>,
}

impl LineSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: Vec::new(),
            y: Vec::new(),
            style: serde_json::Map::new(),
        }
    }

    /// Builder method: append a (year, value) point
    pub fn point(mut self, year: impl Into<String>, value: f64) -> Self {
        self.x.push(year.into());
        self.y.push(value);
        self
    }

    /// Builder method: set a styling key
    pub fn style(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.style.insert(key.into(), value);
        self
    }

    /// Iterate (year, value) points
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.x.iter().map(String::as_str).zip(self.y.iter().copied())
    }
}
