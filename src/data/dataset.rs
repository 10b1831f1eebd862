//! Immutable data-access object
//!
//! A `Dataset` is assembled once at startup (from files or fixtures) and then
//! only read. It is shared between handlers behind an `Arc`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::error::{DataError, DataResult};
use super::types::{
    FlowType, HeatmapMatrix, LineSeries, MemberState, MemberStateSet, PartnerSet, YearSet,
};

/// (flow, year) -> heatmap slice
pub type HeatmapTable = HashMap<(FlowType, String), HeatmapMatrix>;

/// (flow, partner) -> ordered per-reporter line series
pub type SlopeSeries = HashMap<(FlowType, String), Vec<LineSeries>>;

/// All pre-computed tables, loaded once and never mutated
#[derive(Debug, Clone)]
pub struct Dataset {
    years: YearSet,
    partners: PartnerSet,
    member_states: MemberStateSet,
    country_names: HashMap<String, String>,
    heatmaps: HeatmapTable,
    slopes: SlopeSeries,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn years(&self) -> &YearSet {
        &self.years
    }

    pub fn partners(&self) -> &PartnerSet {
        &self.partners
    }

    pub fn member_states(&self) -> &MemberStateSet {
        &self.member_states
    }

    /// Heatmap slice for (flow, year), if one was pre-computed
    pub fn heatmap(&self, flow: FlowType, year: &str) -> Option<&HeatmapMatrix> {
        self.heatmaps.get(&(flow, year.to_string()))
    }

    /// Slope-chart lines for (flow, partner), in source order
    pub fn slope_series(&self, flow: FlowType, partner: &str) -> Option<&[LineSeries]> {
        self.slopes
            .get(&(flow, partner.to_string()))
            .map(Vec::as_slice)
    }

    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.country_names.get(code).map(String::as_str)
    }

    /// Display name for a country code, falling back to the code itself
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.country_name(code).unwrap_or(code)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            years: self.years.len(),
            partners: self.partners.len(),
            member_states: self.member_states.len(),
            new_member_states: self.member_states.new_members().count(),
            heatmap_slices: self.heatmaps.len(),
            slope_slices: self.slopes.len(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Summary counts for health and status reporting
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub years: usize,
    pub partners: usize,
    pub member_states: usize,
    pub new_member_states: usize,
    pub heatmap_slices: usize,
    pub slope_slices: usize,
    pub loaded_at: DateTime<Utc>,
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} years, {} partners, {} member states ({} new), {} heatmap slices, {} slope slices",
            self.years,
            self.partners,
            self.member_states,
            self.new_member_states,
            self.heatmap_slices,
            self.slope_slices
        )
    }
}

/// Collects tables and validates them into a `Dataset`
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    years: Vec<String>,
    partners: Vec<String>,
    member_states: Vec<MemberState>,
    country_names: HashMap<String, String>,
    heatmaps: HeatmapTable,
    slopes: SlopeSeries,
}

impl DatasetBuilder {
    pub fn years<I, S>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.years = years.into_iter().map(Into::into).collect();
        self
    }

    pub fn partners<I, S>(mut self, partners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partners = partners.into_iter().map(Into::into).collect();
        self
    }

    pub fn member_states(mut self, members: Vec<MemberState>) -> Self {
        self.member_states = members;
        self
    }

    pub fn member_state(mut self, code: impl Into<String>, new_member: bool) -> Self {
        self.member_states.push(MemberState {
            code: code.into(),
            new_member,
        });
        self
    }

    pub fn country_names(mut self, names: HashMap<String, String>) -> Self {
        self.country_names.extend(names);
        self
    }

    pub fn country_name(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.country_names.insert(code.into(), name.into());
        self
    }

    pub fn heatmap(
        mut self,
        flow: FlowType,
        year: impl Into<String>,
        matrix: HeatmapMatrix,
    ) -> Self {
        self.heatmaps.insert((flow, year.into()), matrix);
        self
    }

    pub fn slope(
        mut self,
        flow: FlowType,
        partner: impl Into<String>,
        lines: Vec<LineSeries>,
    ) -> Self {
        self.slopes.insert((flow, partner.into()), lines);
        self
    }

    /// Validate structure and freeze the tables
    ///
    /// Index values are not range-checked here; the upstream computation
    /// guarantees [0, 1].
    pub fn build(self) -> DataResult<Dataset> {
        let years = YearSet::new(self.years)?;
        let partners = PartnerSet::new(self.partners, &self.country_names)?;
        let member_states = MemberStateSet::new(self.member_states)?;

        for ((flow, year), matrix) in &self.heatmaps {
            matrix.check_shape().map_err(|e| {
                DataError::Malformed(format!("heatmap {}/{}: {}", flow, year, e))
            })?;
        }

        for ((flow, partner), lines) in &self.slopes {
            if let Some(line) = lines.iter().find(|l| l.x.len() != l.y.len()) {
                return Err(DataError::Malformed(format!(
                    "slope series {}/{} line {:?}: {} years for {} values",
                    flow,
                    partner,
                    line.name,
                    line.x.len(),
                    line.y.len()
                )));
            }
        }

        Ok(Dataset {
            years,
            partners,
            member_states,
            country_names: self.country_names,
            heatmaps: self.heatmaps,
            slopes: self.slopes,
            loaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> HeatmapMatrix {
        HeatmapMatrix {
            x: vec!["RU".to_string()],
            y: vec!["DE".to_string(), "PL".to_string()],
            z: vec![vec![Some(0.93)], vec![Some(0.41)]],
        }
    }

    #[test]
    fn test_build_and_lookup() {
        let dataset = Dataset::builder()
            .years(["2016", "2017"])
            .partners(["RU"])
            .member_state("DE", false)
            .member_state("PL", true)
            .country_name("RU", "Russia")
            .heatmap(FlowType::Export, "2017", matrix())
            .slope(
                FlowType::Export,
                "RU",
                vec![LineSeries::new("PL").point("2016", 0.4).point("2017", 0.41)],
            )
            .build()
            .unwrap();

        assert!(dataset.heatmap(FlowType::Export, "2017").is_some());
        assert!(dataset.heatmap(FlowType::Import, "2017").is_none());
        assert_eq!(dataset.slope_series(FlowType::Export, "RU").unwrap().len(), 1);
        assert_eq!(dataset.display_name("RU"), "Russia");
        assert_eq!(dataset.display_name("XX"), "XX");

        let stats = dataset.stats();
        assert_eq!(stats.years, 2);
        assert_eq!(stats.new_member_states, 1);
        assert_eq!(stats.heatmap_slices, 1);
    }

    #[test]
    fn test_build_rejects_bad_matrix() {
        let mut bad = matrix();
        bad.z.pop();

        let result = Dataset::builder()
            .years(["2017"])
            .heatmap(FlowType::Import, "2017", bad)
            .build();

        assert!(matches!(result, Err(DataError::Malformed(msg)) if msg.contains("IMPORT/2017")));
    }

    #[test]
    fn test_build_rejects_ragged_series() {
        let mut line = LineSeries::new("PL").point("2016", 0.4);
        line.y.push(0.5);

        let result = Dataset::builder()
            .years(["2016"])
            .slope(FlowType::Export, "RU", vec![line])
            .build();

        assert!(matches!(result, Err(DataError::Malformed(_))));
    }
}
