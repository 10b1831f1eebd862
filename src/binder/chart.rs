//! Declarative chart descriptions
//!
//! These mirror the figure layout expected by the browser renderer
//! (`{"data": [...], "layout": {...}}`), so a spec serializes straight into
//! something the dashboard page can draw. Extra top-level fields (`flow`,
//! `year`, `partner`, `emphasized`) describe the selection and are ignored by
//! the renderer.

use serde::{Deserialize, Serialize};

use crate::data::{Country, FlowType, HeatmapMatrix, LineSeries};

/// Color scale used for every heatmap
pub const HEATMAP_COLORSCALE: &str = "Electric";

/// Color bar label (the index is a transformed KL divergence)
pub const HEATMAP_COLORBAR_TITLE: &str = "KDL";

/// Fixed value range; never auto-scaled so colors compare across years and flows
pub const INDEX_MIN: f64 = 0.0;
pub const INDEX_MAX: f64 = 1.0;

pub const HEATMAP_WIDTH: u32 = 800;
pub const HEATMAP_HEIGHT: u32 = 750;

pub const PARTNER_AXIS_TITLE: &str = "Partner";
pub const REPORTER_AXIS_TITLE: &str = "Reporter";
pub const YEAR_AXIS_TITLE: &str = "Year";
pub const INDEX_AXIS_TITLE: &str = "Trade Similarity Index";

/// Highlight the nearest point under the cursor, not the whole series
pub const HOVER_MODE_CLOSEST: &str = "closest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    pub fn titled(text: impl Into<String>) -> Self {
        Self {
            title: Title::new(text),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Margin {
    pub l: u32,
    pub b: u32,
    pub t: u32,
    pub r: u32,
}

impl Margin {
    /// Slope-chart margin: room for axis labels, nothing above or right
    pub const SLOPE_CHART: Margin = Margin {
        l: 40,
        b: 40,
        t: 10,
        r: 0,
    };
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorBar {
    pub title: Title,
}

// ============================================
// HEATMAP
// ============================================

/// The single heatmap trace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapTrace {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub matrix: HeatmapMatrix,
    pub colorscale: String,
    pub colorbar: ColorBar,
    pub showscale: bool,
    pub zauto: bool,
    pub zmin: f64,
    pub zmax: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapLayout {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

/// Heatmap view for one (flow, year)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapSpec {
    pub data: [HeatmapTrace; 1],
    pub layout: HeatmapLayout,
    pub flow: FlowType,
    pub year: String,
}

impl HeatmapSpec {
    pub fn trace(&self) -> &HeatmapTrace {
        &self.data[0]
    }

    pub fn matrix(&self) -> &HeatmapMatrix {
        &self.data[0].matrix
    }
}

// ============================================
// SLOPE CHART
// ============================================

/// One reporter line in the slope chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether this reporter is in the emphasized set
    pub emphasized: bool,
    #[serde(flatten)]
    pub series: LineSeries,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlopeLayout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub margin: Margin,
    pub hovermode: String,
}

/// Slope-chart view for one (flow, partner)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlopeChartSpec {
    pub data: Vec<ScatterTrace>,
    pub layout: SlopeLayout,
    pub title: String,
    pub flow: FlowType,
    pub partner: Country,
    /// Reporter codes marked for emphasis
    pub emphasized: Vec<String>,
}

impl SlopeChartSpec {
    pub fn series(&self) -> impl Iterator<Item = &LineSeries> {
        self.data.iter().map(|t| &t.series)
    }
}

// ============================================
// SELECTORS
// ============================================

/// One dropdown entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

impl OptionItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Option lists for the three input controls plus the initial selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorOptions {
    pub years: Vec<OptionItem>,
    pub flows: Vec<OptionItem>,
    pub partners: Vec<OptionItem>,
    pub defaults: crate::dispatch::Selection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_trace_serializes_flat() {
        let trace = ScatterTrace {
            kind: "scatter".to_string(),
            emphasized: true,
            series: LineSeries::new("PL")
                .point("2017", 0.5)
                .style("mode", serde_json::json!("lines+markers")),
        };

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scatter");
        assert_eq!(json["name"], "PL");
        assert_eq!(json["mode"], "lines+markers");
        assert_eq!(json["emphasized"], true);

        let back: ScatterTrace = serde_json::from_value(json).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_margin_serializes() {
        let json = serde_json::to_value(Margin::SLOPE_CHART).unwrap();
        assert_eq!(json, serde_json::json!({"l": 40, "b": 40, "t": 10, "r": 0}));
    }
}
