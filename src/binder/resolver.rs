//! Selection Binder
//!
//! Maps the current selection (year, flow, partner) onto the matching slice
//! of the loaded tables and wraps it in a chart description. Every operation
//! is a pure lookup over the immutable [`Dataset`].

use std::sync::Arc;

use super::chart::*;
use super::error::{BindError, BindResult, Dimension};
use crate::data::{Dataset, FlowType};
use crate::dispatch::Selection;

/// Resolves selections into heatmap and slope-chart descriptions
#[derive(Debug, Clone)]
pub struct SelectionBinder {
    dataset: Arc<Dataset>,
    emphasized: Vec<String>,
}

impl SelectionBinder {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            emphasized: Vec::new(),
        }
    }

    /// Builder method: reporters whose slope-chart lines are flagged for emphasis
    pub fn with_emphasis<I, S>(mut self, reporters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in reporters {
            let code = code.into();
            if !self.emphasized.contains(&code) {
                self.emphasized.push(code);
            }
        }
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Shared handle to the underlying tables
    pub fn dataset_arc(&self) -> Arc<Dataset> {
        Arc::clone(&self.dataset)
    }

    pub fn emphasized(&self) -> &[String] {
        &self.emphasized
    }

    /// Parse a flow value coming from a selector
    pub fn parse_flow(&self, raw: &str) -> BindResult<FlowType> {
        Ok(raw.parse::<FlowType>()?)
    }

    pub fn check_year(&self, year: &str) -> BindResult<()> {
        if self.dataset.years().contains(year) {
            Ok(())
        } else {
            Err(BindError::invalid(Dimension::Year, year))
        }
    }

    pub fn check_partner(&self, partner: &str) -> BindResult<()> {
        if self.dataset.partners().contains(partner) {
            Ok(())
        } else {
            Err(BindError::invalid(Dimension::Partner, partner))
        }
    }

    /// Heatmap of every (reporter, partner) index value for one flow and year
    pub fn resolve_heatmap(&self, flow: FlowType, year: &str) -> BindResult<HeatmapSpec> {
        self.check_year(year)?;

        let matrix = self
            .dataset
            .heatmap(flow, year)
            .ok_or_else(|| BindError::DataNotFound {
                table: "heatmap",
                flow,
                key: year.to_string(),
            })?;

        tracing::debug!(
            flow = %flow,
            year = %year,
            cells = matrix.present_cells(),
            "Resolved heatmap"
        );

        Ok(HeatmapSpec {
            data: [HeatmapTrace {
                kind: "heatmap".to_string(),
                matrix: matrix.clone(),
                colorscale: HEATMAP_COLORSCALE.to_string(),
                colorbar: ColorBar {
                    title: Title::new(HEATMAP_COLORBAR_TITLE),
                },
                showscale: true,
                zauto: false,
                zmin: INDEX_MIN,
                zmax: INDEX_MAX,
            }],
            layout: HeatmapLayout {
                title: Title::new(format!("Trade Similarity Index: {} {}", flow.label(), year)),
                width: HEATMAP_WIDTH,
                height: HEATMAP_HEIGHT,
                xaxis: Axis::titled(PARTNER_AXIS_TITLE),
                yaxis: Axis::titled(REPORTER_AXIS_TITLE),
            },
            flow,
            year: year.to_string(),
        })
    }

    /// Index evolution per reporter against one partner
    ///
    /// Series keep their source order so legend entries stay stable.
    pub fn resolve_slope_chart(&self, flow: FlowType, partner: &str) -> BindResult<SlopeChartSpec> {
        let partner = self
            .dataset
            .partners()
            .get(partner)
            .cloned()
            .ok_or_else(|| BindError::invalid(Dimension::Partner, partner))?;

        let lines = self
            .dataset
            .slope_series(flow, &partner.code)
            .ok_or_else(|| BindError::DataNotFound {
                table: "slope chart",
                flow,
                key: partner.code.clone(),
            })?;

        let data = lines
            .iter()
            .map(|series| ScatterTrace {
                kind: "scatter".to_string(),
                emphasized: self.emphasized.contains(&series.name),
                series: series.clone(),
            })
            .collect();

        tracing::debug!(
            flow = %flow,
            partner = %partner.code,
            lines = lines.len(),
            "Resolved slope chart"
        );

        Ok(SlopeChartSpec {
            data,
            layout: SlopeLayout {
                xaxis: Axis::titled(YEAR_AXIS_TITLE),
                yaxis: Axis::titled(INDEX_AXIS_TITLE),
                margin: Margin::SLOPE_CHART,
                hovermode: HOVER_MODE_CLOSEST.to_string(),
            },
            title: format!("{} with {}", flow.label(), partner.name),
            flow,
            partner,
            emphasized: self.emphasized.clone(),
        })
    }

    /// Dropdown contents for the year, flow and partner controls
    pub fn selector_options(&self, defaults: Selection) -> SelectorOptions {
        SelectorOptions {
            years: self
                .dataset
                .years()
                .iter()
                .map(|y| OptionItem::new(y, y))
                .collect(),
            flows: FlowType::all()
                .iter()
                .map(|f| OptionItem::new(f.label(), f.as_str()))
                .collect(),
            partners: self
                .dataset
                .partners()
                .iter()
                .map(|p| OptionItem::new(&p.name, &p.code))
                .collect(),
            defaults,
        }
    }
}
