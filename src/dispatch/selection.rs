//! Input controls and the per-session selection

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::binder::{BindResult, SelectionBinder};
use crate::data::FlowType;

/// Dashboard input controls
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ControlId {
    SelectedYear,
    SelectedFlow,
    SelectedPartner,
}

impl ControlId {
    pub fn all() -> &'static [ControlId] {
        &[
            ControlId::SelectedYear,
            ControlId::SelectedFlow,
            ControlId::SelectedPartner,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::SelectedYear => "selected-year",
            ControlId::SelectedFlow => "selected-flow",
            ControlId::SelectedPartner => "selected-partner",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events an input control can raise
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Change,
}

/// Chart regions on the page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ChartRegion {
    Heatmap,
    Slopechart,
}

impl ChartRegion {
    pub fn all() -> &'static [ChartRegion] {
        &[ChartRegion::Heatmap, ChartRegion::Slopechart]
    }
}

impl fmt::Display for ChartRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartRegion::Heatmap => write!(f, "heatmap"),
            ChartRegion::Slopechart => write!(f, "slopechart"),
        }
    }
}

/// The values currently chosen in the three input controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub year: String,
    pub flow: FlowType,
    pub partner: String,
}

impl Selection {
    pub fn new(year: impl Into<String>, flow: FlowType, partner: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            flow,
            partner: partner.into(),
        }
    }

    /// Apply a new control value
    ///
    /// The value is checked against its domain first; on error the selection
    /// is left unchanged.
    pub fn apply(
        &mut self,
        binder: &SelectionBinder,
        control: ControlId,
        value: &str,
    ) -> BindResult<()> {
        match control {
            ControlId::SelectedYear => {
                binder.check_year(value)?;
                self.year = value.to_string();
            }
            ControlId::SelectedFlow => {
                self.flow = binder.parse_flow(value)?;
            }
            ControlId::SelectedPartner => {
                binder.check_partner(value)?;
                self.partner = value.to_string();
            }
        }
        Ok(())
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new("2017", FlowType::Export, "RU")
    }
}
