//! Selection-to-view binding
//!
//! The only computation the dashboard performs: turning the selected
//! (year, flow, partner) into chart descriptions over the pre-loaded tables.
//!
//! ## Operations
//!
//! - [`SelectionBinder::resolve_heatmap`]: (flow, year) -> [`HeatmapSpec`]
//! - [`SelectionBinder::resolve_slope_chart`]: (flow, partner) -> [`SlopeChartSpec`]
//! - [`SelectionBinder::selector_options`]: dropdown contents
//!
//! ## Errors
//!
//! - [`BindError::InvalidSelection`]: a value outside its domain (integration bug)
//! - [`BindError::DataNotFound`]: a valid selection with no pre-computed slice
//!
//! Neither error is ever replaced by an empty chart.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trade_similarity::binder::SelectionBinder;
//! use trade_similarity::data::{DatasetSource, FlowType, JsonDirSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Arc::new(JsonDirSource::new("data").load()?);
//!     let binder = SelectionBinder::new(dataset);
//!
//!     let heatmap = binder.resolve_heatmap(FlowType::Export, "2017")?;
//!     println!("{}", heatmap.layout.title.text);
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod error;
pub mod resolver;

pub use chart::{
    HeatmapSpec, HeatmapTrace, OptionItem, ScatterTrace, SelectorOptions, SlopeChartSpec,
};
pub use error::{BindError, BindResult, Dimension};
pub use resolver::SelectionBinder;
