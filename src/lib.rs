//! # Trade Similarity
//!
//! Interactive dashboard for the Trade Similarity Index (TSI) between EU
//! member states and their main trading partners.
//!
//! All index values are pre-computed. At startup the dataset is loaded once
//! into an immutable [`data::Dataset`]; every chart request is then a lookup
//! that turns the current selection (year, flow type, partner) into a chart
//! description a Plotly front end can draw.
//!
//! ## Modules
//!
//! - [`data`]: Dataset types and the JSON directory loader
//! - [`binder`]: Selection binder resolving heatmap and slope-chart figures
//! - [`dispatch`]: Registry wiring input controls to chart regions
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Interactive sessions driving the charts
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trade_similarity::binder::SelectionBinder;
//! use trade_similarity::data::{DatasetSource, FlowType, JsonDirSource};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = JsonDirSource::new("data").load()?;
//!     let binder = SelectionBinder::new(Arc::new(dataset));
//!
//!     let heatmap = binder.resolve_heatmap(FlowType::Export, "2017")?;
//!     println!("{}", heatmap.layout.title.text);
//!
//!     let slope = binder.resolve_slope_chart(FlowType::Export, "RU")?;
//!     println!("{} series", slope.data.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod binder;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod websocket;

// Re-export top-level types for convenience
pub use data::{
    DataError, DataResult, Dataset, DatasetBuilder, DatasetSource, DatasetStats, FlowType,
    HeatmapMatrix, JsonDirSource, LineSeries,
};

pub use binder::{BindError, BindResult, HeatmapSpec, SelectionBinder, SlopeChartSpec};

pub use dispatch::{ChartRegion, ControlId, Dispatcher, EventKind, Figure, Selection};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use websocket::{websocket_handler, ClientMessage, ServerMessage};

pub use config::{Config, ConfigError};
