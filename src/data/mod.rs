//! Pre-computed Trade Similarity Index tables
//!
//! The tables are computed offline and shipped as static JSON. They are
//! loaded exactly once into an immutable [`Dataset`], which the selection
//! binder reads from for the life of the process.
//!
//! ## Components
//!
//! - [`types`]: selection domains, heatmap matrices and line series
//! - [`dataset`]: the data-access object and its builder
//! - [`loader`]: file-backed [`DatasetSource`]

pub mod dataset;
pub mod error;
pub mod loader;
pub mod types;

pub use dataset::{Dataset, DatasetBuilder, DatasetStats, HeatmapTable, SlopeSeries};
pub use error::{DataError, DataResult};
pub use loader::{DatasetSource, JsonDirSource};
pub use types::{
    Country, FlowType, HeatmapMatrix, LineSeries, MemberState, MemberStateSet, PartnerSet,
    UnknownFlowType, YearSet,
};
