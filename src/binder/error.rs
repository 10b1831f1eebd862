//! Selection binding errors

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::data::{FlowType, UnknownFlowType};

/// Which selection control a value belongs to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    Flow,
    Partner,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Year => write!(f, "year"),
            Dimension::Flow => write!(f, "flow type"),
            Dimension::Partner => write!(f, "partner"),
        }
    }
}

/// Errors raised while resolving a selection into a chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The selection is within its domain but nothing was pre-computed for it
    #[error("No precomputed {table} data for {flow}/{key}")]
    DataNotFound {
        table: &'static str,
        flow: FlowType,
        key: String,
    },

    /// A selection value outside its enumerated domain
    #[error("Invalid selection: {value:?} is not a valid {dimension}")]
    InvalidSelection { dimension: Dimension, value: String },
}

impl BindError {
    pub fn invalid(dimension: Dimension, value: impl Into<String>) -> Self {
        BindError::InvalidSelection {
            dimension,
            value: value.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            BindError::DataNotFound { .. } => "DATA_NOT_FOUND",
            BindError::InvalidSelection { .. } => "INVALID_SELECTION",
        }
    }
}

impl From<UnknownFlowType> for BindError {
    fn from(err: UnknownFlowType) -> Self {
        BindError::invalid(Dimension::Flow, err.0)
    }
}

/// Result type for binder operations
pub type BindResult<T> = Result<T, BindError>;
