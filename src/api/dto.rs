//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::data::DatasetStats;

// ============================================
// CHART DTOs
// ============================================

/// Query parameters for the heatmap endpoints
///
/// Missing values fall back to the default selection.
#[derive(Debug, Default, Deserialize)]
pub struct HeatmapParams {
    /// EXPORT or IMPORT (case-insensitive)
    #[serde(default)]
    pub flow: Option<String>,
    /// Year label
    #[serde(default)]
    pub year: Option<String>,
}

/// Query parameters for the slope-chart endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SlopeChartParams {
    /// EXPORT or IMPORT (case-insensitive)
    #[serde(default)]
    pub flow: Option<String>,
    /// Partner country code
    #[serde(default)]
    pub partner: Option<String>,
}

// ============================================
// DATASET DTOs
// ============================================

/// Dataset summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub years: Vec<String>,
    pub partners: Vec<String>,
    pub new_member_states: Vec<String>,
    pub emphasized: Vec<String>,
    pub stats: DatasetStatsDto,
}

/// Table counts
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetStatsDto {
    pub years: usize,
    pub partners: usize,
    pub member_states: usize,
    pub new_member_states: usize,
    pub heatmap_slices: usize,
    pub slope_slices: usize,
    /// RFC 3339 load time
    pub loaded_at: String,
}

impl From<DatasetStats> for DatasetStatsDto {
    fn from(stats: DatasetStats) -> Self {
        Self {
            years: stats.years,
            partners: stats.partners,
            member_states: stats.member_states,
            new_member_states: stats.new_member_states,
            heatmap_slices: stats.heatmap_slices,
            slope_slices: stats.slope_slices,
            loaded_at: stats.loaded_at.to_rfc3339(),
        }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Dataset status: "ok" or "empty"
    pub dataset: String,
    /// Seconds since server start
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
