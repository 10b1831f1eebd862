//! Export Routes
//!
//! Heatmap slice download for offline analysis.
//!
//! - GET /api/v1/heatmap/export?flow=EXPORT&year=2017 - CSV attachment

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::dto::HeatmapParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::charts::flow_or_default;
use crate::api::state::AppState;
use crate::data::HeatmapMatrix;

/// GET /api/v1/heatmap/export
///
/// One row per (reporter, partner) cell; a missing value is an empty field.
pub async fn export_heatmap(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeatmapParams>,
) -> ApiResult<Response> {
    let flow = flow_or_default(&state, params.flow.as_deref())?;
    let year = params.year.as_deref().unwrap_or(&state.defaults.year);

    let spec = state.binder.resolve_heatmap(flow, year)?;
    let body = format_csv(spec.matrix())?;

    let filename = format!("trade_similarity_{}_{}.csv", flow.as_str().to_lowercase(), year);

    tracing::info!(flow = %flow, year = %year, "Exported heatmap slice");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

/// Format a heatmap slice as CSV
pub fn format_csv(matrix: &HeatmapMatrix) -> ApiResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["reporter", "partner", "value"])
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;

    for (reporter, partner, value) in matrix.cells() {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([reporter, partner, value.as_str()])
            .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_csv() {
        let matrix = HeatmapMatrix {
            x: vec!["RU".to_string(), "ME".to_string()],
            y: vec!["MT".to_string()],
            z: vec![vec![Some(0.35), None]],
        };

        let csv = String::from_utf8(format_csv(&matrix).unwrap()).unwrap();
        assert_eq!(csv, "reporter,partner,value\nMT,RU,0.35\nMT,ME,\n");
    }
}
