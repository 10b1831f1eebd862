//! Chart Routes
//!
//! Resolve a selection into a chart description.
//!
//! - GET /api/v1/options - Dropdown contents and default selection
//! - GET /api/v1/heatmap?flow=EXPORT&year=2017 - Heatmap figure
//! - GET /api/v1/slopechart?flow=EXPORT&partner=RU - Slope-chart figure

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{HeatmapParams, SlopeChartParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::binder::{HeatmapSpec, SelectorOptions, SlopeChartSpec};
use crate::data::FlowType;

/// GET /api/v1/options
pub async fn selector_options(State(state): State<Arc<AppState>>) -> Json<SelectorOptions> {
    Json(state.binder.selector_options(state.defaults.clone()))
}

/// GET /api/v1/heatmap
pub async fn heatmap(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeatmapParams>,
) -> ApiResult<Json<HeatmapSpec>> {
    let flow = flow_or_default(&state, params.flow.as_deref())?;
    let year = params.year.as_deref().unwrap_or(&state.defaults.year);

    let spec = state.binder.resolve_heatmap(flow, year)?;
    Ok(Json(spec))
}

/// GET /api/v1/slopechart
pub async fn slopechart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SlopeChartParams>,
) -> ApiResult<Json<SlopeChartSpec>> {
    let flow = flow_or_default(&state, params.flow.as_deref())?;
    let partner = params.partner.as_deref().unwrap_or(&state.defaults.partner);

    let spec = state.binder.resolve_slope_chart(flow, partner)?;
    Ok(Json(spec))
}

/// Parse an optional flow parameter, using the default selection when absent
pub(crate) fn flow_or_default(state: &AppState, raw: Option<&str>) -> ApiResult<FlowType> {
    match raw {
        Some(raw) => Ok(state.binder.parse_flow(raw)?),
        None => Ok(state.defaults.flow),
    }
}
