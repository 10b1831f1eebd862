//! Dataset Routes
//!
//! - GET /api/v1/dataset - Selection domains and table counts

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::DatasetResponse;
use crate::api::state::AppState;

/// GET /api/v1/dataset
pub async fn dataset_summary(State(state): State<Arc<AppState>>) -> Json<DatasetResponse> {
    let dataset = &state.dataset;

    Json(DatasetResponse {
        years: dataset.years().as_slice().to_vec(),
        partners: dataset.partners().iter().map(|p| p.code.clone()).collect(),
        new_member_states: dataset
            .member_states()
            .new_members()
            .map(str::to_string)
            .collect(),
        emphasized: state.binder.emphasized().to_vec(),
        stats: dataset.stats().into(),
    })
}
