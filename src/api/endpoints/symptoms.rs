//! Symptom vocabulary endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct SymptomsResponse {
    pub symptoms: Vec<String>,
}

/// `GET /api/symptoms` — the recognized symptom names, in catalog order.
///
/// The entry page builds its checklist from this; anything not listed
/// here is rejected by `predict`.
pub async fn list(State(ctx): State<ApiContext>) -> Json<SymptomsResponse> {
    Json(SymptomsResponse {
        symptoms: ctx.core.engine().vocabulary().names().to_vec(),
    })
}
