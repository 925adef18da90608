//! Submit-and-predict endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::inference::RankedCondition;

/// Request body for `POST /api/predict`.
///
/// `session` is an opaque client-chosen key; omitting it lands the
/// result in the shared default slot.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub patient: String,
    pub symptoms: Vec<String>,
    pub predictions: Vec<RankedCondition>,
}

/// `POST /api/predict` — validate, predict, overwrite the session's
/// report slot, and return the ranked conditions.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let prediction = ctx
        .core
        .submit(&request.name, &request.symptoms, request.session.as_deref())?;

    Ok(Json(PredictResponse {
        patient: prediction.patient,
        symptoms: prediction.symptoms,
        predictions: prediction.conditions,
    }))
}
