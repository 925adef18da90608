//! PDF export endpoint.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::report::PDF_CONTENT_TYPE;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub session: Option<String>,
}

/// `GET /api/report/pdf` — stream the session's most recent report.
///
/// With no report recorded yet this redirects to `/` (via
/// `ApiError::NoReportAvailable`) rather than erroring.
pub async fn download(
    State(ctx): State<ApiContext>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let (filename, bytes) = ctx.core.export(query.session.as_deref())?;

    let headers = [
        (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}
