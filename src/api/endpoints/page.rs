//! Embedded entry page.

use axum::response::Html;

/// `GET /` — the symptom checklist form, compiled into the binary so the
/// service ships as a single artifact.
pub async fn index() -> Html<&'static str> {
    Html(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/index.html"
    )))
}
