//! Transport-agnostic application state.
//!
//! `CoreState` is the single shared state behind every transport: the
//! fitted inference engine (immutable after startup, so reads never lock)
//! plus the mutable report store. Wrapped in `Arc` at startup.
//!
//! The two logical operations (submit-and-predict, export-last-report)
//! live here so the HTTP layer stays a thin adapter.

use std::path::PathBuf;

use crate::config;
use crate::inference::{FitError, InferenceEngine, Prediction, ValidationError};
use crate::report::{self, ReportError};
use crate::report_store::{ReportRecord, ReportStore, ReportStoreError};
use crate::vocabulary::Corpus;

/// Shared application state.
pub struct CoreState {
    engine: InferenceEngine,
    reports: ReportStore,
    /// Where exported report copies are written. Overridable in tests.
    pub reports_dir: PathBuf,
}

impl CoreState {
    /// Fit the built-in corpus and build the state.
    ///
    /// A fit failure is fatal: the caller must not start serving.
    pub fn new() -> Result<Self, FitError> {
        Ok(Self::with_engine(InferenceEngine::fit(Corpus::builtin())?))
    }

    /// Build state around an already-fitted engine (tests fit their own
    /// corpora).
    pub fn with_engine(engine: InferenceEngine) -> Self {
        Self {
            engine,
            reports: ReportStore::new(),
            reports_dir: config::reports_dir(),
        }
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    /// Submit a patient name and symptom selection.
    ///
    /// On success the session's report slot is overwritten with the new
    /// record. Validation failures leave the store untouched.
    pub fn submit(
        &self,
        patient: &str,
        symptoms: &[String],
        session: Option<&str>,
    ) -> Result<Prediction, CoreError> {
        let prediction = self.engine.predict(patient, symptoms)?;
        self.reports
            .record(session, ReportRecord::from(&prediction))?;

        tracing::info!(
            patient = %prediction.patient,
            symptoms = prediction.symptoms.len(),
            top = %prediction.conditions[0].condition,
            "prediction recorded"
        );
        Ok(prediction)
    }

    /// Export the session's most recent report as PDF bytes.
    ///
    /// Returns the suggested download filename plus the document. A copy
    /// is written to the reports directory; failure to write the copy is
    /// logged and does not fail the export.
    pub fn export(&self, session: Option<&str>) -> Result<(String, Vec<u8>), CoreError> {
        let record = self.reports.fetch(session)?;
        let filename = report::suggested_filename(&record.patient);
        let bytes = report::render_pdf(&record)?;

        match report::save_report_copy(&bytes, &filename, &self.reports_dir) {
            Ok(path) => tracing::debug!(path = %path.display(), "report copy saved"),
            Err(e) => tracing::warn!("failed to save report copy: {e}"),
        }

        Ok((filename, bytes))
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no report available yet")]
    NoReportAvailable,
    #[error("internal lock error")]
    LockPoisoned,
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<ReportStoreError> for CoreError {
    fn from(err: ReportStoreError) -> Self {
        match err {
            ReportStoreError::NoReportAvailable => CoreError::NoReportAvailable,
            ReportStoreError::LockPoisoned => CoreError::LockPoisoned,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn select(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn test_state() -> (CoreState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = CoreState::new().unwrap();
        state.reports_dir = tmp.path().to_path_buf();
        (state, tmp)
    }

    #[test]
    fn submit_records_and_returns_prediction() {
        let (state, _tmp) = test_state();
        let prediction = state
            .submit("Alice", &select(&["fever", "cough", "headache"]), None)
            .unwrap();

        assert!(!prediction.conditions.is_empty());
        let stored = state.reports().fetch(None).unwrap();
        assert_eq!(stored.patient, "Alice");
        assert_eq!(stored.conditions, prediction.conditions);
    }

    #[test]
    fn failed_validation_leaves_store_untouched() {
        let (state, _tmp) = test_state();
        state
            .submit("Alice", &select(&["fever", "cough"]), None)
            .unwrap();

        let err = state
            .submit("Bob", &select(&["fever", "not-a-symptom"]), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // Alice's record survives the rejected submission.
        assert_eq!(state.reports().fetch(None).unwrap().patient, "Alice");
    }

    #[test]
    fn failed_validation_on_empty_store_stays_empty() {
        let (state, _tmp) = test_state();
        let err = state.submit("", &select(&["fever"]), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingName)
        ));
        assert!(!state.reports().has_report(None));
    }

    #[test]
    fn export_before_submit_is_no_report() {
        let (state, _tmp) = test_state();
        let err = state.export(None).unwrap_err();
        assert!(matches!(err, CoreError::NoReportAvailable));
    }

    #[test]
    fn export_round_trips_the_submission() {
        let (state, tmp) = test_state();

        let prediction = state
            .submit("Alice Martin", &select(&["fever", "cough", "headache"]), None)
            .unwrap();
        let (filename, bytes) = state.export(None).unwrap();

        assert_eq!(filename, "Alice_Martin_report.pdf");
        assert_eq!(&bytes[0..4], b"%PDF");
        // Copy saved alongside the download.
        assert!(tmp.path().join(&filename).exists());

        let stored = state.reports().fetch(None).unwrap();
        assert_eq!(stored.symptoms, prediction.symptoms);
        assert_eq!(stored.conditions[0], prediction.conditions[0]);
    }

    #[test]
    fn export_reflects_last_writer_on_shared_slot() {
        let (state, _tmp) = test_state();

        state.submit("Alice", &select(&["fever"]), None).unwrap();
        state.submit("Bob", &select(&["cough"]), None).unwrap();

        let (filename, _) = state.export(None).unwrap();
        assert_eq!(filename, "Bob_report.pdf");
    }

    #[test]
    fn sessions_export_independently() {
        let (state, _tmp) = test_state();

        state
            .submit("Alice", &select(&["fever"]), Some("s-a"))
            .unwrap();
        state
            .submit("Bob", &select(&["cough"]), Some("s-b"))
            .unwrap();

        let (alice_file, _) = state.export(Some("s-a")).unwrap();
        let (bob_file, _) = state.export(Some("s-b")).unwrap();
        assert_eq!(alice_file, "Alice_report.pdf");
        assert_eq!(bob_file, "Bob_report.pdf");
    }

    #[test]
    fn concurrent_submissions_then_export_sees_one_winner() {
        use std::sync::Arc;
        use std::thread;

        let (state, _tmp) = test_state();
        let state = Arc::new(state);

        let mut handles = vec![];
        for name in ["Alice", "Bob"] {
            let state = Arc::clone(&state);
            handles.push(thread::spawn(move || {
                state.submit(name, &select(&["fever"]), None).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let (filename, _) = state.export(None).unwrap();
        assert!(
            filename == "Alice_report.pdf" || filename == "Bob_report.pdf",
            "export must reflect one of the two submissions, got {filename}"
        );
    }
}
