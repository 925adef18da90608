//! Report store — the bridge between a prediction and its PDF export.
//!
//! Each session key holds at most one record: the most recent successful
//! submission for that key. There is no history; `record` overwrites.
//! Callers that do not send a session key all share the default slot,
//! where the last writer wins: two interleaved submissions and a later
//! export expose whichever submission landed second.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::inference::{Prediction, RankedCondition};

/// Slot used when the caller supplies no session key.
pub const DEFAULT_SESSION: &str = "default";

/// The most recent successful prediction for one session key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub patient: String,
    pub symptoms: Vec<String>,
    pub conditions: Vec<RankedCondition>,
}

impl From<&Prediction> for ReportRecord {
    fn from(prediction: &Prediction) -> Self {
        Self {
            patient: prediction.patient.clone(),
            symptoms: prediction.symptoms.clone(),
            conditions: prediction.conditions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportStoreError {
    /// Export requested before any successful submission for this key.
    #[error("no report available yet")]
    NoReportAvailable,
    #[error("internal lock error")]
    LockPoisoned,
}

/// Session-keyed map of last-report records.
///
/// `RwLock` because reads (export, status) dominate and inference itself
/// never touches this state.
pub struct ReportStore {
    slots: RwLock<HashMap<String, ReportRecord>>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn key(session: Option<&str>) -> &str {
        match session {
            Some(key) if !key.trim().is_empty() => key,
            _ => DEFAULT_SESSION,
        }
    }

    /// Overwrite the record for a session key. The previous record for
    /// that key is discarded.
    pub fn record(
        &self,
        session: Option<&str>,
        record: ReportRecord,
    ) -> Result<(), ReportStoreError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| ReportStoreError::LockPoisoned)?;
        slots.insert(Self::key(session).to_string(), record);
        Ok(())
    }

    /// Current record for a session key, or `NoReportAvailable`.
    pub fn fetch(&self, session: Option<&str>) -> Result<ReportRecord, ReportStoreError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| ReportStoreError::LockPoisoned)?;
        slots
            .get(Self::key(session))
            .cloned()
            .ok_or(ReportStoreError::NoReportAvailable)
    }

    /// Whether a record exists for a session key.
    pub fn has_report(&self, session: Option<&str>) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(Self::key(session)))
            .unwrap_or(false)
    }
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record_for(patient: &str) -> ReportRecord {
        ReportRecord {
            patient: patient.to_string(),
            symptoms: vec!["fever".into(), "cough".into()],
            conditions: vec![RankedCondition {
                condition: "Flu".into(),
                confidence: 61.52,
            }],
        }
    }

    #[test]
    fn fetch_before_any_record_is_no_report() {
        let store = ReportStore::new();
        assert_eq!(
            store.fetch(None).unwrap_err(),
            ReportStoreError::NoReportAvailable
        );
        assert!(!store.has_report(None));
    }

    #[test]
    fn record_then_fetch_round_trips() {
        let store = ReportStore::new();
        store.record(None, record_for("Alice")).unwrap();

        let fetched = store.fetch(None).unwrap();
        assert_eq!(fetched.patient, "Alice");
        assert_eq!(fetched.symptoms, vec!["fever", "cough"]);
        assert_eq!(fetched.conditions[0].condition, "Flu");
        assert!(store.has_report(None));
    }

    #[test]
    fn default_slot_last_writer_wins() {
        // The shared slot deliberately keeps the original single-slot
        // behavior: B's submission clobbers A's.
        let store = ReportStore::new();
        store.record(None, record_for("Alice")).unwrap();
        store.record(None, record_for("Bob")).unwrap();

        assert_eq!(store.fetch(None).unwrap().patient, "Bob");
    }

    #[test]
    fn session_keys_are_isolated() {
        let store = ReportStore::new();
        store.record(Some("s-alice"), record_for("Alice")).unwrap();
        store.record(Some("s-bob"), record_for("Bob")).unwrap();

        assert_eq!(store.fetch(Some("s-alice")).unwrap().patient, "Alice");
        assert_eq!(store.fetch(Some("s-bob")).unwrap().patient, "Bob");
        assert_eq!(
            store.fetch(None).unwrap_err(),
            ReportStoreError::NoReportAvailable
        );
    }

    #[test]
    fn blank_session_key_falls_back_to_default_slot() {
        let store = ReportStore::new();
        store.record(Some("  "), record_for("Alice")).unwrap();
        assert_eq!(store.fetch(None).unwrap().patient, "Alice");
        assert_eq!(store.fetch(Some("")).unwrap().patient, "Alice");
    }

    #[test]
    fn concurrent_writers_leave_one_winner() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(ReportStore::new());
        let mut handles = vec![];
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.record(None, record_for(&format!("P{i}"))).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Whichever writer landed last, the slot holds exactly one record.
        let winner = store.fetch(None).unwrap();
        assert!(winner.patient.starts_with('P'));
    }
}
