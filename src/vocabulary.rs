//! Symptom vocabulary and training corpus.
//!
//! The vocabulary is an ordered catalog of recognized symptom names. Its
//! order defines the positional layout of every feature vector, so it must
//! never be reordered once a corpus has been fitted against it: stored
//! training rows would silently misalign.

use std::collections::HashMap;

use crate::inference::{FitError, ValidationError};

/// Built-in symptom catalog, in feature-vector order.
pub const SYMPTOMS: [&str; 10] = [
    "fever",
    "cough",
    "headache",
    "vomiting",
    "fatigue",
    "chest pain",
    "breathlessness",
    "sneezing",
    "runny nose",
    "joint pain",
];

/// Built-in training rows: one binary feature vector per condition,
/// aligned with [`SYMPTOMS`].
const TRAINING_ROWS: [([u8; 10], &str); 5] = [
    ([1, 1, 1, 0, 1, 0, 0, 0, 0, 0], "Flu"),
    ([0, 1, 0, 0, 0, 0, 0, 1, 1, 0], "Common Cold"),
    ([1, 0, 1, 1, 1, 0, 0, 0, 0, 1], "Dengue"),
    ([0, 0, 0, 0, 1, 1, 1, 0, 0, 0], "Heart Disease"),
    ([0, 1, 0, 0, 0, 0, 1, 0, 0, 0], "Asthma"),
];

// ─── Vocabulary ───────────────────────────────────────────────────────────────

/// Ordered set of unique symptom names. Positions are feature indices.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from an ordered list of names.
    ///
    /// Rejects an empty list and duplicate entries; both would make
    /// the feature-vector layout ambiguous.
    pub fn new<I, S>(names: I) -> Result<Self, FitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(FitError::EmptyVocabulary);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(FitError::DuplicateSymptom(name.clone()));
            }
        }

        Ok(Self { names, index })
    }

    /// The built-in 10-symptom catalog.
    pub fn builtin() -> Self {
        // The constant table is known-good; new() only fails on
        // empty or duplicated input.
        Self::new(SYMPTOMS).expect("builtin vocabulary is valid")
    }

    /// Number of symptoms (the feature-vector length).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Symptom names in feature-vector order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a symptom name, if it is part of the vocabulary.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Encode a user's symptom selection as a binary feature vector.
    ///
    /// Index i is 1 iff the i-th vocabulary entry appears in `selected`.
    /// A name outside the vocabulary is a validation error, not a silent
    /// drop; index-based lookup of an absent value is a crash risk.
    pub fn encode(&self, selected: &[String]) -> Result<Vec<u8>, ValidationError> {
        let mut features = vec![0u8; self.names.len()];
        for name in selected {
            let pos = self
                .position(name)
                .ok_or_else(|| ValidationError::UnknownSymptom(name.clone()))?;
            features[pos] = 1;
        }
        Ok(features)
    }
}

// ─── Training corpus ──────────────────────────────────────────────────────────

/// One labelled row of the training corpus.
#[derive(Debug, Clone)]
pub struct TrainingExample {
    pub features: Vec<u8>,
    pub label: String,
}

/// A vocabulary plus the labelled rows fitted against it.
///
/// Fixed at build time for the built-in data; constructible from owned
/// data so tests can fit ill-formed corpora.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub vocabulary: Vocabulary,
    pub examples: Vec<TrainingExample>,
}

impl Corpus {
    /// The built-in five-condition corpus.
    pub fn builtin() -> Self {
        let examples = TRAINING_ROWS
            .iter()
            .map(|(features, label)| TrainingExample {
                features: features.to_vec(),
                label: (*label).to_string(),
            })
            .collect();

        Self {
            vocabulary: Vocabulary::builtin(),
            examples,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
