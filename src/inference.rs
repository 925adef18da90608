//! Inference engine — symptom selection in, ranked conditions out.
//!
//! The classifier is fitted once at process start and never refitted, so
//! prediction is a pure read-only function of (model, feature vector) and
//! is safe to call concurrently.
//!
//! The classifier sits behind the [`Classifier`] trait: anything that can
//! emit a full probability distribution over the encoded labels plugs in.
//! The default is a Bernoulli naive Bayes model with Laplace smoothing:
//! with five training rows it behaves as a memorized lookup with smoothed
//! probability mass, which is exactly what this corpus calls for.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vocabulary::{Corpus, Vocabulary};

/// Ranked list length returned by `predict`.
pub const TOP_K: usize = 3;

/// Laplace smoothing pseudo-count for per-class feature estimates.
const SMOOTHING: f64 = 1.0;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Rejected user input. Surfaced as a message, never a crash; the report
/// store must be left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a patient name")]
    MissingName,
    #[error("Please select at least one symptom")]
    NoSymptomsSelected,
    #[error("Unrecognized symptom: {0}")]
    UnknownSymptom(String),
}

/// Malformed corpus at startup. Fatal: the process must not serve if the
/// engine cannot be fitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    #[error("training corpus is empty")]
    EmptyCorpus,
    #[error("symptom vocabulary is empty")]
    EmptyVocabulary,
    #[error("duplicate vocabulary entry: {0}")]
    DuplicateSymptom(String),
    #[error("training example {index} has {got} features, expected {expected}")]
    FeatureLengthMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
}

// ─── Label encoding ───────────────────────────────────────────────────────────

/// Bijection between condition names and dense integer indices.
///
/// Labels are indexed in corpus order of first appearance; the mapping is
/// fixed at fit time and reversed for display.
#[derive(Debug, Clone)]
pub struct LabelEncoding {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoding {
    fn from_corpus(corpus: &Corpus) -> Self {
        let mut labels = Vec::new();
        let mut index = HashMap::new();
        for example in &corpus.examples {
            if !index.contains_key(&example.label) {
                index.insert(example.label.clone(), labels.len());
                labels.push(example.label.clone());
            }
        }
        Self { labels, index }
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn decode(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ─── Classifier ───────────────────────────────────────────────────────────────

/// A fitted multi-class probabilistic classifier.
///
/// The contract is `predict_proba`-shaped: a full probability distribution
/// over the encoded labels, one entry per label index, summing to 1.
/// Exact numeric values are implementation-defined and must not be asserted
/// bit-exactly across classifier families.
pub trait Classifier: Send + Sync {
    fn class_probabilities(&self, features: &[u8]) -> Vec<f64>;
}

/// Bernoulli naive Bayes over binary features, Laplace-smoothed.
///
/// Per class c and feature i the model keeps log θ_ci and log (1 − θ_ci),
/// where θ_ci = (count of 1s + α) / (rows in class + 2α). Scoring runs in
/// log space and normalizes with a max-shift, so the output is a proper
/// distribution and deterministic for a given fit.
pub struct NaiveBayesModel {
    log_theta: Vec<Vec<f64>>,
    log_theta_neg: Vec<Vec<f64>>,
    log_prior: Vec<f64>,
}

impl NaiveBayesModel {
    fn fit(corpus: &Corpus, encoding: &LabelEncoding) -> Self {
        let n_features = corpus.vocabulary.len();
        let n_classes = encoding.len();
        let total = corpus.examples.len() as f64;

        let mut ones = vec![vec![0.0f64; n_features]; n_classes];
        let mut rows = vec![0.0f64; n_classes];

        for example in &corpus.examples {
            // Fit preconditions guarantee every label is encodable.
            let class = encoding
                .encode(&example.label)
                .expect("label present in encoding");
            rows[class] += 1.0;
            for (i, &value) in example.features.iter().enumerate() {
                if value != 0 {
                    ones[class][i] += 1.0;
                }
            }
        }

        let mut log_theta = vec![vec![0.0f64; n_features]; n_classes];
        let mut log_theta_neg = vec![vec![0.0f64; n_features]; n_classes];
        let mut log_prior = vec![0.0f64; n_classes];

        for c in 0..n_classes {
            log_prior[c] = (rows[c] / total).ln();
            for i in 0..n_features {
                let theta = (ones[c][i] + SMOOTHING) / (rows[c] + 2.0 * SMOOTHING);
                log_theta[c][i] = theta.ln();
                log_theta_neg[c][i] = (1.0 - theta).ln();
            }
        }

        Self {
            log_theta,
            log_theta_neg,
            log_prior,
        }
    }
}

impl Classifier for NaiveBayesModel {
    fn class_probabilities(&self, features: &[u8]) -> Vec<f64> {
        let scores: Vec<f64> = (0..self.log_prior.len())
            .map(|c| {
                let mut score = self.log_prior[c];
                for (i, &value) in features.iter().enumerate() {
                    score += if value != 0 {
                        self.log_theta[c][i]
                    } else {
                        self.log_theta_neg[c][i]
                    };
                }
                score
            })
            .collect();

        // Max-shift before exponentiation keeps the normalization stable.
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exp.iter().sum();
        exp.iter().map(|e| e / sum).collect()
    }
}

// ─── Prediction types ─────────────────────────────────────────────────────────

/// One ranked entry: a condition name plus a confidence percentage
/// (probability × 100, rounded to 2 decimal places).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: String,
    pub confidence: f64,
}

/// Result of a successful prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub patient: String,
    pub symptoms: Vec<String>,
    pub conditions: Vec<RankedCondition>,
}

// ─── Engine ───────────────────────────────────────────────────────────────────

/// Vocabulary + label encoding + fitted classifier.
pub struct InferenceEngine {
    vocabulary: Vocabulary,
    labels: LabelEncoding,
    model: Box<dyn Classifier>,
}

impl InferenceEngine {
    /// Fit the engine on a corpus. Invoked once, at process start.
    ///
    /// Validates the corpus shape (non-empty, every row aligned with the
    /// vocabulary), builds the label encoding, and fits the default
    /// classifier.
    pub fn fit(corpus: Corpus) -> Result<Self, FitError> {
        if corpus.vocabulary.is_empty() {
            return Err(FitError::EmptyVocabulary);
        }
        if corpus.examples.is_empty() {
            return Err(FitError::EmptyCorpus);
        }
        let expected = corpus.vocabulary.len();
        for (index, example) in corpus.examples.iter().enumerate() {
            if example.features.len() != expected {
                return Err(FitError::FeatureLengthMismatch {
                    index,
                    expected,
                    got: example.features.len(),
                });
            }
        }

        let labels = LabelEncoding::from_corpus(&corpus);
        let model = NaiveBayesModel::fit(&corpus, &labels);

        Ok(Self {
            vocabulary: corpus.vocabulary,
            labels,
            model: Box::new(model),
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    /// Predict the ranked conditions for a symptom selection.
    ///
    /// Validates the input, encodes the feature vector, queries the
    /// classifier, and ranks the top [`TOP_K`] labels by probability
    /// descending, ties broken by label name ascending. If fewer than
    /// `TOP_K` distinct labels exist, all of them are returned.
    pub fn predict(
        &self,
        patient: &str,
        selected: &[String],
    ) -> Result<Prediction, ValidationError> {
        let patient = patient.trim();
        if patient.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if selected.is_empty() {
            return Err(ValidationError::NoSymptomsSelected);
        }

        let features = self.vocabulary.encode(selected)?;
        let probabilities = self.model.class_probabilities(&features);

        let mut ranked: Vec<(usize, f64)> = probabilities.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.labels.decode(a.0).cmp(self.labels.decode(b.0)))
        });
        ranked.truncate(TOP_K);

        let conditions = ranked
            .into_iter()
            .map(|(index, probability)| RankedCondition {
                condition: self.labels.decode(index).to_string(),
                confidence: round_percent(probability),
            })
            .collect();

        Ok(Prediction {
            patient: patient.to_string(),
            symptoms: selected.to_vec(),
            conditions,
        })
    }
}

/// Probability → percentage with 2 decimal places.
fn round_percent(probability: f64) -> f64 {
    (probability * 10_000.0).round() / 100.0
}

// ─── Tests ────────────────────────────────────────────────────────────────────
