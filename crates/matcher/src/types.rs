use index::{IndexError, Neighbor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-call tuning knobs for the classifier.
///
/// Both values are explicit parameters rather than process-wide constants so
/// callers (and tests) can vary them per request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    /// Number of nearest neighbours consulted per query.
    #[serde(default = "ClassifierConfig::default_k")]
    pub k: usize,
    /// Confidence floor: the neighbourhood's mean similarity must reach this
    /// value before a category is reported.
    #[serde(default = "ClassifierConfig::default_min_average_similarity")]
    pub min_average_similarity: f64,
}

impl ClassifierConfig {
    pub(crate) fn default_k() -> usize {
        5
    }

    pub(crate) fn default_min_average_similarity() -> f64 {
        0.1
    }

    pub fn new(k: usize, min_average_similarity: f64) -> Self {
        Self {
            k,
            min_average_similarity,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_min_average_similarity(mut self, floor: f64) -> Self {
        self.min_average_similarity = floor;
        self
    }

    /// Reject `k == 0` and floors outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.k == 0 {
            return Err(MatchError::InvalidConfig(
                "k must be greater than zero".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_average_similarity) {
            return Err(MatchError::InvalidConfig(
                "min_average_similarity must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: Self::default_k(),
            min_average_similarity: Self::default_min_average_similarity(),
        }
    }
}

/// Why a decision carries no category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AbstainReason {
    /// The reference set was empty, so there were no neighbours to vote.
    NoNeighbors,
    /// Neighbours existed but their mean similarity fell below the floor.
    LowConfidence,
}

/// Result of the neighbourhood vote.
///
/// When `accepted` is false the `category` is empty and means "no category
/// assigned"; use [`ClassificationDecision::category`] to get an `Option`
/// instead of reading the field directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationDecision {
    pub category: String,
    /// Mean similarity over the whole neighbourhood.
    pub average_similarity: f64,
    pub accepted: bool,
    /// Set exactly when `accepted` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstain_reason: Option<AbstainReason>,
}

impl ClassificationDecision {
    pub(crate) fn accepted(category: String, average_similarity: f64) -> Self {
        Self {
            category,
            average_similarity,
            accepted: true,
            abstain_reason: None,
        }
    }

    pub(crate) fn abstained(reason: AbstainReason, average_similarity: f64) -> Self {
        Self {
            category: String::new(),
            average_similarity,
            accepted: false,
            abstain_reason: Some(reason),
        }
    }

    /// The assigned category, or `None` when the classifier abstained.
    pub fn category(&self) -> Option<&str> {
        self.accepted.then_some(self.category.as_str())
    }
}

/// Neighbours plus the decision derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    /// Ranked neighbours, best first.
    pub neighbors: Vec<Neighbor>,
    pub decision: ClassificationDecision,
}

/// Errors produced by the classification layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// Invalid classifier configuration.
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
    /// Neighbour search rejected its inputs.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let cfg = ClassifierConfig::default();
        assert_eq!(cfg.k, 5);
        assert!((cfg.min_average_similarity - 0.1).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_k_rejected() {
        let err = ClassifierConfig::default()
            .with_k(0)
            .validate()
            .expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains('k')),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn floor_outside_unit_interval_rejected() {
        for floor in [-0.1, 1.5, f64::NAN] {
            let err = ClassifierConfig::default()
                .with_min_average_similarity(floor)
                .validate()
                .expect_err("config should be invalid");
            assert!(err.to_string().contains("min_average_similarity"));
        }
    }

    #[test]
    fn boundary_floors_are_valid() {
        assert!(ClassifierConfig::new(1, 0.0).validate().is_ok());
        assert!(ClassifierConfig::new(1, 1.0).validate().is_ok());
    }

    #[test]
    fn config_fields_default_when_missing_from_json() {
        let cfg: ClassifierConfig = serde_json::from_str(r#"{"k": 3}"#).expect("parse");
        assert_eq!(cfg.k, 3);
        assert!((cfg.min_average_similarity - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn abstained_decision_has_no_category() {
        let decision = ClassificationDecision::abstained(AbstainReason::LowConfidence, 0.05);
        assert_eq!(decision.category(), None);
        assert_eq!(decision.category, "");
        assert!(!decision.accepted);
    }

    #[test]
    fn accepted_decision_serializes_without_reason() {
        let decision = ClassificationDecision::accepted("groceries".into(), 0.8);
        assert_eq!(decision.category(), Some("groceries"));
        let json = serde_json::to_value(&decision).expect("serialize");
        assert!(json.get("abstain_reason").is_none());
        assert_eq!(json["category"], "groceries");
    }
}
