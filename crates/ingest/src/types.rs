//! Transaction record model.
//!
//! ```text
//! TransactionRecord
//! ├── id: String               deterministic UUIDv5 for parsed rows
//! ├── date: NaiveDate
//! ├── description: Option<String>
//! ├── amount: Option<f64>      debits negative
//! ├── balance_after: Option<f64>
//! ├── kind: Option<TransactionKind>   serialized as "type"
//! ├── category: Option<String> None until classified or confirmed
//! ├── embedding: Option<EmbeddingVector>
//! └── user_confirmed: bool
//! ```
//!
//! Every nullable column of the ledger maps to an `Option`. A record with both
//! an embedding and a category can serve as a classification reference; see
//! [`TransactionRecord::reference_item`].
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use index::{EmbeddingVector, LabeledTransaction};
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Direction of a money movement.
///
/// Serializes lowercase; deserializes through [`FromStr`], so any casing and
/// surrounding whitespace is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TransactionKind {
    Debit,
    Credit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("debit") {
            Ok(TransactionKind::Debit)
        } else if trimmed.eq_ignore_ascii_case("credit") {
            Ok(TransactionKind::Credit)
        } else {
            Err(IngestError::InvalidKind(s.to_string()))
        }
    }
}

impl TryFrom<String> for TransactionKind {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub balance_after: Option<f64>,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingVector>,
    #[serde(default)]
    pub user_confirmed: bool,
}

impl TransactionRecord {
    /// Bare record with only identity and date set.
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            description: None,
            amount: None,
            balance_after: None,
            kind: None,
            category: None,
            embedding: None,
            user_confirmed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_embedding(mut self, embedding: EmbeddingVector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach an embedding stored in its JSON array form.
    pub fn with_embedding_json(mut self, raw: &str) -> Result<Self, IngestError> {
        let embedding = EmbeddingVector::from_json(raw)
            .map_err(|e| IngestError::InvalidEmbedding(e.to_string()))?;
        self.embedding = Some(embedding);
        Ok(self)
    }

    /// Category label, ignoring blank values.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|label| !label.trim().is_empty())
    }

    /// The embedding, or [`IngestError::MissingField`] when none is stored.
    pub fn require_embedding(&self) -> Result<&EmbeddingVector, IngestError> {
        self.embedding
            .as_ref()
            .ok_or_else(|| IngestError::MissingField {
                id: self.id.clone(),
                field: "embedding",
            })
    }

    /// Reference item for the classifier, when both embedding and category exist.
    pub fn reference_item(&self) -> Option<LabeledTransaction> {
        let embedding = self.embedding.as_ref()?;
        let category = self.category_label()?;
        LabeledTransaction::new(self.id.clone(), embedding.clone(), category).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date")
    }

    fn emb(values: &[f64]) -> EmbeddingVector {
        EmbeddingVector::new(values.to_vec()).expect("finite")
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            "debit".parse::<TransactionKind>().expect("debit"),
            TransactionKind::Debit
        );
        assert_eq!(
            " Credit ".parse::<TransactionKind>().expect("credit"),
            TransactionKind::Credit
        );
        assert!(matches!(
            "refund".parse::<TransactionKind>(),
            Err(IngestError::InvalidKind(_))
        ));
    }

    #[test]
    fn kind_serializes_under_type_key() {
        let record = TransactionRecord::new("tx-1", day()).with_kind(TransactionKind::Debit);
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["type"], "debit");
        assert_eq!(json["date"], "2024-03-14");
        assert!(json.get("embedding").is_none());
    }

    #[test]
    fn kind_deserializes_in_any_case() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"id":"tx-3","date":"2024-01-02","type":"Debit"}"#)
                .expect("parse");
        assert_eq!(record.kind, Some(TransactionKind::Debit));

        let kind: TransactionKind = serde_json::from_str(r#"" CREDIT ""#).expect("parse");
        assert_eq!(kind, TransactionKind::Credit);

        let err = serde_json::from_str::<TransactionKind>(r#""refund""#).expect_err("bad kind");
        assert!(err.to_string().contains("refund"), "{err}");
    }

    #[test]
    fn record_deserializes_with_missing_optionals() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"id":"tx-2","date":"2024-01-02"}"#).expect("parse");
        assert_eq!(record.id, "tx-2");
        assert!(record.description.is_none());
        assert!(record.category.is_none());
        assert!(!record.user_confirmed);
    }

    #[test]
    fn reference_item_requires_embedding_and_category() {
        let bare = TransactionRecord::new("a", day());
        assert!(bare.reference_item().is_none());

        let no_category = bare.clone().with_embedding(emb(&[1.0, 0.0]));
        assert!(no_category.reference_item().is_none());

        let blank = no_category.clone().with_category("   ");
        assert!(blank.reference_item().is_none());

        let labeled = no_category.with_category("groceries");
        let item = labeled.reference_item().expect("reference");
        assert_eq!(item.id, "a");
        assert_eq!(item.category, "groceries");
    }

    #[test]
    fn require_embedding_names_the_record() {
        let err = TransactionRecord::new("tx-9", day())
            .require_embedding()
            .expect_err("no embedding");
        assert_eq!(
            err,
            IngestError::MissingField {
                id: "tx-9".into(),
                field: "embedding"
            }
        );
    }

    #[test]
    fn embedding_json_round_trips_through_record() {
        let record = TransactionRecord::new("tx-3", day())
            .with_embedding_json("[0.5, -0.25, 1.0]")
            .expect("valid json");
        assert_eq!(
            record.embedding.as_ref().map(|e| e.as_slice().to_vec()),
            Some(vec![0.5, -0.25, 1.0])
        );

        let err = TransactionRecord::new("tx-3", day())
            .with_embedding_json("[0.5, \"x\"]")
            .expect_err("malformed");
        assert!(matches!(err, IngestError::InvalidEmbedding(_)));
    }
}
