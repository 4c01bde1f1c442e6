//! Parsing of the document-understanding service's statement output.
//!
//! The service is asked for a JSON document of the shape
//!
//! ```json
//! {"transactions": [
//!   {"date": "2024-03-14", "description": "TESCO STORES", "amount": 23.4,
//!    "balance_after": 1022.15, "type": "debit"}
//! ]}
//! ```
//!
//! but language models like to wrap it in markdown fences or prose, so the raw
//! reply is cleaned first: fences are removed and only the span between the
//! first `{` and the last `}` is kept.
use std::time::Instant;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::types::{TransactionKind, TransactionRecord};

#[derive(Debug, Deserialize)]
struct RawStatement {
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    date: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    balance_after: Option<f64>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Strip markdown fences and surrounding prose, leaving the outermost object.
pub fn clean_model_output(raw: &str) -> Result<&str, IngestError> {
    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(IngestError::InvalidStatement(
            "no JSON object found in service output".into(),
        )),
    }
}

/// Turn raw service output into transaction records, in statement order.
///
/// Records come back uncategorised and without embeddings. Ids are UUIDv5
/// values derived from the statement position and row contents, so parsing
/// the same output twice yields the same ids.
pub fn parse_statement(
    raw: &str,
    cfg: &IngestConfig,
) -> Result<Vec<TransactionRecord>, IngestError> {
    let start = Instant::now();
    match parse_inner(raw, cfg) {
        Ok(records) => {
            let debits = records
                .iter()
                .filter(|r| r.kind == Some(TransactionKind::Debit))
                .count();
            info!(
                transactions = records.len(),
                debits,
                credits = records.len() - debits,
                elapsed_micros = start.elapsed().as_micros(),
                "statement_parsed"
            );
            Ok(records)
        }
        Err(err) => {
            warn!(
                error = %err,
                input_len = raw.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "statement_parse_failure"
            );
            Err(err)
        }
    }
}

fn parse_inner(raw: &str, cfg: &IngestConfig) -> Result<Vec<TransactionRecord>, IngestError> {
    let body = clean_model_output(raw)?;
    let statement: RawStatement = serde_json::from_str(body)
        .map_err(|e| IngestError::InvalidStatement(format!("malformed statement JSON: {e}")))?;

    statement
        .transactions
        .into_iter()
        .enumerate()
        .map(|(index, row)| build_record(index, row, cfg))
        .collect()
}

fn build_record(
    index: usize,
    row: RawTransaction,
    cfg: &IngestConfig,
) -> Result<TransactionRecord, IngestError> {
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
        IngestError::InvalidDate {
            index,
            value: row.date.clone(),
        }
    })?;

    let kind = match row.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse::<TransactionKind>()?),
    };

    let mut amount = row.amount;
    if cfg.negate_debits && kind == Some(TransactionKind::Debit) {
        amount = amount.map(|a| -a.abs());
    }

    let description = row
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let id = derive_record_id(&cfg.id_namespace, index, date, description.as_deref(), amount);

    Ok(TransactionRecord {
        id,
        date,
        description,
        amount,
        balance_after: row.balance_after,
        kind,
        category: None,
        embedding: None,
        user_confirmed: false,
    })
}

pub(crate) fn derive_record_id(
    namespace: &Uuid,
    index: usize,
    date: NaiveDate,
    description: Option<&str>,
    amount: Option<f64>,
) -> String {
    let description = description.unwrap_or_default();
    let amount = amount.map(|a| a.to_string()).unwrap_or_default();
    let date = date.to_string();
    let index = index.to_string();

    let mut material =
        Vec::with_capacity(index.len() + date.len() + description.len() + amount.len() + 3);
    for (i, part) in [index.as_str(), date.as_str(), description, amount.as_str()]
        .iter()
        .enumerate()
    {
        if i > 0 {
            material.push(0); // Separator to prevent collisions.
        }
        material.extend_from_slice(part.as_bytes());
    }
    Uuid::new_v5(namespace, &material).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCED: &str = "Here you go:\n```json\n{\"transactions\": [\n  {\"date\": \"2024-03-14\", \"description\": \" TESCO STORES \", \"amount\": 23.4, \"balance_after\": 1022.15, \"type\": \"debit\"},\n  {\"date\": \"2024-03-15\", \"description\": \"SALARY\", \"amount\": 2500.0, \"balance_after\": 3522.15, \"type\": \"credit\"}\n]}\n```\n";

    #[test]
    fn fenced_output_is_cleaned_and_parsed() {
        let records = parse_statement(FENCED, &IngestConfig::default()).expect("parse");
        assert_eq!(records.len(), 2);

        let tesco = &records[0];
        assert_eq!(tesco.date, NaiveDate::from_ymd_opt(2024, 3, 14).expect("date"));
        assert_eq!(tesco.description.as_deref(), Some("TESCO STORES"));
        assert_eq!(tesco.amount, Some(-23.4));
        assert_eq!(tesco.balance_after, Some(1022.15));
        assert_eq!(tesco.kind, Some(TransactionKind::Debit));
        assert!(tesco.category.is_none());
        assert!(tesco.embedding.is_none());

        let salary = &records[1];
        assert_eq!(salary.amount, Some(2500.0));
        assert_eq!(salary.kind, Some(TransactionKind::Credit));
    }

    #[test]
    fn already_negative_debits_stay_negative() {
        let raw = r#"{"transactions":[{"date":"2024-01-01","amount":-12.5,"type":"debit"}]}"#;
        let records = parse_statement(raw, &IngestConfig::default()).expect("parse");
        assert_eq!(records[0].amount, Some(-12.5));
    }

    #[test]
    fn debit_sign_kept_when_negation_disabled() {
        let raw = r#"{"transactions":[{"date":"2024-01-01","amount":12.5,"type":"debit"}]}"#;
        let cfg = IngestConfig::default().with_negate_debits(false);
        let records = parse_statement(raw, &cfg).expect("parse");
        assert_eq!(records[0].amount, Some(12.5));
    }

    #[test]
    fn ids_are_deterministic_and_distinct() {
        let cfg = IngestConfig::default();
        let first = parse_statement(FENCED, &cfg).expect("parse");
        let second = parse_statement(FENCED, &cfg).expect("parse");
        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
        assert!(Uuid::parse_str(&first[0].id).is_ok());
    }

    #[test]
    fn identical_rows_get_distinct_ids() {
        let raw = r#"{"transactions":[
            {"date":"2024-01-01","description":"COFFEE","amount":3.0,"type":"debit"},
            {"date":"2024-01-01","description":"COFFEE","amount":3.0,"type":"debit"}
        ]}"#;
        let records = parse_statement(raw, &IngestConfig::default()).expect("parse");
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn namespace_changes_ids() {
        let a = parse_statement(FENCED, &IngestConfig::default()).expect("parse");
        let cfg = IngestConfig::default().with_id_namespace(Uuid::NAMESPACE_URL);
        let b = parse_statement(FENCED, &cfg).expect("parse");
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn invalid_date_reports_position() {
        let raw = r#"{"transactions":[
            {"date":"2024-01-01","type":"credit"},
            {"date":"14/03/2024","type":"debit"}
        ]}"#;
        let err = parse_statement(raw, &IngestConfig::default()).expect_err("bad date");
        assert_eq!(
            err,
            IngestError::InvalidDate {
                index: 1,
                value: "14/03/2024".into()
            }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = r#"{"transactions":[{"date":"2024-01-01","type":"transfer"}]}"#;
        let err = parse_statement(raw, &IngestConfig::default()).expect_err("bad kind");
        assert_eq!(err, IngestError::InvalidKind("transfer".into()));
    }

    #[test]
    fn missing_kind_and_amount_are_allowed() {
        let raw = r#"{"transactions":[{"date":"2024-01-01","description":"ATM"}]}"#;
        let records = parse_statement(raw, &IngestConfig::default()).expect("parse");
        assert!(records[0].kind.is_none());
        assert!(records[0].amount.is_none());
    }

    #[test]
    fn output_without_object_is_invalid() {
        for raw in ["", "sorry, I cannot read this", "} {"] {
            let err = parse_statement(raw, &IngestConfig::default()).expect_err("no object");
            assert!(matches!(err, IngestError::InvalidStatement(_)));
        }
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = parse_statement("{\"transactions\": [", &IngestConfig::default())
            .expect_err("truncated");
        assert!(matches!(err, IngestError::InvalidStatement(_)));
    }

    #[test]
    fn empty_statement_yields_no_records() {
        let records =
            parse_statement("{\"transactions\": []}", &IngestConfig::default()).expect("parse");
        assert!(records.is_empty());
    }

    #[test]
    fn clean_keeps_outermost_braces() {
        let cleaned = clean_model_output("```json\n{\"a\": {\"b\": 1}}\n```").expect("object");
        assert_eq!(cleaned, "{\"a\": {\"b\": 1}}");
    }
}
