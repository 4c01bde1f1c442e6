//! End-to-end categorisation: statement output in, categories out.

use chrono::NaiveDate;
use spendcat::{
    AbstainReason, Classifier, ClassifierConfig, EmbeddingVector, IndexError, IngestConfig,
    IngestError, MatchError, PipelineError, StubEmbedder, TransactionKind, TransactionRecord,
    classify_transactions, embed_missing, embed_transaction, embedding_text, parse_statement,
    reference_set,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).expect("valid date")
}

fn emb(values: &[f64]) -> EmbeddingVector {
    EmbeddingVector::new(values.to_vec()).expect("finite")
}

fn categorised(id: &str, values: &[f64], category: &str) -> TransactionRecord {
    TransactionRecord::new(id, day(1))
        .with_embedding(emb(values))
        .with_category(category)
}

fn pending(id: &str, values: &[f64]) -> TransactionRecord {
    TransactionRecord::new(id, day(2)).with_embedding(emb(values))
}

/// Five groceries and two entertainment transactions with known embeddings.
fn history() -> Vec<TransactionRecord> {
    vec![
        categorised("g1", &[0.95, 0.05, 0.10], "groceries"),
        categorised("g2", &[0.90, 0.10, 0.05], "groceries"),
        categorised("e1", &[0.05, 0.90, 0.20], "entertainment"),
        categorised("g3", &[0.88, 0.02, 0.15], "groceries"),
        categorised("g4", &[0.92, 0.08, 0.00], "groceries"),
        categorised("e2", &[0.10, 0.95, 0.05], "entertainment"),
        categorised("g5", &[0.85, 0.12, 0.08], "groceries"),
    ]
}

#[test]
fn groceries_query_is_categorised_as_groceries() {
    let references = reference_set(&history());
    assert_eq!(references.len(), 7);

    let classifier = Classifier::new(ClassifierConfig::new(5, 0.1)).expect("valid config");
    let mut queue = vec![pending("q1", &[0.91, 0.06, 0.07])];
    let reports = classify_transactions(&classifier, &mut queue, &references).expect("classify");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].transaction_id, "q1");
    assert!(reports[0].decision.accepted);
    assert_eq!(reports[0].decision.category, "groceries");
    assert_eq!(reports[0].neighbors.len(), 5);
    assert_eq!(queue[0].category.as_deref(), Some("groceries"));
}

#[test]
fn mixed_queue_accepts_and_abstains_independently() {
    let references = reference_set(&history());
    let classifier = Classifier::new(ClassifierConfig::new(2, 0.5)).expect("valid config");

    let mut queue = vec![
        pending("cinema", &[0.08, 0.93, 0.10]),
        // Orthogonal to every reference: neighbours exist but are far away.
        pending("unknown", &[0.0, 0.0, 1.0]),
    ];
    let reports = classify_transactions(&classifier, &mut queue, &references).expect("classify");

    assert_eq!(reports[0].decision.category(), Some("entertainment"));
    assert_eq!(queue[0].category.as_deref(), Some("entertainment"));

    assert!(!reports[1].decision.accepted);
    assert_eq!(
        reports[1].decision.abstain_reason,
        Some(AbstainReason::LowConfidence)
    );
    assert_eq!(queue[1].category, None, "abstention must not write a label");
}

#[test]
fn empty_history_abstains_with_no_neighbors() {
    let classifier = Classifier::new(ClassifierConfig::default()).expect("valid config");
    let mut queue = vec![pending("q", &[1.0, 0.0, 0.0])];
    let reports = classify_transactions(&classifier, &mut queue, &[]).expect("classify");

    assert!(!reports[0].decision.accepted);
    assert_eq!(
        reports[0].decision.abstain_reason,
        Some(AbstainReason::NoNeighbors)
    );
    assert!(queue[0].category.is_none());
}

#[test]
fn reference_set_skips_unlabelled_and_unembedded_records() {
    let mut records = history();
    records.push(TransactionRecord::new("no-embedding", day(3)).with_category("rent"));
    records.push(TransactionRecord::new("no-category", day(3)).with_embedding(emb(&[1.0, 0.0, 0.0])));
    records.push(categorised("blank", &[1.0, 0.0, 0.0], "  "));

    let references = reference_set(&records);
    assert_eq!(references.len(), 7);
    assert!(references.iter().all(|r| !r.category.trim().is_empty()));
}

#[test]
fn missing_embedding_fails_without_touching_records() {
    let references = reference_set(&history());
    let classifier = Classifier::new(ClassifierConfig::default()).expect("valid config");
    let mut queue = vec![
        pending("ok", &[0.9, 0.1, 0.1]),
        TransactionRecord::new("bare", day(4)),
    ];

    let err = classify_transactions(&classifier, &mut queue, &references).expect_err("missing");
    assert_eq!(
        err,
        PipelineError::Ingest(IngestError::MissingField {
            id: "bare".into(),
            field: "embedding",
        })
    );
    assert!(queue[0].category.is_none());
}

#[test]
fn dimension_mismatch_is_reported_and_nothing_is_written() {
    let mut records = history();
    records.push(categorised("legacy", &[1.0, 0.0], "groceries"));
    let references = reference_set(&records);
    let classifier = Classifier::new(ClassifierConfig::default()).expect("valid config");
    let mut queue = vec![pending("q", &[0.9, 0.1, 0.1])];

    let err = classify_transactions(&classifier, &mut queue, &references).expect_err("mismatch");
    match err {
        PipelineError::Classify {
            transaction_id,
            error:
                MatchError::Index(IndexError::DimensionMismatch {
                    id,
                    expected,
                    found,
                }),
        } => {
            assert_eq!(transaction_id, "q");
            assert_eq!(id, "legacy");
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(queue[0].category.is_none());
}

#[test]
fn stale_pending_embedding_names_the_pending_transaction() {
    let references = reference_set(&history());
    let classifier = Classifier::new(ClassifierConfig::default()).expect("valid config");
    let mut queue = vec![
        pending("fresh", &[0.9, 0.1, 0.1]),
        pending("stale", &[0.9, 0.1]),
    ];

    let err = classify_transactions(&classifier, &mut queue, &references).expect_err("mismatch");
    match &err {
        PipelineError::Classify {
            transaction_id,
            error: MatchError::Index(IndexError::DimensionMismatch { expected, found, .. }),
        } => {
            assert_eq!(transaction_id, "stale");
            assert_eq!(*expected, 2);
            assert_eq!(*found, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("transaction stale"));
    assert!(queue.iter().all(|r| r.category.is_none()));
}

#[tokio::test]
async fn statement_to_reports_with_stub_embedder() {
    let raw = r#"```json
{"transactions": [
  {"date": "2024-04-01", "description": "TESCO STORES", "amount": 23.4, "balance_after": 976.6, "type": "debit"},
  {"date": "2024-04-02", "description": "VUE CINEMA", "amount": 12.0, "balance_after": 964.6, "type": "debit"},
  {"date": "2024-04-03", "description": "ACME SALARY", "amount": 2500.0, "balance_after": 3464.6, "type": "credit"}
]}
```"#;
    let mut parsed = parse_statement(raw, &IngestConfig::default()).expect("parse");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].kind, Some(TransactionKind::Debit));
    assert_eq!(parsed[0].amount, Some(-23.4));

    let embedder = StubEmbedder::new(32);
    let mut history: Vec<TransactionRecord> = parsed
        .drain(..2)
        .zip(["groceries", "entertainment"])
        .map(|(record, category)| record.with_category(category))
        .collect();
    assert_eq!(embed_missing(&embedder, &mut history).await.expect("embed"), 2);
    assert_eq!(embed_missing(&embedder, &mut history).await.expect("embed"), 0);

    let mut queue = parsed;
    embed_transaction(&embedder, &mut queue[0]).await.expect("embed");
    assert_eq!(queue[0].embedding.as_ref().map(EmbeddingVector::dim), Some(32));

    let classifier = Classifier::new(ClassifierConfig::new(2, 0.0)).expect("valid config");
    let reports =
        classify_transactions(&classifier, &mut queue, &reference_set(&history)).expect("classify");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].neighbors.len(), 2);
    assert_eq!(
        queue[0].category.as_deref(),
        reports[0].decision.category()
    );
}

#[test]
fn embedding_text_matches_stored_shape() {
    let record = TransactionRecord::new("t", day(5))
        .with_description("VUE CINEMA")
        .with_category("entertainment")
        .with_kind(TransactionKind::Debit)
        .with_amount(-12.0);
    assert_eq!(
        embedding_text(&record),
        "VUE CINEMA entertainment debit -12.000000"
    );
}
