use crate::types::TransactionRecord;

/// Text sent to the embedding service for a record.
///
/// Layout is `"<description> <category> <type> <amount>"`, with absent
/// fields rendered empty and the amount printed with six decimals. The
/// separators are always present so positions stay stable across records.
pub fn embedding_text(record: &TransactionRecord) -> String {
    let description = record.description.as_deref().unwrap_or_default();
    let category = record.category.as_deref().unwrap_or_default();
    let kind = record.kind.map(|k| k.as_str()).unwrap_or_default();
    let amount = record
        .amount
        .map(|a| format!("{a:.6}"))
        .unwrap_or_default();
    format!("{description} {category} {kind} {amount}")
}
