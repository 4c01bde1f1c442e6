use ingest::{embedding_text, parse_statement, IngestConfig};

fn main() {
    let raw = r#"Sure, here is the statement:
```json
{"transactions": [
  {"date": "2024-03-14", "description": "TESCO STORES 2231", "amount": 23.40, "balance_after": 1022.15, "type": "debit"},
  {"date": "2024-03-15", "description": "ACME LTD SALARY", "amount": 2500.00, "balance_after": 3522.15, "type": "credit"},
  {"date": "2024-03-16", "description": "NETFLIX.COM", "amount": 9.99, "balance_after": 3512.16, "type": "debit"}
]}
```"#;

    match parse_statement(raw, &IngestConfig::default()) {
        Ok(records) => {
            for record in &records {
                println!("{}  {:>10?}  {}", record.id, record.amount, embedding_text(record));
            }
        }
        Err(err) => eprintln!("failed to parse statement: {err}"),
    }
}
