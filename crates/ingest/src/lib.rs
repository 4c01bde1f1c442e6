//! # spendcat Ingest (`ingest`)
//!
//! Turns bank-statement data into [`TransactionRecord`]s ready for embedding
//! and classification.
//!
//! - [`parse_statement`]: clean and parse the JSON emitted by the
//!   document-understanding service, normalising debit signs and deriving
//!   deterministic ids.
//! - [`embedding_text`]: the text representation sent to the embedding
//!   service.
//! - [`TransactionRecord::reference_item`]: view a categorised, embedded
//!   record as a classifier reference.
//!
//! ## Example
//!
//! ```
//! use ingest::{embedding_text, parse_statement, IngestConfig, TransactionKind};
//!
//! let raw = "```json\n{\"transactions\": [{\"date\": \"2024-03-14\", \
//!     \"description\": \"TESCO STORES\", \"amount\": 23.4, \"type\": \"debit\"}]}\n```";
//!
//! let records = parse_statement(raw, &IngestConfig::default()).unwrap();
//! assert_eq!(records[0].kind, Some(TransactionKind::Debit));
//! assert_eq!(records[0].amount, Some(-23.4));
//! assert_eq!(embedding_text(&records[0]), "TESCO STORES  debit -23.400000");
//! ```
//!
//! Parsing emits `statement_parsed` / `statement_parse_failure` events through
//! `tracing`.

mod config;
mod error;
mod statement;
mod text;
mod types;

pub use crate::config::IngestConfig;
pub use crate::error::IngestError;
pub use crate::statement::{clean_model_output, parse_statement};
pub use crate::text::embedding_text;
pub use crate::types::{TransactionKind, TransactionRecord};
