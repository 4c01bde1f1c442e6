//! spendcat Semantic
//!
//! Turns transaction text into embeddings. Two producers ship here:
//!
//! - [`HttpEmbedder`] - calls an OpenAI-compatible `/v1/embeddings` endpoint
//!   (`text-embedding-3-small` by default). One request per text, bearer auth,
//!   no retries. If you need backoff, wrap it.
//! - [`StubEmbedder`] - deterministic vectors from a hash of the text. Good for
//!   tests and offline runs, useless for real categorisation.
//!
//! Both implement the async [`Embedder`] trait, so the pipeline doesn't care
//! which one it got. [`embedder_from_config`] picks one from a
//! [`SemanticConfig`].
//!
//! ## Quick example
//!
//! ```
//! use semantic::{embedder_from_config, SemanticConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cfg = SemanticConfig::default().with_mode("stub").with_dimension(Some(8));
//!     let embedder = embedder_from_config(&cfg).unwrap();
//!     let v = embedder.embed("TESCO STORES groceries debit -23.400000").await.unwrap();
//!     assert_eq!(v.dim(), 8);
//! }
//! ```
//!
//! The API key never lives in config files; callers read it from the
//! environment and pass it via [`SemanticConfig::with_api_key`].

mod api;
mod config;
mod embedder;
mod error;
mod normalize;
mod stub;

pub use crate::api::HttpEmbedder;
pub use crate::config::{SemanticConfig, DEFAULT_API_URL, DEFAULT_DIMENSION, DEFAULT_MODEL};
pub use crate::embedder::{embedder_from_config, Embedder};
pub use crate::error::SemanticError;
pub use crate::stub::StubEmbedder;
