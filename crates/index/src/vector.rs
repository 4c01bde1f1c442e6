//! Data contracts shared by the search and decision layers.
//!
//! ```text
//! EmbeddingVector      Vec<f64>, fixed dimension D per embedding model
//! LabeledTransaction   (id, EmbeddingVector, category)   reference item
//! Neighbor             (id, similarity, category)        search output
//! ```
//!
//! Embeddings travel to and from storage as a JSON array of doubles; see
//! [`EmbeddingVector::from_json`] and [`EmbeddingVector::to_json`].
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::IndexError;

/// Dense embedding produced by the external embedding service.
///
/// Entries are always finite: every constructor, deserialization included,
/// goes through [`EmbeddingVector::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    /// Wrap raw values, rejecting NaN and infinities.
    pub fn new(values: Vec<f64>) -> Result<Self, IndexError> {
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(IndexError::InvalidArgument(format!(
                "embedding entry {pos} is not a finite number"
            )));
        }
        Ok(Self(values))
    }

    /// Parse the serialized form stored alongside a transaction.
    pub fn from_json(raw: &str) -> Result<Self, IndexError> {
        let values: Vec<f64> = serde_json::from_str(raw)
            .map_err(|e| IndexError::InvalidArgument(format!("malformed embedding JSON: {e}")))?;
        Self::new(values)
    }

    /// Serialize to the JSON array representation used by storage.
    pub fn to_json(&self) -> String {
        // A Vec<f64> of finite values cannot fail to serialize.
        serde_json::to_string(&self.0).unwrap_or_else(|_| String::from("[]"))
    }

    /// Dimensionality D.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub(crate) fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(self.0.as_slice())
    }

    /// Euclidean norm, computed on the max-abs rescaled vector so tiny or
    /// huge entries neither underflow nor overflow.
    pub fn magnitude(&self) -> f64 {
        let scale = self.max_abs();
        if scale == 0.0 {
            return 0.0;
        }
        let scaled = self.view().mapv(|x| x / scale);
        scale * scaled.dot(&scaled).sqrt()
    }

    /// Unit vector in the same direction; `None` for the zero vector.
    pub(crate) fn direction(&self) -> Option<Array1<f64>> {
        let scale = self.max_abs();
        if scale == 0.0 {
            return None;
        }
        let mut scaled = self.view().mapv(|x| x / scale);
        // Largest entry is now +-1, so the norm lies in [1, sqrt(D)].
        let norm = scaled.dot(&scaled).sqrt();
        scaled.mapv_inplace(|x| x / norm);
        Some(scaled)
    }

    fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }
}

impl TryFrom<Vec<f64>> for EmbeddingVector {
    type Error = IndexError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<EmbeddingVector> for Vec<f64> {
    fn from(value: EmbeddingVector) -> Self {
        value.0
    }
}

impl TryFrom<Vec<f32>> for EmbeddingVector {
    type Error = IndexError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::new(values.into_iter().map(f64::from).collect())
    }
}

/// An already-categorised transaction available as a reference item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLabeledTransaction")]
pub struct LabeledTransaction {
    /// Opaque identity, carried through to [`Neighbor::id`] for traceability.
    pub id: String,
    pub embedding: EmbeddingVector,
    /// Spending category; never empty.
    pub category: String,
}

impl LabeledTransaction {
    /// Build a reference item, rejecting blank category labels.
    pub fn new(
        id: impl Into<String>,
        embedding: EmbeddingVector,
        category: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let id = id.into();
        let category = category.into();
        if category.trim().is_empty() {
            return Err(IndexError::InvalidArgument(format!(
                "reference {id} has an empty category label"
            )));
        }
        Ok(Self {
            id,
            embedding,
            category,
        })
    }
}

#[derive(Deserialize)]
struct RawLabeledTransaction {
    id: String,
    embedding: EmbeddingVector,
    category: String,
}

impl TryFrom<RawLabeledTransaction> for LabeledTransaction {
    type Error = IndexError;

    fn try_from(raw: RawLabeledTransaction) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.embedding, raw.category)
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Identity of the matched reference.
    pub id: String,
    /// Cosine similarity in [-1.0, 1.0].
    pub similarity: f64,
    /// Category of the matched reference.
    pub category: String,
}

impl Neighbor {
    pub fn new(id: impl Into<String>, similarity: f64, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            similarity,
            category: category.into(),
        }
    }
}
