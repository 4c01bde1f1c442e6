use std::error::Error;

use index::{find_nearest, EmbeddingVector, LabeledTransaction};

fn main() -> Result<(), Box<dyn Error>> {
    // Three already-categorised transactions with toy 4-d embeddings.
    let references = vec![
        LabeledTransaction::new(
            "tx-1",
            EmbeddingVector::new(vec![0.9, 0.1, 0.0, 0.2])?,
            "supermercado",
        )?,
        LabeledTransaction::new(
            "tx-2",
            EmbeddingVector::new(vec![0.1, 0.8, 0.3, 0.0])?,
            "salidas",
        )?,
        LabeledTransaction::new(
            "tx-3",
            EmbeddingVector::from_json("[0.85, 0.05, 0.1, 0.25]")?,
            "supermercado",
        )?,
    ];

    let query = EmbeddingVector::new(vec![0.88, 0.12, 0.05, 0.2])?;
    for neighbor in find_nearest(&query, &references, 2)? {
        println!(
            "{} {:.4} {}",
            neighbor.id, neighbor.similarity, neighbor.category
        );
    }

    Ok(())
}
