use hashbrown::HashMap;
use index::Neighbor;

use crate::types::{AbstainReason, ClassificationDecision};

/// Turn a ranked neighbourhood into a category decision.
///
/// The winning category is the one with the most votes; ties go to the
/// category whose first representative ranks highest. The decision is only
/// accepted when the mean similarity of *all* neighbours reaches
/// `min_average_similarity`. A non-finite average, or a NaN floor, is
/// treated as low confidence.
pub fn decide(neighbors: &[Neighbor], min_average_similarity: f64) -> ClassificationDecision {
    if neighbors.is_empty() {
        return ClassificationDecision::abstained(AbstainReason::NoNeighbors, 0.0);
    }

    let sum: f64 = neighbors.iter().map(|n| n.similarity).sum();
    let average = sum / neighbors.len() as f64;

    // Votes in first-seen (rank) order; the map only locates a category's slot.
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(neighbors.len());
    let mut votes: Vec<(&str, usize)> = Vec::with_capacity(neighbors.len());
    for n in neighbors {
        let category = n.category.as_str();
        match slots.get(category).copied() {
            Some(slot) => votes[slot].1 += 1,
            None => {
                slots.insert(category, votes.len());
                votes.push((category, 1));
            }
        }
    }

    let mut best = votes[0];
    for &candidate in &votes[1..] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }

    if !average.is_finite()
        || min_average_similarity.is_nan()
        || average < min_average_similarity
    {
        return ClassificationDecision::abstained(AbstainReason::LowConfidence, average);
    }
    ClassificationDecision::accepted(best.0.to_string(), average)
}
