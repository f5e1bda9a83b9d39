#[cfg(test)]
mod tests;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::tfidf::TermVector;

/// Similarity between two distinct input documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityPair {
    /// Id of the document that appears first in the input
    pub a_id: String,
    /// Id of the document that appears later in the input
    pub b_id: String,
    /// Cosine similarity in `[0.0, 1.0]`
    pub score: f64,
}

impl SimilarityPair {
    #[inline]
    pub fn involves(&self, id: &str) -> bool {
        self.a_id == id || self.b_id == id
    }

    /// True when this pair joins `a` and `b` in either orientation
    #[inline]
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.a_id == a && self.b_id == b) || (self.a_id == b && self.b_id == a)
    }

    /// Both ids, lexically smaller first
    #[inline]
    pub fn sorted_ids(&self) -> (&str, &str) {
        if self.a_id <= self.b_id {
            (&self.a_id, &self.b_id)
        } else {
            (&self.b_id, &self.a_id)
        }
    }
}

/// Cosine similarity of two sparse vectors.
///
/// A zero-magnitude vector on either side scores 0.0. The result is clamped
/// to `[0.0, 1.0]` so rounding never reports more than identical.
#[inline]
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }

    let score = a.dot(b) / denominator;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Score every unordered pair `(i, j)` with `i < j`
#[inline]
pub fn score_pairs(ids: &[&str], vectors: &[TermVector]) -> Vec<SimilarityPair> {
    ids.iter()
        .zip(vectors)
        .tuple_combinations()
        .map(|((a_id, a), (b_id, b))| SimilarityPair {
            a_id: (*a_id).to_string(),
            b_id: (*b_id).to_string(),
            score: cosine_similarity(a, b),
        })
        .collect()
}

/// Ranking order: score descending, then the sorted id pair ascending.
///
/// Ties never depend on which document came first in the input.
#[inline]
pub fn compare_pairs(left: &SimilarityPair, right: &SimilarityPair) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.sorted_ids().cmp(&right.sorted_ids()))
}

#[inline]
pub fn rank_pairs(pairs: &mut [SimilarityPair]) {
    pairs.sort_by(compare_pairs);
}
