//! Dense-vector similarity index over object labels (spec §4.3).
//!
//! Labels are embedded with a deterministic feature-hashing scheme rather
//! than a learned model: each character trigram of the label hashes into one
//! of `dims` buckets, the resulting vector is L2-normalized, and k-NN ranks
//! candidates by inner product. This keeps the index reproducible across
//! runs and free of an external model dependency while preserving the
//! "nearest labels share surface form" behavior `near` queries rely on.

use crate::label::Label;
use crate::triple::Triple;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug)]
pub struct SimilarityIndex {
    dims: usize,
    vectors: Vec<Vec<f32>>,
}

impl SimilarityIndex {
    pub fn new(dims: usize) -> Self {
        SimilarityIndex {
            dims,
            vectors: Vec::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Encodes `label` and appends it; the new vector's ordinal position must
    /// match the ordinal position of the triple being added to the log.
    pub fn push(&mut self, label: &Label) {
        self.vectors.push(self.encode(label));
    }

    pub fn encode(&self, label: &Label) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dims];
        let chars: Vec<char> = label.as_str().chars().collect();
        if chars.is_empty() {
            return vector;
        }

        let trigram_len = 3usize.min(chars.len());
        for window in chars.windows(trigram_len) {
            let gram: String = window.iter().collect();
            let mut hasher = DefaultHasher::new();
            gram.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dims;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vector.iter_mut() {
                *x /= norm;
            }
        }
        vector
    }

    /// Returns the `k` labels, from `triple_log`'s objects, whose vectors
    /// have the greatest inner product with `query`'s encoding.
    pub fn knn(&self, query: &Label, k: usize, triple_log: &[Triple]) -> Vec<Label> {
        let query_vec = self.encode(query);
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx, dot(&query_vec, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .filter_map(|(idx, _)| triple_log.get(idx).map(|t| t.object.clone()))
            .collect()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_stay_in_lockstep_with_pushes() {
        let mut idx = SimilarityIndex::new(16);
        idx.push(&Label::from("coffee"));
        idx.push(&Label::from("tea"));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn knn_prefers_identical_labels() {
        let mut idx = SimilarityIndex::new(64);
        let log = vec![
            Triple::new(Label::from("james"), Label::from("likes"), Label::from("coffee")),
            Triple::new(Label::from("anna"), Label::from("likes"), Label::from("tea")),
        ];
        idx.push(&Label::from("coffee"));
        idx.push(&Label::from("tea"));

        let results = idx.knn(&Label::from("coffee"), 1, &log);
        assert_eq!(results, vec![Label::from("coffee")]);
    }
}
