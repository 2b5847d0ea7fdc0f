use crate::tokenizer::normalized_tokens;
use crate::Vocabulary;

/// Dense raw-count vector of a query over the vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    weights: Vec<f64>,
    matched: usize,
}

impl QueryVector {
    /// Tokens absent from the vocabulary are ignored.
    pub fn from_query(query: &str, vocabulary: &Vocabulary) -> Self {
        let mut weights = vec![0.0; vocabulary.len()];
        let mut matched = 0;
        for token in normalized_tokens(query) {
            if let Some(index) = vocabulary.index_of(&token) {
                weights[index] += 1.0;
                matched += 1;
            }
        }
        Self { weights, matched }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Query tokens that hit the vocabulary, repeats included.
    pub fn matched_terms(&self) -> usize {
        self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }

    pub fn norm(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// L2-normalized copy, `None` for a zero vector.
    pub fn normalized(&self) -> Option<Vec<f64>> {
        let norm = self.norm();
        if norm == 0.0 {
            return None;
        }
        Some(self.weights.iter().map(|w| w / norm).collect())
    }
}
