//! Brute-force cosine ranking over every TF-IDF row.

use crate::matrix::CsrMatrix;
use crate::query::QueryVector;
use std::cmp::Ordering;

/// A matrix row and its cosine score against a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRow {
    pub row: usize,
    pub score: f64,
}

/// Cosine of two dense vectors; 0 when either has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (x / norm_a) * (y / norm_b)).sum();
    dot.clamp(0.0, 1.0)
}

/// Score of every row, in row order. `None` when the query has zero norm.
/// `row_norms[r]` must be the Euclidean norm of row `r`.
pub fn cosine_scores(matrix: &CsrMatrix<f64>, row_norms: &[f64], query: &QueryVector) -> Option<Vec<f64>> {
    let q = query.normalized()?;
    let scores = (0..matrix.shape().0)
        .map(|r| {
            let norm = row_norms.get(r).copied().unwrap_or(0.0);
            if norm == 0.0 {
                0.0
            } else {
                (matrix.row_dot(r, &q) / norm).clamp(0.0, 1.0)
            }
        })
        .collect();
    Some(scores)
}

/// Top `k` rows by descending score, ties by ascending row.
pub fn cosine_rank(matrix: &CsrMatrix<f64>, row_norms: &[f64], query: &QueryVector, k: usize) -> Vec<ScoredRow> {
    if k == 0 {
        return Vec::new();
    }
    let Some(scores) = cosine_scores(matrix, row_norms, query) else {
        return Vec::new();
    };
    let mut ranked: Vec<ScoredRow> = scores
        .into_iter()
        .enumerate()
        .map(|(row, score)| ScoredRow { row, score })
        .collect();
    ranked.sort_by(compare);
    ranked.truncate(k);
    ranked
}

fn compare(a: &ScoredRow, b: &ScoredRow) -> Ordering {
    b.score.total_cmp(&a.score).then(a.row.cmp(&b.row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vocabulary;

    #[test]
    fn cosine_of_self_is_one() {
        let v = [0.3, 0.0, 2.5, 1.0];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&v, &[0.0; 4]), 0.0);
    }

    #[test]
    fn ties_break_by_row_and_zero_rows_score_zero() {
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        let vocab = Vocabulary::from_token_rows(rows.iter().map(Vec::as_slice));
        let m = CsrMatrix::from_rows(2, vec![vec![(0, 1.0)], vec![], vec![(0, 3.0)], vec![(1, 1.0)]]);
        let norms: Vec<f64> = (0..4).map(|r| m.row_norm(r)).collect();
        let q = QueryVector::from_query("a", &vocab);
        let ranked = cosine_rank(&m, &norms, &q, 10);
        let order: Vec<_> = ranked.iter().map(|s| (s.row, s.score)).collect();
        assert_eq!(order, vec![(0, 1.0), (2, 1.0), (1, 0.0), (3, 0.0)]);
        assert_eq!(cosine_rank(&m, &norms, &q, 1).len(), 1);
        assert!(cosine_rank(&m, &norms, &q, 0).is_empty());
    }
}
