//! Term-frequency and TF-IDF matrices over a fixed document row order.

use crate::matrix::CsrMatrix;
use crate::tokenizer::normalized_tokens;
use crate::{Corpus, DocId, Document, IdfMode, Vocabulary};
use std::collections::HashMap;

/// Row order shared by the TF and TF-IDF matrices: document ids ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocOrder {
    ids: Vec<DocId>,
}

impl DocOrder {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut ids: Vec<DocId> = corpus.iter().map(|(id, _)| id).collect();
        ids.sort_unstable();
        Self { ids }
    }

    pub fn ids(&self) -> &[DocId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id_at(&self, row: usize) -> Option<DocId> {
        self.ids.get(row).copied()
    }

    pub fn row_of(&self, id: DocId) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }
}

/// Documents paired with their ids, ascending by id.
pub fn documents_in_order(corpus: &Corpus) -> Vec<(DocId, &Document)> {
    let mut docs: Vec<_> = corpus.iter().collect();
    docs.sort_unstable_by_key(|(id, _)| *id);
    docs
}

/// Raw term counts, one row per document in ascending id order.
pub fn build_tf(corpus: &Corpus, vocabulary: &Vocabulary) -> (DocOrder, CsrMatrix<u32>) {
    let docs = documents_in_order(corpus);
    let tokens: Vec<Vec<String>> = docs.iter().map(|(_, doc)| normalized_tokens(doc.text())).collect();
    let order = DocOrder { ids: docs.iter().map(|(id, _)| *id).collect() };
    (order, tf_from_tokens(&tokens, vocabulary))
}

/// TF matrix from pre-tokenized rows. Tokens outside the vocabulary are skipped.
pub fn tf_from_tokens(rows: &[Vec<String>], vocabulary: &Vocabulary) -> CsrMatrix<u32> {
    CsrMatrix::from_rows(
        vocabulary.len(),
        rows.iter().map(|tokens| {
            let mut counts: HashMap<usize, u32> = HashMap::new();
            for token in tokens {
                if let Some(col) = vocabulary.index_of(token) {
                    *counts.entry(col).or_insert(0) += 1;
                }
            }
            counts.into_iter().collect::<Vec<_>>()
        }),
    )
}

/// IDF of one term. A zero document frequency (or empty corpus) yields 0.
pub fn idf(n_docs: usize, df: u32, mode: IdfMode) -> f64 {
    if df == 0 || n_docs == 0 {
        return 0.0;
    }
    let ratio = n_docs as f64 / f64::from(df);
    match mode {
        IdfMode::Standard => ratio.ln(),
        IdfMode::Smoothed => (1.0 + ratio).ln(),
    }
}

/// IDF for every vocabulary term, indexed by column.
pub fn idf_vector(vocabulary: &Vocabulary, n_docs: usize, mode: IdfMode) -> Vec<f64> {
    let mut out = vec![0.0; vocabulary.len()];
    for (_, stats) in vocabulary.iter() {
        out[stats.index] = idf(n_docs, stats.document_frequency, mode);
    }
    out
}

/// `raw_count * idf(term)` for every stored TF entry; same shape and ordering as `tf`.
pub fn build_tfidf(tf: &CsrMatrix<u32>, idf: &[f64]) -> CsrMatrix<f64> {
    tf.map_values(|col, count| f64::from(count) * idf.get(col).copied().unwrap_or(0.0))
}
