use crate::matrix::CsrMatrix;
use crate::query::QueryVector;
use crate::rank;
use crate::tokenizer::normalized_tokens;
use crate::weighting::{self, DocOrder};
use crate::{Corpus, DocId, EngineConfig, Vocabulary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    pub author: String,
    pub score: f64,
}

/// Title and author captured per row at build time.
#[derive(Debug, Clone, PartialEq)]
struct RowMeta {
    title: String,
    author: String,
}

/// Immutable TF-IDF index over a corpus snapshot.
///
/// Everything is computed once in [`SearchEngine::build`]. Documents added to the corpus
/// afterwards are invisible until a new engine is built.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEngine {
    config: EngineConfig,
    vocabulary: Vocabulary,
    order: DocOrder,
    rows: Vec<RowMeta>,
    tf: CsrMatrix<u32>,
    idf: Vec<f64>,
    tfidf: CsrMatrix<f64>,
    row_norms: Vec<f64>,
}

impl SearchEngine {
    pub fn build(corpus: &Corpus) -> Self {
        Self::build_with(corpus, EngineConfig::default())
    }

    pub fn build_with(corpus: &Corpus, config: EngineConfig) -> Self {
        let docs = weighting::documents_in_order(corpus);
        let tokens: Vec<Vec<String>> = docs.iter().map(|(_, doc)| normalized_tokens(doc.text())).collect();

        let vocabulary = Vocabulary::from_token_rows(tokens.iter().map(Vec::as_slice));
        let tf = weighting::tf_from_tokens(&tokens, &vocabulary);
        let idf = weighting::idf_vector(&vocabulary, docs.len(), config.idf);
        let tfidf = weighting::build_tfidf(&tf, &idf);
        let row_norms: Vec<f64> = (0..docs.len()).map(|r| tfidf.row_norm(r)).collect();

        let order = DocOrder::from_corpus(corpus);
        let rows = docs
            .iter()
            .map(|(_, doc)| RowMeta { title: doc.title().to_string(), author: doc.author().to_string() })
            .collect();

        tracing::info!(
            num_docs = docs.len(),
            num_terms = vocabulary.len(),
            nnz = tf.nnz(),
            idf = ?config.idf,
            "search engine built"
        );

        Self { config, vocabulary, order, rows, tf, idf, tfidf, row_norms }
    }

    /// At most `k` hits by descending cosine score, ties by ascending document id.
    /// Queries sharing no term with the vocabulary return nothing.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        let vector = QueryVector::from_query(query, &self.vocabulary);
        let ranked = rank::cosine_rank(&self.tfidf, &self.row_norms, &vector, k);
        let hits: Vec<SearchHit> = ranked
            .into_iter()
            .filter_map(|scored| {
                let doc_id = self.order.id_at(scored.row)?;
                let meta = self.rows.get(scored.row)?;
                Some(SearchHit {
                    doc_id,
                    title: meta.title.clone(),
                    author: meta.author.clone(),
                    score: scored.score,
                })
            })
            .collect();
        tracing::debug!(query, matched_terms = vector.matched_terms(), hits = hits.len(), "search");
        hits
    }

    /// `search` with the configured default `k`.
    pub fn search_default(&self, query: &str) -> Vec<SearchHit> {
        self.search(query, self.config.default_k)
    }

    /// Documents with a strictly positive score for `query`.
    pub fn count_matches(&self, query: &str) -> usize {
        let vector = QueryVector::from_query(query, &self.vocabulary);
        rank::cosine_scores(&self.tfidf, &self.row_norms, &vector)
            .map_or(0, |scores| scores.iter().filter(|s| **s > 0.0).count())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn doc_order(&self) -> &DocOrder {
        &self.order
    }

    pub fn tf(&self) -> &CsrMatrix<u32> {
        &self.tf
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn tfidf(&self) -> &CsrMatrix<f64> {
        &self.tfidf
    }

    pub fn document_count(&self) -> usize {
        self.order.len()
    }
}
