use crate::{Corpus, DocId, SearchEngine, Vocabulary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub occurrences: u64,
    pub document_frequency: u32,
}

/// Vocabulary-level statistics of a built engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub vocabulary_size: usize,
    pub document_count: usize,
    /// Sorted by occurrences descending, then term ascending.
    pub terms: Vec<TermFrequency>,
}

impl CorpusStats {
    pub fn compute(engine: &SearchEngine) -> Self {
        Self::from_vocabulary(engine.vocabulary(), engine.document_count())
    }

    pub fn from_vocabulary(vocabulary: &Vocabulary, document_count: usize) -> Self {
        let mut terms: Vec<TermFrequency> = vocabulary
            .iter()
            .map(|(term, stats)| TermFrequency {
                term: term.to_string(),
                occurrences: stats.total_occurrences,
                document_frequency: stats.document_frequency,
            })
            .collect();
        terms.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.term.cmp(&b.term)));
        Self { vocabulary_size: vocabulary.len(), document_count, terms }
    }

    pub fn term_table(&self) -> &[TermFrequency] {
        &self.terms
    }

    pub fn top_terms(&self, n: usize) -> &[TermFrequency] {
        &self.terms[..n.min(self.terms.len())]
    }
}

/// Mean body length in characters of an author's documents. `None` for an unknown author.
pub fn author_average_size(corpus: &Corpus, name: &str) -> Option<f64> {
    corpus.author(name).map(|author| author.average_document_size(corpus))
}

/// Rough size figures for one document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLength {
    pub doc_id: DocId,
    pub characters: usize,
    /// Whitespace-separated words.
    pub words: usize,
    /// Pieces between full stops, empty tail included.
    pub sentences: usize,
}

pub fn document_lengths(corpus: &Corpus) -> Vec<DocumentLength> {
    corpus
        .iter()
        .map(|(doc_id, doc)| DocumentLength {
            doc_id,
            characters: doc.text_len(),
            words: doc.text().split_whitespace().count(),
            sentences: doc.text().split('.').count(),
        })
        .collect()
}
