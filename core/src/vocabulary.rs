use crate::tokenizer::normalized_tokens;
use crate::Corpus;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Per-term statistics gathered over a corpus snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermStats {
    /// Dense column index, assigned in ascending lexicographic term order.
    pub index: usize,
    /// Occurrences across every document.
    pub total_occurrences: u64,
    /// Documents containing the term at least once.
    pub document_frequency: u32,
}

/// Distinct normalized terms of a corpus. Iteration order equals index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: IndexMap<String, TermStats>,
}

impl Vocabulary {
    pub fn build(corpus: &Corpus) -> Self {
        let rows: Vec<Vec<String>> = corpus.iter().map(|(_, doc)| normalized_tokens(doc.text())).collect();
        Self::from_token_rows(rows.iter().map(Vec::as_slice))
    }

    /// Build from already tokenized documents, one token slice per document.
    pub fn from_token_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        // term -> (total occurrences, document frequency)
        let mut counts: HashMap<&'a str, (u64, u32)> = HashMap::new();
        for row in rows {
            let mut seen: HashSet<&'a str> = HashSet::new();
            for token in row {
                let entry = counts.entry(token.as_str()).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(token.as_str()) {
                    entry.1 += 1;
                }
            }
        }

        let mut distinct: Vec<&'a str> = counts.keys().copied().collect();
        distinct.sort_unstable();

        let terms = distinct
            .into_iter()
            .enumerate()
            .map(|(index, term)| {
                let (total_occurrences, document_frequency) = counts[term];
                (term.to_string(), TermStats { index, total_occurrences, document_frequency })
            })
            .collect();
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&TermStats> {
        self.terms.get(term)
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|(term, _)| term.as_str())
    }

    /// `(term, stats)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermStats)> {
        self.terms.iter().map(|(term, stats)| (term.as_str(), stats))
    }
}
