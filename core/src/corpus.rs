use crate::{DocId, Document};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An author and the ids of the documents they wrote. Documents stay owned by the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    name: String,
    documents: Vec<DocId>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), documents: Vec::new() }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn ndoc(&self) -> usize { self.documents.len() }

    pub fn document_ids(&self) -> &[DocId] { &self.documents }

    /// The author's documents, resolved through the corpus that owns them.
    pub fn productions<'c>(&'c self, corpus: &'c Corpus) -> impl Iterator<Item = (DocId, &'c Document)> + 'c {
        self.documents
            .iter()
            .filter_map(move |id| corpus.get(*id).map(|doc| (*id, doc)))
    }

    /// Mean body length in characters, 0 when the author owns nothing.
    pub fn average_document_size(&self, corpus: &Corpus) -> f64 {
        if self.documents.is_empty() {
            return 0.0;
        }
        let total: usize = self.productions(corpus).map(|(_, doc)| doc.text_len()).sum();
        total as f64 / self.documents.len() as f64
    }

    fn add(&mut self, id: DocId) {
        if !self.documents.contains(&id) {
            self.documents.push(id);
        }
    }

    fn remove(&mut self, id: DocId) {
        self.documents.retain(|d| *d != id);
    }
}

/// Append-only document collection keyed by id, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    name: String,
    documents: IndexMap<DocId, Document>,
    authors: IndexMap<String, Author>,
}

impl Corpus {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Append a document. Reusing an id replaces the stored document in place and
    /// returns the previous one.
    pub fn add_document(&mut self, id: DocId, document: Document) -> Option<Document> {
        let author = document.author().to_string();
        let previous = self.documents.insert(id, document);
        if let Some(prev) = &previous {
            if prev.author() != author {
                if let Some(old) = self.authors.get_mut(prev.author()) {
                    old.remove(id);
                }
            }
        }
        self.authors
            .entry(author.clone())
            .or_insert_with(|| Author::new(author))
            .add(id);
        previous
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Mutable access for the variant-specific setters. Shared fields have no setters.
    pub fn get_mut(&mut self, id: DocId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents.iter().map(|(id, doc)| (*id, doc))
    }

    pub fn ndoc(&self) -> usize { self.documents.len() }

    pub fn naut(&self) -> usize { self.authors.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    pub fn author(&self, name: &str) -> Option<&Author> {
        self.authors.get(name)
    }

    /// Smallest id greater than every id in use.
    pub fn next_id(&self) -> DocId {
        self.documents.keys().max().map_or(0, |id| id + 1)
    }

    /// Newest first; same-day documents by ascending id.
    pub fn sorted_by_date(&self, n: usize) -> Vec<(DocId, &Document)> {
        let mut docs: Vec<_> = self.iter().collect();
        docs.sort_by(|a, b| b.1.date().cmp(&a.1.date()).then(a.0.cmp(&b.0)));
        docs.truncate(n);
        docs
    }

    /// Case-insensitive title order; equal titles by ascending id.
    pub fn sorted_by_title(&self, n: usize) -> Vec<(DocId, &Document)> {
        let mut docs: Vec<_> = self.iter().collect();
        docs.sort_by_cached_key(|(id, doc)| (doc.title().to_lowercase(), *id));
        docs.truncate(n);
        docs
    }

    /// Copy of the corpus without documents shorter than `min_chars` characters.
    pub fn filtered_by_length(&self, min_chars: usize) -> Corpus {
        let mut out = Corpus::new(self.name.clone());
        for (id, doc) in self.iter().filter(|(_, doc)| doc.text_len() >= min_chars) {
            out.add_document(id, doc.clone());
        }
        out
    }

    /// All bodies joined by single spaces, in insertion order.
    pub fn joined_text(&self) -> String {
        self.iter().map(|(_, doc)| doc.text()).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Corpus '{}', {} document(s), {} author(s)>", self.name, self.ndoc(), self.naut())
    }
}
