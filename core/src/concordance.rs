//! Keyword-in-context and literal substring lookups over raw document text.
//! Neither touches the vocabulary or the matrices.

use crate::{Corpus, DocId, Document};
use regex::RegexBuilder;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KwicLine {
    pub doc_id: DocId,
    pub left: String,
    pub matched: String,
    pub right: String,
}

/// Every case-insensitive whole-word occurrence of `keyword`, with up to `window`
/// characters of context on each side. Whitespace next to the match is skipped
/// before clipping. Documents are visited in corpus order.
pub fn concordance(corpus: &Corpus, keyword: &str, window: usize) -> Vec<KwicLine> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    let pattern = match RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::warn!(keyword, error = %err, "concordance pattern rejected");
            return Vec::new();
        }
    };

    let mut lines = Vec::new();
    for (doc_id, doc) in corpus.iter() {
        let text = doc.text();
        for m in pattern.find_iter(text) {
            lines.push(KwicLine {
                doc_id,
                left: last_chars(text[..m.start()].trim_end(), window).to_string(),
                matched: m.as_str().to_string(),
                right: first_chars(text[m.end()..].trim_start(), window).to_string(),
            });
        }
    }
    lines
}

/// Documents whose title or body contains `query`, ignoring case, in corpus order.
pub fn substring_search<'c>(corpus: &'c Corpus, query: &str) -> Vec<(DocId, &'c Document)> {
    let needle = query.to_lowercase();
    corpus
        .iter()
        .filter(|(_, doc)| {
            doc.title().to_lowercase().contains(&needle) || doc.text().to_lowercase().contains(&needle)
        })
        .collect()
}

fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((i, _)) => &s[i..],
        None => s,
    }
}
