use search_core::tokenizer::{normalize, normalized_tokens, tokenize};

#[test]
fn it_normalizes_documents_and_queries_alike() {
    let doc = normalize("Climate\nCHANGE: it's   real!");
    let query = normalize("  climate change its REAL ");
    assert_eq!(doc, "climate change its real");
    assert_eq!(doc, query);
}

#[test]
fn it_keeps_unicode_letters_and_digits() {
    let toks = normalized_tokens("Café 2024, naïve—résumé");
    assert_eq!(toks, vec!["café", "2024", "naïverésumé"]);
}

#[test]
fn it_does_not_stem_or_drop_stopwords() {
    let toks = tokenize(&normalize("The runners are running"));
    assert_eq!(toks, vec!["the", "runners", "are", "running"]);
}

#[test]
fn it_is_deterministic() {
    let text = "Some text, with... punctuation!\n\nAnd lines.";
    assert_eq!(normalized_tokens(text), normalized_tokens(text));
}
