use search_core::concordance::concordance;
use search_core::rank::cosine;
use search_core::weighting::build_tf;
use search_core::{Corpus, Document, EngineConfig, SearchEngine, Vocabulary};

fn doc(title: &str, text: &str) -> Document {
    Document::from_source("generic", title, "someone", "2024-05-01", "https://example.org", text)
}

fn cats_and_dogs() -> Corpus {
    let mut corpus = Corpus::new("pets");
    corpus.add_document(0, doc("Cats", "cats are great"));
    corpus.add_document(1, doc("Dogs", "dogs are great too"));
    corpus
}

fn climate_corpus() -> Corpus {
    let mut corpus = Corpus::new("climate");
    let texts = [
        (4, "Climate change drives extreme weather and rising seas."),
        (1, "The ocean absorbs heat; ocean warming affects climate models."),
        (3, "Carbon capture is one tool among many."),
        (0, "Weather today: sunny. Weather tomorrow: rain, rain, rain."),
        (2, "Rising seas threaten coastal cities.\nCities plan sea walls."),
    ];
    for (id, text) in texts {
        corpus.add_document(id, doc(&format!("doc {id}"), text));
    }
    corpus
}

#[test]
fn worked_example_vocabulary_and_weights() {
    let engine = SearchEngine::build(&cats_and_dogs());
    let vocab = engine.vocabulary();
    let terms: Vec<_> = vocab.iter().map(|(t, s)| (t.to_string(), s.index)).collect();
    assert_eq!(
        terms,
        vec![
            ("are".to_string(), 0),
            ("cats".to_string(), 1),
            ("dogs".to_string(), 2),
            ("great".to_string(), 3),
            ("too".to_string(), 4),
        ]
    );

    let tf_row0: Vec<u32> = (0..5).map(|c| engine.tf().get(0, c)).collect();
    assert_eq!(tf_row0, vec![1, 1, 0, 1, 0]);

    let dfs: Vec<u32> = vocab.iter().map(|(_, s)| s.document_frequency).collect();
    assert_eq!(dfs, vec![2, 1, 1, 2, 1]);

    let idf = engine.idf();
    assert_eq!(idf[0], 0.0);
    assert_eq!(idf[3], 0.0);
    assert!((idf[1] - 2f64.ln()).abs() < 1e-12);
    assert!((idf[2] - 2f64.ln()).abs() < 1e-12);
    assert!((idf[4] - 2f64.ln()).abs() < 1e-12);
}

#[test]
fn worked_example_search() {
    let engine = SearchEngine::build(&cats_and_dogs());
    let hits = engine.search("cats", 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, 0);
    assert_eq!(hits[0].title, "Cats");
    assert_eq!(hits[0].author, "someone");
    assert!((hits[0].score - 1.0).abs() < 1e-12);
    assert_eq!(hits[1].doc_id, 1);
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn vocabulary_indices_are_sorted_permutation() {
    let engine = SearchEngine::build(&climate_corpus());
    let vocab = engine.vocabulary();
    let mut indices: Vec<usize> = vocab.iter().map(|(_, s)| s.index).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..vocab.len()).collect::<Vec<_>>());

    let terms: Vec<&str> = vocab.iter().map(|(t, _)| t).collect();
    let mut sorted = terms.clone();
    sorted.sort_unstable();
    assert_eq!(terms, sorted);
    for (i, term) in terms.iter().enumerate() {
        assert_eq!(vocab.term(i), Some(*term));
    }
}

#[test]
fn tf_row_and_column_sums_match_token_counts() {
    let corpus = climate_corpus();
    let engine = SearchEngine::build(&corpus);
    let tf = engine.tf();
    for (row, id) in engine.doc_order().ids().iter().enumerate() {
        let text = corpus.get(*id).unwrap().text();
        let tokens = search_core::tokenizer::normalized_tokens(text);
        assert_eq!(tf.row_sum(row) as usize, tokens.len(), "row {row}");
    }
    let col_sums = tf.column_sums();
    for (_, stats) in engine.vocabulary().iter() {
        assert_eq!(u64::from(col_sums[stats.index]), stats.total_occurrences);
    }
}

#[test]
fn document_frequency_is_bounded() {
    let engine = SearchEngine::build(&climate_corpus());
    let n = engine.document_count() as u32;
    for (term, stats) in engine.vocabulary().iter() {
        assert!(stats.document_frequency >= 1 && stats.document_frequency <= n, "{term}");
    }
}

#[test]
fn tfidf_is_count_times_idf_with_same_shape() {
    let engine = SearchEngine::build(&climate_corpus());
    let (tf, tfidf, idf) = (engine.tf(), engine.tfidf(), engine.idf());
    assert_eq!(tf.shape(), tfidf.shape());
    let (rows, cols) = tf.shape();
    for r in 0..rows {
        for c in 0..cols {
            assert_eq!(tfidf.get(r, c), f64::from(tf.get(r, c)) * idf[c]);
        }
    }
}

#[test]
fn search_is_bounded_sorted_and_tie_broken_by_id() {
    let engine = SearchEngine::build(&climate_corpus());
    for k in [0, 1, 3, 10] {
        let hits = engine.search("rising seas weather", k);
        assert!(hits.len() <= k);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].doc_id < pair[1].doc_id);
            }
        }
        assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.score)));
    }
    let top = engine.search("rising seas", 2);
    let ids: Vec<_> = top.iter().map(|h| h.doc_id).collect();
    assert!(ids.contains(&2) && ids.contains(&4));
}

#[test]
fn query_without_vocabulary_overlap_is_empty() {
    let engine = SearchEngine::build(&climate_corpus());
    assert!(engine.search("zebra xylophone", 10).is_empty());
    assert!(engine.search("", 10).is_empty());
    assert!(engine.search("?!", 10).is_empty());
}

#[test]
fn repeated_query_terms_change_the_query_vector_only() {
    let engine = SearchEngine::build(&climate_corpus());
    let once = engine.search("ocean", 1);
    let twice = engine.search("ocean ocean", 1);
    assert_eq!(once, twice);
}

#[test]
fn construction_is_idempotent() {
    let corpus = climate_corpus();
    assert_eq!(SearchEngine::build(&corpus), SearchEngine::build(&corpus));
    let vocab = Vocabulary::build(&corpus);
    assert_eq!(&vocab, SearchEngine::build(&corpus).vocabulary());
    let (order, tf) = build_tf(&corpus, &vocab);
    assert_eq!(order.ids(), &[0, 1, 2, 3, 4]);
    assert_eq!(&tf, SearchEngine::build(&corpus).tf());
}

#[test]
fn engine_is_a_snapshot() {
    let mut corpus = cats_and_dogs();
    let engine = SearchEngine::build(&corpus);
    corpus.add_document(2, doc("Birds", "birds sing"));
    assert!(corpus.get_mut(0).is_some());
    assert!(engine.search("birds", 5).is_empty());
    assert_eq!(engine.document_count(), 2);
    assert_eq!(SearchEngine::build(&corpus).search("birds", 5)[0].doc_id, 2);
}

#[test]
fn smoothed_idf_is_opt_in() {
    let corpus = cats_and_dogs();
    let standard = SearchEngine::build(&corpus);
    let smoothed = SearchEngine::build_with(&corpus, EngineConfig::default().smoothed(true));
    assert_eq!(standard.idf()[0], 0.0);
    assert!((smoothed.idf()[0] - 2f64.ln()).abs() < 1e-12);
    // "are" now carries weight, so doc1 is no longer orthogonal to "cats are"
    assert!(smoothed.search("cats are", 2)[1].score > 0.0);
}

#[test]
fn cosine_properties() {
    let v = [1.0, 0.0, 2.0];
    assert!((cosine(&v, &v) - 1.0).abs() < 1e-12);
    assert_eq!(cosine(&v, &[0.0, 3.0, 0.0]), 0.0);
}

#[test]
fn concordance_is_independent_of_vocabulary() {
    let corpus = climate_corpus();
    let lines = concordance(&corpus, "Rain", 6);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.doc_id == 0 && l.matched == "rain"));
    assert_eq!(lines[0].left, "orrow:");
    assert_eq!(lines[0].right, ", rain");
}
