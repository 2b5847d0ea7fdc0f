use criterion::{criterion_group, criterion_main, Criterion};
use search_core::{Corpus, Document, SearchEngine};

const WORDS: &[&str] = &[
    "climate", "ocean", "carbon", "policy", "heat", "ice", "storm", "model", "energy", "forest",
    "emission", "sea", "rain", "drought", "solar", "wind", "tax", "city", "river", "soil",
];

fn synthetic_corpus(n_docs: u32) -> Corpus {
    let mut corpus = Corpus::new("bench");
    for id in 0..n_docs {
        let text: Vec<&str> = (0..60).map(|i| WORDS[((id * 7 + i * 13) % WORDS.len() as u32) as usize]).collect();
        let body = format!("{} doc{id}", text.join(" "));
        corpus.add_document(id, Document::from_source("generic", format!("title {id}"), "bench", "2024-01-01", "", body));
    }
    corpus
}

fn bench_engine(c: &mut Criterion) {
    let corpus = synthetic_corpus(2_000);
    c.bench_function("build_2000_docs", |b| b.iter(|| SearchEngine::build(&corpus)));
    let engine = SearchEngine::build(&corpus);
    c.bench_function("search_2000_docs", |b| b.iter(|| engine.search("ocean heat drought", 10)));
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
