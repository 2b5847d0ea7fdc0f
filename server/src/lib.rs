use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderValue, StatusCode}, routing::get, Json, Router};
use search_core::concordance::{concordance, substring_search, KwicLine};
use search_core::config::{DEFAULT_WINDOW, MAX_K};
use search_core::document::format_date;
use search_core::persist::load_path;
use search_core::stats::{author_average_size, CorpusStats, TermFrequency};
use search_core::{Corpus, DocId, Document, EngineConfig, SearchEngine, SearchHit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// Documents with a positive score, before truncation to `k`.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Deserialize)]
pub struct ConcordanceParams {
    pub keyword: String,
    pub window: Option<usize>,
}

#[derive(Deserialize)]
pub struct GrepParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct GrepHit {
    pub doc_id: DocId,
    pub title: String,
}

#[derive(Deserialize)]
pub struct StatsParams {
    pub top: Option<usize>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub vocabulary_size: usize,
    pub document_count: usize,
    pub author_count: usize,
    pub top_terms: Vec<TermFrequency>,
}

#[derive(Serialize)]
pub struct DocumentView {
    pub doc_id: DocId,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub date: String,
    pub url: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coauthors: Option<Vec<String>>,
}

impl DocumentView {
    fn new(doc_id: DocId, doc: &Document) -> Self {
        Self {
            doc_id,
            title: doc.title().to_string(),
            author: doc.author().to_string(),
            kind: doc.kind().tag(),
            date: format_date(doc.date()),
            url: doc.url().to_string(),
            text: doc.text().to_string(),
            comment_count: doc.comment_count(),
            coauthors: doc.coauthors().map(<[String]>::to_vec),
        }
    }
}

#[derive(Serialize)]
pub struct AuthorView {
    pub name: String,
    pub document_count: usize,
    pub average_size: f64,
    pub doc_ids: Vec<DocId>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn not_found(what: String) -> ApiError {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": format!("{what} not found") })))
}

/// Corpus and engine shared read-only by every handler.
#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub engine: Arc<SearchEngine>,
    pub stats: Arc<CorpusStats>,
}

impl AppState {
    pub fn new(corpus: Corpus, config: EngineConfig) -> Self {
        let engine = SearchEngine::build_with(&corpus, config);
        let stats = CorpusStats::compute(&engine);
        Self { corpus: Arc::new(corpus), engine: Arc::new(engine), stats: Arc::new(stats) }
    }
}

pub fn build_app(corpus_path: &str, config: EngineConfig) -> Result<Router> {
    let corpus = load_path(corpus_path)?;
    Ok(router(AppState::new(corpus, config)))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/concordance", get(concordance_handler))
        .route("/grep", get(grep_handler))
        .route("/stats", get(stats_handler))
        .route("/authors/:name", get(author_handler))
        .with_state(state)
        .layer(cors_from_env())
        .layer(TraceLayer::new_for_http())
}

// CORS_ALLOW_ORIGIN is comma-separated; unset or empty allows any origin.
fn cors_from_env() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.engine.config().default_k).min(MAX_K);
    let results = state.engine.search(&params.q, k);
    let total_hits = state.engine.count_matches(&params.q);
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocumentView>, ApiError> {
    state
        .corpus
        .get(doc_id)
        .map(|doc| Json(DocumentView::new(doc_id, doc)))
        .ok_or_else(|| not_found(format!("document {doc_id}")))
}

pub async fn concordance_handler(State(state): State<AppState>, Query(params): Query<ConcordanceParams>) -> Json<Vec<KwicLine>> {
    let window = params.window.unwrap_or(DEFAULT_WINDOW);
    Json(concordance(&state.corpus, &params.keyword, window))
}

pub async fn grep_handler(State(state): State<AppState>, Query(params): Query<GrepParams>) -> Json<Vec<GrepHit>> {
    let hits = substring_search(&state.corpus, &params.q)
        .into_iter()
        .map(|(doc_id, doc)| GrepHit { doc_id, title: doc.title().to_string() })
        .collect();
    Json(hits)
}

pub async fn stats_handler(State(state): State<AppState>, Query(params): Query<StatsParams>) -> Json<StatsResponse> {
    let top = params.top.unwrap_or(10);
    Json(StatsResponse {
        vocabulary_size: state.stats.vocabulary_size,
        document_count: state.stats.document_count,
        author_count: state.corpus.naut(),
        top_terms: state.stats.top_terms(top).to_vec(),
    })
}

pub async fn author_handler(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<AuthorView>, ApiError> {
    let author = state.corpus.author(&name).ok_or_else(|| not_found(format!("author {name:?}")))?;
    Ok(Json(AuthorView {
        name: author.name().to_string(),
        document_count: author.ndoc(),
        average_size: author_average_size(&state.corpus, &name).unwrap_or(0.0),
        doc_ids: author.document_ids().to_vec(),
    }))
}
