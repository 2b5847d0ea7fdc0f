use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use search_core::concordance::{concordance, substring_search};
use search_core::config::{DEFAULT_K, DEFAULT_WINDOW};
use search_core::document::format_date;
use search_core::persist::{load_path, save_csv, save_json, save_snapshot};
use search_core::stats::{author_average_size, document_lengths, CorpusStats};
use search_core::{Corpus, EngineConfig, SearchEngine};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Rank and explore a document corpus with TF-IDF", long_about = None)]
struct Cli {
    /// Corpus file (.json, .jsonl, .csv, .tsv, .bin) or a directory of them
    #[arg(long)]
    corpus: PathBuf,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    /// Print JSON instead of plain text (search, concordance, stats)
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents against a keyword query
    Search {
        query: String,
        /// Number of results
        #[arg(long, default_value_t = DEFAULT_K)]
        k: usize,
    },
    /// Keyword-in-context lines for a literal keyword
    Concordance {
        keyword: String,
        /// Characters of context on each side
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },
    /// Case-insensitive substring match on titles and bodies
    Grep { query: String },
    /// Vocabulary size and most frequent terms
    Stats {
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Also print character, word and sentence counts per document
        #[arg(long, default_value_t = false)]
        lengths: bool,
    },
    /// Documents and average document size of one author
    Author { name: String },
    /// First documents ordered by date (newest first) or title
    List {
        #[arg(long, value_enum, default_value_t = SortKey::Date)]
        by: SortKey,
        #[arg(long, default_value_t = 5)]
        n: usize,
    },
    /// Rewrite the corpus as structured JSON (.json), a table (.csv, .tsv) or a binary snapshot (.bin)
    Convert {
        #[arg(long)]
        output: PathBuf,
        /// Drop documents shorter than this many characters
        #[arg(long, default_value_t = 0)]
        min_chars: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Date,
    Title,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let corpus = load_path(&cli.corpus)?;
    let config = EngineConfig::default().smoothed(cli.smoothed_idf);

    match cli.command {
        Commands::Search { query, k } => run_search(&corpus, config, &query, k, cli.json),
        Commands::Concordance { keyword, window } => run_concordance(&corpus, &keyword, window, cli.json),
        Commands::Grep { query } => {
            for (doc_id, doc) in substring_search(&corpus, &query) {
                println!("[{doc_id}] {doc}");
            }
            Ok(())
        }
        Commands::Stats { top, lengths } => run_stats(&corpus, config, top, lengths, cli.json),
        Commands::Author { name } => run_author(&corpus, &name),
        Commands::List { by, n } => {
            let docs = match by {
                SortKey::Date => corpus.sorted_by_date(n),
                SortKey::Title => corpus.sorted_by_title(n),
            };
            for (i, (doc_id, doc)) in docs.into_iter().enumerate() {
                println!("{}. [{}] {} ({}) #{doc_id}", i + 1, doc.kind().tag(), doc.title(), format_date(doc.date()));
            }
            Ok(())
        }
        Commands::Convert { output, min_chars } => run_convert(&corpus, &output, min_chars),
    }
}

fn run_search(corpus: &Corpus, config: EngineConfig, query: &str, k: usize, json: bool) -> Result<()> {
    let engine = SearchEngine::build_with(corpus, config);
    let hits = engine.search(query, k);
    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("no document matches {query:?}");
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>3}. {:.4}  [{}] {} by {}", rank + 1, hit.score, hit.doc_id, hit.title, hit.author);
    }
    Ok(())
}

fn run_concordance(corpus: &Corpus, keyword: &str, window: usize, json: bool) -> Result<()> {
    let lines = concordance(corpus, keyword, window);
    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }
    for line in &lines {
        println!("[{}] {:>w$} [{}] {}", line.doc_id, line.left, line.matched, line.right, w = window);
    }
    tracing::info!(keyword, matches = lines.len(), "concordance done");
    Ok(())
}

fn run_stats(corpus: &Corpus, config: EngineConfig, top: usize, lengths: bool, json: bool) -> Result<()> {
    let engine = SearchEngine::build_with(corpus, config);
    let stats = CorpusStats::compute(&engine);
    if json {
        let value = serde_json::json!({
            "vocabulary_size": stats.vocabulary_size,
            "document_count": stats.document_count,
            "author_count": corpus.naut(),
            "top_terms": stats.top_terms(top),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("{corpus}");
    println!("vocabulary: {} terms over {} documents", stats.vocabulary_size, stats.document_count);
    for term in stats.top_terms(top) {
        println!("  {:<20} {:>8} occurrences in {:>5} documents", term.term, term.occurrences, term.document_frequency);
    }
    if lengths {
        for len in document_lengths(corpus) {
            println!("  doc {}: {} chars, {} words, {} sentences", len.doc_id, len.characters, len.words, len.sentences);
        }
    }
    Ok(())
}

fn run_author(corpus: &Corpus, name: &str) -> Result<()> {
    let Some(author) = corpus.author(name) else {
        bail!("author {name:?} not found");
    };
    println!("author: {}", author.name());
    println!("documents: {}", author.ndoc());
    println!("average size: {:.1} characters", author_average_size(corpus, name).unwrap_or(0.0));
    for (doc_id, doc) in author.productions(corpus) {
        println!("  [{doc_id}] {}", doc.title());
    }
    Ok(())
}

fn run_convert(corpus: &Corpus, output: &Path, min_chars: usize) -> Result<()> {
    let corpus = if min_chars > 0 { corpus.filtered_by_length(min_chars) } else { corpus.clone() };
    match output.extension().and_then(|s| s.to_str()) {
        Some("json") => save_json(&corpus, output)?,
        Some("csv" | "tsv") => save_csv(&corpus, output)?,
        Some("bin") => save_snapshot(&corpus, output)?,
        _ => bail!("output must end in .json, .csv, .tsv or .bin: {}", output.display()),
    }
    tracing::info!(output = %output.display(), num_docs = corpus.ndoc(), "corpus written");
    Ok(())
}
