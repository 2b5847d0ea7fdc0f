pub mod concordance;
pub mod config;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod persist;
pub mod query;
pub mod rank;
pub mod stats;
pub mod tokenizer;
pub mod vocabulary;
pub mod weighting;

pub use config::{EngineConfig, IdfMode};
pub use corpus::{Author, Corpus};
pub use document::{Document, DocumentKind};
pub use engine::{SearchEngine, SearchHit};
pub use error::LoadError;
pub use vocabulary::{TermStats, Vocabulary};

/// Identifier of a document inside a corpus. Also fixes the matrix row order.
pub type DocId = u32;
