//! Failure modes of the corpus loader that are not plain IO or decoding errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// File extension other than `.json`, `.jsonl` or `.bin`.
    #[error("unsupported corpus file: {0}")]
    UnsupportedFormat(String),

    #[error("row {position}: invalid document id {value}")]
    InvalidId { position: usize, value: String },

    #[error("row {position}: expected a JSON object")]
    NotAnObject { position: usize },

    /// Top-level JSON that is neither a corpus object, a row object, nor an array of rows.
    #[error("corpus JSON must be an object or an array")]
    UnexpectedShape,
}
