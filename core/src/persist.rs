//! Corpus rehydration: structured JSON, JSON rows, JSON Lines, CSV/TSV tables and
//! bincode snapshots.
//! The search index itself is never written to disk.

use crate::document::format_date;
use crate::{Corpus, DocId, Document, LoadError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Header synonyms per logical field, in lookup priority order.
pub const ID_KEYS: &[&str] = &["id", "Id", "ID"];
pub const TITLE_KEYS: &[&str] = &["titre", "Titre", "title", "Title"];
pub const AUTHOR_KEYS: &[&str] = &["auteur", "Auteur", "author", "Author"];
pub const KIND_KEYS: &[&str] = &["type", "Type", "source", "Source"];
pub const DATE_KEYS: &[&str] = &["date", "Date"];
pub const URL_KEYS: &[&str] = &["url", "URL", "Url"];
pub const TEXT_KEYS: &[&str] = &["texte", "Texte", "text", "Text"];

pub const UNKNOWN_AUTHOR: &str = "unknown";

/// One input record with its headers reconciled and defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRow {
    pub id: Option<DocId>,
    pub title: String,
    pub author: String,
    pub kind: String,
    pub date: String,
    pub url: String,
    pub text: String,
}

impl CorpusRow {
    pub fn from_json(value: &Value, position: usize) -> Result<Self, LoadError> {
        let obj = value.as_object().ok_or(LoadError::NotAnObject { position })?;
        let id = match lookup(obj, ID_KEYS) {
            None => None,
            Some(raw) => Some(parse_id(raw).ok_or_else(|| LoadError::InvalidId { position, value: raw.to_string() })?),
        };
        Ok(Self {
            id,
            title: text_field(obj, TITLE_KEYS).unwrap_or_default(),
            author: text_field(obj, AUTHOR_KEYS)
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            kind: text_field(obj, KIND_KEYS).unwrap_or_default(),
            date: text_field(obj, DATE_KEYS).unwrap_or_default(),
            url: text_field(obj, URL_KEYS).unwrap_or_default(),
            text: text_field(obj, TEXT_KEYS).unwrap_or_default(),
        })
    }

    pub fn into_document(self) -> Document {
        Document::from_source(&self.kind, self.title, self.author, &self.date, self.url, self.text)
    }
}

/// First present, non-null value among `keys`.
fn lookup<'v>(obj: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match lookup(obj, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // author lists
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

fn parse_id(raw: &Value) -> Option<DocId> {
    match raw {
        Value::Number(n) => match n.as_u64() {
            Some(v) => DocId::try_from(v).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(DocId::MAX))
                .map(|f| f as DocId),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize)]
struct StructuredIn {
    #[serde(default, alias = "nom")]
    name: Option<String>,
    documents: Vec<Value>,
}

#[derive(Serialize)]
struct StructuredOut<'a> {
    name: &'a str,
    documents: Vec<RowOut<'a>>,
}

#[derive(Serialize)]
struct RowOut<'a> {
    id: DocId,
    titre: &'a str,
    auteur: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    date: String,
    url: &'a str,
    texte: &'a str,
}

/// Tabular row: the structured columns plus the derived body length.
#[derive(Serialize)]
struct TableRowOut<'a> {
    id: DocId,
    titre: &'a str,
    auteur: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    date: String,
    url: &'a str,
    texte: &'a str,
    taille_texte: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
    Table(u8),
    Snapshot,
}

impl Format {
    fn of(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("jsonl") => Ok(Format::JsonLines),
            Some("csv") => Ok(Format::Table(b',')),
            Some("tsv") => Ok(Format::Table(b'\t')),
            Some("bin") => Ok(Format::Snapshot),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Split a parsed JSON document into an optional corpus name and its rows.
pub fn rows_from_value(value: Value) -> Result<(Option<String>, Vec<Value>)> {
    let structured = value.get("documents").is_some();
    match value {
        Value::Object(_) if structured => {
            let structured: StructuredIn = serde_json::from_value(value)?;
            Ok((structured.name, structured.documents))
        }
        Value::Object(_) => Ok((None, vec![value])),
        Value::Array(rows) => Ok((None, rows)),
        _ => Err(LoadError::UnexpectedShape.into()),
    }
}

/// Append rows to `corpus`. Rows without an id take the next unused one;
/// a repeated id replaces the earlier document.
pub fn append_rows(corpus: &mut Corpus, rows: &[Value], source: &str) -> Result<usize> {
    for (position, value) in rows.iter().enumerate() {
        let row = CorpusRow::from_json(value, position).with_context(|| format!("reading {source}"))?;
        let id = row.id.unwrap_or_else(|| corpus.next_id());
        insert(corpus, id, row.into_document(), source);
    }
    Ok(rows.len())
}

fn insert(corpus: &mut Corpus, id: DocId, document: Document, source: &str) {
    if corpus.contains(id) {
        tracing::warn!(doc_id = id, source, "duplicate document id, replacing earlier document");
    }
    corpus.add_document(id, document);
}

/// Table records as JSON objects keyed by header, so they go through the same
/// synonym lookup as the JSON forms. Empty cells count as missing.
fn table_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Value>> {
    let mut table = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let headers = table.headers()?.clone();
    let mut rows = Vec::new();
    for record in table.records() {
        let record = record?;
        let obj: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.trim().to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(obj));
    }
    Ok(rows)
}

fn read_rows(path: &Path, format: Format) -> Result<(Option<String>, Vec<Value>)> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    match format {
        Format::Table(delimiter) => {
            let rows = table_rows(reader, delimiter).with_context(|| format!("{}: invalid table", path.display()))?;
            Ok((None, rows))
        }
        Format::JsonLines => {
            let mut rows = Vec::new();
            for (n, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let value: Value = serde_json::from_str(&line)
                    .with_context(|| format!("{}:{}: invalid JSON", path.display(), n + 1))?;
                rows.push(value);
            }
            Ok((None, rows))
        }
        _ => {
            let value: Value = serde_json::from_reader(reader)
                .with_context(|| format!("{}: invalid JSON", path.display()))?;
            rows_from_value(value)
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("corpus")
        .to_string()
}

fn append_file(corpus: &mut Corpus, path: &Path) -> Result<usize> {
    let source = path.display().to_string();
    match Format::of(path)? {
        Format::Snapshot => {
            let snapshot = load_snapshot(path)?;
            for (id, doc) in snapshot.iter() {
                insert(corpus, id, doc.clone(), &source);
            }
            Ok(snapshot.ndoc())
        }
        format => {
            let (_, rows) = read_rows(path, format)?;
            append_rows(corpus, &rows, &source)
        }
    }
}

/// Load a corpus from a `.json`, `.jsonl`, `.csv`, `.tsv` or `.bin` file, or from every such file
/// under a directory (sorted by path, later files win on id clashes).
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && Format::of(p).is_ok())
            .collect();
        files.sort();
        let mut corpus = Corpus::new(file_stem(path));
        for file in &files {
            append_file(&mut corpus, file)?;
        }
        tracing::info!(dir = %path.display(), files = files.len(), num_docs = corpus.ndoc(), "loaded corpus directory");
        return Ok(corpus);
    }

    let corpus = match Format::of(path)? {
        Format::Snapshot => load_snapshot(path)?,
        format => {
            let (name, rows) = read_rows(path, format)?;
            let mut corpus = Corpus::new(name.unwrap_or_else(|| file_stem(path)));
            append_rows(&mut corpus, &rows, &path.display().to_string())?;
            corpus
        }
    };
    tracing::info!(file = %path.display(), num_docs = corpus.ndoc(), num_authors = corpus.naut(), "loaded corpus");
    Ok(corpus)
}

/// Write the structured form `{ name, documents: [{ id, titre, auteur, type, date, url, texte }] }`.
/// Variant payloads (comment counts, co-authors) are not part of this form.
pub fn save_json<P: AsRef<Path>>(corpus: &Corpus, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let out = StructuredOut {
        name: corpus.name(),
        documents: corpus
            .iter()
            .map(|(id, doc)| RowOut {
                id,
                titre: doc.title(),
                auteur: doc.author(),
                kind: doc.kind().tag(),
                date: format_date(doc.date()),
                url: doc.url(),
                texte: doc.text(),
            })
            .collect(),
    };
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let json = serde_json::to_string_pretty(&out)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

/// Write the tabular form with a `taille_texte` column. A `.tsv` path is tab-separated,
/// anything else comma-separated.
pub fn save_csv<P: AsRef<Path>>(corpus: &Corpus, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let delimiter = match Format::of(path) {
        Ok(Format::Table(delimiter)) => delimiter,
        _ => b',',
    };
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut table = csv::WriterBuilder::new().delimiter(delimiter).from_writer(f);
    for (id, doc) in corpus.iter() {
        table.serialize(TableRowOut {
            id,
            titre: doc.title(),
            auteur: doc.author(),
            kind: doc.kind().tag(),
            date: format_date(doc.date()),
            url: doc.url(),
            texte: doc.text(),
            taille_texte: doc.text_len(),
        })?;
    }
    table.flush()?;
    Ok(())
}

/// Binary snapshot of the whole corpus, variant payloads included.
pub fn save_snapshot<P: AsRef<Path>>(corpus: &Corpus, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let bytes = bincode::serialize(corpus)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let corpus = bincode::deserialize(&buf).with_context(|| format!("{}: invalid snapshot", path.display()))?;
    Ok(corpus)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_synonyms_resolve_in_priority_order() {
        let row = CorpusRow::from_json(
            &json!({ "ID": "7", "Titre": "T", "title": "ignored", "Author": ["A", "B"], "source": "reddit", "Text": "body" }),
            0,
        )
        .unwrap();
        assert_eq!(row.id, Some(7));
        assert_eq!(row.title, "T");
        assert_eq!(row.author, "A, B");
        assert_eq!(row.kind, "reddit");
        assert_eq!(row.text, "body");
        assert_eq!(row.url, "");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let row = CorpusRow::from_json(&json!({ "auteur": null }), 3).unwrap();
        assert_eq!(row.id, None);
        assert_eq!(row.author, UNKNOWN_AUTHOR);
        assert_eq!(row.title, "");
        assert_eq!(row.into_document().kind().tag(), "Generic");
    }

    #[test]
    fn bad_ids_and_shapes_are_rejected() {
        assert!(matches!(
            CorpusRow::from_json(&json!({ "id": "seven" }), 2),
            Err(LoadError::InvalidId { position: 2, .. })
        ));
        assert!(matches!(CorpusRow::from_json(&json!(5), 1), Err(LoadError::NotAnObject { position: 1 })));
        assert!(rows_from_value(json!("text")).is_err());
        assert_eq!(parse_id(&json!(4.0)), Some(4));
        assert_eq!(parse_id(&json!(-1)), None);
    }

    #[test]
    fn structured_value_keeps_name() {
        let (name, rows) = rows_from_value(json!({ "nom": "Climat", "documents": [{ "id": 1 }] })).unwrap();
        assert_eq!(name.as_deref(), Some("Climat"));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn table_cells_map_through_header_synonyms() {
        let tsv = "Titre\tAuteur\tDate\tURL\ttext\nHeat\tann\t2024-05-01\thttp://x\tIt is hot\nCold\t\t2024-05-02\t\tbrr\n";
        let rows = table_rows(tsv.as_bytes(), b'\t').unwrap();
        assert_eq!(rows.len(), 2);
        let first = CorpusRow::from_json(&rows[0], 0).unwrap();
        assert_eq!(first.title, "Heat");
        assert_eq!(first.url, "http://x");
        assert_eq!(first.text, "It is hot");
        let second = CorpusRow::from_json(&rows[1], 1).unwrap();
        assert_eq!(second.author, UNKNOWN_AUTHOR);
        assert_eq!(second.id, None);
    }

    #[test]
    fn rows_without_ids_get_positions() {
        let mut corpus = Corpus::new("c");
        let rows = vec![json!({ "texte": "a" }), json!({ "texte": "b" })];
        append_rows(&mut corpus, &rows, "test").unwrap();
        assert_eq!(corpus.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![0, 1]);
    }
}
