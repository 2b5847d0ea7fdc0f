use serde::{Deserialize, Serialize};
use std::fmt;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Variant payload carried alongside the shared document fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Generic,
    Reddit { comment_count: u32 },
    Arxiv { coauthors: Vec<String> },
}

impl DocumentKind {
    pub fn tag(&self) -> &'static str {
        match self {
            DocumentKind::Generic => "Generic",
            DocumentKind::Reddit { .. } => "Reddit",
            DocumentKind::Arxiv { .. } => "Arxiv",
        }
    }

    /// Case-insensitive; anything unrecognized is `Generic`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "reddit" => DocumentKind::Reddit { comment_count: 0 },
            "arxiv" => DocumentKind::Arxiv { coauthors: Vec::new() },
            _ => DocumentKind::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    title: String,
    author: String,
    date: Date,
    url: String,
    text: String,
    kind: DocumentKind,
}

impl Document {
    pub fn new(
        kind: DocumentKind,
        title: impl Into<String>,
        author: impl Into<String>,
        date: Date,
        url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date,
            url: url.into(),
            text: text.into(),
            kind,
        }
    }

    /// Build a document from a source tag (`reddit`, `arxiv`, anything else) and a raw date string.
    pub fn from_source(
        source: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        date: &str,
        url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(DocumentKind::from_tag(source), title, author, parse_date(date), url, text)
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn author(&self) -> &str { &self.author }
    pub fn date(&self) -> Date { self.date }
    pub fn url(&self) -> &str { &self.url }
    pub fn text(&self) -> &str { &self.text }
    pub fn kind(&self) -> &DocumentKind { &self.kind }

    /// Body length in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn comment_count(&self) -> Option<u32> {
        match self.kind {
            DocumentKind::Reddit { comment_count } => Some(comment_count),
            _ => None,
        }
    }

    /// Returns false when the document is not a Reddit post.
    pub fn set_comment_count(&mut self, count: u32) -> bool {
        match &mut self.kind {
            DocumentKind::Reddit { comment_count } => {
                *comment_count = count;
                true
            }
            _ => false,
        }
    }

    pub fn coauthors(&self) -> Option<&[String]> {
        match &self.kind {
            DocumentKind::Arxiv { coauthors } => Some(coauthors),
            _ => None,
        }
    }

    /// Returns false when the document is not an Arxiv paper.
    pub fn set_coauthors(&mut self, names: Vec<String>) -> bool {
        match &mut self.kind {
            DocumentKind::Arxiv { coauthors } => {
                *coauthors = names;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DocumentKind::Generic => write!(f, "Document: {}", self.title),
            DocumentKind::Reddit { comment_count } => {
                write!(f, "[Reddit] {} - {} comments", self.title, comment_count)
            }
            DocumentKind::Arxiv { coauthors } => {
                write!(f, "[Arxiv] {} - co-authors: {}", self.title, coauthors.join(", "))
            }
        }
    }
}

/// Parse `YYYY-MM-DD` (a longer timestamp starting with one is accepted).
/// Unparseable input falls back to today's UTC date with a warning.
pub fn parse_date(raw: &str) -> Date {
    let trimmed = raw.trim();
    let candidate = trimmed.get(..10).unwrap_or(trimmed);
    match Date::parse(candidate, format_description!("[year]-[month]-[day]")) {
        Ok(date) => date,
        Err(err) => {
            tracing::warn!(date = raw, error = %err, "invalid date, using current date");
            OffsetDateTime::now_utc().date()
        }
    }
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn unknown_tag_is_generic() {
        assert_eq!(DocumentKind::from_tag("Mastodon"), DocumentKind::Generic);
        assert_eq!(DocumentKind::from_tag("ARXIV").tag(), "Arxiv");
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = Date::from_calendar_date(2023, Month::March, 9).unwrap();
        assert_eq!(parse_date("2023-03-09"), expected);
        assert_eq!(parse_date("2023-03-09T17:01:44Z"), expected);
        assert_eq!(format_date(expected), "2023-03-09");
    }

    #[test]
    fn bad_date_falls_back_to_today() {
        assert_eq!(parse_date("yesterday"), OffsetDateTime::now_utc().date());
    }

    #[test]
    fn setters_only_apply_to_their_variant() {
        let mut reddit = Document::from_source("reddit", "t", "a", "2024-01-01", "", "body");
        assert!(reddit.set_comment_count(12));
        assert!(!reddit.set_coauthors(vec!["x".into()]));
        assert_eq!(reddit.comment_count(), Some(12));
        assert_eq!(reddit.to_string(), "[Reddit] t - 12 comments");

        let mut paper = Document::from_source("arxiv", "p", "a", "2024-01-01", "", "body");
        assert!(paper.set_coauthors(vec!["b".into(), "c".into()]));
        assert_eq!(paper.coauthors().map(|c| c.len()), Some(2));
        assert_eq!(paper.to_string(), "[Arxiv] p - co-authors: b, c");
    }

    #[test]
    fn text_len_counts_characters() {
        let doc = Document::from_source("", "t", "a", "2024-01-01", "", "été");
        assert_eq!(doc.text_len(), 3);
    }
}
