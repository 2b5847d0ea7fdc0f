//! Engine tuning knobs and front-end defaults.

use serde::{Deserialize, Serialize};

/// Number of hits `search` returns when the caller does not ask for a count.
pub const DEFAULT_K: usize = 10;

/// Upper bound on `k` accepted by the HTTP front end.
pub const MAX_K: usize = 100;

/// Characters of context captured on each side of a concordance match.
pub const DEFAULT_WINDOW: usize = 30;

/// Inverse document frequency formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdfMode {
    /// `ln(N / df)`.
    #[default]
    Standard,
    /// `ln(1 + N / df)`. Opt-in only; never the default.
    Smoothed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub idf: IdfMode,
    pub default_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { idf: IdfMode::Standard, default_k: DEFAULT_K }
    }
}

impl EngineConfig {
    pub fn smoothed(mut self, enabled: bool) -> Self {
        self.idf = if enabled { IdfMode::Smoothed } else { IdfMode::Standard };
        self
    }

    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }
}
