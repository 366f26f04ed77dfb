//! Immutable in-memory embedding store loaded from a CSV snapshot

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use tqa_core::{Error, Result};

/// Column holding the passage text
pub const CONTENT_COLUMN: &str = "content";
/// Column holding the bracketed embedding list
pub const EMBEDDING_COLUMN: &str = "embedding";

/// One indexed unit of corpus text with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub embedding: Vec<f64>,
}

impl Passage {
    pub fn new(content: impl Into<String>, embedding: Vec<f64>) -> Self {
        Self {
            content: content.into(),
            embedding,
        }
    }
}

/// Read-only table of passages.
///
/// Every embedding has the same dimensionality. Iteration order is the load
/// order and is what ranking ties fall back to.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    passages: Vec<Passage>,
    dimension: usize,
}

impl EmbeddingStore {
    /// Build a store, checking every embedding is non-empty, finite and of one length
    pub fn from_passages(passages: Vec<Passage>) -> Result<Self> {
        let dimension = passages.first().map_or(0, |p| p.embedding.len());

        for (i, passage) in passages.iter().enumerate() {
            check_vector(&passage.embedding, dimension)
                .map_err(|msg| Error::CorpusLoad(format!("passage {}: {}", i + 1, msg)))?;
        }

        Ok(Self {
            passages,
            dimension,
        })
    }

    /// Load the snapshot at `path`
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::CorpusLoad(format!("failed to open {}: {}", path.display(), e))
        })?;

        let store = Self::from_csv_reader(file)
            .map_err(|e| match e {
                Error::CorpusLoad(msg) => Error::CorpusLoad(format!("{}: {}", path.display(), msg)),
                other => other,
            })?;

        info!(
            path = %path.display(),
            passages = store.len(),
            dimension = store.dimension(),
            "embedding store loaded"
        );

        Ok(store)
    }

    /// Parse a CSV snapshot with a header row naming `content` and `embedding` columns.
    ///
    /// Other columns are ignored. A single malformed row fails the whole load.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::CorpusLoad(format!("unreadable header row: {e}")))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::CorpusLoad(format!("missing {name:?} column")))
        };
        let content_idx = column(CONTENT_COLUMN)?;
        let embedding_idx = column(EMBEDDING_COLUMN)?;

        let mut passages = Vec::new();
        let mut dimension = 0;

        for (i, record) in reader.records().enumerate() {
            let row = i + 1;
            let record =
                record.map_err(|e| Error::CorpusLoad(format!("row {row}: {e}")))?;

            let content = record
                .get(content_idx)
                .ok_or_else(|| Error::CorpusLoad(format!("row {row}: missing content field")))?;
            let cell = record
                .get(embedding_idx)
                .ok_or_else(|| Error::CorpusLoad(format!("row {row}: missing embedding field")))?;

            let embedding =
                parse_embedding(cell).map_err(|msg| Error::CorpusLoad(format!("row {row}: {msg}")))?;
            if passages.is_empty() {
                dimension = embedding.len();
            }
            check_vector(&embedding, dimension)
                .map_err(|msg| Error::CorpusLoad(format!("row {row}: {msg}")))?;

            passages.push(Passage::new(content, embedding));
        }

        Ok(Self {
            passages,
            dimension,
        })
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Embedding length shared by every passage, 0 for an empty store
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Parse a textual vector such as `[0.1, -0.2, 3e-4]`
pub fn parse_embedding(cell: &str) -> std::result::Result<Vec<f64>, String> {
    serde_json::from_str::<Vec<f64>>(cell.trim())
        .map_err(|e| format!("embedding is not a list of numbers: {e}"))
}

fn check_vector(embedding: &[f64], dimension: usize) -> std::result::Result<(), String> {
    if embedding.is_empty() {
        return Err("embedding is empty".to_string());
    }
    if embedding.len() != dimension {
        return Err(format!(
            "embedding has {} dimensions, expected {}",
            embedding.len(),
            dimension
        ));
    }
    if let Some(pos) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(format!("embedding component {pos} is not finite"));
    }
    Ok(())
}
