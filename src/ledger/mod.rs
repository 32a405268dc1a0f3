//! Corpus ledger: one row per painting present locally.
//!
//! Rows accumulate in a [`CorpusLedger`] during the crawl and are persisted by
//! a [`LedgerWriter`] as CSV with a fixed header. The crawl owns the ledger;
//! the writer owns when it is flushed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::acquisition::movement_key;

/// Column names of the ledger file, in order.
pub const LEDGER_HEADER: [&str; 5] = ["id", "time", "movement", "author", "painting_name"];

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error on ledger {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error on ledger {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Ledger {path:?} has header {found:?}, expected {expected:?}")]
    UnexpectedHeader {
        path: PathBuf,
        found: Vec<String>,
        expected: Vec<String>,
    },
}

/// A painting confirmed present locally. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintingRecord {
    /// `<movement_dir>/<artist_slug>__<index>`, without file extension.
    #[serde(rename = "id")]
    pub local_id: String,
    #[serde(rename = "time")]
    pub era: String,
    pub movement: String,
    pub author: String,
    #[serde(rename = "painting_name")]
    pub title: String,
}

impl PaintingRecord {
    pub fn new(
        local_id: impl Into<String>,
        era: impl Into<String>,
        movement: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            local_id: local_id.into(),
            era: era.into(),
            movement: movement.into(),
            author: author.into(),
            title: title.into(),
        }
    }

    /// Movement label in directory form, used as the curation bucket key.
    pub fn movement_key(&self) -> String {
        movement_key(&self.movement)
    }
}

/// Append-only, ordered collection of ledger rows.
#[derive(Debug, Default, Clone)]
pub struct CorpusLedger {
    rows: Vec<PaintingRecord>,
}

impl CorpusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: PaintingRecord) {
        self.rows.push(record);
    }

    pub fn rows(&self) -> &[PaintingRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<PaintingRecord> {
        self.rows
    }
}

/// Persists a [`CorpusLedger`] to a CSV file.
pub struct LedgerWriter {
    path: PathBuf,
}

impl LedgerWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header and every row of `ledger`, replacing any existing file.
    ///
    /// Returns the number of rows written.
    pub fn flush(&self, ledger: &CorpusLedger) -> Result<usize, LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let csv_err = |source| LedgerError::Csv {
            path: self.path.clone(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(csv_err)?;
        writer.write_record(LEDGER_HEADER).map_err(csv_err)?;
        for row in ledger.rows() {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!("Wrote {} ledger rows to {:?}", ledger.len(), self.path);
        Ok(ledger.len())
    }
}

/// Read every row of a ledger file, in file order.
pub fn read_ledger(path: &Path) -> Result<Vec<PaintingRecord>, LedgerError> {
    let csv_err = |source| LedgerError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?;
    if headers.iter().ne(LEDGER_HEADER.iter().copied()) {
        return Err(LedgerError::UnexpectedHeader {
            path: path.to_path_buf(),
            found: headers.iter().map(str::to_string).collect(),
            expected: LEDGER_HEADER.iter().map(|h| h.to_string()).collect(),
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<PaintingRecord>, _>>()
        .map_err(csv_err)
}
