//! Crawl orchestration.
//!
//! Runs the taxonomy walk into a fresh ledger and flushes the ledger
//! afterwards no matter how the walk ended: normal completion, a fatal
//! error, or a panic.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{error, info};

use crate::acquisition::AcquisitionError;
use crate::ledger::{CorpusLedger, LedgerError, LedgerWriter};
use crate::taxonomy::{CrawlReport, TaxonomyWalker};

#[derive(Debug, Error)]
pub enum CrawlError {
    /// The walk aborted; `rows_flushed` rows collected before the abort were
    /// persisted.
    #[error("Crawl aborted after {rows_flushed} rows: {source}")]
    Aborted {
        rows_flushed: usize,
        #[source]
        source: AcquisitionError,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Outcome of a completed crawl.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub report: CrawlReport,
    pub rows_flushed: usize,
}

/// Walk the taxonomy and persist the collected ledger through `writer`.
///
/// When the walk fails the rows gathered so far are flushed before the error
/// is returned. A panic inside the walk is resumed after the flush.
pub fn run_crawl(walker: &TaxonomyWalker, writer: &LedgerWriter) -> Result<CrawlSummary, CrawlError> {
    let mut ledger = CorpusLedger::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| walker.walk(&mut ledger)));

    let flushed = writer.flush(&ledger);

    match outcome {
        Ok(Ok(report)) => {
            let rows_flushed = flushed?;
            info!("Crawl complete, {} rows in {:?}", rows_flushed, writer.path());
            Ok(CrawlSummary {
                report,
                rows_flushed,
            })
        }
        Ok(Err(source)) => {
            let rows_flushed = flushed?;
            error!(
                "Crawl aborted ({}), flushed {} rows to {:?}",
                source.kind().as_str(),
                rows_flushed,
                writer.path()
            );
            Err(CrawlError::Aborted {
                rows_flushed,
                source,
            })
        }
        Err(payload) => {
            match flushed {
                Ok(rows) => error!("Crawl panicked, flushed {} rows to {:?}", rows, writer.path()),
                Err(e) => error!("Crawl panicked and the ledger could not be flushed: {}", e),
            }
            panic::resume_unwind(payload)
        }
    }
}
