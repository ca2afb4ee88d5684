//! Ingestion pipeline
//!
//! One run is a single linear pass:
//!
//! 1. fetch the catalog ([`SourceFetcher`])
//! 2. decode it and drop the license line ([`decoder::decode`])
//! 3. read the header and resolve the required columns
//! 4. open the transaction and prepare the insert
//! 5. normalize and insert row by row, collecting [`RowOutcome`]s
//! 6. commit
//!
//! Everything before step 4 fails without touching the store. Row-level
//! problems are logged with their line number and counted; only the failures
//! in [`IngestError`] end a run, rolling the transaction back if one is open.

use crate::config::{IngestConfig, SourceEncoding};
use crate::decoder;
use crate::error::{IngestError, Result};
use crate::fetcher::SourceFetcher;
use crate::models::{IngestSummary, RowOutcome};
use crate::normalizer::normalize;
use crate::parser::{ParsedRow, RecordReader};
use crate::sink::UpsertSink;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn, Instrument};

/// Fetches and ingests the catalog into the store.
///
/// Cheap to clone; clones share the run guard, so at most one run is active
/// across all of them. A trigger arriving while a run is in progress gets
/// [`IngestError::AlreadyRunning`].
#[derive(Clone)]
pub struct IngestPipeline {
    pool: SqlitePool,
    fetcher: SourceFetcher,
    encoding: SourceEncoding,
    running: Arc<Mutex<()>>,
}

impl IngestPipeline {
    pub fn new(pool: SqlitePool, config: &IngestConfig) -> Result<Self> {
        Ok(Self {
            pool,
            fetcher: SourceFetcher::new(config)?,
            encoding: config.source_encoding,
            running: Arc::new(Mutex::new(())),
        })
    }

    pub fn source_url(&self) -> &str {
        self.fetcher.url()
    }

    /// Download the catalog and ingest it
    pub async fn run(&self) -> Result<IngestSummary> {
        let _running = self.running.try_lock().map_err(|_| IngestError::AlreadyRunning)?;
        let raw = self.fetcher.fetch().await?;
        ingest(&self.pool, &raw, self.encoding).await
    }

    /// Ingest catalog bytes obtained elsewhere, e.g. a local copy
    pub async fn ingest_bytes(&self, raw: &[u8]) -> Result<IngestSummary> {
        let _running = self.running.try_lock().map_err(|_| IngestError::AlreadyRunning)?;
        ingest(&self.pool, raw, self.encoding).await
    }
}

/// Decode, parse, normalize and upsert `raw` in one transaction.
///
/// Does not guard against concurrent runs; go through [`IngestPipeline`] for that.
pub async fn ingest(
    pool: &SqlitePool,
    raw: &[u8],
    encoding: SourceEncoding,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::start();
    let span = tracing::info_span!("ingest", run_id = %summary.run_id);

    async move {
        let source = decoder::decode(raw, encoding)?;
        summary.license = source.license().map(str::to_string);

        let mut reader = RecordReader::new(source.as_bytes());
        let columns = match reader.resolve_columns() {
            Ok(columns) => columns,
            Err(IngestError::MissingColumns { missing, available }) => {
                warn!(?missing, ?available, "Required header fields not found");
                return Err(IngestError::MissingColumns { missing, available });
            },
            Err(e) => return Err(e),
        };

        let mut sink = UpsertSink::begin(pool).await?;

        while let Some(row) = reader.next_row()? {
            let outcome = match row {
                ParsedRow::Malformed { line, reason } => {
                    warn!(line, %reason, "Failed to read CSV record");
                    RowOutcome::SkippedMalformed { line, reason }
                },
                ParsedRow::Record { line, record } => match normalize(&record, &columns) {
                    Some(device) => sink.insert(line, &device).await,
                    None => {
                        warn!(line, fields = record.len(), "Record does not have required fields");
                        RowOutcome::SkippedShortRecord {
                            line,
                            fields: record.len(),
                        }
                    },
                },
            };
            summary.record(outcome);
        }

        sink.commit().await?;
        summary.finish();

        info!(
            rows_read = summary.rows_read,
            inserted = summary.inserted,
            already_present = summary.already_present,
            skipped = summary.skipped(),
            "Inserted or ignored {} records",
            summary.stored()
        );

        Ok::<_, IngestError>(summary)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::{connect_in_memory, count_devices};

    const CATALOG: &str = "Retail Branding,Marketing Name,Device,Model\n\
        Google,Pixel 8,shiba,Pixel 8\n\
        Samsung,Galaxy S21 5G,o1s,SM-G991B\n";

    #[tokio::test]
    async fn test_ingest_counts_rows() {
        let pool = connect_in_memory().await.unwrap();
        let summary = ingest(&pool, CATALOG.as_bytes(), SourceEncoding::Utf8).await.unwrap();

        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.stored(), 2);
        assert!(summary.finished_at.is_some());
        assert_eq!(count_devices(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_column_aborts_before_transaction() {
        let pool = connect_in_memory().await.unwrap();
        let data = "Retail Branding,Marketing Name,Device\nGoogle,Pixel 8,shiba\n";

        let err = ingest(&pool, data.as_bytes(), SourceEncoding::Utf8).await.unwrap_err();
        assert!(matches!(err, IngestError::MissingColumns { ref missing, .. } if missing == &["model"]));
        assert_eq!(count_devices(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_rejects_concurrent_run() {
        let pool = connect_in_memory().await.unwrap();
        let pipeline = IngestPipeline::new(pool, &IngestConfig::default()).unwrap();

        let _held = pipeline.running.try_lock().unwrap();
        let err = pipeline.clone().ingest_bytes(CATALOG.as_bytes()).await.unwrap_err();
        assert!(matches!(err, IngestError::AlreadyRunning));
    }

    #[tokio::test]
    async fn test_pipeline_guard_released_after_run() {
        let pool = connect_in_memory().await.unwrap();
        let pipeline = IngestPipeline::new(pool, &IngestConfig::default()).unwrap();

        pipeline.ingest_bytes(CATALOG.as_bytes()).await.unwrap();
        let second = pipeline.ingest_bytes(CATALOG.as_bytes()).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.already_present, 2);
    }
}
