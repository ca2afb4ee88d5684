//! Transactional insert-if-absent writer for device records

use crate::error::{IngestError, Result};
use crate::models::{DeviceRecord, RowOutcome};
use sqlx::sqlite::{SqlitePool, SqliteStatement};
use sqlx::{Executor, Sqlite, Statement, Transaction};
use tracing::warn;

/// Conflicts on the (retail_branding, model) key are ignored and never update
/// the stored marketing name. Any other failure is reported per row.
const INSERT_DEVICE: &str = r#"
    INSERT INTO devices (retail_branding, marketing_name, model)
    VALUES (?, ?, ?)
    ON CONFLICT (retail_branding, model) DO NOTHING
"#;

/// Holds the run's transaction and the insert statement prepared on it.
///
/// Dropping the sink without calling [`UpsertSink::commit`] rolls the
/// transaction back.
pub struct UpsertSink {
    tx: Transaction<'static, Sqlite>,
    insert: SqliteStatement<'static>,
}

impl UpsertSink {
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let mut tx = pool.begin().await.map_err(IngestError::Begin)?;
        let insert = (&mut *tx)
            .prepare(INSERT_DEVICE)
            .await
            .map_err(IngestError::Prepare)?;

        Ok(Self { tx, insert })
    }

    /// Insert one record; failures are logged and returned as an outcome,
    /// leaving the transaction usable for the following rows.
    pub async fn insert(&mut self, line: u64, device: &DeviceRecord) -> RowOutcome {
        let result = self
            .insert
            .query()
            .bind(device.retail_branding())
            .bind(device.marketing_name.as_str())
            .bind(device.model())
            .execute(&mut *self.tx)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => RowOutcome::AlreadyPresent { line },
            Ok(_) => RowOutcome::Inserted { line },
            Err(e) => {
                warn!(line, error = %e, "Failed to insert record");
                RowOutcome::SkippedInsertError {
                    line,
                    reason: e.to_string(),
                }
            },
        }
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(IngestError::Commit)
    }
}
