use devicenames_ingest::{IngestError, IngestPipeline, IngestSummary};

#[derive(Debug, thiserror::Error)]
pub enum TriggerIngestError {
    #[error("An ingestion run is already in progress")]
    AlreadyRunning,
    #[error("Failed to update devices: {0}")]
    Failed(IngestError),
}

impl From<IngestError> for TriggerIngestError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::AlreadyRunning => TriggerIngestError::AlreadyRunning,
            other => TriggerIngestError::Failed(other),
        }
    }
}

/// Run one ingestion from the configured source
#[tracing::instrument(skip(pipeline), fields(url = %pipeline.source_url()))]
pub async fn handle(pipeline: IngestPipeline) -> Result<IngestSummary, TriggerIngestError> {
    let summary = pipeline.run().await?;

    tracing::info!(
        run_id = %summary.run_id,
        inserted = summary.inserted,
        already_present = summary.already_present,
        skipped = summary.skipped(),
        "Devices updated"
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_already_running_is_split_out() {
        assert!(matches!(
            TriggerIngestError::from(IngestError::AlreadyRunning),
            TriggerIngestError::AlreadyRunning
        ));
        assert!(matches!(
            TriggerIngestError::from(IngestError::Config("bad".to_string())),
            TriggerIngestError::Failed(_)
        ));
    }
}
