pub mod ingest;

pub use ingest::TriggerIngestError;
