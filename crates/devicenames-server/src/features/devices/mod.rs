pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::TriggerIngestError;
pub use queries::{LookupDeviceError, LookupDeviceQuery};
pub use routes::{devices_routes, legacy_routes};
