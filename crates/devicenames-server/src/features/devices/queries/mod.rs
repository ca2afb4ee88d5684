pub mod lookup;

pub use lookup::{LookupDeviceError, LookupDeviceQuery};
