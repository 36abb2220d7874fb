//! Vehicle catalog: dataset records, listing projection, and the CSV store.

pub mod record;
pub mod store;

pub use record::{DISPLAY_COLUMNS, NewVehicle, RECORD_COLUMNS, VehicleRecord, VehicleRow, full_name};
pub use store::{CatalogStore, filter_by_cluster};
