//! Purchase intents and their JSON store.

pub mod record;
pub mod store;

pub use record::{OrderRecord, PurchaseRequest};
pub use store::OrderStore;
