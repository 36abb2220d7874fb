//! Car catalog and cluster-based recommendation service.
//!
//! The crate is split along its data flow: [`normalize`] turns free-text
//! price and seat input into numbers, [`classifier`] maps those numbers to a
//! market segment, [`catalog`] and [`orders`] persist vehicles and purchase
//! intents, and [`app`] ties them together for the [`http`] and [`cli`]
//! surfaces.

pub mod app;
pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod normalize;
pub mod orders;
pub mod paging;
pub mod persist;

pub use app::{AppStatus, CatalogApp, Prediction};
pub use catalog::{CatalogStore, NewVehicle, VehicleRecord, VehicleRow};
pub use classifier::{Classifier, ClusterId, ClusterLabelTable, ClusterModel};
pub use config::Settings;
pub use error::{CatalogError, CatalogResult};
pub use normalize::{normalize_price, normalize_seats};
pub use orders::{OrderRecord, OrderStore, PurchaseRequest};
pub use paging::{Page, paginate};
