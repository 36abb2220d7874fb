//! Application context.
//!
//! [`CatalogApp`] is built once at startup and shared by every request. It
//! owns the two record stores and the classifier, and exposes the operations
//! the HTTP layer and the CLI call into.
//!
//! Asset loading is best-effort: a missing model or label file leaves the
//! process running in a degraded mode where classification reports
//! unavailability and labels fall back to `"Cluster {id}"`.

use chrono::{SubsecRound, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{CatalogStore, NewVehicle, VehicleRecord, VehicleRow, filter_by_cluster};
use crate::classifier::{Classifier, ClusterId, ClusterLabelTable, ClusterModel, load_model};
use crate::config::{PaginationConfig, Settings};
use crate::error::{CatalogError, CatalogResult};
use crate::normalize::{normalize_price, normalize_seats};
use crate::orders::{OrderRecord, OrderStore, PurchaseRequest};
use crate::paging::{Page, paginate};

/// Outcome of classifying a budget/seat preference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub cluster_id: ClusterId,
    pub label: String,
    /// Normalized features the model was called with
    pub price: f64,
    pub seats: f64,
    /// Catalog vehicles in the predicted cluster
    pub vehicles: Page<VehicleRow>,
}

/// Which subsystems came up at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppStatus {
    pub model_loaded: bool,
    pub labels: usize,
    pub dataset_present: bool,
}

#[derive(Debug)]
pub struct CatalogApp {
    catalog: CatalogStore,
    orders: OrderStore,
    classifier: Classifier,
    pagination: PaginationConfig,
}

impl CatalogApp {
    pub fn new(
        catalog: CatalogStore,
        orders: OrderStore,
        classifier: Classifier,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            catalog,
            orders,
            classifier,
            pagination,
        }
    }

    /// Build the context from settings, loading model and labels best-effort.
    pub fn from_settings(settings: &Settings) -> Self {
        let assets = &settings.assets;

        let model: Option<Arc<dyn ClusterModel>> =
            match load_model(&settings.resolve(&assets.model)) {
                Ok(model) => {
                    crate::log_event!("startup", "model loaded", "{}", model.describe());
                    Some(model)
                }
                Err(e) => {
                    tracing::warn!("[startup] classification disabled: {e}");
                    None
                }
            };

        let labels = match ClusterLabelTable::load(&settings.resolve(&assets.labels)) {
            Ok(labels) => {
                crate::log_event!("startup", "labels loaded", "{} clusters", labels.len());
                labels
            }
            Err(e) => {
                tracing::warn!("[startup] using fallback cluster names: {e}");
                ClusterLabelTable::default()
            }
        };

        let catalog = CatalogStore::new(settings.resolve(&assets.dataset));
        if !catalog.exists() {
            tracing::warn!(
                "[startup] dataset not found at {}; catalog listing unavailable",
                catalog.path().display()
            );
        }

        let orders = OrderStore::new(settings.resolve(&assets.orders));
        crate::debug_event!("startup", "orders file", "{}", orders.path().display());

        Self::new(
            catalog,
            orders,
            Classifier::new(model, labels),
            settings.pagination,
        )
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.pagination
    }

    pub fn status(&self) -> AppStatus {
        AppStatus {
            model_loaded: self.classifier.is_available(),
            labels: self.classifier.labels().len(),
            dataset_present: self.catalog.exists(),
        }
    }

    /// Full catalog with cluster names applied.
    pub fn load_catalog(&self) -> CatalogResult<Vec<VehicleRecord>> {
        let mut records = self.catalog.load_all()?;
        for record in &mut records {
            record.cluster_name = self.classifier.label_of(record.cluster_id);
        }
        Ok(records)
    }

    /// One page of the catalog listing.
    pub fn list_page(&self, page: usize) -> CatalogResult<Page<VehicleRow>> {
        let records = self.load_catalog()?;
        Ok(paginate(&records, page, self.pagination.catalog_page_size).map(|r| r.to_row()))
    }

    /// Classify a preference and page through the vehicles in its cluster.
    ///
    /// Invalid input is reported before model availability. A missing dataset
    /// still yields the label, with an empty vehicle page.
    pub fn predict(&self, price: &str, seats: &str, page: usize) -> CatalogResult<Prediction> {
        let price = normalize_price(price)?;
        let seats = normalize_seats(seats)?;

        let cluster_id = self.classifier.classify(price, seats)?;
        let label = self.classifier.label_of(cluster_id);

        let records = match self.load_catalog() {
            Ok(records) => records,
            Err(e @ CatalogError::MissingAsset { .. }) => {
                tracing::warn!("[predict] no vehicles to match: {e}");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let matches = filter_by_cluster(&records, cluster_id);
        let vehicles =
            paginate(&matches, page, self.pagination.prediction_page_size).map(|r| r.to_row());

        crate::debug_event!(
            "predict",
            "classified",
            "price={price} seats={seats} -> {label} ({} matches)",
            matches.len()
        );

        Ok(Prediction {
            cluster_id,
            label,
            price,
            seats,
            vehicles,
        })
    }

    /// Record a purchase intent with a server-generated timestamp.
    pub fn submit_order(&self, request: PurchaseRequest) -> CatalogResult<OrderRecord> {
        request.validate()?;
        // Stored timestamps carry microsecond precision
        let order = request.into_order(Utc::now().trunc_subsecs(6));
        self.orders.append(order.clone())?;
        Ok(order)
    }

    /// Sales listing, newest first.
    pub fn list_sales(&self, page: usize) -> CatalogResult<Page<OrderRecord>> {
        self.orders
            .list_descending(page, self.pagination.sales_page_size)
    }

    /// Classify and persist a new vehicle.
    pub fn add_vehicle(&self, input: NewVehicle) -> CatalogResult<VehicleRecord> {
        input.validate()?;
        let price = normalize_price(&input.price)?;
        let seats = normalize_seats(&input.seats)?;

        let cluster_id = self.classifier.classify(price, seats)?;
        let cluster_name = self.classifier.label_of(cluster_id);
        let record = VehicleRecord::from_input(input, cluster_id, cluster_name);

        self.catalog.append(record.clone())?;
        crate::log_event!(
            "catalog",
            "vehicle added",
            "{} -> {}",
            record.full_name,
            record.cluster_name
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    const DATASET: &str = "\
Company Names,Cars Names,Cars Prices,Seats,cluster
TOYOTA,AVANZA,\"$15,000\",7,1
HONDA,BRIO,\"$11,000\",5,0
PORSCHE,911,\"$120,000\",4,2
DAIHATSU,XENIA,\"$14,000\",7,1
";

    fn price_model() -> impl ClusterModel {
        |price: f64, seats: f64| {
            if price > 100_000.0 {
                ClusterId(2)
            } else if seats >= 6.0 {
                ClusterId(1)
            } else {
                ClusterId(0)
            }
        }
    }

    fn labels() -> ClusterLabelTable {
        ClusterLabelTable::from(HashMap::from([
            (ClusterId(0), "City Car".to_string()),
            (ClusterId(1), "Family MPV".to_string()),
        ]))
    }

    fn pagination(catalog: usize, prediction: usize, sales: usize) -> PaginationConfig {
        PaginationConfig {
            catalog_page_size: NonZeroUsize::new(catalog).unwrap(),
            prediction_page_size: NonZeroUsize::new(prediction).unwrap(),
            sales_page_size: NonZeroUsize::new(sales).unwrap(),
        }
    }

    fn app(temp_dir: &TempDir, classifier: Classifier) -> CatalogApp {
        let dataset = temp_dir.path().join("vehicles.csv");
        std::fs::write(&dataset, DATASET).unwrap();
        CatalogApp::new(
            CatalogStore::new(dataset),
            OrderStore::new(temp_dir.path().join("orders.json")),
            classifier,
            pagination(2, 1, 20),
        )
    }

    #[test]
    fn test_list_page_applies_labels() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::with_model(price_model()).with_labels(labels()));

        let first = app.list_page(1).unwrap();
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items[0].cluster_name, "Family MPV");
        assert_eq!(first.items[1].cluster_name, "City Car");

        let second = app.list_page(2).unwrap();
        assert_eq!(second.items[0].cluster_name, "Cluster 2");
        assert!(app.list_page(3).unwrap().is_empty());
    }

    #[test]
    fn test_predict_filters_and_pages() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::with_model(price_model()).with_labels(labels()));

        let prediction = app.predict("$14,000-$16,000", "7", 2).unwrap();
        assert_eq!(prediction.cluster_id, ClusterId(1));
        assert_eq!(prediction.label, "Family MPV");
        assert_eq!(prediction.price, 15000.0);
        assert_eq!(prediction.vehicles.total_pages, 2);
        assert_eq!(prediction.vehicles.items[0].model, "XENIA");
    }

    #[test]
    fn test_predict_invalid_input_before_availability() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::new(None, labels()));

        assert!(matches!(
            app.predict("abc", "4", 1),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            app.predict("20000", "four", 1),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            app.predict("20000", "4", 1),
            Err(CatalogError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_predict_without_dataset_still_labels() {
        let temp_dir = TempDir::new().unwrap();
        let app = CatalogApp::new(
            CatalogStore::new(temp_dir.path().join("missing.csv")),
            OrderStore::new(temp_dir.path().join("orders.json")),
            Classifier::with_model(price_model()).with_labels(labels()),
            PaginationConfig::default(),
        );

        let prediction = app.predict("9000", "4", 1).unwrap();
        assert_eq!(prediction.label, "City Car");
        assert!(prediction.vehicles.is_empty());
        assert!(matches!(
            app.list_page(1),
            Err(CatalogError::MissingAsset { .. })
        ));
        assert!(!app.status().dataset_present);
    }

    #[test]
    fn test_add_vehicle_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::with_model(price_model()).with_labels(labels()));

        let added = app
            .add_vehicle(NewVehicle {
                company: "Mitsubishi".into(),
                model: "Xpander".into(),
                price: "$18,000 - $22,000".into(),
                seats: "7".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(added.full_name, "MITSUBISHI XPANDER");

        let reloaded = app.load_catalog().unwrap();
        let stored = reloaded.last().unwrap();
        assert_eq!(stored.full_name, "MITSUBISHI XPANDER");
        assert_eq!(stored.cluster_name, "Family MPV");

        let fresh = app
            .classifier()
            .classify(
                normalize_price(&stored.price).unwrap(),
                normalize_seats(&stored.seats).unwrap(),
            )
            .unwrap();
        assert_eq!(stored.cluster_id, fresh);
    }

    #[test]
    fn test_add_vehicle_rejections_leave_catalog_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::new(None, labels()));

        let missing = app.add_vehicle(NewVehicle {
            company: "Suzuki".into(),
            ..Default::default()
        });
        assert!(matches!(missing, Err(CatalogError::InvalidInput(_))));

        let unavailable = app.add_vehicle(NewVehicle {
            company: "Suzuki".into(),
            model: "Ertiga".into(),
            price: "$16,000".into(),
            seats: "7".into(),
            ..Default::default()
        });
        assert!(matches!(unavailable, Err(CatalogError::ModelUnavailable)));

        assert_eq!(app.load_catalog().unwrap().len(), 4);
    }

    #[test]
    fn test_orders_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let app = app(&temp_dir, Classifier::new(None, labels()));

        let request = |buyer: &str| PurchaseRequest {
            buyer_name: buyer.into(),
            address: "Medan".into(),
            phone: "0819".into(),
            vehicle_full_name: "HONDA BRIO".into(),
            cluster_label: "City Car".into(),
        };
        app.submit_order(request("first")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newest = app.submit_order(request("second")).unwrap();

        let sales = app.list_sales(1).unwrap();
        assert_eq!(sales.total_items, 2);
        assert_eq!(sales.items[0], newest);

        assert!(matches!(
            app.submit_order(PurchaseRequest::default()),
            Err(CatalogError::InvalidInput(_))
        ));
        assert_eq!(app.list_sales(1).unwrap().total_items, 2);
    }

    #[test]
    fn test_from_settings_degrades_without_assets() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.workspace_root = Some(temp_dir.path().to_path_buf());

        let app = CatalogApp::from_settings(&settings);
        let status = app.status();
        assert!(!status.model_loaded);
        assert_eq!(status.labels, 0);
        assert!(!status.dataset_present);
        assert_eq!(app.classifier().label_of(ClusterId(3)), "Cluster 3");
    }
}
