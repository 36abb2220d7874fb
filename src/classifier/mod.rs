//! Cluster classification.
//!
//! The trained model is an injected dependency behind [`ClusterModel`]; the
//! rest of the crate only relies on its `(price, seats) -> ClusterId`
//! contract. [`Classifier`] pairs an optional model with the label table and
//! is what request handlers talk to.

pub mod centroid;
pub mod labels;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::error::{CatalogError, CatalogResult};

pub use centroid::{Centroid, CentroidModel, FeatureScale, ModelArtifact, Scaling, load_model};
pub use labels::ClusterLabelTable;

/// Identifier of a pre-computed market segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub i64);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("model could not classify ({price}, {seats}): {reason}")]
    Prediction {
        price: f64,
        seats: f64,
        reason: String,
    },
}

/// A trained model mapping `(price, seats)` to a cluster.
pub trait ClusterModel: Send + Sync {
    fn predict(&self, price: f64, seats: f64) -> Result<ClusterId, ModelError>;

    /// Short description for logs.
    fn describe(&self) -> String {
        "cluster model".to_string()
    }
}

impl<F> ClusterModel for F
where
    F: Fn(f64, f64) -> ClusterId + Send + Sync,
{
    fn predict(&self, price: f64, seats: f64) -> Result<ClusterId, ModelError> {
        Ok(self(price, seats))
    }
}

/// Model plus label table, with degraded mode when the model failed to load.
#[derive(Clone)]
pub struct Classifier {
    model: Option<Arc<dyn ClusterModel>>,
    labels: ClusterLabelTable,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("model", &self.model.as_ref().map(|m| m.describe()))
            .field("labels", &self.labels.len())
            .finish()
    }
}

impl Classifier {
    pub fn new(model: Option<Arc<dyn ClusterModel>>, labels: ClusterLabelTable) -> Self {
        Self { model, labels }
    }

    /// Classifier with a model and no label table.
    pub fn with_model(model: impl ClusterModel + 'static) -> Self {
        let model: Arc<dyn ClusterModel> = Arc::new(model);
        Self::new(Some(model), ClusterLabelTable::default())
    }

    pub fn with_labels(mut self, labels: ClusterLabelTable) -> Self {
        self.labels = labels;
        self
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Assign a cluster to the given features.
    ///
    /// Fails with [`CatalogError::ModelUnavailable`] when no model was loaded
    /// and with [`CatalogError::InvalidInput`] for non-finite features.
    pub fn classify(&self, price: f64, seats: f64) -> CatalogResult<ClusterId> {
        let model = self.model.as_ref().ok_or(CatalogError::ModelUnavailable)?;
        if !price.is_finite() || !seats.is_finite() {
            return Err(CatalogError::InvalidInput(format!(
                "features must be finite numbers (price: {price}, seats: {seats})"
            )));
        }
        let id = model.predict(price, seats)?;
        tracing::debug!("[classifier] ({price}, {seats}) -> cluster {id}");
        Ok(id)
    }

    /// Display name for a cluster, `"Cluster {id}"` when unmapped.
    pub fn label_of(&self, id: ClusterId) -> String {
        self.labels.label_of(id)
    }

    pub fn labels(&self) -> &ClusterLabelTable {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn seats_model() -> impl ClusterModel {
        |_price: f64, seats: f64| ClusterId(if seats > 5.0 { 1 } else { 0 })
    }

    #[test]
    fn test_classify_delegates_to_model() {
        let classifier = Classifier::with_model(seats_model());
        assert!(classifier.is_available());
        assert_eq!(classifier.classify(20000.0, 7.0).unwrap(), ClusterId(1));
        assert_eq!(classifier.classify(20000.0, 4.0).unwrap(), ClusterId(0));
    }

    #[test]
    fn test_unavailable_model() {
        let classifier = Classifier::new(None, ClusterLabelTable::default());
        assert!(!classifier.is_available());
        assert!(matches!(
            classifier.classify(1.0, 1.0),
            Err(CatalogError::ModelUnavailable)
        ));
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let classifier = Classifier::with_model(seats_model());
        assert!(matches!(
            classifier.classify(f64::NAN, 4.0),
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            classifier.classify(1.0, f64::INFINITY),
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_label_of_uses_table_with_fallback() {
        let labels = ClusterLabelTable::from(HashMap::from([(ClusterId(0), "Budget".to_string())]));
        let classifier = Classifier::with_model(seats_model()).with_labels(labels);
        assert_eq!(classifier.label_of(ClusterId(0)), "Budget");
        assert_eq!(classifier.label_of(ClusterId(9)), "Cluster 9");
    }

    #[test]
    fn test_model_error_propagates() {
        struct Failing;
        impl ClusterModel for Failing {
            fn predict(&self, price: f64, seats: f64) -> Result<ClusterId, ModelError> {
                Err(ModelError::Prediction {
                    price,
                    seats,
                    reason: "no centroids".into(),
                })
            }
        }
        let classifier = Classifier::with_model(Failing);
        assert!(matches!(
            classifier.classify(1.0, 2.0),
            Err(CatalogError::Model(_))
        ));
    }
}
