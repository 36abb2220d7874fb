//! Portable model artifact: nearest centroid in standardized feature space.
//!
//! The offline training pipeline exports its clusters as JSON:
//!
//! ```json
//! {
//!   "kind": "nearest_centroid",
//!   "scaling": {
//!     "price": { "mean": 52000.0, "std": 41000.0 },
//!     "seats": { "mean": 4.8, "std": 1.3 }
//!   },
//!   "centroids": [
//!     { "cluster": 0, "price": 18000.0, "seats": 5.0 },
//!     { "cluster": 1, "price": 145000.0, "seats": 2.0 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::{ClusterId, ClusterModel, ModelError};
use crate::error::{Asset, CatalogError, CatalogResult};

/// Serialized model artifact, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    NearestCentroid(CentroidModel),
}

impl ModelArtifact {
    pub fn into_model(self) -> Result<Arc<dyn ClusterModel>, ModelError> {
        match self {
            Self::NearestCentroid(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

/// Standardization applied to one feature before measuring distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureScale {
    pub mean: f64,
    pub std: f64,
}

impl Default for FeatureScale {
    fn default() -> Self {
        Self { mean: 0.0, std: 1.0 }
    }
}

impl FeatureScale {
    fn apply(&self, value: f64) -> f64 {
        // A constant feature in training data yields std 0.
        let std = if self.std > 0.0 { self.std } else { 1.0 };
        (value - self.mean) / std
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scaling {
    #[serde(default)]
    pub price: FeatureScale,
    #[serde(default)]
    pub seats: FeatureScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub cluster: ClusterId,
    pub price: f64,
    pub seats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidModel {
    #[serde(default)]
    pub scaling: Scaling,
    pub centroids: Vec<Centroid>,
}

impl CentroidModel {
    pub fn new(scaling: Scaling, centroids: Vec<Centroid>) -> Self {
        Self { scaling, centroids }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.centroids.is_empty() {
            return Err(ModelError::InvalidArtifact("no centroids".to_string()));
        }
        let scales = [self.scaling.price, self.scaling.seats];
        if scales.iter().any(|s| !s.mean.is_finite() || !s.std.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "scaling parameters must be finite".to_string(),
            ));
        }
        if let Some(bad) = self
            .centroids
            .iter()
            .find(|c| !c.price.is_finite() || !c.seats.is_finite())
        {
            return Err(ModelError::InvalidArtifact(format!(
                "centroid for cluster {} has non-finite coordinates",
                bad.cluster
            )));
        }
        Ok(())
    }
}

impl ClusterModel for CentroidModel {
    fn predict(&self, price: f64, seats: f64) -> Result<ClusterId, ModelError> {
        let x = self.scaling.price.apply(price);
        let y = self.scaling.seats.apply(seats);

        let mut best: Option<(ClusterId, f64)> = None;
        for centroid in &self.centroids {
            let dx = x - self.scaling.price.apply(centroid.price);
            let dy = y - self.scaling.seats.apply(centroid.seats);
            let distance = dx * dx + dy * dy;
            // Strict comparison keeps the earliest centroid on ties.
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((centroid.cluster, distance));
            }
        }

        best.map(|(id, _)| id).ok_or_else(|| ModelError::Prediction {
            price,
            seats,
            reason: "model has no centroids".to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("nearest-centroid model ({} centroids)", self.centroids.len())
    }
}

/// Load and validate a model artifact from disk.
pub fn load_model(path: &Path) -> CatalogResult<Arc<dyn ClusterModel>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::MissingAsset {
                asset: Asset::Model,
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::store(path, e)
        }
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&content).map_err(|e| CatalogError::corrupt(path, e))?;
    Ok(artifact.into_model()?)
}
