//! Static `ClusterId -> display name` table.

use std::collections::HashMap;
use std::path::Path;

use super::ClusterId;
use crate::error::{Asset, CatalogError, CatalogResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterLabelTable {
    labels: HashMap<ClusterId, String>,
}

impl ClusterLabelTable {
    /// Load from a JSON object keyed by stringified ids, e.g. `{"0": "Budget"}`.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::MissingAsset {
                    asset: Asset::Labels,
                    path: path.to_path_buf(),
                }
            } else {
                CatalogError::store(path, e)
            }
        })?;
        Self::from_json(&content).map_err(|e| CatalogError::corrupt(path, e))
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<i64, String> = serde_json::from_str(content)?;
        Ok(Self {
            labels: raw.into_iter().map(|(k, v)| (ClusterId(k), v)).collect(),
        })
    }

    /// Mapped name, or `"Cluster {id}"` when the id is absent or maps to a blank name.
    pub fn label_of(&self, id: ClusterId) -> String {
        match self.labels.get(&id) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Cluster {id}"),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<HashMap<ClusterId, String>> for ClusterLabelTable {
    fn from(labels: HashMap<ClusterId, String>) -> Self {
        Self { labels }
    }
}
