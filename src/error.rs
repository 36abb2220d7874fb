//! Error taxonomy shared by every catalog operation.
//!
//! Three families are kept apart so callers can message them differently:
//! missing assets (degraded startup), invalid input (user-correctable), and
//! store failures (I/O or corrupt files).

use std::path::PathBuf;
use thiserror::Error;

use crate::classifier::ModelError;
use crate::normalize::NormalizeError;

/// Which persisted artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Dataset,
    Labels,
    Model,
    Orders,
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dataset => "dataset",
            Self::Labels => "cluster labels",
            Self::Model => "cluster model",
            Self::Orders => "orders",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{asset} not found at {}", path.display())]
    MissingAsset { asset: Asset, path: PathBuf },

    #[error("Classification model is not loaded")]
    ModelUnavailable,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to access {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt file {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl CatalogError {
    pub fn store(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Store {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors the user can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// True when a subsystem is degraded for the process lifetime.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::MissingAsset { .. } | Self::ModelUnavailable)
    }
}

impl From<NormalizeError> for CatalogError {
    fn from(err: NormalizeError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
