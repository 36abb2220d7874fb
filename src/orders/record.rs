//! Purchase-intent records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// A recorded buyer submission. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub buyer_name: String,
    pub address: String,
    pub phone: String,
    pub vehicle_full_name: String,
    pub cluster_label: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Client payload for a purchase intent; the server supplies the timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseRequest {
    pub buyer_name: String,
    pub address: String,
    pub phone: String,
    pub vehicle_full_name: String,
    pub cluster_label: String,
}

impl PurchaseRequest {
    pub fn validate(&self) -> CatalogResult<()> {
        let required = [
            ("buyerName", &self.buyer_name),
            ("address", &self.address),
            ("phone", &self.phone),
            ("vehicleFullName", &self.vehicle_full_name),
            ("clusterLabel", &self.cluster_label),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::InvalidInput(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn into_order(self, timestamp: DateTime<Utc>) -> OrderRecord {
        OrderRecord {
            buyer_name: self.buyer_name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            vehicle_full_name: self.vehicle_full_name.trim().to_string(),
            cluster_label: self.cluster_label.trim().to_string(),
            timestamp,
        }
    }
}

/// RFC 3339 on write; also accepts offset-less ISO-8601 timestamps, read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}
