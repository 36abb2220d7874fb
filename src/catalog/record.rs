//! Vehicle rows as stored in the dataset CSV and as shown to clients.

use serde::{Deserialize, Serialize};

use crate::classifier::ClusterId;
use crate::error::{CatalogError, CatalogResult};

/// Column headers shown in the catalog listing, in display order.
pub const DISPLAY_COLUMNS: [&str; 12] = [
    "Company Names",
    "Cars Names",
    "Engines",
    "CC/Battery Capacity",
    "HorsePower",
    "Total Speed",
    "Performance(0 - 100 )KM/H",
    "Cars Prices",
    "Fuel Types",
    "Seats",
    "Torque",
    "cluster_name",
];

/// Dataset columns backed by [`VehicleRecord`] fields, in write order.
pub const RECORD_COLUMNS: [&str; 13] = [
    "Company Names",
    "Cars Names",
    "Engines",
    "CC/Battery Capacity",
    "HorsePower",
    "Total Speed",
    "Performance(0 - 100 )KM/H",
    "Cars Prices",
    "Fuel Types",
    "Seats",
    "Torque",
    "cluster",
    "Full Name",
];

/// One dataset row.
///
/// Descriptive fields keep the raw dataset strings; `price` and `seats` are
/// normalized only when a feature vector is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "Company Names")]
    pub company: String,
    #[serde(rename = "Cars Names")]
    pub model: String,
    #[serde(rename = "Engines", default)]
    pub engine: String,
    #[serde(rename = "CC/Battery Capacity", default)]
    pub capacity: String,
    #[serde(rename = "HorsePower", default)]
    pub horsepower: String,
    #[serde(rename = "Total Speed", default)]
    pub top_speed: String,
    #[serde(rename = "Performance(0 - 100 )KM/H", default)]
    pub performance: String,
    #[serde(rename = "Cars Prices")]
    pub price: String,
    #[serde(rename = "Fuel Types", default)]
    pub fuel_type: String,
    #[serde(rename = "Seats")]
    pub seats: String,
    #[serde(rename = "Torque", default)]
    pub torque: String,
    #[serde(rename = "cluster")]
    pub cluster_id: ClusterId,
    /// `"{COMPANY} {MODEL}"`, synthesized on load for rows that predate the column.
    #[serde(rename = "Full Name", default)]
    pub full_name: String,
    /// Looked up from the label table; never persisted.
    #[serde(skip)]
    pub cluster_name: String,
}

impl VehicleRecord {
    /// Build a record from operator input and its assigned cluster.
    pub fn from_input(input: NewVehicle, cluster_id: ClusterId, cluster_name: String) -> Self {
        let full_name = full_name(&input.company, &input.model);
        Self {
            company: input.company.trim().to_string(),
            model: input.model.trim().to_string(),
            engine: input.engine.trim().to_string(),
            capacity: input.capacity.trim().to_string(),
            horsepower: input.horsepower.trim().to_string(),
            top_speed: input.top_speed.trim().to_string(),
            performance: input.performance.trim().to_string(),
            price: input.price.trim().to_string(),
            fuel_type: input.fuel_type.trim().to_string(),
            seats: input.seats.trim().to_string(),
            torque: input.torque.trim().to_string(),
            cluster_id,
            full_name,
            cluster_name,
        }
    }

    /// Fill `full_name` when the stored row left it empty.
    pub(crate) fn ensure_full_name(&mut self) {
        if self.full_name.trim().is_empty() {
            self.full_name = full_name(&self.company, &self.model);
        }
    }

    /// Stored text for one of [`RECORD_COLUMNS`]; `None` for any other header.
    pub fn column_value(&self, column: &str) -> Option<String> {
        let value = match column {
            "Company Names" => &self.company,
            "Cars Names" => &self.model,
            "Engines" => &self.engine,
            "CC/Battery Capacity" => &self.capacity,
            "HorsePower" => &self.horsepower,
            "Total Speed" => &self.top_speed,
            "Performance(0 - 100 )KM/H" => &self.performance,
            "Cars Prices" => &self.price,
            "Fuel Types" => &self.fuel_type,
            "Seats" => &self.seats,
            "Torque" => &self.torque,
            "cluster" => return Some(self.cluster_id.to_string()),
            "Full Name" => &self.full_name,
            _ => return None,
        };
        Some(value.clone())
    }

    pub fn to_row(&self) -> VehicleRow {
        VehicleRow {
            company: self.company.clone(),
            model: self.model.clone(),
            engine: self.engine.clone(),
            capacity: self.capacity.clone(),
            horsepower: self.horsepower.clone(),
            top_speed: self.top_speed.clone(),
            performance: self.performance.clone(),
            price: self.price.clone(),
            fuel_type: self.fuel_type.clone(),
            seats: self.seats.clone(),
            torque: self.torque.clone(),
            cluster_name: self.cluster_name.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Uppercased `"{company} {model}"`.
pub fn full_name(company: &str, model: &str) -> String {
    format!("{} {}", company.trim(), model.trim()).to_uppercase()
}

/// Listing projection: the display columns plus the full name used by purchase forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRow {
    pub company: String,
    pub model: String,
    pub engine: String,
    pub capacity: String,
    pub horsepower: String,
    pub top_speed: String,
    pub performance: String,
    pub price: String,
    pub fuel_type: String,
    pub seats: String,
    pub torque: String,
    pub cluster_name: String,
    pub full_name: String,
}

/// Operator input for a new catalog entry. Every field arrives as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewVehicle {
    pub company: String,
    pub model: String,
    pub engine: String,
    pub capacity: String,
    pub horsepower: String,
    pub top_speed: String,
    pub performance: String,
    pub price: String,
    pub fuel_type: String,
    pub seats: String,
    pub torque: String,
}

impl NewVehicle {
    /// Reject input missing any of the fields needed to identify and classify it.
    pub fn validate(&self) -> CatalogResult<()> {
        let required = [
            ("company", &self.company),
            ("model", &self.model),
            ("price", &self.price),
            ("seats", &self.seats),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewVehicle {
        NewVehicle {
            company: " Toyota ".into(),
            model: "Corolla Cross".into(),
            engine: "1.8L I4".into(),
            price: "$26,000".into(),
            seats: "5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_name_uppercased() {
        assert_eq!(full_name(" Toyota", "Corolla Cross "), "TOYOTA COROLLA CROSS");
    }

    #[test]
    fn test_from_input() {
        let record = VehicleRecord::from_input(input(), ClusterId(2), "Family".into());
        assert_eq!(record.company, "Toyota");
        assert_eq!(record.full_name, "TOYOTA COROLLA CROSS");
        assert_eq!(record.cluster_id, ClusterId(2));
        assert_eq!(record.to_row().cluster_name, "Family");
    }

    #[test]
    fn test_column_value_covers_record_columns() {
        let record = VehicleRecord::from_input(input(), ClusterId(-1), "Family".into());
        for column in RECORD_COLUMNS {
            assert!(record.column_value(column).is_some(), "{column}");
        }
        assert_eq!(record.column_value("cluster").as_deref(), Some("-1"));
        assert_eq!(record.column_value("Cars Prices").as_deref(), Some("$26,000"));
        assert_eq!(record.column_value("Unnamed: 0"), None);
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        assert!(input().validate().is_ok());

        let incomplete = NewVehicle {
            company: "Kia".into(),
            seats: "  ".into(),
            ..Default::default()
        };
        match incomplete.validate() {
            Err(CatalogError::InvalidInput(msg)) => {
                assert_eq!(msg, "missing required fields: model, price, seats");
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_full_name() {
        let mut record = VehicleRecord::from_input(input(), ClusterId(0), String::new());
        record.full_name.clear();
        record.ensure_full_name();
        assert_eq!(record.full_name, "TOYOTA COROLLA CROSS");
    }
}
