//! CSV-backed vehicle catalog.
//!
//! The dataset is read in full on every load and rewritten in full on every
//! append. Appends are serialized by a per-store lock so concurrent writers
//! cannot drop each other's rows.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use super::record::{RECORD_COLUMNS, VehicleRecord};
use crate::classifier::ClusterId;
use crate::error::{Asset, CatalogError, CatalogResult};
use crate::persist::write_atomic;

#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// All records in storage order.
    pub fn load_all(&self) -> CatalogResult<Vec<VehicleRecord>> {
        let table = self.read_table()?;
        let records = table.records(&self.path)?;
        crate::debug_event!("catalog", "loaded", "{} records", records.len());
        Ok(records)
    }

    /// Append one record and rewrite the dataset. Returns the new record count.
    ///
    /// Columns the record does not model are written back unchanged, and the
    /// new row leaves them empty.
    pub fn append(&self, record: VehicleRecord) -> CatalogResult<usize> {
        let _guard = self.write_lock.lock();

        let table = self.read_table()?;
        let existing = table.records(&self.path)?;
        let count = existing.len() + 1;
        self.write_table(&table, &existing, &record)?;

        crate::log_event!("catalog", "appended", "{count} records total");
        Ok(count)
    }

    fn read_table(&self) -> CatalogResult<RawTable> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::MissingAsset {
                    asset: Asset::Dataset,
                    path: self.path.clone(),
                }
            } else {
                CatalogError::store(&self.path, e)
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(bytes.as_slice());

        let headers = reader
            .headers()
            .map_err(|e| CatalogError::corrupt(&self.path, e))?
            .clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::corrupt(&self.path, e))?;

        Ok(RawTable { headers, rows })
    }

    fn write_table(
        &self,
        table: &RawTable,
        existing: &[VehicleRecord],
        appended: &VehicleRecord,
    ) -> CatalogResult<()> {
        // Original header order first, then any modelled column the file lacked
        let original = table.headers.len();
        let mut header: Vec<&str> = table.headers.iter().collect();
        for column in RECORD_COLUMNS {
            if !header.contains(&column) {
                header.push(column);
            }
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&header)
            .map_err(|e| CatalogError::corrupt(&self.path, e))?;

        for (row, record) in table.rows.iter().zip(existing) {
            let fields = header.iter().enumerate().map(|(i, column)| {
                if i < original {
                    row.get(i).unwrap_or_default().to_string()
                } else {
                    record.column_value(column).unwrap_or_default()
                }
            });
            writer
                .write_record(fields)
                .map_err(|e| CatalogError::corrupt(&self.path, e))?;
        }

        let fields = header
            .iter()
            .map(|column| appended.column_value(column).unwrap_or_default());
        writer
            .write_record(fields)
            .map_err(|e| CatalogError::corrupt(&self.path, e))?;

        let bytes = writer
            .into_inner()
            .map_err(|e| CatalogError::store(&self.path, e.into_error()))?;

        write_atomic(&self.path, &bytes).map_err(|e| CatalogError::store(&self.path, e))
    }
}

/// The dataset as read from disk: headers plus untyped rows.
struct RawTable {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
}

impl RawTable {
    fn records(&self, path: &Path) -> CatalogResult<Vec<VehicleRecord>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record: VehicleRecord = row
                    .deserialize(Some(&self.headers))
                    .map_err(|e| CatalogError::corrupt(path, e))?;
                record.ensure_full_name();
                Ok(record)
            })
            .collect()
    }
}

/// Records assigned to `cluster_id`, in their original order.
pub fn filter_by_cluster(records: &[VehicleRecord], cluster_id: ClusterId) -> Vec<VehicleRecord> {
    records
        .iter()
        .filter(|r| r.cluster_id == cluster_id)
        .cloned()
        .collect()
}
