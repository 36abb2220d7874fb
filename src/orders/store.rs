//! JSON-backed, append-only order list.

use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use super::record::OrderRecord;
use crate::error::{CatalogError, CatalogResult};
use crate::paging::{Page, paginate};
use crate::persist::write_atomic;

#[derive(Debug)]
pub struct OrderStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl OrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Orders in insertion order. A missing file is an empty list.
    pub fn load_all(&self) -> CatalogResult<Vec<OrderRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CatalogError::store(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| CatalogError::corrupt(&self.path, e))
    }

    /// Append one order and rewrite the file. Returns the new order count.
    pub fn append(&self, order: OrderRecord) -> CatalogResult<usize> {
        let _guard = self.write_lock.lock();

        let mut orders = self.load_all()?;
        orders.push(order);

        let json = serde_json::to_vec_pretty(&orders)
            .map_err(|e| CatalogError::corrupt(&self.path, e))?;
        write_atomic(&self.path, &json).map_err(|e| CatalogError::store(&self.path, e))?;

        crate::log_event!("orders", "appended", "{} orders total", orders.len());
        Ok(orders.len())
    }

    /// Newest first; equal timestamps keep insertion order.
    pub fn list_descending(
        &self,
        page: usize,
        page_size: NonZeroUsize,
    ) -> CatalogResult<Page<OrderRecord>> {
        let mut orders = self.load_all()?;
        // `sort_by` is stable
        orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(paginate(&orders, page, page_size))
    }
}
