//! Typed remote collection (feature atom).
//!
//! A [`RemoteCollection`] mirrors one remote table in local state. Every
//! mutation is optimistic: the local list changes first, the remote write
//! follows, and a failed write restores the previous list and records the
//! error in the collection's [`ErrorSlot`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::optimistic::{with_optimistic_update, ErrorSlot};
use crate::remote::{Filter, Order, RemoteDataService, Row};

/// A row type stored in a [`RemoteCollection`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Stable row identifier (the remote `id` column).
    fn id(&self) -> &str;
}

/// Local mirror of one remote table.
pub struct RemoteCollection<T: Record> {
    table: String,
    service: Rc<dyn RemoteDataService>,
    order: Option<Order>,
    items: RefCell<Vec<T>>,
    errors: ErrorSlot,
}

impl<T: Record> RemoteCollection<T> {
    /// Create an empty collection over `table`.
    pub fn new(table: impl Into<String>, service: Rc<dyn RemoteDataService>) -> Self {
        Self {
            table: table.into(),
            service,
            order: None,
            items: RefCell::new(Vec::new()),
            errors: ErrorSlot::new(),
        }
    }

    /// Sort fetched rows by `order`.
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    /// Error slot observed by the UI.
    pub fn errors(&self) -> &ErrorSlot {
        &self.errors
    }

    /// Replace local items with the remote table contents.
    ///
    /// Rows that fail to deserialize are skipped.
    pub async fn refresh(&self) -> StoreResult<()> {
        let filter = Filter::new();
        let rows = match self
            .service
            .select(&self.table, &filter, self.order.as_ref())
            .await
        {
            Ok(rows) => rows,
            Err(err) => return Err(self.report(err)),
        };

        let items: Vec<T> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(table = %self.table, %err, "skipping malformed row");
                    None
                }
            })
            .collect();

        debug!(table = %self.table, count = items.len(), "collection refreshed");
        *self.items.borrow_mut() = items;
        Ok(())
    }

    /// Append an item and insert it remotely.
    ///
    /// On success the local item is replaced by the stored row.
    pub async fn add(&self, item: T) -> StoreResult<()> {
        let row = self.encode(&item)?;
        let local_id = item.id().to_string();
        let service = Rc::clone(&self.service);
        let table = self.table.clone();

        let stored = with_optimistic_update(
            &self.items,
            |items| items.push(item),
            || async move { service.insert(&table, row).await },
        )
        .await
        .map_err(|err| self.report(err))?;

        match serde_json::from_value::<T>(stored) {
            Ok(stored) => {
                let mut items = self.items.borrow_mut();
                if let Some(slot) = items.iter_mut().find(|i| i.id() == local_id) {
                    *slot = stored;
                }
            }
            Err(err) => warn!(table = %self.table, %err, "stored row did not decode"),
        }
        Ok(())
    }

    /// Replace the item with the same id and update it remotely.
    pub async fn update(&self, item: T) -> StoreResult<()> {
        let id = item.id().to_string();
        if !self.items.borrow().iter().any(|i| i.id() == id) {
            return Err(self.report(StoreError::RowNotFound {
                table: self.table.clone(),
            }));
        }

        let patch = self.encode(&item)?;
        let service = Rc::clone(&self.service);
        let table = self.table.clone();
        let filter = Filter::new().where_eq("id", id.clone());

        with_optimistic_update(
            &self.items,
            |items| {
                if let Some(slot) = items.iter_mut().find(|i| i.id() == id) {
                    *slot = item;
                }
            },
            || async move { service.update(&table, &filter, patch).await },
        )
        .await
        .map(|_| ())
        .map_err(|err| self.report(err))
    }

    /// Remove the item with `id` locally and remotely.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let service = Rc::clone(&self.service);
        let table = self.table.clone();
        let filter = Filter::new().where_eq("id", id);

        with_optimistic_update(
            &self.items,
            |items| items.retain(|i| i.id() != id),
            || async move { service.delete(&table, &filter).await },
        )
        .await
        .map_err(|err| self.report(err))
    }

    fn encode(&self, item: &T) -> StoreResult<Row> {
        serde_json::to_value(item).map_err(|err| self.report(err.into()))
    }

    fn report(&self, err: StoreError) -> StoreError {
        self.errors.set(err.clone());
        err
    }
}
