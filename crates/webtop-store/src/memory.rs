//! In-memory remote data service for testing.
//!
//! Tables are created on first insert. Rows without an `id` column get a
//! sequential string id. Failures can be injected per call to exercise
//! rollback paths.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use futures::future::{self, LocalBoxFuture};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::remote::{Filter, Order, RemoteDataService, Row};

/// In-memory [`RemoteDataService`].
#[derive(Debug, Default)]
pub struct MemoryDataService {
    tables: RefCell<BTreeMap<String, Vec<Row>>>,
    next_id: Cell<u64>,
    /// Number of upcoming calls that fail with a remote error
    fail_next: Cell<u32>,
}

impl MemoryDataService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail.
    pub fn fail_next(&self, count: u32) {
        self.fail_next.set(count);
    }

    /// Snapshot of a table's rows (empty when the table does not exist).
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }

    /// Consume one injected failure, if any.
    fn injected_failure(&self) -> StoreResult<()> {
        let remaining = self.fail_next.get();
        if remaining > 0 {
            self.fail_next.set(remaining - 1);
            return Err(StoreError::remote("injected failure"));
        }
        Ok(())
    }

    fn do_select(&self, table: &str, filter: &Filter, order: Option<&Order>) -> StoreResult<Vec<Row>> {
        self.injected_failure()?;
        let tables = self.tables.borrow();
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut selected: Vec<Row> = rows.iter().filter(|r| filter.matches(r)).cloned().collect();
        if let Some(order) = order {
            selected.sort_by(|a, b| order.compare(a, b));
        }
        Ok(selected)
    }

    fn do_insert(&self, table: &str, mut row: Row) -> StoreResult<Row> {
        self.injected_failure()?;
        let Some(object) = row.as_object_mut() else {
            return Err(StoreError::SerializationError(
                "row must be a JSON object".to_string(),
            ));
        };

        if !object.contains_key("id") {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            object.insert("id".to_string(), Value::String(id.to_string()));
        }

        self.tables
            .borrow_mut()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn do_update(&self, table: &str, filter: &Filter, patch: Row) -> StoreResult<Row> {
        self.injected_failure()?;
        let Some(patch) = patch.as_object() else {
            return Err(StoreError::SerializationError(
                "patch must be a JSON object".to_string(),
            ));
        };

        let mut tables = self.tables.borrow_mut();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let mut first = None;
        for row in rows.iter_mut().filter(|r| filter.matches(r)) {
            if let Some(object) = row.as_object_mut() {
                for (key, value) in patch {
                    object.insert(key.clone(), value.clone());
                }
            }
            if first.is_none() {
                first = Some(row.clone());
            }
        }

        first.ok_or_else(|| StoreError::RowNotFound {
            table: table.to_string(),
        })
    }

    fn do_delete(&self, table: &str, filter: &Filter) -> StoreResult<()> {
        self.injected_failure()?;
        let mut tables = self.tables.borrow_mut();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        rows.retain(|r| !filter.matches(r));
        Ok(())
    }
}

impl RemoteDataService for MemoryDataService {
    fn select<'a>(
        &'a self,
        table: &'a str,
        filter: &'a Filter,
        order: Option<&'a Order>,
    ) -> LocalBoxFuture<'a, StoreResult<Vec<Row>>> {
        Box::pin(future::ready(self.do_select(table, filter, order)))
    }

    fn insert<'a>(&'a self, table: &'a str, row: Row) -> LocalBoxFuture<'a, StoreResult<Row>> {
        Box::pin(future::ready(self.do_insert(table, row)))
    }

    fn update<'a>(
        &'a self,
        table: &'a str,
        filter: &'a Filter,
        patch: Row,
    ) -> LocalBoxFuture<'a, StoreResult<Row>> {
        Box::pin(future::ready(self.do_update(table, filter, patch)))
    }

    fn delete<'a>(&'a self, table: &'a str, filter: &'a Filter) -> LocalBoxFuture<'a, StoreResult<()>> {
        Box::pin(future::ready(self.do_delete(table, filter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_insert_assigns_ids() {
        let service = MemoryDataService::new();

        let a = block_on(service.insert("notes", json!({"title": "a"}))).unwrap();
        let b = block_on(service.insert("notes", json!({"id": "custom", "title": "b"}))).unwrap();

        assert_eq!(a["id"], "1");
        assert_eq!(b["id"], "custom");
        assert_eq!(service.rows("notes").len(), 2);
    }

    #[test]
    fn test_select_filters_and_orders() {
        let service = MemoryDataService::new();
        block_on(service.insert("todos", json!({"pos": 2, "done": false}))).unwrap();
        block_on(service.insert("todos", json!({"pos": 1, "done": false}))).unwrap();
        block_on(service.insert("todos", json!({"pos": 3, "done": true}))).unwrap();

        let filter = Filter::new().where_eq("done", false);
        let order = Order::asc("pos");
        let rows = block_on(service.select("todos", &filter, Some(&order))).unwrap();

        let positions: Vec<i64> = rows.iter().map(|r| r["pos"].as_i64().unwrap()).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_select_unknown_table() {
        let service = MemoryDataService::new();
        let result = block_on(service.select("nope", &Filter::new(), None));
        assert_eq!(result, Err(StoreError::TableNotFound("nope".to_string())));
    }

    #[test]
    fn test_update_merges_patch() {
        let service = MemoryDataService::new();
        block_on(service.insert("todos", json!({"id": "t1", "done": false, "title": "x"}))).unwrap();

        let filter = Filter::new().where_eq("id", "t1");
        let row = block_on(service.update("todos", &filter, json!({"done": true}))).unwrap();

        assert_eq!(row["done"], true);
        assert_eq!(row["title"], "x");

        let missing = Filter::new().where_eq("id", "t2");
        let result = block_on(service.update("todos", &missing, json!({"done": true})));
        assert!(matches!(result, Err(StoreError::RowNotFound { .. })));
    }

    #[test]
    fn test_delete_and_injected_failure() {
        let service = MemoryDataService::new();
        block_on(service.insert("bookmarks", json!({"id": "b1"}))).unwrap();

        service.fail_next(1);
        let filter = Filter::new().where_eq("id", "b1");
        assert!(block_on(service.delete("bookmarks", &filter)).is_err());
        assert_eq!(service.rows("bookmarks").len(), 1);

        block_on(service.delete("bookmarks", &filter)).unwrap();
        assert!(service.rows("bookmarks").is_empty());
    }
}
