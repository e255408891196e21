//! Remote data service contract.
//!
//! Every feature atom (notes, todos, bookmarks, calendar events, playlists)
//! reads and writes rows through this trait. Rows are untyped JSON objects;
//! typed access lives in [`RemoteCollection`](crate::RemoteCollection).

use std::cmp::Ordering;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::error::StoreResult;

/// A single remote row (a JSON object).
pub type Row = Value;

/// Column equality filter.
///
/// An empty filter matches every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Create a filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column == value` condition.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Conditions in insertion order.
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Check whether a row satisfies every condition.
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Sort order for `select`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    /// Column to sort by
    pub column: String,
    /// Ascending when true
    pub ascending: bool,
}

impl Order {
    /// Ascending order on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    /// Compare two rows by this order's column.
    ///
    /// Missing columns sort first. Numbers compare numerically, strings
    /// lexically, everything else by its JSON text.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ord = compare_values(a.get(&self.column), b.get(&self.column));
        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Asynchronous, fallible row store.
pub trait RemoteDataService {
    /// Fetch rows matching `filter`, optionally sorted.
    fn select<'a>(
        &'a self,
        table: &'a str,
        filter: &'a Filter,
        order: Option<&'a Order>,
    ) -> LocalBoxFuture<'a, StoreResult<Vec<Row>>>;

    /// Insert a row, returning the stored row (with any assigned id).
    fn insert<'a>(&'a self, table: &'a str, row: Row) -> LocalBoxFuture<'a, StoreResult<Row>>;

    /// Merge `patch` into rows matching `filter`, returning the first updated row.
    fn update<'a>(
        &'a self,
        table: &'a str,
        filter: &'a Filter,
        patch: Row,
    ) -> LocalBoxFuture<'a, StoreResult<Row>>;

    /// Delete rows matching `filter`.
    fn delete<'a>(&'a self, table: &'a str, filter: &'a Filter) -> LocalBoxFuture<'a, StoreResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches() {
        let row = json!({"id": "1", "done": false, "title": "milk"});

        assert!(Filter::new().matches(&row));
        assert!(Filter::new().where_eq("id", "1").matches(&row));
        assert!(Filter::new().where_eq("id", "1").where_eq("done", false).matches(&row));
        assert!(!Filter::new().where_eq("done", true).matches(&row));
        assert!(!Filter::new().where_eq("missing", 1).matches(&row));
    }

    #[test]
    fn test_order_compare() {
        let a = json!({"pos": 1, "name": "b"});
        let b = json!({"pos": 2, "name": "a"});

        assert_eq!(Order::asc("pos").compare(&a, &b), Ordering::Less);
        assert_eq!(Order::desc("pos").compare(&a, &b), Ordering::Greater);
        assert_eq!(Order::asc("name").compare(&a, &b), Ordering::Greater);
        assert_eq!(Order::asc("missing").compare(&a, &b), Ordering::Equal);
    }
}
