//! Persistence layer for webtop
//!
//! Two kinds of storage back the desktop's feature windows:
//!
//! - **Local sink** ([`LocalStore`]): synchronous key-value storage for
//!   session-like state that must survive a reload (playback position,
//!   volume, queue, UI settings). Every caller tolerates a missing value.
//! - **Remote data service** ([`RemoteDataService`]): asynchronous, fallible
//!   row storage used by notes, todos, bookmarks, calendar events and
//!   playlists.
//!
//! Feature atoms mutate local state first and roll back when the remote
//! write fails ([`with_optimistic_update`]). Failures surface through an
//! observable [`ErrorSlot`] rather than propagating into the UI layer.
//!
//! ## Example
//!
//! ```rust
//! use webtop_store::{load_json, save_json, LocalStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! save_json(&store, "webtop.volume", &0.5f64).unwrap();
//! assert_eq!(load_json::<f64>(&store, "webtop.volume"), Some(0.5));
//! assert_eq!(load_json::<f64>(&store, "webtop.missing"), None);
//! ```

pub mod collection;
pub mod error;
pub mod local;
pub mod memory;
pub mod optimistic;
pub mod remote;

#[cfg(feature = "wasm")]
mod web;
#[cfg(feature = "wasm")]
pub use web::WebStorage;

pub use collection::{Record, RemoteCollection};
pub use error::{StoreError, StoreResult};
pub use local::{load_json, save_json, LocalStore, MemoryStore, NullStore};
pub use memory::MemoryDataService;
pub use optimistic::{with_optimistic_update, ErrorSlot};
pub use remote::{Filter, Order, RemoteDataService, Row};
