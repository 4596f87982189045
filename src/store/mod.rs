//! Persistent key-value store behind the pantry registries.
//!
//! Backends implement [`KvStore`] and only ever see raw JSON strings. The
//! [`StoreAdapter`] layers typed reads with parse-or-default semantics and a
//! broadcast channel of [`StoreChange`] notifications on top.

pub mod adapter;
pub mod factory;
pub mod file;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use adapter::{StoreAdapter, Subscription, parse_or_default};
pub use factory::create_store;
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KvStore, StoreChange, validate_key};
