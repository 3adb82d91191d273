//! Durable key-value storage behind the registry.
//!
//! The registry only needs two operations, reading and writing one blob under
//! a fixed key, so backends implement the small [`PersistentStore`] trait:
//!
//! - [`SqliteStore`]: a `SQLite` file, the default on-device backend
//! - [`MemoryStore`]: a process-local map for tests and throwaway sessions

mod memory;
pub mod migrations;
pub mod schema;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key under which the weapon collection is stored.
pub const WEAPONS_KEY: &str = "weapons";

/// Asynchronous key-value storage for serialized blobs.
#[async_trait]
pub trait PersistentStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`, or `None` if nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
