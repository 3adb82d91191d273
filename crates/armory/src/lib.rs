//! `armory` - A local weapon inventory registry
//!
//! This library keeps an ordered collection of weapon records in memory,
//! mirrors every change to durable key-value storage, and exposes the
//! create, read, update, delete, search and status-toggle operations a
//! front end needs.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod store;
pub mod weapon;
pub mod writer;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use registry::{RegistryOptions, RegistryStats, WeaponRegistry};
pub use store::{MemoryStore, PersistentStore, SqliteStore, WEAPONS_KEY};
pub use weapon::{WeaponInput, WeaponRecord, WeaponStatus};
pub use writer::PersistenceWriter;
