//! The weapon registry.
//!
//! [`WeaponRegistry`] owns the authoritative, insertion-ordered collection of
//! [`WeaponRecord`]s. Reads are served from memory. Every mutation updates the
//! in-memory snapshot first and then queues the full serialized collection on
//! a [`PersistenceWriter`], so callers never wait on storage.
//!
//! Storage problems never reach callers: a failed or slow load starts the
//! registry empty, and a failed write is logged while the in-memory state
//! stays authoritative for the rest of the process.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::store::{PersistentStore, WEAPONS_KEY};
use crate::weapon::{WeaponInput, WeaponRecord};
use crate::writer::PersistenceWriter;

/// Default upper bound on the initial load.
const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`WeaponRegistry::load_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Store key holding the serialized collection.
    pub key: String,
    /// How long to wait for the store before starting empty.
    pub load_timeout: Duration,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            key: WEAPONS_KEY.to_string(),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

impl From<&Config> for RegistryOptions {
    fn from(config: &Config) -> Self {
        Self {
            key: config.storage.key.clone(),
            load_timeout: config.load_timeout(),
        }
    }
}

/// Summary counts over the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of records.
    pub total: usize,
    /// Records currently in inventory.
    pub available: usize,
    /// Records currently checked out.
    pub issued: usize,
    /// Earliest `date_added`.
    pub oldest: Option<DateTime<Utc>>,
    /// Latest `date_added`.
    pub newest: Option<DateTime<Utc>>,
}

/// In-memory weapon collection mirrored to a [`PersistentStore`].
///
/// Construct one at startup with [`WeaponRegistry::load`] and pass it to
/// whatever needs it. Mutations take `&mut self`; there is exactly one writer.
#[derive(Debug)]
pub struct WeaponRegistry {
    weapons: Vec<WeaponRecord>,
    writer: PersistenceWriter,
}

impl WeaponRegistry {
    /// Load the registry from `store` using default options.
    ///
    /// Never fails: any problem reading the store yields an empty registry.
    pub async fn load(store: Arc<dyn PersistentStore>) -> Self {
        Self::load_with(store, RegistryOptions::default()).await
    }

    /// Load the registry from `store` with explicit options.
    pub async fn load_with(store: Arc<dyn PersistentStore>, options: RegistryOptions) -> Self {
        let weapons = load_weapons(store.as_ref(), &options).await;
        let writer = PersistenceWriter::spawn(store, options.key);
        Self { weapons, writer }
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[WeaponRecord] {
        &self.weapons
    }

    /// Records matching `query`, in insertion order.
    ///
    /// An empty or whitespace-only query returns everything. Otherwise a
    /// record matches when its serial number, model, first name or last name
    /// contains the query, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<WeaponRecord> {
        if query.trim().is_empty() {
            return self.weapons.clone();
        }

        let needle = query.to_lowercase();
        self.weapons
            .iter()
            .filter(|weapon| weapon.matches(&needle))
            .cloned()
            .collect()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WeaponRecord> {
        self.weapons.iter().find(|weapon| weapon.id == id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    /// Check if the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Register a new weapon and return the stored record.
    ///
    /// The record gets a fresh id, the current time as `date_added`, and
    /// `available` unless the input names a status. Field contents are not
    /// validated.
    pub fn add(&mut self, input: WeaponInput) -> WeaponRecord {
        let record = WeaponRecord::new(self.fresh_id(), input);
        debug!(id = %record.id, "Adding weapon");
        self.weapons.push(record.clone());
        self.persist();
        record
    }

    /// Replace the editable fields of the record with `id`.
    ///
    /// Unknown ids leave the collection unchanged; it is persisted anyway.
    pub fn update(&mut self, id: &str, input: WeaponInput) {
        match self.position(id) {
            Some(index) => {
                debug!(id, "Updating weapon");
                self.weapons[index].apply(input);
            }
            None => warn!(id, "Update ignored: no weapon with this id"),
        }
        self.persist();
    }

    /// Flip the status of the record with `id` between available and issued.
    pub fn toggle_status(&mut self, id: &str) {
        match self.position(id) {
            Some(index) => {
                let weapon = &mut self.weapons[index];
                weapon.status = weapon.status.toggled();
                debug!(id, status = %weapon.status, "Toggled weapon status");
            }
            None => warn!(id, "Status toggle ignored: no weapon with this id"),
        }
        self.persist();
    }

    /// Permanently remove the record with `id`.
    pub fn delete(&mut self, id: &str) {
        let before = self.weapons.len();
        self.weapons.retain(|weapon| weapon.id != id);
        if self.weapons.len() == before {
            warn!(id, "Delete ignored: no weapon with this id");
        } else {
            debug!(id, "Deleted weapon");
        }
        self.persist();
    }

    /// Counts by status and the range of `date_added`.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let issued = self.weapons.iter().filter(|w| w.is_issued()).count();
        RegistryStats {
            total: self.weapons.len(),
            available: self.weapons.len() - issued,
            issued,
            oldest: self.weapons.iter().map(|w| w.date_added).min(),
            newest: self.weapons.iter().map(|w| w.date_added).max(),
        }
    }

    /// Wait until every mutation made so far has reached the store.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Drain pending writes and stop the writer.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.weapons.iter().position(|weapon| weapon.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.weapons) {
            Ok(blob) => self.writer.save(blob),
            Err(e) => error!("Error serializing weapons: {e}"),
        }
    }
}

async fn load_weapons(store: &dyn PersistentStore, options: &RegistryOptions) -> Vec<WeaponRecord> {
    let stored = match tokio::time::timeout(options.load_timeout, store.get(&options.key)).await {
        Ok(Ok(Some(blob))) => blob,
        Ok(Ok(None)) => {
            debug!(key = %options.key, "No stored weapons; starting empty");
            return Vec::new();
        }
        Ok(Err(e)) => {
            error!("Error loading weapons: {e}");
            return Vec::new();
        }
        Err(_) => {
            warn!(timeout = ?options.load_timeout, "Loading weapons timed out; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<WeaponRecord>>(&stored) {
        Ok(mut weapons) => {
            dedupe_ids(&mut weapons);
            info!(count = weapons.len(), "Loaded weapons");
            weapons
        }
        Err(e) => {
            error!("Error loading weapons: {e}");
            Vec::new()
        }
    }
}

/// Give any record whose id repeats an earlier one a fresh id.
fn dedupe_ids(weapons: &mut [WeaponRecord]) {
    let mut seen: HashSet<String> = weapons.iter().map(|w| w.id.clone()).collect();
    if seen.len() == weapons.len() {
        return;
    }

    let mut kept = HashSet::new();
    for weapon in weapons.iter_mut() {
        if !kept.insert(weapon.id.clone()) {
            let id = loop {
                let candidate = Uuid::new_v4().to_string();
                if seen.insert(candidate.clone()) {
                    break candidate;
                }
            };
            warn!(old = %weapon.id, new = %id, "Reassigned duplicate weapon id");
            weapon.id = id.clone();
            kept.insert(id);
        }
    }
}
