//! Persistence port: durable and session key-value stores holding JSON blobs.
//!
//! Every collection is stored as a single JSON array under one key and is
//! replaced wholesale on each write, so a reader never observes a partially
//! applied mutation.
//!
//! # Corruption
//!
//! A blob that fails to parse, or is not valid UTF-8, is treated as an empty
//! collection. The raw text is first copied to a `<key>.corrupt` slot so the
//! next write cannot destroy it; each distinct payload gets its own slot.
//! Records that parse as JSON but fail to decode into the canonical schema
//! are carried through [`Collection::retained`] and written back verbatim.

pub mod file;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable key holding the full ticket collection.
pub const TICKETS_KEY: &str = "tickets";
/// Durable key holding the user directory.
pub const USERS_KEY: &str = "helpdesk_all_users";
/// Session key holding the signed-in user view.
pub const SESSION_USER_KEY: &str = "helpdesk_user";
/// Durable key holding the largest ticket id ever assigned.
pub const TICKET_HIGH_WATER_KEY: &str = "tickets_id_high_water";

const QUARANTINE_SUFFIX: &str = ".corrupt";
const MAX_QUARANTINE_SLOTS: usize = 64;

/// Raw string key-value backend.
///
/// Implementations replace a key's value atomically on `set_raw`. A stored
/// value that is not valid UTF-8 is reported as [`StorageError::NotUtf8`].
pub trait KeyValueStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Short backend label used in logs.
    fn backend_name(&self) -> &'static str;
}

/// Which of the two stores a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Survives restarts: users and tickets.
    Durable,
    /// Cleared when the session ends: the current user view.
    Session,
}

/// A durable collection as read back: the records that decoded, plus the raw
/// entries that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub records: Vec<T>,
    /// Entries that failed to decode, kept so a rewrite does not drop them.
    pub retained: Vec<Value>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            retained: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    #[must_use]
    pub const fn new(records: Vec<T>) -> Self {
        Self {
            records,
            retained: Vec::new(),
        }
    }

    /// No records and nothing retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.retained.is_empty()
    }

    /// A field of every retained entry that carries one.
    pub fn retained_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.retained.iter().filter_map(move |entry| entry.get(field))
    }
}

impl<T: Serialize> Collection<T> {
    /// Encoded records followed by the retained entries.
    pub fn to_entries(&self, key: &str) -> Result<Vec<Value>, StorageError> {
        let mut entries = Vec::with_capacity(self.records.len() + self.retained.len());
        for record in &self.records {
            entries.push(
                serde_json::to_value(record).map_err(|source| StorageError::Encode {
                    key: key.to_string(),
                    source,
                })?,
            );
        }
        entries.extend(self.retained.iter().cloned());
        Ok(entries)
    }
}

/// The adapter every other component goes through. Cheap to clone; clones
/// share the same backends.
#[derive(Clone)]
pub struct Persistence {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("durable", &self.durable.backend_name())
            .field("session", &self.session.backend_name())
            .finish()
    }
}

impl Persistence {
    #[must_use]
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Both tiers backed by fresh in-memory maps.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn store(&self, tier: Tier) -> &dyn KeyValueStore {
        match tier {
            Tier::Durable => self.durable.as_ref(),
            Tier::Session => self.session.as_ref(),
        }
    }

    /// Read a JSON value. Unparseable or non-UTF-8 content is quarantined and
    /// reported as absent.
    pub fn get(&self, tier: Tier, key: &str) -> Result<Option<Value>, StorageError> {
        let raw = match self.store(tier).get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(StorageError::NotUtf8 { lossy, .. }) => {
                tracing::warn!(key, "stored blob is not valid UTF-8; treating as empty");
                self.quarantine(tier, key, &lossy);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored JSON is malformed; treating as empty");
                self.quarantine(tier, key, &raw);
                Ok(None)
            }
        }
    }

    pub fn set(&self, tier: Tier, key: &str, value: &Value) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store(tier).set_raw(key, &encoded)
    }

    pub fn remove(&self, tier: Tier, key: &str) -> Result<(), StorageError> {
        self.store(tier).remove(key)
    }

    /// Read a single typed value. A value that does not decode is quarantined
    /// and reported as absent.
    pub fn load_value<T: DeserializeOwned>(
        &self,
        tier: Tier,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let Some(value) = self.get(tier, key)? else {
            return Ok(None);
        };

        match serde_json::from_value::<T>(value.clone()) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value does not match schema");
                self.quarantine(tier, key, &value.to_string());
                Ok(None)
            }
        }
    }

    pub fn save_value<T: Serialize>(
        &self,
        tier: Tier,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_value(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(tier, key, &encoded)
    }

    /// Read a durable collection, failing open to empty on corruption.
    pub fn load_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Collection<T>, StorageError> {
        let Some(value) = self.get(Tier::Durable, key)? else {
            return Ok(Collection::default());
        };

        let Value::Array(entries) = value else {
            tracing::warn!(key, "stored collection is not an array; treating as empty");
            self.quarantine(Tier::Durable, key, &value.to_string());
            return Ok(Collection::default());
        };

        let mut collection = Collection::new(Vec::with_capacity(entries.len()));
        for entry in entries {
            match serde_json::from_value::<T>(entry.clone()) {
                Ok(record) => collection.records.push(record),
                Err(err) => {
                    tracing::warn!(key, error = %err, "retaining record that does not match schema");
                    collection.retained.push(entry);
                }
            }
        }

        tracing::debug!(
            key,
            count = collection.records.len(),
            retained = collection.retained.len(),
            "loaded collection"
        );
        Ok(collection)
    }

    /// Write `collection` back: records first, then retained entries.
    pub fn save_collection<T: Serialize>(
        &self,
        key: &str,
        collection: &Collection<T>,
    ) -> Result<(), StorageError> {
        self.save_entries(key, collection.to_entries(key)?)
    }

    /// Write raw collection entries as one durable blob.
    pub fn save_entries(&self, key: &str, entries: Vec<Value>) -> Result<(), StorageError> {
        self.set(Tier::Durable, key, &Value::Array(entries))
    }

    /// Raw text previously set aside for `key`, oldest first.
    pub fn quarantined(&self, tier: Tier, key: &str) -> Result<Vec<String>, StorageError> {
        let store = self.store(tier);
        let mut kept = Vec::new();
        for slot in 0..MAX_QUARANTINE_SLOTS {
            match store.get_raw(&quarantine_key(key, slot))? {
                Some(raw) => kept.push(raw),
                None => break,
            }
        }
        Ok(kept)
    }

    /// Copy `raw` into the first free slot unless a slot already holds it.
    fn quarantine(&self, tier: Tier, key: &str, raw: &str) {
        let store = self.store(tier);
        for slot in 0..MAX_QUARANTINE_SLOTS {
            let target = quarantine_key(key, slot);
            match store.get_raw(&target) {
                Ok(Some(existing)) if existing == raw => {
                    tracing::debug!(key, target = %target, "unreadable data already quarantined");
                    return;
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    match store.set_raw(&target, raw) {
                        Ok(()) => {
                            tracing::warn!(key, target = %target, "quarantined unreadable data");
                        }
                        Err(err) => {
                            tracing::error!(key, error = %err, "failed to quarantine unreadable data");
                        }
                    }
                    return;
                }
                Err(err) => {
                    tracing::error!(
                        key,
                        target = %target,
                        error = %err,
                        "failed to inspect quarantine slot"
                    );
                    return;
                }
            }
        }
        tracing::error!(
            key,
            slots = MAX_QUARANTINE_SLOTS,
            "quarantine slots exhausted; data not kept"
        );
    }
}

fn quarantine_key(key: &str, slot: usize) -> String {
    if slot == 0 {
        format!("{key}{QUARANTINE_SUFFIX}")
    } else {
        format!("{key}{QUARANTINE_SUFFIX}.{slot}")
    }
}
