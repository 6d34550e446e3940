//! Entity store — named record collections over an embedded SQLite file.
//!
//! Each collection is persisted as a single JSON document keyed by name,
//! mirroring the key-value layout the UI shell expects, plus a shared id
//! sequence for monotonic record ids. A corrupted or unreadable collection
//! degrades to an empty one with a warning instead of failing the caller;
//! the store is a local cache of business records, not a durable ledger.
//!
//! All access goes through [`EntityStore::lock`]: the returned guard holds
//! the connection mutex, so a repository's whole read-validate-write cycle
//! runs serialized against any other writer.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Pet, RecordId, Service};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Collection keys, one per record family.
pub mod collections {
    pub const APPOINTMENTS: &str = "appointments";
    pub const PETS: &str = "pets";
    pub const SERVICES: &str = "services";
}

/// Issued ids start above the seeded sample records.
const ID_SEQUENCE_START: i64 = 100;

/// Embedded store for all record collections plus the shared id sequence.
pub struct EntityStore {
    conn: Mutex<Connection>,
}

impl EntityStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Acquire exclusive access to the store.
    ///
    /// Held for the duration of a repository operation so that concurrent
    /// mutations cannot both validate against the same stale snapshot.
    pub fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            conn: self.conn.lock().unwrap_or_else(|e| e.into_inner()),
        }
    }

    /// Populate the pet and service catalogs with the sample records the
    /// application ships with. Collections that already hold data are left
    /// alone.
    pub fn seed_defaults(&self) {
        let store = self.lock();

        if store.load::<Service>(collections::SERVICES).is_empty() {
            store.save(
                collections::SERVICES,
                &[
                    Service { id: 1, name: "Banho".into(), duration: 60, price: 60.0 },
                    Service { id: 2, name: "Tosa".into(), duration: 90, price: 90.0 },
                    Service { id: 3, name: "Banho + Tosa".into(), duration: 120, price: 140.0 },
                ],
            );
        }

        if store.load::<Pet>(collections::PETS).is_empty() {
            store.save(
                collections::PETS,
                &[
                    Pet {
                        id: 1,
                        name: "Rex".into(),
                        owner_id: Some(10),
                        owner_name: "Ana Silva".into(),
                        breed: "Golden Retriever".into(),
                        notes: "Muito carinhoso".into(),
                    },
                    Pet {
                        id: 2,
                        name: "Mia".into(),
                        owner_id: Some(11),
                        owner_name: "João Santos".into(),
                        breed: "Poodle".into(),
                        notes: "Precisa de tosa frequente".into(),
                    },
                ],
            );
        }
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         CREATE TABLE IF NOT EXISTS collections (
             key TEXT PRIMARY KEY,
             data TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS id_sequence (
             id INTEGER PRIMARY KEY CHECK (id = 0),
             last_id INTEGER NOT NULL
         );",
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO id_sequence (id, last_id) VALUES (0, ?1)",
        params![ID_SEQUENCE_START],
    )?;
    Ok(())
}

/// Exclusive handle to the store. Load/save/next_id all go through here.
pub struct StoreGuard<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl StoreGuard<'_> {
    /// Load a collection. Missing, unreadable, or corrupted collections
    /// degrade to an empty one — callers never see storage failures here.
    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        match self.try_load(collection) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(collection, error = %e, "failed to load collection, falling back to empty");
                Vec::new()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM collections WHERE key = ?1",
                params![collection],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace a collection's contents. Failures are logged and swallowed;
    /// the previous contents stay in place.
    pub fn save<T: Serialize>(&self, collection: &str, records: &[T]) {
        if let Err(e) = self.try_save(collection, records) {
            tracing::warn!(collection, error = %e, "failed to save collection");
        }
    }

    fn try_save<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        self.conn.execute(
            "INSERT INTO collections (key, data) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET data = excluded.data",
            params![collection, json],
        )?;
        Ok(())
    }

    /// Issue the next id from the shared sequence.
    ///
    /// Unlike load/save this propagates failure: fabricating an id locally
    /// could reuse one already handed out.
    pub fn next_id(&self) -> Result<RecordId, StoreError> {
        let id = self.conn.query_row(
            "UPDATE id_sequence SET last_id = last_id + 1 WHERE id = 0 RETURNING last_id",
            [],
            |row| row.get(0),
        )?;
        Ok(id)
    }
}
