use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone};

use crate::db::Database;
use crate::models::Entry;

/// Storage key holding the JSON array of entries.
pub const ENTRIES_KEY: &str = "nibbleEntries";

/// In-memory entry list mirrored to durable storage after every mutation.
pub struct EntryStore {
    db: Database,
    entries: Vec<Entry>,
}

impl EntryStore {
    /// Load the persisted entries. Missing or unparseable data yields an
    /// empty log; only storage I/O failures are errors.
    pub fn load(db: Database) -> Result<Self> {
        let entries = match db.get_item(ENTRIES_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Entry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, "stored entries are corrupt, starting with an empty log");
                    Vec::new()
                }
            },
        };
        tracing::debug!(count = entries.len(), "loaded entries");
        Ok(Self { db, entries })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::load(Database::open_in_memory()?)
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries logged on `day` (local calendar day), in insertion order.
    #[must_use]
    pub fn entries_on(&self, day: NaiveDate) -> Vec<&Entry> {
        crate::calendar::entries_for_day(&self.entries, day)
    }

    /// Append an entry and persist. Ids are not checked for uniqueness.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        let mut next = self.entries.clone();
        tracing::debug!(id = %entry.id, food = %entry.food_name, "adding entry");
        next.push(entry);
        self.persist(next)
    }

    /// Remove the entry with `id` if present and persist. Returns whether an
    /// entry was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let next: Vec<Entry> = self.entries.iter().filter(|e| e.id != id).cloned().collect();
        let removed = next.len() != self.entries.len();
        if !removed {
            tracing::debug!(%id, "no entry to remove");
        }
        self.persist(next)?;
        Ok(removed)
    }

    /// Allocate an id from the creation time in epoch milliseconds, bumped
    /// past any id already in use.
    #[must_use]
    pub fn next_id<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        millis.to_string()
    }

    /// Hand back the underlying storage, e.g. to reload it.
    #[must_use]
    pub fn into_database(self) -> Database {
        self.db
    }

    fn persist(&mut self, next: Vec<Entry>) -> Result<()> {
        let raw = serde_json::to_string(&next).context("Failed to serialize entries")?;
        self.db.set_item(ENTRIES_KEY, &raw)?;
        self.entries = next;
        Ok(())
    }
}

/// Sum of calories over any subset of entries.
pub fn total_calories<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> u64 {
    entries.into_iter().map(|e| u64::from(e.calories)).sum()
}
