use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::{Error, PausedExecution, ResumeAction, Result};

/// Directory record for one paused execution. Owns the sending half of the
/// execution's single-slot handoff.
pub(crate) struct PausedEntry {
    pub snapshot: PausedExecution,
    pub token: Uuid,
    pub since: Instant,
    pub sender: oneshot::Sender<ResumeAction>,
}

impl PausedEntry {
    /// Hands the decision to the waiter. Returns it back if the waiter is gone.
    pub fn deliver(self, action: ResumeAction) -> std::result::Result<(), ResumeAction> {
        self.sender.send(action)
    }
}

/// Paused executions keyed by execution id.
///
/// Entries are only ever *taken* out of the directory under the exclusive
/// lock; whoever takes an entry is the only party able to deliver into its
/// handoff, which makes delivery at-most-once. Delivery itself happens after
/// the lock is released.
pub(crate) struct PausedDirectory {
    entries: RwLock<HashMap<Arc<str>, PausedEntry>>,
}

impl PausedDirectory {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, entry: PausedEntry) -> Result<()> {
        let mut entries = self.entries.write().expect("PausedDirectory lock poisoned");
        let id = entry.snapshot.id.clone();
        if entries.contains_key(&id) {
            return Err(Error::AlreadyPaused(id));
        }
        entries.insert(id, entry);
        Ok(())
    }

    pub fn take(&self, execution_id: &str) -> Option<PausedEntry> {
        self.entries
            .write()
            .expect("PausedDirectory lock poisoned")
            .remove(execution_id)
    }

    /// Removes the entry only if it still belongs to the pause identified by `token`.
    pub fn remove_if_token(&self, execution_id: &str, token: Uuid) -> bool {
        let mut entries = self.entries.write().expect("PausedDirectory lock poisoned");
        if entries.get(execution_id).is_some_and(|e| e.token == token) {
            entries.remove(execution_id);
            true
        } else {
            false
        }
    }

    pub fn take_all(&self) -> Vec<PausedEntry> {
        self.entries
            .write()
            .expect("PausedDirectory lock poisoned")
            .drain()
            .map(|(_, entry)| entry)
            .collect()
    }

    pub fn take_older_than(&self, max_age: Duration) -> Vec<PausedEntry> {
        let mut entries = self.entries.write().expect("PausedDirectory lock poisoned");
        let stale: Vec<Arc<str>> = entries
            .iter()
            .filter(|(_, e)| e.since.elapsed() >= max_age)
            .map(|(id, _)| id.clone())
            .collect();
        stale.iter().filter_map(|id| entries.remove(id)).collect()
    }

    pub fn get(&self, execution_id: &str) -> Option<PausedExecution> {
        self.entries
            .read()
            .expect("PausedDirectory lock poisoned")
            .get(execution_id)
            .map(|e| e.snapshot.clone())
    }

    /// Snapshot of every paused execution, oldest first.
    pub fn list(&self) -> Vec<PausedExecution> {
        let entries = self.entries.read().expect("PausedDirectory lock poisoned");
        let mut list: Vec<_> = entries.values().map(|e| e.snapshot.clone()).collect();
        list.sort_by(|a, b| a.paused_at.cmp(&b.paused_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("PausedDirectory lock poisoned").len()
    }
}
