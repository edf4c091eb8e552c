use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{Breakpoint, ContextMap, ScopeKey, condition::condition_holds};

struct Entry {
    id: Arc<str>,
    condition: Option<Arc<str>>,
    enabled: bool,
    hit_count: AtomicU64,
}

/// Outcome of a breakpoint that fired during [`BreakpointTable::check`].
pub(crate) struct Hit {
    pub id: Arc<str>,
    pub hit_count: u64,
}

/// Breakpoints keyed by scope.
///
/// Checks take the shared lock and bump the hit counter atomically, so
/// concurrent checks on the same breakpoint never lose an update. Every
/// structural change (set, remove, toggle, clear) takes the exclusive lock.
pub(crate) struct BreakpointTable {
    entries: RwLock<HashMap<ScopeKey, Entry>>,
    last_id: AtomicU64,
    id_prefix: &'static str,
}

impl BreakpointTable {
    pub fn new(id_prefix: &'static str) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            last_id: AtomicU64::new(0),
            id_prefix,
        }
    }

    pub fn set(&self, scope: ScopeKey, condition: Option<Arc<str>>) -> Breakpoint {
        let n = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id: Arc<str> = format!("{}-{n}", self.id_prefix).into();
        let entry = Entry {
            id: id.clone(),
            condition: condition.clone(),
            enabled: true,
            hit_count: AtomicU64::new(0),
        };
        self.entries
            .write()
            .expect("BreakpointTable lock poisoned")
            .insert(scope.clone(), entry);

        Breakpoint {
            id,
            scope,
            condition,
            enabled: true,
            hit_count: 0,
        }
    }

    pub fn remove(&self, scope: &ScopeKey) -> bool {
        self.entries
            .write()
            .expect("BreakpointTable lock poisoned")
            .remove(scope)
            .is_some()
    }

    /// Returns `false` if there is no breakpoint for `scope`.
    pub fn set_enabled(&self, scope: &ScopeKey, enabled: bool) -> bool {
        let mut entries = self.entries.write().expect("BreakpointTable lock poisoned");
        match entries.get_mut(scope) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Decides whether the breakpoint at `scope` fires, counting the hit if so.
    pub fn check(&self, scope: &ScopeKey, ctx: Option<&ContextMap>) -> Option<Hit> {
        let entries = self.entries.read().expect("BreakpointTable lock poisoned");
        let entry = entries.get(scope)?;
        if !entry.enabled || !condition_holds(entry.condition.as_deref(), ctx) {
            return None;
        }
        let hit_count = entry.hit_count.fetch_add(1, Ordering::AcqRel) + 1;
        Some(Hit {
            id: entry.id.clone(),
            hit_count,
        })
    }

    /// Snapshot of every breakpoint, ordered by scope.
    pub fn list(&self) -> Vec<Breakpoint> {
        let entries = self.entries.read().expect("BreakpointTable lock poisoned");
        let mut list: Vec<_> = entries
            .iter()
            .map(|(scope, entry)| Breakpoint {
                id: entry.id.clone(),
                scope: scope.clone(),
                condition: entry.condition.clone(),
                enabled: entry.enabled,
                hit_count: entry.hit_count.load(Ordering::Acquire),
            })
            .collect();
        list.sort_by(|a, b| a.scope.cmp(&b.scope));
        list
    }

    /// Removes every breakpoint and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().expect("BreakpointTable lock poisoned");
        let n = entries.len();
        entries.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(step: &str) -> ScopeKey {
        ScopeKey::new("pipeline", step)
    }

    #[test]
    fn test_ids_are_distinct_and_prefixed() {
        let table = BreakpointTable::new("pbp");
        let a = table.set(key("a"), None);
        let b = table.set(key("a"), None);
        assert_eq!(&*a.id, "pbp-1");
        assert_eq!(&*b.id, "pbp-2");
        assert_eq!(table.list().len(), 1);
    }

    #[test]
    fn test_concurrent_checks_do_not_lose_hits() {
        let table = Arc::new(BreakpointTable::new("pbp"));
        table.set(key("hot"), None);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = table.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        assert!(table.check(&key("hot"), None).is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(table.list()[0].hit_count, 2000);
    }
}
