//! Memoized field decisions.
//!
//! # Purpose
//! Form renders ask the same field questions many times for one record.
//! [`DecisionCache`] remembers the answers for a single [`DecisionKey`] and
//! throws everything away as soon as the key changes.
//!
//! # Key invariants
//! - Holds decisions only, never permission data.
//! - A key change clears every entry before the next read; there is no
//!   partial invalidation.
//! - Clear-and-rebuild happens under one lock, so concurrent readers never
//!   observe answers computed for a different key.
use crate::{Fingerprint, RecordId, StatusId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Everything a field decision depends on besides the field itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub record_id: RecordId,
    pub status_id: Option<StatusId>,
    pub fingerprint: Fingerprint,
    pub tab_edit_allowed: bool,
    /// Record is unassigned; selects the status namespace for modal edits.
    pub unassigned: bool,
}

/// Kind of field question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    View,
    Edit,
    ModalEdit(Option<StatusId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldQuery {
    pub field: String,
    pub kind: QueryKind,
}

impl FieldQuery {
    pub fn new(field: &str, kind: QueryKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidations: usize,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    key: Option<DecisionKey>,
    decisions: HashMap<FieldQuery, bool>,
}

#[derive(Debug, Default)]
pub struct DecisionCache {
    state: Mutex<CacheState>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    invalidations: AtomicUsize,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized answer for `query` under `key`, computing it with
    /// `compute` on a miss.
    pub fn get_or_compute(
        &self,
        key: &DecisionKey,
        query: FieldQuery,
        compute: impl FnOnce() -> bool,
    ) -> bool {
        let mut state = self.state.lock();
        if state.key.as_ref() != Some(key) {
            if state.key.is_some() {
                self.invalidations.fetch_add(1, Ordering::Relaxed);
                trace!(
                    record_id = %key.record_id,
                    dropped = state.decisions.len(),
                    "decision cache invalidated"
                );
            }
            state.decisions.clear();
            state.key = Some(key.clone());
        }
        if let Some(allowed) = state.decisions.get(&query) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *allowed;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let allowed = compute();
        state.decisions.insert(query, allowed);
        allowed
    }

    /// Drop every entry and forget the current key.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.key = None;
        state.decisions.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.state.lock().decisions.len();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionSet;
    use std::cell::Cell;

    fn key(status: Option<&str>) -> DecisionKey {
        DecisionKey {
            record_id: RecordId::new("r1"),
            status_id: StatusId::from_optional(status),
            fingerprint: PermissionSet::empty().fingerprint().clone(),
            tab_edit_allowed: true,
            unassigned: false,
        }
    }

    #[test]
    fn repeated_reads_hit_memoized_value() {
        let cache = DecisionCache::new();
        let calls = Cell::new(0);
        let k = key(Some("s1"));
        for _ in 0..3 {
            let allowed = cache.get_or_compute(&k, FieldQuery::new("email", QueryKind::Edit), || {
                calls.set(calls.get() + 1);
                true
            });
            assert!(allowed);
        }
        assert_eq!(calls.get(), 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
    }

    #[test]
    fn key_change_clears_all_entries() {
        let cache = DecisionCache::new();
        let first = key(Some("s1"));
        cache.get_or_compute(&first, FieldQuery::new("email", QueryKind::View), || true);
        cache.get_or_compute(&first, FieldQuery::new("city", QueryKind::View), || true);

        let second = key(Some("s2"));
        let allowed =
            cache.get_or_compute(&second, FieldQuery::new("email", QueryKind::View), || false);
        assert!(!allowed);
        let stats = cache.stats();
        assert_eq!(stats.invalidations, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn query_kinds_are_cached_separately() {
        let cache = DecisionCache::new();
        let k = key(None);
        let s2 = StatusId::new("s2");
        assert!(cache.get_or_compute(&k, FieldQuery::new("email", QueryKind::View), || true));
        assert!(!cache.get_or_compute(&k, FieldQuery::new("email", QueryKind::Edit), || false));
        assert!(cache.get_or_compute(
            &k,
            FieldQuery::new("email", QueryKind::ModalEdit(Some(s2))),
            || true
        ));
        assert!(!cache.get_or_compute(
            &k,
            FieldQuery::new("email", QueryKind::ModalEdit(None)),
            || false
        ));
        assert_eq!(cache.stats().entries, 4);
    }

    #[test]
    fn unassigned_flag_is_part_of_the_key() {
        let cache = DecisionCache::new();
        let assigned = key(Some("s1"));
        let fosse = DecisionKey {
            unassigned: true,
            ..assigned.clone()
        };
        cache.get_or_compute(&assigned, FieldQuery::new("email", QueryKind::Edit), || true);
        let allowed =
            cache.get_or_compute(&fosse, FieldQuery::new("email", QueryKind::Edit), || false);
        assert!(!allowed);
    }

    #[test]
    fn clear_forgets_key_without_counting_invalidation() {
        let cache = DecisionCache::new();
        let k = key(None);
        cache.get_or_compute(&k, FieldQuery::new("email", QueryKind::View), || true);
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        cache.get_or_compute(&k, FieldQuery::new("email", QueryKind::View), || true);
        assert_eq!(cache.stats().invalidations, 0);
        assert_eq!(cache.stats().misses, 2);
    }
}
