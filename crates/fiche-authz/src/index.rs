use crate::{Action, Component, Fingerprint, PermissionSet, StatusId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Bucket {
    general: bool,
    fields: HashSet<String>,
    statuses: HashSet<StatusId>,
}

static EMPTY_FIELDS: std::sync::LazyLock<HashSet<String>> = std::sync::LazyLock::new(HashSet::new);
static EMPTY_STATUSES: std::sync::LazyLock<HashSet<StatusId>> =
    std::sync::LazyLock::new(HashSet::new);

/// Lookup sets derived once from a [`PermissionSet`].
///
/// All queries are pure and total: absent data yields `false` or an empty set.
#[derive(Debug)]
pub struct PermissionIndex {
    buckets: HashMap<(Component, Action), Bucket>,
    components: HashSet<Component>,
    fingerprint: Fingerprint,
    len: usize,
}

impl PermissionIndex {
    pub fn new(set: &PermissionSet) -> Self {
        let mut buckets: HashMap<(Component, Action), Bucket> = HashMap::new();
        let mut components = HashSet::new();
        for entry in set.entries() {
            components.insert(entry.component.clone());
            let bucket = buckets
                .entry((entry.component.clone(), entry.action))
                .or_default();
            match (&entry.field_name, &entry.status_id) {
                (None, None) => bucket.general = true,
                (Some(field), None) => {
                    bucket.fields.insert(field.clone());
                }
                (None, Some(status)) => {
                    bucket.statuses.insert(status.clone());
                }
                // Scoped by both: only visible through `any_for_component`.
                (Some(_), Some(_)) => {}
            }
        }
        Self {
            buckets,
            components,
            fingerprint: set.fingerprint().clone(),
            len: set.len(),
        }
    }

    fn bucket(&self, component: &Component, action: Action) -> Option<&Bucket> {
        self.buckets.get(&(component.clone(), action))
    }

    /// Some entry for the pair carries neither a field name nor a status id.
    pub fn has_general(&self, component: &Component, action: Action) -> bool {
        self.bucket(component, action)
            .is_some_and(|bucket| bucket.general)
    }

    /// Field names of entries for the pair that carry no status id.
    pub fn field_set(&self, component: &Component, action: Action) -> &HashSet<String> {
        self.bucket(component, action)
            .map(|bucket| &bucket.fields)
            .unwrap_or(&*EMPTY_FIELDS)
    }

    /// Status ids of entries for the pair that carry no field name.
    pub fn status_set(&self, component: &Component, action: Action) -> &HashSet<StatusId> {
        self.bucket(component, action)
            .map(|bucket| &bucket.statuses)
            .unwrap_or(&*EMPTY_STATUSES)
    }

    pub fn any_for_component(&self, component: &Component) -> bool {
        self.components.contains(component)
    }

    /// Some entry for the pair exists without status scoping (general or field-scoped).
    pub fn has_unscoped(&self, component: &Component, action: Action) -> bool {
        self.bucket(component, action)
            .is_some_and(|bucket| bucket.general || !bucket.fields.is_empty())
    }

    pub fn grants_field(&self, component: &Component, action: Action, field: &str) -> bool {
        self.field_set(component, action).contains(field)
    }

    pub fn grants_status(&self, component: &Component, action: Action, status: &StatusId) -> bool {
        self.status_set(component, action).contains(status)
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Number of distinct entries indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<&PermissionSet> for PermissionIndex {
    fn from(set: &PermissionSet) -> Self {
        Self::new(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[&str]) -> PermissionIndex {
        PermissionIndex::new(&PermissionSet::parse_compact(entries).expect("parse entries"))
    }

    #[test]
    fn general_requires_no_scoping() {
        let idx = index(&["planning:view", "fiche_contact:view:fname"]);
        assert!(idx.has_general(&Component::Planning, Action::View));
        assert!(!idx.has_general(&Component::FicheContact, Action::View));
        assert!(!idx.has_general(&Component::Planning, Action::Edit));
    }

    #[test]
    fn field_and_status_sets_are_disjoint_by_scope() {
        let idx = index(&[
            "statuses:view::s1",
            "statuses:view::s2",
            "statuses:view:label",
            "statuses:view:label:s3",
        ]);
        let statuses = idx.status_set(&Component::Statuses, Action::View);
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&StatusId::new("s1")));
        assert!(!statuses.contains(&StatusId::new("s3")));

        let fields = idx.field_set(&Component::Statuses, Action::View);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains("label"));
    }

    #[test]
    fn doubly_scoped_entry_only_marks_component() {
        let idx = index(&["other:edit:notes:s4"]);
        assert!(idx.any_for_component(&Component::Other));
        assert!(!idx.has_unscoped(&Component::Other, Action::Edit));
        assert!(idx.field_set(&Component::Other, Action::Edit).is_empty());
        assert!(idx.status_set(&Component::Other, Action::Edit).is_empty());
    }

    #[test]
    fn absent_data_yields_empty_answers() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert!(!idx.any_for_component(&Component::ContactTabs));
        assert!(!idx.has_general(&Component::ContactTabs, Action::View));
        assert!(idx.field_set(&Component::ContactTabs, Action::View).is_empty());
        assert!(idx.status_set(&Component::Statuses, Action::Edit).is_empty());
        assert!(!idx.has_unscoped(&Component::FicheContact, Action::View));
    }

    #[test]
    fn unscoped_covers_general_and_field_entries() {
        let general = index(&["fiche_contact:view"]);
        let field = index(&["fiche_contact:view:email"]);
        let status_only = index(&["fiche_contact:view::s1"]);
        assert!(general.has_unscoped(&Component::FicheContact, Action::View));
        assert!(field.has_unscoped(&Component::FicheContact, Action::View));
        assert!(!status_only.has_unscoped(&Component::FicheContact, Action::View));
    }

    #[test]
    fn index_keeps_fingerprint_and_len() {
        let set = PermissionSet::parse_compact(&["planning:view", "planning:view"]).expect("set");
        let idx = PermissionIndex::from(&set);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.fingerprint(), set.fingerprint());
    }
}
