//! Facade bundling the permission index, catalogs and decision cache.
//!
//! # Purpose
//! UI code holds one [`AccessEngine`] per signed-in actor and asks it every
//! access question. Field answers go through the [`DecisionCache`]; all other
//! answers are cheap enough to compute on demand.
//!
//! # Key invariants
//! - Rebuilt or updated through [`AccessEngine::replace_permissions`] when the
//!   actor's permissions change; replacing the permissions clears the cache.
//! - `Send + Sync`: the cache is the only mutable state and is mutex-guarded.
//!
//! # Examples
//! ```rust
//! use fiche_authz::{AccessEngine, CategoryCatalog, PermissionSet, Record, StatusCatalog};
//!
//! let set = PermissionSet::parse_compact(&["fiche_contact:view:fname"]).expect("valid");
//! let engine = AccessEngine::new(set, StatusCatalog::default(), CategoryCatalog::default());
//! let record = Record::new("r1");
//! assert!(engine.can_view_field("firstName", &record));
//! assert!(!engine.can_view_field("email", &record));
//! ```
use crate::cache::{CacheStats, DecisionCache, DecisionKey, FieldQuery, QueryKind};
use crate::gate::{CategoryGate, FieldGate, INFORMATIONS_TAB, StatusGate, TabGate, TransitionPlan};
use crate::{
    CategoryCatalog, CategoryId, Decision, NoteCategory, NoteItem, PermissionIndex,
    PermissionSet, Record, Status, StatusCatalog, StatusId,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct AccessEngine {
    index: Arc<PermissionIndex>,
    statuses: StatusCatalog,
    categories: CategoryCatalog,
    cache: DecisionCache,
}

impl AccessEngine {
    pub fn new(
        permissions: PermissionSet,
        statuses: StatusCatalog,
        categories: CategoryCatalog,
    ) -> Self {
        Self::with_index(Arc::new(PermissionIndex::new(&permissions)), statuses, categories)
    }

    /// Share an index already built elsewhere.
    pub fn with_index(
        index: Arc<PermissionIndex>,
        statuses: StatusCatalog,
        categories: CategoryCatalog,
    ) -> Self {
        debug!(
            entries = index.len(),
            fingerprint = %index.fingerprint(),
            "access engine ready"
        );
        Self {
            index,
            statuses,
            categories,
            cache: DecisionCache::new(),
        }
    }

    pub fn replace_permissions(&mut self, permissions: PermissionSet) {
        let index = PermissionIndex::new(&permissions);
        debug!(
            entries = index.len(),
            fingerprint = %index.fingerprint(),
            "permissions replaced"
        );
        self.index = Arc::new(index);
        self.cache.clear();
    }

    pub fn index(&self) -> &PermissionIndex {
        &self.index
    }

    pub fn status_catalog(&self) -> &StatusCatalog {
        &self.statuses
    }

    pub fn category_catalog(&self) -> &CategoryCatalog {
        &self.categories
    }

    pub fn tabs(&self) -> TabGate<'_> {
        TabGate::new(&self.index)
    }

    pub fn status_gate(&self) -> StatusGate<'_> {
        StatusGate::new(&self.index, &self.statuses)
    }

    pub fn field_gate(&self) -> FieldGate<'_> {
        FieldGate::new(&self.index, self.status_gate())
    }

    pub fn category_gate(&self) -> CategoryGate<'_> {
        CategoryGate::new(&self.index, &self.categories)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn decision_key(&self, record: &Record) -> DecisionKey {
        DecisionKey {
            record_id: record.id.clone(),
            status_id: record.status().cloned(),
            fingerprint: self.index.fingerprint().clone(),
            tab_edit_allowed: self.tabs().can_edit(INFORMATIONS_TAB),
            unassigned: record.is_unassigned(),
        }
    }

    // Tabs

    pub fn tab_decision(&self, tab: &str, action: crate::Action) -> Decision {
        self.tabs().decide(tab, action)
    }

    pub fn can_view_tab(&self, tab: &str) -> bool {
        self.tabs().can_view(tab)
    }

    pub fn can_create_tab(&self, tab: &str) -> bool {
        self.tabs().can_create(tab)
    }

    pub fn can_edit_tab(&self, tab: &str) -> bool {
        self.tabs().can_edit(tab)
    }

    pub fn can_delete_tab(&self, tab: &str) -> bool {
        self.tabs().can_delete(tab)
    }

    // Statuses

    pub fn can_edit_current_status(&self, record: &Record) -> bool {
        self.status_gate().can_edit_current_status(record)
    }

    pub fn can_assign_status(&self, record: &Record, status: &StatusId) -> bool {
        self.status_gate().can_assign_status(record, status)
    }

    pub fn can_view_status(&self, record: &Record, status: &StatusId) -> bool {
        self.status_gate().can_view_status(record, status)
    }

    pub fn explain_transition(&self, record: &Record, new_status: Option<&StatusId>) -> Decision {
        self.status_gate().explain_transition(record, new_status)
    }

    pub fn can_transition(&self, record: &Record, new_status: Option<&StatusId>) -> bool {
        self.status_gate().can_transition(record, new_status)
    }

    pub fn plan_transition(&self, record: &Record, new_status: Option<&StatusId>) -> TransitionPlan<'_> {
        self.status_gate().plan_transition(record, new_status)
    }

    pub fn status_display_text(&self, record: &Record) -> Option<&str> {
        self.status_gate().status_display_text(record)
    }

    pub fn assignable_statuses(&self, record: &Record) -> Vec<&Status> {
        self.status_gate().assignable_statuses(record)
    }

    // Fields

    pub fn can_view_field(&self, field: &str, record: &Record) -> bool {
        self.cache.get_or_compute(
            &self.decision_key(record),
            FieldQuery::new(field, QueryKind::View),
            || self.field_gate().can_view_field(field, record),
        )
    }

    pub fn can_edit_field(&self, field: &str, record: &Record) -> bool {
        self.cache.get_or_compute(
            &self.decision_key(record),
            FieldQuery::new(field, QueryKind::Edit),
            || self.field_gate().can_edit_field(field, record),
        )
    }

    pub fn can_edit_field_in_modal(
        &self,
        field: &str,
        record: &Record,
        candidate: Option<&StatusId>,
    ) -> bool {
        self.cache.get_or_compute(
            &self.decision_key(record),
            FieldQuery::new(field, QueryKind::ModalEdit(candidate.cloned())),
            || {
                self.field_gate()
                    .can_edit_field_in_modal(field, record, candidate)
            },
        )
    }

    /// Uncached; for diagnostics and rejection messages.
    pub fn explain_view_field(&self, field: &str, record: &Record) -> Decision {
        self.field_gate().explain_view(field, record)
    }

    pub fn explain_edit_field(&self, field: &str, record: &Record) -> Decision {
        self.field_gate().explain_edit(field, record)
    }

    pub fn explain_edit_field_in_modal(
        &self,
        field: &str,
        record: &Record,
        candidate: Option<&StatusId>,
    ) -> Decision {
        self.field_gate()
            .explain_edit_in_modal(field, record, candidate)
    }

    // Categories

    pub fn can_view_category(&self, category: &CategoryId) -> bool {
        self.category_gate().can_view_category(category)
    }

    pub fn can_create_in_category(&self, category: &CategoryId) -> bool {
        self.category_gate().can_create_in_category(category)
    }

    pub fn can_view_item(&self, item: &NoteItem) -> bool {
        self.category_gate().can_view_item(item)
    }

    pub fn can_edit_item(&self, item: &NoteItem) -> bool {
        self.category_gate().can_edit_item(item)
    }

    pub fn can_delete_item(&self, item: &NoteItem) -> bool {
        self.category_gate().can_delete_item(item)
    }

    pub fn visible_categories(&self) -> Vec<&NoteCategory> {
        self.category_gate().visible_categories()
    }

    pub fn default_category(&self) -> Option<&NoteCategory> {
        self.category_gate().default_category()
    }

    pub fn visible_items<'i>(&self, items: &'i [NoteItem]) -> Vec<&'i NoteItem> {
        self.category_gate().visible_items(items)
    }
}
