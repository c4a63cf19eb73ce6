use super::{INFORMATIONS_TAB, Subject, TabGate, preconditions};
use crate::{
    Action, CategoryCatalog, CategoryId, Component, Decision, NoteCategory, NoteItem,
    PermissionIndex, Reason,
};

/// Access to category-scoped note items.
///
/// Independent of the field gate. Create, edit and delete also need the
/// matching action on the `informations` tab; items without a category are
/// always visible but never editable.
#[derive(Debug, Clone, Copy)]
pub struct CategoryGate<'a> {
    index: &'a PermissionIndex,
    tabs: TabGate<'a>,
    catalog: &'a CategoryCatalog,
}

impl<'a> CategoryGate<'a> {
    pub fn new(index: &'a PermissionIndex, catalog: &'a CategoryCatalog) -> Self {
        Self {
            index,
            tabs: TabGate::new(index),
            catalog,
        }
    }

    /// Run the precedence table for `action`, then the category rule.
    ///
    /// Category rows only carry tab steps, so no status step is evaluated.
    fn decide(&self, action: Action, category: &CategoryId) -> Decision {
        preconditions(Subject::Category, action)
            .iter()
            .filter_map(|step| step.tab_action())
            .map(|tab_action| self.tabs.decide(INFORMATIONS_TAB, tab_action))
            .find(|decision| !decision.is_allowed())
            .unwrap_or_else(|| self.category_rule(action, category))
    }

    fn category_rule(&self, action: Action, category: &CategoryId) -> Decision {
        let component = Component::NoteCategories;
        if self
            .index
            .grants_field(&component, action, category.as_str())
        {
            return Decision::allow(Reason::CategoryGranted);
        }
        // Only viewing honours a general grant.
        if action == Action::View && self.index.has_general(&component, action) {
            return Decision::allow(Reason::GeneralGrant);
        }
        Decision::deny(Reason::CategoryNotGranted)
    }

    fn decide_item(&self, action: Action, item: &NoteItem) -> Decision {
        match &item.category_id {
            Some(category) => self.decide(action, category),
            None if action == Action::View => Decision::allow(Reason::Uncategorized),
            None => Decision::deny(Reason::Uncategorized),
        }
    }

    pub fn explain_view_category(&self, category: &CategoryId) -> Decision {
        self.decide(Action::View, category)
    }

    pub fn can_view_category(&self, category: &CategoryId) -> bool {
        self.explain_view_category(category).is_allowed()
    }

    pub fn explain_create_in_category(&self, category: &CategoryId) -> Decision {
        self.decide(Action::Create, category)
    }

    pub fn can_create_in_category(&self, category: &CategoryId) -> bool {
        self.explain_create_in_category(category).is_allowed()
    }

    pub fn explain_edit_item(&self, item: &NoteItem) -> Decision {
        self.decide_item(Action::Edit, item)
    }

    pub fn can_edit_item(&self, item: &NoteItem) -> bool {
        self.explain_edit_item(item).is_allowed()
    }

    pub fn explain_delete_item(&self, item: &NoteItem) -> Decision {
        self.decide_item(Action::Delete, item)
    }

    pub fn can_delete_item(&self, item: &NoteItem) -> bool {
        self.explain_delete_item(item).is_allowed()
    }

    pub fn explain_view_item(&self, item: &NoteItem) -> Decision {
        self.decide_item(Action::View, item)
    }

    pub fn can_view_item(&self, item: &NoteItem) -> bool {
        self.explain_view_item(item).is_allowed()
    }

    /// Viewable categories in display order.
    pub fn visible_categories(&self) -> Vec<&'a NoteCategory> {
        self.catalog
            .ordered()
            .iter()
            .filter(|category| self.can_view_category(&category.id))
            .collect()
    }

    /// Category tab selected when the notes panel opens.
    pub fn default_category(&self) -> Option<&'a NoteCategory> {
        self.catalog
            .ordered()
            .iter()
            .find(|category| self.can_view_category(&category.id))
    }

    pub fn visible_items<'i>(&self, items: &'i [NoteItem]) -> Vec<&'i NoteItem> {
        items.iter().filter(|item| self.can_view_item(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionSet;

    fn index(entries: &[&str]) -> PermissionIndex {
        PermissionIndex::new(&PermissionSet::parse_compact(entries).expect("parse entries"))
    }

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![
            NoteCategory::new("c-late", "Suivi", 20),
            NoteCategory::new("c-first", "Général", 1),
            NoteCategory::new("c-tie-a", "Appels", 10),
            NoteCategory::new("c-tie-b", "Rendez-vous", 10),
        ])
    }

    fn cid(id: &str) -> CategoryId {
        CategoryId::new(id)
    }

    #[test]
    fn view_accepts_general_or_listed_category() {
        let categories = catalog();
        let general = index(&["note_categories:view"]);
        let gate = CategoryGate::new(&general, &categories);
        assert_eq!(
            gate.explain_view_category(&cid("anything")).reason,
            Reason::GeneralGrant
        );

        let listed = index(&["note_categories:view:c-first"]);
        let gate = CategoryGate::new(&listed, &categories);
        assert!(gate.can_view_category(&cid("c-first")));
        assert!(!gate.can_view_category(&cid("c-late")));
    }

    #[test]
    fn create_needs_listed_category_and_tab() {
        let categories = catalog();
        let idx = index(&[
            "note_categories:create:c-first",
            "note_categories:create",
            "contact_tabs:create:informations",
        ]);
        let gate = CategoryGate::new(&idx, &categories);
        assert!(gate.can_create_in_category(&cid("c-first")));
        assert_eq!(
            gate.explain_create_in_category(&cid("c-late")).reason,
            Reason::CategoryNotGranted
        );

        let no_tab = index(&["note_categories:create:c-first", "contact_tabs:view:informations"]);
        let gate = CategoryGate::new(&no_tab, &categories);
        assert_eq!(
            gate.explain_create_in_category(&cid("c-first")).reason,
            Reason::TabNotGranted
        );
    }

    #[test]
    fn uncategorized_items_are_visible_but_frozen() {
        let categories = catalog();
        let idx = index(&["note_categories:edit", "note_categories:delete"]);
        let gate = CategoryGate::new(&idx, &categories);
        let item = NoteItem::new("n1", None);
        assert!(gate.can_view_item(&item));
        assert_eq!(gate.explain_edit_item(&item), Decision::deny(Reason::Uncategorized));
        assert!(!gate.can_delete_item(&item));
    }

    #[test]
    fn edit_and_delete_match_their_own_action() {
        let categories = catalog();
        let idx = index(&[
            "note_categories:edit:c-first",
            "note_categories:delete:c-late",
            "contact_tabs:edit:informations",
            "contact_tabs:delete:informations",
        ]);
        let gate = CategoryGate::new(&idx, &categories);
        let first = NoteItem::new("n1", Some("c-first"));
        let late = NoteItem::new("n2", Some("c-late"));
        assert!(gate.can_edit_item(&first));
        assert!(!gate.can_delete_item(&first));
        assert!(gate.can_delete_item(&late));
        assert!(!gate.can_edit_item(&late));
    }

    #[test]
    fn edit_requires_informations_edit_tab() {
        let categories = catalog();
        let idx = index(&["note_categories:edit:c-first", "contact_tabs:delete:informations"]);
        let gate = CategoryGate::new(&idx, &categories);
        assert_eq!(
            gate.explain_edit_item(&NoteItem::new("n1", Some("c-first")))
                .reason,
            Reason::TabNotGranted
        );
    }

    #[test]
    fn visible_categories_follow_order_index_with_stable_ties() {
        let categories = catalog();
        let idx = index(&["note_categories:view"]);
        let gate = CategoryGate::new(&idx, &categories);
        let ids: Vec<&str> = gate
            .visible_categories()
            .into_iter()
            .map(|category| category.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c-first", "c-tie-a", "c-tie-b", "c-late"]);
    }

    #[test]
    fn default_category_is_first_visible() {
        let categories = catalog();
        let idx = index(&["note_categories:view:c-late", "note_categories:view:c-tie-b"]);
        let gate = CategoryGate::new(&idx, &categories);
        assert_eq!(
            gate.default_category().map(|category| category.id.as_str()),
            Some("c-tie-b")
        );

        let none = index(&["planning:view"]);
        let gate = CategoryGate::new(&none, &categories);
        assert!(gate.default_category().is_none());
    }

    #[test]
    fn visible_items_keep_uncategorized_and_listed() {
        let categories = catalog();
        let idx = index(&["note_categories:view:c-first"]);
        let gate = CategoryGate::new(&idx, &categories);
        let items = vec![
            NoteItem::new("n1", Some("c-first")),
            NoteItem::new("n2", Some("c-late")),
            NoteItem::new("n3", None),
        ];
        let ids: Vec<&str> = gate
            .visible_items(&items)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["n1", "n3"]);
    }
}
