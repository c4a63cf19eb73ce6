use super::{INFORMATIONS_TAB, Precondition, StatusGate, Subject, TabGate, evaluate, preconditions};
use crate::{Action, Component, ContactField, Decision, PermissionIndex, Reason, Record, StatusId};

/// How the current-status precondition of an edit is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusRelaxation<'s> {
    /// The record's current status must be editable.
    #[default]
    Strict,
    /// Modal editing: a current status the actor cannot edit is accepted when
    /// the record is being moved to a candidate status the actor may assign.
    Candidate(Option<&'s StatusId>),
}

/// Field-level access on the contact form.
///
/// View fails open for unmodeled fields and falls back to tab visibility when
/// no field rules exist. Edit runs the tab and status preconditions first and
/// fails closed for unmodeled fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldGate<'a> {
    index: &'a PermissionIndex,
    tabs: TabGate<'a>,
    statuses: StatusGate<'a>,
}

impl<'a> FieldGate<'a> {
    pub fn new(index: &'a PermissionIndex, statuses: StatusGate<'a>) -> Self {
        Self {
            index,
            tabs: TabGate::new(index),
            statuses,
        }
    }

    pub fn explain_view(&self, field: &str, _record: &Record) -> Decision {
        let Some(mapped) = ContactField::from_ui_name(field) else {
            return Decision::allow(Reason::UnmappedField);
        };
        let component = Component::FicheContact;
        if !self.index.has_unscoped(&component, Action::View) {
            return self.tabs.decide(INFORMATIONS_TAB, Action::View);
        }
        if self
            .index
            .grants_field(&component, Action::View, mapped.backend_id())
        {
            return Decision::allow(Reason::FieldGranted);
        }
        if self.index.has_general(&component, Action::View) {
            return Decision::allow(Reason::GeneralGrant);
        }
        if !self.index.field_set(&component, Action::View).is_empty() {
            return Decision::deny(Reason::FieldNotListed);
        }
        self.tabs.decide(INFORMATIONS_TAB, Action::View)
    }

    pub fn can_view_field(&self, field: &str, record: &Record) -> bool {
        self.explain_view(field, record).is_allowed()
    }

    pub fn explain_edit(&self, field: &str, record: &Record) -> Decision {
        self.explain_edit_with(field, record, StatusRelaxation::Strict)
    }

    pub fn can_edit_field(&self, field: &str, record: &Record) -> bool {
        self.explain_edit(field, record).is_allowed()
    }

    pub fn explain_edit_in_modal(
        &self,
        field: &str,
        record: &Record,
        candidate: Option<&StatusId>,
    ) -> Decision {
        self.explain_edit_with(field, record, StatusRelaxation::Candidate(candidate))
    }

    pub fn can_edit_field_in_modal(
        &self,
        field: &str,
        record: &Record,
        candidate: Option<&StatusId>,
    ) -> bool {
        self.explain_edit_in_modal(field, record, candidate)
            .is_allowed()
    }

    pub fn explain_edit_with(
        &self,
        field: &str,
        record: &Record,
        relaxation: StatusRelaxation<'_>,
    ) -> Decision {
        evaluate(
            preconditions(Subject::Field, Action::Edit),
            |step| match step {
                Precondition::Tab(action) => self.tabs.decide(INFORMATIONS_TAB, action),
                Precondition::CurrentStatus => self.current_status(record, relaxation),
            },
            || self.edit_rule(field),
        )
    }

    fn current_status(&self, record: &Record, relaxation: StatusRelaxation<'_>) -> Decision {
        let current = self.statuses.explain_edit_current(record);
        match relaxation {
            StatusRelaxation::Strict | StatusRelaxation::Candidate(None) => current,
            StatusRelaxation::Candidate(Some(candidate)) => {
                current.or_else(|| self.statuses.explain_assign(record, candidate))
            }
        }
    }

    fn edit_rule(&self, field: &str) -> Decision {
        let Some(mapped) = ContactField::from_ui_name(field) else {
            return Decision::deny(Reason::UnmappedField);
        };
        let component = Component::FicheContact;
        if self
            .index
            .grants_field(&component, Action::Edit, mapped.backend_id())
        {
            return Decision::allow(Reason::FieldGranted);
        }
        if !self.index.has_unscoped(&component, Action::Edit) {
            return Decision::allow(Reason::NoFieldRules);
        }
        Decision::deny(Reason::FieldNotListed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PermissionSet, Status, StatusCatalog, StatusKind};

    fn index(entries: &[&str]) -> PermissionIndex {
        PermissionIndex::new(&PermissionSet::parse_compact(entries).expect("parse entries"))
    }

    fn catalog() -> StatusCatalog {
        StatusCatalog::new(vec![
            Status::new("s1", StatusKind::Lead, "Nouveau"),
            Status::new("s2", StatusKind::Client, "Signé"),
        ])
    }

    fn record(status: Option<&str>) -> Record {
        Record::new("r1")
            .with_status(status)
            .with_teleoperator(Some("op-1"))
    }

    #[test]
    fn unmapped_field_view_fails_open_edit_fails_closed() {
        let idx = index(&["fiche_contact:view:fname", "fiche_contact:edit:fname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        let rec = record(None);
        assert_eq!(
            gate.explain_view("favouriteColour", &rec),
            Decision::allow(Reason::UnmappedField)
        );
        assert_eq!(
            gate.explain_edit("favouriteColour", &rec),
            Decision::deny(Reason::UnmappedField)
        );
    }

    #[test]
    fn view_without_field_rules_follows_informations_tab() {
        let idx = index(&["contact_tabs:edit:informations"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_view("email", &record(None)).reason,
            Reason::TabNotGranted
        );

        let open = index(&[]);
        let gate = FieldGate::new(&open, StatusGate::new(&open, &statuses));
        assert_eq!(
            gate.explain_view("email", &record(None)).reason,
            Reason::TabsUnconfigured
        );
    }

    #[test]
    fn view_allow_list_hides_unlisted_fields() {
        let idx = index(&["contact_tabs:edit:informations", "fiche_contact:view:fname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        let rec = record(None);
        assert!(gate.can_view_field("firstName", &rec));
        assert_eq!(
            gate.explain_view("email", &rec).reason,
            Reason::FieldNotListed
        );
    }

    #[test]
    fn general_view_grant_overrides_allow_list() {
        let idx = index(&["fiche_contact:view", "fiche_contact:view:fname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_view("email", &record(None)).reason,
            Reason::GeneralGrant
        );
        assert_eq!(
            gate.explain_view("firstName", &record(None)).reason,
            Reason::FieldGranted
        );
    }

    #[test]
    fn status_scoped_view_entries_do_not_count_as_field_rules() {
        let idx = index(&["fiche_contact:view::s1"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_view("email", &record(Some("s1"))).reason,
            Reason::TabsUnconfigured
        );
    }

    #[test]
    fn edit_denied_by_tab_before_field_rule() {
        let idx = index(&["contact_tabs:view:informations", "fiche_contact:edit:fname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_edit("firstName", &record(None)).reason,
            Reason::TabNotGranted
        );
    }

    #[test]
    fn edit_denied_by_locked_status() {
        let idx = index(&["fiche_contact:edit:fname", "statuses:edit::s2"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_edit("firstName", &record(Some("s1"))).reason,
            Reason::StatusNotGranted
        );
        assert!(gate.can_edit_field("firstName", &record(Some("s2"))));
    }

    #[test]
    fn edit_rules_list_fields_exclusively() {
        let idx = index(&["fiche_contact:edit:lname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        let rec = record(None);
        assert_eq!(
            gate.explain_edit("lastName", &rec).reason,
            Reason::FieldGranted
        );
        assert_eq!(
            gate.explain_edit("email", &rec).reason,
            Reason::FieldNotListed
        );
    }

    #[test]
    fn edit_without_field_rules_is_allowed() {
        let idx = index(&["fiche_contact:view:fname"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert_eq!(
            gate.explain_edit("email", &record(None)),
            Decision::allow(Reason::NoFieldRules)
        );
    }

    #[test]
    fn general_edit_entry_alone_does_not_list_fields() {
        let idx = index(&["fiche_contact:edit"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        assert!(!gate.can_edit_field("email", &record(None)));
    }

    #[test]
    fn modal_accepts_assignable_candidate() {
        let idx = index(&["statuses:edit::s2", "statuses:view::s2"]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        let rec = record(Some("s1"));
        let s1 = StatusId::new("s1");
        let s2 = StatusId::new("s2");

        assert!(!gate.can_edit_field("email", &rec));
        assert!(gate.can_edit_field_in_modal("email", &rec, Some(&s2)));
        assert!(!gate.can_edit_field_in_modal("email", &rec, Some(&s1)));
        assert!(!gate.can_edit_field_in_modal("email", &rec, None));
    }

    #[test]
    fn modal_does_not_bypass_tab_or_field_rules() {
        let idx = index(&[
            "contact_tabs:view:informations",
            "statuses:view::s2",
            "fiche_contact:edit:fname",
        ]);
        let statuses = catalog();
        let gate = FieldGate::new(&idx, StatusGate::new(&idx, &statuses));
        let s2 = StatusId::new("s2");
        assert_eq!(
            gate.explain_edit_in_modal("firstName", &record(Some("s1")), Some(&s2))
                .reason,
            Reason::TabNotGranted
        );
    }
}
