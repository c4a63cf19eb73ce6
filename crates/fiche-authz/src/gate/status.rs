use super::{INFORMATIONS_TAB, TabGate};
use crate::{
    Action, Component, Decision, PermissionIndex, Reason, Record, Status, StatusCatalog, StatusId,
    StatusKind,
};

/// Lifecycle-status access.
///
/// Editing a record requires edit rights on its *current* status; moving it
/// to another status additionally requires view rights on the *target*.
/// Unassigned ("fosse") records resolve view rights in the `fosse_statuses`
/// namespace instead of `statuses`.
#[derive(Debug, Clone, Copy)]
pub struct StatusGate<'a> {
    index: &'a PermissionIndex,
    tabs: TabGate<'a>,
    catalog: &'a StatusCatalog,
}

/// Outcome of a requested status change plus what the target status demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan<'a> {
    pub decision: Decision,
    pub target: Option<&'a Status>,
    /// The target status needs a calendar appointment before commit.
    pub requires_event: bool,
    /// The target status needs the client conversion sub-form.
    pub requires_client_conversion: bool,
}

impl<'a> StatusGate<'a> {
    pub fn new(index: &'a PermissionIndex, catalog: &'a StatusCatalog) -> Self {
        Self {
            index,
            tabs: TabGate::new(index),
            catalog,
        }
    }

    /// Namespace holding view grants for this record's statuses.
    pub fn view_namespace(record: &Record) -> Component {
        if record.is_unassigned() {
            Component::FosseStatuses
        } else {
            Component::Statuses
        }
    }

    pub fn explain_edit_current(&self, record: &Record) -> Decision {
        let Some(status) = record.status() else {
            return Decision::allow(Reason::NoCurrentStatus);
        };
        if !self.index.any_for_component(&Component::Statuses) {
            return Decision::allow(Reason::StatusesUnconfigured);
        }
        Decision::from_bool(
            self.index
                .grants_status(&Component::Statuses, Action::Edit, status),
            Reason::StatusGranted,
            Reason::StatusNotGranted,
        )
    }

    pub fn can_edit_current_status(&self, record: &Record) -> bool {
        self.explain_edit_current(record).is_allowed()
    }

    pub fn explain_assign(&self, record: &Record, new_status: &StatusId) -> Decision {
        Decision::from_bool(
            self.index
                .grants_status(&Self::view_namespace(record), Action::View, new_status),
            Reason::AssignGranted,
            Reason::AssignNotGranted,
        )
    }

    pub fn can_assign_status(&self, record: &Record, new_status: &StatusId) -> bool {
        self.explain_assign(record, new_status).is_allowed()
    }

    /// Read-side check: may the viewer see the name of `status` on this record.
    pub fn can_view_status(&self, record: &Record, status: &StatusId) -> bool {
        self.can_assign_status(record, status)
    }

    /// May the record move from its current status to `new_status`
    /// (`None` clears the status).
    pub fn explain_transition(&self, record: &Record, new_status: Option<&StatusId>) -> Decision {
        self.tabs
            .decide(INFORMATIONS_TAB, Action::Edit)
            .and_then(|| self.explain_edit_current(record))
            .and_then(|| match new_status {
                Some(target) if record.status() == Some(target) => {
                    Decision::allow(Reason::StatusUnchanged)
                }
                Some(target) => self.explain_assign(record, target),
                None => Decision::allow(Reason::StatusUnchanged),
            })
    }

    pub fn can_transition(&self, record: &Record, new_status: Option<&StatusId>) -> bool {
        self.explain_transition(record, new_status).is_allowed()
    }

    pub fn plan_transition(&self, record: &Record, new_status: Option<&StatusId>) -> TransitionPlan<'a> {
        let decision = self.explain_transition(record, new_status);
        let changes = new_status.is_some() && new_status != record.status();
        let target = new_status.and_then(|id| self.catalog.get(id));
        let obligations = target.filter(|_| changes && decision.is_allowed());
        TransitionPlan {
            decision,
            target,
            requires_event: obligations.is_some_and(|status| status.is_event),
            requires_client_conversion: obligations.is_some_and(|status| status.client_default),
        }
    }

    /// Label to render for the record's status: the real name when the viewer
    /// may see it, otherwise a mask derived from the status type.
    pub fn status_display_text(&self, record: &Record) -> Option<&'a str> {
        let status_id = record.status()?;
        let status = self.catalog.get(status_id);
        match status {
            Some(status) if self.can_view_status(record, status_id) => Some(status.name.as_str()),
            Some(status) => Some(status.kind.masked_label()),
            None => Some(StatusKind::Unknown.masked_label()),
        }
    }

    /// Catalog statuses this record may be moved to, in catalog order.
    pub fn assignable_statuses(&self, record: &Record) -> Vec<&'a Status> {
        self.catalog
            .iter()
            .filter(|status| self.can_assign_status(record, &status.id))
            .collect()
    }
}
