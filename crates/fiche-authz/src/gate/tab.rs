use crate::{Action, Component, Decision, PermissionIndex, Reason};

/// Tab holding the contact's core fields; field and category gates compound with it.
pub const INFORMATIONS_TAB: &str = "informations";

/// Tab-level access.
///
/// Once any `contact_tabs` entry exists, a tab is reachable only through an
/// explicit grant; an actor with no tab entries at all keeps full access.
#[derive(Debug, Clone, Copy)]
pub struct TabGate<'a> {
    index: &'a PermissionIndex,
}

impl<'a> TabGate<'a> {
    pub fn new(index: &'a PermissionIndex) -> Self {
        Self { index }
    }

    pub fn decide(&self, tab: &str, action: Action) -> Decision {
        if !self.index.any_for_component(&Component::ContactTabs) {
            return Decision::allow(Reason::TabsUnconfigured);
        }
        Decision::from_bool(
            self.index
                .grants_field(&Component::ContactTabs, action, tab.trim()),
            Reason::TabGranted,
            Reason::TabNotGranted,
        )
    }

    pub fn can_view(&self, tab: &str) -> bool {
        self.decide(tab, Action::View).is_allowed()
    }

    pub fn can_create(&self, tab: &str) -> bool {
        self.decide(tab, Action::Create).is_allowed()
    }

    pub fn can_edit(&self, tab: &str) -> bool {
        self.decide(tab, Action::Edit).is_allowed()
    }

    pub fn can_delete(&self, tab: &str) -> bool {
        self.decide(tab, Action::Delete).is_allowed()
    }
}
