//! Explainable gate outcomes.
//!
//! Every gate returns a [`Decision`] naming the rule that settled it; the
//! boolean entry points are thin wrappers over [`Decision::is_allowed`].
use serde::Serialize;

/// Rule that settled a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// No `contact_tabs` entry exists at all; tabs are open by default.
    TabsUnconfigured,
    TabGranted,
    TabNotGranted,
    /// The record carries no status.
    NoCurrentStatus,
    /// No `statuses` entry exists at all; current-status edits are open.
    StatusesUnconfigured,
    StatusGranted,
    StatusNotGranted,
    /// The target status is assignable (modal relaxation or transition).
    AssignGranted,
    AssignNotGranted,
    /// Target equals the current status; nothing to assign.
    StatusUnchanged,
    /// The UI field has no backend mapping.
    UnmappedField,
    FieldGranted,
    GeneralGrant,
    /// Field-scoped rules exist and none names this field.
    FieldNotListed,
    /// No field rules are configured for this action.
    NoFieldRules,
    /// The item carries no category.
    Uncategorized,
    CategoryGranted,
    CategoryNotGranted,
}

impl Reason {
    pub fn describe(self) -> &'static str {
        match self {
            Reason::TabsUnconfigured => "no tab permissions configured",
            Reason::TabGranted => "tab permission granted",
            Reason::TabNotGranted => "tab permission missing",
            Reason::NoCurrentStatus => "record has no status",
            Reason::StatusesUnconfigured => "no status permissions configured",
            Reason::StatusGranted => "current status is editable",
            Reason::StatusNotGranted => "current status is not editable",
            Reason::AssignGranted => "target status is assignable",
            Reason::AssignNotGranted => "target status is not assignable",
            Reason::StatusUnchanged => "status unchanged",
            Reason::UnmappedField => "field is not modeled",
            Reason::FieldGranted => "field permission granted",
            Reason::GeneralGrant => "general permission granted",
            Reason::FieldNotListed => "field not listed in field permissions",
            Reason::NoFieldRules => "no field permissions configured",
            Reason::Uncategorized => "item has no category",
            Reason::CategoryGranted => "category permission granted",
            Reason::CategoryNotGranted => "category permission missing",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Outcome of a gate together with the rule that produced it.
///
/// # Example
/// ```rust
/// use fiche_authz::{Decision, Reason};
///
/// let tab = Decision::allow(Reason::TabGranted);
/// let field = tab.and_then(|| Decision::deny(Reason::FieldNotListed));
/// assert!(!field.is_allowed());
/// assert_eq!(field.reason, Reason::FieldNotListed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Reason,
}

impl Decision {
    pub fn allow(reason: Reason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    pub fn deny(reason: Reason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    pub fn from_bool(allowed: bool, granted: Reason, missing: Reason) -> Self {
        if allowed {
            Self::allow(granted)
        } else {
            Self::deny(missing)
        }
    }

    pub fn is_allowed(self) -> bool {
        self.allowed
    }

    /// Continue with `next` only when this decision allows.
    pub fn and_then(self, next: impl FnOnce() -> Decision) -> Decision {
        if self.allowed { next() } else { self }
    }

    /// Fall back to `other` only when this decision denies.
    pub fn or_else(self, other: impl FnOnce() -> Decision) -> Decision {
        if self.allowed { self } else { other() }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.allowed { "allow" } else { "deny" };
        write!(f, "{verdict} ({})", self.reason)
    }
}
