//! Access gates and their shared precedence table.
//!
//! # Purpose
//! Each gate answers one dimension of access (tab, status, field, category)
//! over a borrowed [`crate::PermissionIndex`]. Gates are `Copy` views: cheap
//! to build on every render, pure, and never mutate what they read.
//!
//! # Precedence
//! Field and category decisions run a fixed list of preconditions before
//! their own rule, short-circuiting on the first denial. The list is declared
//! once in [`PRECEDENCE`] rather than repeated per call site.
//!
//! # Examples
//! ```rust
//! use fiche_authz::gate::{Precondition, Subject, preconditions};
//! use fiche_authz::Action;
//!
//! assert_eq!(
//!     preconditions(Subject::Field, Action::Edit),
//!     &[Precondition::Tab(Action::Edit), Precondition::CurrentStatus]
//! );
//! assert!(preconditions(Subject::Field, Action::View).is_empty());
//! ```
mod category;
mod field;
mod status;
mod tab;

pub use category::CategoryGate;
pub use field::{FieldGate, StatusRelaxation};
pub use status::{StatusGate, TransitionPlan};
pub use tab::{INFORMATIONS_TAB, TabGate};

use crate::{Action, Decision};

/// What is being gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Field,
    Category,
}

/// A check that must pass before a subject's own rule is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precondition {
    /// TabGate on the `informations` tab for the given action.
    Tab(Action),
    /// StatusGate: the record's current status must be editable.
    CurrentStatus,
}

impl Precondition {
    /// The tab action checked by this step, if it is a tab step.
    pub fn tab_action(self) -> Option<Action> {
        match self {
            Precondition::Tab(action) => Some(action),
            Precondition::CurrentStatus => None,
        }
    }
}

/// Preconditions per subject and action, in evaluation order.
pub const PRECEDENCE: &[(Subject, Action, &[Precondition])] = &[
    (Subject::Field, Action::View, &[]),
    (
        Subject::Field,
        Action::Edit,
        &[Precondition::Tab(Action::Edit), Precondition::CurrentStatus],
    ),
    (Subject::Category, Action::View, &[]),
    (
        Subject::Category,
        Action::Create,
        &[Precondition::Tab(Action::Create)],
    ),
    (
        Subject::Category,
        Action::Edit,
        &[Precondition::Tab(Action::Edit)],
    ),
    (
        Subject::Category,
        Action::Delete,
        &[Precondition::Tab(Action::Delete)],
    ),
];

pub fn preconditions(subject: Subject, action: Action) -> &'static [Precondition] {
    PRECEDENCE
        .iter()
        .find(|(s, a, _)| *s == subject && *a == action)
        .map(|(_, _, steps)| *steps)
        .unwrap_or(&[])
}

/// Run `steps` through `check` in order, then `rule` if every step allowed.
pub(crate) fn evaluate(
    steps: &[Precondition],
    mut check: impl FnMut(Precondition) -> Decision,
    rule: impl FnOnce() -> Decision,
) -> Decision {
    for step in steps {
        let decision = check(*step);
        if !decision.is_allowed() {
            return decision;
        }
    }
    rule()
}
