//! Permission resolution for the contact record ("fiche") screens.
//!
//! # Purpose
//! Turns an actor's flat list of permission entries into answers to the
//! questions the contact form asks: may this tab be shown, may this field be
//! edited, may the record move to that status, which notes are visible.
//!
//! # How it fits
//! The backend ships a [`PermissionSet`] per actor plus status and note
//! category catalogs. Callers build an [`AccessEngine`] once per permission
//! version and query it on every render. Nothing here performs I/O.
//!
//! # Key invariants
//! - Gates never fail. A family with no entries at all is open; once any
//!   entry of a family exists, only what it lists is granted.
//! - Precedence is tab, then current status, then the field or category rule,
//!   declared once in [`gate::PRECEDENCE`].
//! - Unassigned ("fosse") records resolve status visibility in the
//!   `fosse_statuses` namespace.
//! - Cached field answers are keyed by record, status, assignment, permission
//!   fingerprint and tab edit access; any change clears the cache.
//!
//! # Examples
//! ```rust
//! use fiche_authz::{AccessEngine, CategoryCatalog, PermissionSet, Record, Status, StatusCatalog, StatusKind};
//!
//! let set = PermissionSet::parse_compact(&[
//!     "contact_tabs:edit:informations",
//!     "statuses:edit::s1",
//!     "fiche_contact:edit:fname",
//! ])
//! .expect("valid entries");
//! let statuses = StatusCatalog::new(vec![Status::new("s1", StatusKind::Lead, "Nouveau")]);
//! let engine = AccessEngine::new(set, statuses, CategoryCatalog::default());
//!
//! let record = Record::new("42").with_status(Some("s1"));
//! assert!(engine.can_edit_field("firstName", &record));
//! assert!(!engine.can_edit_field("email", &record));
//! ```
//!
//! # Common pitfalls
//! - `fiche_contact` entries name backend ids (`fname`), while gates take UI
//!   names (`firstName`); see [`ContactField`].
//! - A general `fiche_contact:edit` entry does not list any field.

mod action;
mod cache;
mod catalog;
mod decision;
mod engine;
mod errors;
mod fields;
pub mod gate;
mod index;
mod permission;
mod record;
mod types;

pub use action::Action;
pub use cache::{CacheStats, DecisionCache, DecisionKey, FieldQuery, QueryKind};
pub use catalog::{CategoryCatalog, NoteCategory, Status, StatusCatalog, StatusKind};
pub use decision::{Decision, Reason};
pub use engine::AccessEngine;
pub use errors::{AuthzError, AuthzResult};
pub use fields::ContactField;
pub use gate::{CategoryGate, FieldGate, StatusGate, StatusRelaxation, TabGate, TransitionPlan};
pub use index::PermissionIndex;
pub use permission::{Component, Fingerprint, PermissionEntry, PermissionSet, RawPermissionEntry};
pub use record::{NoteItem, Record};
pub use types::{CategoryId, OperatorId, RecordId, StatusId};
