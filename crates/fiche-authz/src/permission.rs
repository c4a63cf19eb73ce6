//! Permission entries, permission sets and their fingerprint.
//!
//! # Purpose
//! Defines the normalized, immutable view over the flat list of grants held
//! by the current actor.
//!
//! # How it fits
//! The session hands over raw entries; [`PermissionSet`] normalizes and
//! deduplicates them once, and [`crate::PermissionIndex`] builds lookup sets
//! from the result.
//!
//! # Key invariants
//! - An entry is scoped by the combination of non-empty attributes it carries;
//!   with neither `field_name` nor `status_id` it is a general grant.
//! - `field_name` and `status_id` are trimmed; blank means absent.
//! - A set is a set: order and duplicates in the input do not matter, and the
//!   fingerprint is identical for any permutation of the same entries.
//!
//! # Examples
//! ```rust
//! use fiche_authz::{Action, Component, PermissionEntry, PermissionSet};
//!
//! let set: PermissionSet = ["statuses:view::s1", "fiche_contact:view:fname"]
//!     .into_iter()
//!     .map(|raw| raw.parse::<PermissionEntry>().expect("entry"))
//!     .collect();
//! assert_eq!(set.len(), 2);
//! assert!(set.entries().iter().any(|e| e.component == Component::Statuses && e.action == Action::View));
//! ```
//!
//! # Common pitfalls
//! - Field-scoped `fiche_contact` entries carry the backend field id (`fname`),
//!   not the UI name (`firstName`).
use crate::types::optional_id;
use crate::{Action, AuthzError, AuthzResult, StatusId};
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Subsystem a permission entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Component {
    ContactTabs,
    FicheContact,
    Statuses,
    FosseStatuses,
    NoteCategories,
    Planning,
    Other,
    /// Tag unknown to the engine; kept verbatim, never consulted by a gate.
    Unrecognized(String),
}

impl Component {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "contact_tabs" => Component::ContactTabs,
            "fiche_contact" => Component::FicheContact,
            "statuses" => Component::Statuses,
            "fosse_statuses" => Component::FosseStatuses,
            "note_categories" => Component::NoteCategories,
            "planning" => Component::Planning,
            "other" => Component::Other,
            other => Component::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Component::ContactTabs => "contact_tabs",
            Component::FicheContact => "fiche_contact",
            Component::Statuses => "statuses",
            Component::FosseStatuses => "fosse_statuses",
            Component::NoteCategories => "note_categories",
            Component::Planning => "planning",
            Component::Other => "other",
            Component::Unrecognized(tag) => tag,
        }
    }
}

impl From<String> for Component {
    fn from(value: String) -> Self {
        Component::from_tag(&value)
    }
}

impl From<Component> for String {
    fn from(value: Component) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry as delivered by the session, before action validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPermissionEntry {
    pub component: String,
    pub action: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub field_name: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub status_id: Option<StatusId>,
}

/// One granted capability.
///
/// # Example
/// ```rust
/// use fiche_authz::{Action, Component, PermissionEntry};
///
/// let entry = PermissionEntry::new(Component::ContactTabs, Action::Edit, Some("informations"), None);
/// assert_eq!(entry.to_string(), "contact_tabs:edit:informations");
/// assert!(!entry.is_general());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPermissionEntry")]
pub struct PermissionEntry {
    pub component: Component,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<StatusId>,
}

impl PermissionEntry {
    pub fn new(
        component: Component,
        action: Action,
        field_name: Option<&str>,
        status_id: Option<&str>,
    ) -> Self {
        Self {
            component,
            action,
            field_name: non_blank(field_name),
            status_id: StatusId::from_optional(status_id),
        }
    }

    /// General grant for the component and action.
    pub fn general(component: Component, action: Action) -> Self {
        Self::new(component, action, None, None)
    }

    pub fn field(component: Component, action: Action, field_name: &str) -> Self {
        Self::new(component, action, Some(field_name), None)
    }

    pub fn status(component: Component, action: Action, status_id: &str) -> Self {
        Self::new(component, action, None, Some(status_id))
    }

    pub fn is_general(&self) -> bool {
        self.field_name.is_none() && self.status_id.is_none()
    }

    /// Feeds the entry to the fingerprint hasher, each attribute length-prefixed.
    fn hash_into(&self, hasher: &mut Sha256) {
        hash_str(hasher, self.component.as_str());
        hash_str(hasher, self.action.as_str());
        hash_optional(hasher, self.field_name.as_deref());
        hash_optional(hasher, self.status_id.as_ref().map(StatusId::as_str));
    }
}

fn hash_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
}

fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.update([1u8]);
            hash_str(hasher, value);
        }
        None => hasher.update([0u8]),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl TryFrom<RawPermissionEntry> for PermissionEntry {
    type Error = AuthzError;

    fn try_from(raw: RawPermissionEntry) -> Result<Self, Self::Error> {
        let component = raw.component.trim();
        if component.is_empty() {
            return Err(AuthzError::EmptyComponent(format!(
                "{}:{}",
                raw.component, raw.action
            )));
        }
        let action = raw
            .action
            .parse::<Action>()
            .map_err(|_| AuthzError::InvalidAction(raw.action.clone()))?;
        Ok(Self::new(
            Component::from_tag(component),
            action,
            raw.field_name.as_deref(),
            raw.status_id.as_ref().map(StatusId::as_str),
        ))
    }
}

impl std::str::FromStr for PermissionEntry {
    type Err = AuthzError;

    /// Parse the compact `component:action[:field_name[:status_id]]` form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(4, ':');
        let component = parts.next().unwrap_or_default();
        let action = parts
            .next()
            .ok_or_else(|| AuthzError::InvalidPermission(value.to_string()))?;
        let field_name = parts.next();
        let status_id = parts.next();
        RawPermissionEntry {
            component: component.to_string(),
            action: action.to_string(),
            field_name: field_name.map(str::to_string),
            status_id: StatusId::from_optional(status_id),
        }
        .try_into()
    }
}

impl PermissionEntry {
    /// Parse a compact permission string.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPermission`] if the action segment is missing.
    /// - [`AuthzError::InvalidAction`] if the action is unknown.
    /// - [`AuthzError::EmptyComponent`] if the component segment is blank.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        value.parse()
    }
}

impl std::fmt::Display for PermissionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.component, self.action)?;
        match (&self.field_name, &self.status_id) {
            (None, None) => Ok(()),
            (Some(field), None) => write!(f, ":{field}"),
            (field, Some(status)) => {
                write!(f, ":{}:{status}", field.as_deref().unwrap_or(""))
            }
        }
    }
}

/// Order-independent digest of a permission set, used only in cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Arc<str>);

impl Fingerprint {
    fn of(entries: &[PermissionEntry]) -> Self {
        // Entries are already sorted and deduplicated.
        let mut hasher = Sha256::new();
        hasher.update((entries.len() as u64).to_be_bytes());
        for entry in entries {
            entry.hash_into(&mut hasher);
        }
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized, immutable collection of an actor's grants.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Vec<serde_json::Value>")]
pub struct PermissionSet {
    entries: Vec<PermissionEntry>,
    fingerprint: Fingerprint,
}

impl PermissionSet {
    pub fn new(entries: impl IntoIterator<Item = PermissionEntry>) -> Self {
        let mut entries: Vec<PermissionEntry> = entries.into_iter().collect();
        entries.sort();
        entries.dedup();
        let fingerprint = Fingerprint::of(&entries);
        Self {
            entries,
            fingerprint,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build from session entries, dropping those that do not validate.
    ///
    /// Never fails: a malformed entry simply grants nothing.
    pub fn from_raw(raw: impl IntoIterator<Item = RawPermissionEntry>) -> Self {
        let entries = raw.into_iter().filter_map(|raw| {
            let rendered = format!("{}:{}", raw.component, raw.action);
            match PermissionEntry::try_from(raw) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(entry = %rendered, error = %err, "dropping permission entry");
                    None
                }
            }
        });
        Self::new(entries)
    }

    /// Parse a list of compact permission strings; the first invalid one fails the batch.
    pub fn parse_compact<S: AsRef<str>>(values: &[S]) -> AuthzResult<Self> {
        let mut parsed = Vec::with_capacity(values.len());
        for value in values {
            parsed.push(value.as_ref().parse()?);
        }
        Ok(Self::new(parsed))
    }

    pub fn entries(&self) -> &[PermissionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<PermissionEntry> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionEntry>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<RawPermissionEntry>> for PermissionSet {
    fn from(raw: Vec<RawPermissionEntry>) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Vec<serde_json::Value>> for PermissionSet {
    /// Elements that are not entry-shaped are dropped one by one.
    fn from(values: Vec<serde_json::Value>) -> Self {
        let raw = values.into_iter().filter_map(|value| {
            match serde_json::from_value::<RawPermissionEntry>(value) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    debug!(error = %err, "dropping malformed permission entry");
                    None
                }
            }
        });
        Self::from_raw(raw)
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
