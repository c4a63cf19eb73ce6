//! Reference data: lifecycle statuses and note categories.
//!
//! Both catalogs are loaded once and never mutated by the engine.
use crate::{CategoryId, StatusId};
use serde::{Deserialize, Serialize};

/// Business type of a status; drives the masked label shown to viewers
/// without access to the status itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusKind {
    Lead,
    Client,
    Unknown,
}

impl From<String> for StatusKind {
    fn from(value: String) -> Self {
        match value.trim() {
            "lead" => StatusKind::Lead,
            "client" => StatusKind::Client,
            _ => StatusKind::Unknown,
        }
    }
}

impl From<StatusKind> for String {
    fn from(kind: StatusKind) -> Self {
        kind.as_str().to_string()
    }
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Lead => "lead",
            StatusKind::Client => "client",
            StatusKind::Unknown => "unknown",
        }
    }

    pub fn masked_label(self) -> &'static str {
        match self {
            StatusKind::Client => "CLIENT EN COURS",
            StatusKind::Lead => "Indisponible - LEAD",
            StatusKind::Unknown => "Indisponible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: StatusId,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: StatusKind,
    #[serde(default)]
    pub is_event: bool,
    #[serde(default)]
    pub client_default: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn unknown_kind() -> StatusKind {
    StatusKind::Unknown
}

impl Status {
    pub fn new(id: impl Into<StatusId>, kind: StatusKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            is_event: false,
            client_default: false,
            name: name.into(),
            color: None,
        }
    }

    pub fn with_event(mut self, is_event: bool) -> Self {
        self.is_event = is_event;
        self
    }

    pub fn with_client_default(mut self, client_default: bool) -> Self {
        self.client_default = client_default;
        self
    }
}

/// Statuses in the order the backend delivered them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCatalog {
    statuses: Vec<Status>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }

    pub fn get(&self, id: &StatusId) -> Option<&Status> {
        self.statuses.iter().find(|status| &status.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub order_index: i64,
}

impl NoteCategory {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, order_index: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order_index,
        }
    }
}

/// Note categories kept in display order: ascending `order_index`, ties in
/// insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<NoteCategory>", into = "Vec<NoteCategory>")]
pub struct CategoryCatalog {
    ordered: Vec<NoteCategory>,
}

impl CategoryCatalog {
    pub fn new(mut categories: Vec<NoteCategory>) -> Self {
        // `sort_by_key` is stable, which gives the insertion-order tie break.
        categories.sort_by_key(|category| category.order_index);
        Self {
            ordered: categories,
        }
    }

    pub fn get(&self, id: &CategoryId) -> Option<&NoteCategory> {
        self.ordered.iter().find(|category| &category.id == id)
    }

    pub fn ordered(&self) -> &[NoteCategory] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl From<Vec<NoteCategory>> for CategoryCatalog {
    fn from(categories: Vec<NoteCategory>) -> Self {
        Self::new(categories)
    }
}

impl From<CategoryCatalog> for Vec<NoteCategory> {
    fn from(catalog: CategoryCatalog) -> Self {
        catalog.ordered
    }
}
