use anyhow::{Context, Result};
use fiche_authz::{AccessEngine, CategoryCatalog, NoteItem, PermissionSet, Record, StatusCatalog};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Everything the contact screen receives for one actor and one record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub statuses: StatusCatalog,
    #[serde(default)]
    pub categories: CategoryCatalog,
    pub record: Record,
    #[serde(default)]
    pub notes: Vec<NoteItem>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read snapshot: {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("load snapshot: {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).with_context(|| "parse snapshot json")
    }

    /// Split into an engine plus the record and notes it will be asked about.
    pub fn into_parts(self) -> (AccessEngine, Record, Vec<NoteItem>) {
        let engine = AccessEngine::new(self.permissions, self.statuses, self.categories);
        (engine, self.record, self.notes)
    }
}
