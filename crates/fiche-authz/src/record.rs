use crate::types::optional_id;
use crate::{CategoryId, OperatorId, RecordId, StatusId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of a contact record as seen by the gates.
///
/// Field values are carried opaquely; gates only read the identity, the
/// status and the operator assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(default, deserialize_with = "optional_id")]
    pub status_id: Option<StatusId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub teleoperator_id: Option<OperatorId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub confirmateur_id: Option<OperatorId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            status_id: None,
            teleoperator_id: None,
            confirmateur_id: None,
            fields: Map::new(),
        }
    }

    pub fn with_status(mut self, status_id: Option<&str>) -> Self {
        self.status_id = StatusId::from_optional(status_id);
        self
    }

    pub fn with_teleoperator(mut self, operator: Option<&str>) -> Self {
        self.teleoperator_id = OperatorId::from_optional(operator);
        self
    }

    pub fn with_confirmateur(mut self, operator: Option<&str>) -> Self {
        self.confirmateur_id = OperatorId::from_optional(operator);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Current status, ignoring blank ids.
    pub fn status(&self) -> Option<&StatusId> {
        self.status_id.as_ref().filter(|status| !status.is_blank())
    }

    /// No teleoperator and no confirmateur is assigned ("fosse").
    pub fn is_unassigned(&self) -> bool {
        let vacant = |operator: &Option<OperatorId>| operator.as_ref().is_none_or(OperatorId::is_blank);
        vacant(&self.teleoperator_id) && vacant(&self.confirmateur_id)
    }
}

/// Categorized sub-item of a record (a note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteItem {
    pub id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub text: String,
}

impl NoteItem {
    pub fn new(id: impl Into<String>, category_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            category_id: CategoryId::from_optional(category_id),
            text: String::new(),
        }
    }
}
