//! Explainable access report for one record.
//!
//! Collects every decision the contact screen would make for the snapshot's
//! actor and record, each with the rule that settled it.
use fiche_authz::gate::INFORMATIONS_TAB;
use fiche_authz::{
    AccessEngine, Action, Component, ContactField, Decision, NoteItem, Record, StatusId,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRow {
    pub tab: String,
    pub view: Decision,
    pub create: Decision,
    pub edit: Decision,
    pub delete: Decision,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRow {
    pub field: String,
    pub backend_id: Option<String>,
    pub view: Decision,
    pub edit: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_edit: Option<Decision>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRow {
    pub status_id: StatusId,
    pub name: String,
    pub decision: Decision,
    pub requires_event: bool,
    pub requires_client_conversion: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub view: Decision,
    pub create: Decision,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRow {
    pub id: String,
    pub category_id: Option<String>,
    pub view: Decision,
    pub edit: Decision,
    pub delete: Decision,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessReport {
    pub record_id: String,
    pub unassigned: bool,
    pub status_display: Option<String>,
    pub fingerprint: String,
    pub permission_count: usize,
    pub tabs: Vec<TabRow>,
    pub fields: Vec<FieldRow>,
    pub transitions: Vec<TransitionRow>,
    pub default_category: Option<String>,
    pub categories: Vec<CategoryRow>,
    pub notes: Vec<NoteRow>,
    /// Field answers where the cached boolean disagreed with the explanation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cache_mismatches: Vec<String>,
}

/// Report inputs besides the engine itself.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest<'a> {
    pub record: &'a Record,
    pub notes: &'a [NoteItem],
    /// UI field names; empty means every mapped field.
    pub fields: &'a [String],
    pub modal_status: Option<&'a StatusId>,
}

impl AccessReport {
    pub fn build(engine: &AccessEngine, request: ReportRequest<'_>) -> Self {
        let record = request.record;
        let index = engine.index();
        let category_gate = engine.category_gate();
        let fields: Vec<FieldRow> = field_names(request.fields)
            .into_iter()
            .map(|field| FieldRow {
                backend_id: ContactField::from_ui_name(&field)
                    .map(|mapped| mapped.backend_id().to_string()),
                view: engine.explain_view_field(&field, record),
                edit: engine.explain_edit_field(&field, record),
                modal_edit: request.modal_status.map(|candidate| {
                    engine.explain_edit_field_in_modal(&field, record, Some(candidate))
                }),
                field,
            })
            .collect();
        let cache_mismatches = cache_mismatches(engine, record, &fields, request.modal_status);

        Self {
            record_id: record.id.to_string(),
            unassigned: record.is_unassigned(),
            status_display: engine.status_display_text(record).map(str::to_string),
            fingerprint: index.fingerprint().to_string(),
            permission_count: index.len(),
            tabs: tab_names(engine)
                .into_iter()
                .map(|tab| {
                    let tabs = engine.tabs();
                    TabRow {
                        view: tabs.decide(&tab, Action::View),
                        create: tabs.decide(&tab, Action::Create),
                        edit: tabs.decide(&tab, Action::Edit),
                        delete: tabs.decide(&tab, Action::Delete),
                        tab,
                    }
                })
                .collect(),
            fields,
            transitions: engine
                .status_catalog()
                .iter()
                .map(|status| {
                    let plan = engine.plan_transition(record, Some(&status.id));
                    TransitionRow {
                        status_id: status.id.clone(),
                        name: status.name.clone(),
                        decision: plan.decision,
                        requires_event: plan.requires_event,
                        requires_client_conversion: plan.requires_client_conversion,
                    }
                })
                .collect(),
            default_category: engine
                .default_category()
                .map(|category| category.id.to_string()),
            categories: engine
                .category_catalog()
                .ordered()
                .iter()
                .map(|category| CategoryRow {
                    id: category.id.to_string(),
                    name: category.name.clone(),
                    view: category_gate.explain_view_category(&category.id),
                    create: category_gate.explain_create_in_category(&category.id),
                })
                .collect(),
            notes: request
                .notes
                .iter()
                .map(|note| NoteRow {
                    id: note.id.clone(),
                    category_id: note.category_id.as_ref().map(ToString::to_string),
                    view: category_gate.explain_view_item(note),
                    edit: category_gate.explain_edit_item(note),
                    delete: category_gate.explain_delete_item(note),
                })
                .collect(),
            cache_mismatches,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let status = self.status_display.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "record {} (status: {status}, unassigned: {})",
            self.record_id, self.unassigned
        );
        let _ = writeln!(
            out,
            "permissions: {} entries, fingerprint {}",
            self.permission_count, self.fingerprint
        );

        let _ = writeln!(out, "\ntabs");
        for row in &self.tabs {
            let _ = writeln!(
                out,
                "  {:<16} view={} create={} edit={} delete={}",
                row.tab,
                mark(row.view),
                mark(row.create),
                mark(row.edit),
                mark(row.delete)
            );
        }

        let _ = writeln!(out, "\nfields");
        for row in &self.fields {
            let backend = row.backend_id.as_deref().unwrap_or("?");
            let _ = writeln!(out, "  {:<18} [{backend}]", row.field);
            let _ = writeln!(out, "    view  {}", row.view);
            let _ = writeln!(out, "    edit  {}", row.edit);
            if let Some(modal) = row.modal_edit {
                let _ = writeln!(out, "    modal {modal}");
            }
        }

        if !self.transitions.is_empty() {
            let _ = writeln!(out, "\ntransitions");
            for row in &self.transitions {
                let mut extra = String::new();
                if row.requires_event {
                    extra.push_str(" +event");
                }
                if row.requires_client_conversion {
                    extra.push_str(" +client-form");
                }
                let _ = writeln!(
                    out,
                    "  -> {:<10} {:<20} {}{extra}",
                    row.status_id.as_str(),
                    row.name,
                    row.decision
                );
            }
        }

        if !self.categories.is_empty() {
            let default = self.default_category.as_deref().unwrap_or("-");
            let _ = writeln!(out, "\ncategories (default: {default})");
            for row in &self.categories {
                let _ = writeln!(
                    out,
                    "  {:<12} {:<20} view={} create={}",
                    row.id,
                    row.name,
                    mark(row.view),
                    mark(row.create)
                );
            }
        }

        if !self.notes.is_empty() {
            let _ = writeln!(out, "\nnotes");
            for row in &self.notes {
                let category = row.category_id.as_deref().unwrap_or("-");
                let _ = writeln!(
                    out,
                    "  {:<8} category={category:<10} view={} edit={} delete={}",
                    row.id,
                    mark(row.view),
                    mark(row.edit),
                    mark(row.delete)
                );
            }
        }

        if !self.cache_mismatches.is_empty() {
            let _ = writeln!(out, "\ncache mismatches");
            for line in &self.cache_mismatches {
                let _ = writeln!(out, "  {line}");
            }
        }
        out
    }
}

/// Ask the cached entry points the same questions as the explained rows.
fn cache_mismatches(
    engine: &AccessEngine,
    record: &Record,
    rows: &[FieldRow],
    modal_status: Option<&StatusId>,
) -> Vec<String> {
    let mut mismatches = Vec::new();
    for row in rows {
        let field = row.field.as_str();
        let mut check = |kind: &str, cached: bool, explained: Decision| {
            if cached != explained.is_allowed() {
                warn!(field, kind, cached, "cached field answer disagrees with explanation");
                mismatches.push(format!("{field} {kind}: cached={cached} explained={explained}"));
            }
        };
        check("view", engine.can_view_field(field, record), row.view);
        check("edit", engine.can_edit_field(field, record), row.edit);
        if let Some(modal) = row.modal_edit {
            check(
                "modal",
                engine.can_edit_field_in_modal(field, record, modal_status),
                modal,
            );
        }
    }
    mismatches
}

fn mark(decision: Decision) -> &'static str {
    if decision.is_allowed() { "yes" } else { "no" }
}

/// `informations` plus every tab named by a tab entry, sorted.
fn tab_names(engine: &AccessEngine) -> Vec<String> {
    let index = engine.index();
    let mut tabs: BTreeSet<String> = BTreeSet::new();
    tabs.insert(INFORMATIONS_TAB.to_string());
    for action in Action::ALL {
        tabs.extend(
            index
                .field_set(&Component::ContactTabs, action)
                .iter()
                .cloned(),
        );
    }
    tabs.into_iter().collect()
}

fn field_names(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        ContactField::ALL
            .iter()
            .map(|field| field.ui_name().to_string())
            .collect()
    } else {
        requested.to_vec()
    }
}
