use fiche_audit::report::{AccessReport, ReportRequest};
use fiche_audit::snapshot::Snapshot;
use fiche_authz::{Reason, StatusId};
use std::path::Path;

fn fixture() -> Snapshot {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot.json");
    Snapshot::load(&path).expect("load fixture snapshot")
}

#[test]
fn fixture_report_explains_fosse_record() {
    let (engine, record, notes) = fixture().into_parts();
    assert!(record.is_unassigned());
    // The unknown `approve` action is dropped on load.
    assert_eq!(engine.index().len(), 11);

    let candidate = StatusId::new("3");
    let report = AccessReport::build(
        &engine,
        ReportRequest {
            record: &record,
            notes: &notes,
            fields: &[],
            modal_status: Some(&candidate),
        },
    );

    // Status 2 is not visible in the fosse namespace.
    assert_eq!(report.status_display.as_deref(), Some("Indisponible - LEAD"));

    let field = |name: &str| {
        report
            .fields
            .iter()
            .find(|row| row.field == name)
            .expect("field row")
    };
    assert!(field("firstName").view.is_allowed());
    assert_eq!(field("email").view.reason, Reason::FieldNotListed);
    assert!(field("lastName").edit.is_allowed());
    assert_eq!(field("firstName").edit.reason, Reason::FieldNotListed);

    let tabs: Vec<&str> = report.tabs.iter().map(|row| row.tab.as_str()).collect();
    assert_eq!(tabs, vec!["informations", "notes"]);

    let to_client = report
        .transitions
        .iter()
        .find(|row| row.status_id.as_str() == "3")
        .expect("transition row");
    // Fosse records assign from `fosse_statuses`, which only lists status 1.
    assert_eq!(to_client.decision.reason, Reason::AssignNotGranted);
    let to_first = report
        .transitions
        .iter()
        .find(|row| row.status_id.as_str() == "1")
        .expect("transition row");
    assert!(to_first.decision.is_allowed());

    assert_eq!(report.default_category.as_deref(), Some("10"));
    let categories: Vec<&str> = report.categories.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(categories, vec!["10", "11"]);

    let note_view: Vec<bool> = report.notes.iter().map(|row| row.view.is_allowed()).collect();
    assert_eq!(note_view, vec![true, false, true]);
    assert!(report.notes[0].edit.is_allowed());
    assert!(!report.notes[2].edit.is_allowed());

    // Every explained field row was also answered through the cache.
    assert!(report.cache_mismatches.is_empty());
    assert_eq!(engine.cache_stats().misses, report.fields.len() * 3);
    for row in &report.fields {
        assert_eq!(engine.can_view_field(&row.field, &record), row.view.is_allowed());
        assert_eq!(engine.can_edit_field(&row.field, &record), row.edit.is_allowed());
        assert_eq!(
            Some(engine.can_edit_field_in_modal(&row.field, &record, Some(&candidate))),
            row.modal_edit.map(|modal| modal.is_allowed()),
        );
    }
}

#[test]
fn fixture_report_renders_both_formats() {
    let (engine, record, notes) = fixture().into_parts();
    let fields = vec!["lastName".to_string()];
    let report = AccessReport::build(
        &engine,
        ReportRequest {
            record: &record,
            notes: &notes,
            fields: &fields,
            modal_status: None,
        },
    );

    let text = report.render_text();
    assert!(text.contains("record 4021"));
    assert!(text.contains("lastName"));
    assert!(text.contains("A rappeler"));

    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("encode")).expect("decode");
    assert_eq!(json["recordId"], "4021");
    assert_eq!(json["unassigned"], true);
    assert_eq!(json["fields"].as_array().map(Vec::len), Some(1));
}
