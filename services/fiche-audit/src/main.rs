// Access audit entry point.
mod observability;

use anyhow::{Context, Result};
use fiche_audit::config::{AuditConfig, OutputFormat};
use fiche_audit::report::{AccessReport, ReportRequest};
use fiche_audit::snapshot::Snapshot;

fn main() -> Result<()> {
    observability::init_observability();

    let config = AuditConfig::from_env_or_yaml()?;
    tracing::info!(snapshot = %config.snapshot.display(), "loading snapshot");

    let snapshot = Snapshot::load(&config.snapshot)?;
    let (engine, record, notes) = snapshot.into_parts();
    let fields = config.fields.clone().unwrap_or_default();
    let report = AccessReport::build(
        &engine,
        ReportRequest {
            record: &record,
            notes: &notes,
            fields: &fields,
            modal_status: config.modal_status.as_ref(),
        },
    );

    let output = match config.format {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => report.to_json().context("encode report json")?,
    };
    println!("{output}");

    tracing::info!(
        record_id = %record.id,
        fields = report.fields.len(),
        "report written"
    );
    Ok(())
}
