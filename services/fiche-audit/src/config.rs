use anyhow::{Context, Result, bail};
use fiche_authz::StatusId;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format: {other}"),
        }
    }
}

// Audit configuration sourced from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub snapshot: PathBuf,
    pub format: OutputFormat,
    /// UI field names to report; `None` reports every mapped field.
    pub fields: Option<Vec<String>>,
    /// Candidate status used for the modal edit column.
    pub modal_status: Option<StatusId>,
}

#[derive(Debug, Deserialize)]
struct AuditConfigOverride {
    snapshot: Option<String>,
    format: Option<String>,
    fields: Option<Vec<String>>,
    modal_status: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("snapshot.json"),
            format: OutputFormat::Text,
            fields: None,
            modal_status: None,
        }
    }
}

impl AuditConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup("FICHE_AUDIT_SNAPSHOT") {
            config.snapshot = PathBuf::from(path);
        }
        if let Some(format) = lookup("FICHE_AUDIT_FORMAT") {
            config.format = format.parse().with_context(|| "parse FICHE_AUDIT_FORMAT")?;
        }
        if let Some(fields) = lookup("FICHE_AUDIT_FIELDS") {
            config.fields = Some(split_list(&fields));
        }
        config.modal_status = StatusId::from_optional(lookup("FICHE_AUDIT_MODAL_STATUS").as_deref());
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("FICHE_AUDIT_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read FICHE_AUDIT_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    pub fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: AuditConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse audit config yaml")?;
        if let Some(value) = override_cfg.snapshot {
            self.snapshot = PathBuf::from(value);
        }
        if let Some(value) = override_cfg.format {
            self.format = value.parse().with_context(|| "parse format")?;
        }
        if let Some(value) = override_cfg.fields {
            self.fields = Some(value.into_iter().filter(|f| !f.trim().is_empty()).collect());
        }
        if let Some(value) = override_cfg.modal_status {
            self.modal_status = StatusId::from_optional(Some(&value));
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
