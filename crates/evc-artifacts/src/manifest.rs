use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use evc_reconcile::{EventCounts, ReconcileReport, Verdict};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const MANIFEST_SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub label: String,
    /// Hash of the layered harness config, when the run was config-driven.
    pub config_hash: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub master: String,
    pub candidates: Vec<String>,
    pub verdict: String,
    pub counts: ManifestCounts,
    pub artifacts: ArtifactList,
}

/// Mirror of [`EventCounts`] that can be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCounts {
    pub valid: u64,
    pub duplicate: u64,
    pub missing: u64,
    pub invalid: u64,
}

impl From<EventCounts> for ManifestCounts {
    fn from(c: EventCounts) -> Self {
        Self {
            valid: c.valid,
            duplicate: c.duplicate,
            missing: c.missing,
            invalid: c.invalid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub manifest_json: String,
    pub report_json: String,
    pub summary_txt: String,
}

impl Default for ArtifactList {
    fn default() -> Self {
        Self {
            manifest_json: "manifest.json".to_string(),
            report_json: "report.json".to_string(),
            summary_txt: "summary.txt".to_string(),
        }
    }
}

impl RunManifest {
    pub fn new(
        label: &str,
        config_hash: Option<&str>,
        master: &Path,
        candidates: &[String],
        report: &ReconcileReport,
    ) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            run_id: Uuid::new_v4(),
            label: label.to_string(),
            config_hash: config_hash.map(str::to_string),
            created_at_utc: Utc::now(),
            master: master.display().to_string(),
            candidates: candidates.to_vec(),
            verdict: report.verdict.as_str().to_string(),
            counts: report.counts.into(),
            artifacts: ArtifactList::default(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass.as_str()
    }
}

pub struct RunRecordPaths {
    pub manifest_path: PathBuf,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Write `manifest.json`, `report.json` and `summary.txt` into `dir`.
pub fn write_run_record(
    dir: &Path,
    manifest: &RunManifest,
    report: &ReconcileReport,
) -> Result<RunRecordPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create run dir failed: {}", dir.display()))?;

    let manifest_path = dir.join(&manifest.artifacts.manifest_json);
    let json = serde_json::to_string_pretty(manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    let report_path = dir.join(&manifest.artifacts.report_json);
    let json = report.to_json_pretty().context("serialize report failed")?;
    fs::write(&report_path, format!("{json}\n"))
        .with_context(|| format!("write report failed: {}", report_path.display()))?;

    let summary_path = dir.join(&manifest.artifacts.summary_txt);
    fs::write(&summary_path, report.to_string())
        .with_context(|| format!("write summary failed: {}", summary_path.display()))?;

    Ok(RunRecordPaths {
        manifest_path,
        report_path,
        summary_path,
    })
}
