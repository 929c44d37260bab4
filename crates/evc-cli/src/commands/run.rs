//! `evc run`: config-driven reconciliation with a persisted run record.

use anyhow::{Context, Result};
use evc_artifacts::{bundle_tar_gz, write_run_record, RunManifest};
use evc_reconcile::{reconcile_sources, CandidateSource, TracingReporter};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{candidate_sources, fail_unless_pass};

pub fn run(config_paths: &[String], base: Option<PathBuf>) -> Result<()> {
    let base = match base {
        Some(b) => b,
        None => config_paths
            .first()
            .and_then(|p| Path::new(p).parent())
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = evc_config::load_harness(&path_refs, &base)?;
    let harness = &loaded.harness;
    info!(
        config_hash = %loaded.loaded.config_hash,
        label = %harness.run_label,
        targets = harness.candidates.len(),
        "harness config loaded"
    );

    let sources = candidate_sources(&harness.candidates);
    let refs: Vec<&dyn CandidateSource> = sources.iter().map(|s| s.as_ref()).collect();
    let report = reconcile_sources(&harness.master, &refs, &mut TracingReporter)
        .context("reconcile harness candidates")?;

    let names: Vec<String> = harness
        .candidates
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let manifest = RunManifest::new(
        &harness.run_label,
        Some(loaded.loaded.config_hash.as_str()),
        &harness.master,
        &names,
        &report,
    );
    let record = write_run_record(
        &harness.artifacts_dir.join(&harness.run_label),
        &manifest,
        &report,
    )?;

    println!("run_id={}", manifest.run_id);
    println!("config_hash={}", loaded.loaded.config_hash);
    println!("manifest={}", record.manifest_path.display());
    if let Some(reports_dir) = &harness.reports_dir {
        let bundle = bundle_tar_gz(&harness.artifacts_dir, reports_dir)?;
        println!("bundle={}", bundle.display());
    }
    println!("{report}");

    fail_unless_pass(&report)
}
