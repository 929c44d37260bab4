//! Command handler modules for the `evc` binary.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod check;
pub mod run;

use anyhow::{bail, Context, Result};
use evc_artifacts::ArchiveMemberSource;
use evc_config::ResolvedCandidate;
use evc_reconcile::{CandidateSource, FileSource, ReconcileReport};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Logs go to stderr so stdout stays parseable (`--json`, `config_hash=`).
/// With `log_file` they go to that file instead, with source locations.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create log file failed: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Reconcilable sources for resolved harness candidates.
pub fn candidate_sources(candidates: &[ResolvedCandidate]) -> Vec<Box<dyn CandidateSource>> {
    candidates
        .iter()
        .map(|c| -> Box<dyn CandidateSource> {
            match c {
                ResolvedCandidate::File { name, path } => Box::new(FileSource::named(name, path)),
                ResolvedCandidate::Archive {
                    name,
                    archive,
                    member,
                } => Box::new(ArchiveMemberSource::new(name, archive, member)),
            }
        })
        .collect()
}

/// Non-zero exit for a failed verdict. The report itself is already printed.
pub fn fail_unless_pass(report: &ReconcileReport) -> Result<()> {
    if report.is_pass() {
        return Ok(());
    }
    let c = report.counts;
    bail!(
        "event reconciliation failed: duplicate={} missing={} invalid={}",
        c.duplicate,
        c.missing,
        c.invalid
    )
}
