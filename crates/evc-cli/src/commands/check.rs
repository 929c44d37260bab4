//! `evc check`: one-shot reconciliation of files/archives already on disk.

use anyhow::{Context, Result};
use evc_artifacts::ArchiveMemberSource;
use evc_reconcile::{reconcile_sources, CandidateSource, FileSource, TracingReporter};
use std::path::{Path, PathBuf};

use super::fail_unless_pass;

pub fn check(
    master: &Path,
    candidates: &[PathBuf],
    archives: &[PathBuf],
    member: &str,
    json: bool,
) -> Result<()> {
    let mut sources: Vec<Box<dyn CandidateSource>> = Vec::new();
    for path in candidates {
        sources.push(Box::new(FileSource::new(path)));
    }
    for archive in archives {
        sources.push(Box::new(ArchiveMemberSource::new(
            archive.display().to_string(),
            archive,
            member,
        )));
    }
    let refs: Vec<&dyn CandidateSource> = sources.iter().map(|s| s.as_ref()).collect();

    let report = reconcile_sources(master, &refs, &mut TracingReporter)?;

    if json {
        println!(
            "{}",
            report.to_json_pretty().context("serialize report failed")?
        );
    } else {
        println!("{report}");
    }

    fail_unless_pass(&report)
}
