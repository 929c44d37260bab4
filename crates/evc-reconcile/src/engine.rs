use std::path::Path;

use crate::{
    CandidateSource, CandidateStream, CheckError, Ledger, NullReporter, ReconcileError,
    ReconcileFailure, ReconcileReport, Reporter,
};

/// Classify every expected event against the candidate streams.
///
/// Never fails on defects: missing, duplicate and invalid events are
/// reported, not raised. Use [`check`] for the pass/fail contract.
pub fn reconcile(
    master: &Path,
    streams: &mut [CandidateStream],
) -> Result<ReconcileReport, ReconcileError> {
    reconcile_with(master, streams, &mut NullReporter)
}

pub fn reconcile_with(
    master: &Path,
    streams: &mut [CandidateStream],
    reporter: &mut dyn Reporter,
) -> Result<ReconcileReport, ReconcileError> {
    if streams.is_empty() {
        return Err(ReconcileError::NoCandidates);
    }

    let mut ledger = Ledger::from_path(master)?;
    reporter.ledger_built(master, &ledger);
    for event in ledger.repeated() {
        reporter.master_repeat(event);
    }

    let tally = ledger.tally(streams)?;
    let report = ledger.classify(tally);
    reporter.report(&report);
    Ok(report)
}

/// Reconcile and fail unless every expected event was seen exactly once and
/// nothing unexpected was seen.
///
/// The reporter receives the full report before the verdict is returned, so a
/// failing run is still fully logged.
pub fn check(
    master: &Path,
    streams: &mut [CandidateStream],
    reporter: &mut dyn Reporter,
) -> Result<ReconcileReport, CheckError> {
    let report = reconcile_with(master, streams, reporter)?;
    if report.is_pass() {
        Ok(report)
    } else {
        Err(ReconcileFailure { report }.into())
    }
}

/// Open every source at its start.
pub fn open_sources(
    sources: &[&dyn CandidateSource],
) -> Result<Vec<CandidateStream>, ReconcileError> {
    sources
        .iter()
        .map(|s| {
            s.open().map_err(|source| ReconcileError::OpenCandidate {
                name: s.name(),
                source,
            })
        })
        .collect()
}

/// [`reconcile_with`] over freshly opened sources. Running it twice over the
/// same untouched sources yields the same report.
pub fn reconcile_sources(
    master: &Path,
    sources: &[&dyn CandidateSource],
    reporter: &mut dyn Reporter,
) -> Result<ReconcileReport, ReconcileError> {
    let mut streams = open_sources(sources)?;
    reconcile_with(master, &mut streams, reporter)
}

pub fn check_sources(
    master: &Path,
    sources: &[&dyn CandidateSource],
    reporter: &mut dyn Reporter,
) -> Result<ReconcileReport, CheckError> {
    let mut streams = open_sources(sources)?;
    check(master, &mut streams, reporter)
}
