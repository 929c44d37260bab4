use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::ReconcileReport;

/// Fatal, unclassified problems. A reconciliation that hits one of these has
/// no verdict at all.
#[derive(Debug)]
pub enum ReconcileError {
    OpenMaster { path: PathBuf, source: io::Error },
    OpenCandidate { name: String, source: io::Error },
    Read { stream: String, source: io::Error },
    NoCandidates,
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::OpenMaster { path, .. } => {
                write!(f, "cannot open master file {}", path.display())
            }
            ReconcileError::OpenCandidate { name, .. } => {
                write!(f, "cannot open candidate stream {name}")
            }
            ReconcileError::Read { stream, .. } => write!(f, "read failed on {stream}"),
            ReconcileError::NoCandidates => {
                write!(f, "at least one candidate stream is required")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::OpenMaster { source, .. }
            | ReconcileError::OpenCandidate { source, .. }
            | ReconcileError::Read { source, .. } => Some(source),
            ReconcileError::NoCandidates => None,
        }
    }
}

/// The check failed: at least one event was missing, duplicated or invalid.
///
/// Carries the whole report so the caller can surface every count at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileFailure {
    pub report: ReconcileReport,
}

impl fmt::Display for ReconcileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.report.counts;
        writeln!(
            f,
            "event reconciliation failed: duplicate={} missing={} invalid={}",
            c.duplicate, c.missing, c.invalid
        )?;
        write!(f, "{}", self.report)
    }
}

impl std::error::Error for ReconcileFailure {}

/// Error side of [`crate::check`].
#[derive(Debug)]
pub enum CheckError {
    Reconcile(ReconcileError),
    Failed(ReconcileFailure),
}

impl CheckError {
    /// The report, when the check got far enough to produce one.
    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            CheckError::Failed(failure) => Some(&failure.report),
            CheckError::Reconcile(_) => None,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Reconcile(e) => write!(f, "{e}"),
            CheckError::Failed(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Reconcile(e) => Some(e),
            CheckError::Failed(e) => Some(e),
        }
    }
}

impl From<ReconcileError> for CheckError {
    fn from(e: ReconcileError) -> Self {
        CheckError::Reconcile(e)
    }
}

impl From<ReconcileFailure> for CheckError {
    fn from(e: ReconcileFailure) -> Self {
        CheckError::Failed(e)
    }
}
