//! evc-reconcile
//!
//! Event reconciliation for the splitter integration harness.
//!
//! Every event the agent emits is recorded in a master file. Each target
//! captures what it received. The reconciler answers one question: did every
//! expected event arrive exactly once across all targets?
//!
//! - Master ledger is a set of unique expected events, counters start at 0
//! - Candidate streams are drained round-robin, one line per stream per round
//! - Expected events are classified valid (1), missing (0) or duplicate (>1)
//! - Unexpected candidate lines are counted invalid
//!
//! Tallying is order-insensitive. Batch only: nothing is reported until every
//! stream is exhausted. No network, no clock.

mod engine;
mod error;
mod ledger;
mod report;
mod reporter;
mod source;
mod types;

pub use engine::{check, check_sources, open_sources, reconcile, reconcile_sources, reconcile_with};
pub use error::{CheckError, ReconcileError, ReconcileFailure};
pub use ledger::{Ledger, TallyStats, RECORD_SEPARATOR};
pub use report::ReconcileReport;
pub use reporter::{NullReporter, Reporter, TracingReporter};
pub use source::{BytesSource, CandidateSource, CandidateStream, FileSource};
pub use types::*;
