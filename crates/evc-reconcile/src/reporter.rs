//! Output seam for reconciliation.
//!
//! The reconciler never decides where its findings go. Callers inject a
//! [`Reporter`]; the pass/fail decision is made independently of it.

use std::path::Path;

use tracing::{info, warn};

use crate::{Event, Ledger, ReconcileReport};

pub trait Reporter {
    /// Master file has been read into the ledger.
    fn ledger_built(&mut self, _master: &Path, _ledger: &Ledger) {}

    /// The master file listed `event` more than once.
    fn master_repeat(&mut self, _event: &Event) {}

    /// All streams drained and classified.
    fn report(&mut self, _report: &ReconcileReport) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Logs through `tracing`; the summary table goes out at INFO on pass and
/// WARN on failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn ledger_built(&mut self, master: &Path, ledger: &Ledger) {
        info!(
            master = %master.display(),
            expected = ledger.len(),
            "master ledger built"
        );
    }

    fn master_repeat(&mut self, event: &Event) {
        warn!(event = %event, "master file repeats an event; counted once");
    }

    fn report(&mut self, report: &ReconcileReport) {
        let c = &report.counts;
        if report.is_pass() {
            info!(
                valid = c.valid,
                "events reconciled\n{}",
                report.summary_table()
            );
        } else {
            warn!(
                valid = c.valid,
                duplicate = c.duplicate,
                missing = c.missing,
                invalid = c.invalid,
                "event reconciliation failed\n{}",
                report.summary_table()
            );
        }
    }
}
