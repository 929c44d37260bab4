use evc_reconcile::{Event, Ledger, ReconcileReport, Reporter};
use std::path::{Path, PathBuf};

/// One observed [`Reporter`] callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReporterCall {
    LedgerBuilt { master: PathBuf, expected: usize },
    MasterRepeat(Event),
    Report(ReconcileReport),
}

/// Keeps every reporter call, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    pub calls: Vec<ReporterCall>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_report(&self) -> Option<&ReconcileReport> {
        self.calls.iter().rev().find_map(|c| match c {
            ReporterCall::Report(r) => Some(r),
            _ => None,
        })
    }
}

impl Reporter for RecordingReporter {
    fn ledger_built(&mut self, master: &Path, ledger: &Ledger) {
        self.calls.push(ReporterCall::LedgerBuilt {
            master: master.to_path_buf(),
            expected: ledger.len(),
        });
    }

    fn master_repeat(&mut self, event: &Event) {
        self.calls.push(ReporterCall::MasterRepeat(event.clone()));
    }

    fn report(&mut self, report: &ReconcileReport) {
        self.calls.push(ReporterCall::Report(report.clone()));
    }
}
