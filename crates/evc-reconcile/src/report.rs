use std::fmt;

use serde::Serialize;

use crate::{EventCounts, EventDiff, StreamStats, Verdict};

/// How many diffs `Display` prints before summarising the rest.
const DIFF_PREVIEW: usize = 20;

/// Full reconciliation outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub verdict: Verdict,
    pub counts: EventCounts,
    /// Sorted: missing, duplicate, invalid; then by event bytes.
    pub diffs: Vec<EventDiff>,
    pub rounds: u64,
    pub streams: Vec<StreamStats>,
    /// Master lines dropped because they repeated an earlier expected event.
    pub master_repeats: u64,
}

impl ReconcileReport {
    pub fn is_pass(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Human-readable table of the four counters.
    ///
    /// ```text
    /// +-----------+-------+
    /// | result    | count |
    /// +-----------+-------+
    /// | valid     |     3 |
    /// | duplicate |     0 |
    /// | missing   |     0 |
    /// | invalid   |     0 |
    /// +-----------+-------+
    /// ```
    pub fn summary_table(&self) -> String {
        let rows = [
            ("valid", self.counts.valid),
            ("duplicate", self.counts.duplicate),
            ("missing", self.counts.missing),
            ("invalid", self.counts.invalid),
        ];
        let label_w = "duplicate".len();
        let count_w = rows
            .iter()
            .map(|(_, n)| n.to_string().len())
            .max()
            .unwrap_or(0)
            .max("count".len());

        let rule = format!("+{}+{}+\n", "-".repeat(label_w + 2), "-".repeat(count_w + 2));
        let mut out = String::new();
        out.push_str(&rule);
        out.push_str(&format!("| {:<label_w$} | {:>count_w$} |\n", "result", "count"));
        out.push_str(&rule);
        for (label, n) in rows {
            out.push_str(&format!("| {label:<label_w$} | {n:>count_w$} |\n"));
        }
        out.push_str(&rule);
        out
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "reconcile {} ({} rounds over {} stream(s))",
            self.verdict.as_str(),
            self.rounds,
            self.streams.len()
        )?;
        write!(f, "{}", self.summary_table())?;
        for diff in self.diffs.iter().take(DIFF_PREVIEW) {
            writeln!(f, "  {diff}")?;
        }
        if self.diffs.len() > DIFF_PREVIEW {
            writeln!(f, "  ... {} more", self.diffs.len() - DIFF_PREVIEW)?;
        }
        Ok(())
    }
}
