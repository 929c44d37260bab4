use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::source::Line;
use crate::{
    CandidateStream, Event, EventCounts, EventDiff, ReconcileError, ReconcileReport, StreamStats,
    Verdict,
};

/// Events are newline-delimited; nothing else is interpreted.
pub const RECORD_SEPARATOR: u8 = b'\n';

/// Unique expected events and how often each has been observed so far.
///
/// Built once per reconciliation and dropped at the end of it. A master line
/// that repeats an earlier one does not reset its counter; it is recorded in
/// `repeated` so the caller can warn about it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    counters: BTreeMap<Event, u64>,
    repeated: BTreeSet<Event>,
    master_repeats: u64,
}

/// Consumption figures from draining the candidate streams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TallyStats {
    /// Rounds in which at least one stream still produced a line.
    pub rounds: u64,
    pub streams: Vec<StreamStats>,
    invalid: BTreeMap<(Event, String), u64>,
}

impl TallyStats {
    pub fn invalid(&self) -> u64 {
        self.invalid.values().sum()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: &Path) -> Result<Self, ReconcileError> {
        let file = File::open(path).map_err(|source| ReconcileError::OpenMaster {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|source| ReconcileError::Read {
            stream: path.display().to_string(),
            source,
        })
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut ledger = Self::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(RECORD_SEPARATOR, &mut buf)? == 0 {
                break;
            }
            if let Some(ev) = Event::from_line(std::mem::take(&mut buf)) {
                ledger.expect(ev);
            }
        }
        Ok(ledger)
    }

    /// Register an expected event. Returns `false` if it was already expected.
    pub fn expect(&mut self, event: Event) -> bool {
        if self.counters.contains_key(&event) {
            self.master_repeats += 1;
            self.repeated.insert(event);
            return false;
        }
        self.counters.insert(event, 0);
        true
    }

    /// Number of unique expected events.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.counters.contains_key(event)
    }

    /// Observations recorded so far for `event`, `None` if it is not expected.
    pub fn seen(&self, event: &Event) -> Option<u64> {
        self.counters.get(event).copied()
    }

    /// Master lines that repeated an already expected event.
    pub fn master_repeats(&self) -> u64 {
        self.master_repeats
    }

    pub fn repeated(&self) -> impl Iterator<Item = &Event> {
        self.repeated.iter()
    }

    /// Count one observation. Returns `false` when the event is not expected.
    pub fn observe(&mut self, event: &Event) -> bool {
        match self.counters.get_mut(event) {
            Some(seen) => {
                *seen += 1;
                true
            }
            None => false,
        }
    }

    /// Drain every stream in lock-step rounds, one line per open stream per
    /// round, until a round in which every stream reports end of stream.
    ///
    /// Streams that finish early simply stop contributing.
    pub fn tally(&mut self, streams: &mut [CandidateStream]) -> Result<TallyStats, ReconcileError> {
        let mut stats = TallyStats {
            streams: streams
                .iter()
                .map(|s| StreamStats {
                    name: s.name().to_string(),
                    ..StreamStats::default()
                })
                .collect(),
            ..TallyStats::default()
        };
        let mut open = vec![true; streams.len()];
        let mut buf = Vec::new();

        loop {
            let mut progressed = false;
            for (idx, stream) in streams.iter_mut().enumerate() {
                if !open[idx] {
                    continue;
                }
                let line = stream
                    .next_line(&mut buf)
                    .map_err(|source| ReconcileError::Read {
                        stream: stream.name().to_string(),
                        source,
                    })?;
                match line {
                    Line::Eof => open[idx] = false,
                    Line::Blank => progressed = true,
                    Line::Event(ev) => {
                        progressed = true;
                        stats.streams[idx].events += 1;
                        if !self.observe(&ev) {
                            debug!(stream = stream.name(), event = %ev, "unexpected event");
                            stats.streams[idx].invalid += 1;
                            *stats
                                .invalid
                                .entry((ev, stream.name().to_string()))
                                .or_insert(0) += 1;
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
            stats.rounds += 1;
        }

        info!(
            rounds = stats.rounds,
            streams = streams.len(),
            invalid = stats.invalid(),
            "candidate streams drained"
        );
        Ok(stats)
    }

    /// Final classification by counter: 0 missing, 1 valid, more duplicate.
    pub fn classify(self, tally: TallyStats) -> ReconcileReport {
        let mut counts = EventCounts::default();
        let mut diffs = Vec::new();

        for (event, seen) in self.counters {
            match seen {
                0 => {
                    counts.missing += 1;
                    diffs.push(EventDiff::Missing { event });
                }
                1 => counts.valid += 1,
                seen => {
                    counts.duplicate += 1;
                    diffs.push(EventDiff::Duplicate { event, seen });
                }
            }
        }

        for ((event, stream), occurrences) in tally.invalid {
            counts.invalid += occurrences;
            diffs.push(EventDiff::Invalid {
                event,
                stream,
                occurrences,
            });
        }

        diffs.sort();

        let verdict = if counts.is_clean() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        ReconcileReport {
            verdict,
            counts,
            diffs,
            rounds: tally.rounds,
            streams: tally.streams,
            master_repeats: self.master_repeats,
        }
    }
}
