use serde::{Serialize, Serializer};
use std::fmt;

/// One line of recorded activity with its `\n` terminator removed.
///
/// Equality is exact byte equality. A `\r` before the terminator is part of
/// the event, so CRLF and LF producers never match each other.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event(Vec<u8>);

impl Event {
    /// Build an event from a raw line as returned by `read_until(b'\n')`.
    ///
    /// Returns `None` for blank lines (zero bytes once the terminator is gone).
    pub fn from_line(mut line: Vec<u8>) -> Option<Self> {
        if line.last() == Some(&crate::RECORD_SEPARATOR) {
            line.pop();
        }
        if line.is_empty() {
            None
        } else {
            Some(Self(line))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<&str> for Event {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Event {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Lossy and escaped, so control bytes stay visible in logs.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0).escape_debug())
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The four buckets of a reconciliation.
///
/// `valid + missing + duplicate` always equals the ledger size. `invalid`
/// counts candidate lines that failed the ledger lookup, one per occurrence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub valid: u64,
    pub duplicate: u64,
    pub missing: u64,
    pub invalid: u64,
}

impl EventCounts {
    pub fn is_clean(&self) -> bool {
        self.duplicate == 0 && self.missing == 0 && self.invalid == 0
    }

    /// Number of expected events covered by the three ledger buckets.
    pub fn expected(&self) -> u64 {
        self.valid + self.duplicate + self.missing
    }
}

/// Evidence for a defect. Stable ordering: missing, duplicate, invalid.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDiff {
    /// Expected, never observed.
    Missing { event: Event },

    /// Expected once, observed `seen` times across all streams.
    Duplicate { event: Event, seen: u64 },

    /// Observed in `stream` but never expected.
    Invalid {
        event: Event,
        stream: String,
        occurrences: u64,
    },
}

impl fmt::Display for EventDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDiff::Missing { event } => write!(f, "missing   [{event}]"),
            EventDiff::Duplicate { event, seen } => {
                write!(f, "duplicate [{event}] seen {seen} times")
            }
            EventDiff::Invalid {
                event,
                stream,
                occurrences,
            } => write!(f, "invalid   [{event}] in {stream} ({occurrences}x)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

/// Per-stream consumption, for diagnosing which observer misbehaved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub name: String,
    /// Non-blank lines read from this stream.
    pub events: u64,
    /// Lines from this stream that were not in the ledger.
    pub invalid: u64,
}
