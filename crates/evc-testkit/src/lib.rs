//! Fixtures and the scripted harness flow used by scenario tests.
//!
//! Nothing here talks to a container runtime. Targets are simulated by
//! handing [`HarnessRun`] the bytes each one captured.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

mod harness;
mod reporter;

pub use harness::{HarnessOutcome, HarnessRun, HarnessRunConfig, DEFAULT_EVENTS_MEMBER};
pub use reporter::{RecordingReporter, ReporterCall};

/// `n` distinct agent events shaped like the JSON lines the agent emits.
pub fn events(kind: &str, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!(r#"{{"seq":{i},"kind":"{kind}"}}"#))
        .collect()
}

/// Newline-terminated log bytes for `events`.
pub fn lines<S: AsRef<str>>(events: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for e in events {
        out.extend_from_slice(e.as_ref().as_bytes());
        out.push(b'\n');
    }
    out
}

/// Write the agent's monitor file into `dir` and return its path.
pub fn write_master<S: AsRef<str>>(dir: &Path, events: &[S]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create dir failed: {}", dir.display()))?;
    let path = dir.join("monitor.log");
    fs::write(&path, lines(events))
        .with_context(|| format!("write master failed: {}", path.display()))?;
    Ok(path)
}

/// Deal `events` to `n` observers in turn, the way the splitter fans out.
pub fn split_round_robin<T: Clone>(events: &[T], n: usize) -> Vec<Vec<T>> {
    let mut out = vec![Vec::new(); n.max(1)];
    let len = out.len();
    for (i, e) in events.iter().enumerate() {
        out[i % len].push(e.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_distinct() {
        let evs = events("tick", 3);
        assert_eq!(evs[0], r#"{"seq":0,"kind":"tick"}"#);
        assert_ne!(evs[1], evs[2]);
    }

    #[test]
    fn split_round_robin_deals_in_turn() {
        let parts = split_round_robin(&[1, 2, 3, 4, 5], 2);
        assert_eq!(parts, vec![vec![1, 3, 5], vec![2, 4]]);
    }

    #[test]
    fn split_into_zero_observers_keeps_everything() {
        let parts = split_round_robin(&["a"], 0);
        assert_eq!(parts, vec![vec!["a"]]);
    }

    #[test]
    fn lines_terminates_every_event() {
        assert_eq!(lines(&["a", "b"]), b"a\nb\n");
    }
}
