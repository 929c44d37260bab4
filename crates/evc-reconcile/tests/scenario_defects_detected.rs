use std::io::Write;

use evc_reconcile::*;

fn master(lines: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(lines).unwrap();
    f
}

fn failed(m: &tempfile::NamedTempFile, candidates: &[&[u8]]) -> ReconcileReport {
    let mut streams: Vec<CandidateStream> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| CandidateStream::from_bytes(format!("target_{}", i + 1), c.to_vec()))
        .collect();
    match check(m.path(), &mut streams, &mut NullReporter) {
        Err(CheckError::Failed(f)) => f.report,
        other => panic!("expected a failed check, got {other:?}"),
    }
}

#[test]
fn scenario_removed_line_is_missing() {
    let m = master(b"e1\ne2\ne3\n");
    let r = failed(&m, &[b"e1\ne3\n"]);

    assert_eq!(r.verdict, Verdict::Fail);
    assert_eq!(
        r.counts,
        EventCounts {
            valid: 2,
            duplicate: 0,
            missing: 1,
            invalid: 0
        }
    );
    assert_eq!(r.diffs, vec![EventDiff::Missing { event: "e2".into() }]);
}

#[test]
fn scenario_repeated_line_is_duplicate() {
    let m = master(b"e1\ne2\n");
    let r = failed(&m, &[b"e1\ne1\ne2\n"]);

    assert_eq!(
        r.counts,
        EventCounts {
            valid: 1,
            duplicate: 1,
            missing: 0,
            invalid: 0
        }
    );
    assert_eq!(
        r.diffs,
        vec![EventDiff::Duplicate {
            event: "e1".into(),
            seen: 2
        }]
    );
}

#[test]
fn scenario_unexpected_line_is_invalid() {
    let m = master(b"e1\n");
    let r = failed(&m, &[b"e2\n"]);

    assert_eq!(
        r.counts,
        EventCounts {
            valid: 0,
            duplicate: 0,
            missing: 1,
            invalid: 1
        }
    );
    assert_eq!(
        r.diffs,
        vec![
            EventDiff::Missing { event: "e1".into() },
            EventDiff::Invalid {
                event: "e2".into(),
                stream: "target_1".to_string(),
                occurrences: 1
            },
        ]
    );
}

#[test]
fn scenario_same_event_on_two_targets_is_duplicate() {
    let m = master(b"e1\ne2\n");
    let r = failed(&m, &[b"e1\ne2\n", b"e2\n"]);

    assert_eq!(r.counts.valid, 1);
    assert_eq!(r.counts.duplicate, 1);
}

#[test]
fn scenario_crlf_capture_does_not_match_lf_master() {
    let m = master(b"e1\n");
    let r = failed(&m, &[b"e1\r\n"]);

    assert_eq!(r.counts.missing, 1);
    assert_eq!(r.counts.invalid, 1);
}

#[test]
fn scenario_all_defects_are_aggregated_into_one_failure() {
    let m = master(b"a\nb\nc\n");
    let r = failed(&m, &[b"a\na\nx\n", b"y\ny\n"]);

    assert_eq!(
        r.counts,
        EventCounts {
            valid: 0,
            duplicate: 1,
            missing: 2,
            invalid: 3
        }
    );
    assert_eq!(r.streams[0].invalid, 1);
    assert_eq!(r.streams[1].invalid, 2);

    let failure = ReconcileFailure { report: r };
    let msg = failure.to_string();
    assert!(msg.contains("duplicate=1 missing=2 invalid=3"));
    assert!(msg.contains("| invalid   |     3 |"));
}
