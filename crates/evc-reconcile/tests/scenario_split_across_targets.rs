use std::io::Write;

use evc_reconcile::*;

#[test]
fn scenario_events_split_across_two_targets_reconcile_exactly_once() {
    let mut m = tempfile::NamedTempFile::new().unwrap();
    m.write_all(b"e1\ne2\ne3\ne4\ne5\n").unwrap();

    let mut streams = vec![
        CandidateStream::from_bytes("target_1", b"e1\ne3\ne5\n".to_vec()),
        CandidateStream::from_bytes("target_2", b"e2\ne4\n".to_vec()),
    ];

    let r = check(m.path(), &mut streams, &mut NullReporter).unwrap();
    assert_eq!(
        r.counts,
        EventCounts {
            valid: 5,
            duplicate: 0,
            missing: 0,
            invalid: 0
        }
    );
    // The longer stream decides the number of rounds.
    assert_eq!(r.rounds, 3);
    assert_eq!(r.streams[0].events, 3);
    assert_eq!(r.streams[1].events, 2);
}

#[test]
fn scenario_empty_target_does_not_stop_the_others() {
    let mut m = tempfile::NamedTempFile::new().unwrap();
    m.write_all(b"e1\ne2\n").unwrap();

    let mut streams = vec![
        CandidateStream::from_bytes("target_1", Vec::new()),
        CandidateStream::from_bytes("target_2", b"e1\ne2\n".to_vec()),
    ];

    let r = check(m.path(), &mut streams, &mut NullReporter).unwrap();
    assert_eq!(r.counts.valid, 2);
    assert_eq!(r.streams[0].events, 0);
}
