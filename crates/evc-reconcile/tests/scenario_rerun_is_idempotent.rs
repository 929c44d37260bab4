use std::io::Write;

use evc_reconcile::*;

#[test]
fn scenario_rerun_over_untouched_sources_yields_identical_report() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("monitor.log");
    std::fs::write(&master, b"e1\ne2\ne3\n").unwrap();

    let capture = dir.path().join("events.log");
    let mut f = std::fs::File::create(&capture).unwrap();
    f.write_all(b"e1\ne1\ne4\n").unwrap();
    drop(f);

    let file = FileSource::new(&capture);
    let mem = BytesSource::new("target_2", b"e3\n".to_vec());
    let sources: [&dyn CandidateSource; 2] = [&file, &mem];

    let first = reconcile_sources(&master, &sources, &mut NullReporter).unwrap();
    let second = reconcile_sources(&master, &sources, &mut NullReporter).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.counts,
        EventCounts {
            valid: 1,
            duplicate: 1,
            missing: 1,
            invalid: 1
        }
    );
}

#[test]
fn scenario_unopenable_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let master = dir.path().join("monitor.log");
    std::fs::write(&master, b"e1\n").unwrap();

    let gone = FileSource::new(dir.path().join("missing.log"));
    let sources: [&dyn CandidateSource; 1] = [&gone];
    let err = check_sources(&master, &sources, &mut NullReporter).unwrap_err();
    assert!(matches!(
        err,
        CheckError::Reconcile(ReconcileError::OpenCandidate { .. })
    ));
    assert!(err.report().is_none());
}
