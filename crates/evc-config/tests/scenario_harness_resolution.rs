use std::fs;
use std::path::Path;

use evc_config::{load_harness, HarnessConfig, ResolvedCandidate, DEFAULT_RUN_LABEL};

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let p = dir.join(name);
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&p, contents).unwrap();
    p.to_string_lossy().into_owned()
}

#[test]
fn relative_paths_resolve_against_base() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(
        dir.path(),
        "harness.yaml",
        r#"
master: "agent/monitor.log"
artifacts_dir: "reports/v1"
candidates:
  - name: "target_1"
    path: "captures/target_1.log"
  - name: "target_2"
    archive: "/abs/target_2_events.tar"
    member: "events.log"
"#,
    );

    let h = load_harness(&[cfg.as_str()], dir.path()).unwrap().harness;
    assert_eq!(h.master, dir.path().join("agent/monitor.log"));
    assert_eq!(h.artifacts_dir, dir.path().join("reports/v1"));
    assert_eq!(h.reports_dir, None);
    assert_eq!(h.run_label, DEFAULT_RUN_LABEL);
    assert_eq!(
        h.candidates,
        vec![
            ResolvedCandidate::File {
                name: "target_1".to_string(),
                path: dir.path().join("captures/target_1.log"),
            },
            ResolvedCandidate::Archive {
                name: "target_2".to_string(),
                archive: "/abs/target_2_events.tar".into(),
                member: "events.log".to_string(),
            },
        ]
    );
}

#[test]
fn master_and_member_come_from_service_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "app/agent/inputs.json", r#"{"monitor": "monitor.log"}"#);
    write(
        dir.path(),
        "app/target/outputs.json",
        r#"{"file": "/app/events.log"}"#,
    );
    let cfg = write(
        dir.path(),
        "harness.yaml",
        r#"
agent_inputs: "app/agent/inputs.json"
target_outputs: "app/target/outputs.json"
artifacts_dir: "reports/v1"
reports_dir: "reports"
run_label: "TestApp"
candidates:
  - name: "target_1"
    archive: "reports/v1/TestApp/target_1_events.tar"
"#,
    );

    let h = load_harness(&[cfg.as_str()], dir.path()).unwrap().harness;
    assert_eq!(h.master, dir.path().join("app/agent/monitor.log"));
    assert_eq!(h.reports_dir, Some(dir.path().join("reports")));
    assert_eq!(h.run_label, "TestApp");
    match &h.candidates[0] {
        ResolvedCandidate::Archive { member, .. } => assert_eq!(member, "events.log"),
        other => panic!("expected archive candidate, got {other:?}"),
    }
}

#[test]
fn archive_without_member_or_outputs_is_rejected() {
    let v = serde_json::json!({
        "master": "m.log",
        "artifacts_dir": "a",
        "candidates": [{ "name": "target_1", "archive": "t1.tar" }]
    });
    let cfg = HarnessConfig::from_value(&v).unwrap();
    let err = cfg.resolve(Path::new("/base")).unwrap_err();
    assert!(err.to_string().contains("needs 'member'"));
}

#[test]
fn missing_master_is_rejected() {
    let v = serde_json::json!({
        "artifacts_dir": "a",
        "candidates": [{ "name": "target_1", "path": "t1.log" }]
    });
    let cfg = HarnessConfig::from_value(&v).unwrap();
    assert!(cfg.resolve(Path::new("/base")).is_err());
}

#[test]
fn empty_candidate_list_is_rejected() {
    let v = serde_json::json!({
        "master": "m.log",
        "artifacts_dir": "a",
        "candidates": []
    });
    let cfg = HarnessConfig::from_value(&v).unwrap();
    let err = cfg.resolve(Path::new("/base")).unwrap_err();
    assert!(err.to_string().contains("at least one"));
}

#[test]
fn fail_policy_in_config_rejects_typos() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(
        dir.path(),
        "harness.yaml",
        r#"
master: "m.log"
artifacts_dir: "a"
unused_keys: fail
candidats: []
candidates:
  - name: "target_1"
    path: "t1.log"
"#,
    );
    let err = load_harness(&[cfg.as_str()], dir.path()).unwrap_err();
    assert!(err.to_string().contains("CONFIG_UNUSED_KEYS"));
}
