use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// A lost event and a stray one fail the check with a non-zero exit and the
/// offending events listed under the table.
#[allow(deprecated)]
#[test]
fn cli_check_exits_nonzero_on_defects() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let master = tmp.path().join("monitor.log");
    let t1 = tmp.path().join("target_1.log");
    fs::write(&master, "e1\ne2\ne3\n")?;
    fs::write(&t1, "e1\ne2\nstray\n")?;

    Command::cargo_bin("evc")?
        .arg("check")
        .arg("--master")
        .arg(&master)
        .arg("--candidate")
        .arg(&t1)
        .assert()
        .failure()
        .stdout(predicate::str::contains("reconcile FAIL"))
        .stdout(predicate::str::contains("missing   [e3]"))
        .stdout(predicate::str::contains("invalid   [stray]"))
        .stderr(predicate::str::contains(
            "event reconciliation failed: duplicate=0 missing=1 invalid=1",
        ));

    Ok(())
}

#[allow(deprecated)]
#[test]
fn cli_check_without_candidates_is_an_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let master = tmp.path().join("monitor.log");
    fs::write(&master, "e1\n")?;

    Command::cargo_bin("evc")?
        .arg("check")
        .arg("--master")
        .arg(&master)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());

    Ok(())
}

#[allow(deprecated)]
#[test]
fn cli_check_unreadable_master_is_an_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let t1 = tmp.path().join("target_1.log");
    fs::write(&t1, "e1\n")?;

    Command::cargo_bin("evc")?
        .arg("check")
        .arg("--master")
        .arg(tmp.path().join("nope.log"))
        .arg("--candidate")
        .arg(&t1)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.log"));

    Ok(())
}
