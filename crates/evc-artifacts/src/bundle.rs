use anyhow::{bail, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Compress the whole artifacts directory into
/// `<reports_dir>/<artifacts dir name>.tar.gz`. Inside the archive every
/// entry sits under the artifacts directory's own name.
pub fn bundle_tar_gz(artifacts_dir: &Path, reports_dir: &Path) -> Result<PathBuf> {
    let Some(dir_name) = artifacts_dir.file_name() else {
        bail!("artifacts dir has no name: {}", artifacts_dir.display());
    };
    if !artifacts_dir.is_dir() {
        bail!("artifacts dir does not exist: {}", artifacts_dir.display());
    }
    // The bundle would end up archiving itself.
    if reports_dir.starts_with(artifacts_dir) {
        bail!(
            "reports dir {} is inside artifacts dir {}",
            reports_dir.display(),
            artifacts_dir.display()
        );
    }

    fs::create_dir_all(reports_dir)
        .with_context(|| format!("create reports dir failed: {}", reports_dir.display()))?;

    let mut out_name = dir_name.to_os_string();
    out_name.push(".tar.gz");
    let out = reports_dir.join(out_name);

    let file = File::create(&out).with_context(|| format!("create bundle failed: {}", out.display()))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(dir_name, artifacts_dir)
        .with_context(|| format!("archive artifacts failed: {}", artifacts_dir.display()))?;
    builder
        .into_inner()
        .and_then(|gz| gz.finish())
        .with_context(|| format!("finish bundle failed: {}", out.display()))?;

    info!(bundle = %out.display(), "artifacts bundled");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    #[test]
    fn bundle_holds_artifacts_under_dir_name() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = tmp.path().join("v1");
        fs::create_dir_all(artifacts.join("TestApp")).unwrap();
        fs::write(artifacts.join("TestApp/agent.log"), b"hello\n").unwrap();

        let out = bundle_tar_gz(&artifacts, &tmp.path().join("reports")).unwrap();
        assert_eq!(out, tmp.path().join("reports/v1.tar.gz"));

        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&out).unwrap()));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().any(|n| n == "v1/TestApp/agent.log"));
    }

    #[test]
    fn reports_dir_inside_artifacts_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = tmp.path().join("v1");
        fs::create_dir_all(&artifacts).unwrap();

        let err = bundle_tar_gz(&artifacts, &artifacts.join("reports")).unwrap_err();
        assert!(err.to_string().contains("inside artifacts dir"));
        assert!(!artifacts.join("reports").exists());

        let err = bundle_tar_gz(&artifacts, &artifacts).unwrap_err();
        assert!(err.to_string().contains("inside artifacts dir"));
    }

    #[test]
    fn missing_artifacts_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = bundle_tar_gz(&tmp.path().join("nope"), tmp.path()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
