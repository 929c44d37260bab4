use anyhow::{Context, Result};
use evc_artifacts::{
    bundle_tar_gz, pack_tar, write_run_record, ArchiveMemberSource, ArtifactWriter, RunManifest,
    RunRecordPaths,
};
use evc_reconcile::{
    reconcile_sources, CandidateSource, ReconcileFailure, ReconcileReport, TracingReporter,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the events file inside each target capture.
pub const DEFAULT_EVENTS_MEMBER: &str = "events.log";

#[derive(Clone, Debug)]
pub struct HarnessRunConfig {
    /// Sub-directory of the artifacts root this run writes into.
    pub label: String,
    pub events_member: String,
    /// Bundle the artifacts root into the reports dir on finish.
    pub bundle: bool,
}

impl HarnessRunConfig {
    pub fn test_defaults() -> Self {
        Self {
            label: "TestApp".to_string(),
            events_member: DEFAULT_EVENTS_MEMBER.to_string(),
            bundle: true,
        }
    }
}

/// Scripted integration run without containers.
///
/// Setup records the agent output, each target capture is stored the way the
/// container runtime hands it over (`<target>_events.tar`), and `finish`
/// reconciles every capture against the master, writes the run record and
/// bundles the artifacts.
pub struct HarnessRun {
    cfg: HarnessRunConfig,
    writer: ArtifactWriter,
    reports_dir: PathBuf,
    captures: Vec<ArchiveMemberSource>,
}

pub struct HarnessOutcome {
    pub report: ReconcileReport,
    pub manifest: RunManifest,
    pub record: RunRecordPaths,
    pub bundle: Option<PathBuf>,
}

impl HarnessOutcome {
    /// Hard pass/fail, as consumed by the test layer.
    pub fn check(&self) -> Result<(), ReconcileFailure> {
        if self.report.is_pass() {
            Ok(())
        } else {
            Err(ReconcileFailure {
                report: self.report.clone(),
            })
        }
    }
}

impl HarnessRun {
    pub fn new(artifacts_dir: &Path, reports_dir: &Path, cfg: HarnessRunConfig) -> Self {
        Self {
            cfg,
            writer: ArtifactWriter::new(artifacts_dir),
            reports_dir: reports_dir.to_path_buf(),
            captures: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.cfg.label
    }

    /// Store the agent's console output as `agent.log`.
    pub fn record_agent_output(&self, output: &[u8]) -> Result<PathBuf> {
        self.writer.write("agent.log", output, &self.cfg.label)
    }

    /// Store a service's container log as `<service>.log`.
    pub fn record_service_log(&self, service: &str, log: &[u8]) -> Result<PathBuf> {
        self.writer
            .write(&format!("{service}.log"), log, &self.cfg.label)
    }

    /// Store what `target` received, packed as the runtime's archive stream.
    pub fn capture_target(&mut self, target: &str, events: &[u8]) -> Result<PathBuf> {
        let tar = pack_tar(&[(self.cfg.events_member.as_str(), events)])
            .with_context(|| format!("pack capture for {target}"))?;
        let path = self
            .writer
            .write(&format!("{target}_events.tar"), &tar, &self.cfg.label)?;
        self.captures.push(ArchiveMemberSource::new(
            target,
            &path,
            self.cfg.events_member.as_str(),
        ));
        Ok(path)
    }

    pub fn captured_targets(&self) -> Vec<String> {
        self.captures.iter().map(|c| c.name()).collect()
    }

    /// Reconcile all captures against `master`, then write the run record.
    ///
    /// A failed reconciliation is still a successful run of the harness: the
    /// verdict is in the outcome. Only plumbing errors are returned as `Err`.
    pub fn finish(self, master: &Path, config_hash: Option<&str>) -> Result<HarnessOutcome> {
        let sources: Vec<&dyn CandidateSource> = self
            .captures
            .iter()
            .map(|c| c as &dyn CandidateSource)
            .collect();
        info!(
            targets = sources.len(),
            master = %master.display(),
            "determine if aggregate events match the master"
        );
        let report = reconcile_sources(master, &sources, &mut TracingReporter)
            .context("reconcile target captures")?;

        let manifest = RunManifest::new(
            &self.cfg.label,
            config_hash,
            master,
            &self.captured_targets(),
            &report,
        );
        let record = write_run_record(&self.writer.dir(&self.cfg.label)?, &manifest, &report)?;

        let bundle = if self.cfg.bundle {
            Some(bundle_tar_gz(self.writer.root(), &self.reports_dir)?)
        } else {
            None
        };

        Ok(HarnessOutcome {
            report,
            manifest,
            record,
            bundle,
        })
    }
}
