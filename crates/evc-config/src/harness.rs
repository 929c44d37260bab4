use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::{
    events_file_from_target_outputs, load_layered_yaml, monitor_path_from_agent_inputs,
    report_unused_keys, LoadedConfig, UnusedKeyPolicy, UnusedKeyReport,
};

pub const DEFAULT_RUN_LABEL: &str = "integration";

/// Typed view of the merged harness config, paths as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Master event file. Takes precedence over `agent_inputs`.
    #[serde(default)]
    pub master: Option<PathBuf>,
    /// Agent `inputs.json`; its `monitor` key names the master file.
    #[serde(default)]
    pub agent_inputs: Option<PathBuf>,
    /// Target `outputs.json`; its `file` key is the default archive member.
    #[serde(default)]
    pub target_outputs: Option<PathBuf>,
    pub candidates: Vec<CandidateSpec>,
    pub artifacts_dir: PathBuf,
    /// When set, the artifacts directory is bundled as `<name>.tar.gz` here.
    #[serde(default)]
    pub reports_dir: Option<PathBuf>,
    #[serde(default = "default_run_label")]
    pub run_label: String,
    #[serde(default)]
    pub unused_keys: UnusedKeyPolicy,
}

fn default_run_label() -> String {
    DEFAULT_RUN_LABEL.to_string()
}

/// One target capture: a plain file, or a member of a tar archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateSpec {
    Archive {
        name: String,
        archive: PathBuf,
        #[serde(default)]
        member: Option<String>,
    },
    File {
        name: String,
        path: PathBuf,
    },
}

impl CandidateSpec {
    pub fn name(&self) -> &str {
        match self {
            CandidateSpec::Archive { name, .. } | CandidateSpec::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCandidate {
    File {
        name: String,
        path: PathBuf,
    },
    Archive {
        name: String,
        archive: PathBuf,
        member: String,
    },
}

impl ResolvedCandidate {
    pub fn name(&self) -> &str {
        match self {
            ResolvedCandidate::Archive { name, .. } | ResolvedCandidate::File { name, .. } => name,
        }
    }
}

/// Harness config with every path absolute (or relative to the caller's cwd
/// when the base directory was).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHarness {
    pub master: PathBuf,
    pub candidates: Vec<ResolvedCandidate>,
    pub artifacts_dir: PathBuf,
    pub reports_dir: Option<PathBuf>,
    pub run_label: String,
}

impl HarnessConfig {
    pub fn from_value(v: &Value) -> Result<Self> {
        serde_json::from_value(v.clone()).context("invalid harness config")
    }

    /// Resolve relative paths against `base` and fill in derived values:
    /// the master from `agent_inputs`, archive members from `target_outputs`.
    pub fn resolve(&self, base: &Path) -> Result<ResolvedHarness> {
        let at = |p: &Path| -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };

        let master = match (&self.master, &self.agent_inputs) {
            (Some(m), _) => at(m),
            (None, Some(inputs)) => monitor_path_from_agent_inputs(&at(inputs))?,
            (None, None) => bail!("harness config needs 'master' or 'agent_inputs'"),
        };

        if self.candidates.is_empty() {
            bail!("harness config needs at least one entry under 'candidates'");
        }

        let default_member = match &self.target_outputs {
            Some(outputs) => Some(member_name(&events_file_from_target_outputs(&at(outputs))?)?),
            None => None,
        };

        let mut candidates = Vec::with_capacity(self.candidates.len());
        for spec in &self.candidates {
            let resolved = match spec {
                CandidateSpec::File { name, path } => ResolvedCandidate::File {
                    name: name.clone(),
                    path: at(path),
                },
                CandidateSpec::Archive {
                    name,
                    archive,
                    member,
                } => {
                    let member = member
                        .clone()
                        .or_else(|| default_member.clone())
                        .ok_or_else(|| {
                            anyhow!(
                                "candidate '{name}' needs 'member' (or set 'target_outputs')"
                            )
                        })?;
                    ResolvedCandidate::Archive {
                        name: name.clone(),
                        archive: at(archive),
                        member,
                    }
                }
            };
            candidates.push(resolved);
        }

        Ok(ResolvedHarness {
            master,
            candidates,
            artifacts_dir: at(&self.artifacts_dir),
            reports_dir: self.reports_dir.as_deref().map(at),
            run_label: self.run_label.clone(),
        })
    }
}

/// Archives from a container runtime hold the file under its base name.
fn member_name(events_file: &Path) -> Result<String> {
    events_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("target events file has no file name: {}", events_file.display()))
}

#[derive(Debug, Clone)]
pub struct LoadedHarness {
    pub loaded: LoadedConfig,
    pub unused: UnusedKeyReport,
    pub harness: ResolvedHarness,
}

/// Load layered YAML, apply the unused-key policy the config itself selects,
/// and resolve paths against `base`.
pub fn load_harness(paths: &[&str], base: &Path) -> Result<LoadedHarness> {
    let loaded = load_layered_yaml(paths)?;
    let config = HarnessConfig::from_value(&loaded.config_json)?;

    let unused = report_unused_keys(&loaded.config_json, config.unused_keys)?;
    for pointer in &unused.unused_leaf_pointers {
        warn!(pointer = %pointer, "unused harness config key");
    }

    let harness = config.resolve(base)?;
    Ok(LoadedHarness {
        loaded,
        unused,
        harness,
    })
}
