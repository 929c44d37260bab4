//! Service descriptors shipped with the app under test.
//!
//! The agent's `inputs.json` names the monitor file it writes every emitted
//! event to; that file is the master ledger. The target's `outputs.json`
//! names the file each target appends received events to.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Agent,
    Splitter,
    Target,
}

impl ServiceType {
    /// Value of the `operation-mode` label and the app subcommand.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Agent => "agent",
            ServiceType::Splitter => "splitter",
            ServiceType::Target => "target",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" => Some(ServiceType::Agent),
            "splitter" => Some(ServiceType::Splitter),
            "target" => Some(ServiceType::Target),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgentInputs {
    monitor: String,
}

#[derive(Debug, Deserialize)]
struct TargetOutputs {
    file: String,
}

/// Resolve the agent's monitor file, relative to the `inputs.json` directory.
pub fn monitor_path_from_agent_inputs(inputs_json: &Path) -> Result<PathBuf> {
    let raw = fs::read_to_string(inputs_json)
        .with_context(|| format!("read agent inputs: {}", inputs_json.display()))?;
    let inputs: AgentInputs = serde_json::from_str(&raw)
        .with_context(|| format!("agent inputs must carry a 'monitor' key: {}", inputs_json.display()))?;
    let dir = inputs_json.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(inputs.monitor))
}

/// The `file` each target writes received events to, as configured.
pub fn events_file_from_target_outputs(outputs_json: &Path) -> Result<PathBuf> {
    let raw = fs::read_to_string(outputs_json)
        .with_context(|| format!("read target outputs: {}", outputs_json.display()))?;
    let outputs: TargetOutputs = serde_json::from_str(&raw)
        .with_context(|| format!("target outputs must carry a 'file' key: {}", outputs_json.display()))?;
    Ok(PathBuf::from(outputs.file))
}
