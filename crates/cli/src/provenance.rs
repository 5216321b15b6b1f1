use anyhow::{Context, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use raceway::TrackCfg;

/// Sidecar describing how an artifact was produced.
#[derive(Serialize)]
pub struct Provenance<'a> {
    pub code_rev: String,
    pub crate_version: &'static str,
    pub command: &'a str,
    pub seed: u64,
    pub config: &'a TrackCfg,
    pub outputs: Vec<String>,
}

impl<'a> Provenance<'a> {
    pub fn new(command: &'a str, config: &'a TrackCfg) -> Self {
        Self {
            code_rev: current_git_rev(),
            crate_version: raceway::VERSION,
            command,
            seed: config.seed,
            config,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut prov: Provenance<'_>) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = provenance_path(artifact);
    prov.outputs.push(artifact.to_string_lossy().into_owned());
    let bytes = serde_json::to_vec_pretty(&prov)?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
