use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact.
pub struct Payload {
    pub command: &'static str,
    pub seed: Option<u32>,
    pub params: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            seed: None,
            params,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Provenance document for the given outputs.
    pub fn document(&self, outputs: &[&Path]) -> Value {
        json!({
            "code_rev": current_git_rev(),
            "jigsnap_version": jigsnap::VERSION,
            "command": self.command,
            "seed": self.seed,
            "params": self.params,
            "outputs": outputs.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
        })
    }
}

/// Write `<artifact>.provenance.json` next to `artifact`, listing every output.
pub fn write_sidecar(artifact: &Path, extra_outputs: &[&Path], payload: &Payload) -> Result<PathBuf> {
    let sidecar = sidecar_path(artifact);
    ensure_parent(&sidecar)?;
    let mut outputs = vec![artifact];
    outputs.extend_from_slice(extra_outputs);
    let doc = payload.document(&outputs);
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    tracing::info!(path = %sidecar.display(), "provenance_written");
    Ok(sidecar)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("board"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(baked) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return baked.to_string();
    }
    if let Ok(runtime) = std::env::var("GIT_COMMIT") {
        if !runtime.is_empty() {
            return runtime;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_replaces_extension() {
        let derived = sidecar_path(Path::new("/tmp/out/board.json"));
        assert_eq!(derived, Path::new("/tmp/out/board.provenance.json"));
    }

    #[test]
    fn sidecar_lists_all_outputs_and_seed() {
        let dir = tempdir().unwrap();
        let board = dir.path().join("nested/board.json");
        let svg = dir.path().join("nested/board.svg");
        let payload = Payload::new("generate", json!({"rows": 2, "cols": 3})).with_seed(42);
        let path = write_sidecar(&board, &[svg.as_path()], &payload).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "generate");
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["params"]["cols"], 3);
        assert_eq!(parsed["outputs"][0], board.to_string_lossy().as_ref());
        assert_eq!(parsed["outputs"][1], svg.to_string_lossy().as_ref());
        assert_eq!(parsed["jigsnap_version"], jigsnap::VERSION);
    }
}
