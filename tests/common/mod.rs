//! Common test utilities shared across CLI tests.
//!
//! Each fixture gets its own directory holding a catalog, a config file
//! pointing at it, and the snapshot location.

#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const FIXTURE_CATALOG: &str = include_str!("../fixtures/catalog.csv");

pub struct CliFixture {
    pub dir: TempDir,
    pub catalog: PathBuf,
    pub config: PathBuf,
    pub snapshot: PathBuf,
}

impl CliFixture {
    pub fn new(auto_build: bool) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let catalog = dir.path().join("catalog.csv");
        let config = dir.path().join("assessrec.toml");
        let snapshot = dir.path().join("index/index.json");
        std::fs::write(&catalog, FIXTURE_CATALOG).expect("write catalog");

        let toml = format!(
            "[catalog]\npath = {catalog:?}\n\n\
             [index]\nsnapshot_path = {snapshot:?}\nauto_build = {auto_build}\n\n\
             [embedding]\nbackend = \"hash\"\nhash_dims = 128\n\n\
             [generation]\nbackend = \"disabled\"\n",
            catalog = catalog.display().to_string(),
            snapshot = snapshot.display().to_string(),
        );
        std::fs::write(&config, toml).expect("write config");

        Self {
            dir,
            catalog,
            config,
            snapshot,
        }
    }

    /// `assessrec --config <fixture config>` run from the fixture directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("assessrec").expect("binary builds");
        cmd.current_dir(self.dir.path())
            .env_remove("ASSESSREC_CONFIG")
            .env_remove("ASSESSREC_EMBEDDING_BACKEND")
            .env_remove("ASSESSREC_GENERATION_BACKEND")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }
}

/// Parse a command's stdout as one JSON document.
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
