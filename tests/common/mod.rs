//! Shared integration-test harness for running the `flagpole` binary
//! against an isolated storage file.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A profile: one storage file in its own temporary directory, plus the
/// content document every invocation loads.
pub struct FlagpoleProfile {
    dir: TempDir,
    content: PathBuf,
}

impl FlagpoleProfile {
    /// A fresh profile using the shipped content document.
    #[allow(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self::with_content(Self::asset_path("content.json"))
    }

    /// A fresh profile using `content`.
    #[allow(clippy::missing_panics_doc)]
    pub fn with_content(content: PathBuf) -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
            content,
        }
    }

    /// Path of the storage file (created on first write).
    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    /// Directory for scratch output.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Stored key/value pairs.
    #[allow(clippy::missing_panics_doc)]
    pub fn stored(&self) -> serde_json::Value {
        std::fs::read_to_string(self.storage_path()).map_or_else(
            |_| serde_json::json!({}),
            |text| serde_json::from_str(&text).expect("storage should be JSON"),
        )
    }

    /// A command with this profile's storage and content, isolated from
    /// any `FLAGPOLE_*` variables in the environment.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_flagpole"));
        for var in [
            "FLAGPOLE_CONTENT",
            "FLAGPOLE_STORAGE",
            "FLAGPOLE_PAGE_URL",
            "FLAGPOLE_PREFERS_DARK",
            "FLAGPOLE_FORM_ENDPOINT",
            "FLAGPOLE_EVENTS",
            "FLAGPOLE_METRICS_PORT",
            "FLAGPOLE_LOG_LEVEL",
        ] {
            cmd.env_remove(var);
        }
        cmd.args(args)
            .arg("--quiet")
            .arg("--storage")
            .arg(self.storage_path())
            .arg("--content")
            .arg(&self.content);
        cmd
    }

    /// Runs `flagpole <args>` and waits for it.
    #[allow(clippy::missing_panics_doc)]
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("failed to run flagpole")
    }

    /// Path to a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Path to a file under `assets`.
    pub fn asset_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join(name)
    }
}

/// Stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
