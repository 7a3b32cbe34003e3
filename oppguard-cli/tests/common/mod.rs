//! Common test utilities for CLI integration tests.
//!
//! Every command runs with `HOME` pointed at a temporary directory and with
//! environment overrides disabled, so the host configuration never leaks in.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a fake device storage tree.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment with an empty user storage root.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let env = Self {
            temp_dir,
            temp_path,
        };
        std::fs::create_dir_all(env.user_root()).expect("Failed to create storage root");
        env
    }

    /// Command builder with only the binary and an isolated `HOME`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("oppguard").expect("Failed to find oppguard binary");
        cmd.env("HOME", &self.temp_path)
            .env_remove("OPPGUARD_CONFIG")
            .env_remove("EXTERNAL_STORAGE");
        cmd
    }

    /// Command builder with environment overrides disabled.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--no-env");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// The trusted storage root of the fake device.
    pub fn user_root(&self) -> PathBuf {
        self.temp_path.join("storage/emulated/0")
    }

    /// Create a file (and its parents) relative to the temp directory.
    pub fn create_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_path.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write a configuration file and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.create_file("oppguard.yaml", content.as_bytes())
    }

    /// Write a configuration trusting only this environment's user root.
    pub fn write_root_config(&self) -> PathBuf {
        let content = format!("trusted_roots:\n  - {}\n", self.user_root().display());
        self.write_config(&content)
    }
}
