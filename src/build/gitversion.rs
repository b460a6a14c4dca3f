//! GitVersion invocation
//!
//! The version calculator talks to GitVersion through [`VersionTool`] so that tests can
//! substitute canned output for the real executable.

use super::version::VersionError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Default executable name, resolved through `PATH`
pub const DEFAULT_GITVERSION: &str = "gitversion";

/// Environment variables GitVersion exports in build server mode
pub const MAJOR_MINOR_PATCH_VAR: &str = "GitVersion_MajorMinorPatch";
pub const LEGACY_SEMVER_PADDED_VAR: &str = "GitVersion_LegacySemVerPadded";

/// Subset of the `/output json` document the build consumes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GitVersionInfo {
    pub major_minor_patch: String,
    #[serde(default)]
    pub legacy_sem_ver_padded: Option<String>,
    #[serde(default)]
    pub sem_ver: Option<String>,
}

impl GitVersionInfo {
    /// Padded semantic version, falling back to `SemVer` for GitVersion releases that
    /// no longer emit the legacy field
    pub fn padded_sem_ver(&self) -> Option<&str> {
        self.legacy_sem_ver_padded
            .as_deref()
            .or(self.sem_ver.as_deref())
    }
}

pub trait VersionTool {
    /// Runs in build server mode: pushes the version to the CI server and rewrites the
    /// assembly info file
    fn update_build_server(&self, assembly_info: &Path) -> Result<(), VersionError>;

    /// Runs in JSON mode and returns the calculated version
    fn read_json(&self) -> Result<GitVersionInfo, VersionError>;
}

/// Runs the GitVersion command-line tool
#[derive(Debug, Clone)]
pub struct GitVersionCli {
    executable: PathBuf,
    working_dir: PathBuf,
}

impl GitVersionCli {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, VersionError> {
        debug!(executable = %self.executable.display(), ?args, "Running GitVersion");

        let output = Command::new(&self.executable)
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| VersionError::ToolLaunch {
                executable: self.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(VersionError::ToolFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionTool for GitVersionCli {
    fn update_build_server(&self, assembly_info: &Path) -> Result<(), VersionError> {
        let assembly_info = assembly_info.to_string_lossy().into_owned();
        self.run(&[
            "/output",
            "buildserver",
            "/updateassemblyinfo",
            assembly_info.as_str(),
        ])?;
        info!(assembly_info = %assembly_info, "Pushed version to build server");
        Ok(())
    }

    fn read_json(&self) -> Result<GitVersionInfo, VersionError> {
        let stdout = self.run(&["/output", "json"])?;
        parse_json(&stdout)
    }
}

pub fn parse_json(stdout: &str) -> Result<GitVersionInfo, VersionError> {
    serde_json::from_str(stdout.trim()).map_err(VersionError::InvalidToolOutput)
}
