//! Semantic version calculation

use super::gitversion::{VersionTool, LEGACY_SEMVER_PADDED_VAR, MAJOR_MINOR_PATCH_VAR};
use super::parameters::BuildParameters;
use crate::ci::EnvSnapshot;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

/// Assembly info file GitVersion rewrites in build server mode
pub const ASSEMBLY_INFO_FILE: &str = "./src/SharpBlueprint.Client/Properties/AssemblyInfo.cs";

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Version is unresolved: {0}")]
    Unresolved(String),

    #[error("Semantic version '{sem_version}' does not start with version '{version}'")]
    Mismatch {
        version: String,
        sem_version: String,
    },

    #[error("Invalid semantic version '{0}': expected MAJOR.MINOR.PATCH[-suffix]")]
    InvalidSemVersion(String),

    #[error("Failed to launch {executable}: {source}")]
    ToolLaunch {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("GitVersion exited with status {status:?}: {stderr}")]
    ToolFailed { status: Option<i32>, stderr: String },

    #[error("Failed to parse GitVersion output: {0}")]
    InvalidToolOutput(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildVersion {
    /// Numeric `MAJOR.MINOR.PATCH`
    pub version: String,
    /// Padded semantic version, e.g. `1.2.3-beta0004`
    pub sem_version: String,
    /// Pre-release suffix used for the `*` part of package versions
    pub prerelease: String,
    pub milestone: String,
}

fn core_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d+\.\d+\.\d+)(?:-[0-9A-Za-z.\-]+)?(?:\+[0-9A-Za-z.\-]+)?$")
            .expect("valid regex")
    })
}

impl BuildVersion {
    /// Calculates the version with GitVersion.
    ///
    /// GitVersion only runs on Windows and when `CLIENT_SKIP_GITVERSION` is unset; in
    /// every other case the version stays unresolved and this returns
    /// [`VersionError::Unresolved`].
    pub fn calculate(
        params: &BuildParameters,
        env: &EnvSnapshot,
        tool: &dyn VersionTool,
    ) -> Result<Self, VersionError> {
        let mut version: Option<String> = None;
        let mut sem_version: Option<String> = None;

        if params.is_running_on_windows && !params.skip_gitversion {
            info!("Calculating Semantic Version");

            if !params.is_local_build || params.is_publish_build || params.is_release_build {
                tool.update_build_server(Path::new(ASSEMBLY_INFO_FILE))?;

                version = env.get(MAJOR_MINOR_PATCH_VAR).map(str::to_string);
                sem_version = env.get(LEGACY_SEMVER_PADDED_VAR).map(str::to_string);
            }

            let asserted = tool.read_json()?;
            sem_version = asserted
                .padded_sem_ver()
                .map(str::to_string)
                .or(sem_version);
            version = Some(asserted.major_minor_patch);

            info!(
                sem_version = sem_version.as_deref().unwrap_or_default(),
                "Calculated Semantic Version"
            );
        } else if params.skip_gitversion {
            warn!("GitVersion skipped, version left unresolved");
        } else {
            warn!("GitVersion only runs on Windows, version left unresolved");
        }

        match (version, sem_version) {
            (Some(version), Some(sem_version)) => Self::from_parts(version, sem_version),
            _ => Err(VersionError::Unresolved(
                "GitVersion did not run or produced no version".to_string(),
            )),
        }
    }

    /// Builds a version from its numeric core and padded semantic version
    pub fn from_parts(version: String, sem_version: String) -> Result<Self, VersionError> {
        if version.is_empty() || sem_version.is_empty() {
            return Err(VersionError::Unresolved(
                "version and semantic version must be non-empty".to_string(),
            ));
        }

        let prerelease = sem_version
            .strip_prefix(version.as_str())
            .ok_or_else(|| VersionError::Mismatch {
                version: version.clone(),
                sem_version: sem_version.clone(),
            })?
            .trim_start_matches('-')
            .to_string();

        Ok(Self {
            milestone: format!("v{}", version),
            version,
            sem_version,
            prerelease,
        })
    }

    /// Builds a version from an explicit semantic version such as `1.2.3-beta0004`
    pub fn from_sem_version(sem_version: &str) -> Result<Self, VersionError> {
        let core = core_version_re()
            .captures(sem_version)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| VersionError::InvalidSemVersion(sem_version.to_string()))?;

        Self::from_parts(core.as_str().to_string(), sem_version.to_string())
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::gitversion::GitVersionInfo;
    use crate::ci::{BuildArgs, BuildContext, HostOs};
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records which GitVersion modes were invoked
    struct FakeTool {
        json: GitVersionInfo,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeTool {
        fn new(version: &str, padded: &str) -> Self {
            Self {
                json: GitVersionInfo {
                    major_minor_patch: version.to_string(),
                    legacy_sem_ver_padded: Some(padded.to_string()),
                    sem_ver: None,
                },
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl VersionTool for FakeTool {
        fn update_build_server(&self, _assembly_info: &Path) -> Result<(), VersionError> {
            self.calls.borrow_mut().push("buildserver");
            Ok(())
        }

        fn read_json(&self) -> Result<GitVersionInfo, VersionError> {
            self.calls.borrow_mut().push("json");
            Ok(self.json.clone())
        }
    }

    fn params(host: HostOs, target: &str, env: &EnvSnapshot) -> BuildParameters {
        let ctx = BuildContext::new(
            BuildArgs::new(Some(target.to_string()), None),
            env.clone(),
            host,
            PathBuf::from("/nonexistent-blueprint-root"),
        );
        BuildParameters::resolve(&ctx)
    }

    #[test]
    fn test_local_windows_build_reads_json_only() {
        let env = EnvSnapshot::default();
        let tool = FakeTool::new("1.2.3", "1.2.3-beta0004");

        let version =
            BuildVersion::calculate(&params(HostOs::Windows, "Default", &env), &env, &tool)
                .unwrap();

        assert_eq!(*tool.calls.borrow(), vec!["json"]);
        assert_eq!(version.version, "1.2.3");
        assert_eq!(version.sem_version, "1.2.3-beta0004");
        assert_eq!(version.prerelease, "beta0004");
        assert_eq!(version.milestone, "v1.2.3");
    }

    #[test]
    fn test_ci_build_updates_build_server_first() {
        let env = EnvSnapshot::from_pairs([("APPVEYOR", "True")]);
        let tool = FakeTool::new("2.0.0", "2.0.0");

        let version =
            BuildVersion::calculate(&params(HostOs::Windows, "Default", &env), &env, &tool)
                .unwrap();

        assert_eq!(*tool.calls.borrow(), vec!["buildserver", "json"]);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_release_target_updates_build_server_locally() {
        let env = EnvSnapshot::default();
        let tool = FakeTool::new("2.0.0", "2.0.0");

        BuildVersion::calculate(&params(HostOs::Windows, "Publish", &env), &env, &tool).unwrap();

        assert_eq!(*tool.calls.borrow(), vec!["buildserver", "json"]);
    }

    #[test]
    fn test_unix_host_is_unresolved() {
        let env = EnvSnapshot::default();
        let tool = FakeTool::new("1.0.0", "1.0.0");

        let result = BuildVersion::calculate(&params(HostOs::Unix, "Default", &env), &env, &tool);

        assert!(matches!(result, Err(VersionError::Unresolved(_))));
        assert!(tool.calls.borrow().is_empty());
    }

    #[test]
    fn test_skip_switch_is_unresolved() {
        let env = EnvSnapshot::from_pairs([("CLIENT_SKIP_GITVERSION", "true")]);
        let tool = FakeTool::new("1.0.0", "1.0.0");

        let result =
            BuildVersion::calculate(&params(HostOs::Windows, "Default", &env), &env, &tool);

        assert!(matches!(result, Err(VersionError::Unresolved(_))));
    }

    #[test]
    fn test_from_sem_version() {
        let version = BuildVersion::from_sem_version("0.3.1-alpha0002").unwrap();
        assert_eq!(version.version, "0.3.1");
        assert_eq!(version.prerelease, "alpha0002");
        assert_eq!(version.milestone, "v0.3.1");

        assert!(matches!(
            BuildVersion::from_sem_version("latest"),
            Err(VersionError::InvalidSemVersion(_))
        ));
    }

    #[test]
    fn test_from_sem_version_rejects_trailing_text() {
        for input in ["1.0.0/../../..", "1.0.0 beta", "1.2.3-rc/1", "1.2.3.4", "v1.2.3"] {
            assert!(
                matches!(
                    BuildVersion::from_sem_version(input),
                    Err(VersionError::InvalidSemVersion(_))
                ),
                "accepted {}",
                input
            );
        }

        let version = BuildVersion::from_sem_version("1.2.3-beta.4+build.7").unwrap();
        assert_eq!(version.version, "1.2.3");
    }

    #[test]
    fn test_mismatched_parts() {
        let result = BuildVersion::from_parts("1.2.3".into(), "1.2.4-beta".into());
        assert!(matches!(result, Err(VersionError::Mismatch { .. })));
    }
}
