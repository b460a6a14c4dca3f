//! Build parameter resolution
//!
//! Translates the injected [`BuildContext`] into the flags that drive the rest of the
//! build. Nothing here fails: missing or malformed CI data simply resolves to `false`.

use super::credentials::BuildCredentials;
use super::release_notes::{ReleaseNotes, RELEASE_NOTES_FILE};
use crate::ci::BuildContext;
use serde::Serialize;
use tracing::{debug, warn};

/// Branch that tagged releases and feed pushes are cut from
pub const MAIN_BRANCH: &str = "master";

/// Environment switch that disables GitVersion
pub const SKIP_GITVERSION_VAR: &str = "CLIENT_SKIP_GITVERSION";

/// Environment switch that disables OpenCover
pub const SKIP_OPENCOVER_VAR: &str = "CLIENT_SKIP_OPENCOVER";

/// Targets that mark a build as a publish build.
///
/// The two target lists read swapped relative to their flag names.
const PUBLISH_BUILD_TARGETS: &[&str] = &["ReleaseNotes", "Create-Release-Notes"];

/// Targets that mark a build as a release build
const RELEASE_BUILD_TARGETS: &[&str] = &["Publish", "Publish-NuGet", "Publish-GitHub-Release"];

#[derive(Debug, Clone, Serialize)]
pub struct BuildParameters {
    pub target: String,
    pub configuration: String,

    pub is_local_build: bool,
    pub is_running_on_unix: bool,
    pub is_running_on_windows: bool,
    pub is_running_on_appveyor: bool,

    pub is_pull_request: bool,
    pub is_main_branch: bool,
    pub is_tagged: bool,
    pub is_publish_build: bool,
    pub is_release_build: bool,

    pub skip_gitversion: bool,
    pub skip_opencover: bool,

    pub github: BuildCredentials,
    pub release_notes: Option<ReleaseNotes>,
}

impl BuildParameters {
    pub fn resolve(ctx: &BuildContext) -> Self {
        let appveyor = ctx.appveyor();
        let target = ctx.args.target.clone();

        let release_notes_path = ctx.root.join(RELEASE_NOTES_FILE);
        let release_notes = if release_notes_path.is_file() {
            match ReleaseNotes::from_file(&release_notes_path) {
                Ok(notes) => Some(notes),
                Err(e) => {
                    warn!(path = %release_notes_path.display(), error = %e, "Ignoring unreadable release notes");
                    None
                }
            }
        } else {
            debug!(path = %release_notes_path.display(), "No release notes found");
            None
        };

        let params = Self {
            is_publish_build: is_publishing(&target),
            is_release_build: is_releasing(&target),
            target,
            configuration: ctx.args.configuration.clone(),

            is_local_build: ctx.is_local_build(),
            is_running_on_unix: ctx.host.is_unix(),
            is_running_on_windows: ctx.host.is_windows(),
            is_running_on_appveyor: appveyor.is_running,

            is_pull_request: appveyor.is_pull_request(),
            is_main_branch: appveyor.is_branch(MAIN_BRANCH),
            is_tagged: appveyor.is_tagged(),

            skip_gitversion: ctx.env.is_true(SKIP_GITVERSION_VAR),
            skip_opencover: ctx.env.is_true(SKIP_OPENCOVER_VAR),

            github: BuildCredentials::github(&ctx.env),
            release_notes,
        };

        debug!(
            build_target = %params.target,
            configuration = %params.configuration,
            local = params.is_local_build,
            pull_request = params.is_pull_request,
            main_branch = params.is_main_branch,
            tagged = params.is_tagged,
            "Resolved build parameters"
        );

        params
    }

    /// Tagged build on the main branch of the CI server
    pub fn should_publish(&self) -> bool {
        !self.is_local_build && !self.is_pull_request && self.is_main_branch && self.is_tagged
    }

    /// Untagged main-branch CI build, pushed to the pre-release (MyGet) feed
    pub fn should_publish_to_myget(&self) -> bool {
        !self.is_local_build && !self.is_pull_request && self.is_main_branch && !self.is_tagged
    }
}

fn matches_any(targets: &[&str], target: &str) -> bool {
    targets.iter().any(|t| t.eq_ignore_ascii_case(target))
}

pub fn is_publishing(target: &str) -> bool {
    matches_any(PUBLISH_BUILD_TARGETS, target)
}

pub fn is_releasing(target: &str) -> bool {
    matches_any(RELEASE_BUILD_TARGETS, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::{BuildArgs, EnvSnapshot, HostOs};
    use std::fs;
    use std::path::PathBuf;
    use yare::parameterized;

    fn context(target: &str, env: &[(&str, &str)]) -> BuildContext {
        BuildContext::new(
            BuildArgs::new(Some(target.to_string()), None),
            EnvSnapshot::from_pairs(env.iter().copied()),
            HostOs::Windows,
            PathBuf::from("/nonexistent-blueprint-root"),
        )
    }

    const APPVEYOR_MASTER: &[(&str, &str)] =
        &[("APPVEYOR", "True"), ("APPVEYOR_REPO_BRANCH", "master")];

    #[parameterized(
        publish = { "Publish", true },
        publish_nuget = { "Publish-NuGet", true },
        publish_github = { "publish-github-release", true },
        release_notes = { "ReleaseNotes", false },
        default = { "Default", false },
        empty = { "", false },
    )]
    fn test_release_build_targets(target: &str, expected: bool) {
        assert_eq!(is_releasing(target), expected);
    }

    #[parameterized(
        release_notes = { "ReleaseNotes", true },
        create_release_notes = { "create-release-notes", true },
        publish = { "Publish", false },
        default = { "Default", false },
    )]
    fn test_publish_build_targets(target: &str, expected: bool) {
        assert_eq!(is_publishing(target), expected);
    }

    #[test]
    fn test_local_defaults() {
        let params = BuildParameters::resolve(&context("Default", &[]));

        assert_eq!(params.target, "Default");
        assert_eq!(params.configuration, "Release");
        assert!(params.is_local_build);
        assert!(!params.is_running_on_appveyor);
        assert!(!params.is_pull_request);
        assert!(!params.is_main_branch);
        assert!(!params.is_tagged);
        assert!(!params.should_publish());
        assert!(!params.should_publish_to_myget());
        assert!(params.release_notes.is_none());
    }

    #[test]
    fn test_tagged_master_build_publishes() {
        let mut env = APPVEYOR_MASTER.to_vec();
        env.extend([
            ("APPVEYOR_REPO_TAG", "true"),
            ("APPVEYOR_REPO_TAG_NAME", "v1.2.3"),
        ]);
        let params = BuildParameters::resolve(&context("Publish", &env));

        assert!(!params.is_local_build);
        assert!(params.is_tagged);
        assert!(params.should_publish());
        assert!(!params.should_publish_to_myget());
        assert!(params.is_release_build);
        assert!(!params.is_publish_build);
    }

    #[test]
    fn test_untagged_master_build_goes_to_myget() {
        let params = BuildParameters::resolve(&context("Default", APPVEYOR_MASTER));
        assert!(!params.should_publish());
        assert!(params.should_publish_to_myget());
    }

    #[test]
    fn test_pull_request_never_publishes() {
        let mut env = APPVEYOR_MASTER.to_vec();
        env.push(("APPVEYOR_PULL_REQUEST_NUMBER", "17"));
        let params = BuildParameters::resolve(&context("Default", &env));

        assert!(params.is_pull_request);
        assert!(!params.should_publish());
        assert!(!params.should_publish_to_myget());
    }

    #[test]
    fn test_publish_flags_are_exclusive() {
        let combos = [
            ("APPVEYOR_REPO_TAG", "true"),
            ("APPVEYOR_REPO_TAG", "false"),
        ];
        for tag in combos {
            let mut env = APPVEYOR_MASTER.to_vec();
            env.extend([tag, ("APPVEYOR_REPO_TAG_NAME", "v1")]);
            let params = BuildParameters::resolve(&context("Default", &env));
            assert_ne!(params.should_publish(), params.should_publish_to_myget());
        }
    }

    #[test]
    fn test_skip_switches() {
        let params = BuildParameters::resolve(&context(
            "Default",
            &[(SKIP_GITVERSION_VAR, "TRUE"), (SKIP_OPENCOVER_VAR, "1")],
        ));
        assert!(params.skip_gitversion);
        assert!(!params.skip_opencover);
    }

    #[test]
    fn test_release_notes_read_from_root() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(RELEASE_NOTES_FILE),
            "### New in 0.4.0\n* Something new",
        )
        .unwrap();

        let ctx = BuildContext::new(
            BuildArgs::default(),
            EnvSnapshot::default(),
            HostOs::Unix,
            dir.path().to_path_buf(),
        );
        let params = BuildParameters::resolve(&ctx);

        assert_eq!(params.release_notes.unwrap().version, "0.4.0");
        assert!(params.is_running_on_unix);
    }
}
