//! CI system detection and AppVeyor repository metadata

use super::EnvSnapshot;
use serde::Serialize;

/// CI systems recognised when deciding whether a build is local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CiSystem {
    AppVeyor,
    AzurePipelines,
    GitHubActions,
    TeamCity,
    Jenkins,
    Travis,
    Generic,
}

impl CiSystem {
    /// Returns the first CI system whose marker variable is present
    pub fn detect(env: &EnvSnapshot) -> Option<Self> {
        if env.is_true("APPVEYOR") {
            return Some(CiSystem::AppVeyor);
        }

        let markers = [
            ("TF_BUILD", CiSystem::AzurePipelines),
            ("GITHUB_ACTIONS", CiSystem::GitHubActions),
            ("TEAMCITY_VERSION", CiSystem::TeamCity),
            ("JENKINS_URL", CiSystem::Jenkins),
            ("TRAVIS", CiSystem::Travis),
            ("CI", CiSystem::Generic),
        ];

        markers
            .iter()
            .find(|(var, _)| env.get(var).is_some_and(|v| !v.trim().is_empty()))
            .map(|(_, system)| *system)
    }
}

/// Repository state reported by AppVeyor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppVeyorInfo {
    pub is_running: bool,
    pub branch: Option<String>,
    pub pull_request_number: Option<u64>,
    pub is_tag: bool,
    pub tag_name: Option<String>,
}

impl AppVeyorInfo {
    pub fn from_env(env: &EnvSnapshot) -> Self {
        Self {
            is_running: env.is_true("APPVEYOR"),
            branch: env.get("APPVEYOR_REPO_BRANCH").map(str::to_string),
            pull_request_number: env
                .get("APPVEYOR_PULL_REQUEST_NUMBER")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|n| *n > 0),
            is_tag: env.is_true("APPVEYOR_REPO_TAG"),
            tag_name: env.get("APPVEYOR_REPO_TAG_NAME").map(str::to_string),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request_number.is_some()
    }

    /// Tag flag set and a non-blank tag name present
    pub fn is_tagged(&self) -> bool {
        self.is_tag
            && self
                .tag_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty())
    }

    pub fn is_branch(&self, name: &str) -> bool {
        self.branch
            .as_deref()
            .is_some_and(|b| b.eq_ignore_ascii_case(name))
    }
}
