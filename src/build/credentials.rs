use crate::ci::EnvSnapshot;
use serde::{Serialize, Serializer};
use std::fmt;

/// GitHub account used when publishing releases
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildCredentials {
    pub user_name: Option<String>,
    #[serde(serialize_with = "redact")]
    pub password: Option<String>,
}

impl BuildCredentials {
    pub fn github(env: &EnvSnapshot) -> Self {
        Self {
            user_name: non_blank(env.get("GITHUB_USERNAME")),
            password: non_blank(env.get("GITHUB_PASSWORD")),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.user_name.is_some() && self.password.is_some()
    }
}

// Keeps the secret out of logs and `--format json` output.
impl fmt::Debug for BuildCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildCredentials")
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn redact<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(_) => s.serialize_some("***"),
        None => s.serialize_none(),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
