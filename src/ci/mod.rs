//! Build context: injected arguments, environment snapshot and host OS
//!
//! Everything the resolver needs from the outside world is captured here once, so
//! parameter resolution never touches `std::env` directly and tests can build a
//! context from a handful of key/value pairs.

pub mod appveyor;

pub use appveyor::{AppVeyorInfo, CiSystem};

use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Default build target when `--target` is not given
pub const DEFAULT_TARGET: &str = "Default";

/// Default build configuration when `--configuration` is not given
pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Operating system the build runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    Unix,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostOs::Windows
    }

    pub fn is_unix(self) -> bool {
        self == HostOs::Unix
    }
}

/// Immutable copy of the environment variables visible to the build
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// True when the variable equals `expected`, ignoring ASCII case
    pub fn equals_ignore_case(&self, key: &str, expected: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }

    /// Case-insensitive `"True"` check used for the skip switches
    pub fn is_true(&self, key: &str) -> bool {
        self.equals_ignore_case(key, "True")
    }
}

/// Arguments passed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    pub target: String,
    pub configuration: String,
}

impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            configuration: DEFAULT_CONFIGURATION.to_string(),
        }
    }
}

impl BuildArgs {
    /// Fills in defaults for any argument that was not supplied
    pub fn new(target: Option<String>, configuration: Option<String>) -> Self {
        Self {
            target: target.unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            configuration: configuration.unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string()),
        }
    }
}

/// Everything a build invocation reads from its surroundings
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub args: BuildArgs,
    pub env: EnvSnapshot,
    pub host: HostOs,
    /// Repository root that relative build files are read from
    pub root: PathBuf,
}

impl BuildContext {
    pub fn new(args: BuildArgs, env: EnvSnapshot, host: HostOs, root: PathBuf) -> Self {
        Self {
            args,
            env,
            host,
            root,
        }
    }

    /// Context for the running process
    pub fn from_process(args: BuildArgs, root: PathBuf) -> Self {
        Self::new(args, EnvSnapshot::from_process(), HostOs::current(), root)
    }

    pub fn ci_system(&self) -> Option<CiSystem> {
        CiSystem::detect(&self.env)
    }

    pub fn is_local_build(&self) -> bool {
        self.ci_system().is_none()
    }

    pub fn appveyor(&self) -> AppVeyorInfo {
        AppVeyorInfo::from_env(&self.env)
    }
}
