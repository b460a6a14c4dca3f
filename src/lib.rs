//! blueprint - build definition for the SharpBlueprint client library
//!
//! This library resolves everything a build of the client library needs to know
//! before it starts: which target and configuration run, whether the build is local,
//! a pull request or a tagged release, which semantic version it produces, and where
//! every binary, test result, archive and NuGet package lands.
//!
//! # Core Concepts
//!
//! - **Build Context**: CLI arguments, an environment snapshot and the host OS,
//!   injected so resolution is deterministic in tests
//! - **Build Parameters**: flags derived from the CI environment (AppVeyor)
//! - **Build Version**: semantic version calculated with GitVersion
//! - **Build Paths**: artifact layout per target framework
//! - **Probe**: a one-request HTTP helper that counts a marker string in a page
//!
//! # Example Usage
//!
//! ```no_run
//! use blueprint::build::{BuildParameters, BuildPlan, BuildVersion, ProjectLayout};
//! use blueprint::ci::{BuildArgs, BuildContext};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BuildContext::from_process(BuildArgs::default(), PathBuf::from("."));
//! let params = BuildParameters::resolve(&ctx);
//! let version = BuildVersion::from_sem_version("1.2.3-beta0004")?;
//!
//! let plan = BuildPlan::initialize(params, version, &ProjectLayout::default(), ctx.host)?;
//! println!("Artifacts: {}", plan.paths.directories.artifacts.display());
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod ci;
pub mod cli;
pub mod config;
pub mod probe;
pub mod util;

pub use build::{BuildParameters, BuildPaths, BuildPlan, BuildVersion};
pub use ci::{BuildArgs, BuildContext, EnvSnapshot, HostOs};
pub use config::{BlueprintConfig, ConfigError};
pub use probe::{HttpProbe, ProbeError};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
