//! Build definition for the SharpBlueprint client library
//!
//! - [`parameters`]: target/configuration and CI-derived flags
//! - [`version`]: semantic version calculation via GitVersion
//! - [`paths`]: build output and artifact layout
//! - [`packages`]: NuGet package list
//! - [`plan`]: everything above, initialized together

pub mod credentials;
pub mod framework;
pub mod gitversion;
pub mod packages;
pub mod parameters;
pub mod paths;
pub mod plan;
pub mod project_file;
pub mod release_notes;
pub mod version;

pub use credentials::BuildCredentials;
pub use framework::TargetFramework;
pub use gitversion::{GitVersionCli, GitVersionInfo, VersionTool};
pub use packages::{BuildPackage, BuildPackages};
pub use parameters::BuildParameters;
pub use paths::{BuildDirectories, BuildFiles, BuildPaths, PathError, ProjectLayout, ZipArchive};
pub use plan::BuildPlan;
pub use project_file::{patch_project_json, patch_version_text};
pub use release_notes::{ReleaseNotes, ReleaseNotesError};
pub use version::{BuildVersion, VersionError};
