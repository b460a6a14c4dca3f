//! Build output and artifact layout
//!
//! All paths are relative to the repository root (the working directory of the build).

use super::framework::TargetFramework;
use crate::ci::HostOs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid {argument} '{value}': must be a single path segment")]
    InvalidSegment {
        argument: &'static str,
        value: String,
    },
}

/// Rejects values that would leave the directory they are joined onto
fn check_segment(argument: &'static str, value: &str) -> Result<(), PathError> {
    if value.contains(['/', '\\']) || value.contains("..") {
        return Err(PathError::InvalidSegment {
            argument,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Project names the layout is derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    pub client_project: String,
    pub test_project: String,
    /// Third-party assemblies shipped next to the client assembly
    pub dependencies: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            client_project: "SharpBlueprint.Client".to_string(),
            test_project: "SharpBlueprint.Client.Tests".to_string(),
            dependencies: vec!["Newtonsoft.Json.dll".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildPaths {
    pub files: BuildFiles,
    pub directories: BuildDirectories,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildFiles {
    pub client_assembly_paths: Vec<PathBuf>,
    pub testing_assembly_paths: Vec<PathBuf>,
    pub repo_files_paths: Vec<PathBuf>,
    pub artifacts_source_paths: Vec<PathBuf>,
    pub test_coverage_output_file_path: PathBuf,
    pub zip_archives: Vec<ZipArchive>,
}

/// Per-framework binary archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZipArchive {
    pub framework: TargetFramework,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildDirectories {
    pub artifacts: PathBuf,
    pub test_results: PathBuf,
    pub nuget_root: PathBuf,
    pub artifacts_bin: PathBuf,
    pub artifacts_bin_net35: PathBuf,
    pub artifacts_bin_net452: PathBuf,
    pub artifacts_bin_netstandard16: PathBuf,
    pub to_clean: Vec<PathBuf>,
}

impl BuildDirectories {
    fn new(artifacts: PathBuf) -> Self {
        let artifacts_bin = artifacts.join("bin");
        let test_results = artifacts.join("test-results");
        let nuget_root = artifacts.join("nuget");
        let artifacts_bin_net35 = artifacts_bin.join(TargetFramework::Net35.moniker());
        let artifacts_bin_net452 = artifacts_bin.join(TargetFramework::Net452.moniker());
        let artifacts_bin_netstandard16 =
            artifacts_bin.join(TargetFramework::NetStandard16.moniker());

        let to_clean = vec![
            artifacts.clone(),
            test_results.clone(),
            nuget_root.clone(),
            artifacts_bin.clone(),
            artifacts_bin_net35.clone(),
            artifacts_bin_net452.clone(),
            artifacts_bin_netstandard16.clone(),
        ];

        Self {
            artifacts,
            test_results,
            nuget_root,
            artifacts_bin,
            artifacts_bin_net35,
            artifacts_bin_net452,
            artifacts_bin_netstandard16,
            to_clean,
        }
    }

    /// Binary output directory for one framework
    pub fn bin_for(&self, framework: TargetFramework) -> &Path {
        match framework {
            TargetFramework::Net35 => &self.artifacts_bin_net35,
            TargetFramework::Net452 => &self.artifacts_bin_net452,
            TargetFramework::NetStandard16 => &self.artifacts_bin_netstandard16,
        }
    }
}

impl BuildPaths {
    pub fn derive(
        layout: &ProjectLayout,
        configuration: &str,
        sem_version: &str,
        host: HostOs,
    ) -> Result<Self, PathError> {
        if configuration.is_empty() {
            return Err(PathError::MissingArgument("configuration"));
        }
        if sem_version.is_empty() {
            return Err(PathError::MissingArgument("semVersion"));
        }
        check_segment("configuration", configuration)?;
        check_segment("semVersion", sem_version)?;
        check_segment("client project", &layout.client_project)?;
        check_segment("test project", &layout.test_project)?;

        let build_dir = PathBuf::from("./src")
            .join(&layout.client_project)
            .join("bin")
            .join(configuration);
        let testing_dir = PathBuf::from("./test")
            .join(&layout.test_project)
            .join("bin")
            .join(configuration);
        let directories =
            BuildDirectories::new(PathBuf::from("./artifacts").join(format!("v{}", sem_version)));

        let client_assembly_paths: Vec<PathBuf> = [
            format!("{}.dll", layout.client_project),
            format!("{}.pdb", layout.client_project),
        ]
        .into_iter()
        .chain(layout.dependencies.iter().cloned())
        .chain(std::iter::once("LICENSE".to_string()))
        .map(|file| build_dir.join(file))
        .collect();

        let testing_assembly_paths: Vec<PathBuf> = ["dll", "pdb", "dll.config"]
            .iter()
            .map(|ext| testing_dir.join(format!("{}.{}", layout.test_project, ext)))
            .collect();

        let repo_files_paths: Vec<PathBuf> = ["LICENSE", "README.md", "ReleaseNotes.md"]
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let artifacts_source_paths: Vec<PathBuf> = client_assembly_paths
            .iter()
            .chain(&testing_assembly_paths)
            .chain(&repo_files_paths)
            .cloned()
            .collect();

        let zip_archives = TargetFramework::ALL
            .into_iter()
            .map(|framework| ZipArchive {
                framework,
                path: directories
                    .artifacts
                    .join(zip_file_name(&layout.client_project, framework, sem_version)),
            })
            .collect();

        let files = BuildFiles {
            client_assembly_paths: filter_debug_symbols(client_assembly_paths, host),
            testing_assembly_paths: filter_debug_symbols(testing_assembly_paths, host),
            repo_files_paths: filter_debug_symbols(repo_files_paths, host),
            artifacts_source_paths: filter_debug_symbols(artifacts_source_paths, host),
            test_coverage_output_file_path: directories.test_results.join("OpenCover.xml"),
            zip_archives,
        };

        debug!(
            artifacts = %directories.artifacts.display(),
            build_dir = %build_dir.display(),
            "Derived build paths"
        );

        Ok(Self { files, directories })
    }
}

/// `<prefix>-<framework>-v<semVersion>.zip`
pub fn zip_file_name(prefix: &str, framework: TargetFramework, sem_version: &str) -> String {
    format!("{}-{}-v{}.zip", prefix, framework.moniker(), sem_version)
}

/// Drops `.pdb` files when the host does not produce them (anything but Windows)
pub fn filter_debug_symbols(files: Vec<PathBuf>, host: HostOs) -> Vec<PathBuf> {
    if host.is_windows() {
        return files;
    }
    files
        .into_iter()
        .filter(|f| !f.to_string_lossy().to_ascii_lowercase().ends_with("pdb"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(host: HostOs) -> BuildPaths {
        BuildPaths::derive(&ProjectLayout::default(), "Release", "1.2.3", host).unwrap()
    }

    #[test]
    fn test_artifact_directories() {
        let paths = derive(HostOs::Unix);
        let dirs = &paths.directories;

        assert_eq!(dirs.artifacts, PathBuf::from("./artifacts/v1.2.3"));
        assert_eq!(dirs.nuget_root, PathBuf::from("./artifacts/v1.2.3/nuget"));
        assert_eq!(dirs.test_results, PathBuf::from("./artifacts/v1.2.3/test-results"));
        assert_eq!(
            dirs.bin_for(TargetFramework::NetStandard16),
            Path::new("./artifacts/v1.2.3/bin/netstandard1.6")
        );
        assert_eq!(dirs.to_clean.len(), 7);
        assert_eq!(dirs.to_clean[0], dirs.artifacts);
    }

    #[test]
    fn test_windows_keeps_debug_symbols() {
        let paths = derive(HostOs::Windows);
        assert_eq!(
            paths.files.client_assembly_paths,
            vec![
                PathBuf::from("./src/SharpBlueprint.Client/bin/Release/SharpBlueprint.Client.dll"),
                PathBuf::from("./src/SharpBlueprint.Client/bin/Release/SharpBlueprint.Client.pdb"),
                PathBuf::from("./src/SharpBlueprint.Client/bin/Release/Newtonsoft.Json.dll"),
                PathBuf::from("./src/SharpBlueprint.Client/bin/Release/LICENSE"),
            ]
        );
        assert_eq!(paths.files.artifacts_source_paths.len(), 10);
    }

    #[test]
    fn test_unix_drops_debug_symbols() {
        let paths = derive(HostOs::Unix);
        assert_eq!(paths.files.client_assembly_paths.len(), 3);
        assert_eq!(
            paths.files.testing_assembly_paths,
            vec![
                PathBuf::from(
                    "./test/SharpBlueprint.Client.Tests/bin/Release/SharpBlueprint.Client.Tests.dll"
                ),
                PathBuf::from(
                    "./test/SharpBlueprint.Client.Tests/bin/Release/SharpBlueprint.Client.Tests.dll.config"
                ),
            ]
        );
        assert_eq!(paths.files.artifacts_source_paths.len(), 8);
    }

    #[test]
    fn test_filter_preserves_order() {
        let files = vec![
            PathBuf::from("a.dll"),
            PathBuf::from("a.PDB"),
            PathBuf::from("b.xml"),
            PathBuf::from("c.dll"),
        ];
        let filtered = filter_debug_symbols(files.clone(), HostOs::Unix);
        assert_eq!(
            filtered,
            vec![
                PathBuf::from("a.dll"),
                PathBuf::from("b.xml"),
                PathBuf::from("c.dll")
            ]
        );
        assert_eq!(filter_debug_symbols(files.clone(), HostOs::Windows), files);
    }

    #[test]
    fn test_coverage_and_archives() {
        let paths = derive(HostOs::Unix);
        assert_eq!(
            paths.files.test_coverage_output_file_path,
            PathBuf::from("./artifacts/v1.2.3/test-results/OpenCover.xml")
        );

        let archives: Vec<_> = paths.files.zip_archives.iter().map(|z| z.path.clone()).collect();
        assert_eq!(
            archives,
            vec![
                PathBuf::from("./artifacts/v1.2.3/SharpBlueprint.Client-net35-v1.2.3.zip"),
                PathBuf::from("./artifacts/v1.2.3/SharpBlueprint.Client-net452-v1.2.3.zip"),
                PathBuf::from("./artifacts/v1.2.3/SharpBlueprint.Client-netstandard1.6-v1.2.3.zip"),
            ]
        );
    }

    #[test]
    fn test_configuration_changes_build_dir() {
        let paths =
            BuildPaths::derive(&ProjectLayout::default(), "Debug", "0.1.0-beta0001", HostOs::Unix)
                .unwrap();
        assert!(paths.files.client_assembly_paths[0].starts_with("./src/SharpBlueprint.Client/bin/Debug"));
        assert_eq!(
            paths.directories.artifacts,
            PathBuf::from("./artifacts/v0.1.0-beta0001")
        );
    }

    #[test]
    fn test_guard_clauses() {
        let layout = ProjectLayout::default();
        assert_eq!(
            BuildPaths::derive(&layout, "", "1.2.3", HostOs::Unix).unwrap_err(),
            PathError::MissingArgument("configuration")
        );
        assert_eq!(
            BuildPaths::derive(&layout, "Release", "", HostOs::Unix).unwrap_err(),
            PathError::MissingArgument("semVersion")
        );
    }

    #[test]
    fn test_rejects_values_leaving_their_directory() {
        let layout = ProjectLayout::default();
        let result = BuildPaths::derive(&layout, "Release", "1.0.0/../../..", HostOs::Unix);
        assert!(matches!(
            result,
            Err(PathError::InvalidSegment { argument: "semVersion", .. })
        ));

        for configuration in ["..", "Release\\..", "a/b"] {
            assert!(matches!(
                BuildPaths::derive(&layout, configuration, "1.2.3", HostOs::Unix),
                Err(PathError::InvalidSegment { argument: "configuration", .. })
            ));
        }

        let layout = ProjectLayout {
            client_project: "../Other".to_string(),
            ..ProjectLayout::default()
        };
        assert!(BuildPaths::derive(&layout, "Release", "1.2.3", HostOs::Unix).is_err());
    }
}
