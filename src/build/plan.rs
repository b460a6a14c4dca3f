use super::packages::BuildPackages;
use super::parameters::BuildParameters;
use super::paths::{BuildPaths, PathError, ProjectLayout};
use super::version::BuildVersion;
use crate::ci::HostOs;
use serde::Serialize;
use tracing::info;

/// Fully initialized build: parameters plus everything derived from them
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub parameters: BuildParameters,
    pub should_publish: bool,
    pub should_publish_to_myget: bool,
    pub version: BuildVersion,
    pub paths: BuildPaths,
    pub packages: BuildPackages,
}

impl BuildPlan {
    pub fn initialize(
        parameters: BuildParameters,
        version: BuildVersion,
        layout: &ProjectLayout,
        host: HostOs,
    ) -> Result<Self, PathError> {
        let paths = BuildPaths::derive(layout, &parameters.configuration, &version.sem_version, host)?;

        let packages = BuildPackages::get_packages(
            &paths.directories.nuget_root,
            &version.sem_version,
            std::slice::from_ref(&layout.client_project),
        );

        info!(
            build_target = %parameters.target,
            sem_version = %version.sem_version,
            "Build plan initialized"
        );

        Ok(Self {
            should_publish: parameters.should_publish(),
            should_publish_to_myget: parameters.should_publish_to_myget(),
            parameters,
            version,
            paths,
            packages,
        })
    }
}
