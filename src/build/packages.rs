use serde::Serialize;
use std::path::{Path, PathBuf};

/// NuGet package produced by the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPackage {
    pub id: String,
    pub package_path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildPackages {
    pub nuget: Vec<BuildPackage>,
}

impl BuildPackages {
    /// One `<id>.<semVersion>.nupkg` per package id under the NuGet root
    pub fn get_packages(nuget_root: &Path, sem_version: &str, package_ids: &[String]) -> Self {
        let nuget = package_ids
            .iter()
            .map(|id| BuildPackage {
                id: id.clone(),
                package_path: nuget_root.join(format!("{}.{}.nupkg", id, sem_version)),
            })
            .collect();

        Self { nuget }
    }

    pub fn all(&self) -> impl Iterator<Item = &BuildPackage> {
        self.nuget.iter()
    }
}
