//! Output formatting for multiple formats
//!
//! Plans and path layouts can be printed as JSON, YAML, or human-readable text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::build::{BuildPaths, BuildPlan};
use crate::config::BlueprintConfig;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_plan(&self, plan: &BuildPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(plan, "build plan"),
            OutputFormat::Yaml => to_yaml(plan, "build plan"),
            OutputFormat::Human => Ok(self.format_plan_human(plan)),
        }
    }

    pub fn format_paths(&self, paths: &BuildPaths) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(paths, "build paths"),
            OutputFormat::Yaml => to_yaml(paths, "build paths"),
            OutputFormat::Human => {
                let mut out = String::new();
                write_paths(&mut out, paths);
                Ok(out)
            }
        }
    }

    pub fn format_config(&self, config: &BlueprintConfig) -> Result<String> {
        // Sorted so repeated runs print identically
        let map: BTreeMap<_, _> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => to_json(&map, "config"),
            OutputFormat::Yaml => to_yaml(&map, "config"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_plan_human(&self, plan: &BuildPlan) -> String {
        let p = &plan.parameters;
        let mut out = String::new();

        let _ = writeln!(out, "Build Plan");
        let _ = writeln!(out, "==========");
        let _ = writeln!(out, "Target:          {}", p.target);
        let _ = writeln!(out, "Configuration:   {}", p.configuration);
        let _ = writeln!(out, "Version:         {}", plan.version.version);
        let _ = writeln!(out, "SemVersion:      {}", plan.version.sem_version);
        let _ = writeln!(out, "Milestone:       {}", plan.version.milestone);
        if plan.version.is_prerelease() {
            let _ = writeln!(out, "Prerelease:      {}", plan.version.prerelease);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Flags:");
        let flags = [
            ("local build", p.is_local_build),
            ("running on Windows", p.is_running_on_windows),
            ("running on AppVeyor", p.is_running_on_appveyor),
            ("pull request", p.is_pull_request),
            ("main branch", p.is_main_branch),
            ("tagged", p.is_tagged),
            ("publish build", p.is_publish_build),
            ("release build", p.is_release_build),
            ("skip GitVersion", p.skip_gitversion),
            ("skip OpenCover", p.skip_opencover),
            ("should publish", plan.should_publish),
            ("should publish to MyGet", plan.should_publish_to_myget),
        ];
        for (name, value) in flags {
            let _ = writeln!(out, "  {:<26}{}", name, if value { "yes" } else { "no" });
        }

        if let Some(notes) = &p.release_notes {
            let _ = writeln!(out);
            let _ = writeln!(out, "Release Notes ({}):", notes.version);
            for note in &notes.notes {
                let _ = writeln!(out, "  * {}", note);
            }
        }

        let _ = writeln!(out);
        write_paths(&mut out, &plan.paths);

        let _ = writeln!(out);
        let _ = writeln!(out, "Packages:");
        for package in plan.packages.all() {
            let _ = writeln!(out, "  {} -> {}", package.id, package.package_path.display());
        }

        out
    }
}

fn write_paths(out: &mut String, paths: &BuildPaths) {
    let d = &paths.directories;
    let f = &paths.files;

    let _ = writeln!(out, "Directories:");
    let _ = writeln!(out, "  artifacts:     {}", d.artifacts.display());
    let _ = writeln!(out, "  test results:  {}", d.test_results.display());
    let _ = writeln!(out, "  nuget:         {}", d.nuget_root.display());
    let _ = writeln!(out, "  bin:           {}", d.artifacts_bin.display());
    let _ = writeln!(out);

    write_list(out, "Client Assemblies", &f.client_assembly_paths);
    write_list(out, "Testing Assemblies", &f.testing_assembly_paths);
    write_list(out, "Artifact Sources", &f.artifacts_source_paths);

    let _ = writeln!(out, "Coverage: {}", f.test_coverage_output_file_path.display());
    let _ = writeln!(out, "Archives:");
    for archive in &f.zip_archives {
        let _ = writeln!(out, "  {:<16}{}", archive.framework.moniker(), archive.path.display());
    }
}

fn write_list(out: &mut String, title: &str, items: &[PathBuf]) {
    let _ = writeln!(out, "{}:", title);
    for item in items {
        let _ = writeln!(out, "  {}", item.display());
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}
