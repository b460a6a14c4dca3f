//! Command handlers
//!
//! Each handler returns the process exit code; errors are reported on stderr.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::commands::{
    BuildTargetArgs, CleanArgs, ConfigArgs, PatchVersionArgs, PathsArgs, PlanArgs, ProbeArgs,
};
use super::output::OutputFormatter;
use crate::build::{
    patch_project_json, BuildParameters, BuildPaths, BuildPlan, BuildVersion, GitVersionCli,
};
use crate::ci::{BuildArgs, BuildContext};
use crate::config::BlueprintConfig;
use crate::probe::HttpProbe;

fn report(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn build_context(build: &BuildTargetArgs, root: &Path) -> BuildContext {
    BuildContext::from_process(
        BuildArgs::new(build.target.clone(), build.configuration.clone()),
        root.to_path_buf(),
    )
}

/// Explicit semantic version when given, GitVersion otherwise
fn resolve_version(
    params: &BuildParameters,
    ctx: &BuildContext,
    config: &BlueprintConfig,
    sem_version: Option<&str>,
) -> Result<BuildVersion> {
    if let Some(sem_version) = sem_version {
        return BuildVersion::from_sem_version(sem_version)
            .with_context(|| format!("Invalid --sem-version '{}'", sem_version));
    }

    let tool = GitVersionCli::new(&config.gitversion, &ctx.root);
    BuildVersion::calculate(params, &ctx.env, &tool)
        .context("Failed to calculate version (pass --sem-version to set it explicitly)")
}

fn resolve_plan(
    build: &BuildTargetArgs,
    root: &Path,
    config: &BlueprintConfig,
    sem_version: Option<&str>,
) -> Result<BuildPlan> {
    let ctx = build_context(build, root);
    let params = BuildParameters::resolve(&ctx);
    let version = resolve_version(&params, &ctx, config, sem_version)?;

    BuildPlan::initialize(params, version, &config.layout, ctx.host)
        .context("Failed to derive build paths")
}

pub fn handle_plan(args: &PlanArgs, build: &BuildTargetArgs, root: &Path) -> i32 {
    report(run_plan(args, build, root))
}

fn run_plan(args: &PlanArgs, build: &BuildTargetArgs, root: &Path) -> Result<i32> {
    let config = BlueprintConfig::load(root)?;
    let plan = resolve_plan(build, root, &config, args.sem_version.as_deref())?;
    let output = OutputFormatter::new(args.format.into()).format_plan(&plan)?;
    println!("{}", output);
    Ok(0)
}

pub fn handle_paths(args: &PathsArgs, build: &BuildTargetArgs, root: &Path) -> i32 {
    report(run_paths(args, build, root))
}

fn run_paths(args: &PathsArgs, build: &BuildTargetArgs, root: &Path) -> Result<i32> {
    let config = BlueprintConfig::load(root)?;
    let ctx = build_context(build, root);
    let paths = BuildPaths::derive(
        &config.layout,
        &ctx.args.configuration,
        &args.sem_version,
        ctx.host,
    )?;
    let output = OutputFormatter::new(args.format.into()).format_paths(&paths)?;
    println!("{}", output);
    Ok(0)
}

pub fn handle_patch_version(args: &PatchVersionArgs) -> i32 {
    report(run_patch_version(args))
}

fn run_patch_version(args: &PatchVersionArgs) -> Result<i32> {
    if patch_project_json(&args.file, &args.version)? {
        println!("Patched {} to version {}", args.file.display(), args.version);
        Ok(0)
    } else {
        eprintln!("No version field found in {}", args.file.display());
        Ok(1)
    }
}

pub fn handle_clean(args: &CleanArgs, build: &BuildTargetArgs, root: &Path) -> i32 {
    report(run_clean(args, build, root))
}

fn run_clean(args: &CleanArgs, build: &BuildTargetArgs, root: &Path) -> Result<i32> {
    let config = BlueprintConfig::load(root)?;
    let plan = resolve_plan(build, root, &config, args.sem_version.as_deref())?;

    // Parents come first in the list, so later entries are usually already gone.
    for dir in &plan.paths.directories.to_clean {
        let dir = root.join(dir);
        if args.dry_run {
            println!("Would remove {}", dir.display());
            continue;
        }
        if dir.is_dir() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
            info!(dir = %dir.display(), "Removed directory");
        }
    }
    Ok(0)
}

pub async fn handle_probe(args: &ProbeArgs, root: &Path) -> i32 {
    report(run_probe(args, root).await)
}

async fn run_probe(args: &ProbeArgs, root: &Path) -> Result<i32> {
    let config = BlueprintConfig::load(root)?;
    let url = args.url.as_deref().unwrap_or(&config.probe_url);
    let needle = args.needle.as_deref().unwrap_or(&config.probe_needle);

    let probe = HttpProbe::new(url, needle, config.request_timeout())?;
    let message = probe.probe().await?;
    println!("{}", message);
    Ok(0)
}

pub fn handle_config(args: &ConfigArgs, root: &Path) -> i32 {
    report(run_config(args, root))
}

fn run_config(args: &ConfigArgs, root: &Path) -> Result<i32> {
    let config = BlueprintConfig::load(root)?;
    let output = OutputFormatter::new(args.format.into()).format_config(&config)?;
    println!("{}", output);
    Ok(0)
}
