use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build parameter, version and artifact layout resolution
#[derive(Parser, Debug)]
#[command(
    name = "blueprint",
    about = "Build parameter, version and artifact layout resolution",
    version,
    author,
    long_about = "blueprint resolves the build plan of the SharpBlueprint client library from \
                  command-line arguments and the CI environment: publish/release flags, the \
                  GitVersion semantic version, artifact paths and NuGet packages."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub build: BuildTargetArgs,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        default_value = ".",
        help = "Repository root"
    )]
    pub root: PathBuf,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BuildTargetArgs {
    #[arg(
        short = 't',
        long,
        global = true,
        value_name = "TARGET",
        help = "Build target (default: Default)"
    )]
    pub target: Option<String>,

    #[arg(
        short = 'c',
        long,
        global = true,
        value_name = "CONFIGURATION",
        help = "Build configuration (default: Release)"
    )]
    pub configuration: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Resolve and print the full build plan",
        long_about = "Resolves build parameters from the CI environment, calculates the version \
                      with GitVersion and derives artifact paths and packages.\n\n\
                      Examples:\n  \
                      blueprint plan\n  \
                      blueprint --target Publish plan --format json\n  \
                      blueprint plan --sem-version 1.2.3-beta0004"
    )]
    Plan(PlanArgs),

    #[command(about = "Print the artifact layout for a semantic version")]
    Paths(PathsArgs),

    #[command(about = "Rewrite the version field of a project.json file")]
    PatchVersion(PatchVersionArgs),

    #[command(about = "Delete the artifact directories")]
    Clean(CleanArgs),

    #[command(about = "Fetch the probe page and count marker occurrences")]
    Probe(ProbeArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "SEMVER",
        help = "Use this semantic version instead of running GitVersion"
    )]
    pub sem_version: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PathsArgs {
    #[arg(long, value_name = "SEMVER", help = "Semantic version of the artifacts")]
    pub sem_version: String,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct PatchVersionArgs {
    #[arg(value_name = "FILE", help = "Path to project.json")]
    pub file: PathBuf,

    #[arg(value_name = "VERSION", help = "Version to write")]
    pub version: String,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(
        long,
        value_name = "SEMVER",
        help = "Semantic version whose artifacts to remove (default: calculated)"
    )]
    pub sem_version: Option<String>,

    #[arg(long, help = "List directories without deleting them")]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    #[arg(long, value_name = "URL", help = "Page to fetch (default from configuration)")]
    pub url: Option<String>,

    #[arg(long, value_name = "TEXT", help = "String to count (default from configuration)")]
    pub needle: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
