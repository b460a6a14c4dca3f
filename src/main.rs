use blueprint::cli::commands::{CliArgs, Commands};
use blueprint::cli::handlers::{
    handle_clean, handle_config, handle_paths, handle_patch_version, handle_plan, handle_probe,
};
use blueprint::util::logging::{
    init_from_env, init_logging, json_from_env, parse_level, LoggingConfig,
};
use blueprint::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("blueprint v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let root = args.root.as_path();
    let exit_code = match &args.command {
        Commands::Plan(plan_args) => handle_plan(plan_args, &args.build, root),
        Commands::Paths(paths_args) => handle_paths(paths_args, &args.build, root),
        Commands::PatchVersion(patch_args) => handle_patch_version(patch_args),
        Commands::Clean(clean_args) => handle_clean(clean_args, &args.build, root),
        Commands::Probe(probe_args) => handle_probe(probe_args, root).await,
        Commands::Config(config_args) => handle_config(config_args, root),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        init_from_env();
        return;
    };

    init_logging(LoggingConfig {
        use_json: json_from_env(),
        ..LoggingConfig::with_level(level)
    });
}
