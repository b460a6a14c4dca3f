pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildTargetArgs, CliArgs, Commands};
pub use output::{OutputFormat, OutputFormatter};
