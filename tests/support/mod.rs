use std::path::{Path, PathBuf};
use std::process::{Command, Output};

#[allow(dead_code)]
pub fn get_blueprint_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.join("blueprint")
}

/// Runs the binary with only the given environment variables set
#[allow(dead_code)]
pub fn run_blueprint(root: &Path, env: &[(&str, &str)], args: &[&str]) -> Output {
    let mut cmd = Command::new(get_blueprint_binary());
    cmd.env_clear()
        .env("BLUEPRINT_LOG_LEVEL", "error")
        .arg("--root")
        .arg(root)
        .args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute blueprint")
}
