//! In-place version patching for `project.json`
//!
//! The file is edited by splicing text, not by a JSON round trip, so formatting and
//! comments survive. The first `"version"` key (case-insensitive) is replaced up to the
//! next comma.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const VERSION_KEY: &str = "\"version\"";

/// Returns the patched text, or `None` when there is no `"version"` key followed by a comma
pub fn patch_version_text(content: &str, version: &str) -> Option<String> {
    let start = content.to_ascii_lowercase().find(VERSION_KEY)?;
    let end = start + content[start..].find(',')?;

    let mut patched = String::with_capacity(content.len() + version.len());
    patched.push_str(&content[..start]);
    patched.push_str(&format!("\"version\": \"{}\"", version));
    patched.push_str(&content[end..]);
    Some(patched)
}

/// Rewrites the version of a project file on disk.
///
/// Returns `Ok(false)` and leaves the file untouched when the version field is absent.
pub fn patch_project_json(project: &Path, version: &str) -> Result<bool> {
    let content = fs::read_to_string(project)
        .with_context(|| format!("Failed to read project file {}", project.display()))?;

    let Some(patched) = patch_version_text(&content, version) else {
        warn!(project = %project.display(), "No version field found, project file left unchanged");
        return Ok(false);
    };

    fs::write(project, patched)
        .with_context(|| format!("Failed to write project file {}", project.display()))?;

    info!(project = %project.display(), version, "Patched project version");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT_JSON: &str = r#"{
  "version": "0.0.0",
  "dependencies": {
    "Newtonsoft.Json": "9.0.1"
  }
}"#;

    #[test]
    fn test_patch_text() {
        let patched = patch_version_text(PROJECT_JSON, "1.2.3").unwrap();
        assert!(patched.contains(r#""version": "1.2.3","#));
        assert!(!patched.contains("0.0.0"));
        assert!(patched.contains(r#""Newtonsoft.Json": "9.0.1""#));
    }

    #[test]
    fn test_patch_text_is_case_insensitive() {
        let patched = patch_version_text(r#"{ "Version": "0.0.0", "x": 1 }"#, "2.0.0").unwrap();
        assert_eq!(patched, r#"{ "version": "2.0.0", "x": 1 }"#);
    }

    #[test]
    fn test_patch_text_without_key() {
        assert_eq!(patch_version_text(r#"{ "name": "x", "y": 1 }"#, "1.2.3"), None);
    }

    #[test]
    fn test_patch_text_without_trailing_comma() {
        assert_eq!(patch_version_text(r#"{ "version": "0.0.0" }"#, "1.2.3"), None);
    }

    #[test]
    fn test_patch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        fs::write(&path, PROJECT_JSON).unwrap();

        assert!(patch_project_json(&path, "1.2.3").unwrap());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""version": "1.2.3""#));
    }

    #[test]
    fn test_patch_file_without_key_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        let original = r#"{ "name": "SharpBlueprint.Client", "title": "x" }"#;
        fs::write(&path, original).unwrap();

        assert!(!patch_project_json(&path, "1.2.3").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_patch_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(patch_project_json(&dir.path().join("missing.json"), "1.0.0").is_err());
    }
}
