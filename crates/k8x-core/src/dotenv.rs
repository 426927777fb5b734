//! Environment file loading.
//!
//! `K8X_ENV=production` selects `.env.production`; unset selects `.env`.
//! Only `K8X_`-prefixed keys are exported, with the prefix removed, so charts
//! see `K8X_IMAGE_TAG=1.2` as `IMAGE_TAG=1.2`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Prefix a key must carry to be exported.
pub const KEY_PREFIX: &str = "K8X_";

/// Returns the env file name for a `K8X_ENV` value.
pub fn env_file_name(env: Option<&str>) -> String {
    match env {
        Some(name) if !name.is_empty() => format!(".env.{name}"),
        _ => ".env".to_string(),
    }
}

/// Parses env file contents into `(key, value)` pairs to export.
///
/// Lines that do not split into exactly one key and one value on `=` are
/// skipped, as are keys without the `K8X_` prefix. Double quotes are
/// stripped from values.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .trim()
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('=');
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return None;
            };
            let key = key.strip_prefix(KEY_PREFIX)?;
            Some((key.to_string(), value.replace('"', "")))
        })
        .collect()
}

/// Loads the env file selected by `K8X_ENV` from the current directory.
pub fn load() -> Result<()> {
    let cwd = std::env::current_dir().context("can't determine current working directory")?;
    let env = std::env::var("K8X_ENV").ok();
    load_from(&cwd, env.as_deref())
}

/// Loads the env file selected by `env` from `dir` into the process
/// environment. A missing file only produces a warning.
pub fn load_from(dir: &Path, env: Option<&str>) -> Result<()> {
    let name = env_file_name(env);
    let path = dir.join(&name);

    if !path.exists() {
        tracing::warn!("Couldn't find {name}");
        return Ok(());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("can't read dot env file: {name}"))?;

    for (key, value) in parse(&contents) {
        tracing::debug!(key = %key, "exporting env var from {name}");
        // SAFETY: called once from `main` before any threads are spawned.
        unsafe {
            std::env::set_var(&key, &value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_env_file_name() {
        assert_eq!(env_file_name(None), ".env");
        assert_eq!(env_file_name(Some("")), ".env");
        assert_eq!(env_file_name(Some("production")), ".env.production");
    }

    #[test]
    fn test_parse_strips_prefix_and_quotes() {
        let pairs = parse("K8X_IMAGE=\"nginx\"\nK8X_REPLICAS=3\n");
        assert_eq!(
            pairs,
            vec![
                ("IMAGE".to_string(), "nginx".to_string()),
                ("REPLICAS".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_skips_unprefixed_and_malformed_lines() {
        let pairs = parse(
            "# comment\n\nPATH=/usr/bin\njust a sentence\nK8X_URL=a=b\nK8X_OK=yes\r\n",
        );
        assert_eq!(pairs, vec![("OK".to_string(), "yes".to_string())]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_load_from_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        assert!(load_from(dir.path(), Some("nope")).is_ok());
    }

    #[test]
    fn test_load_from_exports_variables() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".env.dotenvtest"),
            "K8X_DOTENV_TEST_VALUE=\"loaded\"\n",
        )
        .unwrap();

        load_from(dir.path(), Some("dotenvtest")).unwrap();
        assert_eq!(std::env::var("DOTENV_TEST_VALUE").unwrap(), "loaded");
    }
}
