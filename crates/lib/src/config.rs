//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.cxhook/config.json`) and environment.
//! Only the operator tooling reads it; the request/response model has no configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How responses and decoded requests are printed.
    #[serde(default)]
    pub output: OutputConfig,

    /// Where recorded batches are split into fixtures.
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    /// Pretty-print JSON. Overridden by CXHOOK_PRETTY env.
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturesConfig {
    /// Output directory for split fixtures. Relative paths are resolved against the config file's parent.
    /// Omit to use the `fixtures` subdirectory next to the config file.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// File name prefix (default "request" → `request-001.json`).
    #[serde(default = "default_fixture_prefix")]
    pub prefix: String,
}

fn default_fixture_prefix() -> String {
    "request".to_string()
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: default_fixture_prefix(),
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("CXHOOK_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".cxhook").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Resolve pretty output: env CXHOOK_PRETTY ("1"/"true"/"0"/"false") overrides config.
pub fn resolve_pretty(config: &Config) -> bool {
    std::env::var("CXHOOK_PRETTY")
        .ok()
        .and_then(|s| parse_flag(&s))
        .unwrap_or(config.output.pretty)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Load config from the given path, or the default path (or CXHOOK_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used (for resolving relative directories).
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = match std::fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("config file not found, using defaults: {}", path.display());
            Config::default()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading config from {}", path.display()))
        }
    };
    Ok((config, path))
}

/// Directory holding the config file; relative config paths resolve against ".".
pub fn config_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Resolve the fixtures directory: `config.fixtures.directory` if set (relative paths resolved against
/// the config directory), otherwise `fixtures` inside the config directory.
pub fn resolve_fixtures_dir(config: &Config, config_path: &Path) -> PathBuf {
    let base = config_dir(config_path);
    match config.fixtures.directory.as_deref() {
        Some(d) if d.is_absolute() => d.to_path_buf(),
        Some(d) if !d.as_os_str().is_empty() => base.join(d),
        _ => base.join("fixtures"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert!(!c.output.pretty);
        assert_eq!(c.fixtures.prefix, "request");
        assert!(c.fixtures.directory.is_none());
    }

    #[test]
    fn empty_object_parses_to_defaults() {
        let c: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(c.fixtures.prefix, "request");
    }

    #[test]
    fn camel_case_fields() {
        let c: Config = serde_json::from_str(
            r#"{"output": {"pretty": true}, "fixtures": {"directory": "rec", "prefix": "call"}}"#,
        )
        .unwrap();
        assert!(c.output.pretty);
        assert_eq!(c.fixtures.prefix, "call");
        assert_eq!(c.fixtures.directory, Some(PathBuf::from("rec")));
    }

    #[test]
    fn config_dir_of_bare_file_name_is_cwd() {
        assert_eq!(config_dir(Path::new("config.json")), Path::new("."));
        assert_eq!(
            config_dir(Path::new("/etc/cxhook/config.json")),
            Path::new("/etc/cxhook")
        );
    }

    #[test]
    fn resolve_fixtures_dir_relative_to_bare_config() {
        let config = Config::default();
        assert_eq!(
            resolve_fixtures_dir(&config, Path::new("config.json")),
            PathBuf::from("./fixtures")
        );
    }

    #[test]
    fn resolve_fixtures_dir_default() {
        let config = Config::default();
        let path = Path::new("/home/user/.cxhook/config.json");
        assert_eq!(
            resolve_fixtures_dir(&config, path),
            PathBuf::from("/home/user/.cxhook/fixtures")
        );
    }

    #[test]
    fn resolve_fixtures_dir_override_relative() {
        let mut config = Config::default();
        config.fixtures.directory = Some(PathBuf::from("recorded/calls"));
        let path = Path::new("/home/user/.cxhook/config.json");
        assert_eq!(
            resolve_fixtures_dir(&config, path),
            PathBuf::from("/home/user/.cxhook/recorded/calls")
        );
    }

    #[test]
    fn resolve_fixtures_dir_override_absolute() {
        let mut config = Config::default();
        config.fixtures.directory = Some(PathBuf::from("/srv/fixtures"));
        let path = Path::new("/home/user/.cxhook/config.json");
        assert_eq!(
            resolve_fixtures_dir(&config, path),
            PathBuf::from("/srv/fixtures")
        );
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let path = std::env::temp_dir()
            .join(format!("cxhook-missing-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.fixtures.prefix, "request");
    }

    #[test]
    fn load_invalid_file_reports_path() {
        let dir = std::env::temp_dir().join(format!("cxhook-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, b"{\"output\": {\"pretty\": \"yes\"}}").unwrap();
        let err = load_config(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).starts_with("parsing config from"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
