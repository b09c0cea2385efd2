//! User settings from `config.toml`, overridable through the environment.
//!
//! ```toml
//! user = "alice"
//! database = "~/finance/expensetui.db"
//! log_level = "debug"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const ENV_USER: &str = "EXPENSETUI_USER";
pub(crate) const ENV_DB: &str = "EXPENSETUI_DB";
pub(crate) const ENV_LOG: &str = "EXPENSETUI_LOG";

pub(crate) const DEFAULT_USER: &str = "default";
pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Owner whose records are shown when `--user` is not given.
    pub(crate) user: String,
    /// Database file; the platform data directory is used when unset.
    pub(crate) database: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `expensetui=debug`.
    pub(crate) log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.into(),
            database: None,
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if config.user.trim().is_empty() {
            config.user = DEFAULT_USER.into();
        }
        Ok(config)
    }

    /// Apply `EXPENSETUI_*` overrides. Empty values are ignored.
    pub(crate) fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(user) = get(ENV_USER) {
            self.user = user.trim().to_string();
        }
        if let Some(db) = get(ENV_DB) {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(level) = get(ENV_LOG) {
            self.log_level = level;
        }
        self
    }

    /// Database path, with `~/` expanded, or `default` when none is configured.
    pub(crate) fn database_path(&self, default: PathBuf) -> PathBuf {
        match &self.database {
            Some(p) => PathBuf::from(crate::export::shellexpand(&p.to_string_lossy())),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.user, "default");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "user = \"alice\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.database, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_all_fields() {
        let config = Config::parse(
            "user = \"bob\"\ndatabase = \"/tmp/money.db\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.user, "bob");
        assert_eq!(config.database, Some(PathBuf::from("/tmp/money.db")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_blank_user_falls_back() {
        let config = Config::parse("user = \"  \"").unwrap();
        assert_eq!(config.user, DEFAULT_USER);
    }

    #[test]
    fn test_unknown_key_is_error() {
        assert!(Config::parse("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "user = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_USER, " carol "),
            (ENV_DB, "/data/x.db"),
            (ENV_LOG, ""),
        ]
        .into_iter()
        .collect();
        let config = Config::default().apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.user, "carol");
        assert_eq!(config.database, Some(PathBuf::from("/data/x.db")));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_database_path() {
        let default = PathBuf::from("/var/lib/expensetui.db");
        assert_eq!(Config::default().database_path(default.clone()), default);

        let config = Config {
            database: Some(PathBuf::from("/tmp/other.db")),
            ..Config::default()
        };
        assert_eq!(config.database_path(default), PathBuf::from("/tmp/other.db"));
    }
}
