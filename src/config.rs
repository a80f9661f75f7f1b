use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::SqliteStorage;
use crate::dogs::DEFAULT_API_URL;
use crate::model::DEFAULT_STALE_MINUTES;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
  /// Base URL of the dog.ceo API
  pub api_url: String,
  /// SQLite database path (defaults to $XDG_DATA_HOME/breedcache/breeds.db)
  pub database: Option<PathBuf>,
  /// Minutes before the cached breed list is refreshed
  pub stale_minutes: i64,
  /// Breed to select when present in the list
  pub default_breed: Option<String>,
  /// Write logs to daily files in this directory instead of stderr
  pub log_dir: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_string(),
      database: None,
      stale_minutes: DEFAULT_STALE_MINUTES,
      default_breed: None,
      log_dir: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./breedcache.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/breedcache/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("breedcache.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("breedcache").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    if config.stale_minutes <= 0 {
      return Err(eyre!(
        "stale_minutes must be positive, got {}",
        config.stale_minutes
      ));
    }

    Ok(config)
  }

  /// Resolved database path.
  pub fn database_path(&self) -> Result<PathBuf> {
    match &self.database {
      Some(path) => Ok(path.clone()),
      None => SqliteStorage::default_path(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.stale_minutes, 60);
    assert_eq!(config.api_url, "https://dog.ceo/api");
  }

  #[test]
  fn test_parse_all_fields() {
    let yaml = r#"
api_url: http://localhost:8080/api
database: /tmp/breeds.db
stale_minutes: 15
default_breed: beagle
log_dir: /tmp/logs
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.api_url, "http://localhost:8080/api");
    assert_eq!(config.database, Some(PathBuf::from("/tmp/breeds.db")));
    assert_eq!(config.stale_minutes, 15);
    assert_eq!(config.default_breed.as_deref(), Some("beagle"));
    assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    assert_eq!(
      config.database_path().unwrap(),
      PathBuf::from("/tmp/breeds.db")
    );
  }

  #[test]
  fn test_rejects_non_positive_stale_minutes() {
    assert!(Config::parse("stale_minutes: 0").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here.yaml")));
    assert!(result.is_err());
  }
}
