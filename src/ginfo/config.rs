use crate::directory::{DEFAULT_BIND, DEFAULT_TIMEOUT_SECS};
use crate::error::{GinfoError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "GINFO_CONFIG_DIR";

/// Defaults for ginfo, stored in `config.json`.
///
/// Command-line flags and environment variables take precedence over these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GinfoConfig {
    /// Information system to query (`host` or `host:port`)
    #[serde(default)]
    pub host: Option<String>,

    /// Base DN of the search
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// LDIF snapshot to read instead of a live server
    #[serde(default)]
    pub ldif: Option<PathBuf>,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GinfoConfig {
    fn default() -> Self {
        Self {
            host: None,
            bind: default_bind(),
            timeout: default_timeout(),
            ldif: None,
        }
    }
}

impl GinfoConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(GinfoError::Io)?;
        let config: GinfoConfig = serde_json::from_str(&content).map_err(|e| {
            GinfoError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        if config.timeout == 0 {
            return Err(GinfoError::Config(format!(
                "{}: timeout must be at least 1 second",
                config_path.display()
            )));
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(GinfoError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(GinfoError::Serialization)?;
        fs::write(config_path, content).map_err(GinfoError::Io)?;
        Ok(())
    }
}

/// Directory holding `config.json`: `$GINFO_CONFIG_DIR`, else the platform config dir.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("org", "egi", "ginfo").map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GinfoConfig::default();
        assert_eq!(config.bind, "o=glue");
        assert_eq!(config.timeout, 15);
        assert!(config.host.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = GinfoConfig::load(temp_dir.path().join("nowhere")).unwrap();
        assert_eq!(config, GinfoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = GinfoConfig {
            host: Some("bdii.example.org".into()),
            timeout: 30,
            ..GinfoConfig::default()
        };
        config.save(temp_dir.path().join("nested")).unwrap();

        let loaded = GinfoConfig::load(temp_dir.path().join("nested")).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"ldif": "/var/cache/bdii.ldif"}"#,
        )
        .unwrap();

        let config = GinfoConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.ldif, Some(PathBuf::from("/var/cache/bdii.ldif")));
        assert_eq!(config.bind, "o=glue");
        assert_eq!(config.timeout, 15);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), r#"{"timeout": 0}"#).unwrap();
        assert!(matches!(
            GinfoConfig::load(temp_dir.path()),
            Err(GinfoError::Config(_))
        ));

        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{not json").unwrap();
        assert!(matches!(
            GinfoConfig::load(temp_dir.path()),
            Err(GinfoError::Config(_))
        ));
    }
}
