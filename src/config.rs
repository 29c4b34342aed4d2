// ============================================================================
// File: packages/vessel/src/config.rs
// ----------------------------------------------------------------------------
// Key/value configuration loaded once at startup
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VesselError};

/// Default configuration file name, relative to the base directory
pub const DEFAULT_CONFIG_FILE: &str = "config.txt";

/// Port assigned to containers configured without an explicit port
pub const DEFAULT_PORT: u16 = 8000;

const KEY_CONTAINERS: &str = "containers_folder";
const KEY_BACKUPS: &str = "backups_folder";
const KEY_PORT: &str = "default_port";
const KEY_NETWORK: &str = "network_config_file";
const KEY_PYTHON: &str = "python_interpreter";

/// Process configuration
///
/// Built once and handed to [`crate::ContainerRegistry`] by value. Relative
/// folders resolve against `base_dir`, which is not part of the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one sub-directory per container
    pub containers_folder: String,

    /// Directory holding `{name}_backup.zip` archives
    pub backups_folder: String,

    /// Port used when a network configuration omits one
    pub default_port: u16,

    /// Flat `name:ip:port` registry file
    pub network_config_file: String,

    /// Interpreter used to run `-m venv`; discovered on PATH when unset
    pub python_interpreter: Option<String>,

    /// Keys this version does not understand, written back on save
    pub extra: BTreeMap<String, String>,

    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            containers_folder: "containers".to_string(),
            backups_folder: "backups".to_string(),
            default_port: DEFAULT_PORT,
            network_config_file: "network_config.txt".to_string(),
            python_interpreter: None,
            extra: BTreeMap::new(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Set the directory relative folders resolve against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_python_interpreter(mut self, python: impl Into<String>) -> Self {
        self.python_interpreter = Some(python.into());
        self
    }

    pub fn containers_root(&self) -> PathBuf {
        self.base_dir.join(&self.containers_folder)
    }

    pub fn backups_root(&self) -> PathBuf {
        self.base_dir.join(&self.backups_folder)
    }

    pub fn network_config_path(&self) -> PathBuf {
        self.base_dir.join(&self.network_config_file)
    }

    /// Parse a configuration file
    ///
    /// Parsing is all-or-nothing: one line without `=` or an unparsable
    /// `default_port` rejects the whole file, and the caller falls back to
    /// defaults rather than a partially applied configuration. Blank lines
    /// and `#` comments are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| VesselError::ConfigLoadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        Self::parse(&content).map_err(|detail| VesselError::ConfigLoadFailed {
            path: path.to_path_buf(),
            detail,
        })
    }

    /// Load `path`, falling back to defaults
    ///
    /// A missing file is normal and silent; anything else is logged.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut config = Self::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("line {}: expected key=value, got '{line}'", index + 1))?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                KEY_CONTAINERS => config.containers_folder = value.to_string(),
                KEY_BACKUPS => config.backups_folder = value.to_string(),
                KEY_NETWORK => config.network_config_file = value.to_string(),
                KEY_PORT => {
                    config.default_port = value.parse().map_err(|e| {
                        format!("line {}: invalid default_port '{value}': {e}", index + 1)
                    })?;
                }
                KEY_PYTHON if value.is_empty() => config.python_interpreter = None,
                KEY_PYTHON => config.python_interpreter = Some(value.to_string()),
                _ => {
                    config.extra.insert(key.to_string(), value.to_string());
                }
            }
        }

        Ok(config)
    }

    /// Render the file format, known keys first
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{KEY_CONTAINERS}={}\n", self.containers_folder));
        out.push_str(&format!("{KEY_BACKUPS}={}\n", self.backups_folder));
        out.push_str(&format!("{KEY_PORT}={}\n", self.default_port));
        out.push_str(&format!("{KEY_NETWORK}={}\n", self.network_config_file));
        if let Some(python) = &self.python_interpreter {
            out.push_str(&format!("{KEY_PYTHON}={python}\n"));
        }
        for (key, value) in &self.extra {
            out.push_str(&format!("{key}={value}\n"));
        }
        out
    }

    /// Write every key back to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, self.render())
        };

        write().map_err(|source| {
            error!("Failed to save config to {}: {}", path.display(), source);
            VesselError::ConfigSaveFailed {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(config.containers_folder, "containers");
        assert_eq!(config.backups_folder, "backups");
        assert_eq!(config.default_port, 8000);
        assert_eq!(config.network_config_file, "network_config.txt");
    }

    #[test]
    fn parse_recognized_and_unknown_keys() {
        let config = Config::parse(
            "containers_folder=envs\n\
             # comment\n\
             default_port=9090\n\
             \n\
             theme=dark\n",
        )
        .expect("valid config");

        assert_eq!(config.containers_folder, "envs");
        assert_eq!(config.backups_folder, "backups");
        assert_eq!(config.default_port, 9090);
        assert_eq!(config.extra.get("theme"), Some(&"dark".to_string()));
    }

    #[test]
    fn malformed_line_rejects_whole_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.txt");
        fs::write(&path, "default_port=9090\ngarbage\n").expect("write config");

        let err = Config::load(&path).expect_err("malformed config must fail");
        assert!(matches!(err, VesselError::ConfigLoadFailed { .. }));
        assert!(err.to_string().contains("line 2"));

        // Nothing from the well-formed first line survives
        let config = Config::load_or_default(&path);
        assert_eq!(config.default_port, DEFAULT_PORT);
    }

    #[test]
    fn bad_port_rejects_whole_file() {
        let result = Config::parse("backups_folder=b\ndefault_port=http\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_or_default(&dir.path().join("absent.txt"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.txt");

        let mut config = Config::default().with_python_interpreter("/usr/bin/python3");
        config.default_port = 9100;
        config.extra.insert("theme".to_string(), "dark".to_string());
        config.save(&path).expect("save config");

        let loaded = Config::load(&path).expect("load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn paths_resolve_against_base_dir() {
        let config = Config::default().with_base_dir("/srv/vessel");
        assert_eq!(config.containers_root(), PathBuf::from("/srv/vessel/containers"));
        assert_eq!(config.backups_root(), PathBuf::from("/srv/vessel/backups"));
        assert_eq!(
            config.network_config_path(),
            PathBuf::from("/srv/vessel/network_config.txt")
        );
    }
}
