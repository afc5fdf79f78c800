//! Configuration loader for voxskill.
//!
//! Layers, later wins:
//! 1. `voxskill.toml` (optional; missing file means defaults)
//! 2. `.env` (optional; never written into the process environment)
//! 3. the process environment
//!
//! Recognized variables: `VOXSKILL_PERSISTENCE_URL`, `VOXSKILL_LANGUAGES_DIR`,
//! `VOXSKILL_DEFAULT_LOCALE`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxskill_core::config::ConfigLoader;
use voxskill_types::config::SkillConfig;
use voxskill_types::error::ConfigError;

pub const ENV_PERSISTENCE_URL: &str = "VOXSKILL_PERSISTENCE_URL";
pub const ENV_LANGUAGES_DIR: &str = "VOXSKILL_LANGUAGES_DIR";
pub const ENV_DEFAULT_LOCALE: &str = "VOXSKILL_DEFAULT_LOCALE";

pub const DEFAULT_DOTENV_FILE: &str = ".env";
pub const DEFAULT_CONFIG_FILE: &str = "voxskill.toml";

/// Looks up one environment variable.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Loads [`SkillConfig`] from TOML, `.env` and the environment.
#[derive(Clone)]
pub struct EnvConfigLoader {
    dotenv_path: PathBuf,
    toml_path: PathBuf,
    env: EnvLookup,
    require_persistence: bool,
}

impl Default for EnvConfigLoader {
    fn default() -> Self {
        Self {
            dotenv_path: PathBuf::from(DEFAULT_DOTENV_FILE),
            toml_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            env: Arc::new(process_env),
            require_persistence: true,
        }
    }
}

impl EnvConfigLoader {
    /// Reads `.env` and `voxskill.toml` from the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dotenv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = path.into();
        self
    }

    pub fn with_toml_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.toml_path = path.into();
        self
    }

    /// Replace the process environment lookup.
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(env);
        self
    }

    /// When false, an absent `persistence_url` is accepted (in-memory runs).
    pub fn require_persistence(mut self, required: bool) -> Self {
        self.require_persistence = required;
        self
    }

    fn read_toml(&self) -> Result<SkillConfig, ConfigError> {
        let path = self.toml_path.display().to_string();
        let content = match std::fs::read_to_string(&self.toml_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path, "no config file, using defaults");
                return Ok(SkillConfig::default());
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path,
                    message: err.to_string(),
                });
            }
        };

        toml::from_str(&content).map_err(|err| ConfigError::Parse {
            path,
            message: err.to_string(),
        })
    }

    fn read_dotenv(&self) -> Result<HashMap<String, String>, ConfigError> {
        read_dotenv(&self.dotenv_path)
    }

    fn lookup(&self, dotenv: &HashMap<String, String>, key: &str) -> Option<String> {
        (self.env)(key)
            .or_else(|| dotenv.get(key).cloned())
            .filter(|value| !value.trim().is_empty())
    }
}

fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => return Ok(HashMap::new()),
        Err(err) => return Err(ConfigError::Dotenv(err.to_string())),
    };

    iter.map(|item| item.map_err(|err| ConfigError::Dotenv(err.to_string())))
        .collect()
}

impl ConfigLoader for EnvConfigLoader {
    fn load(&self) -> Result<SkillConfig, ConfigError> {
        let mut config = self.read_toml()?;
        let dotenv = self.read_dotenv()?;

        if let Some(url) = self.lookup(&dotenv, ENV_PERSISTENCE_URL) {
            config.persistence_url = url;
        }
        if let Some(dir) = self.lookup(&dotenv, ENV_LANGUAGES_DIR) {
            config.languages_dir = PathBuf::from(dir);
        }
        if let Some(locale) = self.lookup(&dotenv, ENV_DEFAULT_LOCALE) {
            config.default_locale = locale;
        }

        if self.require_persistence && !config.has_persistence() {
            return Err(ConfigError::Missing("persistence_url".to_string()));
        }
        Ok(config)
    }
}

impl std::fmt::Debug for EnvConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfigLoader")
            .field("dotenv_path", &self.dotenv_path)
            .field("toml_path", &self.toml_path)
            .field("require_persistence", &self.require_persistence)
            .finish()
    }
}
