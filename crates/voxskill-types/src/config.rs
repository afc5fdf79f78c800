//! Skill configuration.
//!
//! `SkillConfig` is assembled from an optional `voxskill.toml`, a `.env`
//! file and the process environment. All fields except the persistence
//! location have defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory holding `<locale>.json` prompt files, relative to the working directory.
pub const DEFAULT_LANGUAGES_DIR: &str = "languages";

/// Locale used when a request carries none.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Location of the durable per-user attribute store (a SQLite URL).
    /// Empty means "not configured".
    #[serde(default)]
    pub persistence_url: String,

    #[serde(default = "default_languages_dir")]
    pub languages_dir: PathBuf,

    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_languages_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LANGUAGES_DIR)
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            persistence_url: String::new(),
            languages_dir: default_languages_dir(),
            default_locale: default_locale(),
        }
    }
}

impl SkillConfig {
    pub fn has_persistence(&self) -> bool {
        !self.persistence_url.trim().is_empty()
    }
}
