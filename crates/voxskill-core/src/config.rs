//! Configuration loading port.

use voxskill_types::config::SkillConfig;
use voxskill_types::error::ConfigError;

/// Loads and validates the skill's required configuration.
///
/// Called once per request by the config-validation interceptor; a failure
/// routes the request to the misconfigured response. The env/file-backed
/// implementation lives in voxskill-infra.
pub trait ConfigLoader: Send + Sync {
    fn load(&self) -> Result<SkillConfig, ConfigError>;
}

/// Loader returning a fixed, already-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Option<SkillConfig>,
}

impl StaticConfigLoader {
    pub fn valid(config: SkillConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// A loader that always reports `persistence_url` as missing.
    pub fn missing() -> Self {
        Self { config: None }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<SkillConfig, ConfigError> {
        self.config
            .clone()
            .ok_or_else(|| ConfigError::Missing("persistence_url".to_string()))
    }
}
