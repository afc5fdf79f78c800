//! Application state wiring the greeting skill to its infrastructure.
//!
//! AppState pins the skill's ports to the concrete infra implementations:
//! filesystem locales, env/TOML configuration and SQLite persistence
//! opened once a `persistence_url` is configured.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxskill_core::config::ConfigLoader;
use voxskill_core::greeter::greeter_skill;
use voxskill_core::persistence::{DynPersistenceAdapter, InMemoryPersistenceAdapter};
use voxskill_core::skill::Skill;
use voxskill_infra::config::EnvConfigLoader;
use voxskill_infra::locale::FsLocaleSource;
use voxskill_infra::sqlite::deferred::DeferredSqlitePersistenceAdapter;
use voxskill_types::config::SkillConfig;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<Skill>,
    pub languages_dir: PathBuf,
}

impl AppState {
    /// Load configuration from the working directory and assemble the skill.
    pub async fn init(in_memory: bool) -> anyhow::Result<Self> {
        Self::from_loader(EnvConfigLoader::new(), in_memory).await
    }

    /// Assemble the skill from the given configuration sources.
    ///
    /// With `in_memory`, attributes live in process memory and no
    /// `persistence_url` is required. Without it, a missing URL does not
    /// stop start-up: requests get the misconfigured response until the URL
    /// appears, and the database opens on the first request that sees it.
    pub async fn from_loader(loader: EnvConfigLoader, in_memory: bool) -> anyhow::Result<Self> {
        let settings = match loader.clone().require_persistence(false).load() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "configuration unreadable, using defaults");
                SkillConfig::default()
            }
        };

        let loader = loader.require_persistence(!in_memory);
        let persistence: DynPersistenceAdapter = if in_memory {
            tracing::info!("persistent attributes kept in memory");
            Arc::new(InMemoryPersistenceAdapter::new())
        } else {
            let adapter = DeferredSqlitePersistenceAdapter::new(loader.clone());
            if settings.has_persistence() {
                adapter.connect().await?;
            } else {
                tracing::warn!("persistence_url not configured, requests refused until it is set");
            }
            Arc::new(adapter)
        };

        let skill = greeter_skill(
            FsLocaleSource::new(&settings.languages_dir),
            loader,
            persistence,
            &settings.default_locale,
        )
        .build();

        Ok(Self::new(skill, settings.languages_dir))
    }

    pub fn new(skill: Skill, languages_dir: impl AsRef<Path>) -> Self {
        Self {
            skill: Arc::new(skill),
            languages_dir: languages_dir.as_ref().to_path_buf(),
        }
    }
}
