//! SQLite persistence opened on the first valid configuration.
//!
//! The server may start before `persistence_url` is set. Configuration is
//! re-read on every call until it names a database; from then on the opened
//! store is reused for the life of the process.

use tokio::sync::OnceCell;

use voxskill_core::config::ConfigLoader;
use voxskill_core::persistence::{Attributes, PersistenceAdapter};
use voxskill_types::error::RepositoryError;

use super::attributes::SqlitePersistenceAdapter;
use super::pool::DatabasePool;

/// `PersistenceAdapter` that connects lazily from a [`ConfigLoader`].
pub struct DeferredSqlitePersistenceAdapter<C> {
    loader: C,
    store: OnceCell<SqlitePersistenceAdapter>,
}

impl<C: ConfigLoader> DeferredSqlitePersistenceAdapter<C> {
    pub fn new(loader: C) -> Self {
        Self {
            loader,
            store: OnceCell::new(),
        }
    }

    /// Open the store if the configuration now allows it.
    pub async fn connect(&self) -> Result<&SqlitePersistenceAdapter, RepositoryError> {
        self.store
            .get_or_try_init(|| async {
                let config = self.loader.load().map_err(|err| {
                    tracing::debug!(error = %err, "persistence not configured");
                    RepositoryError::Connection
                })?;
                if !config.has_persistence() {
                    return Err(RepositoryError::Connection);
                }

                let pool = DatabasePool::new(&config.persistence_url)
                    .await
                    .map_err(|err| {
                        tracing::error!(
                            url = %config.persistence_url,
                            error = %err,
                            "failed to open persistence database"
                        );
                        RepositoryError::Connection
                    })?;

                tracing::info!(url = %config.persistence_url, "persistence database opened");
                Ok(SqlitePersistenceAdapter::new(pool))
            })
            .await
    }
}

impl<C: ConfigLoader> PersistenceAdapter for DeferredSqlitePersistenceAdapter<C> {
    async fn get_attributes(&self, user_id: &str) -> Result<Option<Attributes>, RepositoryError> {
        self.connect().await?.get_attributes(user_id).await
    }

    async fn save_attributes(
        &self,
        user_id: &str,
        attributes: &Attributes,
    ) -> Result<(), RepositoryError> {
        self.connect().await?.save_attributes(user_id, attributes).await
    }
}
