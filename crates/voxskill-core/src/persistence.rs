//! Persistent (per-user, cross-session) attribute storage port.
//!
//! Follows the same blanket-impl pattern as the other ports:
//! 1. `PersistenceAdapter` uses RPITIT for its async methods
//! 2. `PersistenceAdapterDyn` is the object-safe twin with boxed futures
//! 3. `DynPersistenceAdapter` is the shared trait object the runtime holds

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value};

use voxskill_types::error::RepositoryError;

/// A user's persistent attributes.
pub type Attributes = Map<String, Value>;

/// Trait for durable per-user attribute backends.
///
/// Implementations live in voxskill-infra (SQLite) or below (in-memory).
pub trait PersistenceAdapter: Send + Sync {
    /// Fetch the attribute record for a user. Returns None if none was saved.
    fn get_attributes(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Attributes>, RepositoryError>> + Send;

    /// Replace the attribute record for a user (upsert). Durable on return.
    fn save_attributes(
        &self,
        user_id: &str,
        attributes: &Attributes,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`PersistenceAdapter`] with boxed futures.
pub trait PersistenceAdapterDyn: Send + Sync {
    fn get_attributes_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Attributes>, RepositoryError>>;

    fn save_attributes_boxed<'a>(
        &'a self,
        user_id: &'a str,
        attributes: &'a Attributes,
    ) -> BoxFuture<'a, Result<(), RepositoryError>>;
}

impl<T: PersistenceAdapter> PersistenceAdapterDyn for T {
    fn get_attributes_boxed<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Attributes>, RepositoryError>> {
        Box::pin(self.get_attributes(user_id))
    }

    fn save_attributes_boxed<'a>(
        &'a self,
        user_id: &'a str,
        attributes: &'a Attributes,
    ) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(self.save_attributes(user_id, attributes))
    }
}

/// Shared, type-erased persistence backend.
pub type DynPersistenceAdapter = Arc<dyn PersistenceAdapterDyn>;

/// Process-local attribute store. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryPersistenceAdapter {
    records: DashMap<String, Attributes>,
}

impl InMemoryPersistenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PersistenceAdapter for InMemoryPersistenceAdapter {
    async fn get_attributes(&self, user_id: &str) -> Result<Option<Attributes>, RepositoryError> {
        Ok(self.records.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn save_attributes(
        &self,
        user_id: &str,
        attributes: &Attributes,
    ) -> Result<(), RepositoryError> {
        self.records.insert(user_id.to_string(), attributes.clone());
        Ok(())
    }
}
