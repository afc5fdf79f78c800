//! Request, session and persistent attribute scopes for one invocation.

use serde_json::{Map, Value};

use voxskill_types::envelope::RequestEnvelope;
use voxskill_types::error::SkillError;

use crate::locale::PromptCatalog;
use crate::persistence::{Attributes, DynPersistenceAdapter};

/// Values interceptors compute before dispatch; discarded after the request.
#[derive(Debug, Default)]
pub struct RequestAttributes {
    /// Catalog resolved by the localization interceptor.
    pub prompts: Option<PromptCatalog>,
    /// Set by the config-validation interceptor when configuration failed to load.
    pub invalid_config: bool,
}

/// Owns the three attribute scopes of a request.
///
/// Persistent attributes are fetched lazily on first access and written
/// only by an explicit [`AttributesManager::save_persistent_attributes`].
pub struct AttributesManager {
    request: RequestAttributes,
    session: Map<String, Value>,
    user_id: Option<String>,
    persistence: DynPersistenceAdapter,
    persistent: Option<Attributes>,
}

impl AttributesManager {
    pub fn new(envelope: &RequestEnvelope, persistence: DynPersistenceAdapter) -> Self {
        Self {
            request: RequestAttributes::default(),
            session: envelope.session_attributes(),
            user_id: envelope.user_id().map(str::to_string),
            persistence,
            persistent: None,
        }
    }

    pub fn request_attributes(&self) -> &RequestAttributes {
        &self.request
    }

    pub fn request_attributes_mut(&mut self) -> &mut RequestAttributes {
        &mut self.request
    }

    pub fn session_attributes(&self) -> &Map<String, Value> {
        &self.session
    }

    pub fn session_attributes_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.session
    }

    /// The user's persistent attributes, loaded from the backend on first use.
    ///
    /// A user with no saved record gets an empty map.
    pub async fn persistent_attributes(&mut self) -> Result<&mut Attributes, SkillError> {
        if self.persistent.is_none() {
            let user_id = self.user_id.as_deref().ok_or(SkillError::MissingUser)?;
            let loaded = self
                .persistence
                .get_attributes_boxed(user_id)
                .await?
                .unwrap_or_default();
            self.persistent = Some(loaded);
        }

        Ok(self.persistent.get_or_insert_with(Attributes::new))
    }

    /// Write the persistent attributes to the backend and wait for the commit.
    ///
    /// No-op when they were never accessed during this request.
    pub async fn save_persistent_attributes(&mut self) -> Result<(), SkillError> {
        let Some(attributes) = self.persistent.as_ref() else {
            return Ok(());
        };
        let user_id = self.user_id.as_deref().ok_or(SkillError::MissingUser)?;

        self.persistence
            .save_attributes_boxed(user_id, attributes)
            .await?;
        Ok(())
    }

    /// Hand back the session attributes for the response envelope.
    pub fn into_session_attributes(self) -> Map<String, Value> {
        self.session
    }
}

impl std::fmt::Debug for AttributesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributesManager")
            .field("request", &self.request)
            .field("session_keys", &self.session.len())
            .field("user_id", &self.user_id)
            .field("persistent_loaded", &self.persistent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use voxskill_types::envelope::{Request, Session};

    use super::*;
    use crate::persistence::{InMemoryPersistenceAdapter, PersistenceAdapter};

    fn envelope(user: Option<&str>) -> RequestEnvelope {
        let envelope = RequestEnvelope::new(Request::launch("en-US"));
        match user {
            Some(user) => {
                let mut session = Session::new("session-1", user);
                session.attributes.insert("carried".into(), json!(1));
                envelope.with_session(session)
            }
            None => envelope,
        }
    }

    #[tokio::test]
    async fn test_session_attributes_come_from_envelope() {
        let manager = AttributesManager::new(
            &envelope(Some("u1")),
            Arc::new(InMemoryPersistenceAdapter::new()),
        );
        assert_eq!(manager.session_attributes().get("carried"), Some(&json!(1)));
        assert!(!manager.request_attributes().invalid_config);
        assert!(manager.request_attributes().prompts.is_none());
    }

    #[tokio::test]
    async fn test_persistent_roundtrip() {
        let store = Arc::new(InMemoryPersistenceAdapter::new());
        let mut manager = AttributesManager::new(&envelope(Some("u1")), store.clone());

        assert!(manager.persistent_attributes().await.unwrap().is_empty());
        manager
            .persistent_attributes()
            .await
            .unwrap()
            .insert("user_name".into(), json!("Sam"));
        manager.save_persistent_attributes().await.unwrap();

        let saved = store.get_attributes("u1").await.unwrap().unwrap();
        assert_eq!(saved.get("user_name"), Some(&json!("Sam")));
    }

    #[tokio::test]
    async fn test_save_without_access_is_noop() {
        let store = Arc::new(InMemoryPersistenceAdapter::new());
        let mut manager = AttributesManager::new(&envelope(Some("u1")), store.clone());
        manager.save_persistent_attributes().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_user_is_an_error() {
        let mut manager =
            AttributesManager::new(&envelope(None), Arc::new(InMemoryPersistenceAdapter::new()));
        assert!(matches!(
            manager.persistent_attributes().await,
            Err(SkillError::MissingUser)
        ));
    }
}
