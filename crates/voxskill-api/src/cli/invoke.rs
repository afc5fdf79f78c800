//! `voxskill invoke`: one offline invocation from a JSON file.

use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncReadExt;

use voxskill_types::envelope::RequestEnvelope;
use voxskill_types::response::ResponseEnvelope;

use crate::state::AppState;

/// Read a request envelope from `path`, or stdin when `path` is `-`.
pub async fn read_envelope(path: &Path) -> anyhow::Result<RequestEnvelope> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read request from stdin")?;
        raw
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    serde_json::from_str(&raw)
        .with_context(|| format!("invalid request envelope in {}", path.display()))
}

/// Run the envelope stored at `path` through the skill.
pub async fn invoke_file(state: &AppState, path: &Path) -> anyhow::Result<ResponseEnvelope> {
    let envelope = read_envelope(path).await?;
    let response = state.skill.invoke(envelope).await?;
    Ok(response)
}

/// Print the response envelope for the request at `path`.
pub async fn invoke(state: &AppState, path: &Path) -> anyhow::Result<()> {
    let response = invoke_file(state, path).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tempfile::TempDir;

    use voxskill_core::config::StaticConfigLoader;
    use voxskill_core::greeter::greeter_skill;
    use voxskill_core::persistence::InMemoryPersistenceAdapter;
    use voxskill_infra::locale::FsLocaleSource;
    use voxskill_types::config::{SkillConfig, DEFAULT_LOCALE};

    use super::*;

    const LANGUAGES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../languages");

    fn state() -> AppState {
        let skill = greeter_skill(
            FsLocaleSource::new(LANGUAGES_DIR),
            StaticConfigLoader::valid(SkillConfig {
                persistence_url: "sqlite://voxskill.db".to_string(),
                ..SkillConfig::default()
            }),
            Arc::new(InMemoryPersistenceAdapter::new()),
            DEFAULT_LOCALE,
        )
        .build();
        AppState::new(skill, LANGUAGES_DIR)
    }

    #[tokio::test]
    async fn test_invoke_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cancel.json");
        let request = json!({
            "version": "1.0",
            "session": {
                "new": false,
                "sessionId": "session-1",
                "attributes": {},
                "user": { "userId": "user-1" }
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "req-1",
                "locale": "en-US",
                "intent": { "name": "AMAZON.CancelIntent" }
            }
        });
        tokio::fs::write(&path, request.to_string()).await.unwrap();

        let response = invoke_file(&state(), &path).await.unwrap();
        assert_eq!(response.response.should_end_session, Some(true));
        assert!(response.response.speech_text().is_some());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_envelope(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, "{\"version\": \"1.0\"}").await.unwrap();

        let err = read_envelope(&path).await.unwrap_err();
        assert!(err.to_string().contains("invalid request envelope"));
    }
}
