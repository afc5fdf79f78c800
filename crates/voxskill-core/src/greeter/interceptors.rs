//! Request and response interceptors of the greeting skill.

use voxskill_types::config::DEFAULT_LOCALE;
use voxskill_types::error::SkillError;
use voxskill_types::response::Response;

use crate::config::ConfigLoader;
use crate::dispatch::{HandlerInput, RequestInterceptor, ResponseInterceptor};
use crate::locale::{resolve_catalog, LocaleSource};

/// Loads the prompt catalog for the request's locale into request attributes.
pub struct LocalizationInterceptor<S> {
    source: S,
    default_locale: String,
}

impl<S: LocaleSource> LocalizationInterceptor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }

    /// Locale used when the request does not carry one.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }
}

impl<S: LocaleSource> RequestInterceptor for LocalizationInterceptor<S> {
    async fn process(&self, input: &mut HandlerInput) -> Result<(), SkillError> {
        let locale = input
            .request()
            .locale()
            .filter(|locale| !locale.is_empty())
            .unwrap_or(self.default_locale.as_str())
            .to_string();
        tracing::info!(locale = %locale, "resolving prompts");

        let catalog = resolve_catalog(&self.source, &locale).await?;
        input.attributes_mut().request_attributes_mut().prompts = Some(catalog);
        Ok(())
    }
}

/// Flags the request when required configuration cannot be loaded.
pub struct InvalidConfigInterceptor<C> {
    loader: C,
}

impl<C: ConfigLoader> InvalidConfigInterceptor<C> {
    pub fn new(loader: C) -> Self {
        Self { loader }
    }
}

impl<C: ConfigLoader> RequestInterceptor for InvalidConfigInterceptor<C> {
    async fn process(&self, input: &mut HandlerInput) -> Result<(), SkillError> {
        let invalid = match self.loader.load() {
            Ok(_) => false,
            Err(err) => {
                tracing::warn!(error = %err, "skill configuration invalid");
                true
            }
        };
        input.attributes_mut().request_attributes_mut().invalid_config = invalid;
        Ok(())
    }
}

pub struct RequestLogger;

impl RequestInterceptor for RequestLogger {
    async fn process(&self, input: &mut HandlerInput) -> Result<(), SkillError> {
        tracing::debug!(envelope = ?input.envelope(), "request envelope");
        Ok(())
    }
}

pub struct ResponseLogger;

impl ResponseInterceptor for ResponseLogger {
    fn process(&self, _input: &HandlerInput, response: &Response) {
        tracing::debug!(response = ?response, "response");
    }
}
