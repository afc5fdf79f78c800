//! The skill runtime: interceptors around first-match dispatch, with
//! exception handlers catching everything except dispatch failures.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::Instrument;

use voxskill_types::envelope::RequestEnvelope;
use voxskill_types::error::SkillError;
use voxskill_types::response::{Response, ResponseEnvelope};

use crate::dispatch::handler::DynRequestInterceptor;
use crate::dispatch::{
    ExceptionHandler, HandlerInput, HandlerRegistry, RequestHandler, RequestInterceptor,
    ResponseInterceptor,
};
use crate::locale::{RandomPicker, VariantPicker};
use crate::persistence::{DynPersistenceAdapter, InMemoryPersistenceAdapter};

/// Creates the variant picker for each request.
pub type PickerFactory = Arc<dyn Fn() -> Box<dyn VariantPicker> + Send + Sync>;

/// An assembled skill. Shared read-only across requests.
pub struct Skill {
    request_interceptors: Vec<DynRequestInterceptor>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    registry: HandlerRegistry,
    exception_handlers: Vec<Box<dyn ExceptionHandler>>,
    persistence: DynPersistenceAdapter,
    picker_factory: PickerFactory,
}

impl Skill {
    pub fn builder() -> SkillBuilder {
        SkillBuilder::default()
    }

    /// Serve one inbound event.
    ///
    /// Errors from interceptors or handlers (panics included) go to the
    /// first exception handler that accepts them. A request no handler
    /// matches is returned as `SkillError::NoHandler`, and an error no
    /// exception handler could turn into a response is returned as-is.
    pub async fn invoke(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, SkillError> {
        let span = tracing::info_span!(
            "skill.invoke",
            skill.request_type = envelope.request.request_type(),
            skill.request_id = envelope.request.request_id().unwrap_or_default(),
            skill.intent = envelope.request.intent_name().unwrap_or_default(),
        );

        async move {
            let mut input = HandlerInput::new(
                envelope,
                Arc::clone(&self.persistence),
                (self.picker_factory)(),
            );

            let response = match self.dispatch(&mut input).await {
                Ok(response) => response,
                Err(err) if err.is_dispatch_failure() => {
                    tracing::warn!(error = %err, "unhandled request");
                    return Err(err);
                }
                Err(err) => self.handle_exception(&mut input, err)?,
            };

            for interceptor in &self.response_interceptors {
                interceptor.process(&input, &response);
            }

            Ok(ResponseEnvelope::new(input.into_session_attributes(), response))
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        for interceptor in &self.request_interceptors {
            interceptor.process_boxed(input).await?;
        }

        let handler = self
            .registry
            .find(input)
            .ok_or_else(|| SkillError::NoHandler {
                request_type: describe_request(input),
            })?;
        tracing::debug!(handler = handler.name(), "dispatching");

        match AssertUnwindSafe(handler.handle_boxed(input))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => Err(SkillError::HandlerPanic {
                handler: handler.name().to_string(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }

    fn handle_exception(
        &self,
        input: &mut HandlerInput,
        err: SkillError,
    ) -> Result<Response, SkillError> {
        let Some(handler) = self
            .exception_handlers
            .iter()
            .find(|handler| handler.can_handle(input, &err))
        else {
            tracing::error!(error = %err, "no exception handler accepted the error");
            return Err(err);
        };

        handler.handle(input, &err).map_err(|secondary| {
            tracing::error!(
                error = %err,
                secondary = %secondary,
                "exception handler failed"
            );
            err
        })
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .field("registry", &self.registry)
            .field("exception_handlers", &self.exception_handlers.len())
            .finish()
    }
}

fn describe_request(input: &HandlerInput) -> String {
    match input.request().intent_name() {
        Some(intent) => format!("{}:{intent}", input.request().request_type()),
        None => input.request().request_type().to_string(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn entropy_picker() -> Box<dyn VariantPicker> {
    Box::new(RandomPicker::from_entropy())
}

/// Assembles a [`Skill`]. Registration order is dispatch order.
pub struct SkillBuilder {
    request_interceptors: Vec<DynRequestInterceptor>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    registry: HandlerRegistry,
    exception_handlers: Vec<Box<dyn ExceptionHandler>>,
    persistence: Option<DynPersistenceAdapter>,
    picker_factory: Option<PickerFactory>,
}

impl Default for SkillBuilder {
    fn default() -> Self {
        Self {
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            registry: HandlerRegistry::new(),
            exception_handlers: Vec::new(),
            persistence: None,
            picker_factory: None,
        }
    }
}

impl SkillBuilder {
    pub fn add_request_handler<H: RequestHandler + 'static>(mut self, handler: H) -> Self {
        self.registry.register(handler);
        self
    }

    pub fn add_exception_handler<H: ExceptionHandler + 'static>(mut self, handler: H) -> Self {
        self.exception_handlers.push(Box::new(handler));
        self
    }

    pub fn add_request_interceptor<I: RequestInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn add_response_interceptor<I: ResponseInterceptor + 'static>(
        mut self,
        interceptor: I,
    ) -> Self {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn persistence(mut self, persistence: DynPersistenceAdapter) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Override how each request's variant picker is created.
    pub fn picker_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn VariantPicker> + Send + Sync + 'static,
    {
        self.picker_factory = Some(Arc::new(factory));
        self
    }

    /// Finish the skill. Defaults: in-memory persistence, entropy-seeded picker.
    pub fn build(self) -> Skill {
        Skill {
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            registry: self.registry,
            exception_handlers: self.exception_handlers,
            persistence: self
                .persistence
                .unwrap_or_else(|| Arc::new(InMemoryPersistenceAdapter::new())),
            picker_factory: self
                .picker_factory
                .unwrap_or_else(|| Arc::new(entropy_picker)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use voxskill_types::envelope::{Request, Session};

    use super::*;

    struct Echo;

    impl RequestHandler for Echo {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn can_handle(&self, input: &HandlerInput) -> bool {
            input.is_intent_name("EchoIntent")
        }

        async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
            input
                .attributes_mut()
                .session_attributes_mut()
                .insert("echoed".into(), json!(true));
            Ok(input.response_builder().speak("echo").build())
        }
    }

    struct Panics;

    impl RequestHandler for Panics {
        fn name(&self) -> &'static str {
            "Panics"
        }

        fn can_handle(&self, input: &HandlerInput) -> bool {
            input.is_intent_name("PanicIntent")
        }

        async fn handle(&self, _input: &mut HandlerInput) -> Result<Response, SkillError> {
            panic!("boom");
        }
    }

    struct Fails;

    impl RequestHandler for Fails {
        fn name(&self) -> &'static str {
            "Fails"
        }

        fn can_handle(&self, input: &HandlerInput) -> bool {
            input.is_intent_name("FailIntent")
        }

        async fn handle(&self, _input: &mut HandlerInput) -> Result<Response, SkillError> {
            Err(SkillError::MissingSlot("name".into()))
        }
    }

    /// Answers every error with its own display text.
    struct Apologize;

    impl ExceptionHandler for Apologize {
        fn can_handle(&self, _input: &HandlerInput, _error: &SkillError) -> bool {
            true
        }

        fn handle(
            &self,
            input: &mut HandlerInput,
            error: &SkillError,
        ) -> Result<Response, SkillError> {
            Ok(input.response_builder().speak(format!("sorry: {error}")).build())
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl ResponseInterceptor for Counting {
        fn process(&self, _input: &HandlerInput, _response: &Response) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn skill(counter: Arc<AtomicUsize>) -> Skill {
        Skill::builder()
            .add_request_handler(Echo)
            .add_request_handler(Panics)
            .add_request_handler(Fails)
            .add_exception_handler(Apologize)
            .add_response_interceptor(Counting(counter))
            .build()
    }

    fn envelope(intent: &str) -> RequestEnvelope {
        RequestEnvelope::new(Request::intent("en-US", intent, &[]))
            .with_session(Session::new("s1", "u1"))
    }

    #[tokio::test]
    async fn test_handler_response_carries_session_attributes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let out = skill(counter.clone()).invoke(envelope("EchoIntent")).await.unwrap();

        assert_eq!(out.response.speech_text(), Some("echo"));
        assert_eq!(out.session_attributes.get("echoed"), Some(&json!(true)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_caught_by_exception_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let out = skill(counter.clone()).invoke(envelope("PanicIntent")).await.unwrap();

        let speech = out.response.speech_text().unwrap();
        assert!(speech.starts_with("sorry: handler 'Panics' panicked"));
        assert!(speech.contains("boom"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_error_is_caught_by_exception_handler() {
        let out = skill(Arc::new(AtomicUsize::new(0)))
            .invoke(envelope("FailIntent"))
            .await
            .unwrap();
        assert_eq!(out.response.speech_text(), Some("sorry: slot 'name' has no value"));
    }

    #[tokio::test]
    async fn test_unmatched_request_surfaces_no_handler() {
        let counter = Arc::new(AtomicUsize::new(0));
        let result = skill(counter.clone()).invoke(envelope("OtherIntent")).await;

        match result {
            Err(SkillError::NoHandler { request_type }) => {
                assert_eq!(request_type, "IntentRequest:OtherIntent");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_without_exception_handler_is_returned() {
        let skill = Skill::builder().add_request_handler(Fails).build();
        let result = skill.invoke(envelope("FailIntent")).await;
        assert!(matches!(result, Err(SkillError::MissingSlot(_))));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }
}
