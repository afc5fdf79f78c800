//! The greeting skill: remembers a user's name and greets them by it.

pub mod handlers;
pub mod interceptors;
pub mod keys;

use crate::config::ConfigLoader;
use crate::locale::LocaleSource;
use crate::persistence::DynPersistenceAdapter;
use crate::skill::SkillBuilder;

use handlers::{
    CancelOrStopIntentHandler, CatchAllExceptionHandler, FallbackIntentHandler,
    HelpIntentHandler, InvalidConfigHandler, LaunchRequestHandler, LearnMoreIntentHandler,
    MyNameIsIntentHandler, RepeatIntentHandler, SessionEndedRequestHandler, YesNoIntentHandler,
};
use interceptors::{
    InvalidConfigInterceptor, LocalizationInterceptor, RequestLogger, ResponseLogger,
};

/// Wire the greeting skill. Handler order matters: the misconfiguration
/// handler pre-empts everything else.
///
/// `default_locale` is used for requests that carry no locale.
pub fn greeter_skill<S, C>(
    locales: S,
    config_loader: C,
    persistence: DynPersistenceAdapter,
    default_locale: &str,
) -> SkillBuilder
where
    S: LocaleSource + 'static,
    C: ConfigLoader + 'static,
{
    SkillBuilder::default()
        .persistence(persistence)
        .add_request_interceptor(
            LocalizationInterceptor::new(locales).with_default_locale(default_locale),
        )
        .add_request_interceptor(InvalidConfigInterceptor::new(config_loader))
        .add_request_interceptor(RequestLogger)
        .add_request_handler(InvalidConfigHandler)
        .add_request_handler(LaunchRequestHandler)
        .add_request_handler(MyNameIsIntentHandler)
        .add_request_handler(LearnMoreIntentHandler)
        .add_request_handler(YesNoIntentHandler)
        .add_request_handler(RepeatIntentHandler)
        .add_request_handler(CancelOrStopIntentHandler)
        .add_request_handler(HelpIntentHandler)
        .add_request_handler(FallbackIntentHandler)
        .add_request_handler(SessionEndedRequestHandler)
        .add_exception_handler(CatchAllExceptionHandler)
        .add_response_interceptor(ResponseLogger)
}
