//! End-to-end conversations against the greeting skill with in-memory ports.

use std::sync::Arc;

use serde_json::{json, Map};

use voxskill_core::config::StaticConfigLoader;
use voxskill_core::greeter::greeter_skill;
use voxskill_core::greeter::keys::{self, intents};
use voxskill_core::locale::{FixedPicker, InMemoryLocaleSource, PromptCatalog, VariantPicker};
use voxskill_core::persistence::{
    Attributes, DynPersistenceAdapter, InMemoryPersistenceAdapter, PersistenceAdapter,
};
use voxskill_core::skill::Skill;
use voxskill_types::config::{SkillConfig, DEFAULT_LOCALE};
use voxskill_types::envelope::{LaunchRequest, Request, RequestEnvelope, Session};
use voxskill_types::error::{LocaleError, RepositoryError, SkillError};
use voxskill_types::response::{Card, ResponseEnvelope};

const USER: &str = "amzn1.ask.account.test-user";

const ENGLISH: &str = r#"{
    "SKILL_NAME": "Greeter",
    "GREETING": "Welcome back, {}!",
    "GREETING_REPROMPT": "Want to learn more?",
    "GREETING_UNKNOWN_USER": "Welcome to {}. What is your name?",
    "GREETING_UNKNOWN_USER_REPROMPT": "Tell me your name.",
    "GREETING_RESPONSE": "Nice to meet you, {}.",
    "LEARN_MORE": "I remember names.",
    "REPEAT": "I said: {}",
    "REPEAT_REPROMPT": "And then: {}",
    "REPEAT_NOTHING": "I have not said anything yet.",
    "NO": ["Okay.", "Alright then."],
    "CANCEL_STOP_RESPONSE": "Goodbye!",
    "HELP": "Say my name is, followed by your name.",
    "HELP_REPROMPT": "What is your name?",
    "FALLBACK": "I did not get that.",
    "FALLBACK_REPROMPT": "Try asking for help.",
    "ERROR": "Sorry, something went wrong.",
    "ERROR_REPROMPT": "Please try again.",
    "ENV_NOT_CONFIGURED": "This skill is not configured."
}"#;

/// Backend whose every call fails, as an unreachable database would.
struct UnreachablePersistence;

impl PersistenceAdapter for UnreachablePersistence {
    async fn get_attributes(&self, _user_id: &str) -> Result<Option<Attributes>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn save_attributes(
        &self,
        _user_id: &str,
        _attributes: &Attributes,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Connection)
    }
}

fn english() -> PromptCatalog {
    PromptCatalog::from_json(ENGLISH).unwrap()
}

fn german() -> PromptCatalog {
    PromptCatalog::from_json(&ENGLISH.replace("Goodbye!", "Auf Wiedersehen!")).unwrap()
}

fn locales() -> InMemoryLocaleSource {
    InMemoryLocaleSource::new()
        .with_catalog("en", english())
        .with_catalog("de-DE", german())
}

fn valid_config() -> StaticConfigLoader {
    StaticConfigLoader::valid(SkillConfig {
        persistence_url: "sqlite::memory:".to_string(),
        ..SkillConfig::default()
    })
}

fn skill_with(persistence: DynPersistenceAdapter, picker_index: usize) -> Skill {
    greeter_skill(locales(), valid_config(), persistence, DEFAULT_LOCALE)
        .picker_factory(move || Box::new(FixedPicker::new(picker_index)) as Box<dyn VariantPicker>)
        .build()
}

fn skill() -> Skill {
    skill_with(Arc::new(InMemoryPersistenceAdapter::new()), 0)
}

fn envelope(request: Request) -> RequestEnvelope {
    RequestEnvelope::new(request).with_session(Session::new("session-1", USER))
}

/// Carry the returned session attributes into the next turn.
fn next_turn(previous: &ResponseEnvelope, request: Request) -> RequestEnvelope {
    let mut session = Session::new("session-1", USER);
    session.new = false;
    session.attributes = previous.session_attributes.clone();
    RequestEnvelope::new(request).with_session(session)
}

#[tokio::test]
async fn test_launch_unknown_user_introduces_skill() {
    let out = skill()
        .invoke(envelope(Request::launch("en-US")))
        .await
        .unwrap();

    let speech = "Welcome to Greeter. What is your name?";
    assert_eq!(out.response.speech_text(), Some(speech));
    assert_eq!(out.response.reprompt_text(), Some("Tell me your name."));
    assert_eq!(out.response.should_end_session, Some(false));
    assert_eq!(out.response.card, Some(Card::simple("Greeter", speech)));
    assert_eq!(
        out.session_attributes.get(keys::REPEAT_SPEECH_OUTPUT),
        Some(&json!(speech))
    );
    assert_eq!(
        out.session_attributes.get(keys::REPEAT_REPROMPT_OUTPUT),
        Some(&json!("Tell me your name."))
    );
}

#[tokio::test]
async fn test_launch_known_user_greets_by_name() {
    let store = Arc::new(InMemoryPersistenceAdapter::new());
    let mut attributes = Map::new();
    attributes.insert(keys::USER_NAME.to_string(), json!("Ada"));
    store.save_attributes(USER, &attributes).await.unwrap();

    let out = skill_with(store, 0)
        .invoke(envelope(Request::launch("en-US")))
        .await
        .unwrap();

    assert_eq!(out.response.speech_text(), Some("Welcome back, Ada!"));
    assert_eq!(out.response.reprompt_text(), Some("Want to learn more?"));
    assert_eq!(
        out.response.card,
        Some(Card::simple("Greeter", "Welcome back, Ada!"))
    );
}

#[tokio::test]
async fn test_launch_without_user_identity_is_unknown_user() {
    let out = skill()
        .invoke(RequestEnvelope::new(Request::launch("en-US")))
        .await
        .unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("Welcome to Greeter. What is your name?")
    );
}

#[tokio::test]
async fn test_launch_with_broken_persistence_is_unknown_user() {
    let out = skill_with(Arc::new(UnreachablePersistence), 0)
        .invoke(envelope(Request::launch("en-US")))
        .await
        .unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("Welcome to Greeter. What is your name?")
    );
}

#[tokio::test]
async fn test_my_name_is_persists_and_next_launch_uses_it() {
    let store = Arc::new(InMemoryPersistenceAdapter::new());
    let skill = skill_with(store.clone(), 0);

    let out = skill
        .invoke(envelope(Request::intent(
            "en-US",
            intents::MY_NAME_IS,
            &[(keys::NAME_SLOT, "Grace")],
        )))
        .await
        .unwrap();
    assert_eq!(out.response.speech_text(), Some("Nice to meet you, Grace."));
    assert_eq!(out.response.should_end_session, None);

    let saved = store.get_attributes(USER).await.unwrap().unwrap();
    assert_eq!(saved.get(keys::USER_NAME), Some(&json!("Grace")));

    let out = skill
        .invoke(envelope(Request::launch("en-US")))
        .await
        .unwrap();
    assert_eq!(out.response.speech_text(), Some("Welcome back, Grace!"));
}

#[tokio::test]
async fn test_my_name_is_without_slot_apologizes() {
    let store = Arc::new(InMemoryPersistenceAdapter::new());
    let out = skill_with(store.clone(), 0)
        .invoke(envelope(Request::intent("en-US", intents::MY_NAME_IS, &[])))
        .await
        .unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("Sorry, something went wrong.")
    );
    assert_eq!(out.response.reprompt_text(), Some("Please try again."));
    assert_eq!(out.response.should_end_session, Some(false));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_my_name_is_with_broken_persistence_apologizes() {
    let out = skill_with(Arc::new(UnreachablePersistence), 0)
        .invoke(envelope(Request::intent(
            "en-US",
            intents::MY_NAME_IS,
            &[(keys::NAME_SLOT, "Grace")],
        )))
        .await
        .unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("Sorry, something went wrong.")
    );
}

#[tokio::test]
async fn test_yes_delegates_to_learn_more() {
    let skill = skill();
    let learn_more = skill
        .invoke(envelope(Request::intent("en-US", intents::LEARN_MORE, &[])))
        .await
        .unwrap();
    let yes = skill
        .invoke(envelope(Request::intent("en-US", intents::YES, &[])))
        .await
        .unwrap();

    assert_eq!(learn_more.response.speech_text(), Some("I remember names."));
    assert_eq!(yes.response, learn_more.response);
}

#[tokio::test]
async fn test_no_uses_picked_variant() {
    let first = skill()
        .invoke(envelope(Request::intent("en-US", intents::NO, &[])))
        .await
        .unwrap();
    let second = skill_with(Arc::new(InMemoryPersistenceAdapter::new()), 1)
        .invoke(envelope(Request::intent("en-US", intents::NO, &[])))
        .await
        .unwrap();

    assert_eq!(first.response.speech_text(), Some("Okay."));
    assert_eq!(second.response.speech_text(), Some("Alright then."));
}

#[tokio::test]
async fn test_repeat_replays_last_askable_turn() {
    let skill = skill();
    let help = skill
        .invoke(envelope(Request::intent("en-US", intents::HELP, &[])))
        .await
        .unwrap();
    assert_eq!(
        help.response.speech_text(),
        Some("Say my name is, followed by your name.")
    );

    let repeat = skill
        .invoke(next_turn(
            &help,
            Request::intent("en-US", intents::REPEAT, &[]),
        ))
        .await
        .unwrap();

    assert_eq!(
        repeat.response.speech_text(),
        Some("I said: Say my name is, followed by your name.")
    );
    assert_eq!(
        repeat.response.reprompt_text(),
        Some("And then: What is your name?")
    );
    // Repeating does not overwrite what is stored.
    assert_eq!(repeat.session_attributes, help.session_attributes);

    let again = skill
        .invoke(next_turn(
            &repeat,
            Request::intent("en-US", intents::REPEAT, &[]),
        ))
        .await
        .unwrap();
    assert_eq!(again.response, repeat.response);
}

#[tokio::test]
async fn test_repeat_with_nothing_said() {
    let out = skill()
        .invoke(envelope(Request::intent("en-US", intents::REPEAT, &[])))
        .await
        .unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("I have not said anything yet.")
    );
    assert_eq!(out.response.reprompt_text(), Some("What is your name?"));
    assert!(out.session_attributes.is_empty());
}

#[tokio::test]
async fn test_fallback_is_repeatable() {
    let skill = skill();
    let fallback = skill
        .invoke(envelope(Request::intent("en-US", intents::FALLBACK, &[])))
        .await
        .unwrap();
    assert_eq!(fallback.response.speech_text(), Some("I did not get that."));
    assert_eq!(
        fallback.response.reprompt_text(),
        Some("Try asking for help.")
    );

    let repeat = skill
        .invoke(next_turn(
            &fallback,
            Request::intent("en-US", intents::REPEAT, &[]),
        ))
        .await
        .unwrap();
    assert_eq!(
        repeat.response.speech_text(),
        Some("I said: I did not get that.")
    );
}

#[tokio::test]
async fn test_cancel_and_stop_end_the_session() {
    let skill = skill();
    for intent in [intents::CANCEL, intents::STOP] {
        let out = skill
            .invoke(envelope(Request::intent("en-US", intent, &[])))
            .await
            .unwrap();
        assert_eq!(out.response.speech_text(), Some("Goodbye!"));
        assert_eq!(out.response.should_end_session, Some(true));
        assert!(out.response.reprompt.is_none());
    }
}

#[tokio::test]
async fn test_session_ended_returns_empty_response() {
    let out = skill()
        .invoke(envelope(Request::session_ended("en-US", "USER_INITIATED")))
        .await
        .unwrap();

    assert_eq!(out.response, Default::default());
}

#[tokio::test]
async fn test_invalid_config_preempts_every_handler() {
    let store = Arc::new(InMemoryPersistenceAdapter::new());
    let skill = greeter_skill(
        locales(),
        StaticConfigLoader::missing(),
        store.clone(),
        DEFAULT_LOCALE,
    )
    .build();

    for request in [
        Request::launch("en-US"),
        Request::intent("en-US", intents::MY_NAME_IS, &[("name", "Sam")]),
        Request::intent("en-US", intents::YES, &[]),
        Request::intent("en-US", intents::REPEAT, &[]),
        Request::intent("en-US", intents::STOP, &[]),
        Request::intent("en-US", intents::HELP, &[]),
        Request::intent("en-US", "SomethingUnknownIntent", &[]),
        Request::session_ended("en-US", "USER_INITIATED"),
        Request::Unknown,
    ] {
        let request_type = request.request_type();
        let out = skill.invoke(envelope(request)).await.unwrap();
        assert_eq!(
            out.response.speech_text(),
            Some("This skill is not configured."),
            "{request_type}"
        );
        assert!(out.response.reprompt.is_none());
        assert!(out.response.should_end_session.is_none());
        assert!(!out.session_attributes.contains_key(keys::REPEAT_SPEECH_OUTPUT));
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_intent_surfaces_no_handler() {
    let err = skill()
        .invoke(envelope(Request::intent("en-US", "OrderPizzaIntent", &[])))
        .await
        .unwrap_err();

    match err {
        SkillError::NoHandler { request_type } => {
            assert_eq!(request_type, "IntentRequest:OrderPizzaIntent");
        }
        other => panic!("expected NoHandler, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exact_locale_wins_over_base_language() {
    let skill = skill();
    let exact = skill
        .invoke(envelope(Request::intent("de-DE", intents::STOP, &[])))
        .await
        .unwrap();
    let fallback = skill
        .invoke(envelope(Request::intent("en-GB", intents::STOP, &[])))
        .await
        .unwrap();

    assert_eq!(exact.response.speech_text(), Some("Auf Wiedersehen!"));
    assert_eq!(fallback.response.speech_text(), Some("Goodbye!"));
}

#[tokio::test]
async fn test_request_without_locale_uses_default() {
    let request = Request::LaunchRequest(LaunchRequest {
        request_id: "req-1".to_string(),
        timestamp: None,
        locale: None,
    });
    let out = skill().invoke(envelope(request)).await.unwrap();

    assert_eq!(
        out.response.speech_text(),
        Some("Welcome to Greeter. What is your name?")
    );
}

#[tokio::test]
async fn test_unavailable_locale_is_surfaced() {
    let err = skill()
        .invoke(envelope(Request::launch("fr-FR")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SkillError::Locale(LocaleError::Unavailable { ref locale, ref base })
            if locale == "fr-FR" && base == "fr"
    ));
}

#[tokio::test]
async fn test_handler_order() {
    let skill = skill();
    assert_eq!(
        skill.registry().names(),
        vec![
            "InvalidConfig",
            "LaunchRequest",
            "MyNameIsIntent",
            "LearnMoreIntent",
            "YesNoIntent",
            "RepeatIntent",
            "CancelOrStopIntent",
            "HelpIntent",
            "FallbackIntent",
            "SessionEndedRequest",
        ]
    );
}
