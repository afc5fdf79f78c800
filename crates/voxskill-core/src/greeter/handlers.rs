//! Request handlers and the catch-all exception handler of the greeting skill.

use serde_json::Value;

use voxskill_types::envelope::Request;
use voxskill_types::error::SkillError;
use voxskill_types::response::Response;

use super::keys::{self, intents};
use crate::dispatch::{ExceptionHandler, HandlerInput, RequestHandler};
use crate::locale::fill_template;

/// Store an askable turn's exact speech and reprompt for a later repeat.
fn remember_output(input: &mut HandlerInput, speech: &str, reprompt: &str) {
    let session = input.attributes_mut().session_attributes_mut();
    session.insert(
        keys::REPEAT_SPEECH_OUTPUT.to_string(),
        Value::String(speech.to_string()),
    );
    session.insert(
        keys::REPEAT_REPROMPT_OUTPUT.to_string(),
        Value::String(reprompt.to_string()),
    );
}

fn session_text(input: &HandlerInput, key: &str) -> Option<String> {
    input
        .attributes()
        .session_attributes()
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Pre-empts every other handler when configuration failed to load.
/// Must be registered first.
pub struct InvalidConfigHandler;

impl RequestHandler for InvalidConfigHandler {
    fn name(&self) -> &'static str {
        "InvalidConfig"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.attributes().request_attributes().invalid_config
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let speech = input.pick_prompt(keys::ENV_NOT_CONFIGURED)?;
        Ok(input.response_builder().speak(speech).build())
    }
}

/// Greets by name when one is on file, otherwise introduces the skill.
pub struct LaunchRequestHandler;

impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "LaunchRequest"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        matches!(input.request(), Request::LaunchRequest(_))
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let user_name = match input.attributes_mut().persistent_attributes().await {
            Ok(attributes) => attributes
                .get(keys::USER_NAME)
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string),
            Err(err) => {
                tracing::warn!(error = %err, "persistent attributes unreadable, greeting as unknown user");
                None
            }
        };

        let skill_name = input.pick_prompt(keys::SKILL_NAME)?;
        let (speech, reprompt) = match user_name {
            Some(name) => (
                fill_template(&input.pick_prompt(keys::GREETING)?, &name),
                input.pick_prompt(keys::GREETING_REPROMPT)?,
            ),
            None => (
                fill_template(&input.pick_prompt(keys::GREETING_UNKNOWN_USER)?, &skill_name),
                input.pick_prompt(keys::GREETING_UNKNOWN_USER_REPROMPT)?,
            ),
        };

        remember_output(input, &speech, &reprompt);

        Ok(input
            .response_builder()
            .speak(&speech)
            .ask(reprompt)
            .simple_card(skill_name, speech)
            .build())
    }
}

/// Remembers the user's name across sessions.
pub struct MyNameIsIntentHandler;

impl RequestHandler for MyNameIsIntentHandler {
    fn name(&self) -> &'static str {
        "MyNameIsIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::MY_NAME_IS)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let name = input
            .slot_value(keys::NAME_SLOT)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| SkillError::MissingSlot(keys::NAME_SLOT.to_string()))?;

        let speech = fill_template(&input.pick_prompt(keys::GREETING_RESPONSE)?, &name);

        input
            .attributes_mut()
            .persistent_attributes()
            .await?
            .insert(keys::USER_NAME.to_string(), Value::String(name));
        input.attributes_mut().save_persistent_attributes().await?;

        Ok(input.response_builder().speak(speech).build())
    }
}

pub struct LearnMoreIntentHandler;

impl LearnMoreIntentHandler {
    /// The learn-more answer. Also reached directly from a "yes".
    pub fn respond(input: &mut HandlerInput) -> Result<Response, SkillError> {
        let speech = input.pick_prompt(keys::LEARN_MORE)?;
        Ok(input.response_builder().speak(speech).build())
    }
}

impl RequestHandler for LearnMoreIntentHandler {
    fn name(&self) -> &'static str {
        "LearnMoreIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::LEARN_MORE)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        Self::respond(input)
    }
}

/// "Yes" means "tell me more"; "no" gets a short acknowledgement.
pub struct YesNoIntentHandler;

impl RequestHandler for YesNoIntentHandler {
    fn name(&self) -> &'static str {
        "YesNoIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::YES) || input.is_intent_name(intents::NO)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        if input.is_intent_name(intents::YES) {
            return LearnMoreIntentHandler::respond(input);
        }

        let speech = input.pick_prompt(keys::NO)?;
        Ok(input.response_builder().speak(speech).build())
    }
}

/// Replays the last askable turn stored in the session.
pub struct RepeatIntentHandler;

impl RequestHandler for RepeatIntentHandler {
    fn name(&self) -> &'static str {
        "RepeatIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::REPEAT)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let Some(last_speech) = session_text(input, keys::REPEAT_SPEECH_OUTPUT) else {
            // First turn of the session: nothing was said yet.
            let speech = input.pick_prompt(keys::REPEAT_NOTHING)?;
            let reprompt = input.pick_prompt(keys::HELP_REPROMPT)?;
            return Ok(input.response_builder().speak(speech).ask(reprompt).build());
        };

        let last_reprompt = match session_text(input, keys::REPEAT_REPROMPT_OUTPUT) {
            Some(reprompt) => reprompt,
            None => input.pick_prompt(keys::HELP_REPROMPT)?,
        };

        let speech = fill_template(&input.pick_prompt(keys::REPEAT)?, &last_speech);
        let reprompt = fill_template(&input.pick_prompt(keys::REPEAT_REPROMPT)?, &last_reprompt);

        Ok(input.response_builder().speak(speech).ask(reprompt).build())
    }
}

pub struct CancelOrStopIntentHandler;

impl RequestHandler for CancelOrStopIntentHandler {
    fn name(&self) -> &'static str {
        "CancelOrStopIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::CANCEL) || input.is_intent_name(intents::STOP)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let speech = input.pick_prompt(keys::CANCEL_STOP_RESPONSE)?;
        Ok(input
            .response_builder()
            .speak(speech)
            .should_end_session(true)
            .build())
    }
}

pub struct HelpIntentHandler;

impl RequestHandler for HelpIntentHandler {
    fn name(&self) -> &'static str {
        "HelpIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::HELP)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let speech = input.pick_prompt(keys::HELP)?;
        let reprompt = input.pick_prompt(keys::HELP_REPROMPT)?;
        remember_output(input, &speech, &reprompt);
        Ok(input.response_builder().speak(speech).ask(reprompt).build())
    }
}

/// Utterances the interaction model could not map to any other intent.
pub struct FallbackIntentHandler;

impl RequestHandler for FallbackIntentHandler {
    fn name(&self) -> &'static str {
        "FallbackIntent"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        input.is_intent_name(intents::FALLBACK)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        let speech = input.pick_prompt(keys::FALLBACK)?;
        let reprompt = input.pick_prompt(keys::FALLBACK_REPROMPT)?;
        remember_output(input, &speech, &reprompt);
        Ok(input.response_builder().speak(speech).ask(reprompt).build())
    }
}

pub struct SessionEndedRequestHandler;

impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "SessionEndedRequest"
    }

    fn can_handle(&self, input: &HandlerInput) -> bool {
        matches!(input.request(), Request::SessionEndedRequest(_))
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Response, SkillError> {
        if let Request::SessionEndedRequest(request) = input.request() {
            let reason = request.reason.as_deref().unwrap_or("unknown");
            match &request.error {
                Some(error) => tracing::info!(
                    reason,
                    error_type = %error.error_type,
                    error_message = %error.message,
                    "session ended"
                ),
                None => tracing::info!(reason, "session ended"),
            }
        }
        Ok(input.response_builder().build())
    }
}

/// Logs any error and apologizes, keeping the session open.
pub struct CatchAllExceptionHandler;

impl ExceptionHandler for CatchAllExceptionHandler {
    fn can_handle(&self, _input: &HandlerInput, _error: &SkillError) -> bool {
        true
    }

    fn handle(&self, input: &mut HandlerInput, error: &SkillError) -> Result<Response, SkillError> {
        tracing::error!(error = %error, detail = ?error, request = ?input, "request failed");

        let speech = input.pick_prompt(keys::ERROR)?;
        let reprompt = input.pick_prompt(keys::ERROR_REPROMPT)?;
        Ok(input.response_builder().speak(speech).ask(reprompt).build())
    }
}
