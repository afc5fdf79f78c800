//! Prompt, session and persistent attribute keys used by the greeting skill.

pub const SKILL_NAME: &str = "SKILL_NAME";
pub const GREETING: &str = "GREETING";
pub const GREETING_REPROMPT: &str = "GREETING_REPROMPT";
pub const GREETING_UNKNOWN_USER: &str = "GREETING_UNKNOWN_USER";
pub const GREETING_UNKNOWN_USER_REPROMPT: &str = "GREETING_UNKNOWN_USER_REPROMPT";
pub const GREETING_RESPONSE: &str = "GREETING_RESPONSE";
pub const LEARN_MORE: &str = "LEARN_MORE";
pub const REPEAT: &str = "REPEAT";
pub const REPEAT_REPROMPT: &str = "REPEAT_REPROMPT";
pub const REPEAT_NOTHING: &str = "REPEAT_NOTHING";
pub const NO: &str = "NO";
pub const CANCEL_STOP_RESPONSE: &str = "CANCEL_STOP_RESPONSE";
pub const HELP: &str = "HELP";
pub const HELP_REPROMPT: &str = "HELP_REPROMPT";
pub const FALLBACK: &str = "FALLBACK";
pub const FALLBACK_REPROMPT: &str = "FALLBACK_REPROMPT";
pub const ERROR: &str = "ERROR";
pub const ERROR_REPROMPT: &str = "ERROR_REPROMPT";
pub const ENV_NOT_CONFIGURED: &str = "ENV_NOT_CONFIGURED";

/// Every prompt key a handler may look up. Each locale file must define all of them.
pub const REQUIRED_PROMPTS: &[&str] = &[
    SKILL_NAME,
    GREETING,
    GREETING_REPROMPT,
    GREETING_UNKNOWN_USER,
    GREETING_UNKNOWN_USER_REPROMPT,
    GREETING_RESPONSE,
    LEARN_MORE,
    REPEAT,
    REPEAT_REPROMPT,
    REPEAT_NOTHING,
    NO,
    CANCEL_STOP_RESPONSE,
    HELP,
    HELP_REPROMPT,
    FALLBACK,
    FALLBACK_REPROMPT,
    ERROR,
    ERROR_REPROMPT,
    ENV_NOT_CONFIGURED,
];

/// Session attribute holding the last askable speech.
pub const REPEAT_SPEECH_OUTPUT: &str = "repeat_speech_output";
/// Session attribute holding the last askable reprompt.
pub const REPEAT_REPROMPT_OUTPUT: &str = "repeat_reprompt_output";

/// Persistent attribute holding the user's name.
pub const USER_NAME: &str = "user_name";

/// Slot carrying the name on `MyNameIsIntent`.
pub const NAME_SLOT: &str = "name";

pub mod intents {
    pub const MY_NAME_IS: &str = "MyNameIsIntent";
    pub const LEARN_MORE: &str = "LearnMoreIntent";
    pub const YES: &str = "AMAZON.YesIntent";
    pub const NO: &str = "AMAZON.NoIntent";
    pub const REPEAT: &str = "AMAZON.RepeatIntent";
    pub const CANCEL: &str = "AMAZON.CancelIntent";
    pub const STOP: &str = "AMAZON.StopIntent";
    pub const HELP: &str = "AMAZON.HelpIntent";
    pub const FALLBACK: &str = "AMAZON.FallbackIntent";
}
